use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::app::{AppState, CREATE_FIELDS, EDIT_FIELDS, ModalState, Theme};
use crate::model::UserRecord;
use crate::ui::components::centered_rect;
use crate::validate::{EditForm, Field, UserForm};

fn bordered<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
}

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState, theme: &Theme) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let visible = app.visible_users();
    if visible.is_empty() {
        let msg = if app.loading {
            "Loading users..."
        } else if app.search_query.is_empty() {
            "No users."
        } else {
            "No users match the search."
        };
        let p = Paragraph::new(msg)
            .style(Style::default().fg(theme.muted))
            .block(bordered("Users", theme));
        f.render_widget(p, area);
        return;
    }

    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(visible.len());

    let rows = visible[start..end].iter().enumerate().map(|(i, u)| {
        let style = if start + i == app.selected_index {
            Style::default()
                .fg(theme.highlight_fg)
                .bg(theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        Row::new(vec![
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(u.phone.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Percentage(35),
        Constraint::Percentage(40),
        Constraint::Percentage(25),
    ];
    let header = Row::new(vec!["NAME", "EMAIL", "PHONE"])
        .style(Style::default().fg(theme.title).add_modifier(Modifier::BOLD));
    let title = format!("Users ({}/{})", visible.len(), app.store.len());

    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(&title, theme))
        .column_spacing(1);
    f.render_widget(table, area);
}

fn detail_lines(u: &UserRecord, theme: &Theme) -> Vec<Line<'static>> {
    let label = Style::default().fg(theme.muted);
    let row = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{name:>9}: "), label), Span::raw(value)])
    };
    vec![
        row("Name", u.name.clone()),
        row("Email", u.email.clone()),
        row("Phone", u.phone.clone()),
        row("Website", u.website.clone().unwrap_or_default()),
        row("Address", u.address_line()),
        row("Company", u.company_name().to_string()),
        row("Id", u.id.to_string()),
    ]
}

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState, theme: &Theme) {
    let lines = app
        .selected_user()
        .map(|u| detail_lines(u, theme))
        .unwrap_or_default();
    let p = Paragraph::new(lines)
        .style(Style::default().fg(theme.text))
        .wrap(Wrap { trim: true })
        .block(bordered("Details", theme));
    f.render_widget(p, area);
}

pub fn render_user_modal(
    f: &mut Frame,
    area: Rect,
    app: &AppState,
    state: &ModalState,
    theme: &Theme,
) {
    match state {
        ModalState::View { id } => {
            let rect = centered_rect(60, 11, area);
            let lines = match app.store.get(*id) {
                Some(u) => detail_lines(u, theme),
                None => vec![Line::raw("This user is no longer in the directory.")],
            };
            let p = Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(bordered("User details", theme));
            f.render_widget(Clear, rect);
            f.render_widget(p, rect);
        }
        ModalState::Create {
            form,
            focus,
            error,
            submitting,
        } => {
            let mut lines = status_lines(error.as_deref(), *submitting, theme);
            for (idx, label) in CREATE_FIELDS.iter().enumerate() {
                lines.push(field_line(label, create_value(form, idx), idx == *focus, theme));
            }
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                "Tab: next field  Enter: create  Esc: cancel",
                Style::default().fg(theme.muted),
            ));
            let rect = centered_rect(64, lines.len() as u16 + 2, area);
            f.render_widget(Clear, rect);
            f.render_widget(Paragraph::new(lines).block(bordered("New user", theme)), rect);
        }
        ModalState::Edit {
            form,
            focus,
            errors,
            error,
            submitting,
            ..
        } => {
            let mut lines = status_lines(error.as_deref(), *submitting, theme);
            for (idx, (label, field)) in EDIT_FIELDS
                .iter()
                .zip([Field::Name, Field::Email, Field::Phone])
                .enumerate()
            {
                lines.push(field_line(label, edit_value(form, idx), idx == *focus, theme));
                if let Some(msg) = errors.get(field) {
                    lines.push(Line::styled(
                        format!("             {msg}"),
                        Style::default().fg(theme.error),
                    ));
                }
            }
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                "Tab: next field  Enter: save  Esc: cancel",
                Style::default().fg(theme.muted),
            ));
            let rect = centered_rect(64, lines.len() as u16 + 2, area);
            f.render_widget(Clear, rect);
            f.render_widget(Paragraph::new(lines).block(bordered("Edit user", theme)), rect);
        }
        ModalState::DeleteConfirm {
            name,
            selected,
            error,
            submitting,
            ..
        } => {
            let mut lines = status_lines(error.as_deref(), *submitting, theme);
            lines.push(Line::raw(format!("Delete user '{name}'?")));
            lines.push(Line::raw(""));
            let yes = if *selected == 0 { "[Yes]" } else { " Yes " };
            let no = if *selected == 1 { "[No]" } else { " No " };
            lines.push(Line::raw(format!("  {yes}    {no}")));
            let rect = centered_rect(50, lines.len() as u16 + 2, area);
            f.render_widget(Clear, rect);
            f.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .block(bordered("Confirm delete", theme)),
                rect,
            );
        }
        // Drawn by components.
        ModalState::Info { .. } | ModalState::Help { .. } => {}
    }
}

fn status_lines(error: Option<&str>, submitting: bool, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(msg) = error {
        lines.push(Line::styled(msg.to_string(), Style::default().fg(theme.error)));
    }
    if submitting {
        lines.push(Line::styled("Saving...", Style::default().fg(theme.muted)));
    }
    if !lines.is_empty() {
        lines.push(Line::raw(""));
    }
    lines
}

fn field_line(label: &str, value: &str, focused: bool, theme: &Theme) -> Line<'static> {
    let marker = if focused { "▶ " } else { "  " };
    let value_style = if focused {
        Style::default().fg(theme.highlight_fg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{label:>8}: "), Style::default().fg(theme.muted)),
        Span::styled(format!("{value}{cursor}"), value_style),
    ])
}

fn create_value(form: &UserForm, idx: usize) -> &str {
    match idx {
        0 => &form.name,
        1 => &form.email,
        2 => &form.phone,
        3 => &form.street,
        4 => &form.city,
        _ => &form.company_name,
    }
}

fn edit_value(form: &EditForm, idx: usize) -> &str {
    match idx {
        0 => &form.name,
        1 => &form.email,
        _ => &form.phone,
    }
}
