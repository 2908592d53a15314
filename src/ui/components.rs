//! Shared UI components (status bar, modal helpers).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::{ALL_ACTIONS, KeyAction, Keymap, format_action};
use crate::app::{AppState, InputMode, Theme};

/// Render the bottom status bar with mode, counts and the last message.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState, theme: &Theme) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "DIALOG",
    };
    let mut msg = format!(
        "mode: {mode}  users:{}  shown:{}  rows/page:{}",
        app.store.len(),
        app.visible_users().len(),
        app.rows_per_page
    );
    if app.loading {
        msg.push_str("  loading...");
    }
    if let Some(status) = &app.status {
        msg.push_str("  | ");
        msg.push_str(status);
    }
    let p = Paragraph::new(msg).style(Style::default().fg(theme.status_fg).bg(theme.status_bg));
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let max_w = area.width.saturating_sub(6).max(30);
    let min_w = 50u16.min(max_w);
    let approx_lines = (message.len() as u16 / min_w.saturating_sub(4).max(10)).max(1);
    let max_h = area.height.saturating_sub(6).max(5);
    let height = (approx_lines + 4).min(max_h).max(5);
    let rect = centered_rect(min_w, height, area);
    let p = Paragraph::new(format!("{message}\n\nEnter/Esc: close"))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Info")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

fn help_lines(keymap: &Keymap) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let mut lines = vec![Line::styled("List", bold)];
    for action in ALL_ACTIONS {
        if action == KeyAction::Ignore {
            continue;
        }
        let keys = keymap.keys_for(action);
        if keys.is_empty() {
            continue;
        }
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<18}", format_action(action))),
            Span::styled(keys.join(", "), italic),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled("Search", bold));
    lines.push(Line::raw("  Type to filter by name; Enter keeps the filter, Esc clears it"));
    lines.push(Line::raw(""));
    lines.push(Line::styled("Dialogs", bold));
    for (label, keys) in [
        ("Next field", "Tab, Down"),
        ("Previous field", "Shift+Tab, Up"),
        ("Submit", "Enter"),
        ("Yes / No", "Left, Right, y, n"),
        ("Cancel / Close", "Esc"),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label:<18}")),
            Span::styled(keys, italic),
        ]));
    }
    lines
}

/// Render the help modal listing the active key bindings.
pub fn render_help_modal(f: &mut Frame, area: Rect, keymap: &Keymap, scroll: u16, theme: &Theme) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(40);
    let height = 24u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let p = Paragraph::new(help_lines(keymap))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help (Esc to close)")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_clamped_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(20, 4, area), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_rect(80, 20, area), Rect::new(0, 0, 40, 10));
    }

    #[test]
    fn help_lists_bound_actions() {
        let text: Vec<String> = help_lines(&Keymap::default())
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        let new_user = format_action(KeyAction::NewUser);
        assert!(text.iter().any(|l| l.contains(new_user) && l.contains('n')));
        assert!(!text.iter().any(|l| l.contains(format_action(KeyAction::Ignore))));
    }
}
