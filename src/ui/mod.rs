//! Rendering. Every function here reads [`AppState`]; the table also records
//! how many rows fit so paging keys move by a screenful.

pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::{AppState, InputMode, ModalState, Theme};

pub fn render(f: &mut Frame, app: &mut AppState, theme: &Theme, keymap: &Keymap) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(root[1]);

    let prompt = match app.input_mode {
        InputMode::Search => format!("  Search: {}_", app.search_query),
        _ if !app.search_query.is_empty() => format!("  Filter: {}", app.search_query),
        _ => String::new(),
    };
    let hint = |action: KeyAction| keymap.keys_for(action).into_iter().next().unwrap_or_default();
    let header = Paragraph::new(format!(
        "users:{}{prompt}   {}: search  {}: new  {}: edit  {}: delete  {}: help  {}: quit",
        app.store.len(),
        hint(KeyAction::StartSearch),
        hint(KeyAction::NewUser),
        hint(KeyAction::EditSelection),
        hint(KeyAction::DeleteSelection),
        hint(KeyAction::OpenHelp),
        hint(KeyAction::Quit),
    ))
    .block(
        Block::default()
            .title("User Directory")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    )
    .style(Style::default().fg(theme.header_fg).bg(theme.header_bg));
    f.render_widget(header, root[0]);

    users::render_users_table(f, body[0], app, theme);
    users::render_user_details(f, body[1], app, theme);
    components::render_status_bar(f, root[2], app, theme);

    if let Some(modal) = &app.modal {
        let area = f.area();
        match modal {
            ModalState::Info { message } => components::render_info_modal(f, area, message, theme),
            ModalState::Help { scroll } => {
                components::render_help_modal(f, area, keymap, *scroll, theme)
            }
            other => users::render_user_modal(f, area, app, other, theme),
        }
    }
}
