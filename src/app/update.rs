//! Event loop and state transitions.
//!
//! [`handle_key`] and [`apply_outcome`] are pure functions over [`AppState`]:
//! the first turns a key press into a state change plus, at most, one
//! [`GatewayRequest`]; the second folds a finished request back in. The store
//! is only touched by `apply_outcome`, i.e. after the gateway confirmed.
//!
//! [`run_app`] wires them to the terminal. Requests run on a tokio runtime and
//! report back over a channel, so drawing never waits on the network.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info, warn};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::{AppState, CREATE_FIELDS, EDIT_FIELDS, InputMode, ModalState, Theme};
use crate::model::UserRecord;
use crate::remote::{GatewayOutcome, GatewayRequest, UserGateway, dispatch};
use crate::search::apply_search;
use crate::ui;
use crate::validate::{
    EditForm, Field, UserForm, ValidationErrors, validate_create, validate_edit,
};

pub const LOAD_FAILED_MSG: &str = "Failed to load users";
pub const CREATE_FAILED_MSG: &str = "An error occurred while creating the user.";
pub const UPDATE_FAILED_MSG: &str = "Failed to update user";
pub const DELETE_FAILED_MSG: &str = "Failed to delete user";

/// What the run loop should do after a key press.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
    Dispatch(GatewayRequest),
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    gateway: Arc<dyn UserGateway>,
    theme: Theme,
    keymap: Keymap,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("user-directory-net")
        .enable_all()
        .build()?;
    let (tx, mut rx) = mpsc::unbounded_channel::<GatewayOutcome>();

    let mut app = AppState::new();
    spawn_request(&runtime, &gateway, &tx, GatewayRequest::ListUsers);

    loop {
        while let Ok(outcome) = rx.try_recv() {
            apply_outcome(&mut app, outcome);
        }

        terminal.draw(|f| {
            ui::render(f, &mut app, &theme, &keymap);
        })?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match handle_key(&mut app, &keymap, key) {
                Flow::Quit => break,
                Flow::Dispatch(request) => spawn_request(&runtime, &gateway, &tx, request),
                Flow::Continue => {}
            }
        }
    }

    info!("shutting down");
    runtime.shutdown_timeout(Duration::from_millis(500));
    Ok(())
}

fn spawn_request(
    runtime: &Runtime,
    gateway: &Arc<dyn UserGateway>,
    tx: &UnboundedSender<GatewayOutcome>,
    request: GatewayRequest,
) {
    debug!(?request, "dispatching");
    let gateway = Arc::clone(gateway);
    let tx = tx.clone();
    runtime.spawn(async move {
        let outcome = dispatch(gateway.as_ref(), request).await;
        // The receiver only goes away on shutdown.
        let _ = tx.send(outcome);
    });
}

/// Apply one key press to `app`.
pub fn handle_key(app: &mut AppState, keymap: &Keymap, key: KeyEvent) -> Flow {
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, keymap, key),
        InputMode::Search => {
            handle_search_key(app, key);
            Flow::Continue
        }
        InputMode::Modal => handle_modal_key(app, key),
    }
}

fn handle_normal_key(app: &mut AppState, keymap: &Keymap, key: KeyEvent) -> Flow {
    let Some(action) = keymap.resolve(&key) else {
        return Flow::Continue;
    };
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::ClearSearch => {
            app.search_query.clear();
            apply_search(app);
        }
        KeyAction::NewUser => app.open_modal(ModalState::Create {
            form: UserForm::default(),
            focus: 0,
            error: None,
            submitting: false,
        }),
        KeyAction::EditSelection => {
            if let Some(user) = app.selected_user() {
                let modal = ModalState::Edit {
                    id: user.id,
                    form: EditForm::from_record(user),
                    focus: 0,
                    errors: ValidationErrors::new(),
                    error: None,
                    submitting: false,
                };
                app.open_modal(modal);
            }
        }
        KeyAction::ViewSelection => {
            if let Some(id) = app.selected_user().map(|u| u.id) {
                app.open_modal(ModalState::View { id });
            }
        }
        KeyAction::DeleteSelection => {
            if let Some(user) = app.selected_user() {
                let modal = ModalState::DeleteConfirm {
                    id: user.id,
                    name: user.name.clone(),
                    selected: 1,
                    error: None,
                    submitting: false,
                };
                app.open_modal(modal);
            }
        }
        KeyAction::Reload => {
            if !app.loading {
                app.loading = true;
                app.status = Some("Loading users...".to_string());
                return Flow::Dispatch(GatewayRequest::ListUsers);
            }
        }
        KeyAction::MoveUp => app.selected_index = app.selected_index.saturating_sub(1),
        KeyAction::MoveDown => {
            if app.selected_index + 1 < app.visible_users().len() {
                app.selected_index += 1;
            }
        }
        KeyAction::PageUp => {
            let rpp = app.rows_per_page.max(1);
            app.selected_index = app.selected_index.saturating_sub(rpp);
        }
        KeyAction::PageDown => {
            let rpp = app.rows_per_page.max(1);
            let last = app.visible_users().len().saturating_sub(1);
            app.selected_index = app.selected_index.saturating_add(rpp).min(last);
        }
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_query.clear();
            apply_search(app);
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            apply_search(app);
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_query.push(c);
            apply_search(app);
        }
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, key: KeyEvent) -> Flow {
    let Some(modal) = app.modal.take() else {
        app.input_mode = InputMode::Normal;
        return Flow::Continue;
    };
    let (next, flow) = match modal {
        ModalState::View { .. } | ModalState::Info { .. } => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => (None, Flow::Continue),
            _ => (Some(modal), Flow::Continue),
        },
        ModalState::Help { scroll } => match key.code {
            KeyCode::Up | KeyCode::Char('k') => (
                Some(ModalState::Help {
                    scroll: scroll.saturating_sub(1),
                }),
                Flow::Continue,
            ),
            KeyCode::Down | KeyCode::Char('j') => (
                Some(ModalState::Help {
                    scroll: scroll.saturating_add(1),
                }),
                Flow::Continue,
            ),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                (None, Flow::Continue)
            }
            _ => (Some(modal), Flow::Continue),
        },
        ModalState::Create {
            form,
            focus,
            error,
            submitting,
        } => create_modal_key(form, focus, error, submitting, key),
        ModalState::Edit {
            id,
            form,
            focus,
            errors,
            error,
            submitting,
        } => {
            let modal = EditModal {
                id,
                form,
                focus,
                errors,
                error,
                submitting,
            };
            edit_modal_key(app, modal, key)
        }
        ModalState::DeleteConfirm {
            id,
            name,
            selected,
            error,
            submitting,
        } => delete_modal_key(id, name, selected, error, submitting, key),
    };
    match next {
        Some(m) => app.modal = Some(m),
        None => app.close_modal(),
    }
    flow
}

fn create_modal_key(
    mut form: UserForm,
    mut focus: usize,
    mut error: Option<String>,
    mut submitting: bool,
    key: KeyEvent,
) -> (Option<ModalState>, Flow) {
    let mut flow = Flow::Continue;
    match key.code {
        KeyCode::Esc => return (None, Flow::Continue),
        KeyCode::Tab | KeyCode::Down => focus = (focus + 1) % CREATE_FIELDS.len(),
        KeyCode::BackTab | KeyCode::Up => {
            focus = (focus + CREATE_FIELDS.len() - 1) % CREATE_FIELDS.len()
        }
        KeyCode::Enter if !submitting => match validate_create(&form) {
            Err(e) => {
                error = Some(e.message.to_string());
                focus = field_index(e.field);
            }
            Ok(()) => {
                error = None;
                submitting = true;
                flow = Flow::Dispatch(GatewayRequest::CreateUser(form.to_draft()));
            }
        },
        KeyCode::Backspace => {
            if let Some(field) = create_field_mut(&mut form, focus) {
                field.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(field) = create_field_mut(&mut form, focus) {
                field.push(c);
            }
        }
        _ => {}
    }
    let modal = ModalState::Create {
        form,
        focus,
        error,
        submitting,
    };
    (Some(modal), flow)
}

struct EditModal {
    id: u64,
    form: EditForm,
    focus: usize,
    errors: ValidationErrors,
    error: Option<String>,
    submitting: bool,
}

fn edit_modal_key(
    app: &AppState,
    mut m: EditModal,
    key: KeyEvent,
) -> (Option<ModalState>, Flow) {
    let mut flow = Flow::Continue;
    match key.code {
        KeyCode::Esc => return (None, Flow::Continue),
        KeyCode::Tab | KeyCode::Down => m.focus = (m.focus + 1) % EDIT_FIELDS.len(),
        KeyCode::BackTab | KeyCode::Up => {
            m.focus = (m.focus + EDIT_FIELDS.len() - 1) % EDIT_FIELDS.len()
        }
        KeyCode::Enter if !m.submitting => {
            m.error = None;
            m.errors = validate_edit(&m.form);
            if let Some(first) = m.errors.fields().next() {
                m.focus = field_index(first);
            } else {
                let Some(current) = app.store.get(m.id) else {
                    let message = format!("User {} is no longer in the directory.", m.id);
                    return (Some(ModalState::Info { message }), Flow::Continue);
                };
                m.submitting = true;
                flow = Flow::Dispatch(GatewayRequest::UpdateUser {
                    id: m.id,
                    user: m.form.apply_to(current),
                });
            }
        }
        KeyCode::Backspace => {
            if let Some(field) = edit_field_mut(&mut m.form, m.focus) {
                field.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(field) = edit_field_mut(&mut m.form, m.focus) {
                field.push(c);
            }
        }
        _ => {}
    }
    let modal = ModalState::Edit {
        id: m.id,
        form: m.form,
        focus: m.focus,
        errors: m.errors,
        error: m.error,
        submitting: m.submitting,
    };
    (Some(modal), flow)
}

fn delete_modal_key(
    id: u64,
    name: String,
    mut selected: usize,
    error: Option<String>,
    mut submitting: bool,
    key: KeyEvent,
) -> (Option<ModalState>, Flow) {
    let mut flow = Flow::Continue;
    match key.code {
        KeyCode::Esc | KeyCode::Char('n') => return (None, Flow::Continue),
        KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
            selected = 1 - selected.min(1);
        }
        KeyCode::Char('y') => selected = 0,
        KeyCode::Enter if !submitting => {
            if selected != 0 {
                return (None, Flow::Continue);
            }
            submitting = true;
            flow = Flow::Dispatch(GatewayRequest::DeleteUser { id });
        }
        _ => {}
    }
    let modal = ModalState::DeleteConfirm {
        id,
        name,
        selected,
        error,
        submitting,
    };
    (Some(modal), flow)
}

fn field_index(field: Field) -> usize {
    match field {
        Field::Name => 0,
        Field::Email => 1,
        Field::Phone => 2,
        Field::Street => 3,
        Field::City => 4,
    }
}

fn create_field_mut(form: &mut UserForm, focus: usize) -> Option<&mut String> {
    match focus {
        0 => Some(&mut form.name),
        1 => Some(&mut form.email),
        2 => Some(&mut form.phone),
        3 => Some(&mut form.street),
        4 => Some(&mut form.city),
        5 => Some(&mut form.company_name),
        _ => None,
    }
}

fn edit_field_mut(form: &mut EditForm, focus: usize) -> Option<&mut String> {
    match focus {
        0 => Some(&mut form.name),
        1 => Some(&mut form.email),
        2 => Some(&mut form.phone),
        _ => None,
    }
}

/// Fold a finished gateway call into `app`.
///
/// On success the store is updated and the matching dialog closes. On failure
/// the store is left alone and a generic message is shown in the open dialog,
/// or in the status bar when the dialog is gone.
pub fn apply_outcome(app: &mut AppState, outcome: GatewayOutcome) {
    match outcome {
        GatewayOutcome::Listed(Ok(users)) => {
            let count = users.len();
            app.store.load(users);
            app.loading = false;
            app.status = Some(format!("Loaded {count} users"));
            apply_search(app);
            info!(count, "users loaded");
        }
        GatewayOutcome::Listed(Err(e)) => {
            warn!(error = %e, "fetching users failed");
            app.loading = false;
            app.status = Some(LOAD_FAILED_MSG.to_string());
        }
        GatewayOutcome::Created(Ok(user)) => {
            if matches!(app.modal, Some(ModalState::Create { submitting: true, .. })) {
                app.close_modal();
            }
            let (id, name) = (user.id, user.name.clone());
            match app.store.insert(user) {
                Ok(()) => {
                    info!(id, "user created");
                    app.status = Some(format!("Created user {name}"));
                    let pos = app.visible_users().iter().position(|u| u.id == id);
                    if let Some(pos) = pos {
                        app.selected_index = pos;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "server returned an id already listed");
                    app.open_modal(ModalState::Info {
                        message: format!("The new user was not added locally: {e}."),
                    });
                }
            }
        }
        GatewayOutcome::Created(Err(e)) => {
            warn!(error = %e, "create failed");
            report_failure(app, CREATE_FAILED_MSG, |m| {
                matches!(m, ModalState::Create { submitting: true, .. })
            });
        }
        GatewayOutcome::Updated { id, result: Ok(user) } => {
            if matches!(
                &app.modal,
                Some(ModalState::Edit { id: open, submitting: true, .. }) if *open == id
            ) {
                app.close_modal();
            }
            // The id in the path is authoritative.
            let user = UserRecord { id, ..user };
            let name = user.name.clone();
            if app.store.replace_by_id(user) {
                info!(id, "user updated");
                app.status = Some(format!("Saved changes to {name}"));
            } else {
                debug!(id, "updated user is no longer listed");
            }
            apply_search(app);
        }
        GatewayOutcome::Updated { id, result: Err(e) } => {
            warn!(id, error = %e, "update failed");
            report_failure(app, UPDATE_FAILED_MSG, |m| {
                matches!(m, ModalState::Edit { id: open, submitting: true, .. } if *open == id)
            });
        }
        GatewayOutcome::Deleted { id, result: Ok(()) } => {
            if matches!(
                &app.modal,
                Some(ModalState::DeleteConfirm { id: open, submitting: true, .. }) if *open == id
            ) {
                app.close_modal();
            }
            if let Some(removed) = app.store.remove_by_id(id) {
                info!(id, "user deleted");
                app.status = Some(format!("Deleted user {}", removed.name));
            }
            apply_search(app);
        }
        GatewayOutcome::Deleted { id, result: Err(e) } => {
            warn!(id, error = %e, "delete failed");
            report_failure(app, DELETE_FAILED_MSG, |m| {
                matches!(
                    m,
                    ModalState::DeleteConfirm { id: open, submitting: true, .. } if *open == id
                )
            });
        }
    }
}

fn report_failure(app: &mut AppState, message: &str, is_origin: impl Fn(&ModalState) -> bool) {
    if !app.modal.as_ref().is_some_and(&is_origin) {
        app.status = Some(message.to_string());
        return;
    }
    if let Some(
        ModalState::Create { error, submitting, .. }
        | ModalState::Edit { error, submitting, .. }
        | ModalState::DeleteConfirm { error, submitting, .. },
    ) = app.modal.as_mut()
    {
        *error = Some(message.to_string());
        *submitting = false;
    }
}
