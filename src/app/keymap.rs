//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Bindings only apply to the list view (normal mode). Forms and dialogs use
//! fixed keys: Tab/Up/Down to move between fields, Enter to submit, Esc to cancel.

use std::collections::HashMap;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::config::ensure_parent_dir;
use crate::error::Context as _;

/// Semantic actions available from the user list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Show the help dialog.
    OpenHelp,
    /// Start typing a name filter.
    StartSearch,
    /// Drop the current name filter.
    ClearSearch,
    /// Open the create dialog.
    NewUser,
    /// Open the edit dialog for the selected user.
    EditSelection,
    /// Show every field of the selected user.
    ViewSelection,
    /// Ask for confirmation, then delete the selected user.
    DeleteSelection,
    /// Fetch the list again from the server.
    Reload,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    /// Swallow the key.
    Ignore,
}

pub const ALL_ACTIONS: [KeyAction; 14] = [
    KeyAction::Quit,
    KeyAction::OpenHelp,
    KeyAction::StartSearch,
    KeyAction::ClearSearch,
    KeyAction::NewUser,
    KeyAction::EditSelection,
    KeyAction::ViewSelection,
    KeyAction::DeleteSelection,
    KeyAction::Reload,
    KeyAction::MoveUp,
    KeyAction::MoveDown,
    KeyAction::PageUp,
    KeyAction::PageDown,
    KeyAction::Ignore,
];

/// Mapping from `(modifiers, code)` to [`KeyAction`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Vim-ish defaults plus arrow keys.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Esc), KeyAction::ClearSearch);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewUser);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditSelection);
        bindings.insert((M::NONE, Enter), KeyAction::ViewSelection);
        bindings.insert((M::NONE, Char('v')), KeyAction::ViewSelection);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('r')), KeyAction::Reload);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);
        bindings.insert((M::NONE, Left), KeyAction::PageUp);
        bindings.insert((M::NONE, Right), KeyAction::PageDown);

        Self { bindings }
    }

    /// Load `path`, or write the defaults there when it does not exist yet.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write default keybinds");
        }
        km
    }

    /// Read `<Action> = <KeySpec>` lines on top of the defaults.
    ///
    /// Blank lines, `#` comments and lines that do not parse are skipped.
    /// Returns `None` when the file cannot be read.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        Some(map)
    }

    /// Write every binding, grouped by action, in a stable order.
    pub fn write_file(&self, path: &Path) -> crate::Result<()> {
        use std::fmt::Write as _;

        let mut buf = String::new();
        buf.push_str("# user-directory keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Tab, Up, Down, Left, Right,\n");
        buf.push_str("#   PageUp, PageDown, Delete, /, ?\n");
        buf.push_str("# Actions: ");
        buf.push_str(
            &ALL_ACTIONS
                .iter()
                .map(|a| format_action(*a))
                .collect::<Vec<_>>()
                .join(", "),
        );
        buf.push_str("\n\n");

        for action in ALL_ACTIONS {
            for key in self.keys_for(action) {
                let _ = writeln!(&mut buf, "{} = {}", format_action(action), key);
            }
        }

        ensure_parent_dir(path)?;
        std::fs::write(path, buf).with_ctx(|| format!("write {}", path.display()))
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        // Terminals disagree on whether '?' carries SHIFT.
        let mods = match key.code {
            KeyCode::Char(_) => key.modifiers.difference(KeyModifiers::SHIFT),
            _ => key.modifiers,
        };
        self.bindings.get(&(mods, key.code)).copied()
    }

    /// Keys bound to `action`, formatted for display and sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((m, c), _)| Self::format_key(*m, *c))
            .collect();
        keys.sort();
        keys
    }

    /// Human-readable key spec such as `Ctrl+c` or `PageUp`; the inverse of the file format.
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Backspace => "Backspace".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Backspace" => Backspace,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let name = s.trim();
    ALL_ACTIONS.into_iter().find(|a| format_action(*a) == name)
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::ClearSearch => "ClearSearch",
        KeyAction::NewUser => "NewUser",
        KeyAction::EditSelection => "EditSelection",
        KeyAction::ViewSelection => "ViewSelection",
        KeyAction::DeleteSelection => "DeleteSelection",
        KeyAction::Reload => "Reload",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PageUp => "PageUp",
        KeyAction::PageDown => "PageDown",
        KeyAction::Ignore => "Ignore",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn defaults_resolve_common_keys() {
        let km = Keymap::default();
        let none = KeyModifiers::NONE;
        assert_eq!(km.resolve(&key(KeyCode::Char('q'), none)), Some(KeyAction::Quit));
        assert_eq!(
            km.resolve(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
        assert_eq!(
            km.resolve(&key(KeyCode::Char('?'), KeyModifiers::SHIFT)),
            Some(KeyAction::OpenHelp)
        );
        assert_eq!(km.resolve(&key(KeyCode::Enter, none)), Some(KeyAction::ViewSelection));
        assert_eq!(km.resolve(&key(KeyCode::Char('x'), none)), None);
    }

    #[test]
    fn parse_key_specs() {
        assert_eq!(parse_key("Ctrl+q"), Some((KeyModifiers::CONTROL, KeyCode::Char('q'))));
        assert_eq!(parse_key(" PageDown "), Some((KeyModifiers::NONE, KeyCode::PageDown)));
        assert_eq!(parse_key("Escape"), Some((KeyModifiers::NONE, KeyCode::Esc)));
        assert_eq!(parse_key("ab"), None);
        assert_eq!(parse_key(""), None);
    }

    #[test]
    fn every_action_name_parses_back() {
        for a in ALL_ACTIONS {
            assert_eq!(parse_action(format_action(a)), Some(a));
        }
        assert_eq!(parse_action("Bogus"), None);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keybinds.conf");
        std::fs::write(&path, "# custom\nNewUser = a\nnot a binding\nReload = Ctrl+r\n").unwrap();
        let km = Keymap::from_file(&path).unwrap();
        let none = KeyModifiers::NONE;
        assert_eq!(km.resolve(&key(KeyCode::Char('a'), none)), Some(KeyAction::NewUser));
        assert_eq!(
            km.resolve(&key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(KeyAction::Reload)
        );
        // Defaults survive.
        assert_eq!(km.resolve(&key(KeyCode::Char('n'), none)), Some(KeyAction::NewUser));
    }

    #[test]
    fn keys_for_lists_sorted_specs() {
        let km = Keymap::default();
        assert_eq!(km.keys_for(KeyAction::DeleteSelection), vec!["Delete", "d"]);
    }
}
