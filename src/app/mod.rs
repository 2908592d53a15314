//! Application state types and entry glue.
//!
//! [`AppState`] holds everything the UI needs between frames: the user
//! directory, the selection, the search query and the open dialog. It is a
//! plain serializable value; [`update`] transforms it in response to key
//! presses and gateway outcomes, and [`crate::ui`] only reads it (apart from
//! recording the page height).
//!
pub mod config;
pub mod keymap;
pub mod update;

use std::path::Path;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::model::UserRecord;
use crate::store::UserDirectoryStore;
use crate::validate::{EditForm, UserForm, ValidationErrors};

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Labels of the create dialog fields, in focus order.
pub const CREATE_FIELDS: [&str; 6] = ["Name", "Email", "Phone", "Street", "City", "Company"];
/// Labels of the edit dialog fields, in focus order.
pub const EDIT_FIELDS: [&str; 3] = ["Name", "Email", "Phone"];

/// Dialog currently drawn on top of the list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ModalState {
    View {
        id: u64,
    },
    Create {
        form: UserForm,
        focus: usize,
        /// Validation or gateway message shown above the fields.
        error: Option<String>,
        submitting: bool,
    },
    Edit {
        id: u64,
        form: EditForm,
        focus: usize,
        errors: ValidationErrors,
        error: Option<String>,
        submitting: bool,
    },
    DeleteConfirm {
        id: u64,
        name: String,
        /// 0 = Yes, 1 = No.
        selected: usize,
        error: Option<String>,
        submitting: bool,
    },
    Info {
        message: String,
    },
    Help {
        scroll: u16,
    },
}

/// Everything the UI shows, minus theme and key bindings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub store: UserDirectoryStore,
    /// Set while the initial fetch or a reload is in flight.
    pub loading: bool,
    /// Index into [`AppState::visible_users`].
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub search_query: String,
    pub modal: Option<ModalState>,
    /// One-line message for the status bar.
    pub status: Option<String>,
}

impl AppState {
    /// Empty state waiting for the first fetch.
    pub fn new() -> Self {
        Self {
            store: UserDirectoryStore::new(),
            loading: true,
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            modal: None,
            status: None,
        }
    }

    /// Users matching the current search query, in directory order.
    pub fn visible_users(&self) -> Vec<&UserRecord> {
        self.store.filter_by_name_substring(&self.search_query)
    }

    pub fn selected_user(&self) -> Option<&UserRecord> {
        self.visible_users().get(self.selected_index).copied()
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Color palette for the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error: Color,
}

impl Theme {
    /// Plain 16-color palette for terminals without truecolor.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha; the default.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "highlight_bg" => &mut self.highlight_bg,
            "error" => &mut self.error,
            _ => return None,
        })
    }

    fn entries(&self) -> [(&'static str, Color); 11] {
        [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("error", self.error),
        ]
    }

    /// Read `key = color` lines. Unknown keys and bad colors keep the `mocha` value.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            if let (Some(slot), Some(color)) = (theme.slot_mut(key.trim()), parse_color(val)) {
                *slot = color;
            }
        }
        Some(theme)
    }

    pub fn write_file(&self, path: &Path) -> crate::Result<()> {
        use crate::error::Context as _;
        use std::fmt::Write as _;

        let mut buf = String::new();
        buf.push_str("# user-directory theme\n");
        buf.push_str("# Colors: #RRGGBB, RRGGBB or 'reset'\n\n");
        for (key, color) in self.entries() {
            let _ = writeln!(&mut buf, "{key} = {}", color_to_str(color));
        }
        config::ensure_parent_dir(path)?;
        std::fs::write(path, buf).with_ctx(|| format!("write {}", path.display()))
    }

    /// Load `path`, or write the default theme there when it does not exist yet.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write default theme");
        }
        t
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

fn parse_color(s: &str) -> Option<Color> {
    let t = s.trim().to_ascii_lowercase();
    if t == "reset" {
        return Some(Color::Reset);
    }
    let hex = t.strip_prefix('#').unwrap_or(&t);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let rgb = u32::from_str_radix(hex, 16).ok()?;
    let [_, r, g, b] = rgb.to_be_bytes();
    Some(Color::Rgb(r, g, b))
}

fn color_to_str(c: Color) -> String {
    let (r, g, b) = match c {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Reset => return "reset".to_string(),
        Color::Black => (0x00, 0x00, 0x00),
        Color::Red => (0x80, 0x00, 0x00),
        Color::Green => (0x00, 0x80, 0x00),
        Color::Yellow => (0x80, 0x80, 0x00),
        Color::Blue => (0x00, 0x00, 0x80),
        Color::Magenta => (0x80, 0x00, 0x80),
        Color::Cyan => (0x00, 0x80, 0x80),
        Color::Gray => (0xc0, 0xc0, 0xc0),
        Color::DarkGray => (0x80, 0x80, 0x80),
        Color::LightRed => (0xff, 0x00, 0x00),
        Color::LightGreen => (0x00, 0xff, 0x00),
        Color::LightYellow => (0xff, 0xff, 0x00),
        Color::LightBlue => (0x00, 0x00, 0xff),
        Color::LightMagenta => (0xff, 0x00, 0xff),
        Color::LightCyan => (0x00, 0xff, 0xff),
        Color::White => (0xff, 0xff, 0xff),
        // Indexed colors have no fixed RGB value.
        Color::Indexed(_) => return "reset".to_string(),
    };
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_accepts_hex_and_reset() {
        assert_eq!(parse_color("#cba6f7"), Some(Color::Rgb(0xcb, 0xa6, 0xf7)));
        assert_eq!(parse_color(" CBA6F7 "), Some(Color::Rgb(0xcb, 0xa6, 0xf7)));
        assert_eq!(parse_color("Reset"), Some(Color::Reset));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("+12345"), None);
        assert_eq!(parse_color("purple"), None);
    }

    #[test]
    fn theme_file_overrides_single_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.conf");
        let conf = "# mine\nerror = #ff0000\ntitle = nonsense\nbogus = #000000\n";
        std::fs::write(&path, conf).unwrap();
        let t = Theme::from_file(&path).unwrap();
        assert_eq!(t.error, Color::Rgb(0xff, 0, 0));
        assert_eq!(t.title, Theme::mocha().title);
    }

    #[test]
    fn selection_follows_the_filtered_view() {
        let mut app = AppState::new();
        app.store.load(vec![
            UserRecord {
                id: 1,
                name: "Ann".into(),
                ..UserRecord::default()
            },
            UserRecord {
                id: 2,
                name: "Bob".into(),
                ..UserRecord::default()
            },
        ]);
        app.search_query = "bo".into();
        assert_eq!(app.selected_user().map(|u| u.id), Some(2));
        app.search_query.clear();
        assert_eq!(app.selected_user().map(|u| u.id), Some(1));
    }

    #[test]
    fn modal_open_and_close_switch_input_mode() {
        let mut app = AppState::new();
        app.open_modal(ModalState::Help { scroll: 0 });
        assert_eq!(app.input_mode, InputMode::Modal);
        app.close_modal();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.modal.is_none());
    }
}
