//! Runtime settings and config file locations.
//!
//! Config files live in `$XDG_CONFIG_HOME/user-directory/` (or
//! `$HOME/.config/user-directory/`). A file in the working directory is also
//! picked up when reading, which is handy during development.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Context, Result, simple_error};
use crate::remote::http::{DEFAULT_API_URL, DEFAULT_TIMEOUT};

/// Directory name under the user's config dir.
pub const APP_DIR: &str = "user-directory";
pub const THEME_FILE: &str = "theme.conf";
pub const KEYBINDS_FILE: &str = "keybinds.conf";

/// Base config directory for this application, if one can be determined.
pub fn config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join(APP_DIR))
}

/// First existing location of `name`: the config dir, then the working directory.
pub fn config_file_read_path(name: &str) -> Option<PathBuf> {
    config_dir()
        .map(|d| d.join(name))
        .into_iter()
        .chain(std::iter::once(PathBuf::from(name)))
        .find(|p| p.is_file())
}

/// Where `name` should be written. Falls back to the working directory when
/// no config dir is known.
pub fn config_file_write_path(name: &str) -> PathBuf {
    match config_dir() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Existing file to read, else where a new one should be written.
pub fn config_file_path(name: &str) -> PathBuf {
    config_file_read_path(name).unwrap_or_else(|| config_file_write_path(name))
}

/// Create the parent directory of a config file.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_ctx(|| format!("create config dir {}", parent.display()))?;
    }
    Ok(())
}

/// Settings resolved from the command line and environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub timeout: Duration,
    pub theme_path: PathBuf,
    pub keybinds_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            theme_path: config_file_path(THEME_FILE),
            keybinds_path: config_file_path(KEYBINDS_FILE),
        }
    }
}

impl Settings {
    /// Reject values the gateway cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(simple_error("api url must not be empty"));
        }
        if self.timeout.is_zero() {
            return Err(simple_error("timeout must be at least one second"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let s = Settings::default();
        assert!(s.validate().is_ok());
        assert!(s.theme_path.ends_with(THEME_FILE));
        assert!(s.keybinds_path.ends_with(KEYBINDS_FILE));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let s = Settings {
            timeout: Duration::ZERO,
            ..Settings::default()
        };
        assert_eq!(
            s.validate().unwrap_err().to_string(),
            "timeout must be at least one second"
        );
    }

    #[test]
    fn ensure_parent_dir_creates_nested_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a").join("b").join(THEME_FILE);
        ensure_parent_dir(&file).unwrap();
        assert!(file.parent().unwrap().is_dir());
    }
}
