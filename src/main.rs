//! user-directory binary entry point.
//!
//! Parses the command line, sets up file logging, initializes the terminal in
//! raw mode, runs the TUI event loop, and restores the terminal state on exit.
//!
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use user_directory::app::config::{self, Settings};
use user_directory::app::keymap::Keymap;
use user_directory::app::{self, Theme};
use user_directory::error::{Context, Result};
use user_directory::remote::HttpGateway;
use user_directory::remote::http::DEFAULT_API_URL;

/// Browse and edit a remote user directory from the terminal.
#[derive(Parser, Debug)]
#[command(name = "user-directory")]
#[command(version)]
struct Cli {
    /// Base URL of the service exposing the `/users` collection
    #[arg(long, env = "USER_DIRECTORY_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "USER_DIRECTORY_TIMEOUT_SECS", default_value_t = 15)]
    timeout_secs: u64,

    /// Theme file (created with defaults when missing)
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Key bindings file (created with defaults when missing)
    #[arg(long)]
    keybinds: Option<PathBuf>,

    /// Write logs to this file; nothing is logged otherwise
    #[arg(long, env = "USER_DIRECTORY_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn settings(&self) -> Settings {
        let defaults = Settings::default();
        Settings {
            api_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            theme_path: self.theme.clone().unwrap_or(defaults.theme_path),
            keybinds_path: self.keybinds.clone().unwrap_or(defaults.keybinds_path),
        }
    }
}

/// The terminal belongs to the UI, so logs only go to a file.
fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    config::ensure_parent_dir(path)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let settings = cli.settings();
    settings.validate()?;
    tracing::info!(
        api_url = %settings.api_url,
        "starting user-directory v{}",
        env!("CARGO_PKG_VERSION")
    );

    let gateway = HttpGateway::new(&settings.api_url, settings.timeout)
        .with_ctx(|| format!("configure gateway for {}", settings.api_url))?;
    let theme = Theme::load_or_init(&settings.theme_path);
    let keymap = Keymap::load_or_init(&settings.keybinds_path);

    let mut terminal = init_terminal().with_ctx(|| "init terminal".to_string())?;

    let res = app::run(&mut terminal, Arc::new(gateway), theme, keymap);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
