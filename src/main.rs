//! Talking Animals - listen and learn animal sounds in the terminal
//!
//! # Usage
//!
//! ```bash
//! # Interactive app
//! talking-animals
//!
//! # One-shot commands
//! talking-animals animals --json
//! talking-animals say корова
//! talking-animals tts-info
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use talking_animals::ambient::{FilePrefs, MemoryPrefs, PreferenceStore};
use talking_animals::app::App;
use talking_animals::cli::{Cli, Command, ExitCode, Output};
use talking_animals::commands;
use talking_animals::config::Config;
use talking_animals::content::ContentProvider;
use talking_animals::controller::ViewController;
use talking_animals::models::Catalog;

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    if let Some(locale) = &cli.locale {
        config.locale = locale.clone();
    }

    if cli.is_cli_mode() {
        // One-shot command
        init_cli_logging();
        let exit_code = run_cli(cli, &config).await;
        std::process::exit(exit_code.into());
    } else {
        // Interactive app
        init_tui_logging();
        run_tui(config).await
    }
}

// =============================================================================
// Logging
// =============================================================================

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// CLI mode logs to stderr, warnings and up unless RUST_LOG says otherwise
fn init_cli_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// TUI mode logs to a file so the alternate screen stays clean
fn init_tui_logging() {
    let file = Config::log_path().and_then(|path| {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok()?;
        }
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    // No log file, no logs: stderr would draw over the UI
    if let Some(file) = file {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
            .init();
    }
}

// =============================================================================
// CLI Mode
// =============================================================================

/// Dispatch a subcommand to its handler
async fn run_cli(cli: Cli, config: &Config) -> ExitCode {
    let output = Output::new(&cli);

    match cli.command {
        Some(Command::Animals(cmd)) => commands::animals_cmd(cmd, config, &output).await,

        Some(Command::Say(cmd)) => commands::say_cmd(cmd, config, &output).await,

        Some(Command::Speak(cmd)) => commands::speak_cmd(cmd, config, &output).await,

        Some(Command::TtsInfo(cmd)) => commands::tts_info_cmd(cmd, config, &output).await,

        Some(Command::Theme(cmd)) => commands::theme_cmd(cmd, config, &output).await,

        None => {
            // Handled by is_cli_mode check
            ExitCode::Success
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Raw mode plus alternate screen
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Undo `init_terminal`
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(config: Config) -> Result<()> {
    tracing::info!("starting TUI, data source {}", config.data_source);

    let prefs: Box<dyn PreferenceStore> = match config.prefs_path() {
        Some(path) => Box::new(FilePrefs::open(path)),
        None => Box::new(MemoryPrefs::default()),
    };
    let speech = Arc::new(config.speech_service());
    let controller =
        ViewController::new(Catalog::default()).with_feedback_delay(config.feedback_delay());

    let mut app = App::new(speech, prefs)
        .with_controller(controller)
        .with_toast_ttl(config.toast_ttl());
    app.start_loading(ContentProvider::new(config.entity_source()));
    app.probe_speech();

    let mut terminal = init_terminal()?;

    let result = run_event_loop(&mut terminal, &mut app).await;

    app.shutdown().await;

    // Restore before surfacing a loop error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - handles input, applies background results, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    while app.running {
        terminal.draw(|frame| talking_animals::ui::render(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Windows also reports key releases
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        app.tick();
    }

    Ok(())
}
