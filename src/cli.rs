//! CLI - Command Line Interface for Talking Animals
//!
//! Every catalog and speech action is scriptable. All output is
//! JSON-parseable with `--json` (the default when stdout is not a TTY).
//!
//! # Examples
//!
//! ```bash
//! # List the catalog
//! talking-animals animals --json
//!
//! # Speak one animal's prompt
//! talking-animals say корова
//!
//! # Check which speech engine would be used
//! talking-animals tts-info
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes, stable for scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Catalog empty or animal unknown
    NoData = 3,
    /// Speech unsupported or engine failure
    SpeechFailed = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Talking Animals - listen and learn animal sounds in the terminal
///
/// With no subcommand the interactive app starts; subcommands are for scripts.
#[derive(Parser, Debug)]
#[command(
    name = "talking-animals",
    version,
    about = "Listen-and-discover and listen-and-guess animal sounds for kids",
    long_about = "A keyboard-driven terminal app for young children: browse animals \
                  and hear their sounds, or guess which animal is speaking.\n\n\
                  With no subcommand the interactive app starts.\n\
                  Subcommands print plain text, or JSON when piped.",
    after_help = "EXAMPLES:\n\
                  talking-animals                     Launch interactive TUI\n\
                  talking-animals animals --json      List the catalog\n\
                  talking-animals say корова          Speak one animal\n\
                  talking-animals theme toggle        Switch light/dark"
)]
pub struct Cli {
    /// Emit JSON (implied when stdout is not a terminal)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Only print results and errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Speech locale (BCP 47, e.g. ru-RU)
    #[arg(long, short = 'l', global = true)]
    pub locale: Option<String>,

    /// Omit to start the interactive app
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// A subcommand was given
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// JSON requested, or stdout is piped
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the catalog and list every animal
    #[command(visible_alias = "ls")]
    Animals(AnimalsCmd),

    /// Speak one animal's sound and name
    Say(SayCmd),

    /// Speak arbitrary text
    Speak(SpeakCmd),

    /// Show which speech engine is available
    #[command(name = "tts-info")]
    TtsInfo(TtsInfoCmd),

    /// Show or change the color theme
    Theme(ThemeCmd),
}

/// List animals
#[derive(Args, Debug)]
pub struct AnimalsCmd {
    /// Skip the data source and use the built-in table
    #[arg(long)]
    pub embedded: bool,
}

/// Speak an animal by id
#[derive(Args, Debug)]
pub struct SayCmd {
    /// Animal id (e.g. корова)
    #[arg(required = true)]
    pub id: String,
}

/// Speak free text
#[derive(Args, Debug)]
pub struct SpeakCmd {
    /// Text to speak
    #[arg(required = true)]
    pub text: String,
}

/// Speech capability probe
#[derive(Args, Debug)]
pub struct TtsInfoCmd {}

/// Theme preference
#[derive(Args, Debug)]
pub struct ThemeCmd {
    /// New theme; omit to print the current one
    #[arg(value_enum)]
    pub action: Option<ThemeAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

// =============================================================================
// Argument Validation
// =============================================================================

/// Validate an animal id (non-empty, no path separators)
pub fn validate_animal_id(id: &str) -> Result<&str, &'static str> {
    let id = id.trim();
    if id.is_empty() {
        Err("Animal id must not be empty")
    } else if id.contains(['/', '\\']) || id.contains("..") {
        Err("Animal id must not contain path separators")
    } else {
        Ok(id)
    }
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Envelope for every JSON result: `data` on success, `error` + `exit_code` on failure
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Failure envelope; carries no data
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Spoken text response
#[derive(Debug, Serialize, Deserialize)]
pub struct SpokenResponse {
    pub status: String,
    pub text: String,
    pub locale: String,
}

/// Theme response
#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub theme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefs_path: Option<String>,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Writes command results in human or JSON form
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a human-readable line (non-JSON mode only)
    pub fn line(&self, msg: impl std::fmt::Display) {
        if !self.json {
            println!("{}", msg);
        }
    }

    /// Report a failure on stderr and hand back its exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Progress chatter on stderr; silent with --quiet or --json
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from(["talking-animals"]);
        assert!(!cli.is_cli_mode());
    }

    #[test]
    fn test_say_command() {
        let cli = Cli::parse_from(["talking-animals", "say", "корова"]);
        match cli.command {
            Some(Command::Say(cmd)) => assert_eq!(cmd.id, "корова"),
            other => panic!("Expected Say command, got {:?}", other),
        }
    }

    #[test]
    fn test_ls_alias() {
        let cli = Cli::parse_from(["talking-animals", "ls", "--embedded"]);
        match cli.command {
            Some(Command::Animals(cmd)) => assert!(cmd.embedded),
            other => panic!("Expected Animals command, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["talking-animals", "tts-info", "-j", "-l", "en-US"]);
        assert!(cli.json);
        assert_eq!(cli.locale.as_deref(), Some("en-US"));
        assert!(matches!(cli.command, Some(Command::TtsInfo(_))));
    }

    #[test]
    fn test_theme_action() {
        let cli = Cli::parse_from(["talking-animals", "theme", "toggle"]);
        match cli.command {
            Some(Command::Theme(cmd)) => assert_eq!(cmd.action, Some(ThemeAction::Toggle)),
            other => panic!("Expected Theme command, got {:?}", other),
        }

        let cli = Cli::parse_from(["talking-animals", "theme"]);
        match cli.command {
            Some(Command::Theme(cmd)) => assert!(cmd.action.is_none()),
            other => panic!("Expected Theme command, got {:?}", other),
        }
    }

    #[test]
    fn test_theme_rejects_unknown_value() {
        assert!(Cli::try_parse_from(["talking-animals", "theme", "sepia"]).is_err());
    }

    #[test]
    fn test_validate_animal_id() {
        assert_eq!(validate_animal_id(" кот "), Ok("кот"));
        assert!(validate_animal_id("").is_err());
        assert!(validate_animal_id("../etc/passwd").is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NoData), 3);
        assert_eq!(i32::from(ExitCode::SpeechFailed), 4);
    }

    #[test]
    fn test_json_error_envelope() {
        let out = JsonOutput::<()>::error_msg("boom", ExitCode::NoData);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["error"], "boom");
        assert_eq!(json["exit_code"], 3);
        assert!(json.get("data").is_none());
    }
}
