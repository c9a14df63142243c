//! Talking Animals - listen and learn animal sounds in the terminal
//!
//! Two modes for young children: a "listen and discover" grid where every
//! card speaks its animal, and a "listen and guess" quiz.
//!
//! # Modules
//!
//! - `models` - Entities, catalog, view and quiz state
//! - `content` - Catalog loading with embedded fallback
//! - `speech` - Text-to-speech engine chain
//! - `quiz` - Challenge generation
//! - `controller` - View controller and quiz state machine
//! - `notify` - Toast notifications
//! - `ambient` - Theme and fullscreen controllers
//! - `ui` - TUI components
//! - `app` - Application state and event wiring
//! - `cli` / `commands` - Scriptable command-line mode

pub mod ambient;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod models;
pub mod notify;
pub mod quiz;
pub mod speech;
pub mod ui;

// Re-export commonly used types
pub use models::{Catalog, ChallengeState, Entity, EntityRecord, Feedback, Level, ViewState};

pub use ambient::{FullscreenController, ThemeController, ThemeMode};
pub use app::{App, AppEvent};
pub use content::{ContentProvider, EntitySource, LoadReport};
pub use controller::{Intent, QuizPhase, UiEvent, ViewController};
pub use error::AppError;
pub use notify::{Notification, Notifier};
pub use speech::{SpeechCapabilities, SpeechEngine, SpeechError, SpeechService};
