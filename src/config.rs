//! Configuration management
//!
//! Config is stored at ~/.config/talking-animals/config.toml. Every field is
//! optional; missing or unreadable files fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::content::EntitySource;
use crate::speech::{ProcessEngine, SpeechService, DEFAULT_LOCALE, DEFAULT_RATE};

/// Environment override for the data source
pub const DATA_SOURCE_ENV: &str = "TALKING_ANIMALS_DATA";

const APP_DIR: &str = "talking-animals";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL, directory, or "embedded"
    pub data_source: String,
    /// BCP 47 locale for speech
    pub locale: String,
    /// Speech rate relative to normal
    pub speech_rate: f32,
    /// Pause after a quiz guess before moving on
    pub feedback_delay_ms: u64,
    /// How long toasts stay on screen
    pub toast_ttl_ms: u64,
    /// Primary synthesizer program
    pub native_command: String,
    /// Fallback speech-dispatcher client
    pub dispatcher_command: String,
    /// Where UI preferences (theme) are kept
    pub prefs_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source: "animals_data".to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            speech_rate: DEFAULT_RATE,
            feedback_delay_ms: 1500,
            toast_ttl_ms: 5000,
            native_command: "espeak-ng".to_string(),
            dispatcher_command: "spd-say".to_string(),
            prefs_path: None,
        }
    }
}

impl Config {
    /// Get config file path (~/.config/talking-animals/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join("config.toml"))
    }

    /// Log file for TUI mode (~/.cache/talking-animals/talking-animals.log)
    pub fn log_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|p| p.join(APP_DIR).join("talking-animals.log"))
    }

    /// Load config from the default path, or defaults if not found
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load config from a specific file, or defaults if unreadable
    pub fn load_from(path: &Path) -> Self {
        let mut config: Self = std::fs::read_to_string(path)
            .ok()
            .and_then(|s| match toml::from_str(&s) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!("ignoring malformed config {}: {}", path.display(), e);
                    None
                }
            })
            .unwrap_or_default();

        if let Ok(source) = std::env::var(DATA_SOURCE_ENV) {
            config.data_source = source;
        }
        config
    }

    /// Preference file: explicit path, else next to the config file
    pub fn prefs_path(&self) -> Option<PathBuf> {
        self.prefs_path.clone().or_else(|| {
            dirs::config_dir().map(|p| p.join(APP_DIR).join("prefs.toml"))
        })
    }

    pub fn entity_source(&self) -> EntitySource {
        EntitySource::parse(&self.data_source)
    }

    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }

    /// Speech service over the configured synthesizer programs
    pub fn speech_service(&self) -> SpeechService {
        SpeechService::new(vec![
            std::sync::Arc::new(ProcessEngine::native_with(&self.native_command)),
            std::sync::Arc::new(ProcessEngine::dispatcher_with(&self.dispatcher_command)),
        ])
        .with_locale(&self.locale)
        .with_rate(self.speech_rate)
    }
}
