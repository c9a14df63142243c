//! Text-to-speech
//!
//! - Engine: the capability trait every synthesizer implements
//! - Service: ordered fallback chain with single-flight playback
//! - Process: engines backed by an external synthesizer (espeak-ng, spd-say)

pub mod process;
pub mod service;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub use process::ProcessEngine;
pub use service::{SpeechCapabilities, SpeechService, Ticket};

/// Default speaking locale
pub const DEFAULT_LOCALE: &str = "ru-RU";

/// Reduced rate for comprehension (fraction of the engine's normal rate)
pub const DEFAULT_RATE: f32 = 0.75;

/// Errors surfaced by the speech service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    #[error("no speech engine available")]
    NotSupported,

    #[error("{0}")]
    Engine(String),
}

/// Outcome of a single engine attempt that did not complete normally
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineFailure {
    /// Playback was cut short by a cancel; not an error for the caller
    #[error("interrupted")]
    Interrupted,

    #[error("{0}")]
    Failed(String),
}

/// Kinds of engines, in fallback order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Direct synthesizer with rate control
    Native,
    /// System speech service
    Dispatcher,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Native => write!(f, "native"),
            EngineKind::Dispatcher => write!(f, "dispatcher"),
        }
    }
}

/// What to say and how
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub locale: String,
    /// Fraction of normal rate; 1.0 is normal
    pub rate: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locale: locale.into(),
            rate: DEFAULT_RATE,
        }
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    /// Primary language subtag: "ru-RU" → "ru"
    pub fn language(&self) -> String {
        self.locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

/// A text-to-speech capability provider
///
/// `speak` resolves when playback ends. Dropping the returned future must
/// stop playback.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    fn kind(&self) -> EngineKind;

    /// Whether the engine can be used on this machine
    async fn is_present(&self) -> bool;

    async fn speak(&self, utterance: &Utterance) -> Result<(), EngineFailure>;

    /// Best-effort stop of anything this engine is playing
    async fn cancel(&self) {}

    /// Locales the engine reports; may fail
    async fn supported_locales(&self) -> Result<Vec<String>, EngineFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utterance_language() {
        assert_eq!(Utterance::new("x", "ru-RU").language(), "ru");
        assert_eq!(Utterance::new("x", "en_US").language(), "en");
        assert_eq!(Utterance::new("x", "de").language(), "de");
    }

    #[test]
    fn test_utterance_default_rate() {
        let u = Utterance::new("муууу, Корова", DEFAULT_LOCALE);
        assert!((u.rate - 0.75).abs() < f32::EPSILON);
        assert!((u.with_rate(1.0).rate - 1.0).abs() < f32::EPSILON);
    }
}
