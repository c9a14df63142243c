//! Application-level error taxonomy
//!
//! None of these are fatal. Each one is caught where it happens and turned
//! into an auto-dismissing notification.

use thiserror::Error;

use crate::speech::SpeechError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// An entity could not be loaded from any source; it is dropped
    #[error("No data available for '{id}'")]
    DataUnavailable { id: String },

    /// Catalog too small for quiz mode
    #[error("Quiz needs at least {required} animals, only {available} loaded")]
    InsufficientData { available: usize, required: usize },

    /// No speech engine present at all
    #[error("Speech synthesis is not supported")]
    SpeechUnsupported,

    /// An engine failed with something other than an interruption
    #[error("Speech playback failed: {0}")]
    SpeechEngineError(String),
}

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::NotSupported => AppError::SpeechUnsupported,
            SpeechError::Engine(msg) => AppError::SpeechEngineError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_error_conversion() {
        assert_eq!(
            AppError::from(SpeechError::NotSupported),
            AppError::SpeechUnsupported
        );
        assert_eq!(
            AppError::from(SpeechError::Engine("audio device busy".into())),
            AppError::SpeechEngineError("audio device busy".into())
        );
    }

    #[test]
    fn test_insufficient_data_message() {
        let err = AppError::InsufficientData {
            available: 3,
            required: 4,
        };
        assert_eq!(
            err.to_string(),
            "Quiz needs at least 4 animals, only 3 loaded"
        );
    }
}
