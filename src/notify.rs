//! Toast notifications
//!
//! Transient, auto-dismissing messages for user-visible errors and status.

use std::time::{Duration, Instant};

use crate::error::AppError;

/// Default time a toast stays on screen
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

/// Most toasts kept at once; older ones are dropped first
const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Default,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

impl From<&AppError> for Notification {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::DataUnavailable { id } => Notification::error(
                "Ошибка загрузки",
                format!("Не удалось загрузить данные: {}", id),
            ),
            AppError::InsufficientData { .. } => {
                Notification::error("Мало данных", "Недостаточно животных для викторины.")
            }
            AppError::SpeechUnsupported => Notification::error(
                "Ошибка TTS",
                "Синтез речи не поддерживается на этом устройстве.",
            ),
            AppError::SpeechEngineError(msg) => {
                Notification::error("Ошибка TTS", format!("Ошибка воспроизведения: {}", msg))
            }
        }
    }
}

impl From<AppError> for Notification {
    fn from(err: AppError) -> Self {
        Notification::from(&err)
    }
}

/// A notification currently on screen
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
    pub shown_at: Instant,
}

/// Live toast stack with time-based dismissal
#[derive(Debug)]
pub struct Notifier {
    toasts: Vec<Toast>,
    ttl: Duration,
    next_id: u64,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            ttl,
            next_id: 0,
        }
    }

    /// Show a notification, returns its toast id
    pub fn push(&mut self, notification: impl Into<Notification>) -> u64 {
        self.push_at(notification, Instant::now())
    }

    pub fn push_at(&mut self, notification: impl Into<Notification>, now: Instant) -> u64 {
        let notification = notification.into();
        tracing::debug!(title = %notification.title, "toast: {}", notification.description);

        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            notification,
            shown_at: now,
        });
        if self.toasts.len() > MAX_VISIBLE {
            self.toasts.remove(0);
        }
        id
    }

    /// Drop toasts older than the TTL
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.toasts
            .retain(|t| now.saturating_duration_since(t.shown_at) < ttl);
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
