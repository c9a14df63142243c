//! Speech service
//!
//! Tries engines in order until one plays the utterance. Playback is
//! single-flight: a new `speak` cancels the one in progress, and the
//! superseded call resolves `Ok` instead of queueing behind the new one.
//!
//! Requests are ordered by `Ticket`, taken synchronously when the request is
//! made. Spawned tasks may reach the service in any order; a request older
//! than the one already applied is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::{
    EngineFailure, EngineKind, ProcessEngine, SpeechEngine, SpeechError, Utterance,
    DEFAULT_LOCALE, DEFAULT_RATE,
};

/// Result of the capability probe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechCapabilities {
    pub available: bool,
    pub engine: Option<EngineKind>,
    pub supported_locales: Vec<String>,
}

impl SpeechCapabilities {
    pub fn unavailable() -> Self {
        Self {
            available: false,
            engine: None,
            supported_locales: Vec::new(),
        }
    }
}

/// Issue order of a speak or stop request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Newest applied request and the token of its utterance
#[derive(Debug)]
struct Playback {
    ticket: Ticket,
    token: CancellationToken,
}

/// Ordered engine chain with single-flight playback
pub struct SpeechService {
    engines: Vec<Arc<dyn SpeechEngine>>,
    locale: String,
    rate: f32,
    issued: AtomicU64,
    current: Mutex<Playback>,
}

impl SpeechService {
    /// Service over an explicit engine chain, tried front to back
    pub fn new(engines: Vec<Arc<dyn SpeechEngine>>) -> Self {
        Self {
            engines,
            locale: DEFAULT_LOCALE.to_string(),
            rate: DEFAULT_RATE,
            issued: AtomicU64::new(0),
            current: Mutex::new(Playback {
                ticket: Ticket(0),
                token: CancellationToken::new(),
            }),
        }
    }

    /// espeak-ng, then spd-say
    pub fn system() -> Self {
        Self::new(vec![
            Arc::new(ProcessEngine::native()),
            Arc::new(ProcessEngine::dispatcher()),
        ])
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Reserve the next position in request order
    pub fn ticket(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Speak in the default locale
    pub async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let ticket = self.ticket();
        self.play(ticket, text, &self.locale).await
    }

    /// Speak in the default locale, ordered by a ticket taken earlier
    pub async fn speak_as(&self, ticket: Ticket, text: &str) -> Result<(), SpeechError> {
        self.play(ticket, text, &self.locale).await
    }

    /// Speak `text`, superseding whatever is playing
    ///
    /// Resolves when playback finishes, when it is interrupted, or when a
    /// newer `speak`/`stop` supersedes it.
    pub async fn speak_in(&self, text: &str, locale: &str) -> Result<(), SpeechError> {
        let ticket = self.ticket();
        self.play(ticket, text, locale).await
    }

    async fn play(&self, ticket: Ticket, text: &str, locale: &str) -> Result<(), SpeechError> {
        let token = {
            let mut current = self.current.lock().await;
            if ticket < current.ticket {
                tracing::debug!(?ticket, "dropping stale speak: {}", text);
                return Ok(());
            }
            current.token.cancel();
            self.cancel_engines().await;
            let token = CancellationToken::new();
            *current = Playback {
                ticket,
                token: token.clone(),
            };
            token
        };

        let utterance = Utterance::new(text, locale).with_rate(self.rate);
        tracing::debug!(locale, "speak: {}", text);

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("superseded: {}", text);
                Ok(())
            }
            result = self.run_chain(&utterance) => result,
        }
    }

    /// Stop playback on every engine. Never fails.
    pub async fn stop(&self) {
        let ticket = self.ticket();
        self.stop_as(ticket).await;
    }

    /// Stop, unless a newer request has already been applied
    pub async fn stop_as(&self, ticket: Ticket) {
        let mut current = self.current.lock().await;
        if ticket < current.ticket {
            tracing::debug!(?ticket, "dropping stale stop");
            return;
        }
        current.token.cancel();
        current.ticket = ticket;
        self.cancel_engines().await;
    }

    /// Probe which engine would be used, without speaking
    pub async fn query_capabilities(&self) -> SpeechCapabilities {
        for engine in &self.engines {
            if !engine.is_present().await {
                continue;
            }

            let supported_locales = match engine.supported_locales().await {
                Ok(locales) if !locales.is_empty() => locales,
                Ok(_) => vec![self.locale.clone()],
                Err(e) => {
                    tracing::warn!(engine = %engine.kind(), "locale probe failed: {}", e);
                    vec![self.locale.clone()]
                }
            };

            return SpeechCapabilities {
                available: true,
                engine: Some(engine.kind()),
                supported_locales,
            };
        }

        SpeechCapabilities::unavailable()
    }

    async fn run_chain(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        let mut last_failure: Option<String> = None;

        for engine in &self.engines {
            if !engine.is_present().await {
                continue;
            }

            // The reduced rate is for the native synthesizer; the system
            // service keeps its own default
            let attempt = match engine.kind() {
                EngineKind::Native => utterance.clone(),
                EngineKind::Dispatcher => utterance.clone().with_rate(1.0),
            };

            match engine.speak(&attempt).await {
                Ok(()) => return Ok(()),
                Err(EngineFailure::Interrupted) => {
                    tracing::debug!(engine = %engine.kind(), "utterance interrupted");
                    return Ok(());
                }
                Err(EngineFailure::Failed(msg)) => {
                    tracing::warn!(engine = %engine.kind(), "speech failed, trying next engine: {}", msg);
                    last_failure = Some(msg);
                }
            }
        }

        match last_failure {
            Some(msg) => Err(SpeechError::Engine(msg)),
            None => Err(SpeechError::NotSupported),
        }
    }

    async fn cancel_engines(&self) {
        for engine in &self.engines {
            if engine.is_present().await {
                engine.cancel().await;
            }
        }
    }
}

impl Default for SpeechService {
    fn default() -> Self {
        Self::system()
    }
}
