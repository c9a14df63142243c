//! External synthesizer engines
//!
//! Speaks by spawning a synthesizer process and waiting for it to exit.
//! espeak-ng is the native engine (direct synthesis, rate control);
//! speech-dispatcher's `spd-say` is the system-service fallback.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::OnceCell;

use super::{EngineFailure, EngineKind, SpeechEngine, Utterance};

/// espeak-ng's default speed in words per minute
const ESPEAK_NORMAL_WPM: f32 = 175.0;

/// Synthesizer driven through a child process
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    kind: EngineKind,
    program: String,
    /// Cached PATH lookup
    present: OnceCell<bool>,
}

impl ProcessEngine {
    /// espeak-ng from PATH
    pub fn native() -> Self {
        Self::native_with("espeak-ng")
    }

    /// Native engine with a custom binary
    pub fn native_with(program: impl Into<String>) -> Self {
        Self {
            kind: EngineKind::Native,
            program: program.into(),
            present: OnceCell::new(),
        }
    }

    /// spd-say from PATH
    pub fn dispatcher() -> Self {
        Self::dispatcher_with("spd-say")
    }

    /// Dispatcher engine with a custom binary
    pub fn dispatcher_with(program: impl Into<String>) -> Self {
        Self {
            kind: EngineKind::Dispatcher,
            program: program.into(),
            present: OnceCell::new(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Command-line arguments for an utterance; the text always follows `--`
    pub fn args(&self, utterance: &Utterance) -> Vec<String> {
        let lang = utterance.language();
        match self.kind {
            EngineKind::Native => {
                let wpm = (ESPEAK_NORMAL_WPM * utterance.rate).round().clamp(80.0, 450.0) as u32;
                vec![
                    "-v".into(),
                    lang,
                    "-s".into(),
                    wpm.to_string(),
                    "--".into(),
                    utterance.text.clone(),
                ]
            }
            EngineKind::Dispatcher => {
                // spd-say takes a relative rate in -100..=100
                let rate = ((utterance.rate - 1.0) * 100.0).round().clamp(-100.0, 100.0) as i32;
                vec![
                    "-w".into(),
                    "-l".into(),
                    lang,
                    "-r".into(),
                    rate.to_string(),
                    "--".into(),
                    utterance.text.clone(),
                ]
            }
        }
    }

    fn list_voices_arg(&self) -> &'static str {
        match self.kind {
            EngineKind::Native => "--voices",
            EngineKind::Dispatcher => "-L",
        }
    }
}

#[async_trait]
impl SpeechEngine for ProcessEngine {
    fn kind(&self) -> EngineKind {
        self.kind
    }

    async fn is_present(&self) -> bool {
        *self
            .present
            .get_or_init(|| async {
                if self.program.starts_with('/') {
                    return std::path::Path::new(&self.program).exists();
                }

                Command::new("which")
                    .arg(&self.program)
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .await
                    .map(|s| s.success())
                    .unwrap_or(false)
            })
            .await
    }

    async fn speak(&self, utterance: &Utterance) -> Result<(), EngineFailure> {
        let child = Command::new(&self.program)
            .args(self.args(utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EngineFailure::Failed(format!("'{}' not found", self.program))
                } else {
                    EngineFailure::Failed(format!("failed to start '{}': {}", self.program, e))
                }
            })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| EngineFailure::Failed(e.to_string()))?;

        if output.status.success() {
            return Ok(());
        }

        match output.status.code() {
            // Terminated by a signal: somebody stopped us
            None => Err(EngineFailure::Interrupted),
            Some(code) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                if stderr.is_empty() {
                    Err(EngineFailure::Failed(format!(
                        "'{}' exited with status {}",
                        self.program, code
                    )))
                } else {
                    Err(EngineFailure::Failed(stderr))
                }
            }
        }
    }

    async fn cancel(&self) {
        // spd-say hands text to a daemon, so killing our child is not enough
        if self.kind == EngineKind::Dispatcher {
            let result = Command::new(&self.program)
                .arg("-C")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await;
            if let Err(e) = result {
                tracing::debug!("{} cancel failed: {}", self.program, e);
            }
        }
    }

    async fn supported_locales(&self) -> Result<Vec<String>, EngineFailure> {
        let output = Command::new(&self.program)
            .arg(self.list_voices_arg())
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| EngineFailure::Failed(e.to_string()))?;

        if !output.status.success() {
            return Err(EngineFailure::Failed(format!(
                "'{} {}' failed",
                self.program,
                self.list_voices_arg()
            )));
        }

        Ok(parse_voice_languages(
            &String::from_utf8_lossy(&output.stdout),
            self.kind,
        ))
    }
}

/// Extract the language column from a voice listing
///
/// Both listings start with a header line. `espeak-ng --voices` puts the
/// language in the second column; `spd-say -L` puts it second to last
/// because voice names may contain spaces.
pub fn parse_voice_languages(listing: &str, kind: EngineKind) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for line in listing.lines().skip(1) {
        let mut columns = line.split_whitespace();
        let lang = match kind {
            EngineKind::Native => columns.nth(1),
            EngineKind::Dispatcher => columns.rev().nth(1),
        };
        if let Some(lang) = lang {
            if !languages.iter().any(|l| l == lang) {
                languages.push(lang.to_string());
            }
        }
    }
    languages
}
