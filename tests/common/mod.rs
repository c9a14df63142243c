//! Shared test doubles
//!
//! `ScriptedEngine` is a speech engine whose behavior per utterance is
//! decided by a closure, and which records what it was asked to do.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use talking_animals::speech::{EngineFailure, EngineKind, SpeechEngine, Utterance};

/// What the engine does with one utterance
#[derive(Debug, Clone)]
pub enum Script {
    Ok,
    Delay(Duration),
    Fail(&'static str),
    Interrupted,
}

type Behavior = Box<dyn Fn(&str) -> Script + Send + Sync>;

pub struct ScriptedEngine {
    kind: EngineKind,
    present: bool,
    behavior: Behavior,
    pub started: Mutex<Vec<Utterance>>,
    pub finished: Mutex<Vec<String>>,
    pub cancels: AtomicUsize,
}

impl ScriptedEngine {
    pub fn new(kind: EngineKind, behavior: impl Fn(&str) -> Script + Send + Sync + 'static) -> Self {
        Self {
            kind,
            present: true,
            behavior: Box::new(behavior),
            started: Mutex::new(Vec::new()),
            finished: Mutex::new(Vec::new()),
            cancels: AtomicUsize::new(0),
        }
    }

    /// Engine that completes every utterance at once
    pub fn ok(kind: EngineKind) -> Arc<Self> {
        Arc::new(Self::new(kind, |_| Script::Ok))
    }

    /// Engine that fails every utterance
    pub fn failing(kind: EngineKind, msg: &'static str) -> Arc<Self> {
        Arc::new(Self::new(kind, move |_| Script::Fail(msg)))
    }

    /// Engine reported as not installed
    pub fn absent(kind: EngineKind) -> Arc<Self> {
        let mut engine = Self::new(kind, |_| Script::Ok);
        engine.present = false;
        Arc::new(engine)
    }

    pub fn started_texts(&self) -> Vec<String> {
        self.started
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.text.clone())
            .collect()
    }

    pub fn finished_texts(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechEngine for ScriptedEngine {
    fn kind(&self) -> EngineKind {
        self.kind
    }

    async fn is_present(&self) -> bool {
        self.present
    }

    async fn speak(&self, utterance: &Utterance) -> Result<(), EngineFailure> {
        self.started.lock().unwrap().push(utterance.clone());

        match (self.behavior)(&utterance.text) {
            Script::Ok => {}
            Script::Delay(delay) => tokio::time::sleep(delay).await,
            Script::Fail(msg) => return Err(EngineFailure::Failed(msg.to_string())),
            Script::Interrupted => return Err(EngineFailure::Interrupted),
        }

        self.finished.lock().unwrap().push(utterance.text.clone());
        Ok(())
    }

    async fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }

    async fn supported_locales(&self) -> Result<Vec<String>, EngineFailure> {
        Ok(vec!["ru".to_string(), "en".to_string()])
    }
}
