//! App state and core application logic
//!
//! Wires the view controller to the outside world: executes its intents
//! (speech, timers, toasts, fullscreen), receives background results over a
//! channel, and maps keyboard input to user events.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::ambient::{
    FocusModeHost, FullscreenController, FullscreenHost, PreferenceStore, ThemeController,
};
use crate::content::{ContentProvider, LoadReport};
use crate::controller::{Intent, QuizPhase, UiEvent, ViewController};
use crate::error::AppError;
use crate::models::{Catalog, Level, ViewState};
use crate::notify::{Notification, Notifier, DEFAULT_TTL};
use crate::speech::{SpeechCapabilities, SpeechService};

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for the catalog
#[derive(Debug, Clone, PartialEq)]
pub enum LoadingState {
    /// Idle - no loading in progress
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
}

impl Default for LoadingState {
    fn default() -> Self {
        LoadingState::Loading(None)
    }
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Grid Cursor
// =============================================================================

/// Cursor over a grid of cards laid out row by row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    /// Currently selected index
    pub selected: usize,
    /// Total number of cards
    pub len: usize,
    /// Cards per row
    pub columns: usize,
}

impl Default for GridState {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

impl GridState {
    pub fn new(len: usize, columns: usize) -> Self {
        Self {
            selected: 0,
            len,
            columns: columns.max(1),
        }
    }

    pub fn left(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn right(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Move one row up, staying put on the first row
    pub fn up(&mut self) {
        if self.selected >= self.columns {
            self.selected -= self.columns;
        }
    }

    /// Move one row down, clamping to the last card
    pub fn down(&mut self) {
        if self.len > 0 && self.selected + self.columns < self.len {
            self.selected += self.columns;
        } else if self.len > 0 && self.row_of(self.selected) < self.row_of(self.len - 1) {
            self.selected = self.len - 1;
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Replace the card set, resetting the cursor
    pub fn reset(&mut self, len: usize, columns: usize) {
        *self = Self::new(len, columns);
    }

    pub fn row_of(&self, index: usize) -> usize {
        index / self.columns
    }

    pub fn rows(&self) -> usize {
        self.len.div_ceil(self.columns)
    }
}

// =============================================================================
// Background Events
// =============================================================================

/// Results delivered to the event loop by background tasks
#[derive(Debug)]
pub enum AppEvent {
    CatalogLoaded(Catalog, LoadReport),
    Capabilities(SpeechCapabilities),
    SpeechFailed(AppError),
    FeedbackElapsed(u64),
    FullscreenChanged(bool),
}

// =============================================================================
// Main Application State
// =============================================================================

/// Cards per row in the explore grid
pub const EXPLORE_COLUMNS: usize = 5;

/// Cards per row in the quiz (2x2)
pub const QUIZ_COLUMNS: usize = 2;

pub struct App {
    /// Whether the app is running
    pub running: bool,
    pub loading: LoadingState,
    pub controller: ViewController,
    pub notifier: Notifier,
    pub theme: ThemeController,
    pub fullscreen: FullscreenController,
    /// Card cursor for the active view
    pub grid: GridState,
    /// Highlighted level button on the selection screen
    pub level_cursor: Level,
    speech: Arc<SpeechService>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    /// Create an app with a terminal focus-mode fullscreen host
    pub fn new(speech: Arc<SpeechService>, prefs: Box<dyn PreferenceStore>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let notify_tx = events_tx.clone();
        let host = FocusModeHost::new(move |active| {
            let _ = notify_tx.send(AppEvent::FullscreenChanged(active));
        });
        Self::with_parts(speech, prefs, Box::new(host), events_tx, events_rx)
    }

    /// Create an app around an arbitrary fullscreen host
    pub fn with_host(
        speech: Arc<SpeechService>,
        prefs: Box<dyn PreferenceStore>,
        host: Box<dyn FullscreenHost>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self::with_parts(speech, prefs, host, events_tx, events_rx)
    }

    fn with_parts(
        speech: Arc<SpeechService>,
        prefs: Box<dyn PreferenceStore>,
        host: Box<dyn FullscreenHost>,
        events_tx: UnboundedSender<AppEvent>,
        events_rx: UnboundedReceiver<AppEvent>,
    ) -> Self {
        Self {
            running: true,
            loading: LoadingState::Loading(Some("Загружаем животных...".into())),
            controller: ViewController::new(Catalog::default()),
            notifier: Notifier::new(DEFAULT_TTL),
            theme: ThemeController::init(prefs),
            fullscreen: FullscreenController::init(host),
            grid: GridState::default(),
            level_cursor: Level::Explore,
            speech,
            events_tx,
            events_rx,
        }
    }

    /// Replace the view controller (seeded RNG, custom delay)
    pub fn with_controller(mut self, controller: ViewController) -> Self {
        self.controller = controller;
        self
    }

    pub fn with_toast_ttl(mut self, ttl: Duration) -> Self {
        self.notifier = Notifier::new(ttl);
        self
    }

    pub fn view(&self) -> ViewState {
        self.controller.view()
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    // -------------------------------------------------------------------------
    // Startup
    // -------------------------------------------------------------------------

    /// Load the catalog in the background
    pub fn start_loading(&mut self, provider: ContentProvider) {
        self.loading = LoadingState::Loading(Some("Загружаем животных...".into()));
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let (catalog, report) = provider.load_catalog_with_report().await;
            let _ = tx.send(AppEvent::CatalogLoaded(catalog, report));
        });
    }

    /// Probe speech engines in the background
    pub fn probe_speech(&self) {
        let speech = self.speech.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let caps = speech.query_capabilities().await;
            let _ = tx.send(AppEvent::Capabilities(caps));
        });
    }

    /// Install a catalog and report load problems
    pub fn set_catalog(&mut self, catalog: Catalog, report: &LoadReport) {
        self.loading = LoadingState::Idle;

        if catalog.is_empty() {
            self.notifier.push(Notification::error(
                "Ошибка загрузки",
                "Не удалось загрузить данные животных",
            ));
        } else {
            for err in report.errors() {
                self.notifier.push(err);
            }
        }

        self.controller.set_catalog(catalog);
        self.sync_grid();
    }

    // -------------------------------------------------------------------------
    // Event Processing
    // -------------------------------------------------------------------------

    /// Feed a user event to the controller and execute its intents
    pub fn dispatch(&mut self, event: UiEvent) {
        let before = (self.controller.view(), self.controller.challenge().cloned());
        let intents = self.controller.handle(event);
        self.perform(intents);

        let after = (self.controller.view(), self.controller.challenge().cloned());
        let same_cards = before.0 == after.0
            && before.1.as_ref().map(|c| &c.options) == after.1.as_ref().map(|c| &c.options);
        if !same_cards {
            self.sync_grid();
        }
    }

    fn perform(&mut self, intents: Vec<Intent>) {
        for intent in intents {
            match intent {
                // Tickets are taken here, in dispatch order, not in the tasks
                Intent::Speak(text) => {
                    let ticket = self.speech.ticket();
                    let speech = self.speech.clone();
                    let tx = self.events_tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = speech.speak_as(ticket, &text).await {
                            tracing::warn!("speech failed: {}", e);
                            let _ = tx.send(AppEvent::SpeechFailed(e.into()));
                        }
                    });
                }
                Intent::StopSpeech => {
                    let ticket = self.speech.ticket();
                    let speech = self.speech.clone();
                    tokio::spawn(async move { speech.stop_as(ticket).await });
                }
                Intent::Notify(notification) => {
                    self.notifier.push(notification);
                }
                Intent::Schedule {
                    ticket,
                    delay,
                    token,
                } => {
                    let tx = self.events_tx.clone();
                    tokio::spawn(async move {
                        tokio::select! {
                            _ = token.cancelled() => {}
                            _ = tokio::time::sleep(delay) => {
                                let _ = tx.send(AppEvent::FeedbackElapsed(ticket));
                            }
                        }
                    });
                }
                Intent::Fullscreen(enter) => self.fullscreen.request(enter),
            }
        }
    }

    /// Apply one background result
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CatalogLoaded(catalog, report) => self.set_catalog(catalog, &report),
            AppEvent::Capabilities(caps) => {
                tracing::info!(?caps, "speech capabilities");
                if caps.available {
                    let engine = caps.engine.map(|k| k.to_string()).unwrap_or_default();
                    self.notifier.push(Notification::info(
                        "TTS готов",
                        format!("Используется {}", engine),
                    ));
                } else {
                    self.notifier.push(Notification::error(
                        "TTS недоступен",
                        "Синтез речи не поддерживается",
                    ));
                }
            }
            AppEvent::SpeechFailed(err) => {
                self.notifier.push(err);
            }
            AppEvent::FeedbackElapsed(ticket) => {
                self.dispatch(UiEvent::FeedbackElapsed { ticket });
            }
            AppEvent::FullscreenChanged(_) => self.fullscreen.on_change(),
        }
    }

    /// Drain pending background results without blocking
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Wait for the next background result and apply it
    pub async fn next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Periodic housekeeping: expire toasts, apply background results
    pub fn tick(&mut self) {
        self.process_events();
        self.notifier.prune(Instant::now());
    }

    /// Stop speech and leave fullscreen before exiting
    pub async fn shutdown(&mut self) {
        self.speech.stop().await;
        self.fullscreen.teardown();
    }

    fn sync_grid(&mut self) {
        let columns = match self.controller.view() {
            ViewState::Quiz => QUIZ_COLUMNS,
            _ => EXPLORE_COLUMNS,
        };
        self.grid.reset(self.controller.cards().len(), columns);
    }

    fn selected_card_id(&self) -> Option<String> {
        self.controller
            .cards()
            .get(self.grid.selected)
            .map(|e| e.id.clone())
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Global quit shortcut (Ctrl+C or q)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return true;
            }
            KeyCode::Char('t') => {
                let mode = self.theme.toggle();
                tracing::info!("theme: {}", mode);
                return true;
            }
            KeyCode::Char('x') => {
                if let Some(id) = self.notifier.visible().last().map(|t| t.id) {
                    self.notifier.dismiss(id);
                    return true;
                }
            }
            _ => {}
        }

        match self.controller.view() {
            ViewState::Selection => self.handle_selection_key(key),
            ViewState::Explore => self.handle_explore_key(key),
            ViewState::Quiz => self.handle_quiz_key(key),
        }
    }

    fn choose_level(&mut self, level: Level) -> bool {
        // Nothing to show until the catalog arrives
        if self.loading.is_loading() {
            return false;
        }
        self.level_cursor = level;
        self.dispatch(UiEvent::ChooseLevel(level));
        true
    }

    fn handle_selection_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('1') => self.choose_level(Level::Explore),
            KeyCode::Char('2') => self.choose_level(Level::Quiz),
            KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => {
                self.level_cursor = Level::Explore;
                true
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') => {
                self.level_cursor = Level::Quiz;
                true
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.choose_level(self.level_cursor),
            _ => false,
        }
    }

    /// Cursor movement shared by both card views
    fn handle_grid_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.grid.left(),
            KeyCode::Right | KeyCode::Char('l') => self.grid.right(),
            KeyCode::Up | KeyCode::Char('k') => self.grid.up(),
            KeyCode::Down | KeyCode::Char('j') => self.grid.down(),
            KeyCode::Home => self.grid.first(),
            KeyCode::End => self.grid.last(),
            _ => return false,
        }
        true
    }

    fn handle_level_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => {
                self.dispatch(UiEvent::Back);
                true
            }
            KeyCode::Char('f') => {
                self.fullscreen.toggle();
                true
            }
            _ => self.handle_grid_key(key),
        }
    }

    fn handle_explore_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_card_id() {
                    self.dispatch(UiEvent::Select(id));
                }
                true
            }
            _ => self.handle_level_key(key),
        }
    }

    fn handle_quiz_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_card_id() {
                    self.dispatch(UiEvent::Select(id));
                }
                true
            }
            KeyCode::Char(c @ '1'..='4') => {
                // Quick pick by option number
                let idx = (c as usize) - ('1' as usize);
                if let Some(id) = self.controller.cards().get(idx).map(|e| e.id.clone()) {
                    self.grid.selected = idx;
                    self.dispatch(UiEvent::Select(id));
                }
                true
            }
            KeyCode::Char('r') => {
                self.dispatch(UiEvent::Repeat);
                true
            }
            KeyCode::Char('n') => {
                self.dispatch(UiEvent::Next);
                true
            }
            _ => self.handle_level_key(key),
        }
    }

    /// Whether quiz cards currently accept guesses
    pub fn quiz_locked(&self) -> bool {
        self.controller.view() == ViewState::Quiz && !self.controller.options_enabled()
    }

    pub fn quiz_phase(&self) -> QuizPhase {
        self.controller.phase()
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("running", &self.running)
            .field("view", &self.controller.view())
            .field("phase", &self.controller.phase())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
