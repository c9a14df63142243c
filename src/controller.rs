//! View controller
//!
//! Owns the active view and the quiz state machine. It is synchronous and
//! side-effect free: every user event yields a list of intents (speak,
//! notify, schedule a transition) that the app executes.
//!
//! Quiz phases:
//!
//! ```text
//! Idle ─▶ Presenting ─▶ AwaitingGuess ─▶ Feedback ─┬─▶ Presenting  (correct)
//!                             ▲                    │
//!                             └────────────────────┘               (incorrect)
//! ```
//!
//! Leaving the quiz from any phase tears the challenge down.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::models::{Catalog, ChallengeState, Feedback, Level, ViewState};
use crate::notify::Notification;
use crate::quiz::{generate_challenge, AFFIRMATION, RETRY_PHRASE};

/// Pause between a guess and the next step
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(1500);

// =============================================================================
// Events and Intents
// =============================================================================

/// Discrete user (or timer) events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ChooseLevel(Level),
    Back,
    /// An entity card was activated
    Select(String),
    /// Replay the current quiz prompt
    Repeat,
    /// Skip to a new quiz challenge
    Next,
    /// A scheduled feedback delay ran out
    FeedbackElapsed { ticket: u64 },
}

/// Side effects requested by the controller
#[derive(Debug, Clone)]
pub enum Intent {
    Speak(String),
    StopSpeech,
    Notify(Notification),
    /// Deliver `FeedbackElapsed { ticket }` after `delay` unless cancelled
    Schedule {
        ticket: u64,
        delay: Duration,
        token: CancellationToken,
    },
    Fullscreen(bool),
}

impl Intent {
    fn notify(err: AppError) -> Self {
        Intent::Notify(Notification::from(&err))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizPhase {
    #[default]
    Idle,
    Presenting,
    AwaitingGuess,
    Feedback,
}

/// Scheduled transition out of Feedback
#[derive(Debug)]
struct Pending {
    ticket: u64,
    token: CancellationToken,
    correct: bool,
}

// =============================================================================
// Controller
// =============================================================================

#[derive(Debug)]
pub struct ViewController {
    catalog: Catalog,
    view: ViewState,
    phase: QuizPhase,
    challenge: Option<ChallengeState>,
    pending: Option<Pending>,
    next_ticket: u64,
    feedback_delay: Duration,
    rng: StdRng,
}

impl ViewController {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_rng(catalog, StdRng::from_entropy())
    }

    /// Deterministic controller for tests and replays
    pub fn with_seed(catalog: Catalog, seed: u64) -> Self {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: Catalog, rng: StdRng) -> Self {
        Self {
            catalog,
            view: ViewState::Selection,
            phase: QuizPhase::Idle,
            challenge: None,
            pending: None,
            next_ticket: 0,
            feedback_delay: FEEDBACK_DELAY,
            rng,
        }
    }

    pub fn with_feedback_delay(mut self, delay: Duration) -> Self {
        self.feedback_delay = delay;
        self
    }

    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn challenge(&self) -> Option<&ChallengeState> {
        self.challenge.as_ref()
    }

    pub fn feedback(&self) -> Feedback {
        self.challenge
            .as_ref()
            .map(|c| c.feedback)
            .unwrap_or_default()
    }

    /// Whether quiz cards, repeat and next accept input
    pub fn options_enabled(&self) -> bool {
        self.view == ViewState::Quiz
            && self.phase == QuizPhase::AwaitingGuess
            && self.challenge.as_ref().is_some_and(|c| !c.locked)
    }

    /// Cards for the current view, in display order
    pub fn cards(&self) -> &[crate::models::Entity] {
        match self.view {
            ViewState::Selection => &[],
            ViewState::Explore => self.catalog.entities(),
            ViewState::Quiz => self
                .challenge
                .as_ref()
                .map(|c| c.options.as_slice())
                .unwrap_or(&[]),
        }
    }

    pub fn handle(&mut self, event: UiEvent) -> Vec<Intent> {
        let mut intents = Vec::new();

        match event {
            UiEvent::ChooseLevel(level) => {
                self.teardown();
                self.view = level.view();
                tracing::info!("entering {:?}", self.view);
                intents.push(Intent::Fullscreen(true));
                if level == Level::Quiz {
                    self.start_challenge(&mut intents);
                }
            }
            UiEvent::Back => {
                if self.view != ViewState::Selection {
                    self.teardown();
                    self.view = ViewState::Selection;
                    intents.push(Intent::StopSpeech);
                    intents.push(Intent::Fullscreen(false));
                }
            }
            UiEvent::Select(id) => match self.view {
                ViewState::Explore => {
                    if let Some(entity) = self.catalog.get(&id) {
                        intents.push(Intent::Speak(entity.prompt()));
                    }
                }
                ViewState::Quiz => self.guess(&id, &mut intents),
                ViewState::Selection => {}
            },
            UiEvent::Repeat => {
                if self.options_enabled() {
                    if let Some(challenge) = &self.challenge {
                        intents.push(Intent::Speak(challenge.target.prompt()));
                    }
                }
            }
            UiEvent::Next => {
                let idle = self.phase == QuizPhase::Idle;
                if self.view == ViewState::Quiz && (idle || self.options_enabled()) {
                    self.start_challenge(&mut intents);
                }
            }
            UiEvent::FeedbackElapsed { ticket } => self.feedback_elapsed(ticket, &mut intents),
        }

        intents
    }

    /// Idle/Feedback → Presenting → AwaitingGuess
    fn start_challenge(&mut self, intents: &mut Vec<Intent>) {
        self.phase = QuizPhase::Presenting;

        match generate_challenge(&self.catalog, &mut self.rng) {
            Ok(challenge) => {
                tracing::debug!(target_id = %challenge.target.id, "new challenge");
                intents.push(Intent::Speak(challenge.target.prompt()));
                self.challenge = Some(challenge);
                // Speech runs in the background; failures arrive as notifications
                self.phase = QuizPhase::AwaitingGuess;
            }
            Err(err) => {
                tracing::warn!("cannot start challenge: {}", err);
                self.challenge = None;
                self.phase = QuizPhase::Idle;
                intents.push(Intent::notify(err));
            }
        }
    }

    /// AwaitingGuess → Feedback
    fn guess(&mut self, id: &str, intents: &mut Vec<Intent>) {
        if self.phase != QuizPhase::AwaitingGuess {
            return;
        }
        let Some(challenge) = self.challenge.as_mut() else {
            return;
        };
        if challenge.locked || !challenge.options.iter().any(|e| e.id == id) {
            return;
        }

        challenge.locked = true;
        let correct = challenge.is_target(id);
        challenge.feedback = if correct {
            Feedback::Correct
        } else {
            Feedback::Incorrect
        };
        self.phase = QuizPhase::Feedback;

        intents.push(Intent::Speak(
            if correct { AFFIRMATION } else { RETRY_PHRASE }.to_string(),
        ));

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let token = CancellationToken::new();
        self.pending = Some(Pending {
            ticket,
            token: token.clone(),
            correct,
        });
        intents.push(Intent::Schedule {
            ticket,
            delay: self.feedback_delay,
            token,
        });
    }

    /// Feedback → Presenting (correct) or AwaitingGuess (incorrect)
    fn feedback_elapsed(&mut self, ticket: u64, intents: &mut Vec<Intent>) {
        let current = matches!(&self.pending, Some(p) if p.ticket == ticket && !p.token.is_cancelled());
        if !current || self.view != ViewState::Quiz || self.phase != QuizPhase::Feedback {
            tracing::debug!(ticket, "ignoring stale feedback timer");
            return;
        }

        let Some(pending) = self.pending.take() else {
            return;
        };

        if pending.correct {
            self.start_challenge(intents);
        } else if let Some(challenge) = self.challenge.as_mut() {
            challenge.locked = false;
            challenge.feedback = Feedback::None;
            self.phase = QuizPhase::AwaitingGuess;
            // Fire and forget; a failure only produces a notification
            intents.push(Intent::Speak(challenge.target.prompt()));
        }
    }

    /// Drop the challenge and any pending transition
    fn teardown(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.token.cancel();
        }
        self.challenge = None;
        self.phase = QuizPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entity;

    fn farm() -> Catalog {
        Catalog::new(vec![
            Entity::new("cow", "Cow", "🐄", "moo"),
            Entity::new("dog", "Dog", "🐕", "woof"),
            Entity::new("cat", "Cat", "🐱", "meow"),
            Entity::new("duck", "Duck", "🦆", "quack"),
        ])
    }

    fn speaks(intents: &[Intent]) -> Vec<String> {
        intents
            .iter()
            .filter_map(|i| match i {
                Intent::Speak(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn ticket_of(intents: &[Intent]) -> u64 {
        intents
            .iter()
            .find_map(|i| match i {
                Intent::Schedule { ticket, .. } => Some(*ticket),
                _ => None,
            })
            .expect("schedule intent")
    }

    #[test]
    fn test_explore_speaks_selected_entity() {
        let mut vc = ViewController::with_seed(farm(), 1);
        vc.handle(UiEvent::ChooseLevel(Level::Explore));
        assert_eq!(vc.view(), ViewState::Explore);
        assert_eq!(vc.cards().len(), 4);

        let intents = vc.handle(UiEvent::Select("dog".into()));
        assert_eq!(speaks(&intents), vec!["woof, Dog"]);

        assert!(vc.handle(UiEvent::Select("unicorn".into())).is_empty());
    }

    #[test]
    fn test_quiz_start_presents_and_awaits() {
        let mut vc = ViewController::with_seed(farm(), 3);
        let intents = vc.handle(UiEvent::ChooseLevel(Level::Quiz));

        assert_eq!(vc.phase(), QuizPhase::AwaitingGuess);
        let challenge = vc.challenge().unwrap();
        assert_eq!(speaks(&intents), vec![challenge.target.prompt()]);
        assert!(matches!(intents[0], Intent::Fullscreen(true)));
        assert!(vc.options_enabled());
    }

    #[test]
    fn test_double_guess_is_ignored() {
        let mut vc = ViewController::with_seed(farm(), 5);
        vc.handle(UiEvent::ChooseLevel(Level::Quiz));
        let target = vc.challenge().unwrap().target.id.clone();

        let first = vc.handle(UiEvent::Select(target.clone()));
        assert_eq!(speaks(&first), vec![AFFIRMATION]);

        let second = vc.handle(UiEvent::Select(target));
        assert!(second.is_empty());
        assert_eq!(vc.phase(), QuizPhase::Feedback);
    }

    #[test]
    fn test_repeat_and_next_blocked_during_feedback() {
        let mut vc = ViewController::with_seed(farm(), 9);
        vc.handle(UiEvent::ChooseLevel(Level::Quiz));
        let wrong = vc
            .challenge()
            .unwrap()
            .options
            .iter()
            .find(|e| e.id != vc.challenge().unwrap().target.id)
            .unwrap()
            .id
            .clone();
        vc.handle(UiEvent::Select(wrong));

        assert!(vc.handle(UiEvent::Repeat).is_empty());
        assert!(vc.handle(UiEvent::Next).is_empty());
    }

    #[test]
    fn test_stale_ticket_after_exit_is_ignored() {
        let mut vc = ViewController::with_seed(farm(), 11);
        vc.handle(UiEvent::ChooseLevel(Level::Quiz));
        let target = vc.challenge().unwrap().target.id.clone();
        let intents = vc.handle(UiEvent::Select(target));
        let ticket = ticket_of(&intents);
        let token = intents
            .iter()
            .find_map(|i| match i {
                Intent::Schedule { token, .. } => Some(token.clone()),
                _ => None,
            })
            .unwrap();

        vc.handle(UiEvent::Back);
        assert!(token.is_cancelled());
        assert!(vc.challenge().is_none());

        // Re-enter and make sure the old timer cannot advance the new round
        vc.handle(UiEvent::ChooseLevel(Level::Quiz));
        let before = vc.challenge().cloned();
        assert!(vc
            .handle(UiEvent::FeedbackElapsed { ticket })
            .is_empty());
        assert_eq!(vc.challenge().cloned(), before);
    }

    #[test]
    fn test_next_in_idle_retries_start() {
        let small = Catalog::new(vec![Entity::new("cow", "Cow", "🐄", "moo")]);
        let mut vc = ViewController::with_seed(small, 2);
        vc.handle(UiEvent::ChooseLevel(Level::Quiz));
        assert_eq!(vc.phase(), QuizPhase::Idle);

        vc.set_catalog(farm());
        vc.handle(UiEvent::Next);
        assert_eq!(vc.phase(), QuizPhase::AwaitingGuess);
    }

    #[test]
    fn test_back_from_selection_is_noop() {
        let mut vc = ViewController::with_seed(farm(), 0);
        assert!(vc.handle(UiEvent::Back).is_empty());
        assert_eq!(vc.view(), ViewState::Selection);
    }
}
