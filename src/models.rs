//! Data structures and types for Talking Animals
//!
//! Shared models used across the application, organized by domain:
//! - **Catalog**: animal records and the ordered, id-unique catalog
//! - **Quiz**: challenge state, feedback and view state

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Catalog Models
// =============================================================================

/// Wire shape of a single entity source file (`<id>.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Emoji or image reference
    pub image_url: String,
    /// How the animal sounds ("муууу")
    pub sound_text: String,
}

/// One learnable animal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identifier, also used to derive the source file path
    pub id: String,
    /// Display name (id with an upper-cased first letter)
    pub name: String,
    /// Emoji or image reference
    pub icon: String,
    /// Sound description spoken before the name
    pub sound: String,
}

impl Entity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        sound: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            sound: sound.into(),
        }
    }

    /// Build an entity from its id and a loaded record
    pub fn from_record(id: &str, record: EntityRecord) -> Self {
        Self {
            id: id.to_string(),
            name: capitalize_first(id),
            icon: record.image_url,
            sound: record.sound_text,
        }
    }

    /// The spoken prompt: sound first, then the name
    pub fn prompt(&self) -> String {
        format!("{}, {}", self.sound, self.name)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon, self.name)
    }
}

/// Upper-case the first character, Unicode aware ("ёжик" → "Ёжик")
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ordered collection of entities, unique by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    entities: Vec<Entity>,
}

impl Catalog {
    /// Quiz mode needs a target plus three distinct distractors
    pub const MIN_QUIZ_SIZE: usize = 4;

    /// Build a catalog, keeping the first occurrence of each id
    pub fn new(entities: Vec<Entity>) -> Self {
        let mut unique: Vec<Entity> = Vec::with_capacity(entities.len());
        for entity in entities {
            if !unique.iter().any(|e| e.id == entity.id) {
                unique.push(entity);
            }
        }
        Self { entities: unique }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn supports_quiz(&self) -> bool {
        self.len() >= Self::MIN_QUIZ_SIZE
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

// =============================================================================
// View / Quiz Models
// =============================================================================

/// Which screen is active. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    /// Level selection
    #[default]
    Selection,
    /// Listen and discover grid
    Explore,
    /// Listen and guess quiz
    Quiz,
}

/// The two interaction modes offered on the selection screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Explore,
    Quiz,
}

impl Level {
    pub fn view(self) -> ViewState {
        match self {
            Level::Explore => ViewState::Explore,
            Level::Quiz => ViewState::Quiz,
        }
    }
}

/// Feedback shown after a guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    #[default]
    None,
    Correct,
    Incorrect,
}

impl Feedback {
    /// Banner text for the quiz screen
    pub fn banner(&self) -> Option<&'static str> {
        match self {
            Feedback::None => None,
            Feedback::Correct => Some("Молодец!!! 🎉"),
            Feedback::Incorrect => Some("Попробуй ещё 🤔"),
        }
    }
}

/// One quiz round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeState {
    /// The animal whose sound was played
    pub target: Entity,
    /// Four options: the target plus three distinct distractors, shuffled
    pub options: Vec<Entity>,
    /// Set once a guess is submitted; further guesses are ignored
    pub locked: bool,
    pub feedback: Feedback,
}

impl ChallengeState {
    pub fn new(target: Entity, options: Vec<Entity>) -> Self {
        Self {
            target,
            options,
            locked: false,
            feedback: Feedback::None,
        }
    }

    pub fn is_target(&self, id: &str) -> bool {
        self.target.id == id
    }
}
