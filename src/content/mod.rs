//! Animal catalog loading
//!
//! - Provider: per-entity fetch (HTTP or directory) with ordered assembly
//! - Fallback: embedded table used when a source file is unavailable

pub mod fallback;
pub mod provider;

pub use fallback::{fallback_record, ANIMAL_IDS};
pub use provider::{ContentProvider, EntitySource, FetchError, LoadReport};
