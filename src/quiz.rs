//! Quiz challenge generation
//!
//! A challenge is a uniformly chosen target plus three distinct distractors
//! sampled from the rest of the catalog, presented in random order.

use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;

use crate::error::AppError;
use crate::models::{Catalog, ChallengeState};

/// Options shown per challenge
pub const OPTION_COUNT: usize = 4;

/// Spoken after a correct guess
pub const AFFIRMATION: &str = "Молодец!!!";

/// Spoken after a wrong guess
pub const RETRY_PHRASE: &str = "Попробуй ещё";

/// Build a fresh challenge from the catalog
///
/// Fails with `InsufficientData` when fewer than four distinct entities are
/// available.
pub fn generate_challenge<R: Rng + ?Sized>(
    catalog: &Catalog,
    rng: &mut R,
) -> Result<ChallengeState, AppError> {
    let insufficient = || AppError::InsufficientData {
        available: catalog.len(),
        required: Catalog::MIN_QUIZ_SIZE,
    };

    if !catalog.supports_quiz() {
        return Err(insufficient());
    }

    let target = catalog
        .entities()
        .choose(rng)
        .cloned()
        .ok_or_else(insufficient)?;

    // Reservoir sampling over everything but the target: one pass, unbiased
    // with respect to catalog order
    let distractors = catalog
        .iter()
        .filter(|e| e.id != target.id)
        .choose_multiple(rng, OPTION_COUNT - 1);
    if distractors.len() < OPTION_COUNT - 1 {
        return Err(insufficient());
    }

    let mut options = Vec::with_capacity(OPTION_COUNT);
    options.push(target.clone());
    options.extend(distractors.into_iter().cloned());
    options.shuffle(rng);

    Ok(ChallengeState::new(target, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entity;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog(ids: &[&str]) -> Catalog {
        Catalog::new(
            ids.iter()
                .map(|id| Entity::new(*id, *id, "?", format!("{} sound", id)))
                .collect(),
        )
    }

    #[test]
    fn test_refuses_small_catalog() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate_challenge(&catalog(&["a", "b", "c"]), &mut rng).unwrap_err();
        assert_eq!(
            err,
            AppError::InsufficientData {
                available: 3,
                required: 4
            }
        );
    }

    #[test]
    fn test_exactly_four_uses_whole_catalog() {
        let mut rng = StdRng::seed_from_u64(7);
        let cat = catalog(&["cow", "dog", "cat", "duck"]);
        for _ in 0..50 {
            let challenge = generate_challenge(&cat, &mut rng).unwrap();
            let mut ids: Vec<_> = challenge.options.iter().map(|e| e.id.as_str()).collect();
            ids.sort();
            assert_eq!(ids, vec!["cat", "cow", "dog", "duck"]);
        }
    }

    #[test]
    fn test_options_distinct_and_contain_target_once() {
        let mut rng = StdRng::seed_from_u64(42);
        let cat = catalog(&["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]);
        for _ in 0..200 {
            let challenge = generate_challenge(&cat, &mut rng).unwrap();
            assert_eq!(challenge.options.len(), OPTION_COUNT);

            let target_hits = challenge
                .options
                .iter()
                .filter(|e| e.id == challenge.target.id)
                .count();
            assert_eq!(target_hits, 1);

            let mut ids: Vec<_> = challenge.options.iter().map(|e| &e.id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), OPTION_COUNT);

            assert!(!challenge.locked);
        }
    }
}
