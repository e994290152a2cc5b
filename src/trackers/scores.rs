//! Win counters for the round robin.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entrant::Entrant;

/// Per-entrant win counts. Absent entrants score zero.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScoreTracker<E: Entrant> {
    scores: HashMap<E, u8>,
}

impl<E: Entrant> ScoreTracker<E> {
    pub fn new() -> Self {
        Self {
            scores: HashMap::new(),
        }
    }

    /// Adds a win and returns the new score.
    pub fn increment(&mut self, entrant: E) -> u8 {
        let score = self.scores.entry(entrant).or_insert(0);
        *score += 1;
        *score
    }

    /// Reverts a win and returns the new score.
    pub fn decrement(&mut self, entrant: E) -> u8 {
        let score = self.scores.entry(entrant).or_insert(0);
        debug_assert!(*score > 0, "cannot revert a win that was never scored");
        *score = score.saturating_sub(1);
        *score
    }

    pub fn get(&self, entrant: &E) -> u8 {
        self.scores.get(entrant).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_default_to_zero() {
        let scores: ScoreTracker<&str> = ScoreTracker::new();
        assert_eq!(scores.get(&"a"), 0);
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut scores = ScoreTracker::new();
        assert_eq!(scores.increment("a"), 1);
        assert_eq!(scores.increment("a"), 2);
        assert_eq!(scores.decrement("a"), 1);
        assert_eq!(scores.get(&"a"), 1);
        assert_eq!(scores.get(&"b"), 0);
    }
}
