//! Advanced/eliminated classification of entrants.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::entrant::Entrant;

/// Tracks which entrants advanced and which were eliminated.
///
/// The two classifications are mutually exclusive: assigning one clears the
/// other. Results can be moved atomically between trackers, which is how
/// rounds retain "floating" results for removed entrants.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResultTracker<E: Entrant> {
    advanced: HashSet<E>,
    eliminated: HashSet<E>,
}

impl<E: Entrant> ResultTracker<E> {
    pub fn new() -> Self {
        Self {
            advanced: HashSet::new(),
            eliminated: HashSet::new(),
        }
    }

    pub fn advance(&mut self, entrant: E) {
        self.eliminated.remove(&entrant);
        self.advanced.insert(entrant);
    }

    pub fn eliminate(&mut self, entrant: E) {
        self.advanced.remove(&entrant);
        self.eliminated.insert(entrant);
    }

    /// Clears any classification of the entrant.
    pub fn reset(&mut self, entrant: &E) {
        self.advanced.remove(entrant);
        self.eliminated.remove(entrant);
    }

    /// Atomically transfers the entrant's classification (if any) to the
    /// other tracker. Returns whether the entrant had one.
    pub fn move_to(&mut self, other: &mut ResultTracker<E>, entrant: &E) -> bool {
        if self.advanced.remove(entrant) {
            other.advance(entrant.clone());
            return true;
        }
        if self.eliminated.remove(entrant) {
            other.eliminate(entrant.clone());
            return true;
        }
        false
    }

    pub fn contains(&self, entrant: &E) -> bool {
        self.is_advanced(entrant) || self.is_eliminated(entrant)
    }

    pub fn is_advanced(&self, entrant: &E) -> bool {
        self.advanced.contains(entrant)
    }

    pub fn is_eliminated(&self, entrant: &E) -> bool {
        self.eliminated.contains(entrant)
    }

    pub fn advanced(&self) -> &HashSet<E> {
        &self.advanced
    }

    pub fn eliminated(&self) -> &HashSet<E> {
        &self.eliminated
    }

    pub fn len(&self) -> usize {
        self.advanced.len() + self.eliminated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advanced.is_empty() && self.eliminated.is_empty()
    }
}
