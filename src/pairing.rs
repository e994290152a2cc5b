//! An unordered pair of entrants competing against each other.

use serde::{Deserialize, Serialize};
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::entrant::Entrant;

/// A pairing between two entrants.
///
/// Pairings are unordered: `Pairing::new(a, b)` and `Pairing::new(b, a)`
/// compare equal and hash identically. A pairing is immutable once created;
/// whether it is active or finished is tracked by the round that owns it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pairing<E: Entrant> {
    first: E,
    second: E,
}

impl<E: Entrant> Pairing<E> {
    pub fn new(first: E, second: E) -> Self {
        debug_assert!(first != second, "a pairing needs two distinct entrants");
        Self { first, second }
    }

    pub fn first(&self) -> &E {
        &self.first
    }

    pub fn second(&self) -> &E {
        &self.second
    }

    pub fn contains(&self, entrant: &E) -> bool {
        self.first == *entrant || self.second == *entrant
    }

    /// The partner of `entrant`, or `None` if `entrant` is not part of
    /// this pairing.
    pub fn other(&self, entrant: &E) -> Option<&E> {
        if self.first == *entrant {
            Some(&self.second)
        } else if self.second == *entrant {
            Some(&self.first)
        } else {
            None
        }
    }
}

impl<E: Entrant> PartialEq for Pairing<E> {
    fn eq(&self, other: &Self) -> bool {
        (self.first == other.first && self.second == other.second)
            || (self.first == other.second && self.second == other.first)
    }
}

impl<E: Entrant> Eq for Pairing<E> {}

impl<E: Entrant> Hash for Pairing<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Combine the element hashes commutatively so that {a,b} and {b,a}
        // produce the same hash without requiring Ord on E.
        let first = element_hash(&self.first);
        let second = element_hash(&self.second);
        state.write_u64(first ^ second);
        state.write_u64(first.wrapping_add(second));
    }
}

fn element_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
