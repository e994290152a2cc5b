//! A set with uniform random removal.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Error returned when drawing from an empty [`RandomPickSet`].
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("cannot draw from an empty set")]
pub struct EmptySetError;

/// A set supporting O(1) membership, insertion, deletion and uniform random
/// removal.
///
/// Removal is lazy: removed elements stay in the backing vector as
/// tombstones and are skipped (and reclaimed) when a random draw hits them.
/// Each live element occupies exactly one backing slot, so `remove_random`
/// selects uniformly over the live elements in amortized O(1).
///
/// The random source is owned and excluded from serialized state; a
/// restored set draws from a freshly seeded source.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RandomPickSet<T: Clone + Eq + Hash> {
    elements: HashSet<T>,
    tombstones: HashSet<T>,
    backing: Vec<T>,
    #[serde(skip, default = "entropy_rng")]
    rng: SmallRng,
}

fn entropy_rng() -> SmallRng {
    SmallRng::from_os_rng()
}

impl<T: Clone + Eq + Hash> RandomPickSet<T> {
    pub fn new() -> Self {
        Self::from_rng(entropy_rng())
    }

    /// A set with a deterministic draw order, for reproducible pairings.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    fn from_rng(rng: SmallRng) -> Self {
        Self {
            elements: HashSet::new(),
            tombstones: HashSet::new(),
            backing: Vec::new(),
            rng,
        }
    }

    /// Returns false if the element is already contained.
    pub fn add(&mut self, element: T) -> bool {
        if self.elements.contains(&element) {
            return false;
        }

        // A tombstoned element still occupies its backing slot; reviving it
        // only needs the tombstone cleared.
        if !self.tombstones.remove(&element) {
            self.backing.push(element.clone());
        }

        self.elements.insert(element)
    }

    /// Returns false if the element is not contained.
    pub fn remove(&mut self, element: &T) -> bool {
        if !self.elements.remove(element) {
            return false;
        }

        self.tombstones.insert(element.clone());
        true
    }

    /// Removes and returns an element selected uniformly at random among
    /// the currently contained elements.
    pub fn remove_random(&mut self) -> Result<T, EmptySetError> {
        while !self.backing.is_empty() {
            let index = self.rng.random_range(0..self.backing.len());
            let popped = self.backing.swap_remove(index);

            // Stale slot of a previously removed element; reclaim and retry.
            if self.tombstones.remove(&popped) {
                continue;
            }

            self.elements.remove(&popped);
            return Ok(popped);
        }

        Err(EmptySetError)
    }

    pub fn contains(&self, element: &T) -> bool {
        self.elements.contains(element)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &HashSet<T> {
        &self.elements
    }
}

impl<T: Clone + Eq + Hash> Default for RandomPickSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> FromIterator<T> for RandomPickSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for element in iter {
            set.add(element);
        }
        set
    }
}
