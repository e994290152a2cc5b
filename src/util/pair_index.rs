//! Pairing containers queryable by either entrant in O(1).
//!
//! Both containers keep a pairing store and an entrant index that only ever
//! mutate together behind this API; round code never touches the maps
//! directly.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::entrant::Entrant;
use crate::pairing::Pairing;

/// Error returned when inserting a pairing whose entrant is already part of
/// another pairing in a [`UniquePairIndex`].
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("an entrant of the pairing is already part of another pairing")]
pub struct PairConflictError;

/// An index of pairings where each entrant participates in at most one
/// pairing. Used for active pairings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UniquePairIndex<E: Entrant> {
    pairings: HashSet<Pairing<E>>,
    by_entrant: HashMap<E, Pairing<E>>,
}

impl<E: Entrant> UniquePairIndex<E> {
    pub fn new() -> Self {
        Self {
            pairings: HashSet::new(),
            by_entrant: HashMap::new(),
        }
    }

    /// Inserts a pairing, failing if either entrant already participates in
    /// a contained pairing. Returns false if the pairing itself is already
    /// contained.
    pub fn insert(&mut self, pairing: Pairing<E>) -> Result<bool, PairConflictError> {
        if self.pairings.contains(&pairing) {
            return Ok(false);
        }
        if self.by_entrant.contains_key(pairing.first())
            || self.by_entrant.contains_key(pairing.second())
        {
            return Err(PairConflictError);
        }

        self.by_entrant
            .insert(pairing.first().clone(), pairing.clone());
        self.by_entrant
            .insert(pairing.second().clone(), pairing.clone());
        self.pairings.insert(pairing);
        Ok(true)
    }

    pub fn remove(&mut self, pairing: &Pairing<E>) -> bool {
        if !self.pairings.remove(pairing) {
            return false;
        }

        self.by_entrant.remove(pairing.first());
        self.by_entrant.remove(pairing.second());
        true
    }

    pub fn remove_by_entrant(&mut self, entrant: &E) -> Option<Pairing<E>> {
        let pairing = self.by_entrant.get(entrant)?.clone();
        self.remove(&pairing);
        Some(pairing)
    }

    pub fn find_by_entrant(&self, entrant: &E) -> Option<&Pairing<E>> {
        self.by_entrant.get(entrant)
    }

    pub fn contains(&self, pairing: &Pairing<E>) -> bool {
        self.pairings.contains(pairing)
    }

    pub fn contains_entrant(&self, entrant: &E) -> bool {
        self.by_entrant.contains_key(entrant)
    }

    pub fn pairings(&self) -> &HashSet<Pairing<E>> {
        &self.pairings
    }

    pub fn entrants(&self) -> impl Iterator<Item = &E> {
        self.by_entrant.keys()
    }

    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }
}

/// An insertion-ordered index of pairings where each entrant may appear in
/// many pairings over time. Used for finished pairings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MultiPairIndex<E: Entrant> {
    ordered: Vec<Pairing<E>>,
    buckets: HashMap<E, Vec<Pairing<E>>>,
}

impl<E: Entrant> MultiPairIndex<E> {
    pub fn new() -> Self {
        Self {
            ordered: Vec::new(),
            buckets: HashMap::new(),
        }
    }

    /// Returns false if the pairing is already contained.
    pub fn insert(&mut self, pairing: Pairing<E>) -> bool {
        if self.contains(&pairing) {
            return false;
        }

        self.buckets
            .entry(pairing.first().clone())
            .or_default()
            .push(pairing.clone());
        self.buckets
            .entry(pairing.second().clone())
            .or_default()
            .push(pairing.clone());
        self.ordered.push(pairing);
        true
    }

    pub fn remove(&mut self, pairing: &Pairing<E>) -> bool {
        let Some(position) = self.ordered.iter().position(|p| p == pairing) else {
            return false;
        };
        self.ordered.remove(position);

        for entrant in [pairing.first(), pairing.second()] {
            if let Some(bucket) = self.buckets.get_mut(entrant) {
                bucket.retain(|p| p != pairing);
                // Buckets never dangle empty.
                if bucket.is_empty() {
                    self.buckets.remove(entrant);
                }
            }
        }
        true
    }

    /// All contained pairings of an entrant, oldest first.
    pub fn find_by_entrant(&self, entrant: &E) -> &[Pairing<E>] {
        self.buckets.get(entrant).map_or(&[], Vec::as_slice)
    }

    /// The most recently inserted pairing containing this entrant.
    pub fn find_last_by_entrant(&self, entrant: &E) -> Option<&Pairing<E>> {
        self.buckets.get(entrant).and_then(|bucket| bucket.last())
    }

    pub fn count_of(&self, entrant: &E) -> usize {
        self.buckets.get(entrant).map_or(0, Vec::len)
    }

    pub fn contains(&self, pairing: &Pairing<E>) -> bool {
        self.find_by_entrant(pairing.first())
            .iter()
            .any(|p| p == pairing)
    }

    pub fn contains_entrant(&self, entrant: &E) -> bool {
        self.buckets.contains_key(entrant)
    }

    /// All contained pairings, oldest first.
    pub fn pairings(&self) -> &[Pairing<E>] {
        &self.ordered
    }

    pub fn entrants(&self) -> impl Iterator<Item = &E> {
        self.buckets.keys()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
