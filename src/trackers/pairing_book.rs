//! The active/finished pairing ledger of a round.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::entrant::Entrant;
use crate::pairing::Pairing;
use crate::util::{MultiPairIndex, PairConflictError, UniquePairIndex};

/// One facade over a round's pairings: a unique index of active pairings
/// (at most one per entrant) and an insertion-ordered multi index of
/// finished pairings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PairingBook<E: Entrant> {
    active: UniquePairIndex<E>,
    finished: MultiPairIndex<E>,
}

impl<E: Entrant> PairingBook<E> {
    pub fn new() -> Self {
        Self {
            active: UniquePairIndex::new(),
            finished: MultiPairIndex::new(),
        }
    }

    /// Opens a pairing as active. Fails if either entrant already has an
    /// active pairing.
    pub fn open(&mut self, pairing: Pairing<E>) -> Result<(), PairConflictError> {
        debug_assert!(!self.is_finished(&pairing));
        self.active.insert(pairing)?;
        Ok(())
    }

    /// Moves an active pairing into the finished history. Returns false if
    /// the pairing is not active.
    pub fn finish(&mut self, pairing: &Pairing<E>) -> bool {
        if !self.active.remove(pairing) {
            return false;
        }
        self.finished.insert(pairing.clone())
    }

    pub fn remove_active(&mut self, pairing: &Pairing<E>) -> bool {
        self.active.remove(pairing)
    }

    pub fn remove_finished(&mut self, pairing: &Pairing<E>) -> bool {
        self.finished.remove(pairing)
    }

    pub fn remove_active_by_entrant(&mut self, entrant: &E) -> Option<Pairing<E>> {
        self.active.remove_by_entrant(entrant)
    }

    pub fn find_active_by_entrant(&self, entrant: &E) -> Option<&Pairing<E>> {
        self.active.find_by_entrant(entrant)
    }

    pub fn finished_by_entrant(&self, entrant: &E) -> &[Pairing<E>] {
        self.finished.find_by_entrant(entrant)
    }

    pub fn finished_count_of(&self, entrant: &E) -> usize {
        self.finished.count_of(entrant)
    }

    /// The entrant's most recent pairing: their active one if any, else the
    /// last finished one.
    pub fn last_pairing_of(&self, entrant: &E) -> Option<&Pairing<E>> {
        self.active
            .find_by_entrant(entrant)
            .or_else(|| self.finished.find_last_by_entrant(entrant))
    }

    pub fn active(&self) -> &HashSet<Pairing<E>> {
        self.active.pairings()
    }

    /// Finished pairings, oldest first.
    pub fn finished(&self) -> &[Pairing<E>] {
        self.finished.pairings()
    }

    pub fn active_entrants(&self) -> impl Iterator<Item = &E> {
        self.active.entrants()
    }

    pub fn finished_entrants(&self) -> impl Iterator<Item = &E> {
        self.finished.entrants()
    }

    pub fn contains(&self, pairing: &Pairing<E>) -> bool {
        self.is_active(pairing) || self.is_finished(pairing)
    }

    pub fn is_active(&self, pairing: &Pairing<E>) -> bool {
        self.active.contains(pairing)
    }

    pub fn is_finished(&self, pairing: &Pairing<E>) -> bool {
        self.finished.contains(pairing)
    }

    pub fn has_active(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn has_active_entrant(&self, entrant: &E) -> bool {
        self.active.contains_entrant(entrant)
    }

    pub fn has_finished_entrant(&self, entrant: &E) -> bool {
        self.finished.contains_entrant(entrant)
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }
}
