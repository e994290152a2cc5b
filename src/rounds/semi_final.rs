//! The four-entrant semifinal.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::dynamic_elimination::DynamicElimination;
use super::errors::{RoundError, RoundResult};
use super::{RoundInspection, RoundManagement};
use crate::entrant::Entrant;
use crate::pairing::Pairing;
use crate::placement::Placement;

/// An elimination round over a pool fixed to exactly four entrants.
///
/// Mechanically a [`DynamicElimination`], wrapped by a policy that rejects
/// entrants outside the pool the round was constructed with and disallows
/// resets: a semifinal has no second-chance semantics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SemiFinal<E: Entrant> {
    pool: HashSet<E>,
    round: DynamicElimination<E>,
}

impl<E: Entrant> SemiFinal<E> {
    pub const ENTRANT_COUNT: usize = 4;

    pub fn new(entrants: impl IntoIterator<Item = E>) -> Self {
        Self::with_round(entrants, DynamicElimination::new())
    }

    /// A semifinal with deterministic pairing draws.
    pub fn with_seed(entrants: impl IntoIterator<Item = E>, seed: u64) -> Self {
        Self::with_round(entrants, DynamicElimination::with_seed(seed))
    }

    fn with_round(entrants: impl IntoIterator<Item = E>, mut round: DynamicElimination<E>) -> Self {
        let mut pool = HashSet::new();
        for entrant in entrants {
            pool.insert(entrant.clone());
            let _ = round.add_entrant(entrant);
        }
        assert_eq!(
            pool.len(),
            Self::ENTRANT_COUNT,
            "a semifinal requires exactly four entrants"
        );
        Self { pool, round }
    }

    pub fn advanced_entrants(&self) -> HashSet<E> {
        self.round.advanced_entrants()
    }

    pub fn eliminated_entrants(&self) -> HashSet<E> {
        self.round.eliminated_entrants()
    }

    pub fn finished_entrants(&self) -> HashSet<E> {
        self.round.finished_entrants()
    }

    pub fn is_pairing_orphaned(&self, pairing: &Pairing<E>) -> RoundResult<bool> {
        self.round.is_pairing_orphaned(pairing)
    }
}

impl<E: Entrant> RoundManagement<E> for SemiFinal<E> {
    fn add_entrant(&mut self, entrant: E) -> RoundResult<bool> {
        if !self.pool.contains(&entrant) {
            return Err(RoundError::EntrantNotAllowed);
        }
        self.round.add_entrant(entrant)
    }

    fn remove_entrant(&mut self, entrant: &E) -> bool {
        self.round.remove_entrant(entrant)
    }

    fn reset_entrant(&mut self, _entrant: &E) -> RoundResult<bool> {
        Err(RoundError::UnsupportedOperation)
    }

    fn next_pairing(&mut self) -> RoundResult<Pairing<E>> {
        self.round.next_pairing()
    }

    fn declare_winner(&mut self, winner: &E) -> RoundResult<Pairing<E>> {
        self.round.declare_winner(winner)
    }

    fn declare_pairing_winner(&mut self, winner: &E, pairing: &Pairing<E>) -> RoundResult<()> {
        self.round.declare_pairing_winner(winner, pairing)
    }

    fn declare_tie(&mut self, pairing: &Pairing<E>) -> RoundResult<()> {
        self.round.declare_tie(pairing)
    }

    fn replay_pairing(&mut self, pairing: &Pairing<E>) -> RoundResult<bool> {
        self.round.replay_pairing(pairing)
    }
}

impl<E: Entrant> RoundInspection<E> for SemiFinal<E> {
    fn contains(&self, entrant: &E) -> bool {
        self.round.contains(entrant)
    }

    fn has_state_about(&self, entrant: &E) -> bool {
        // The pool is fixed, so the round always has state about its
        // original entrants and never about anyone else.
        self.pool.contains(entrant)
    }

    fn has_result(&self, entrant: &E) -> bool {
        self.round.has_result(entrant)
    }

    fn is_pending(&self, entrant: &E) -> bool {
        self.round.is_pending(entrant)
    }

    fn is_paired(&self, entrant: &E) -> bool {
        self.round.is_paired(entrant)
    }

    fn is_finished(&self) -> bool {
        self.round.is_finished()
    }

    fn entrants(&self) -> HashSet<E> {
        self.round.entrants()
    }

    fn pending_entrants(&self) -> HashSet<E> {
        self.round.pending_entrants()
    }

    fn active_pairings(&self) -> Vec<Pairing<E>> {
        self.round.active_pairings()
    }

    fn finished_pairings(&self) -> Vec<Pairing<E>> {
        self.round.finished_pairings()
    }

    fn placement(&self, entrant: &E) -> Placement {
        self.round.placement(entrant)
    }

    fn entrant_by_placement(&self, placement: Placement) -> Option<E> {
        self.round.entrant_by_placement(placement)
    }
}
