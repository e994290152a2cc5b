//! The canonical bracket round with a dynamic entrant pool.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::errors::{RoundError, RoundResult};
use super::{RoundInspection, RoundManagement};
use crate::entrant::Entrant;
use crate::pairing::Pairing;
use crate::placement::Placement;
use crate::trackers::{PairingBook, ResultTracker};
use crate::util::RandomPickSet;

/// An elimination round whose entrant pool may change while it runs.
///
/// Entrants start out pending, get drawn two at a time into randomized
/// pairings, and end up advanced or eliminated. Removing an entrant with a
/// decided result demotes the result to a "floating" one that is restored
/// if the same entrant is re-added later.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DynamicElimination<E: Entrant> {
    entrants: HashSet<E>,
    pending: RandomPickSet<E>,
    results: ResultTracker<E>,
    floating_results: ResultTracker<E>,
    pairings: PairingBook<E>,
}

impl<E: Entrant> DynamicElimination<E> {
    pub fn new() -> Self {
        Self::with_pending_pool(RandomPickSet::new())
    }

    /// A round with deterministic pairing draws, for reproducible play.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_pending_pool(RandomPickSet::with_seed(seed))
    }

    pub fn with_entrants(entrants: impl IntoIterator<Item = E>) -> Self {
        let mut round = Self::new();
        for entrant in entrants {
            let _ = round.add_entrant(entrant);
        }
        round
    }

    fn with_pending_pool(pending: RandomPickSet<E>) -> Self {
        Self {
            entrants: HashSet::new(),
            pending,
            results: ResultTracker::new(),
            floating_results: ResultTracker::new(),
            pairings: PairingBook::new(),
        }
    }

    /// Whether replaying this finished pairing would conflict with history
    /// that a later pairing already depends on.
    pub fn is_pairing_orphaned(&self, pairing: &Pairing<E>) -> RoundResult<bool> {
        if self.pairings.is_active(pairing) {
            return Ok(false);
        }
        if !self.pairings.is_finished(pairing) {
            return Err(RoundError::NoSuchPairing);
        }

        let first = pairing.first();
        let second = pairing.second();

        // Not in this pairing anymore, but currently playing another one.
        if self.is_paired(first) || self.is_paired(second) {
            return Ok(true);
        }

        // An entrant with several finished pairings who is not pending got
        // their current result from a later pairing than this one.
        let decided_later = |entrant: &E| {
            self.pairings.finished_count_of(entrant) > 1 && !self.is_pending(entrant)
        };
        Ok(decided_later(first) || decided_later(second))
    }

    pub fn advanced_entrants(&self) -> HashSet<E> {
        self.results.advanced().clone()
    }

    pub fn eliminated_entrants(&self) -> HashSet<E> {
        self.results.eliminated().clone()
    }

    /// All entrants that are part of a finished pairing.
    pub fn finished_entrants(&self) -> HashSet<E> {
        self.pairings.finished_entrants().cloned().collect()
    }

    pub fn has_active_pairings(&self) -> bool {
        self.pairings.has_active()
    }

    /// The entrant's most recent pairing, active or finished.
    pub fn last_pairing_of(&self, entrant: &E) -> Option<&Pairing<E>> {
        self.pairings.last_pairing_of(entrant)
    }

    /// Activates a pairing of two entrants that are neither pending nor
    /// decided nor already paired.
    fn register_pairing(&mut self, first: E, second: E) -> RoundResult<Pairing<E>> {
        let pairing = Pairing::new(first, second);

        debug_assert!(!self.pairings.contains(&pairing));
        debug_assert!(!self.is_pending(pairing.first()) && !self.is_pending(pairing.second()));
        debug_assert!(!self.has_result(pairing.first()) && !self.has_result(pairing.second()));

        self.pairings
            .open(pairing.clone())
            .map_err(|_| RoundError::EntrantNotPending)?;
        debug!("activated pairing {pairing:?}");
        Ok(pairing)
    }

    fn finish_pairing(&mut self, pairing: &Pairing<E>) {
        let finished = self.pairings.finish(pairing);
        debug_assert!(finished);
        debug_assert!(self.partition_holds());
    }

    /// Returns the pairing's other entrant to the pending pool.
    fn release_opponent(&mut self, pairing: &Pairing<E>, entrant: &E) {
        if let Some(other) = pairing.other(entrant) {
            self.pending.add(other.clone());
        }
    }

    /// Every member is in exactly one of pending, actively paired,
    /// advanced or eliminated.
    fn partition_holds(&self) -> bool {
        self.entrants.len()
            == self.pending.len() + 2 * self.pairings.active_len() + self.results.len()
    }
}

impl<E: Entrant> Default for DynamicElimination<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entrant> RoundManagement<E> for DynamicElimination<E> {
    fn add_entrant(&mut self, entrant: E) -> RoundResult<bool> {
        if self.entrants.contains(&entrant) {
            return Ok(false);
        }

        // A floating result means this entrant was removed after their
        // pairing was decided; re-adding restores the result directly
        // instead of sending them through the pending pool.
        if self.floating_results.contains(&entrant) {
            let moved = self.floating_results.move_to(&mut self.results, &entrant);
            debug_assert!(moved);
            self.entrants.insert(entrant);
            return Ok(true);
        }

        self.pending.add(entrant.clone());
        self.entrants.insert(entrant);
        Ok(true)
    }

    fn remove_entrant(&mut self, entrant: &E) -> bool {
        if self.pending.contains(entrant) {
            self.pending.remove(entrant);
        } else if self.is_paired(entrant) {
            if let Some(pairing) = self.pairings.remove_active_by_entrant(entrant) {
                self.release_opponent(&pairing, entrant);
            }
        } else if self.results.contains(entrant) {
            let moved = self.results.move_to(&mut self.floating_results, entrant);
            debug_assert!(moved);
        } else if self.floating_results.contains(entrant) {
            return false; // Already removed.
        }

        self.entrants.remove(entrant)
    }

    fn reset_entrant(&mut self, entrant: &E) -> RoundResult<bool> {
        if !self.has_state_about(entrant) || self.is_pending(entrant) {
            return Ok(false);
        }

        if self.is_paired(entrant) {
            if let Some(pairing) = self.pairings.remove_active_by_entrant(entrant) {
                self.release_opponent(&pairing, entrant);
            }
            self.pending.add(entrant.clone());
        } else if self.results.contains(entrant) {
            self.results.reset(entrant);
            self.pending.add(entrant.clone());
        } else if self.floating_results.contains(entrant) {
            debug_assert!(!self.entrants.contains(entrant));
            self.floating_results.reset(entrant);
        }

        // Prune finished pairings whose other side was also reset; nobody
        // depends on that history anymore.
        let finished: Vec<Pairing<E>> = self.pairings.finished_by_entrant(entrant).to_vec();
        for pairing in finished {
            if let Some(other) = pairing.other(entrant)
                && !self.has_result(other)
                && !self.floating_results.contains(other)
            {
                self.pairings.remove_finished(&pairing);
            }
        }

        Ok(true)
    }

    fn next_pairing(&mut self) -> RoundResult<Pairing<E>> {
        match self.pending.len() {
            0 => return Err(RoundError::NoEntrants),
            1 => return Err(RoundError::NoOpponent),
            _ => {}
        }

        let first = self
            .pending
            .remove_random()
            .expect("pending pool size checked above");
        let second = self
            .pending
            .remove_random()
            .expect("pending pool size checked above");
        self.register_pairing(first, second)
    }

    fn declare_winner(&mut self, winner: &E) -> RoundResult<Pairing<E>> {
        if !self.contains(winner) {
            return Err(RoundError::NoSuchEntrant);
        }

        let pairing = self
            .pairings
            .find_active_by_entrant(winner)
            .cloned()
            .ok_or(RoundError::MissingPairing)?;
        self.declare_pairing_winner(winner, &pairing)?;
        Ok(pairing)
    }

    fn declare_pairing_winner(&mut self, winner: &E, pairing: &Pairing<E>) -> RoundResult<()> {
        if !pairing.contains(winner) || !self.contains(winner) {
            return Err(RoundError::NoSuchEntrant);
        }
        if !self.pairings.is_active(pairing) {
            return Err(RoundError::NoSuchPairing);
        }

        self.results.advance(winner.clone());
        if let Some(loser) = pairing.other(winner) {
            self.results.eliminate(loser.clone());
        }

        self.finish_pairing(pairing);
        Ok(())
    }

    fn declare_tie(&mut self, pairing: &Pairing<E>) -> RoundResult<()> {
        if !self.pairings.is_active(pairing) {
            return Err(RoundError::NoSuchPairing);
        }

        // A tie advances nobody.
        self.results.eliminate(pairing.first().clone());
        self.results.eliminate(pairing.second().clone());

        self.finish_pairing(pairing);
        Ok(())
    }

    fn replay_pairing(&mut self, pairing: &Pairing<E>) -> RoundResult<bool> {
        if self.pairings.is_active(pairing) {
            return Ok(false);
        }
        if !self.pairings.is_finished(pairing) {
            return Err(RoundError::NoSuchPairing);
        }

        let first = pairing.first().clone();
        let second = pairing.second().clone();

        // Finished pairings are only pruned once both entrants are gone,
        // so one of them may have left the round in the meantime.
        if !self.contains(&first) || !self.contains(&second) {
            return Err(RoundError::MissingEntrant);
        }

        if self.is_pairing_orphaned(pairing)? {
            warn!("refusing to replay orphaned pairing {pairing:?}");
            return Err(RoundError::OrphanedPairing);
        }

        self.results.reset(&first);
        self.results.reset(&second);
        self.pairings.remove_finished(pairing);

        // Re-pair the two directly, bypassing the random draw.
        self.pending.remove(&first);
        self.pending.remove(&second);
        self.register_pairing(first, second)?;

        Ok(true)
    }
}

impl<E: Entrant> RoundInspection<E> for DynamicElimination<E> {
    fn contains(&self, entrant: &E) -> bool {
        self.entrants.contains(entrant)
    }

    fn has_state_about(&self, entrant: &E) -> bool {
        self.contains(entrant) || self.floating_results.contains(entrant)
    }

    fn has_result(&self, entrant: &E) -> bool {
        self.results.contains(entrant)
    }

    fn is_pending(&self, entrant: &E) -> bool {
        self.pending.contains(entrant)
    }

    fn is_paired(&self, entrant: &E) -> bool {
        self.pairings.has_active_entrant(entrant)
    }

    fn is_finished(&self) -> bool {
        let finished = self.pending.is_empty() && !self.pairings.has_active();
        debug_assert!(!finished || self.entrants.len() == self.results.len());
        finished
    }

    fn entrants(&self) -> HashSet<E> {
        self.entrants.clone()
    }

    fn pending_entrants(&self) -> HashSet<E> {
        self.pending.elements().clone()
    }

    fn active_pairings(&self) -> Vec<Pairing<E>> {
        self.pairings.active().iter().cloned().collect()
    }

    fn finished_pairings(&self) -> Vec<Pairing<E>> {
        self.pairings.finished().to_vec()
    }

    fn placement(&self, _entrant: &E) -> Placement {
        Placement::Undetermined
    }

    fn entrant_by_placement(&self, _placement: Placement) -> Option<E> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_of(entrants: &[&'static str]) -> DynamicElimination<&'static str> {
        let mut round = DynamicElimination::with_seed(42);
        for &entrant in entrants {
            round.add_entrant(entrant).unwrap();
        }
        round
    }

    #[test]
    fn test_add_entrant_is_idempotent() {
        let mut round = round_of(&["a"]);
        assert_eq!(round.add_entrant("a"), Ok(false));
        assert!(round.is_pending(&"a"));
    }

    #[test]
    fn test_next_pairing_requires_two_pending() {
        let mut round = round_of(&[]);
        assert_eq!(round.next_pairing(), Err(RoundError::NoEntrants));

        round.add_entrant("a").unwrap();
        assert_eq!(round.next_pairing(), Err(RoundError::NoOpponent));
    }

    #[test]
    fn test_basic_elimination() {
        let mut round = round_of(&["a", "b"]);
        let pairing = round.next_pairing().unwrap();
        assert!(pairing.contains(&"a") && pairing.contains(&"b"));
        assert!(round.is_paired(&"a"));

        round.declare_winner(&"a").unwrap();
        assert!(round.results.is_advanced(&"a"));
        assert!(round.results.is_eliminated(&"b"));
        assert!(round.is_finished());
    }

    #[test]
    fn test_declare_winner_requires_membership_and_pairing() {
        let mut round = round_of(&["a", "b"]);
        assert_eq!(round.declare_winner(&"x"), Err(RoundError::NoSuchEntrant));
        assert_eq!(round.declare_winner(&"a"), Err(RoundError::MissingPairing));

        let pairing = round.next_pairing().unwrap();
        assert_eq!(
            round.declare_pairing_winner(&"x", &pairing),
            Err(RoundError::NoSuchEntrant)
        );
    }

    #[test]
    fn test_declare_winner_on_finished_pairing_fails() {
        let mut round = round_of(&["a", "b"]);
        let pairing = round.next_pairing().unwrap();
        round.declare_winner(&"a").unwrap();
        assert_eq!(
            round.declare_pairing_winner(&"a", &pairing),
            Err(RoundError::NoSuchPairing)
        );
    }

    #[test]
    fn test_declare_tie_eliminates_both() {
        let mut round = round_of(&["a", "b"]);
        let pairing = round.next_pairing().unwrap();
        round.declare_tie(&pairing).unwrap();

        assert!(round.results.is_eliminated(&"a"));
        assert!(round.results.is_eliminated(&"b"));
        assert!(round.is_finished());
    }

    #[test]
    fn test_remove_pending_entrant() {
        let mut round = round_of(&["a", "b"]);
        assert!(round.remove_entrant(&"a"));
        assert!(!round.contains(&"a"));
        assert!(!round.has_state_about(&"a"));
        assert!(!round.remove_entrant(&"a"));
    }

    #[test]
    fn test_remove_paired_entrant_releases_opponent() {
        let mut round = round_of(&["a", "b"]);
        let pairing = round.next_pairing().unwrap();
        let (gone, stays) = (*pairing.first(), *pairing.second());

        assert!(round.remove_entrant(&gone));
        assert!(round.is_pending(&stays));
        assert!(round.active_pairings().is_empty());
    }

    #[test]
    fn test_removed_result_floats_and_is_restored_on_re_add() {
        let mut round = round_of(&["a", "b"]);
        round.next_pairing().unwrap();
        round.declare_winner(&"a").unwrap();

        assert!(round.remove_entrant(&"a"));
        assert!(!round.contains(&"a"));
        assert!(round.has_state_about(&"a"));
        assert!(round.floating_results.is_advanced(&"a"));

        assert_eq!(round.add_entrant("a"), Ok(true));
        assert!(round.contains(&"a"));
        assert!(round.results.is_advanced(&"a"));
        assert!(!round.is_pending(&"a"));
        assert!(!round.floating_results.contains(&"a"));
    }

    #[test]
    fn test_remove_entrant_twice_with_floating_result() {
        let mut round = round_of(&["a", "b"]);
        round.next_pairing().unwrap();
        round.declare_winner(&"a").unwrap();

        assert!(round.remove_entrant(&"a"));
        // Fully removed already; only the floating result remains.
        assert!(!round.remove_entrant(&"a"));
        assert!(round.has_state_about(&"a"));
    }

    #[test]
    fn test_reset_paired_entrant_releases_both() {
        let mut round = round_of(&["a", "b"]);
        round.next_pairing().unwrap();

        assert_eq!(round.reset_entrant(&"a"), Ok(true));
        assert!(round.is_pending(&"a"));
        assert!(round.is_pending(&"b"));
        assert!(round.active_pairings().is_empty());
    }

    #[test]
    fn test_reset_decided_entrant_returns_to_pending() {
        let mut round = round_of(&["a", "b"]);
        round.next_pairing().unwrap();
        round.declare_winner(&"a").unwrap();

        assert_eq!(round.reset_entrant(&"b"), Ok(true));
        assert!(round.is_pending(&"b"));
        assert!(!round.has_result(&"b"));
        // The winner's result is untouched, so the history stays.
        assert_eq!(round.finished_pairings().len(), 1);
    }

    #[test]
    fn test_reset_both_sides_prunes_history() {
        let mut round = round_of(&["a", "b"]);
        round.next_pairing().unwrap();
        round.declare_winner(&"a").unwrap();

        round.reset_entrant(&"b").unwrap();
        round.reset_entrant(&"a").unwrap();
        assert!(round.finished_pairings().is_empty());
    }

    #[test]
    fn test_reset_floating_result_detaches_entrant() {
        let mut round = round_of(&["a", "b"]);
        round.next_pairing().unwrap();
        round.declare_winner(&"a").unwrap();
        round.remove_entrant(&"a");

        assert_eq!(round.reset_entrant(&"a"), Ok(true));
        assert!(!round.has_state_about(&"a"));

        // Re-adding now goes through the pending pool again.
        assert_eq!(round.add_entrant("a"), Ok(true));
        assert!(round.is_pending(&"a"));
    }

    #[test]
    fn test_reset_is_noop_for_pending_or_unknown() {
        let mut round = round_of(&["a"]);
        assert_eq!(round.reset_entrant(&"a"), Ok(false));
        assert_eq!(round.reset_entrant(&"x"), Ok(false));
    }

    #[test]
    fn test_replay_finished_pairing() {
        let mut round = round_of(&["a", "b"]);
        let pairing = round.next_pairing().unwrap();
        round.declare_winner(&"a").unwrap();

        assert_eq!(round.replay_pairing(&pairing), Ok(true));
        assert!(round.is_paired(&"a"));
        assert!(round.is_paired(&"b"));
        assert!(!round.has_result(&"a"));
        assert!(round.finished_pairings().is_empty());

        // The same winner again reproduces the original outcome.
        round.declare_winner(&"a").unwrap();
        assert!(round.results.is_advanced(&"a"));
        assert!(round.results.is_eliminated(&"b"));
        assert!(round.is_finished());
    }

    #[test]
    fn test_replay_active_pairing_is_noop() {
        let mut round = round_of(&["a", "b"]);
        let pairing = round.next_pairing().unwrap();
        assert_eq!(round.replay_pairing(&pairing), Ok(false));
        assert!(round.is_paired(&"a"));
    }

    #[test]
    fn test_replay_unknown_pairing_fails() {
        let mut round = round_of(&["a", "b"]);
        assert_eq!(
            round.replay_pairing(&Pairing::new("a", "b")),
            Err(RoundError::NoSuchPairing)
        );
    }

    #[test]
    fn test_replay_with_removed_entrant_fails() {
        let mut round = round_of(&["a", "b"]);
        let pairing = round.next_pairing().unwrap();
        round.declare_winner(&"a").unwrap();
        round.remove_entrant(&"b");

        assert_eq!(
            round.replay_pairing(&pairing),
            Err(RoundError::MissingEntrant)
        );
    }

    #[test]
    fn test_replay_orphaned_by_later_result_fails() {
        // A beats B, B is reset and beats C; B's current result now comes
        // from the later pairing, so the first one must not be replayable.
        let mut round = round_of(&["a", "b", "c"]);
        round.remove_entrant(&"c");

        let first = round.next_pairing().unwrap();
        round.declare_winner(&"a").unwrap();
        round.reset_entrant(&"b").unwrap();

        round.add_entrant("c").unwrap();
        let second = round.next_pairing().unwrap();
        assert!(second.contains(&"b") && second.contains(&"c"));
        round.declare_winner(&"b").unwrap();

        assert_eq!(round.is_pairing_orphaned(&first), Ok(true));
        assert_eq!(
            round.replay_pairing(&first),
            Err(RoundError::OrphanedPairing)
        );
        // The rematch winner's record now spans two finished pairings, so
        // the rematch itself is orphaned as well.
        assert_eq!(round.is_pairing_orphaned(&second), Ok(true));
    }

    #[test]
    fn test_replay_orphaned_by_active_pairing_fails() {
        let mut round = round_of(&["a", "b", "c"]);
        round.remove_entrant(&"c");

        let first = round.next_pairing().unwrap();
        round.declare_winner(&"a").unwrap();
        round.reset_entrant(&"b").unwrap();

        round.add_entrant("c").unwrap();
        round.next_pairing().unwrap();

        assert_eq!(round.is_pairing_orphaned(&first), Ok(true));
        assert_eq!(
            round.replay_pairing(&first),
            Err(RoundError::OrphanedPairing)
        );
    }

    #[test]
    fn test_conservation_through_a_full_round() {
        let mut round = round_of(&["a", "b", "c", "d", "e", "f"]);
        assert!(round.partition_holds());

        round.next_pairing().unwrap();
        assert!(round.partition_holds());

        let second = round.next_pairing().unwrap();
        round.declare_winner(second.first()).unwrap();
        assert!(round.partition_holds());

        let third = round.next_pairing().unwrap();
        round.declare_tie(&third).unwrap();
        assert!(round.partition_holds());
        assert!(!round.is_finished());
    }

    #[test]
    fn test_round_restores_from_snapshot() {
        let mut round: DynamicElimination<String> = DynamicElimination::with_seed(42);
        for name in ["a", "b", "c", "d"] {
            round.add_entrant(name.to_string()).unwrap();
        }
        round.next_pairing().unwrap();

        let json = serde_json::to_string(&round).unwrap();
        let restored: DynamicElimination<String> = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.entrants(), round.entrants());
        assert_eq!(restored.pending_entrants(), round.pending_entrants());
        assert_eq!(restored.active_pairings(), round.active_pairings());
    }
}
