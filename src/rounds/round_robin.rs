//! A three-way round robin used to break a fully tied bracket.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::errors::{RoundError, RoundResult};
use super::{RoundInspection, RoundManagement};
use crate::entrant::Entrant;
use crate::pairing::Pairing;
use crate::placement::{Placement, Standings};
use crate::trackers::{PairingBook, ScoreTracker};
use crate::util::RandomPickSet;

const MAX_SCORE: u8 = 2;

/// Everyone plays everyone: three entrants, three pairings, one pairing at
/// a time. Placements derive from win counts once all pairings are decided.
///
/// A score distribution of (2, 1, 0) yields a full podium, (1, 1, 1) is a
/// three-way tie where every entrant places [`Placement::None`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundRobinFinal<E: Entrant> {
    entrants: HashSet<E>,
    schedule: Vec<Pairing<E>>,
    outstanding: RandomPickSet<Pairing<E>>,
    winners: Vec<(Pairing<E>, E)>,
    pairings: PairingBook<E>,
    scores: ScoreTracker<E>,
}

impl<E: Entrant> RoundRobinFinal<E> {
    pub fn new(first: E, second: E, third: E) -> Self {
        Self::build(first, second, third, RandomPickSet::new())
    }

    /// Like [`Self::new`] but with a deterministic draw order.
    pub fn with_seed(first: E, second: E, third: E, seed: u64) -> Self {
        Self::build(first, second, third, RandomPickSet::with_seed(seed))
    }

    fn build(first: E, second: E, third: E, mut outstanding: RandomPickSet<Pairing<E>>) -> Self {
        let schedule = vec![
            Pairing::new(first.clone(), second.clone()),
            Pairing::new(first.clone(), third.clone()),
            Pairing::new(second.clone(), third.clone()),
        ];
        for pairing in &schedule {
            outstanding.add(pairing.clone());
        }

        Self {
            entrants: HashSet::from([first, second, third]),
            schedule,
            outstanding,
            winners: Vec::new(),
            pairings: PairingBook::new(),
            scores: ScoreTracker::new(),
        }
    }

    pub fn score(&self, entrant: &E) -> u8 {
        self.scores.get(entrant)
    }

    pub fn standings(&self) -> Standings<E> {
        let holder = |placement| {
            self.entrants
                .iter()
                .find(|e| self.placement(e) == placement)
                .cloned()
        };
        Standings {
            first: holder(Placement::First),
            second: holder(Placement::Second),
            third: holder(Placement::Third),
        }
    }

    /// Whether the round finished with all three entrants on one win each.
    /// The only way out of a tie is replaying one of the pairings. A round
    /// missing entrants is decided by forfeit, never tied.
    pub fn is_tie(&self) -> bool {
        self.is_finished()
            && self.entrants.len() == 3
            && self
                .entrants
                .iter()
                .all(|e| self.placement(e) == Placement::None)
    }

    pub fn last_pairing_of(&self, entrant: &E) -> Option<&Pairing<E>> {
        self.pairings.last_pairing_of(entrant)
    }

    fn winner_of(&self, pairing: &Pairing<E>) -> Option<&E> {
        self.winners
            .iter()
            .find(|(p, _)| p == pairing)
            .map(|(_, winner)| winner)
    }

    /// Scheduled pairings of this entrant that have no recorded outcome.
    fn unfinished_pairings_of(&self, entrant: &E) -> Vec<Pairing<E>> {
        self.schedule
            .iter()
            .filter(|p| p.contains(entrant) && !self.pairings.is_finished(p))
            .cloned()
            .collect()
    }
}

impl<E: Entrant> RoundManagement<E> for RoundRobinFinal<E> {
    fn add_entrant(&mut self, entrant: E) -> RoundResult<bool> {
        if self.entrants.contains(&entrant) {
            return Ok(false);
        }
        if !self.schedule.iter().any(|p| p.contains(&entrant)) {
            return Err(RoundError::EntrantNotAllowed);
        }

        // Undo the forfeits that removal handed out. A pairing against a
        // still absent opponent becomes this entrant's forfeit instead of
        // going back into play.
        for pairing in self.unfinished_pairings_of(&entrant) {
            let other = pairing.other(&entrant).cloned();
            match other {
                Some(other) if self.entrants.contains(&other) => {
                    self.scores.decrement(other);
                    let added = self.outstanding.add(pairing);
                    debug_assert!(added);
                }
                _ => {
                    let score = self.scores.increment(entrant.clone());
                    debug_assert!(score <= MAX_SCORE);
                }
            }
        }

        self.entrants.insert(entrant);
        Ok(true)
    }

    fn remove_entrant(&mut self, entrant: &E) -> bool {
        if !self.entrants.contains(entrant) {
            return false;
        }

        let removed_active = self.pairings.remove_active_by_entrant(entrant);

        // Undecided pairings count as forfeits for the opponent. If the
        // opponent already left, this entrant held the forfeit point for
        // the pairing and gives it back.
        for pairing in self.unfinished_pairings_of(entrant) {
            let other = pairing.other(entrant).cloned();
            match other {
                Some(other) if self.entrants.contains(&other) => {
                    let score = self.scores.increment(other);
                    debug_assert!(score <= MAX_SCORE);
                    let was_outstanding = self.outstanding.remove(&pairing);
                    debug_assert!(removed_active.as_ref() == Some(&pairing) || was_outstanding);
                }
                _ => {
                    self.scores.decrement(entrant.clone());
                }
            }
        }

        self.entrants.remove(entrant)
    }

    fn reset_entrant(&mut self, _entrant: &E) -> RoundResult<bool> {
        Err(RoundError::UnsupportedOperation)
    }

    fn next_pairing(&mut self) -> RoundResult<Pairing<E>> {
        if self.is_finished() {
            return Err(RoundError::NoMorePairings);
        }
        if self.pairings.has_active() {
            return Err(RoundError::UnfinishedPairings);
        }

        let pairing = self
            .outstanding
            .remove_random()
            .expect("outstanding pairings checked above");
        self.pairings
            .open(pairing.clone())
            .expect("only one pairing plays at a time");
        Ok(pairing)
    }

    fn declare_winner(&mut self, winner: &E) -> RoundResult<Pairing<E>> {
        if !self.entrants.contains(winner) {
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
        if !pairing.contains(winner) || !self.entrants.contains(winner) {
            return Err(RoundError::NoSuchEntrant);
        }
        if !self.pairings.is_active(pairing) {
            return Err(RoundError::NoSuchPairing);
        }

        self.pairings.finish(pairing);
        self.winners.push((pairing.clone(), winner.clone()));
        let score = self.scores.increment(winner.clone());
        debug_assert!(score <= MAX_SCORE);
        Ok(())
    }

    fn declare_tie(&mut self, _pairing: &Pairing<E>) -> RoundResult<()> {
        Err(RoundError::UnsupportedOperation)
    }

    fn replay_pairing(&mut self, pairing: &Pairing<E>) -> RoundResult<bool> {
        if self.pairings.is_active(pairing) {
            return Ok(false);
        }
        if !self.pairings.is_finished(pairing) {
            return Err(RoundError::NoSuchPairing);
        }
        if !self.entrants.contains(pairing.first()) || !self.entrants.contains(pairing.second()) {
            return Err(RoundError::MissingEntrant);
        }
        if self.pairings.has_active_entrant(pairing.first())
            || self.pairings.has_active_entrant(pairing.second())
        {
            return Err(RoundError::OrphanedPairing);
        }

        let winner = self
            .winner_of(pairing)
            .cloned()
            .expect("finished pairings record their winner");
        self.scores.decrement(winner);
        self.winners.retain(|(p, _)| p != pairing);

        let removed = self.pairings.remove_finished(pairing);
        debug_assert!(removed);
        self.pairings
            .open(pairing.clone())
            .expect("replayed pairing was just removed");
        Ok(true)
    }
}

impl<E: Entrant> RoundInspection<E> for RoundRobinFinal<E> {
    fn contains(&self, entrant: &E) -> bool {
        self.entrants.contains(entrant)
    }

    fn has_state_about(&self, entrant: &E) -> bool {
        self.schedule.iter().any(|p| p.contains(entrant))
    }

    fn has_result(&self, entrant: &E) -> bool {
        self.schedule
            .iter()
            .filter(|p| p.contains(entrant))
            .any(|p| self.winner_of(p).is_some())
    }

    fn is_pending(&self, _entrant: &E) -> bool {
        false
    }

    fn is_paired(&self, entrant: &E) -> bool {
        self.pairings.has_active_entrant(entrant)
    }

    fn is_finished(&self) -> bool {
        self.outstanding.is_empty() && !self.pairings.has_active()
    }

    fn entrants(&self) -> HashSet<E> {
        self.entrants.clone()
    }

    fn pending_entrants(&self) -> HashSet<E> {
        HashSet::new()
    }

    fn active_pairings(&self) -> Vec<Pairing<E>> {
        self.pairings.active().iter().cloned().collect()
    }

    fn finished_pairings(&self) -> Vec<Pairing<E>> {
        self.pairings.finished().to_vec()
    }

    fn placement(&self, entrant: &E) -> Placement {
        let own_score = self.scores.get(entrant);

        // Two wins settle first place even with a pairing outstanding.
        if own_score == 2 {
            return Placement::First;
        }
        if !self.is_finished() {
            return Placement::Undetermined;
        }

        let mut with_one = 0;
        let mut has_zero = false;
        let mut has_two = false;
        for other in self.entrants.iter().filter(|e| *e != entrant) {
            match self.scores.get(other) {
                0 => has_zero = true,
                1 => with_one += 1,
                _ => has_two = true,
            }
        }

        // All three on one win each is a dead tie.
        if own_score == 1 && with_one == 2 {
            return Placement::None;
        }
        if own_score == 1 && has_zero && has_two {
            return Placement::Second;
        }
        if own_score == 0 {
            return Placement::Third;
        }

        // Reachable after removals, e.g. a (2, 1) distribution where the
        // winless entrant left the round.
        Placement::Undetermined
    }

    fn entrant_by_placement(&self, placement: Placement) -> Option<E> {
        self.entrants
            .iter()
            .find(|e| self.placement(e) == placement)
            .cloned()
    }
}
