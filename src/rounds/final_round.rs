//! The final round deciding the podium.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use super::errors::{RoundError, RoundResult};
use super::{RoundInspection, RoundManagement};
use crate::entrant::Entrant;
use crate::pairing::Pairing;
use crate::placement::{Placement, Standings};
use crate::trackers::{PairingBook, PlacementTracker};

/// The final: a mandatory first-place pairing and an optional third-place
/// pairing over disjoint entrants.
///
/// Upcoming pairings surface in a fixed order with the third-place pairing
/// first, so the lower-stakes pairing is always played before the title
/// decider. Removing an entrant whose pairing has not been decided awards
/// the placement to the remaining opponent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Final<E: Entrant> {
    first_place: Pairing<E>,
    third_place: Option<Pairing<E>>,
    entrants: HashSet<E>,
    upcoming: VecDeque<Pairing<E>>,
    pairings: PairingBook<E>,
    placements: PlacementTracker<E>,
}

impl<E: Entrant> Final<E> {
    pub fn new(first_place: Pairing<E>, third_place: Option<Pairing<E>>) -> RoundResult<Self> {
        let mut entrants = HashSet::new();
        let mut upcoming = VecDeque::new();

        if let Some(third) = &third_place {
            if third.contains(first_place.first()) || third.contains(first_place.second()) {
                return Err(RoundError::OverlappingPairings);
            }
            entrants.insert(third.first().clone());
            entrants.insert(third.second().clone());
            upcoming.push_back(third.clone());
        }

        entrants.insert(first_place.first().clone());
        entrants.insert(first_place.second().clone());
        upcoming.push_back(first_place.clone());

        Ok(Self {
            first_place,
            third_place,
            entrants,
            upcoming,
            pairings: PairingBook::new(),
            placements: PlacementTracker::new(),
        })
    }

    pub fn first_place_pairing(&self) -> &Pairing<E> {
        &self.first_place
    }

    pub fn third_place_pairing(&self) -> Option<&Pairing<E>> {
        self.third_place.as_ref()
    }

    /// Upcoming pairings in the order they will be drawn.
    pub fn upcoming_pairings(&self) -> impl Iterator<Item = &Pairing<E>> {
        self.upcoming.iter()
    }

    pub fn standings(&self) -> Standings<E> {
        Standings {
            first: self.placements.holder(Placement::First).cloned(),
            second: self.placements.holder(Placement::Second).cloned(),
            third: self.placements.holder(Placement::Third).cloned(),
        }
    }

    /// Moves an upcoming pairing to the front of the draw order. Used when
    /// bracket progression needs to resolve a predetermined pairing before
    /// the round is handed out.
    pub(crate) fn prioritize(&mut self, pairing: &Pairing<E>) {
        if let Some(position) = self.upcoming.iter().position(|p| p == pairing)
            && position > 0
            && let Some(promoted) = self.upcoming.remove(position)
        {
            self.upcoming.push_front(promoted);
        }
    }

    /// The original pairing this entrant belongs to, independent of round
    /// membership.
    fn pairing_of(&self, entrant: &E) -> Option<&Pairing<E>> {
        if self.first_place.contains(entrant) {
            return Some(&self.first_place);
        }
        self.third_place
            .as_ref()
            .filter(|third| third.contains(entrant))
    }

    /// The placement the winner of this pairing earns.
    fn award_of(&self, pairing: &Pairing<E>) -> Placement {
        if *pairing == self.first_place {
            Placement::First
        } else {
            Placement::Third
        }
    }

    /// The placement the loser of this pairing is left with.
    fn consolation_of(&self, pairing: &Pairing<E>) -> Placement {
        if *pairing == self.first_place {
            Placement::Second
        } else {
            Placement::None
        }
    }
}

impl<E: Entrant> RoundManagement<E> for Final<E> {
    fn add_entrant(&mut self, entrant: E) -> RoundResult<bool> {
        if self.entrants.contains(&entrant) {
            return Ok(false);
        }
        let pairing = self
            .pairing_of(&entrant)
            .cloned()
            .ok_or(RoundError::EntrantNotAllowed)?;

        if self.pairings.is_finished(&pairing) {
            // Already played; the recorded outcome stands.
            self.entrants.insert(entrant);
            return Ok(true);
        }

        // The pairing is open again: both sides go back to undecided.
        if let Some(other) = pairing.other(&entrant) {
            self.placements.set(other.clone(), Placement::Undetermined);
        }
        self.placements.set(entrant.clone(), Placement::Undetermined);

        if !self.pairings.contains(&pairing) && !self.upcoming.contains(&pairing) {
            if self.third_place.as_ref() == Some(&pairing) {
                self.upcoming.push_front(pairing);
            } else {
                self.upcoming.push_back(pairing);
            }
        }

        self.entrants.insert(entrant);
        Ok(true)
    }

    fn remove_entrant(&mut self, entrant: &E) -> bool {
        if !self.entrants.contains(entrant) {
            return false;
        }

        if let Some(pairing) = self.pairing_of(entrant).cloned()
            && !self.pairings.is_finished(&pairing)
        {
            // Undecided pairing: the placement goes to the remaining
            // opponent without the pairing ever being played.
            self.placements.set(entrant.clone(), Placement::None);
            if let Some(other) = pairing.other(entrant)
                && self.entrants.contains(other)
            {
                self.placements.set(other.clone(), self.award_of(&pairing));
            }

            self.pairings.remove_active(&pairing);
            self.upcoming.retain(|p| p != &pairing);
        }

        self.entrants.remove(entrant)
    }

    fn reset_entrant(&mut self, _entrant: &E) -> RoundResult<bool> {
        Err(RoundError::UnsupportedOperation)
    }

    fn next_pairing(&mut self) -> RoundResult<Pairing<E>> {
        let pairing = self.upcoming.pop_front().ok_or(RoundError::NoMorePairings)?;
        self.pairings
            .open(pairing.clone())
            .expect("final pairings never share entrants");
        Ok(pairing)
    }

    fn declare_winner(&mut self, winner: &E) -> RoundResult<Pairing<E>> {
        if !self.entrants.contains(winner) {
            return Err(RoundError::NoSuchEntrant);
        }
        let pairing = self
            .pairing_of(winner)
            .cloned()
            .ok_or(RoundError::MissingPairing)?;
        if !self.pairings.is_active(&pairing) {
            return Err(RoundError::MissingPairing);
        }
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

        self.placements.set(winner.clone(), self.award_of(pairing));
        if let Some(loser) = pairing.other(winner) {
            self.placements
                .set(loser.clone(), self.consolation_of(pairing));
        }

        let finished = self.pairings.finish(pairing);
        debug_assert!(finished);
        Ok(())
    }

    fn declare_tie(&mut self, _pairing: &Pairing<E>) -> RoundResult<()> {
        // A final must produce a ranking.
        Err(RoundError::UnsupportedOperation)
    }

    fn replay_pairing(&mut self, pairing: &Pairing<E>) -> RoundResult<bool> {
        if self.pairings.is_active(pairing) {
            return Ok(false);
        }
        if !self.pairings.is_finished(pairing) {
            return Err(RoundError::NoSuchPairing);
        }

        self.placements.reset(pairing.first());
        self.placements.reset(pairing.second());

        self.pairings.remove_finished(pairing);
        self.pairings
            .open(pairing.clone())
            .expect("replayed pairing was just removed");
        Ok(true)
    }
}

impl<E: Entrant> RoundInspection<E> for Final<E> {
    fn contains(&self, entrant: &E) -> bool {
        self.entrants.contains(entrant)
    }

    fn has_state_about(&self, entrant: &E) -> bool {
        self.pairing_of(entrant).is_some()
    }

    fn has_result(&self, entrant: &E) -> bool {
        self.placements.get(entrant) != Placement::Undetermined
    }

    fn is_pending(&self, _entrant: &E) -> bool {
        // A final has no pending pool; its pairings are fixed up front.
        false
    }

    fn is_paired(&self, entrant: &E) -> bool {
        self.pairings.has_active_entrant(entrant)
    }

    fn is_finished(&self) -> bool {
        self.upcoming.is_empty() && !self.pairings.has_active()
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
        self.placements.get(entrant)
    }

    fn entrant_by_placement(&self, placement: Placement) -> Option<E> {
        self.placements.holder(placement).cloned()
    }
}
