//! Bracket progression rules.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::entrant::Entrant;
use crate::pairing::Pairing;
use crate::rounds::{
    DynamicElimination, Final, Round, RoundError, RoundInspection, RoundManagement,
    RoundRobinFinal, SemiFinal,
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum FormatError {
    #[error("the current round still has undecided pairings")]
    RoundNotFinished,
    #[error("the bracket has reached its final round")]
    FinalRound,
    #[error("round error: {0}")]
    Round(#[from] RoundError),
}

/// The standard bracket: eliminations halve the field until four remain,
/// a semifinal seeds the final, and a three-way leftover plays a round
/// robin instead.
///
/// | finished round          | advanced | next round                    |
/// |-------------------------|----------|-------------------------------|
/// | elimination             | > 4      | another elimination           |
/// | elimination             | 4        | semifinal                     |
/// | elimination             | 3        | round robin                   |
/// | elimination             | 2        | final without third place     |
/// | semifinal               |          | final, see [`Self::next_round`] |
/// | tied round robin        |          | fresh round robin             |
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct BracketFormat;

impl BracketFormat {
    pub fn initial_round<E: Entrant>(&self) -> Round<E> {
        DynamicElimination::new().into()
    }

    /// Builds the round following a finished one.
    ///
    /// A semifinal normally seeds a full final, winners against winners and
    /// losers against losers. When entrants dropped out mid-semifinal and
    /// one side of the bracket is down to a single entrant, that entrant's
    /// pairing is already decided by elimination; the final is created with
    /// that outcome pre-recorded.
    pub fn next_round<E: Entrant>(&self, current: &Round<E>) -> Result<Round<E>, FormatError> {
        if !current.is_finished() {
            return Err(FormatError::RoundNotFinished);
        }

        match current {
            Round::DynamicElimination(round) => self.after_elimination(round),
            Round::SemiFinal(round) => self.after_semi_final(round),
            Round::RoundRobinFinal(round) if round.is_tie() => {
                let mut it = round.entrants().into_iter();
                let (first, second, third) = (
                    it.next().expect("a tied round robin has three entrants"),
                    it.next().expect("a tied round robin has three entrants"),
                    it.next().expect("a tied round robin has three entrants"),
                );
                Ok(RoundRobinFinal::new(first, second, third).into())
            }
            Round::RoundRobinFinal(_) | Round::Final(_) => Err(FormatError::FinalRound),
        }
    }

    fn after_elimination<E: Entrant>(
        &self,
        round: &DynamicElimination<E>,
    ) -> Result<Round<E>, FormatError> {
        let advanced = round.advanced_entrants();
        match advanced.len() {
            5.. => Ok(DynamicElimination::with_entrants(advanced).into()),
            4 => Ok(SemiFinal::new(advanced).into()),
            3 => {
                let mut it = advanced.into_iter();
                let (first, second, third) = (
                    it.next().expect("size checked above"),
                    it.next().expect("size checked above"),
                    it.next().expect("size checked above"),
                );
                Ok(RoundRobinFinal::new(first, second, third).into())
            }
            2 => {
                let mut it = advanced.into_iter();
                let pairing = Pairing::new(
                    it.next().expect("size checked above"),
                    it.next().expect("size checked above"),
                );
                Ok(Final::new(pairing, None)?.into())
            }
            _ => Err(FormatError::FinalRound),
        }
    }

    fn after_semi_final<E: Entrant>(&self, round: &SemiFinal<E>) -> Result<Round<E>, FormatError> {
        let advanced = round.advanced_entrants();
        let eliminated = round.eliminated_entrants();

        let pair_of = |entrants: &HashSet<E>| {
            let mut it = entrants.iter().cloned();
            Pairing::new(
                it.next().expect("size checked by caller"),
                it.next().expect("size checked by caller"),
            )
        };

        // A tied pairing eliminates both entrants, so the eliminated side
        // can hold up to four. Only the combinations below leave a playable
        // or predetermined final; anything else means the bracket is as
        // decided as it will ever get.
        match (advanced.len(), eliminated.len()) {
            // Full semifinal: winners contest first place, losers third.
            (2, 2) => {
                return Ok(Final::new(pair_of(&advanced), Some(pair_of(&eliminated)))?.into());
            }
            // Both losers dropped out: only a first-place pairing remains.
            (2, 0) => return Ok(Final::new(pair_of(&advanced), None)?.into()),
            (2, 1) | (1, 2) => {}
            _ => return Err(FormatError::FinalRound),
        }

        // One side holds two entrants, the other exactly one. The lone
        // entrant's final pairing is predetermined: their opponent would
        // have been the dropped-out entrant, so the result is known.
        let settled = if advanced.len() == 2 {
            pair_of(&advanced)
        } else {
            pair_of(&eliminated)
        };
        let lone = if advanced.len() == 1 {
            advanced.iter().next().cloned().expect("size checked above")
        } else {
            eliminated
                .iter()
                .next()
                .cloned()
                .expect("size checked above")
        };

        let mut remaining = round.finished_entrants();
        debug_assert_eq!(remaining.len(), 4);
        remaining.remove(settled.first());
        remaining.remove(settled.second());
        remaining.remove(&lone);
        let dropped = remaining
            .into_iter()
            .next()
            .expect("one finished entrant left after removals");
        let predetermined = Pairing::new(lone.clone(), dropped);

        let (first_place, third_place) = if advanced.len() == 2 {
            (settled, predetermined.clone())
        } else {
            (predetermined.clone(), settled)
        };

        let mut next = Final::new(first_place, Some(third_place))?;
        next.prioritize(&predetermined);
        let drawn = next.next_pairing()?;
        debug_assert_eq!(drawn, predetermined);
        next.declare_winner(&lone)?;
        Ok(next.into())
    }
}
