//! The top-level tournament, one round at a time.

use log::info;
use serde::{Deserialize, Serialize};
use std::mem;
use thiserror::Error;

use crate::entrant::Entrant;
use crate::format::{BracketFormat, FormatError};
use crate::pairing::Pairing;
use crate::rounds::{Round, RoundInspection, RoundManagement, RoundResult};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum TournamentError {
    #[error("the current round has already started")]
    AlreadyStarted,
    #[error("there is no round to go back to")]
    NoPreviousRound,
    #[error("{0}")]
    Format(#[from] FormatError),
}

pub type TournamentResult<T> = Result<T, TournamentError>;

/// A running tournament. Holds the current round and the one before it,
/// so an accidental round advance can be undone as long as the new round
/// has not started.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament<E: Entrant> {
    format: BracketFormat,
    previous_round: Option<Round<E>>,
    current_round: Round<E>,
}

impl<E: Entrant> Tournament<E> {
    pub fn new() -> Self {
        let format = BracketFormat;
        Self {
            current_round: format.initial_round(),
            previous_round: None,
            format,
        }
    }

    pub fn current_round(&self) -> &Round<E> {
        &self.current_round
    }

    pub fn current_round_mut(&mut self) -> &mut Round<E> {
        &mut self.current_round
    }

    /// Closes the current round and moves on to the one the format
    /// prescribes. The closed round is kept for [`Self::previous_round`].
    pub fn next_round(&mut self) -> TournamentResult<()> {
        let next = self.format.next_round(&self.current_round)?;
        info!("advancing to the {}", round_label(&next));
        self.previous_round = Some(mem::replace(&mut self.current_round, next));
        Ok(())
    }

    /// Reverts to the round before the last [`Self::next_round`] call.
    /// Only possible while the current round is untouched, and only one
    /// step back.
    pub fn previous_round(&mut self) -> TournamentResult<()> {
        if !self.current_round.active_pairings().is_empty()
            || !self.current_round.finished_pairings().is_empty()
        {
            return Err(TournamentError::AlreadyStarted);
        }
        let previous = self
            .previous_round
            .take()
            .ok_or(TournamentError::NoPreviousRound)?;
        info!("reverting to the {}", round_label(&previous));
        self.current_round = previous;
        Ok(())
    }

    pub fn add_entrant(&mut self, entrant: E) -> RoundResult<bool> {
        self.current_round.add_entrant(entrant)
    }

    pub fn remove_entrant(&mut self, entrant: &E) -> bool {
        self.current_round.remove_entrant(entrant)
    }

    pub fn reset_entrant(&mut self, entrant: &E) -> RoundResult<bool> {
        self.current_round.reset_entrant(entrant)
    }

    pub fn next_pairing(&mut self) -> RoundResult<Pairing<E>> {
        self.current_round.next_pairing()
    }

    pub fn declare_winner(&mut self, winner: &E) -> RoundResult<Pairing<E>> {
        self.current_round.declare_winner(winner)
    }

    pub fn declare_pairing_winner(&mut self, winner: &E, pairing: &Pairing<E>) -> RoundResult<()> {
        self.current_round.declare_pairing_winner(winner, pairing)
    }

    pub fn declare_tie(&mut self, pairing: &Pairing<E>) -> RoundResult<()> {
        self.current_round.declare_tie(pairing)
    }

    pub fn replay_pairing(&mut self, pairing: &Pairing<E>) -> RoundResult<bool> {
        self.current_round.replay_pairing(pairing)
    }
}

impl<E: Entrant> Default for Tournament<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn round_label<E: Entrant>(round: &Round<E>) -> &'static str {
    match round {
        Round::DynamicElimination(_) => "elimination round",
        Round::SemiFinal(_) => "semifinal",
        Round::Final(_) => "final",
        Round::RoundRobinFinal(_) => "round robin final",
    }
}
