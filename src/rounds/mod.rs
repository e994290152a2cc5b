//! The round variants a tournament passes through.
//!
//! A round is a self-contained pairing/result state machine. The four
//! variants form a closed union so that bracket progression can match over
//! them exhaustively; adding a variant without updating the format's
//! decision table will not compile.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::entrant::Entrant;
use crate::pairing::Pairing;
use crate::placement::Placement;

pub mod dynamic_elimination;
pub mod errors;
pub mod final_round;
pub mod round_robin;
pub mod semi_final;

pub use dynamic_elimination::DynamicElimination;
pub use errors::{RoundError, RoundResult};
pub use final_round::Final;
pub use round_robin::RoundRobinFinal;
pub use semi_final::SemiFinal;

/// State-changing round operations.
///
/// Not every variant offers every operation; a variant without a meaningful
/// interpretation of an operation reports
/// [`RoundError::UnsupportedOperation`].
#[enum_dispatch]
pub trait RoundManagement<E: Entrant> {
    /// Adds an entrant to the round. Returns false if already a member.
    fn add_entrant(&mut self, entrant: E) -> RoundResult<bool>;

    /// Removes an entrant from the round, preserving any decided result
    /// where the variant supports it. Returns false if there was nothing
    /// left to remove.
    fn remove_entrant(&mut self, entrant: &E) -> bool;

    /// Returns the entrant to the pending pool, undoing their pairing or
    /// result. Returns false if there was no state to reset.
    fn reset_entrant(&mut self, entrant: &E) -> RoundResult<bool>;

    /// Draws and activates the next pairing.
    fn next_pairing(&mut self) -> RoundResult<Pairing<E>>;

    /// Declares the winner of their active pairing, looked up by entrant.
    /// Returns the finished pairing.
    fn declare_winner(&mut self, winner: &E) -> RoundResult<Pairing<E>>;

    /// Declares the winner of a specific active pairing.
    fn declare_pairing_winner(&mut self, winner: &E, pairing: &Pairing<E>) -> RoundResult<()>;

    /// Finishes an active pairing with no winner.
    fn declare_tie(&mut self, pairing: &Pairing<E>) -> RoundResult<()>;

    /// Reverts a finished pairing and reactivates it. Returns false (no
    /// effect) if the pairing is still active.
    fn replay_pairing(&mut self, pairing: &Pairing<E>) -> RoundResult<bool>;
}

/// Read-only round queries.
#[enum_dispatch]
pub trait RoundInspection<E: Entrant> {
    /// Whether the entrant is a member of this round.
    fn contains(&self, entrant: &E) -> bool;

    /// Whether the round holds any state about the entrant, including
    /// results retained after removal.
    fn has_state_about(&self, entrant: &E) -> bool;

    /// Whether the entrant has a decided outcome in this round.
    fn has_result(&self, entrant: &E) -> bool;

    fn is_pending(&self, entrant: &E) -> bool;

    fn is_paired(&self, entrant: &E) -> bool;

    /// Whether nothing remains to be played.
    fn is_finished(&self) -> bool;

    fn entrants(&self) -> HashSet<E>;

    fn pending_entrants(&self) -> HashSet<E>;

    fn active_pairings(&self) -> Vec<Pairing<E>>;

    fn finished_pairings(&self) -> Vec<Pairing<E>>;

    /// The entrant's placement. Elimination rounds never determine
    /// placements and always report `Undetermined`.
    fn placement(&self, entrant: &E) -> Placement;

    /// The entrant holding a podium placement, if decided.
    fn entrant_by_placement(&self, placement: Placement) -> Option<E>;
}

/// One stage of a tournament.
#[enum_dispatch(RoundManagement<E>, RoundInspection<E>)]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Round<E: Entrant> {
    DynamicElimination(DynamicElimination<E>),
    SemiFinal(SemiFinal<E>),
    Final(Final<E>),
    RoundRobinFinal(RoundRobinFinal<E>),
}
