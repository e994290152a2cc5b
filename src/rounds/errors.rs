//! Failure conditions of round operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Expected, recoverable failures of round operations.
///
/// Every variant is detected and reported at the call site; the engine
/// never retries internally. Internal invariant violations are checked with
/// assertions instead and never surface here.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum RoundError {
    #[error("no entrants are awaiting a pairing")]
    NoEntrants,
    #[error("a single pending entrant has no opponent")]
    NoOpponent,
    #[error("no pairings remain to be played")]
    NoMorePairings,
    #[error("an active pairing must be finished first")]
    UnfinishedPairings,
    #[error("entrant is not part of this round")]
    NoSuchEntrant,
    #[error("pairing is not part of this round")]
    NoSuchPairing,
    #[error("an entrant of the pairing is no longer a round member")]
    MissingEntrant,
    #[error("entrant has no active pairing")]
    MissingPairing,
    #[error("a later result already depends on this pairing")]
    OrphanedPairing,
    #[error("entrant is not awaiting a pairing")]
    EntrantNotPending,
    #[error("this round does not admit new entrants")]
    EntrantNotAllowed,
    #[error("the first and third place pairings share an entrant")]
    OverlappingPairings,
    #[error("this round variant does not support the operation")]
    UnsupportedOperation,
}

/// Convenience alias for round operation results.
pub type RoundResult<T> = Result<T, RoundError>;
