//! # Knockout
//!
//! An elimination tournament bracket engine using a type-safe round state
//! machine design.
//!
//! This library runs a tournament from an open field of entrants down to a
//! podium. Each round is a self-contained state machine over pairings and
//! results, dispatched through `enum_dispatch` for zero-cost trait dispatch,
//! and every mutation has an inverse so results can be corrected at any time.
//!
//! ## Architecture
//!
//! A tournament passes through four round variants:
//!
//! - **DynamicElimination**: random pairings, winners advance, entrants may
//!   join or leave mid-round
//! - **SemiFinal**: an elimination locked to the last four entrants
//! - **Final**: a first-place pairing and an optional third-place pairing
//! - **RoundRobinFinal**: three leftover entrants playing everyone against
//!   everyone
//!
//! Progression between rounds is decided by [`BracketFormat`] from the
//! number of advanced entrants, and [`Tournament`] keeps one step of round
//! history so an accidental advance can be undone.
//!
//! ## Core Modules
//!
//! - [`rounds`]: The round variants and their shared operation traits
//! - [`format`]: Bracket progression rules
//! - [`tournament`]: The top-level round manager
//!
//! ## Example
//!
//! ```
//! use knockout::{RoundInspection, Tournament};
//!
//! let mut tournament = Tournament::new();
//! for name in ["ada", "bo", "cy", "dee"] {
//!     tournament.add_entrant(name).unwrap();
//! }
//!
//! // Play the elimination round.
//! while let Ok(pairing) = tournament.next_pairing() {
//!     let winner = *pairing.first();
//!     tournament.declare_pairing_winner(&winner, &pairing).unwrap();
//! }
//! assert!(tournament.current_round().is_finished());
//!
//! // Two entrants advanced, so the next round is the final.
//! tournament.next_round().unwrap();
//! ```

pub mod entrant;
pub use entrant::Entrant;

pub mod pairing;
pub use pairing::Pairing;

pub mod placement;
pub use placement::{Placement, Standings};

/// The round variants and their shared operation traits.
pub mod rounds;
pub use rounds::{
    DynamicElimination, Final, Round, RoundError, RoundInspection, RoundManagement, RoundResult,
    RoundRobinFinal, SemiFinal,
};

/// Bracket progression rules.
pub mod format;
pub use format::{BracketFormat, FormatError};

/// The top-level round manager.
pub mod tournament;
pub use tournament::{Tournament, TournamentError, TournamentResult};

pub mod trackers;
pub mod util;
