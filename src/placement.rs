//! Final rankings awarded by the ranking rounds.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entrant::Entrant;

/// An entrant's final rank within a ranking round.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Placement {
    /// 1st place.
    First,
    /// 2nd place.
    Second,
    /// 3rd place.
    Third,
    /// Ranked, but off the podium.
    None,
    /// Not decidable yet; a later result could still change it.
    Undetermined,
}

impl Placement {
    /// Whether this placement occupies a podium spot.
    pub fn is_podium(self) -> bool {
        matches!(self, Self::First | Self::Second | Self::Third)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::First => "1st",
            Self::Second => "2nd",
            Self::Third => "3rd",
            Self::None => "none",
            Self::Undetermined => "undetermined",
        };
        write!(f, "{repr}")
    }
}

/// A snapshot of the podium of a ranking round.
///
/// A spot is `None` while its placement is still open or when the entrant
/// who would have occupied it was removed.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Standings<E: Entrant> {
    pub first: Option<E>,
    pub second: Option<E>,
    pub third: Option<E>,
}

impl<E: Entrant> Default for Standings<E> {
    fn default() -> Self {
        Self {
            first: None,
            second: None,
            third: None,
        }
    }
}
