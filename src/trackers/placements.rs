//! Entrant-to-placement mapping with a consistent podium reverse index.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entrant::Entrant;
use crate::placement::Placement;

/// Maps entrants to placements and podium placements back to entrants.
///
/// At most one entrant holds each of First/Second/Third at a time; writing
/// a new placement for an entrant also retires their old podium spot.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlacementTracker<E: Entrant> {
    placements: HashMap<E, Placement>,
    podium: HashMap<Placement, E>,
}

impl<E: Entrant> PlacementTracker<E> {
    pub fn new() -> Self {
        Self {
            placements: HashMap::new(),
            podium: HashMap::new(),
        }
    }

    pub fn set(&mut self, entrant: E, placement: Placement) {
        self.clear_podium_spot(&entrant);
        if placement.is_podium() {
            self.podium.insert(placement, entrant.clone());
        }
        self.placements.insert(entrant, placement);
    }

    pub fn reset(&mut self, entrant: &E) {
        self.clear_podium_spot(entrant);
        self.placements.remove(entrant);
    }

    /// The entrant's placement; `Undetermined` if none was recorded.
    pub fn get(&self, entrant: &E) -> Placement {
        self.placements
            .get(entrant)
            .copied()
            .unwrap_or(Placement::Undetermined)
    }

    /// The entrant currently holding a podium placement, if any.
    /// Non-podium placements never have a holder.
    pub fn holder(&self, placement: Placement) -> Option<&E> {
        self.podium.get(&placement)
    }

    fn clear_podium_spot(&mut self, entrant: &E) {
        if let Some(old) = self.placements.get(entrant)
            && old.is_podium()
        {
            self.podium.remove(old);
        }
    }
}
