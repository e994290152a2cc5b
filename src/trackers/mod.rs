//! Bookkeeping state the round variants compose.

pub mod pairing_book;
pub mod placements;
pub mod results;
pub mod scores;

pub use pairing_book::PairingBook;
pub use placements::PlacementTracker;
pub use results::ResultTracker;
pub use scores::ScoreTracker;
