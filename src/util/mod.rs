//! Generic containers backing the round state machines.

pub mod pair_index;
pub mod random_pick_set;

pub use pair_index::{MultiPairIndex, PairConflictError, UniquePairIndex};
pub use random_pick_set::{EmptySetError, RandomPickSet};
