//! Entrant identity.

use std::fmt::Debug;
use std::hash::Hash;

/// An opaque participant identity supplied by the caller.
///
/// The engine never creates or destroys entrant identities; it only moves
/// them in and out of round membership. Anything cheaply clonable with
/// value equality works: strings, integer ids, uuids.
pub trait Entrant: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Entrant for T {}
