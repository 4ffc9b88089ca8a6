//! A generic two-slot immutable container.

use serde::{Deserialize, Serialize};

/// An ordered 2-tuple of two values of the same type.
///
/// Fields never change after construction; [`swap`] produces a new pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair<T> {
    pub first: T,
    pub second: T,
}

/// Builds a pair holding the two inputs unchanged, in order.
pub fn make_pair<T>(first: T, second: T) -> Pair<T> {
    Pair { first, second }
}

/// A new pair with the slots interchanged.
///
/// `swap(swap(p)) == p` for every `p`.
pub fn swap<T>(p: Pair<T>) -> Pair<T> {
    Pair {
        first: p.second,
        second: p.first,
    }
}
