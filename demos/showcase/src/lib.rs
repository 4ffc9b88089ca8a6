#![deny(unsafe_code)]
//! # istudio-showcase
//!
//! The three example modules the IStudio demo programs compile down to,
//! kept as a library so their behavior is pinned by tests: a generic
//! pair container, integer arithmetic, and string greetings.

pub mod math;
pub mod pair;
pub mod strings;

pub use math::{add, triple};
pub use pair::{make_pair, swap, Pair};
pub use strings::{decorated, greet};
