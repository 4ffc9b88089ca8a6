#![deny(unsafe_code)]
//! # istudio-opt
//!
//! IR-to-IR optimization passes for the IStudio compiler.

pub mod constant_folding;
pub mod pass;

pub use constant_folding::ConstantFoldingPass;
pub use pass::{Pass, PassManager};
