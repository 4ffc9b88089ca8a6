#![deny(unsafe_code)]
//! # istudio-support
//!
//! Shared infrastructure for the IStudio compiler pipeline.
//!
//! Provides source spans, the diagnostic code space and reporter used by
//! every phase, and the build version string surfaced by the tooling.

pub mod diagnostics;
pub mod span;
pub mod version;

pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticReporter};
pub use span::Span;
pub use version::{version, version_string};
