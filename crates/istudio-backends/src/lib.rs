#![deny(unsafe_code)]
//! # istudio-backends
//!
//! Code generation targets for the IStudio compiler.
//!
//! A [`Backend`] turns an IR module into generated source files for one
//! target language. Backends never panic on unrepresentable constructs;
//! they emit explanatory comments instead, so a partially lowerable
//! module still produces inspectable output.

pub mod backend;
pub mod cpp;
pub mod error;
pub mod registry;
pub mod rust;

pub use backend::{Backend, GeneratedFile, TargetProfile};
pub use cpp::{CppBackend, CppBackendOptions};
pub use error::{BackendError, BackendResult};
pub use registry::BackendRegistry;
pub use rust::{RustBackend, RustBackendOptions};
