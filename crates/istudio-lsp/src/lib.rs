#![deny(unsafe_code)]
//! # istudio-lsp
//!
//! A language server scaffold for IStudio.
//!
//! Speaks JSON-RPC over `Content-Length` framed stdio. The scaffold
//! answers `initialize` and `shutdown`, rejects everything else with a
//! method-not-implemented error, and ignores notifications other than
//! `exit`. Language features hang off this loop later.

pub mod error;
pub mod framing;
pub mod server;

pub use error::{LspError, LspResult};
pub use framing::{MessageReader, MessageWriter};
pub use server::{Server, ServerOptions};
