#![deny(unsafe_code)]
//! # istudio-ir
//!
//! The IStudio intermediate representation.
//!
//! Defines the IR type model and module model, lowers analyzed ASTs into
//! IR, and prints IR modules in their text form. Backends consume the
//! [`IrModule`] produced here.

pub mod error;
pub mod lowering;
pub mod module;
pub mod printer;
pub mod types;

pub use error::{LowerError, LowerResult};
pub use lowering::lower_module;
pub use module::{IrField, IrFunction, IrModule, IrParameter, IrStruct, IrValue};
pub use printer::print_module;
pub use types::{IrType, IrTypeKind};
