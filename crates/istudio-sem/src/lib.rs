#![deny(unsafe_code)]
//! # istudio-sem
//!
//! Semantic analysis for the IStudio compiler.
//!
//! Walks the AST produced by `istudio-front`, builds scoped symbol tables
//! and a function registry, and infers a type for every node. Analysis
//! collects diagnostics rather than aborting on the first problem.

pub mod analyzer;
pub mod error;
pub mod registry;
pub mod symbols;
pub mod types;

pub use analyzer::{analyze_module, Analysis, SemanticAnalyzer, TypeTable};
pub use error::{SemError, SemResult};
pub use registry::{FunctionParameter, FunctionRegistry, FunctionSignature};
pub use symbols::SymbolTable;
pub use types::{Type, TypeKind};
