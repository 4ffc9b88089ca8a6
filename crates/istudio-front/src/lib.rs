#![deny(unsafe_code)]
//! # istudio-front
//!
//! Front end of the IStudio compiler.
//!
//! Turns source text into tokens with attached trivia, tokens into an
//! arena-backed AST, and provides text and JSON dumps of the tree for
//! tooling and tests.

pub mod ast;
pub mod dump;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{AstContext, AstKind, AstNode, NodeId};
pub use dump::{dump_ast_json, dump_ast_text, AstDumpOptions};
pub use error::{FrontError, FrontResult};
pub use lexer::{lex, report_unknown_tokens, Lexer};
pub use parser::{parse_expression, parse_module, Parser};
pub use token::{LexerConfig, Token, TokenKind, TokenStream, Trivia, TriviaKind};
