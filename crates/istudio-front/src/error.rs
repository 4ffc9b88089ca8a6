//! Front-end error types.

use istudio_support::Span;

/// Errors produced while lexing or parsing IStudio source.
#[derive(Debug, thiserror::Error)]
pub enum FrontError {
    /// A rule required a different token than the one present.
    #[error("{message} at {span}")]
    Syntax { message: String, span: Span },

    /// Input ended while a rule still needed tokens.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    /// An AST dump could not be serialized.
    #[error("failed to serialize AST: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl FrontError {
    /// Builds a syntax error pointing at `span`.
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        FrontError::Syntax {
            message: message.into(),
            span,
        }
    }
}

/// Result type alias for front-end operations.
pub type FrontResult<T> = Result<T, FrontError>;
