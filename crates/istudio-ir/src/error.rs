//! Lowering error types.

use istudio_front::AstKind;
use istudio_support::Span;

/// Errors produced while lowering an analyzed AST into IR.
#[derive(Debug, thiserror::Error)]
pub enum LowerError {
    /// An identifier in a function body has no lowered value.
    #[error("no lowered value for symbol '{name}' at {span}")]
    UnknownSymbol { name: String, span: Span },

    /// The operator has no counterpart in the IR op set.
    #[error("operator '{operator}' has no IR lowering at {span}")]
    UnsupportedOperator { operator: String, span: Span },

    /// The node kind cannot appear in a lowerable function body.
    #[error("{kind} nodes have no IR lowering at {span}")]
    UnsupportedNode { kind: AstKind, span: Span },

    /// A call whose callee is not a plain function name.
    #[error("only direct calls can be lowered at {span}")]
    IndirectCall { span: Span },
}

/// Result type alias for lowering operations.
pub type LowerResult<T> = Result<T, LowerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_carry_their_span() {
        let error = LowerError::UnsupportedOperator {
            operator: "<".into(),
            span: Span::new(3, 4),
        };
        assert_eq!(
            error.to_string(),
            "operator '<' has no IR lowering at [3, 4)"
        );
    }
}
