//! Semantic-analysis error types.
//!
//! Diagnostics about the analyzed program are collected, not returned as
//! errors. `SemError` covers misuse of the analysis API itself.

use istudio_front::AstKind;

/// Errors from calling the semantic API incorrectly.
#[derive(Debug, thiserror::Error)]
pub enum SemError {
    /// `analyze_module` was handed a node that is not a `Module`.
    #[error("expected a Module node but got {0}")]
    NotAModule(AstKind),
}

/// Result type alias for semantic operations.
pub type SemResult<T> = Result<T, SemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_module_names_the_kind() {
        let error = SemError::NotAModule(AstKind::LetStmt);
        assert_eq!(error.to_string(), "expected a Module node but got LetStmt");
    }
}
