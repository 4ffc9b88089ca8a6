//! Language server error types.

use std::io;

/// Errors from the framing layer or the server loop.
#[derive(Debug, thiserror::Error)]
pub enum LspError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The peer closed the stream mid-payload.
    #[error("truncated message: expected {expected} payload bytes, got {actual}")]
    TruncatedPayload { expected: usize, actual: usize },

    /// Headers arrived without a usable Content-Length.
    #[error("missing or invalid Content-Length header")]
    MissingContentLength,
}

/// Result type alias for language server operations.
pub type LspResult<T> = Result<T, LspError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_reports_both_sizes() {
        let error = LspError::TruncatedPayload {
            expected: 32,
            actual: 7,
        };
        assert_eq!(
            error.to_string(),
            "truncated message: expected 32 payload bytes, got 7"
        );
    }
}
