//! Backend error types.

/// Errors from selecting or running a backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// No registered backend answers to the requested name.
    #[error("no backend registered for target '{0}'")]
    UnknownTarget(String),

    /// The module cannot be emitted at all (not even as comments).
    #[error("backend '{backend}' cannot emit module '{module}': {reason}")]
    Emit {
        backend: String,
        module: String,
        reason: String,
    },
}

/// Result type alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
