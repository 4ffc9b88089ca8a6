//! Driver error type.

use istudio_backends::BackendError;
use istudio_front::FrontError;
use istudio_ir::LowerError;
use istudio_lsp::LspError;
use istudio_sem::SemError;
use std::io;
use std::path::PathBuf;

/// Anything that can stop a driver command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Front(#[from] FrontError),

    #[error(transparent)]
    Sem(#[from] SemError),

    #[error(transparent)]
    Lower(#[from] LowerError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Lsp(#[from] LspError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for driver commands.
pub type CliResult<T> = Result<T, CliError>;
