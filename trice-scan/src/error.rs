//! Error types for trice-scan.

use std::path::PathBuf;

use thiserror::Error;

use trice_core::RegistryError;

/// All errors that can arise from source tree passes.
#[derive(Debug, Error)]
pub enum ScanError {
    /// An error from the ID list.
    #[error("ID list error: {0}")]
    Registry(#[from] RegistryError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed below the source root.
    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// The source root does not exist.
    #[error("source path not found: {path}")]
    SourceNotFound { path: PathBuf },
}

/// Convenience constructor for [`ScanError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ScanError {
    ScanError::Io {
        path: path.into(),
        source,
    }
}
