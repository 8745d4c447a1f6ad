//! Error types for trice-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Underlying I/O failure while reading or writing the list file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The ID list file did not exist at the expected path.
    #[error("ID list not found at {path}")]
    ListNotFound { path: PathBuf },

    /// JSON parse error on load, carrying the file path and serde_json's line/column context.
    #[error("failed to parse ID list at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error (save path).
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No item carries the requested identifier.
    #[error("unknown ID {id}")]
    NotFound { id: u16 },

    /// Every identifier in 1..=65535 is bound to an item.
    #[error("ID space exhausted: all {} identifiers are in use", crate::types::TraceId::MAX)]
    AllocationExhausted,

    /// An identifier outside 1..=65535 was supplied.
    #[error("invalid ID {0}; expected 1..=65535")]
    InvalidId(u32),
}

/// Convenience constructor for [`RegistryError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RegistryError {
    RegistryError::Io {
        path: path.into(),
        source,
    }
}
