//! Audit-related error types.

use thiserror::Error;

/// Errors raised by audit storage backends.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Reading or writing the audit file failed.
    #[error("audit io error on {path}: {source}")]
    Io {
        /// File involved.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Any other backend failure.
    #[error("storage error: {0}")]
    StorageError(String),
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;
