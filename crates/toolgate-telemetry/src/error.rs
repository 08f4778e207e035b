//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Invalid filter level or directive.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A global subscriber is already installed, or installation failed.
    #[error("Initialization error: {0}")]
    InitError(String),

    /// IO error (log directory creation).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
