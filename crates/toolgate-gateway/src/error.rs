//! Gateway construction errors.
//!
//! Invocation failures are never errors: they are
//! [`ExecutionOutcome`](crate::ExecutionOutcome) variants. These cover
//! setting a gateway up.

use thiserror::Error;
use toolgate_config::ConfigError;
use toolgate_telemetry::TelemetryError;
use toolgate_tools::RegistryError;

/// Errors raised while building a gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A tool could not be registered.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Logging could not be installed.
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
}

/// Result type for gateway setup.
pub type GatewayResult<T> = Result<T, GatewayError>;
