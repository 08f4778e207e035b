//! Toolgate Telemetry - logging and tracing for the tool-execution gateway.
//!
//! This crate provides:
//! - Configurable `tracing-subscriber` setup with multiple formats and targets
//! - A per-invocation [`RequestContext`] that carries correlation ids into spans
//!
//! # Example
//!
//! ```rust,no_run
//! use toolgate_telemetry::{LogConfig, LogFormat, RequestContext, setup_logging};
//!
//! # fn main() -> Result<(), toolgate_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("toolgate_gateway=debug");
//! setup_logging(&config)?;
//!
//! let ctx = RequestContext::new("gateway").with_tool("mcp-tools/update-config");
//! let _guard = ctx.span().entered();
//! tracing::info!("invoking tool");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

#[cfg(feature = "config")]
mod bridge;
mod context;
mod error;
mod logging;

pub use context::RequestContext;
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};
