#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Configuration for the Toolgate gateway.
//!
//! A single [`Config`] type covers access policy flags, tool exposure,
//! auditing, rate limiting, and logging.
//!
//! # Usage
//!
//! ```rust,no_run
//! use toolgate_config::Config;
//!
//! let config = Config::load(Some(std::path::Path::new("toolgate.toml"))).unwrap();
//! println!("read-only: {}", config.access.read_only_mode);
//! ```
//!
//! # Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Environment variables** (`TOOLGATE_*`, `MCP_SCOPE` when trusted)
//! 2. **Config file** (when given and present)
//! 3. **Built-in defaults**
//!
//! # Design
//!
//! This crate has **no dependencies on other internal toolgate crates**.
//! Conversion to policy and gateway types happens where those crates are
//! wired together.

/// Environment variable overrides.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use types::*;

impl Config {
    /// Load configuration from an optional file and the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is malformed or the final
    /// configuration fails validation.
    pub fn load(path: Option<&std::path::Path>) -> ConfigResult<Self> {
        loader::load(path)
    }

    /// Load a single file with no environment overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is missing, malformed, or invalid.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }

    /// Parse and validate an in-memory TOML document.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the document is malformed or invalid.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        loader::from_toml_str(content)
    }
}
