//! Config file loading.
//!
//! [`load`] runs the full pipeline:
//! 1. Read the TOML file if one is given and present (defaults otherwise)
//! 2. Deserialize into [`Config`]
//! 3. Apply environment overrides
//! 4. Validate

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::env::{apply_env_overrides, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// Maximum allowed config file size (1 MB).
pub const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Load configuration from an optional file plus the process environment.
///
/// A missing file is not an error; defaults are used instead.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file is unreadable, oversized, malformed,
/// or the final configuration fails validation.
pub fn load(path: Option<&Path>) -> ConfigResult<Config> {
    load_with_env(path, &collect_env_vars())
}

/// Same as [`load`], but with an explicit environment snapshot.
///
/// # Errors
///
/// See [`load`].
pub fn load_with_env(path: Option<&Path>, env: &HashMap<String, String>) -> ConfigResult<Config> {
    let mut config = match path {
        Some(path) => match try_read(path)? {
            Some(content) => {
                let parsed = parse(&content, &path.display().to_string())?;
                info!(path = %path.display(), "loaded gateway config");
                parsed
            },
            None => Config::default(),
        },
        None => Config::default(),
    };

    let applied = apply_env_overrides(&mut config, env);
    if applied > 0 {
        debug!(count = applied, "applied environment overrides");
    }

    validate::validate(&config)?;
    Ok(config)
}

/// Load a single config file without environment overrides.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file is missing, unreadable, oversized,
/// malformed, or fails validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let metadata = std::fs::metadata(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    check_size(path, metadata.len())?;

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let config = parse(&content, &path.display().to_string())?;
    validate::validate(&config)?;
    Ok(config)
}

/// Parse and validate an in-memory TOML document.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the document is malformed or invalid.
pub fn from_toml_str(content: &str) -> ConfigResult<Config> {
    let config = parse(content, "<inline>")?;
    validate::validate(&config)?;
    Ok(config)
}

fn parse(content: &str, origin: &str) -> ConfigResult<Config> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: origin.to_owned(),
        source: e,
    })
}

/// Read a file, returning `None` if it doesn't exist.
fn try_read(path: &Path) -> ConfigResult<Option<String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    // Checked after reading to avoid a stat/read race.
    check_size(path, u64::try_from(content.len()).unwrap_or(u64::MAX))?;
    Ok(Some(content))
}

fn check_size(path: &Path, len: u64) -> ConfigResult<()> {
    if len > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {len} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit"
            ),
        });
    }
    Ok(())
}
