//! Post-load configuration validation.
//!
//! Validates that deserialized [`Config`](crate::Config) values are within
//! acceptable ranges and that cross-field invariants hold.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Scope names understood by the access policy.
pub const KNOWN_SCOPES: &[&str] = &["read", "write", "admin"];

/// Write kinds understood by config-only mode.
pub const KNOWN_WRITE_KINDS: &[&str] = &["config", "content", "ops"];

const KNOWN_LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];

/// Validate a fully-loaded configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_access(config)?;
    validate_gateway(config)?;
    validate_audit(config)?;
    validate_rate_limiting(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_access(config: &Config) -> ConfigResult<()> {
    let access = &config.access;

    check_names("access.default_scopes", &access.default_scopes, KNOWN_SCOPES)?;
    if let Some(allowed) = &access.allowed_scopes {
        check_names("access.allowed_scopes", allowed, KNOWN_SCOPES)?;
    }
    check_names(
        "access.config_only_allowed_write_kinds",
        &access.config_only_allowed_write_kinds,
        KNOWN_WRITE_KINDS,
    )?;

    Ok(())
}

fn validate_gateway(config: &Config) -> ConfigResult<()> {
    let gateway = &config.gateway;
    if !gateway.include_all_tools && gateway.allowed_provider_prefix.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "gateway.allowed_provider_prefix".to_owned(),
            message: "must not be empty unless include_all_tools is set".to_owned(),
        });
    }
    Ok(())
}

fn validate_audit(config: &Config) -> ConfigResult<()> {
    if config.audit.enabled && config.audit.actor.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "audit.actor".to_owned(),
            message: "must not be empty while auditing is enabled".to_owned(),
        });
    }
    if let Some(path) = &config.audit.path
        && path.trim().is_empty()
    {
        return Err(ConfigError::ValidationError {
            field: "audit.path".to_owned(),
            message: "must not be an empty string; omit it for in-memory auditing".to_owned(),
        });
    }
    Ok(())
}

fn validate_rate_limiting(config: &Config) -> ConfigResult<()> {
    let limits = &config.rate_limiting;
    if !limits.enabled {
        return Ok(());
    }

    for (field, value) in [
        ("rate_limiting.max_writes_per_minute", limits.max_writes_per_minute),
        ("rate_limiting.max_writes_per_hour", limits.max_writes_per_hour),
        ("rate_limiting.max_deletes_per_hour", limits.max_deletes_per_hour),
        (
            "rate_limiting.max_structure_changes_per_hour",
            limits.max_structure_changes_per_hour,
        ),
    ] {
        if value == 0 {
            return Err(ConfigError::ValidationError {
                field: field.to_owned(),
                message: "must be greater than zero when rate limiting is enabled".to_owned(),
            });
        }
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let format = config.logging.format.as_str();
    if !KNOWN_LOG_FORMATS.contains(&format) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported format '{format}'; expected one of: {}",
                KNOWN_LOG_FORMATS.join(", ")
            ),
        });
    }
    Ok(())
}

fn check_names(field: &str, names: &[String], known: &[&str]) -> ConfigResult<()> {
    for name in names {
        let normalized = name.trim().to_ascii_lowercase();
        if !known.contains(&normalized.as_str()) {
            return Err(ConfigError::ValidationError {
                field: field.to_owned(),
                message: format!(
                    "unknown value '{name}'; expected one of: {}",
                    known.join(", ")
                ),
            });
        }
    }
    Ok(())
}
