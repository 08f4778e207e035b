//! Environment variable overrides.
//!
//! Only a small, fixed set of variables is consulted:
//!
//! | Variable | Effect |
//! |---|---|
//! | `TOOLGATE_READ_ONLY` | forces `access.read_only_mode` |
//! | `TOOLGATE_CONFIG_ONLY` | forces `access.config_only_mode` |
//! | `TOOLGATE_LOG` | overrides `logging.level` |
//! | `MCP_SCOPE` | captured as the scope override when `access.trust_scopes_via_env` is set |

use std::collections::HashMap;

use tracing::warn;

use crate::types::Config;

/// Read-only mode override.
pub const ENV_READ_ONLY: &str = "TOOLGATE_READ_ONLY";
/// Config-only mode override.
pub const ENV_CONFIG_ONLY: &str = "TOOLGATE_CONFIG_ONLY";
/// Log level override.
pub const ENV_LOG: &str = "TOOLGATE_LOG";
/// Per-process scope request for STDIO transports.
pub const ENV_SCOPE: &str = "MCP_SCOPE";

/// Snapshot the environment variables this crate cares about.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with("TOOLGATE_") || key == ENV_SCOPE)
        .collect()
}

/// Apply overrides from `env` onto `config`.
///
/// Returns the number of fields that were changed.
pub fn apply_env_overrides(config: &mut Config, env: &HashMap<String, String>) -> usize {
    let mut applied: usize = 0;

    if let Some(raw) = env.get(ENV_READ_ONLY) {
        match parse_flag(raw) {
            Some(value) => {
                config.access.read_only_mode = value;
                applied = applied.saturating_add(1);
            },
            None => warn!(var = ENV_READ_ONLY, value = %raw, "ignoring non-boolean override"),
        }
    }

    if let Some(raw) = env.get(ENV_CONFIG_ONLY) {
        match parse_flag(raw) {
            Some(value) => {
                config.access.config_only_mode = value;
                applied = applied.saturating_add(1);
            },
            None => warn!(var = ENV_CONFIG_ONLY, value = %raw, "ignoring non-boolean override"),
        }
    }

    if let Some(level) = env.get(ENV_LOG).filter(|v| !v.trim().is_empty()) {
        config.logging.level = level.trim().to_owned();
        applied = applied.saturating_add(1);
    }

    if config.access.trust_scopes_via_env
        && let Some(scope) = env.get(ENV_SCOPE).filter(|v| !v.trim().is_empty())
    {
        config.access.scope_override = Some(scope.clone());
        applied = applied.saturating_add(1);
    }

    applied
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
