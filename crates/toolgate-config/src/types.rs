//! Configuration types for the Toolgate gateway.
//!
//! All types in this module are self-contained with no dependencies on other
//! internal toolgate crates. Scope and kind names are kept as strings here and
//! converted to domain types at the boundary. Every struct implements
//! [`Default`] so that a bare `[section]` header in TOML produces a working
//! configuration.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration for the gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scope grants and site-wide write restrictions.
    pub access: AccessConfig,
    /// Tool exposure and execution knobs.
    pub gateway: GatewaySection,
    /// Audit trail settings.
    pub audit: AuditConfig,
    /// Write/admin rate limiting.
    pub rate_limiting: RateLimitingConfig,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// AccessConfig
// ---------------------------------------------------------------------------

/// Scope grants and site flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Global kill switch for every write/admin tool.
    pub read_only_mode: bool,
    /// Only allow writes to the kinds listed in `config_only_allowed_write_kinds`.
    pub config_only_mode: bool,
    /// Write kinds (`config`, `content`, `ops`) still allowed in config-only mode.
    pub config_only_allowed_write_kinds: Vec<String>,
    /// Maximum scopes a connection may ever hold. `None` falls back to
    /// `default_scopes`.
    pub allowed_scopes: Option<Vec<String>>,
    /// Scopes granted when no trusted override is present.
    pub default_scopes: Vec<String>,
    /// Honour the `MCP_SCOPE` environment variable (STDIO transports).
    pub trust_scopes_via_env: bool,
    /// Raw `MCP_SCOPE` value captured by the loader. Only set when
    /// `trust_scopes_via_env` is enabled.
    #[serde(skip)]
    pub scope_override: Option<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            read_only_mode: false,
            config_only_mode: false,
            config_only_allowed_write_kinds: vec!["config".to_owned()],
            allowed_scopes: None,
            default_scopes: vec!["read".to_owned()],
            trust_scopes_via_env: false,
            scope_override: None,
        }
    }
}

// ---------------------------------------------------------------------------
// GatewaySection
// ---------------------------------------------------------------------------

/// Tool exposure and execution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySection {
    /// Expose every registered tool regardless of provider.
    pub include_all_tools: bool,
    /// Only tools whose provider starts with this prefix are callable.
    pub allowed_provider_prefix: String,
    /// Upper bound on a single tool execution in milliseconds. `0` disables
    /// the timeout.
    pub execution_timeout_ms: u64,
    /// Expose only the discover/info/execute meta-tools instead of every
    /// tool.
    pub gateway_mode: bool,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            include_all_tools: false,
            allowed_provider_prefix: "mcp_tools".to_owned(),
            execution_timeout_ms: 0,
            gateway_mode: false,
        }
    }
}

// ---------------------------------------------------------------------------
// AuditConfig
// ---------------------------------------------------------------------------

/// Audit trail configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Record successful write/admin operations.
    pub enabled: bool,
    /// Actor name written into every record.
    pub actor: String,
    /// Path to a JSON-lines audit file. `None` means in-memory only.
    pub path: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            actor: "anonymous".to_owned(),
            path: None,
        }
    }
}

// ---------------------------------------------------------------------------
// RateLimitingConfig
// ---------------------------------------------------------------------------

/// Fixed-window limits applied to permitted write/admin calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitingConfig {
    /// Whether rate limiting is active.
    pub enabled: bool,
    /// Writes (of any kind) per rolling minute window.
    pub max_writes_per_minute: u32,
    /// Writes (of any kind) per hour window.
    pub max_writes_per_hour: u32,
    /// Destructive operations per hour window.
    pub max_deletes_per_hour: u32,
    /// Admin (structure) operations per hour window.
    pub max_structure_changes_per_hour: u32,
}

impl Default for RateLimitingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_writes_per_minute: 30,
            max_writes_per_hour: 500,
            max_deletes_per_hour: 50,
            max_structure_changes_per_hour: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["toolgate_gateway=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
