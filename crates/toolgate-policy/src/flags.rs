//! Site-wide write restrictions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use toolgate_config::AccessConfig;

/// Write kinds understood by config-only mode.
pub const KNOWN_WRITE_KINDS: &[&str] = &["config", "content", "ops"];

const DEFAULT_WRITE_KIND: &str = "config";

/// Site flags fixed for the lifetime of a gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFlags {
    /// Deny every write/admin call.
    pub read_only: bool,
    /// Restrict writes to `config_only_allowed_kinds`.
    pub config_only_mode: bool,
    /// Resource kinds writable in config-only mode. Never empty.
    pub config_only_allowed_kinds: BTreeSet<String>,
}

impl Default for SiteFlags {
    fn default() -> Self {
        Self {
            read_only: false,
            config_only_mode: false,
            config_only_allowed_kinds: normalize_write_kinds::<&str>(&[]),
        }
    }
}

impl SiteFlags {
    /// Build flags from the `[access]` config section.
    #[must_use]
    pub fn from_config(access: &AccessConfig) -> Self {
        Self {
            read_only: access.read_only_mode,
            config_only_mode: access.config_only_mode,
            config_only_allowed_kinds: normalize_write_kinds(
                &access.config_only_allowed_write_kinds,
            ),
        }
    }

    /// Set read-only mode.
    #[must_use]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Enable config-only mode with the given allowed kinds.
    #[must_use]
    pub fn with_config_only<S: AsRef<str>>(mut self, allowed_kinds: &[S]) -> Self {
        self.config_only_mode = true;
        self.config_only_allowed_kinds = normalize_write_kinds(allowed_kinds);
        self
    }

    /// Whether a write to `kind` passes the config-only restriction.
    #[must_use]
    pub fn is_write_kind_allowed(&self, kind: &str) -> bool {
        !self.config_only_mode || self.config_only_allowed_kinds.contains(kind)
    }
}

/// Keep only known write kinds; fall back to `{config}` when nothing is left.
#[must_use]
pub fn normalize_write_kinds<S: AsRef<str>>(kinds: &[S]) -> BTreeSet<String> {
    let mut normalized: BTreeSet<String> = kinds
        .iter()
        .map(|k| k.as_ref().trim().to_ascii_lowercase())
        .filter(|k| KNOWN_WRITE_KINDS.contains(&k.as_str()))
        .collect();
    if normalized.is_empty() {
        normalized.insert(DEFAULT_WRITE_KIND.to_owned());
    }
    normalized
}
