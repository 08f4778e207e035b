//! Resolution of the scopes granted to a connection.

use toolgate_config::AccessConfig;
use toolgate_core::ScopeSet;
use tracing::debug;

/// Compute the effective scopes for this process.
///
/// 1. `allowed_scopes` (else `default_scopes`) caps everything; if no known
///    scope survives, the cap is `{read}`.
/// 2. The default grant is `default_scopes ∩ cap`, or the cap itself when
///    that intersection is empty.
/// 3. When `trust_scopes_via_env` is set and the loader captured an
///    `MCP_SCOPE` value, `requested ∩ cap` replaces the default if non-empty.
///
/// The result is never empty.
#[must_use]
pub fn resolve_scopes(access: &AccessConfig) -> ScopeSet {
    let cap_names = access
        .allowed_scopes
        .as_deref()
        .unwrap_or(&access.default_scopes);
    let mut cap = ScopeSet::from_names(cap_names);
    if cap.is_empty() {
        cap = ScopeSet::read_only();
    }

    let mut granted = ScopeSet::from_names(&access.default_scopes).intersection(&cap);
    if granted.is_empty() {
        granted = cap.clone();
    }

    if access.trust_scopes_via_env
        && let Some(raw) = access.scope_override.as_deref()
    {
        let requested = ScopeSet::parse_list(raw).intersection(&cap);
        if requested.is_empty() {
            debug!(requested = raw, cap = %cap, "scope override grants nothing; using defaults");
        } else {
            granted = requested;
        }
    }

    granted
}
