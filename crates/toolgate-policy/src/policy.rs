//! Scope and site-flag access policy.
//!
//! # Check Order
//!
//! 1. `Read` -> allowed
//! 2. Site is read-only -> `READ_ONLY_MODE`
//! 3. Required scope missing (`write` for Write, `admin` for Admin) -> `INSUFFICIENT_SCOPE`
//! 4. Config-only mode and the resource kind is not allowed -> `CONFIG_ONLY_MODE`
//! 5. Otherwise -> allowed

use toolgate_core::{ErrorCode, OperationKind, ScopeSet};

use crate::decision::AccessDecision;
use crate::flags::SiteFlags;

/// Stateless access policy.
///
/// The same inputs always produce the same decision; the policy holds no
/// state and performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
    /// Create a policy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decide whether an operation may run.
    #[must_use]
    pub fn evaluate(
        &self,
        operation_kind: OperationKind,
        resource_kind: &str,
        granted: &ScopeSet,
        flags: &SiteFlags,
    ) -> AccessDecision {
        let Some(required) = operation_kind.required_scope() else {
            return AccessDecision::allow();
        };

        let label = match operation_kind {
            OperationKind::Admin => "Admin",
            _ => "Write",
        };

        if flags.read_only {
            return AccessDecision::deny(
                ErrorCode::ReadOnlyMode,
                format!("{label} operations are disabled. Site is in read-only mode."),
            );
        }

        if !granted.contains(required) {
            return AccessDecision::deny(
                ErrorCode::InsufficientScope,
                format!("{label} operations not allowed for this connection. Scope: {granted}"),
            );
        }

        if !flags.is_write_kind_allowed(resource_kind) {
            return AccessDecision::deny(
                ErrorCode::ConfigOnlyMode,
                format!(
                    "Writes to '{resource_kind}' are not allowed while config-only mode is enabled."
                ),
            );
        }

        AccessDecision::allow()
    }
}
