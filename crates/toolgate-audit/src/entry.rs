//! Audit record type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use toolgate_core::Timestamp;
use uuid::Uuid;

/// One audited operation. Records are append-only and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique record id.
    pub id: Uuid,
    /// Who performed the operation.
    pub actor: String,
    /// Operation name (e.g. `create_node`).
    pub action: String,
    /// Kind of thing acted on (e.g. `content`).
    pub target_type: String,
    /// Identifier of the thing acted on, or `-`.
    pub target_id: String,
    /// Redacted operation details.
    pub details: Map<String, Value>,
    /// Whether the operation succeeded.
    pub success: bool,
    /// When the record was created.
    pub timestamp: Timestamp,
}

impl AuditRecord {
    /// Create a record stamped with the current time.
    ///
    /// `details` are stored as given; callers redact first.
    #[must_use]
    pub fn new(
        actor: impl Into<String>,
        action: impl Into<String>,
        target_type: impl Into<String>,
        target_id: impl Into<String>,
        details: Map<String, Value>,
        success: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor: actor.into(),
            action: action.into(),
            target_type: target_type.into(),
            target_id: target_id.into(),
            details,
            success,
            timestamp: Timestamp::now(),
        }
    }

    /// One-line summary, e.g. `MCP: create_node on content "42" by ops-bot`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "MCP: {} on {} \"{}\" by {}",
            self.action, self.target_type, self.target_id, self.actor
        )
    }
}
