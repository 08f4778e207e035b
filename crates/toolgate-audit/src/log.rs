//! Audit log - the recording front end.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Map, Value};
use toolgate_config::AuditConfig;
use toolgate_core::redact_details;
use tracing::{debug, error, info};

use crate::entry::AuditRecord;
use crate::error::AuditResult;
use crate::storage::{AuditStorage, JsonlAuditStorage, LogOnlyAuditStorage, MemoryAuditStorage};

const DEFAULT_ACTOR: &str = "anonymous";

/// Records successful mutating operations.
#[derive(Debug, Clone)]
pub struct AuditLog {
    storage: Arc<dyn AuditStorage>,
    actor: String,
    enabled: bool,
}

impl AuditLog {
    /// Create a log over `storage`, attributing records to `actor`.
    #[must_use]
    pub fn new(storage: Arc<dyn AuditStorage>, actor: impl Into<String>) -> Self {
        let actor = actor.into();
        Self {
            storage,
            actor: if actor.trim().is_empty() {
                DEFAULT_ACTOR.to_owned()
            } else {
                actor
            },
            enabled: true,
        }
    }

    /// An enabled log backed by [`MemoryAuditStorage`].
    #[must_use]
    pub fn in_memory(actor: impl Into<String>) -> Self {
        Self::new(Arc::new(MemoryAuditStorage::new()), actor)
    }

    /// An enabled log that only writes the `tracing` summary line.
    #[must_use]
    pub fn log_only(actor: impl Into<String>) -> Self {
        Self::new(Arc::new(LogOnlyAuditStorage::new()), actor)
    }

    /// A log that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self::log_only(DEFAULT_ACTOR).with_enabled(false)
    }

    /// Build from the `[audit]` config section.
    ///
    /// A configured `path` selects [`JsonlAuditStorage`]; otherwise records
    /// are only logged.
    #[must_use]
    pub fn from_config(config: &AuditConfig) -> Self {
        let storage: Arc<dyn AuditStorage> = match &config.path {
            Some(path) => Arc::new(JsonlAuditStorage::new(PathBuf::from(path))),
            None => Arc::new(LogOnlyAuditStorage::new()),
        };
        Self::new(storage, config.actor.clone()).with_enabled(config.enabled)
    }

    /// Enable or disable recording.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether records are being written.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Actor attributed to every record.
    #[must_use]
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Record a successful operation. Never fails.
    pub fn record(&self, action: &str, target_type: &str, target_id: &str, details: &Map<String, Value>) {
        if !self.enabled {
            debug!(action, "audit disabled; skipping record");
            return;
        }

        let record = AuditRecord::new(
            self.actor.clone(),
            action,
            target_type,
            target_id,
            redact_details(details),
            true,
        );

        let summary = if record.details.is_empty() {
            record.summary()
        } else {
            format!(
                "{} | Details: {}",
                record.summary(),
                Value::Object(record.details.clone())
            )
        };
        info!(audit_id = %record.id, "{summary}");

        if let Err(e) = self.storage.append(&record) {
            error!(
                audit_id = %record.id,
                action,
                target_type,
                error = %e,
                "failed to persist audit record"
            );
        }
    }

    /// Read back every stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be read.
    pub fn records(&self) -> AuditResult<Vec<AuditRecord>> {
        self.storage.records()
    }
}
