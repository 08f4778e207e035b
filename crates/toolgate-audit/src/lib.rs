//! Toolgate Audit - append-only record of successful mutating operations.
//!
//! This crate provides:
//! - [`AuditRecord`]: who did what to which target, with redacted details
//! - [`AuditStorage`]: pluggable persistence (log-only, in-memory, JSON lines)
//! - [`AuditLog`]: the recording front end used by the gateway
//!
//! Recording never fails from the caller's point of view. A storage error is
//! logged and dropped so that an audit outage cannot turn a completed write
//! into an error response.
//!
//! # Example
//!
//! ```
//! use serde_json::{Map, json};
//! use toolgate_audit::AuditLog;
//!
//! let log = AuditLog::in_memory("ops-bot");
//!
//! let mut details = Map::new();
//! details.insert("title".into(), json!("Hello"));
//! details.insert("api_key".into(), json!("sk-123"));
//! log.record("create_node", "content", "42", &details);
//!
//! let records = log.records().unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].details["api_key"], "[REDACTED]");
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod entry;
mod error;
mod log;
mod storage;

pub use entry::AuditRecord;
pub use error::{AuditError, AuditResult};
pub use log::AuditLog;
pub use storage::{AuditStorage, JsonlAuditStorage, LogOnlyAuditStorage, MemoryAuditStorage};
