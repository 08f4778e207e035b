//! Prelude module - commonly used types for convenient import.
//!
//! Use `use toolgate_audit::prelude::*;` to import all essential types.

pub use crate::{AuditError, AuditResult};

pub use crate::{AuditLog, AuditRecord};

pub use crate::{AuditStorage, JsonlAuditStorage, LogOnlyAuditStorage, MemoryAuditStorage};
