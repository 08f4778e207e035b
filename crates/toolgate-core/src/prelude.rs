//! Prelude module - commonly used types for convenient import.
//!
//! Use `use toolgate_core::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use toolgate_core::prelude::*;
//!
//! let scopes = ScopeSet::parse_list("read, write");
//! assert!(scopes.contains(Scope::Write));
//! assert!(OperationKind::Admin.is_mutating());
//! ```

// Error codes
pub use crate::ErrorCode;

// Common types
pub use crate::{FieldError, OperationKind, RequestId, Scope, ScopeSet, Timestamp};

// Redaction
pub use crate::{REDACTED, redact_arguments, redact_details};
