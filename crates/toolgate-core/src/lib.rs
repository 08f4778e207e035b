//! Toolgate Core - Foundation types for the Toolgate tool-execution gateway.
//!
//! This crate provides:
//! - Access scopes and operation kinds
//! - The machine-readable error code vocabulary of the response envelope
//! - Request identifiers and timestamps
//! - Field-level validation errors
//! - Redaction of sensitive argument values

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod code;
pub mod redact;
pub mod types;
pub mod utils;

pub use code::ErrorCode;
pub use redact::{
    ARGUMENT_SENSITIVE_KEYS, DETAIL_SENSITIVE_KEYS, REDACTED, redact_arguments, redact_details,
};
pub use types::{
    FieldError, OperationKind, RequestId, Scope, ScopeParseError, ScopeSet, Timestamp,
};
pub use utils::truncate_chars;
