//! Toolgate Policy - access decisions for tool invocations.
//!
//! Two gates sit in front of every mutating tool:
//!
//! - [`AccessPolicy`]: a pure function of the operation kind, the resource
//!   kind, the granted scopes, and the site flags. Read operations always pass.
//! - [`RateLimiter`]: a stateful gate consulted only after the policy allowed
//!   a write or admin call.
//!
//! # Example
//!
//! ```
//! use toolgate_core::{ErrorCode, OperationKind, ScopeSet};
//! use toolgate_policy::{AccessPolicy, SiteFlags};
//!
//! let policy = AccessPolicy::new();
//! let flags = SiteFlags::default();
//!
//! let decision = policy.evaluate(OperationKind::Write, "content", &ScopeSet::read_only(), &flags);
//! assert!(!decision.allowed);
//! assert_eq!(decision.code, Some(ErrorCode::InsufficientScope));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod decision;
pub mod flags;
pub mod policy;
pub mod rate_limit;
pub mod scopes;

pub use decision::AccessDecision;
pub use flags::{KNOWN_WRITE_KINDS, SiteFlags, normalize_write_kinds};
pub use policy::AccessPolicy;
pub use rate_limit::{
    FixedWindowRateLimiter, NoRateLimit, RateLimitBucket, RateLimitSettings, RateLimiter,
};
pub use scopes::resolve_scopes;
