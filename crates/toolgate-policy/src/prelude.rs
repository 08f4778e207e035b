//! Prelude module - commonly used types for convenient import.
//!
//! Use `use toolgate_policy::prelude::*;` to import all essential types.

pub use crate::{AccessDecision, AccessPolicy, SiteFlags};

pub use crate::{FixedWindowRateLimiter, NoRateLimit, RateLimitSettings, RateLimiter};

pub use crate::resolve_scopes;
