//! The result of an access check.

use serde::{Deserialize, Serialize};
use toolgate_core::ErrorCode;

/// Outcome of [`AccessPolicy::evaluate`](crate::AccessPolicy::evaluate) or a
/// [`RateLimiter`](crate::RateLimiter) check.
///
/// `reason` and `code` are set only on denial. `retry_after_seconds` is set
/// only on rate-limit denials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Whether the call may proceed.
    pub allowed: bool,
    /// Human-readable denial reason.
    pub reason: Option<String>,
    /// Machine-readable denial code.
    pub code: Option<ErrorCode>,
    /// Seconds until a rate-limited call may be retried.
    pub retry_after_seconds: Option<u64>,
}

impl AccessDecision {
    /// An allowing decision.
    #[must_use]
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
            code: None,
            retry_after_seconds: None,
        }
    }

    /// A denial with the given code and reason.
    #[must_use]
    pub fn deny(code: ErrorCode, reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            code: Some(code),
            retry_after_seconds: None,
        }
    }

    /// A rate-limit denial.
    #[must_use]
    pub fn rate_limited(reason: impl Into<String>, retry_after_seconds: u64) -> Self {
        Self {
            retry_after_seconds: Some(retry_after_seconds),
            ..Self::deny(ErrorCode::RateLimitExceeded, reason)
        }
    }

    /// Denial code, falling back to `ACCESS_DENIED` for denials without one.
    #[must_use]
    pub fn effective_code(&self) -> Option<ErrorCode> {
        if self.allowed {
            None
        } else {
            Some(self.code.unwrap_or(ErrorCode::AccessDenied))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_has_no_reason() {
        let decision = AccessDecision::allow();
        assert!(decision.allowed);
        assert!(decision.reason.is_none());
        assert!(decision.code.is_none());
        assert!(decision.effective_code().is_none());
    }

    #[test]
    fn test_rate_limited() {
        let decision = AccessDecision::rate_limited("slow down", 12);
        assert!(!decision.allowed);
        assert_eq!(decision.code, Some(ErrorCode::RateLimitExceeded));
        assert_eq!(decision.retry_after_seconds, Some(12));
    }

    #[test]
    fn test_effective_code_defaults() {
        let mut decision = AccessDecision::deny(ErrorCode::ReadOnlyMode, "nope");
        decision.code = None;
        assert_eq!(decision.effective_code(), Some(ErrorCode::AccessDenied));
    }

    #[test]
    fn test_serializes_codes_in_wire_form() {
        let json = serde_json::to_value(AccessDecision::deny(ErrorCode::ConfigOnlyMode, "x")).unwrap();
        assert_eq!(json["code"], "CONFIG_ONLY_MODE");
    }
}
