//! Machine-readable error codes carried in the response envelope.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code attached to every failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input did not match the tool's declared schema.
    ValidationFailed,
    /// Generic access denial.
    AccessDenied,
    /// The site is in global read-only mode.
    ReadOnlyMode,
    /// The caller lacks the scope the operation requires.
    InsufficientScope,
    /// Config-only mode forbids writes to this resource kind.
    ConfigOnlyMode,
    /// A write/admin rate limit window is exhausted.
    RateLimitExceeded,
    /// The tool instance could not be constructed.
    InstantiationFailed,
    /// The tool is unknown or its descriptor is unusable.
    InvalidTool,
    /// The tool raised an error while executing.
    ExecutionFailed,
}

impl ErrorCode {
    /// Wire representation, e.g. `READ_ONLY_MODE`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::ReadOnlyMode => "READ_ONLY_MODE",
            Self::InsufficientScope => "INSUFFICIENT_SCOPE",
            Self::ConfigOnlyMode => "CONFIG_ONLY_MODE",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::InstantiationFailed => "INSTANTIATION_FAILED",
            Self::InvalidTool => "INVALID_TOOL",
            Self::ExecutionFailed => "EXECUTION_FAILED",
        }
    }

    /// Whether the code belongs to the access-denial family.
    #[must_use]
    pub fn is_access_denial(self) -> bool {
        matches!(
            self,
            Self::AccessDenied
                | Self::ReadOnlyMode
                | Self::InsufficientScope
                | Self::ConfigOnlyMode
                | Self::RateLimitExceeded
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_as_str() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::ReadOnlyMode,
            ErrorCode::RateLimitExceeded,
            ErrorCode::ExecutionFailed,
        ] {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, serde_json::Value::String(code.as_str().to_string()));
        }
    }

    #[test]
    fn test_access_denial_family() {
        assert!(ErrorCode::ConfigOnlyMode.is_access_denial());
        assert!(!ErrorCode::ExecutionFailed.is_access_denial());
    }
}
