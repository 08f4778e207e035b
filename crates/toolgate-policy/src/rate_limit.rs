//! Fixed-window rate limiting for write and admin operations.
//!
//! Every permitted mutating call counts against the per-minute and per-hour
//! write windows. Destructive tools also count against the hourly delete
//! window, and admin tools against the hourly structure window. A call is
//! recorded only when every applicable window still has room.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use toolgate_config::RateLimitingConfig;
use toolgate_core::OperationKind;
use tracing::warn;

use crate::decision::AccessDecision;

const MINUTE_SECS: i64 = 60;
const HOUR_SECS: i64 = 3_600;

/// A gate consulted after the access policy allowed a mutating call.
///
/// Implementations record the call when they allow it.
pub trait RateLimiter: Send + Sync + fmt::Debug {
    /// Check (and on success record) one call.
    fn check(&self, operation_kind: OperationKind, destructive: bool) -> AccessDecision;
}

/// A limiter that allows everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRateLimit;

impl RateLimiter for NoRateLimit {
    fn check(&self, _operation_kind: OperationKind, _destructive: bool) -> AccessDecision {
        AccessDecision::allow()
    }
}

/// One counted window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitBucket {
    /// All writes, per minute.
    WritesPerMinute,
    /// All writes, per hour.
    WritesPerHour,
    /// Destructive operations, per hour.
    DeletesPerHour,
    /// Admin operations, per hour.
    StructureChangesPerHour,
}

impl RateLimitBucket {
    fn window_secs(self) -> i64 {
        match self {
            Self::WritesPerMinute => MINUTE_SECS,
            Self::WritesPerHour | Self::DeletesPerHour | Self::StructureChangesPerHour => HOUR_SECS,
        }
    }

    fn window_name(self) -> &'static str {
        match self {
            Self::WritesPerMinute => "minute",
            Self::WritesPerHour | Self::DeletesPerHour | Self::StructureChangesPerHour => "hour",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::WritesPerMinute | Self::WritesPerHour => "write",
            Self::DeletesPerHour => "delete",
            Self::StructureChangesPerHour => "structure",
        }
    }
}

/// Limits for [`FixedWindowRateLimiter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Whether limits are enforced at all.
    pub enabled: bool,
    /// Writes per minute.
    pub max_writes_per_minute: u32,
    /// Writes per hour.
    pub max_writes_per_hour: u32,
    /// Destructive operations per hour.
    pub max_deletes_per_hour: u32,
    /// Admin operations per hour.
    pub max_structure_changes_per_hour: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self::from_config(&RateLimitingConfig::default())
    }
}

impl RateLimitSettings {
    /// Build settings from the `[rate_limiting]` config section.
    #[must_use]
    pub fn from_config(config: &RateLimitingConfig) -> Self {
        Self {
            enabled: config.enabled,
            max_writes_per_minute: config.max_writes_per_minute,
            max_writes_per_hour: config.max_writes_per_hour,
            max_deletes_per_hour: config.max_deletes_per_hour,
            max_structure_changes_per_hour: config.max_structure_changes_per_hour,
        }
    }

    /// Enabled settings with the default limits.
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    fn limit(&self, bucket: RateLimitBucket) -> u32 {
        match bucket {
            RateLimitBucket::WritesPerMinute => self.max_writes_per_minute,
            RateLimitBucket::WritesPerHour => self.max_writes_per_hour,
            RateLimitBucket::DeletesPerHour => self.max_deletes_per_hour,
            RateLimitBucket::StructureChangesPerHour => self.max_structure_changes_per_hour,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    start: DateTime<Utc>,
    count: u32,
}

/// In-process fixed-window limiter shared by every invocation of a gateway.
#[derive(Debug)]
pub struct FixedWindowRateLimiter {
    settings: RateLimitSettings,
    windows: Mutex<HashMap<RateLimitBucket, Window>>,
}

impl FixedWindowRateLimiter {
    /// Create a limiter.
    #[must_use]
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            settings,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// The active settings.
    #[must_use]
    pub fn settings(&self) -> &RateLimitSettings {
        &self.settings
    }

    /// Check a call as of `now`.
    pub fn check_at(
        &self,
        operation_kind: OperationKind,
        destructive: bool,
        now: DateTime<Utc>,
    ) -> AccessDecision {
        if !self.settings.enabled || !operation_kind.is_mutating() {
            return AccessDecision::allow();
        }

        let mut buckets = vec![RateLimitBucket::WritesPerMinute, RateLimitBucket::WritesPerHour];
        if destructive {
            buckets.push(RateLimitBucket::DeletesPerHour);
        }
        if operation_kind == OperationKind::Admin {
            buckets.push(RateLimitBucket::StructureChangesPerHour);
        }

        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        for &bucket in &buckets {
            let window = windows.entry(bucket).or_insert(Window { start: now, count: 0 });
            let elapsed = now.signed_duration_since(window.start).num_seconds().max(0);
            if elapsed >= bucket.window_secs() {
                *window = Window { start: now, count: 0 };
            }

            let limit = self.settings.limit(bucket);
            if window.count >= limit {
                let remaining = bucket.window_secs().saturating_sub(elapsed).max(1);
                let retry_after = u64::try_from(remaining).unwrap_or(1);
                warn!(
                    bucket = ?bucket,
                    limit,
                    retry_after,
                    "rate limit exceeded"
                );
                return AccessDecision::rate_limited(
                    format!(
                        "Rate limit exceeded: Maximum {limit} {} operations per {}. Try again in {retry_after} seconds.",
                        bucket.noun(),
                        bucket.window_name(),
                    ),
                    retry_after,
                );
            }
        }

        for bucket in buckets {
            if let Some(window) = windows.get_mut(&bucket) {
                window.count = window.count.saturating_add(1);
            }
        }

        AccessDecision::allow()
    }

    /// Calls recorded in `bucket`'s current window.
    #[must_use]
    pub fn recorded(&self, bucket: RateLimitBucket) -> u32 {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&bucket)
            .map_or(0, |w| w.count)
    }
}

impl RateLimiter for FixedWindowRateLimiter {
    fn check(&self, operation_kind: OperationKind, destructive: bool) -> AccessDecision {
        self.check_at(operation_kind, destructive, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use toolgate_core::ErrorCode;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0().checked_add_signed(Duration::seconds(secs)).unwrap()
    }

    fn limiter(per_minute: u32) -> FixedWindowRateLimiter {
        FixedWindowRateLimiter::new(RateLimitSettings {
            max_writes_per_minute: per_minute,
            ..RateLimitSettings::enabled()
        })
    }

    #[test]
    fn test_disabled_allows_everything() {
        let limiter = FixedWindowRateLimiter::new(RateLimitSettings {
            max_writes_per_minute: 1,
            ..RateLimitSettings::default()
        });
        for _ in 0..5 {
            assert!(limiter.check_at(OperationKind::Write, false, t0()).allowed);
        }
        assert_eq!(limiter.recorded(RateLimitBucket::WritesPerMinute), 0);
    }

    #[test]
    fn test_read_not_counted() {
        let limiter = limiter(1);
        for _ in 0..3 {
            assert!(limiter.check_at(OperationKind::Read, false, t0()).allowed);
        }
        assert_eq!(limiter.recorded(RateLimitBucket::WritesPerMinute), 0);
    }

    #[test]
    fn test_minute_window_exhausted() {
        let limiter = limiter(2);
        assert!(limiter.check_at(OperationKind::Write, false, t0()).allowed);
        assert!(limiter.check_at(OperationKind::Write, false, t0()).allowed);

        let denied = limiter.check_at(OperationKind::Write, false, at(15));
        assert!(!denied.allowed);
        assert_eq!(denied.code, Some(ErrorCode::RateLimitExceeded));
        assert_eq!(denied.retry_after_seconds, Some(45));
        assert_eq!(
            denied.reason.as_deref(),
            Some("Rate limit exceeded: Maximum 2 write operations per minute. Try again in 45 seconds.")
        );
    }

    #[test]
    fn test_window_resets() {
        let limiter = limiter(1);
        assert!(limiter.check_at(OperationKind::Write, false, t0()).allowed);
        assert!(!limiter.check_at(OperationKind::Write, false, t0()).allowed);
        assert!(
            limiter
                .check_at(OperationKind::Write, false, at(60))
                .allowed
        );
    }

    #[test]
    fn test_delete_bucket_only_for_destructive() {
        let limiter = FixedWindowRateLimiter::new(RateLimitSettings {
            max_deletes_per_hour: 1,
            ..RateLimitSettings::enabled()
        });
        assert!(limiter.check_at(OperationKind::Write, true, t0()).allowed);
        let denied = limiter.check_at(OperationKind::Write, true, t0());
        assert_eq!(denied.code, Some(ErrorCode::RateLimitExceeded));
        assert!(denied.reason.unwrap().contains("delete operations per hour"));

        // Non-destructive writes are unaffected.
        assert!(limiter.check_at(OperationKind::Write, false, t0()).allowed);
    }

    #[test]
    fn test_structure_bucket_for_admin() {
        let limiter = FixedWindowRateLimiter::new(RateLimitSettings {
            max_structure_changes_per_hour: 1,
            ..RateLimitSettings::enabled()
        });
        assert!(limiter.check_at(OperationKind::Admin, false, t0()).allowed);
        let denied = limiter.check_at(OperationKind::Admin, false, t0());
        assert!(denied.reason.unwrap().contains("structure operations per hour"));
        assert_eq!(limiter.recorded(RateLimitBucket::WritesPerMinute), 1);
    }

    #[test]
    fn test_denied_call_not_recorded() {
        let limiter = FixedWindowRateLimiter::new(RateLimitSettings {
            max_deletes_per_hour: 1,
            ..RateLimitSettings::enabled()
        });
        assert!(limiter.check_at(OperationKind::Write, true, t0()).allowed);
        assert!(!limiter.check_at(OperationKind::Write, true, t0()).allowed);
        assert_eq!(limiter.recorded(RateLimitBucket::WritesPerHour), 1);
    }

    #[test]
    fn test_no_rate_limit() {
        assert!(NoRateLimit.check(OperationKind::Admin, true).allowed);
    }
}
