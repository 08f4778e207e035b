//! Process-wide settings every invocation reads.

use std::sync::Arc;
use std::time::Duration;

use toolgate_config::Config;
use toolgate_core::ScopeSet;
use toolgate_policy::{
    FixedWindowRateLimiter, NoRateLimit, RateLimitSettings, RateLimiter, SiteFlags, resolve_scopes,
};
use toolgate_tools::ProviderFilter;

/// Scopes, site flags and execution knobs, fixed for the gateway's lifetime.
#[derive(Debug, Clone)]
pub struct GatewayContext {
    /// Scopes granted to this connection.
    pub scopes: ScopeSet,
    /// Site-wide write restrictions.
    pub site_flags: SiteFlags,
    /// Which providers' tools are callable.
    pub provider_filter: ProviderFilter,
    /// Upper bound on one tool execution.
    pub execution_timeout: Option<Duration>,
    /// Gate consulted after an allowed write/admin decision.
    pub rate_limiter: Arc<dyn RateLimiter>,
    /// Serve the discover/info/execute meta-tools instead of the registry.
    pub gateway_mode: bool,
}

impl Default for GatewayContext {
    fn default() -> Self {
        Self {
            scopes: ScopeSet::read_only(),
            site_flags: SiteFlags::default(),
            provider_filter: ProviderFilter::default(),
            execution_timeout: None,
            rate_limiter: Arc::new(NoRateLimit),
            gateway_mode: false,
        }
    }
}

impl GatewayContext {
    /// Derive the context from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let settings = RateLimitSettings::from_config(&config.rate_limiting);
        let rate_limiter: Arc<dyn RateLimiter> = if settings.enabled {
            Arc::new(FixedWindowRateLimiter::new(settings))
        } else {
            Arc::new(NoRateLimit)
        };

        let timeout_ms = config.gateway.execution_timeout_ms;
        Self {
            scopes: resolve_scopes(&config.access),
            site_flags: SiteFlags::from_config(&config.access),
            provider_filter: ProviderFilter::new(
                config.gateway.include_all_tools,
                &config.gateway.allowed_provider_prefix,
            ),
            execution_timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
            rate_limiter,
            gateway_mode: config.gateway.gateway_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolgate_core::Scope;

    #[test]
    fn test_default_is_read_only_scope() {
        let context = GatewayContext::default();
        assert!(context.scopes.contains(Scope::Read));
        assert!(!context.scopes.contains(Scope::Write));
        assert!(context.execution_timeout.is_none());
        assert!(!context.gateway_mode);
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.access.default_scopes = vec!["read".to_owned(), "write".to_owned()];
        config.access.read_only_mode = true;
        config.gateway.execution_timeout_ms = 250;
        config.gateway.include_all_tools = true;
        config.gateway.gateway_mode = true;

        let context = GatewayContext::from_config(&config);
        assert!(context.scopes.contains(Scope::Write));
        assert!(context.site_flags.read_only);
        assert_eq!(context.execution_timeout, Some(Duration::from_millis(250)));
        assert_eq!(context.provider_filter, ProviderFilter::All);
        assert!(context.gateway_mode);
    }
}
