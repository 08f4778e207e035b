//! A subscriber that writes lifecycle events to `tracing`.

use serde_json::Value;
use toolgate_core::truncate_chars;
use tracing::{debug, error, info, warn};

use crate::event::{FailureReason, LifecycleEvent};
use crate::subscriber::EventSubscriber;

/// Default cap on the logged structured result.
pub const DEFAULT_MAX_RESULT_CHARS: usize = 2_000;

/// Logs every lifecycle event.
///
/// | Event | Level |
/// |---|---|
/// | `Started` | `debug` |
/// | `Succeeded` | `info` |
/// | `Failed` / `execution_failed` | `error` |
/// | `Failed` / `policy_dry_run` | `info` |
/// | `Failed` / other | `warn` |
#[derive(Debug, Clone)]
pub struct LoggingSubscriber {
    max_result_chars: usize,
}

impl Default for LoggingSubscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingSubscriber {
    /// Create a subscriber with the default result cap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_result_chars: DEFAULT_MAX_RESULT_CHARS,
        }
    }

    /// Override the result cap.
    #[must_use]
    pub fn with_max_result_chars(mut self, max: usize) -> Self {
        self.max_result_chars = max;
        self
    }

    /// Render a structured result for logging, capped at the configured
    /// number of characters.
    #[must_use]
    pub fn render_result(&self, result: &Value) -> String {
        let rendered = result.to_string();
        let truncated = truncate_chars(&rendered, self.max_result_chars);
        if truncated.len() == rendered.len() {
            rendered
        } else {
            format!("{truncated}...")
        }
    }
}

impl EventSubscriber for LoggingSubscriber {
    fn on_event(&self, event: &LifecycleEvent) {
        let invocation = event.invocation();
        let request_id = invocation
            .request_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        match event {
            LifecycleEvent::Started { .. } => {
                let arguments = Value::Object(invocation.arguments.clone());
                debug!(
                    tool_name = %invocation.tool_name,
                    plugin_id = %invocation.plugin_id,
                    request_id = %request_id,
                    arguments = %arguments,
                    "MCP tool execution started: {}",
                    invocation.tool_name
                );
            },
            LifecycleEvent::Succeeded {
                duration_ms,
                result,
                ..
            } => {
                info!(
                    tool_name = %invocation.tool_name,
                    plugin_id = %invocation.plugin_id,
                    request_id = %request_id,
                    duration_ms,
                    structured = %self.render_result(result),
                    "MCP tool execution succeeded: {} ({duration_ms:.2} ms)",
                    invocation.tool_name
                );
            },
            LifecycleEvent::Failed {
                duration_ms,
                reason,
                error,
                ..
            } => {
                let tool = &invocation.tool_name;
                match reason {
                    FailureReason::ExecutionFailed => error!(
                        tool_name = %tool,
                        plugin_id = %invocation.plugin_id,
                        request_id = %request_id,
                        duration_ms,
                        reason = %reason,
                        error = %error,
                        "MCP tool execution failed ({reason}): {tool} ({duration_ms:.2} ms)"
                    ),
                    FailureReason::PolicyDryRun => info!(
                        tool_name = %tool,
                        plugin_id = %invocation.plugin_id,
                        request_id = %request_id,
                        duration_ms,
                        reason = %reason,
                        error = %error,
                        "MCP tool execution failed ({reason}): {tool} ({duration_ms:.2} ms)"
                    ),
                    _ => warn!(
                        tool_name = %tool,
                        plugin_id = %invocation.plugin_id,
                        request_id = %request_id,
                        duration_ms,
                        reason = %reason,
                        error = %error,
                        "MCP tool execution failed ({reason}): {tool} ({duration_ms:.2} ms)"
                    ),
                }
            },
        }
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "logging"
    }
}
