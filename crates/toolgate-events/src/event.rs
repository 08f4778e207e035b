//! Lifecycle event types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use toolgate_core::RequestId;
use uuid::Uuid;

/// Metadata attached to every event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
    /// Correlation id shared by the events of one invocation.
    pub correlation_id: Option<Uuid>,
    /// Component that emitted the event.
    pub source: String,
}

impl EventMetadata {
    /// Create new event metadata.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            correlation_id: None,
            source: source.into(),
        }
    }

    /// Set correlation ID.
    #[must_use]
    pub fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new("unknown")
    }
}

/// Which tool ran, with what (already redacted) arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationInfo {
    /// Name the client used (MCP form, e.g. `mcp-tools___create-node`).
    pub tool_name: String,
    /// Registered tool id (e.g. `mcp-tools:create-node`).
    pub plugin_id: String,
    /// Redacted arguments.
    pub arguments: Map<String, Value>,
    /// JSON-RPC id of the originating request, if known.
    pub request_id: Option<RequestId>,
}

impl InvocationInfo {
    /// Describe an invocation. `arguments` must already be redacted.
    #[must_use]
    pub fn new(
        tool_name: impl Into<String>,
        plugin_id: impl Into<String>,
        arguments: Map<String, Value>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            plugin_id: plugin_id.into(),
            arguments,
            request_id: None,
        }
    }

    /// Attach the client request id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Option<RequestId>) -> Self {
        self.request_id = request_id;
        self
    }
}

/// Why a tool execution failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Arguments did not match the input schema.
    ValidationFailed,
    /// The access policy or rate limiter denied the call.
    AccessDenied,
    /// The tool could not be constructed.
    InstantiationFailed,
    /// No such tool.
    InvalidTool,
    /// The tool raised an error, panicked, or timed out.
    ExecutionFailed,
    /// A dry-run policy stopped the call before it ran.
    PolicyDryRun,
}

impl FailureReason {
    /// Wire name (e.g. `execution_failed`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "validation_failed",
            Self::AccessDenied => "access_denied",
            Self::InstantiationFailed => "instantiation_failed",
            Self::InvalidTool => "invalid_tool",
            Self::ExecutionFailed => "execution_failed",
            Self::PolicyDryRun => "policy_dry_run",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool execution lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// The tool is about to be instantiated and run.
    Started {
        /// Event metadata.
        metadata: EventMetadata,
        /// The invocation.
        invocation: InvocationInfo,
    },

    /// The tool returned a result.
    Succeeded {
        /// Event metadata.
        metadata: EventMetadata,
        /// The invocation.
        invocation: InvocationInfo,
        /// Wall-clock execution time.
        duration_ms: f64,
        /// Structured result returned to the client.
        result: Value,
    },

    /// The tool could not be run or did not complete.
    Failed {
        /// Event metadata.
        metadata: EventMetadata,
        /// The invocation.
        invocation: InvocationInfo,
        /// Wall-clock time until the failure.
        duration_ms: f64,
        /// Failure category.
        reason: FailureReason,
        /// Error message.
        error: String,
    },
}

impl LifecycleEvent {
    /// Event type name (`started`, `succeeded`, `failed`).
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }

    /// Event metadata.
    #[must_use]
    pub fn metadata(&self) -> &EventMetadata {
        match self {
            Self::Started { metadata, .. }
            | Self::Succeeded { metadata, .. }
            | Self::Failed { metadata, .. } => metadata,
        }
    }

    /// The invocation this event belongs to.
    #[must_use]
    pub fn invocation(&self) -> &InvocationInfo {
        match self {
            Self::Started { invocation, .. }
            | Self::Succeeded { invocation, .. }
            | Self::Failed { invocation, .. } => invocation,
        }
    }

    /// Tool name as used by the client.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        &self.invocation().tool_name
    }

    /// Whether this is a `Succeeded` or `Failed` event.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Started { .. })
    }

    /// Execution time, for terminal events.
    #[must_use]
    pub fn duration_ms(&self) -> Option<f64> {
        match self {
            Self::Started { .. } => None,
            Self::Succeeded { duration_ms, .. } | Self::Failed { duration_ms, .. } => {
                Some(*duration_ms)
            },
        }
    }

    /// Failure reason, for `Failed` events.
    #[must_use]
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::Failed { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}
