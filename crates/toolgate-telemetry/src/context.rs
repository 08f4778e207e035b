//! Per-invocation request context.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation data for one tool invocation.
///
/// The gateway creates one of these per call and runs the whole pipeline
/// inside [`RequestContext::span`], so every log line emitted by policy,
/// tools, subscribers, and audit carries the same `request_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Unique id for this invocation.
    pub request_id: Uuid,
    /// Correlation id shared with related invocations.
    pub correlation_id: Uuid,
    /// JSON-RPC id supplied by the MCP client, if any.
    pub client_request_id: Option<String>,
    /// Component that created the context.
    pub source: String,
    /// Tool being invoked.
    pub tool: Option<String>,
    /// When the invocation started.
    pub started_at: DateTime<Utc>,
    /// Free-form extra fields.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl RequestContext {
    /// Create a new context.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let id = Uuid::new_v4();
        Self {
            request_id: id,
            correlation_id: id,
            client_request_id: None,
            source: source.into(),
            tool: None,
            started_at: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Set the tool name.
    #[must_use]
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Set the client-supplied request id.
    #[must_use]
    pub fn with_client_request_id(mut self, id: impl Into<String>) -> Self {
        self.client_request_id = Some(id.into());
        self
    }

    /// Set the correlation id.
    #[must_use]
    pub fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = id;
        self
    }

    /// Add metadata.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Milliseconds since the context was created. Never negative.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.started_at)
            .num_milliseconds()
            .max(0)
    }

    /// Tracing span carrying this context's ids.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "tool_invocation",
            request_id = %self.request_id,
            correlation_id = %self.correlation_id,
            client_request_id = self.client_request_id.as_deref(),
            source = %self.source,
            tool = self.tool.as_deref(),
        )
    }

    /// First eight characters of the request id.
    #[must_use]
    pub fn short_id(&self) -> String {
        self.request_id.simple().to_string().chars().take(8).collect()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new("unknown")
    }
}
