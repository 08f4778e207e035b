//! Invocation request, outcome and response types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use toolgate_core::{ErrorCode, FieldError, RequestId};
use toolgate_policy::AccessDecision;
use toolgate_tools::{ToolError, ToolOutput};

/// One `tools/call` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocationRequest {
    /// Tool id or MCP tool name.
    pub tool_id: String,
    /// Raw client arguments.
    #[serde(default)]
    pub arguments: Map<String, Value>,
    /// JSON-RPC id of the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
}

impl ToolInvocationRequest {
    /// Request with no arguments.
    #[must_use]
    pub fn new(tool_id: impl Into<String>) -> Self {
        Self {
            tool_id: tool_id.into(),
            arguments: Map::new(),
            request_id: None,
        }
    }

    /// Set the arguments. Non-object values are ignored.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Value) -> Self {
        if let Value::Object(map) = arguments {
            self.arguments = map;
        }
        self
    }

    /// Set one argument.
    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }

    /// Set the JSON-RPC id.
    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<RequestId>) -> Self {
        self.request_id = Some(id.into());
        self
    }
}

/// How an invocation ended. Exactly one per call.
#[derive(Debug)]
pub enum ExecutionOutcome {
    /// The tool ran to completion. Its own `success` flag may still be false.
    Success {
        /// Tool output.
        result: ToolOutput,
        /// Execution time.
        duration_ms: f64,
    },
    /// Arguments did not match the input schema.
    ValidationFailed {
        /// Every violation, in schema order.
        errors: Vec<FieldError>,
    },
    /// Policy or rate limiter refused the call.
    AccessDenied {
        /// The refusing decision.
        decision: AccessDecision,
    },
    /// The factory could not produce an instance.
    InstantiationFailed {
        /// Factory error.
        cause: ToolError,
    },
    /// The tool is unknown, hidden or unusable.
    InvalidTool {
        /// Description for the client.
        message: String,
    },
    /// The tool failed, panicked or timed out.
    ExecutionFailed {
        /// Tool error.
        cause: ToolError,
        /// Time until the failure.
        duration_ms: f64,
    },
}

impl ExecutionOutcome {
    /// Whether the tool ran to completion.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Machine-readable code, `None` for success.
    #[must_use]
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Success { .. } => None,
            Self::ValidationFailed { .. } => Some(ErrorCode::ValidationFailed),
            Self::AccessDenied { decision } => decision.effective_code(),
            Self::InstantiationFailed { .. } => Some(ErrorCode::InstantiationFailed),
            Self::InvalidTool { .. } => Some(ErrorCode::InvalidTool),
            Self::ExecutionFailed { .. } => Some(ErrorCode::ExecutionFailed),
        }
    }

    /// Execution time, for outcomes produced after the tool started.
    #[must_use]
    pub fn duration_ms(&self) -> Option<f64> {
        match self {
            Self::Success { duration_ms, .. } | Self::ExecutionFailed { duration_ms, .. } => {
                Some(*duration_ms)
            },
            _ => None,
        }
    }
}

/// The uniform response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    /// Text shown to the calling agent.
    pub human_text: String,
    /// Machine-readable fields.
    pub structured: Value,
    /// Whether the call failed.
    pub is_error: bool,
}

impl NormalizedResponse {
    /// `error_code` field, if present.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        self.structured.get("error_code").and_then(Value::as_str)
    }

    /// `error` field, if present.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.structured.get("error").and_then(Value::as_str)
    }

    /// MCP `CallToolResult` shape.
    #[must_use]
    pub fn to_call_tool_result(&self) -> Value {
        json!({
            "content": [{ "type": "text", "text": self.human_text }],
            "isError": self.is_error,
            "structuredContent": self.structured,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ToolInvocationRequest::new("mcp_tools___create_node")
            .with_arguments(json!({"title": "Hi"}))
            .with_argument("type", json!("page"))
            .with_request_id(7_i64);
        assert_eq!(request.arguments.len(), 2);
        assert_eq!(request.request_id, Some(RequestId::Number(7)));
    }

    #[test]
    fn test_request_deserializes_without_arguments() {
        let request: ToolInvocationRequest =
            serde_json::from_value(json!({"tool_id": "x", "request_id": "abc"})).unwrap();
        assert!(request.arguments.is_empty());
        assert_eq!(request.request_id, Some(RequestId::from("abc")));
    }

    #[test]
    fn test_outcome_codes() {
        let denied = ExecutionOutcome::AccessDenied {
            decision: AccessDecision::deny(ErrorCode::ReadOnlyMode, "no"),
        };
        assert_eq!(denied.error_code(), Some(ErrorCode::ReadOnlyMode));
        assert!(denied.duration_ms().is_none());

        let ok = ExecutionOutcome::Success {
            result: ToolOutput::success("done"),
            duration_ms: 1.5,
        };
        assert!(ok.is_success());
        assert!(ok.error_code().is_none());
        assert_eq!(ok.duration_ms(), Some(1.5));
    }

    #[test]
    fn test_call_tool_result_shape() {
        let response = NormalizedResponse {
            human_text: "Done.".to_owned(),
            structured: json!({"success": true}),
            is_error: false,
        };
        let result = response.to_call_tool_result();
        assert_eq!(result["content"][0]["text"], "Done.");
        assert_eq!(result["isError"], false);
        assert_eq!(result["structuredContent"]["success"], true);
    }
}
