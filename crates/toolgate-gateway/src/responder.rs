//! Maps every [`ExecutionOutcome`] onto the uniform response envelope.

use serde_json::{Map, Value, json};
use toolgate_core::{ErrorCode, FieldError};
use toolgate_policy::AccessDecision;
use toolgate_tools::{ToolError, ToolOutput};
use tracing::{debug, error, info};

use crate::outcome::{ExecutionOutcome, NormalizedResponse};

/// Hint for schema violations.
pub const VALIDATION_REMEDIATION: &str =
    "Review required fields and input types for this tool, then retry.";
/// Hint for policy denials.
pub const ACCESS_REMEDIATION: &str =
    "Ensure the MCP scopes and site settings allow this operation.";
/// Hint for rate-limit denials.
pub const RATE_LIMIT_REMEDIATION: &str = "Wait for the rate limit window to reset, then retry.";
/// Hint for factory failures.
pub const INSTANTIATION_REMEDIATION: &str =
    "Verify the tool is installed and its dependencies are available.";
/// Hint for unknown tools.
pub const INVALID_TOOL_REMEDIATION: &str =
    "Confirm the tool name and that it is enabled for this server.";
/// Hint for execution failures.
pub const EXECUTION_REMEDIATION: &str =
    "Inspect logs and retry with smaller inputs or after correcting site state.";

/// Stateless outcome formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorResponder;

impl ErrorResponder {
    /// Create a responder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the envelope for `outcome`.
    ///
    /// Instantiation and execution failures are logged at `error`; every
    /// other failure is an expected policy outcome and logs lower.
    #[must_use]
    pub fn respond(&self, outcome: &ExecutionOutcome, tool_name: &str) -> NormalizedResponse {
        match outcome {
            ExecutionOutcome::Success { result, .. } => success(result),
            ExecutionOutcome::ValidationFailed { errors } => validation_failed(tool_name, errors),
            ExecutionOutcome::AccessDenied { decision } => access_denied(tool_name, decision),
            ExecutionOutcome::InstantiationFailed { cause } => {
                error!(tool = %tool_name, error = %cause, "Failed to create tool instance");
                failure(
                    tool_name,
                    ErrorCode::InstantiationFailed,
                    &format!("Tool instantiation failed: {cause}"),
                    INSTANTIATION_REMEDIATION,
                    Map::new(),
                )
            },
            ExecutionOutcome::InvalidTool { message } => {
                debug!(tool = %tool_name, %message, "Invalid tool requested");
                failure(
                    tool_name,
                    ErrorCode::InvalidTool,
                    message,
                    INVALID_TOOL_REMEDIATION,
                    Map::new(),
                )
            },
            ExecutionOutcome::ExecutionFailed { cause, duration_ms } => {
                error!(
                    tool = %tool_name,
                    error = %cause,
                    duration_ms = *duration_ms,
                    "Tool execution failed"
                );
                failure(
                    tool_name,
                    ErrorCode::ExecutionFailed,
                    &cause_message(cause),
                    EXECUTION_REMEDIATION,
                    Map::new(),
                )
            },
        }
    }
}

fn cause_message(cause: &ToolError) -> String {
    let message = cause.to_string();
    if message.trim().is_empty() {
        "Tool execution failed.".to_owned()
    } else {
        message
    }
}

fn success(result: &ToolOutput) -> NormalizedResponse {
    let message = result.message_or_default();
    let structured = json!({
        "success": result.success,
        "message": message,
        "data": result.data,
    });

    let human_text = if result.has_data() {
        format!("{message}\n{}", pretty(&structured))
    } else {
        message.to_owned()
    };

    NormalizedResponse {
        human_text,
        structured,
        is_error: !result.success,
    }
}

fn validation_failed(tool_name: &str, errors: &[FieldError]) -> NormalizedResponse {
    debug!(tool = %tool_name, count = errors.len(), "Tool input failed validation");
    let message = errors
        .first()
        .map_or("Invalid tool input.", |e| e.message.as_str());

    let mut extra = Map::new();
    extra.insert("validation_errors".to_owned(), json!(errors));
    failure(
        tool_name,
        ErrorCode::ValidationFailed,
        message,
        VALIDATION_REMEDIATION,
        extra,
    )
}

fn access_denied(tool_name: &str, decision: &AccessDecision) -> NormalizedResponse {
    let code = decision.effective_code().unwrap_or(ErrorCode::AccessDenied);
    let message = decision
        .reason
        .clone()
        .unwrap_or_else(|| format!("Access denied for tool: {tool_name}"));
    info!(tool = %tool_name, code = %code, reason = %message, "Tool call denied");

    let remediation = if code == ErrorCode::RateLimitExceeded {
        RATE_LIMIT_REMEDIATION
    } else {
        ACCESS_REMEDIATION
    };

    let mut extra = Map::new();
    extra.insert("retry_after".to_owned(), json!(decision.retry_after_seconds));
    failure(tool_name, code, &message, remediation, extra)
}

fn failure(
    tool_name: &str,
    code: ErrorCode,
    message: &str,
    remediation: &str,
    extra: Map<String, Value>,
) -> NormalizedResponse {
    let mut structured = Map::new();
    structured.insert("success".to_owned(), Value::Bool(false));
    structured.insert("error".to_owned(), Value::from(message));
    structured.insert("error_code".to_owned(), Value::from(code.as_str()));
    structured.insert("tool".to_owned(), Value::from(tool_name));
    structured.extend(extra);
    structured.insert("remediation".to_owned(), Value::from(remediation));

    let structured = Value::Object(structured);
    NormalizedResponse {
        human_text: format!("{message}\n{}", pretty(&structured)),
        structured,
        is_error: true,
    }
}

pub(crate) fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
