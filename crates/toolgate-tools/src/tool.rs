//! The executable side of a tool.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ToolResult;

/// Message used when a successful tool reports none.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Success.";

/// Message used when a failed tool reports none.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Tool execution failed.";

/// What a tool returns when it runs to completion.
///
/// `success: false` is a tool-level result, not an error: the tool ran and
/// decided the operation did not happen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Whether the operation took effect.
    pub success: bool,
    /// Human-readable summary. May be empty.
    #[serde(default)]
    pub message: String,
    /// Structured payload.
    #[serde(default)]
    pub data: Value,
    /// Id of the resource the tool touched, used for auditing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
}

impl ToolOutput {
    /// Successful output with a message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Value::Null,
            target_id: None,
        }
    }

    /// Unsuccessful output with a message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::success(message)
        }
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Record the id of the affected resource.
    #[must_use]
    pub fn with_target_id(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    /// The message, or a default based on `success` when empty.
    #[must_use]
    pub fn message_or_default(&self) -> &str {
        if !self.message.trim().is_empty() {
            &self.message
        } else if self.success {
            DEFAULT_SUCCESS_MESSAGE
        } else {
            DEFAULT_FAILURE_MESSAGE
        }
    }

    /// Whether the payload carries anything worth rendering.
    #[must_use]
    pub fn has_data(&self) -> bool {
        match &self.data {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Bool(_) | Value::Number(_) => true,
        }
    }
}

/// A tool instance ready to execute.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Run the tool with validated, upcast arguments.
    async fn execute(&self, arguments: Map<String, Value>) -> ToolResult<ToolOutput>;
}

/// Produces tool instances on demand.
pub trait ToolFactory: Send + Sync {
    /// Create an instance for one invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be constructed.
    fn create(&self) -> ToolResult<Arc<dyn Tool>>;
}

/// Factory that hands out the same shared instance every time.
#[derive(Clone)]
pub struct SharedToolFactory {
    tool: Arc<dyn Tool>,
}

impl SharedToolFactory {
    /// Wrap an instance.
    #[must_use]
    pub fn new(tool: Arc<dyn Tool>) -> Self {
        Self { tool }
    }
}

impl fmt::Debug for SharedToolFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedToolFactory").finish_non_exhaustive()
    }
}

impl ToolFactory for SharedToolFactory {
    fn create(&self) -> ToolResult<Arc<dyn Tool>> {
        Ok(Arc::clone(&self.tool))
    }
}

/// Factory backed by a closure.
pub struct FnToolFactory<F> {
    build: F,
}

impl<F> FnToolFactory<F>
where
    F: Fn() -> ToolResult<Arc<dyn Tool>> + Send + Sync,
{
    /// Wrap a constructor closure.
    #[must_use]
    pub fn new(build: F) -> Self {
        Self { build }
    }
}

impl<F> fmt::Debug for FnToolFactory<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnToolFactory").finish_non_exhaustive()
    }
}

impl<F> ToolFactory for FnToolFactory<F>
where
    F: Fn() -> ToolResult<Arc<dyn Tool>> + Send + Sync,
{
    fn create(&self) -> ToolResult<Arc<dyn Tool>> {
        (self.build)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use serde_json::json;

    struct Echo;

    #[async_trait::async_trait]
    impl Tool for Echo {
        async fn execute(&self, arguments: Map<String, Value>) -> ToolResult<ToolOutput> {
            Ok(ToolOutput::success("").with_data(Value::Object(arguments)))
        }
    }

    #[test]
    fn test_default_messages() {
        assert_eq!(ToolOutput::success("").message_or_default(), "Success.");
        assert_eq!(
            ToolOutput::failure("  ").message_or_default(),
            "Tool execution failed."
        );
        assert_eq!(ToolOutput::success("Saved").message_or_default(), "Saved");
    }

    #[test]
    fn test_has_data() {
        assert!(!ToolOutput::success("x").has_data());
        assert!(!ToolOutput::success("x").with_data(json!({})).has_data());
        assert!(ToolOutput::success("x").with_data(json!({"nid": 1})).has_data());
        assert!(ToolOutput::success("x").with_data(json!(0)).has_data());
    }

    #[tokio::test]
    async fn test_shared_factory_reuses_instance() {
        let factory = SharedToolFactory::new(Arc::new(Echo));
        let a = factory.create().unwrap();
        let b = factory.create().unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let mut args = Map::new();
        args.insert("k".to_owned(), json!("v"));
        let out = a.execute(args).await.unwrap();
        assert_eq!(out.data, json!({"k": "v"}));
    }

    #[test]
    fn test_fn_factory_propagates_errors() {
        let factory = FnToolFactory::new(|| -> ToolResult<Arc<dyn Tool>> {
            Err(ToolError::InstantiationFailed("missing service".to_owned()))
        });
        let err = factory.create().err().unwrap();
        assert!(err.to_string().contains("missing service"));
    }
}
