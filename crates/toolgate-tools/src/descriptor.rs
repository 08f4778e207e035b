//! Static metadata describing a tool.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use toolgate_core::OperationKind;

use crate::error::{RegistryError, RegistryResult};
use crate::schema::InputSchema;

/// Separator used in tool ids (`provider:name`).
pub const ID_SEPARATOR: &str = ":";

/// Stand-in for [`ID_SEPARATOR`] in MCP tool names, which may not contain colons.
pub const MCP_SEPARATOR: &str = "___";

/// Convert an MCP tool name back to a tool id.
#[must_use]
pub fn mcp_name_to_id(name: &str) -> String {
    name.replace(MCP_SEPARATOR, ID_SEPARATOR)
}

/// Convert a tool id to its MCP tool name.
#[must_use]
pub fn id_to_mcp_name(id: &str) -> String {
    id.replace(ID_SEPARATOR, MCP_SEPARATOR)
}

/// Everything the gateway needs to know about a tool before running it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique id, e.g. `mcp_tools:create_node`.
    pub id: String,
    /// Short human-readable name.
    pub label: String,
    /// What the tool does.
    pub description: String,
    /// Grouping used by listings.
    pub category: String,
    /// Module that provides the tool. Matched against the provider filter.
    pub provider: String,
    /// Declared mutation level. Trusted as-is.
    pub operation_kind: OperationKind,
    /// Kind of resource written (`config`, `content`, `ops`).
    pub resource_kind: String,
    /// Whether the tool deletes data.
    #[serde(default)]
    pub destructive: bool,
    /// Declared inputs.
    #[serde(default)]
    pub input_schema: InputSchema,
    /// JSON Schema of the tool's `data` payload, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
    /// Audit action name. Defaults to the tool id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_action: Option<String>,
    /// Argument holding the id of the affected resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_argument: Option<String>,
}

impl ToolDescriptor {
    /// Create a descriptor with empty metadata and no inputs.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        provider: impl Into<String>,
        operation_kind: OperationKind,
        resource_kind: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            description: String::new(),
            category: String::new(),
            provider: provider.into(),
            operation_kind,
            resource_kind: resource_kind.into(),
            destructive: false,
            input_schema: InputSchema::new(),
            output_schema: None,
            audit_action: None,
            target_argument: None,
        }
    }

    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Mark the tool as destructive.
    #[must_use]
    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }

    /// Set the input schema.
    #[must_use]
    pub fn with_input_schema(mut self, schema: InputSchema) -> Self {
        self.input_schema = schema;
        self
    }

    /// Set the output schema.
    #[must_use]
    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Set the audit action name.
    #[must_use]
    pub fn with_audit_action(mut self, action: impl Into<String>) -> Self {
        self.audit_action = Some(action.into());
        self
    }

    /// Name the argument that identifies the affected resource.
    #[must_use]
    pub fn with_target_argument(mut self, argument: impl Into<String>) -> Self {
        self.target_argument = Some(argument.into());
        self
    }

    /// Name exposed over MCP.
    #[must_use]
    pub fn mcp_name(&self) -> String {
        id_to_mcp_name(&self.id)
    }

    /// Audit action, falling back to the tool id.
    #[must_use]
    pub fn audit_action(&self) -> &str {
        self.audit_action.as_deref().unwrap_or(&self.id)
    }

    /// MCP `tools/list` entry for this tool.
    #[must_use]
    pub fn to_mcp_definition(&self) -> Value {
        let read_only = self.operation_kind == OperationKind::Read;
        json!({
            "name": self.mcp_name(),
            "title": self.label,
            "description": self.description,
            "inputSchema": self.input_schema.to_json_schema(),
            "annotations": {
                "title": self.label,
                "readOnlyHint": read_only,
                "destructiveHint": self.destructive,
                "idempotentHint": read_only,
                "openWorldHint": false,
            },
        })
    }

    /// Check that the descriptor is usable.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidDescriptor`] if the id is empty or
    /// already contains the MCP separator, the provider is empty, a mutating
    /// tool has no resource kind, or the input schema is malformed.
    pub fn validate(&self) -> RegistryResult<()> {
        let invalid = |reason: String| RegistryError::InvalidDescriptor {
            id: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty".to_owned()));
        }
        if self.id.contains(MCP_SEPARATOR) {
            return Err(invalid(format!("id must not contain '{MCP_SEPARATOR}'")));
        }
        if self.provider.trim().is_empty() {
            return Err(invalid("provider must not be empty".to_owned()));
        }
        if self.operation_kind.is_mutating() && self.resource_kind.trim().is_empty() {
            return Err(invalid(format!(
                "{} tools must declare a resource kind",
                self.operation_kind
            )));
        }
        if let Some(target) = &self.target_argument
            && target.trim().is_empty()
        {
            return Err(invalid("target argument must not be empty".to_owned()));
        }
        self.input_schema.check().map_err(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, FieldType};

    fn delete_node() -> ToolDescriptor {
        ToolDescriptor::new("mcp_tools:delete_node", "mcp_tools", OperationKind::Write, "content")
            .with_label("Delete node")
            .destructive()
            .with_target_argument("nid")
            .with_input_schema(
                InputSchema::new().field(FieldSpec::required("nid", FieldType::Integer)),
            )
    }

    #[test]
    fn test_name_mapping() {
        assert_eq!(id_to_mcp_name("mcp_tools:create_node"), "mcp_tools___create_node");
        assert_eq!(mcp_name_to_id("mcp_tools___create_node"), "mcp_tools:create_node");
        assert_eq!(mcp_name_to_id("mcp_tools:create_node"), "mcp_tools:create_node");
        assert_eq!(delete_node().mcp_name(), "mcp_tools___delete_node");
    }

    #[test]
    fn test_audit_action_defaults_to_id() {
        let descriptor = delete_node();
        assert_eq!(descriptor.audit_action(), "mcp_tools:delete_node");
        let descriptor = descriptor.with_audit_action("delete_node");
        assert_eq!(descriptor.audit_action(), "delete_node");
    }

    #[test]
    fn test_validate() {
        assert!(delete_node().validate().is_ok());

        let mut bad = delete_node();
        bad.id = "mcp_tools___x".to_owned();
        assert!(bad.validate().is_err());

        let mut bad = delete_node();
        bad.resource_kind = String::new();
        assert!(bad.validate().is_err());

        let read = ToolDescriptor::new("mcp_tools:status", "mcp_tools", OperationKind::Read, "");
        assert!(read.validate().is_ok());
    }

    #[test]
    fn test_mcp_definition() {
        let def = delete_node().to_mcp_definition();
        assert_eq!(def["name"], "mcp_tools___delete_node");
        assert_eq!(def["annotations"]["destructiveHint"], true);
        assert_eq!(def["annotations"]["readOnlyHint"], false);
        assert_eq!(def["inputSchema"]["required"], json!(["nid"]));
    }

    #[test]
    fn test_descriptor_deserializes_with_defaults() {
        let descriptor: ToolDescriptor = serde_json::from_value(json!({
            "id": "mcp_tools:cache_clear",
            "label": "Clear caches",
            "description": "Rebuild all caches",
            "category": "ops",
            "provider": "mcp_tools",
            "operation_kind": "admin",
            "resource_kind": "ops"
        }))
        .unwrap();
        assert_eq!(descriptor.operation_kind, OperationKind::Admin);
        assert!(!descriptor.destructive);
        assert!(descriptor.input_schema.is_empty());
    }
}
