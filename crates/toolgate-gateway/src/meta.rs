//! Meta-tools served in gateway mode.
//!
//! Instead of listing every tool, a gateway-mode server exposes three tools
//! that let the agent search the catalogue, inspect one entry and run it by
//! name. Execution still goes through the full invocation pipeline.

use serde_json::{Value, json};
use toolgate_core::OperationKind;
use toolgate_tools::{FieldSpec, FieldType, InputSchema, ToolDescriptor};

/// Lists visible tools, optionally filtered by a search term.
pub const DISCOVER_TOOL: &str = "mcp_tools/discover-tools";
/// Returns schema and hints for one tool.
pub const GET_INFO_TOOL: &str = "mcp_tools/get-tool-info";
/// Runs any visible tool by name.
pub const EXECUTE_TOOL: &str = "mcp_tools/execute-tool";

/// One of the gateway-mode meta-tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaTool {
    /// [`DISCOVER_TOOL`].
    Discover,
    /// [`GET_INFO_TOOL`].
    GetInfo,
    /// [`EXECUTE_TOOL`].
    Execute,
}

impl MetaTool {
    /// Every meta-tool, in listing order.
    pub const ALL: [Self; 3] = [Self::Discover, Self::GetInfo, Self::Execute];

    /// Look up a meta-tool by its MCP name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|meta| meta.name() == name)
    }

    /// MCP name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Discover => DISCOVER_TOOL,
            Self::GetInfo => GET_INFO_TOOL,
            Self::Execute => EXECUTE_TOOL,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Discover => "Discover Tools",
            Self::GetInfo => "Get Tool Info",
            Self::Execute => "Execute Tool",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Discover => "List available MCP Tools with optional filtering.",
            Self::GetInfo => "Get input schema and hints for a specific tool.",
            Self::Execute => "Execute any available tool by name with arguments.",
        }
    }

    /// Declared inputs, checked before the meta-tool runs.
    #[must_use]
    pub fn input_schema(self) -> InputSchema {
        let tool_name = FieldSpec::required("tool_name", FieldType::String)
            .with_description("Tool name from discover-tools.");
        match self {
            Self::Discover => InputSchema::new().field(
                FieldSpec::new("query", FieldType::String)
                    .with_description("Optional search term for name/label/description."),
            ),
            Self::GetInfo => InputSchema::new().field(tool_name),
            Self::Execute => InputSchema::new().field(tool_name).field(
                FieldSpec::new("arguments", FieldType::Map)
                    .with_description("Arguments to pass to the tool."),
            ),
        }
    }

    /// MCP `tools/list` entry.
    #[must_use]
    pub fn to_mcp_definition(self) -> Value {
        let annotations = match self {
            Self::Discover | Self::GetInfo => json!({
                "title": self.title(),
                "readOnlyHint": true,
                "idempotentHint": true,
                "openWorldHint": false,
            }),
            Self::Execute => json!({
                "title": self.title(),
                "readOnlyHint": false,
                "openWorldHint": true,
            }),
        };
        json!({
            "name": self.name(),
            "title": self.title(),
            "description": self.description(),
            "inputSchema": self.input_schema().to_json_schema(),
            "annotations": annotations,
        })
    }
}

/// `tools/list` entries for all three meta-tools.
#[must_use]
pub fn gateway_tools() -> Vec<Value> {
    MetaTool::ALL
        .into_iter()
        .map(MetaTool::to_mcp_definition)
        .collect()
}

/// Whether `descriptor` matches a case-insensitive search term.
///
/// A missing or blank term matches everything.
pub(crate) fn matches_query(descriptor: &ToolDescriptor, query: Option<&str>) -> bool {
    let Some(term) = query.map(str::trim).filter(|t| !t.is_empty()) else {
        return true;
    };
    let haystack = format!(
        "{} {} {}",
        descriptor.mcp_name(),
        descriptor.label,
        descriptor.description
    )
    .to_lowercase();
    haystack.contains(&term.to_lowercase())
}

/// Lightweight listing entry used by discovery.
pub(crate) fn discovery_summary(descriptor: &ToolDescriptor) -> Value {
    json!({
        "name": descriptor.mcp_name(),
        "label": descriptor.label,
        "description": descriptor.description,
        "category": descriptor.category,
        "read_only": descriptor.operation_kind == OperationKind::Read,
    })
}

/// Full schema and hints for one tool.
pub(crate) fn detailed_info(descriptor: &ToolDescriptor) -> Value {
    let definition = descriptor.to_mcp_definition();
    json!({
        "success": true,
        "name": descriptor.mcp_name(),
        "label": descriptor.label,
        "description": descriptor.description,
        "category": descriptor.category,
        "operation": descriptor.operation_kind,
        "resource_kind": descriptor.resource_kind,
        "destructive": descriptor.destructive,
        "inputSchema": definition["inputSchema"],
        "outputSchema": descriptor.output_schema,
        "annotations": definition["annotations"],
        "plugin_id": descriptor.id,
    })
}
