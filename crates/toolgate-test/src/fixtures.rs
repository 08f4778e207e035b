//! Test fixtures for descriptors and configuration.

use toolgate_config::Config;
use toolgate_core::OperationKind;
use toolgate_tools::{FieldSpec, FieldType, InputSchema, ToolDescriptor};

/// Provider every fixture descriptor uses.
pub const TEST_PROVIDER: &str = "mcp_tools";

/// A read tool with no inputs.
#[must_use]
pub fn read_descriptor(name: &str) -> ToolDescriptor {
    ToolDescriptor::new(
        format!("{TEST_PROVIDER}:{name}"),
        TEST_PROVIDER,
        OperationKind::Read,
        "content",
    )
    .with_label(name)
    .with_category("test")
}

/// A write tool against `resource_kind` with no inputs.
#[must_use]
pub fn write_descriptor(name: &str, resource_kind: &str) -> ToolDescriptor {
    ToolDescriptor::new(
        format!("{TEST_PROVIDER}:{name}"),
        TEST_PROVIDER,
        OperationKind::Write,
        resource_kind,
    )
    .with_label(name)
    .with_category("test")
}

/// An admin tool with no inputs.
#[must_use]
pub fn admin_descriptor(name: &str) -> ToolDescriptor {
    ToolDescriptor::new(
        format!("{TEST_PROVIDER}:{name}"),
        TEST_PROVIDER,
        OperationKind::Admin,
        "config",
    )
    .with_label(name)
    .with_category("test")
}

/// `mcp_tools:create_node`: write to content, `title` and `type` required.
#[must_use]
pub fn create_node_descriptor() -> ToolDescriptor {
    write_descriptor("create_node", "content")
        .with_label("Create node")
        .with_audit_action("create_node")
        .with_input_schema(
            InputSchema::new()
                .field(FieldSpec::required("title", FieldType::String))
                .field(FieldSpec::required("type", FieldType::String))
                .field(FieldSpec::new("published", FieldType::Boolean).with_default(false.into())),
        )
}

/// `mcp_tools:delete_node`: destructive write, target taken from `nid`.
#[must_use]
pub fn delete_node_descriptor() -> ToolDescriptor {
    write_descriptor("delete_node", "content")
        .with_label("Delete node")
        .destructive()
        .with_audit_action("delete_node")
        .with_target_argument("nid")
        .with_input_schema(
            InputSchema::new().field(FieldSpec::required("nid", FieldType::Integer)),
        )
}

/// Default configuration granting `scopes`.
#[must_use]
pub fn test_config(scopes: &[&str]) -> Config {
    let mut config = Config::default();
    config.access.default_scopes = scopes.iter().map(|s| (*s).to_owned()).collect();
    config.access.allowed_scopes = Some(config.access.default_scopes.clone());
    config
}

/// Install a test-writer subscriber honouring `RUST_LOG`. Safe to call
/// repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
