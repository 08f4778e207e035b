//! A TOML document driving a whole gateway.

mod common;

use common::Harness;
use serde_json::json;
use toolgate_config::Config;
use toolgate_core::OperationKind;
use toolgate_gateway::{GatewayBuilder, GatewayError};
use toolgate_test::{HangingTool, MockTool, capture_logs, read_descriptor, write_descriptor};
use toolgate_tools::ToolDescriptor;

fn gateway_from(toml: &str) -> GatewayBuilder {
    GatewayBuilder::from_config(&Config::from_toml_str(toml).unwrap())
}

#[tokio::test]
async fn test_read_only_site() {
    let harness = Harness::new(
        gateway_from(
            r#"
            [access]
            read_only_mode = true
            default_scopes = ["read", "write", "admin"]
            "#,
        )
        .register_tool(write_descriptor("save", "config"), MockTool::ok("saved"))
        .unwrap()
        .register_tool(read_descriptor("list"), MockTool::ok("listed"))
        .unwrap(),
    );

    let write = harness.call("mcp_tools___save", json!({})).await;
    assert_eq!(write.error_code(), Some("READ_ONLY_MODE"));
    assert!(!harness.call("mcp_tools___list", json!({})).await.is_error);
}

#[tokio::test]
async fn test_scopes_are_capped_by_allowed_scopes() {
    let harness = Harness::new(
        gateway_from(
            r#"
            [access]
            default_scopes = ["read", "write"]
            allowed_scopes = ["read"]
            "#,
        )
        .register_tool(write_descriptor("save", "config"), MockTool::ok("saved"))
        .unwrap(),
    );

    let response = harness.call("mcp_tools___save", json!({})).await;
    assert_eq!(response.error_code(), Some("INSUFFICIENT_SCOPE"));
}

#[tokio::test]
async fn test_trusted_scope_override() {
    let mut config = Config::from_toml_str(
        r#"
        [access]
        default_scopes = ["read"]
        allowed_scopes = ["read", "write"]
        trust_scopes_via_env = true
        "#,
    )
    .unwrap();
    config.access.scope_override = Some("read,write".to_owned());

    let harness = Harness::new(
        GatewayBuilder::from_config(&config)
            .register_tool(write_descriptor("save", "config"), MockTool::ok("saved"))
            .unwrap(),
    );
    assert!(!harness.call("mcp_tools___save", json!({})).await.is_error);
}

#[tokio::test]
async fn test_config_only_kinds() {
    let harness = Harness::new(
        gateway_from(
            r#"
            [access]
            config_only_mode = true
            config_only_allowed_write_kinds = ["ops"]
            default_scopes = ["read", "write"]
            "#,
        )
        .register_tool(write_descriptor("save", "config"), MockTool::ok("saved"))
        .unwrap()
        .register_tool(write_descriptor("cron", "ops"), MockTool::ok("ran"))
        .unwrap(),
    );

    let config_write = harness.call("mcp_tools___save", json!({})).await;
    assert_eq!(config_write.error_code(), Some("CONFIG_ONLY_MODE"));
    assert!(!harness.call("mcp_tools___cron", json!({})).await.is_error);
}

#[tokio::test]
async fn test_include_all_tools() {
    let foreign = ToolDescriptor::new("contrib:export", "contrib", OperationKind::Read, "content");

    let harness = Harness::new(
        gateway_from("[gateway]\ninclude_all_tools = true\n")
            .register_tool(foreign, MockTool::ok("Exported."))
            .unwrap(),
    );
    assert!(!harness.call("contrib___export", json!({})).await.is_error);
    assert_eq!(harness.gateway.list_tools().len(), 1);
}

#[tokio::test]
async fn test_rate_limits_from_config() {
    let harness = Harness::new(
        gateway_from(
            r#"
            [access]
            default_scopes = ["read", "write"]

            [rate_limiting]
            enabled = true
            max_writes_per_minute = 1
            "#,
        )
        .register_tool(write_descriptor("save", "config"), MockTool::ok("saved"))
        .unwrap(),
    );

    assert!(!harness.call("mcp_tools___save", json!({})).await.is_error);
    let limited = harness.call("mcp_tools___save", json!({})).await;
    assert_eq!(limited.error_code(), Some("RATE_LIMIT_EXCEEDED"));
}

#[tokio::test]
async fn test_execution_timeout_from_config() {
    let harness = Harness::new(
        gateway_from("[gateway]\nexecution_timeout_ms = 30\n")
            .register_tool(read_descriptor("slow"), HangingTool)
            .unwrap(),
    );

    let response = harness.call("mcp_tools___slow", json!({})).await;
    assert_eq!(response.error_code(), Some("EXECUTION_FAILED"));
    assert_eq!(response.error(), Some("Timeout after 30ms"));
}

#[tokio::test]
async fn test_audit_without_path_is_log_only() {
    let (logs, _guard) = capture_logs();
    let harness = Harness::new(
        gateway_from(
            r#"
            [access]
            default_scopes = ["read", "write"]

            [audit]
            actor = "ops-bot"
            "#,
        )
        .register_tool(write_descriptor("save", "config"), MockTool::ok("saved"))
        .unwrap(),
    );

    for _ in 0..3 {
        assert!(!harness.call("mcp_tools___save", json!({})).await.is_error);
    }

    assert_eq!(harness.audit_count(), 0);
    let summaries = logs.lines_with("INFO", "MCP: mcp_tools:save on config");
    assert_eq!(summaries.len(), 3);
    assert!(summaries[0].contains("by ops-bot"));
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("toolgate.toml");
    std::fs::write(&path, "[logging]\nformat = \"xml\"\n").unwrap();

    let err = GatewayBuilder::from_config_file(&path).unwrap_err();
    assert!(matches!(err, GatewayError::Config(_)));
    assert!(err.to_string().contains("logging.format"));
}
