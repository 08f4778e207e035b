//! Which invocations reach the audit trail, and what they record.

mod common;

use std::sync::Arc;

use common::{Harness, builder, scopes};
use serde_json::json;
use toolgate_audit::AuditLog;
use toolgate_core::{REDACTED, Scope, ScopeSet};
use toolgate_gateway::GatewayBuilder;
use toolgate_test::{
    FailingAuditStorage, FailingTool, MockTool, admin_descriptor, create_node_descriptor,
    delete_node_descriptor, read_descriptor, write_descriptor,
};
use toolgate_tools::ToolOutput;

#[tokio::test]
async fn test_only_permitted_successful_mutations_are_audited() {
    let harness = Harness::new(
        builder()
            .with_scopes(ScopeSet::all())
            .register_tool(read_descriptor("list"), MockTool::ok("listed"))
            .unwrap()
            .register_tool(write_descriptor("save", "config"), MockTool::ok("saved"))
            .unwrap()
            .register_tool(admin_descriptor("enable_module"), MockTool::ok("enabled"))
            .unwrap()
            .register_tool(write_descriptor("broken", "config"), FailingTool::new("nope"))
            .unwrap()
            .register_tool(
                write_descriptor("refuse", "config"),
                MockTool::new(ToolOutput::failure("Nothing to save.")),
            )
            .unwrap(),
    );

    harness.call("mcp_tools___list", json!({})).await;
    assert_eq!(harness.audit_count(), 0);

    harness.call("mcp_tools___save", json!({})).await;
    assert_eq!(harness.audit_count(), 1);

    harness.call("mcp_tools___enable_module", json!({})).await;
    assert_eq!(harness.audit_count(), 2);

    let broken = harness.call("mcp_tools___broken", json!({})).await;
    assert_eq!(broken.error_code(), Some("EXECUTION_FAILED"));
    assert_eq!(harness.audit_count(), 2);

    let refused = harness.call("mcp_tools___refuse", json!({})).await;
    assert!(refused.is_error);
    assert_eq!(refused.error_code(), None);
    assert_eq!(harness.audit_count(), 2);

    let records = harness.gateway.audit_log().records().unwrap();
    let actions: Vec<&str> = records.iter().map(|r| r.action.as_str()).collect();
    assert_eq!(actions, vec!["mcp_tools:save", "mcp_tools:enable_module"]);
    assert!(records.iter().all(|r| r.success && r.actor == "integration"));
}

#[tokio::test]
async fn test_denied_mutations_are_not_audited() {
    let harness = Harness::new(
        builder()
            .with_scopes(ScopeSet::read_only())
            .register_tool(write_descriptor("save", "config"), MockTool::ok("saved"))
            .unwrap(),
    );

    let response = harness.call("mcp_tools___save", json!({})).await;
    assert_eq!(response.error_code(), Some("INSUFFICIENT_SCOPE"));
    assert_eq!(harness.audit_count(), 0);
}

#[tokio::test]
async fn test_record_uses_descriptor_metadata() {
    let harness = Harness::new(
        builder()
            .with_scopes(scopes(&[Scope::Read, Scope::Write]))
            .register_tool(delete_node_descriptor(), MockTool::ok("Deleted."))
            .unwrap(),
    );

    let response = harness
        .call("mcp_tools___delete_node", json!({"nid": "42"}))
        .await;
    assert!(!response.is_error);

    let records = harness.gateway.audit_log().records().unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.action, "delete_node");
    assert_eq!(record.target_type, "content");
    assert_eq!(record.target_id, "42");
    assert_eq!(record.details["nid"], "42");
}

#[tokio::test]
async fn test_tool_reported_target_wins() {
    let harness = Harness::new(
        builder()
            .with_scopes(scopes(&[Scope::Read, Scope::Write]))
            .register_tool(
                create_node_descriptor(),
                MockTool::new(ToolOutput::success("Created.").with_target_id("node/17")),
            )
            .unwrap(),
    );

    harness
        .call("mcp_tools___create_node", json!({"title": "Hi", "type": "page"}))
        .await;

    let records = harness.gateway.audit_log().records().unwrap();
    assert_eq!(records[0].action, "create_node");
    assert_eq!(records[0].target_id, "node/17");
}

#[tokio::test]
async fn test_sensitive_details_are_redacted() {
    let harness = Harness::new(
        builder()
            .with_scopes(scopes(&[Scope::Read, Scope::Write]))
            .register_tool(create_node_descriptor(), MockTool::ok("Created."))
            .unwrap(),
    );

    harness
        .call(
            "mcp_tools___create_node",
            json!({
                "title": "Hi",
                "type": "page",
                "password": "hunter2",
                "auth": {"token": "abc", "user": "ops"},
            }),
        )
        .await;

    let records = harness.gateway.audit_log().records().unwrap();
    let details = &records[0].details;
    assert_eq!(details["title"], "Hi");
    assert_eq!(details["password"], REDACTED);
    assert_eq!(details["auth"]["token"], REDACTED);
    assert_eq!(details["auth"]["user"], "ops");
    assert!(!records[0].summary().contains("hunter2"));
}

#[tokio::test]
async fn test_audit_storage_failure_does_not_change_the_response() {
    let output = ToolOutput::success("Saved.");
    let reference = Harness::new(
        builder()
            .with_scopes(scopes(&[Scope::Write]))
            .register_tool(write_descriptor("save", "config"), MockTool::new(output.clone()))
            .unwrap(),
    );
    let expected = reference.call("mcp_tools___save", json!({})).await;

    let harness = Harness::new(
        GatewayBuilder::new()
            .with_scopes(scopes(&[Scope::Write]))
            .with_audit_log(AuditLog::new(Arc::new(FailingAuditStorage), "ops"))
            .register_tool(write_descriptor("save", "config"), MockTool::new(output))
            .unwrap(),
    );

    let response = harness.call("mcp_tools___save", json!({})).await;
    assert_eq!(response, expected);
    assert!(!response.is_error);
    assert_eq!(harness.recorder.event_types(), vec!["started", "succeeded"]);
}

#[tokio::test]
async fn test_disabled_audit_records_nothing() {
    let harness = Harness::new(
        GatewayBuilder::new()
            .with_scopes(scopes(&[Scope::Write]))
            .with_audit_log(AuditLog::disabled())
            .register_tool(write_descriptor("save", "config"), MockTool::ok("saved"))
            .unwrap(),
    );

    assert!(!harness.call("mcp_tools___save", json!({})).await.is_error);
    assert_eq!(harness.audit_count(), 0);
}

#[tokio::test]
async fn test_file_audit_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let audit_path = dir.path().join("audit.jsonl");
    let config_path = dir.path().join("toolgate.toml");
    std::fs::write(
        &config_path,
        format!(
            "[access]\ndefault_scopes = [\"read\", \"write\"]\n\n[audit]\nactor = \"ops-bot\"\npath = '{}'\n",
            audit_path.display()
        ),
    )
    .unwrap();

    let harness = Harness::new(
        GatewayBuilder::from_config_file(&config_path)
            .unwrap()
            .register_tool(delete_node_descriptor(), MockTool::ok("Deleted."))
            .unwrap(),
    );

    assert!(
        !harness
            .call("mcp_tools___delete_node", json!({"nid": 9}))
            .await
            .is_error
    );

    let raw = std::fs::read_to_string(&audit_path).unwrap();
    assert_eq!(raw.lines().count(), 1);

    let records = harness.gateway.audit_log().records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].actor, "ops-bot");
    assert_eq!(records[0].target_id, "9");
}
