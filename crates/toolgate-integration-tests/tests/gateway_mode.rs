//! Discover/info/execute meta-tools in gateway mode.

mod common;

use common::{Harness, builder, scopes};
use serde_json::json;
use toolgate_config::Config;
use toolgate_core::{OperationKind, RequestId, Scope, ScopeSet};
use toolgate_gateway::{
    DISCOVER_TOOL, EXECUTE_TOOL, GET_INFO_TOOL, GatewayBuilder, ToolInvocationRequest,
};
use toolgate_test::{MockTool, create_node_descriptor, read_descriptor, write_descriptor};
use toolgate_tools::ToolDescriptor;

fn foreign() -> ToolDescriptor {
    ToolDescriptor::new("contrib:export", "contrib", OperationKind::Read, "content")
        .with_description("Export the node cache.")
}

fn gateway(granted: ScopeSet) -> (Harness, MockTool) {
    let create = MockTool::ok("Created.");
    let harness = Harness::new(
        builder()
            .with_gateway_mode(true)
            .with_scopes(granted)
            .register_tool(create_node_descriptor(), create.clone())
            .unwrap()
            .register_tool(read_descriptor("status"), MockTool::ok("OK"))
            .unwrap()
            .register_tool(foreign(), MockTool::ok("Exported."))
            .unwrap(),
    );
    (harness, create)
}

#[tokio::test]
async fn test_only_meta_tools_are_listed() {
    let (harness, _) = gateway(ScopeSet::read_only());
    let names: Vec<String> = harness
        .gateway
        .list_tools()
        .iter()
        .filter_map(|t| t["name"].as_str().map(str::to_owned))
        .collect();
    assert_eq!(names, vec![DISCOVER_TOOL, GET_INFO_TOOL, EXECUTE_TOOL]);
}

#[tokio::test]
async fn test_direct_calls_are_unknown() {
    let (harness, _) = gateway(ScopeSet::read_only());
    let response = harness.call("mcp_tools___status", json!({})).await;
    assert_eq!(response.error_code(), Some("INVALID_TOOL"));
    assert!(harness.recorder.events().is_empty());
}

#[tokio::test]
async fn test_discovery_honours_provider_filter_and_query() {
    let (harness, _) = gateway(ScopeSet::read_only());

    let all = harness.call(DISCOVER_TOOL, json!({})).await;
    assert!(!all.is_error);
    assert_eq!(all.structured["count"], 2);
    let names: Vec<&str> = all.structured["tools"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(names, vec!["mcp_tools___create_node", "mcp_tools___status"]);
    assert!(all.human_text.starts_with("Found 2 tools.\n"));

    let narrowed = harness.call(DISCOVER_TOOL, json!({"query": "CREATE"})).await;
    assert_eq!(narrowed.structured["count"], 1);
    assert_eq!(narrowed.structured["tools"][0]["label"], "Create node");

    let hidden = harness.call(DISCOVER_TOOL, json!({"query": "export"})).await;
    assert_eq!(hidden.structured["count"], 0);
    assert_eq!(hidden.human_text, "Found 0 tools.");

    // Meta-tools themselves never publish lifecycle events.
    assert!(harness.recorder.events().is_empty());
}

#[tokio::test]
async fn test_tool_info() {
    let (harness, _) = gateway(ScopeSet::read_only());

    let info = harness
        .call(GET_INFO_TOOL, json!({"tool_name": "mcp_tools___create_node"}))
        .await;
    assert!(!info.is_error);
    assert_eq!(info.structured["plugin_id"], "mcp_tools:create_node");
    assert_eq!(
        info.structured["inputSchema"]["required"],
        json!(["title", "type"])
    );

    let by_id = harness
        .call(GET_INFO_TOOL, json!({"tool_name": "mcp_tools:status"}))
        .await;
    assert_eq!(by_id.structured["name"], "mcp_tools___status");

    let filtered = harness
        .call(GET_INFO_TOOL, json!({"tool_name": "contrib___export"}))
        .await;
    assert_eq!(filtered.error_code(), Some("INVALID_TOOL"));
    assert_eq!(filtered.error(), Some("Unknown tool: contrib___export"));

    let missing = harness.call(GET_INFO_TOOL, json!({})).await;
    assert_eq!(missing.error_code(), Some("VALIDATION_FAILED"));
    assert_eq!(missing.structured["tool"], GET_INFO_TOOL);
}

#[tokio::test]
async fn test_execute_runs_the_full_pipeline() {
    let (harness, create) = gateway(scopes(&[Scope::Read, Scope::Write]));

    let response = harness
        .gateway
        .invoke(
            ToolInvocationRequest::new(EXECUTE_TOOL)
                .with_arguments(json!({
                    "tool_name": "mcp_tools___create_node",
                    "arguments": {"title": "Hi", "type": "page", "token": "abc"},
                }))
                .with_request_id("req-1"),
        )
        .await;
    assert!(!response.is_error, "{}", response.human_text);
    assert_eq!(create.calls()[0]["published"], false);

    let events = harness.recorder.events();
    assert_eq!(harness.recorder.event_types(), vec!["started", "succeeded"]);
    assert_eq!(events[0].tool_name(), "mcp_tools___create_node");
    assert_eq!(events[0].invocation().request_id, Some(RequestId::from("req-1")));
    assert_eq!(events[0].invocation().arguments["token"], "[REDACTED]");

    let records = harness.gateway.audit_log().records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].action, "create_node");
}

#[tokio::test]
async fn test_execute_still_validates_inner_arguments() {
    let (harness, create) = gateway(scopes(&[Scope::Read, Scope::Write]));

    let response = harness
        .call(
            EXECUTE_TOOL,
            json!({"tool_name": "mcp_tools___create_node", "arguments": {"type": "page"}}),
        )
        .await;
    assert_eq!(response.error_code(), Some("VALIDATION_FAILED"));
    assert_eq!(response.error(), Some("The required field 'title' is missing."));
    assert_eq!(response.structured["tool"], "mcp_tools___create_node");

    assert_eq!(create.call_count(), 0);
    assert!(harness.recorder.events().is_empty());
    assert_eq!(harness.audit_count(), 0);
}

#[tokio::test]
async fn test_execute_still_enforces_policy() {
    let (harness, create) = gateway(ScopeSet::read_only());

    let response = harness
        .call(
            EXECUTE_TOOL,
            json!({
                "tool_name": "mcp_tools___create_node",
                "arguments": {"title": "Hi", "type": "page"},
            }),
        )
        .await;
    assert_eq!(response.error_code(), Some("INSUFFICIENT_SCOPE"));
    assert_eq!(create.call_count(), 0);
    assert!(harness.recorder.events().is_empty());
    assert_eq!(harness.audit_count(), 0);

    let foreign = harness
        .call(EXECUTE_TOOL, json!({"tool_name": "contrib___export"}))
        .await;
    assert_eq!(foreign.error_code(), Some("INVALID_TOOL"));
}

#[tokio::test]
async fn test_execute_rejects_malformed_envelope() {
    let (harness, _) = gateway(ScopeSet::read_only());

    let not_a_map = harness
        .call(
            EXECUTE_TOOL,
            json!({"tool_name": "mcp_tools___status", "arguments": "all"}),
        )
        .await;
    assert_eq!(not_a_map.error_code(), Some("VALIDATION_FAILED"));
    assert_eq!(
        not_a_map.error(),
        Some("The field 'arguments' must be of type map, string given.")
    );

    let nested = harness
        .call(EXECUTE_TOOL, json!({"tool_name": EXECUTE_TOOL}))
        .await;
    assert_eq!(nested.error_code(), Some("INVALID_TOOL"));

    let no_arguments = harness
        .call(
            EXECUTE_TOOL,
            json!({"tool_name": "mcp_tools___status", "arguments": null}),
        )
        .await;
    assert!(!no_arguments.is_error);
    assert_eq!(harness.recorder.event_types(), vec!["started", "succeeded"]);
}

#[tokio::test]
async fn test_gateway_mode_from_config() {
    let config = Config::from_toml_str("[gateway]\ngateway_mode = true\n").unwrap();
    let harness = Harness::new(
        GatewayBuilder::from_config(&config)
            .register_tool(write_descriptor("save", "config"), MockTool::ok("saved"))
            .unwrap(),
    );
    assert!(harness.gateway.context().gateway_mode);
    assert_eq!(harness.gateway.list_tools().len(), 3);

    // Default scopes are read-only, so the routed write is denied.
    let response = harness
        .call(EXECUTE_TOOL, json!({"tool_name": "mcp_tools___save"}))
        .await;
    assert_eq!(response.error_code(), Some("INSUFFICIENT_SCOPE"));
}
