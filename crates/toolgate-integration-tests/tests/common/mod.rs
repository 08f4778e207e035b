//! Shared harness for gateway scenario tests.

use std::sync::Arc;

use serde_json::Value;
use toolgate_audit::AuditLog;
use toolgate_core::{Scope, ScopeSet};
use toolgate_gateway::{GatewayBuilder, NormalizedResponse, ToolExecutionGateway, ToolInvocationRequest};
use toolgate_test::RecordingSubscriber;

/// A gateway with a recording subscriber attached.
#[allow(dead_code)]
pub struct Harness {
    /// The gateway under test.
    pub gateway: ToolExecutionGateway,
    /// Receives every lifecycle event.
    pub recorder: RecordingSubscriber,
}

#[allow(dead_code)]
impl Harness {
    /// Build `builder` and attach a recorder after any subscribers it already has.
    pub fn new(builder: GatewayBuilder) -> Self {
        let gateway = builder.build();
        let recorder = RecordingSubscriber::new("recorder");
        gateway.events().register(Arc::new(recorder.clone()));
        Self { gateway, recorder }
    }

    /// Invoke `tool` with JSON `arguments`.
    pub async fn call(&self, tool: &str, arguments: Value) -> NormalizedResponse {
        self.gateway
            .invoke(ToolInvocationRequest::new(tool).with_arguments(arguments))
            .await
    }

    /// Number of audit records written so far.
    pub fn audit_count(&self) -> usize {
        self.gateway.audit_log().records().unwrap().len()
    }
}

/// Scope set from names.
#[allow(dead_code)]
pub fn scopes(names: &[Scope]) -> ScopeSet {
    names.iter().copied().collect()
}

/// Builder with in-memory auditing under a fixed actor.
#[allow(dead_code)]
pub fn builder() -> GatewayBuilder {
    GatewayBuilder::new().with_audit_log(AuditLog::in_memory("integration"))
}
