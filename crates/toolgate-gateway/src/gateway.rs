//! The invocation pipeline.

use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use serde_json::{Map, Value, json};
use toolgate_audit::AuditLog;
use toolgate_config::Config;
use toolgate_core::{RequestId, ScopeSet, redact_arguments};
use toolgate_events::{
    EventBus, EventMetadata, FailureReason, InvocationInfo, LifecycleEvent, LoggingSubscriber,
};
use toolgate_policy::{AccessPolicy, RateLimiter, SiteFlags};
use toolgate_telemetry::{LogConfig, RequestContext, setup_logging};
use toolgate_tools::{
    ProviderFilter, RegisteredTool, Tool, ToolDescriptor, ToolError, ToolOutput, ToolRegistry,
    ToolResult,
};
use tracing::{Instrument, debug, info};

use crate::context::GatewayContext;
use crate::error::GatewayResult;
use crate::meta::{self, MetaTool};
use crate::outcome::{ExecutionOutcome, NormalizedResponse, ToolInvocationRequest};
use crate::responder::{ErrorResponder, pretty};

/// Source name stamped on emitted events.
pub const EVENT_SOURCE: &str = "toolgate-gateway";

/// Target id recorded when none can be determined.
pub const UNKNOWN_TARGET: &str = "-";

/// Runs tool invocations: resolve, validate, authorize, execute, audit,
/// publish, normalize.
///
/// Cheap to share behind an [`Arc`]; concurrent invocations do not
/// contend on anything but the rate limiter and audit storage.
#[derive(Debug)]
pub struct ToolExecutionGateway {
    registry: ToolRegistry,
    context: GatewayContext,
    policy: AccessPolicy,
    responder: ErrorResponder,
    audit: AuditLog,
    events: EventBus,
}

/// What happened once the tool was handed control.
struct Execution {
    outcome: ExecutionOutcome,
    duration_ms: f64,
}

impl ToolExecutionGateway {
    /// Start building a gateway.
    #[must_use]
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }

    /// Handle one `tools/call` request.
    ///
    /// Never fails: every outcome, including tool panics and timeouts, is
    /// folded into the returned envelope. In gateway mode only the
    /// meta-tools are callable directly.
    pub async fn invoke(&self, request: ToolInvocationRequest) -> NormalizedResponse {
        let mut ctx = RequestContext::new(EVENT_SOURCE).with_tool(&request.tool_id);
        if let Some(id) = &request.request_id {
            ctx = ctx.with_client_request_id(id.to_string());
        }
        let span = ctx.span();

        if !self.context.gateway_mode {
            return self.invoke_in_context(request, &ctx).instrument(span).await;
        }
        match MetaTool::from_name(&request.tool_id) {
            Some(meta) => self.invoke_meta(meta, request, &ctx).instrument(span).await,
            None => {
                let message = format!("Unknown tool: {}", request.tool_id);
                self.responder
                    .respond(&ExecutionOutcome::InvalidTool { message }, &request.tool_id)
            },
        }
    }

    /// Invoke `tool_name` with `arguments`.
    pub async fn call(
        &self,
        tool_name: &str,
        arguments: Map<String, Value>,
        request_id: Option<RequestId>,
    ) -> NormalizedResponse {
        self.invoke(ToolInvocationRequest {
            tool_id: tool_name.to_owned(),
            arguments,
            request_id,
        })
        .await
    }

    async fn invoke_in_context(
        &self,
        request: ToolInvocationRequest,
        ctx: &RequestContext,
    ) -> NormalizedResponse {
        let ToolInvocationRequest {
            tool_id: tool_name,
            arguments,
            request_id,
        } = request;

        let registered = match self.preflight(&tool_name, &arguments) {
            Ok(registered) => registered,
            Err(outcome) => return self.responder.respond(&outcome, &tool_name),
        };
        let descriptor = registered.descriptor();

        let mut prepared = descriptor.input_schema.upcast(&arguments);
        descriptor.input_schema.apply_defaults(&mut prepared);
        let sanitized = redact_arguments(&arguments);

        let invocation = InvocationInfo::new(&tool_name, &descriptor.id, sanitized.clone())
            .with_request_id(request_id);
        self.events.emit(LifecycleEvent::Started {
            metadata: self.metadata(ctx),
            invocation: invocation.clone(),
        });

        let Execution {
            outcome,
            duration_ms,
        } = self.execute(registered, prepared.clone()).await;

        if let ExecutionOutcome::Success { result, .. } = &outcome
            && descriptor.operation_kind.is_mutating()
            && result.success
        {
            let target_id = audit_target(descriptor, result, &prepared);
            self.audit.record(
                descriptor.audit_action(),
                &descriptor.resource_kind,
                &target_id,
                &sanitized,
            );
        }

        let response = self.responder.respond(&outcome, &tool_name);
        self.events
            .emit(terminal_event(self.metadata(ctx), invocation, &outcome, duration_ms, &response));

        info!(
            tool = %tool_name,
            success = !response.is_error,
            duration_ms,
            "Tool invocation finished"
        );
        response
    }

    async fn invoke_meta(
        &self,
        meta: MetaTool,
        request: ToolInvocationRequest,
        ctx: &RequestContext,
    ) -> NormalizedResponse {
        let ToolInvocationRequest {
            tool_id,
            arguments,
            request_id,
        } = request;

        let schema = meta.input_schema();
        let arguments = schema.upcast(&arguments);
        let errors = schema.validate(&arguments);
        if !errors.is_empty() {
            return self
                .responder
                .respond(&ExecutionOutcome::ValidationFailed { errors }, &tool_id);
        }

        let tool_name = arguments
            .get("tool_name")
            .and_then(Value::as_str)
            .unwrap_or_default();
        match meta {
            MetaTool::Discover => self.discover_tools(arguments.get("query").and_then(Value::as_str)),
            MetaTool::GetInfo => self.tool_info(tool_name),
            MetaTool::Execute => {
                let inner = match arguments.get("arguments") {
                    Some(Value::Object(map)) => map.clone(),
                    _ => Map::new(),
                };
                debug!(tool = %tool_name, "Routing execute-tool call");
                self.invoke_in_context(
                    ToolInvocationRequest {
                        tool_id: tool_name.to_owned(),
                        arguments: inner,
                        request_id,
                    },
                    ctx,
                )
                .await
            },
        }
    }

    /// List visible tools whose name, label or description contains
    /// `query` (case-insensitive). A blank query lists everything.
    #[must_use]
    pub fn discover_tools(&self, query: Option<&str>) -> NormalizedResponse {
        let tools: Vec<Value> = self
            .registry
            .descriptors(&self.context.provider_filter)
            .filter(|descriptor| meta::matches_query(descriptor, query))
            .map(meta::discovery_summary)
            .collect();
        let count = tools.len();
        let structured = json!({
            "success": true,
            "count": count,
            "tools": tools,
        });

        let mut human_text = format!("Found {count} tools.");
        if count > 0 {
            human_text.push('\n');
            human_text.push_str(&pretty(&structured));
        }
        NormalizedResponse {
            human_text,
            structured,
            is_error: false,
        }
    }

    /// Schema and hints for one visible tool.
    #[must_use]
    pub fn tool_info(&self, tool_name: &str) -> NormalizedResponse {
        let Some(registered) = self
            .registry
            .resolve_visible(tool_name, &self.context.provider_filter)
        else {
            let message = format!("Unknown tool: {tool_name}");
            return self
                .responder
                .respond(&ExecutionOutcome::InvalidTool { message }, tool_name);
        };

        let structured = meta::detailed_info(registered.descriptor());
        NormalizedResponse {
            human_text: pretty(&structured),
            structured,
            is_error: false,
        }
    }

    /// Steps that may reject a call before anything is published: lookup,
    /// schema validation, policy and rate limiting.
    fn preflight(
        &self,
        tool_name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<&RegisteredTool, ExecutionOutcome> {
        let Some(registered) = self
            .registry
            .resolve_visible(tool_name, &self.context.provider_filter)
        else {
            return Err(ExecutionOutcome::InvalidTool {
                message: format!("Unknown tool: {tool_name}"),
            });
        };
        let descriptor = registered.descriptor();

        let upcast = descriptor.input_schema.upcast(arguments);
        let errors = descriptor.input_schema.validate(&upcast);
        if !errors.is_empty() {
            return Err(ExecutionOutcome::ValidationFailed { errors });
        }

        let decision = self.policy.evaluate(
            descriptor.operation_kind,
            &descriptor.resource_kind,
            &self.context.scopes,
            &self.context.site_flags,
        );
        if !decision.allowed {
            return Err(ExecutionOutcome::AccessDenied { decision });
        }

        if descriptor.operation_kind.is_mutating() {
            let decision = self
                .context
                .rate_limiter
                .check(descriptor.operation_kind, descriptor.destructive);
            if !decision.allowed {
                return Err(ExecutionOutcome::AccessDenied { decision });
            }
        }

        Ok(registered)
    }

    async fn execute(&self, registered: &RegisteredTool, arguments: Map<String, Value>) -> Execution {
        let started = Instant::now();
        debug!(tool = %registered.descriptor().id, "Instantiating tool");

        let created = std::panic::catch_unwind(AssertUnwindSafe(|| registered.factory().create()))
            .unwrap_or_else(|payload| Err(ToolError::Panicked(panic_message(payload.as_ref()))));

        let outcome = match created {
            Err(cause) => ExecutionOutcome::InstantiationFailed { cause },
            Ok(tool) => match self.run_tool(tool, arguments).await {
                Ok(result) => ExecutionOutcome::Success {
                    result,
                    duration_ms: elapsed_ms(started),
                },
                Err(cause) => ExecutionOutcome::ExecutionFailed {
                    cause,
                    duration_ms: elapsed_ms(started),
                },
            },
        };

        Execution {
            duration_ms: outcome.duration_ms().unwrap_or_else(|| elapsed_ms(started)),
            outcome,
        }
    }

    /// Run the tool inside a panic boundary and the optional timeout.
    async fn run_tool(
        &self,
        tool: Arc<dyn Tool>,
        arguments: Map<String, Value>,
    ) -> ToolResult<ToolOutput> {
        let guarded = AssertUnwindSafe(async move { tool.execute(arguments).await }).catch_unwind();

        let result = match self.context.execution_timeout {
            Some(limit) => match tokio::time::timeout(limit, guarded).await {
                Ok(result) => result,
                Err(_) => return Err(ToolError::Timeout(duration_millis(limit))),
            },
            None => guarded.await,
        };

        result.unwrap_or_else(|payload| Err(ToolError::Panicked(panic_message(payload.as_ref()))))
    }

    fn metadata(&self, ctx: &RequestContext) -> EventMetadata {
        EventMetadata::new(EVENT_SOURCE).with_correlation_id(ctx.correlation_id)
    }

    /// Registered tools.
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Active settings.
    #[must_use]
    pub fn context(&self) -> &GatewayContext {
        &self.context
    }

    /// Audit trail.
    #[must_use]
    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    /// Lifecycle event bus.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// MCP `tools/list` entries: the meta-tools in gateway mode, otherwise
    /// every callable tool.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Value> {
        if self.context.gateway_mode {
            return meta::gateway_tools();
        }
        self.registry.list_tools(&self.context.provider_filter)
    }
}

fn terminal_event(
    metadata: EventMetadata,
    invocation: InvocationInfo,
    outcome: &ExecutionOutcome,
    duration_ms: f64,
    response: &NormalizedResponse,
) -> LifecycleEvent {
    let (reason, error) = match outcome {
        ExecutionOutcome::Success { .. } => {
            return LifecycleEvent::Succeeded {
                metadata,
                invocation,
                duration_ms,
                result: response.structured.clone(),
            };
        },
        ExecutionOutcome::InstantiationFailed { cause } => {
            (FailureReason::InstantiationFailed, cause.to_string())
        },
        ExecutionOutcome::ExecutionFailed { cause, .. } => {
            (FailureReason::ExecutionFailed, cause.to_string())
        },
        ExecutionOutcome::ValidationFailed { .. } => (
            FailureReason::ValidationFailed,
            response.error().unwrap_or_default().to_owned(),
        ),
        ExecutionOutcome::AccessDenied { .. } => (
            FailureReason::AccessDenied,
            response.error().unwrap_or_default().to_owned(),
        ),
        ExecutionOutcome::InvalidTool { message } => (FailureReason::InvalidTool, message.clone()),
    };

    LifecycleEvent::Failed {
        metadata,
        invocation,
        duration_ms,
        reason,
        error,
    }
}

/// Pick the audit target id: tool output, then the declared argument, then `-`.
fn audit_target(
    descriptor: &ToolDescriptor,
    result: &ToolOutput,
    arguments: &Map<String, Value>,
) -> String {
    if let Some(id) = result.target_id.as_deref().filter(|id| !id.is_empty()) {
        return id.to_owned();
    }

    descriptor
        .target_argument
        .as_deref()
        .and_then(|name| arguments.get(name))
        .and_then(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| UNKNOWN_TARGET.to_owned())
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1_000.0
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

/// Assembles a [`ToolExecutionGateway`] from explicit collaborators.
#[derive(Debug)]
pub struct GatewayBuilder {
    registry: ToolRegistry,
    context: GatewayContext,
    audit: AuditLog,
    events: EventBus,
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayBuilder {
    /// Builder with read-only scopes, log-only auditing and no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: ToolRegistry::new(),
            context: GatewayContext::default(),
            audit: AuditLog::log_only("anonymous"),
            events: EventBus::new(),
        }
    }

    /// Builder configured from `config`, with the logging subscriber registered.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            context: GatewayContext::from_config(config),
            audit: AuditLog::from_config(&config.audit),
            ..Self::new()
        }
        .with_logging_subscriber()
    }

    /// Builder configured from a TOML file plus environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_config_file(path: &Path) -> GatewayResult<Self> {
        let config = Config::load(Some(path))?;
        Ok(Self::from_config(&config))
    }

    /// Use `registry` as the tool set.
    #[must_use]
    pub fn with_registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register one tool instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor is malformed or the id is taken.
    pub fn register_tool<T>(mut self, descriptor: ToolDescriptor, tool: T) -> GatewayResult<Self>
    where
        T: Tool + 'static,
    {
        self.registry.register_tool(descriptor, tool)?;
        Ok(self)
    }

    /// Replace the whole context.
    #[must_use]
    pub fn with_context(mut self, context: GatewayContext) -> Self {
        self.context = context;
        self
    }

    /// Set the granted scopes.
    #[must_use]
    pub fn with_scopes(mut self, scopes: ScopeSet) -> Self {
        self.context.scopes = scopes;
        self
    }

    /// Set the site flags.
    #[must_use]
    pub fn with_site_flags(mut self, flags: SiteFlags) -> Self {
        self.context.site_flags = flags;
        self
    }

    /// Set the provider filter.
    #[must_use]
    pub fn with_provider_filter(mut self, filter: ProviderFilter) -> Self {
        self.context.provider_filter = filter;
        self
    }

    /// Serve the discover/info/execute meta-tools instead of every tool.
    #[must_use]
    pub fn with_gateway_mode(mut self, enabled: bool) -> Self {
        self.context.gateway_mode = enabled;
        self
    }

    /// Bound every execution by `timeout`.
    #[must_use]
    pub fn with_execution_timeout(mut self, timeout: Duration) -> Self {
        self.context.execution_timeout = Some(timeout);
        self
    }

    /// Set the rate limiter.
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.context.rate_limiter = limiter;
        self
    }

    /// Set the audit log.
    #[must_use]
    pub fn with_audit_log(mut self, audit: AuditLog) -> Self {
        self.audit = audit;
        self
    }

    /// Share an existing event bus.
    #[must_use]
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Register the [`LoggingSubscriber`] on the bus.
    #[must_use]
    pub fn with_logging_subscriber(self) -> Self {
        self.events.register(Arc::new(LoggingSubscriber::new()));
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ToolExecutionGateway {
        ToolExecutionGateway {
            registry: self.registry,
            context: self.context,
            policy: AccessPolicy::new(),
            responder: ErrorResponder::new(),
            audit: self.audit,
            events: self.events,
        }
    }
}

/// Install the process-wide `tracing` subscriber described by `[logging]`.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already
/// installed.
pub fn init_logging(config: &Config) -> GatewayResult<()> {
    setup_logging(&LogConfig::from(&config.logging))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use toolgate_core::Scope;
    use toolgate_test::{
        FailingFactory, HangingTool, MockTool, RecordingSubscriber, create_node_descriptor,
        delete_node_descriptor, read_descriptor,
    };

    fn read_write() -> ScopeSet {
        [Scope::Read, Scope::Write].into_iter().collect()
    }

    fn with_recorder(builder: GatewayBuilder) -> (ToolExecutionGateway, RecordingSubscriber) {
        let recorder = RecordingSubscriber::new("recorder");
        let gateway = builder.build();
        gateway.events().register(Arc::new(recorder.clone()));
        (gateway, recorder)
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_and_silent() {
        let (gateway, recorder) = with_recorder(GatewayBuilder::new());
        let response = gateway.invoke(ToolInvocationRequest::new("mcp_tools___nope")).await;

        assert_eq!(response.error_code(), Some("INVALID_TOOL"));
        assert_eq!(response.error(), Some("Unknown tool: mcp_tools___nope"));
        assert!(recorder.events().is_empty());
    }

    #[tokio::test]
    async fn test_filtered_provider_is_invalid() {
        let tool = MockTool::ok("hidden");
        let descriptor = ToolDescriptor::new(
            "contrib:status",
            "contrib",
            toolgate_core::OperationKind::Read,
            "ops",
        );
        let builder = GatewayBuilder::new().register_tool(descriptor, tool.clone()).unwrap();
        let (gateway, _) = with_recorder(builder);

        let response = gateway.invoke(ToolInvocationRequest::new("contrib___status")).await;
        assert_eq!(response.error_code(), Some("INVALID_TOOL"));
        assert_eq!(tool.call_count(), 0);
        assert!(gateway.list_tools().is_empty());
    }

    #[tokio::test]
    async fn test_arguments_are_upcast_and_defaulted() {
        let tool = MockTool::ok("Created.");
        let builder = GatewayBuilder::new()
            .with_scopes(read_write())
            .register_tool(create_node_descriptor(), tool.clone())
            .unwrap();
        let (gateway, _) = with_recorder(builder);

        let response = gateway
            .invoke(
                ToolInvocationRequest::new("mcp_tools___create_node")
                    .with_arguments(json!({"title": "Hello", "type": "page"})),
            )
            .await;
        assert!(!response.is_error, "{}", response.human_text);

        let response = gateway
            .invoke(
                ToolInvocationRequest::new("mcp_tools:create_node")
                    .with_arguments(json!({"title": "Hi", "type": "page", "published": "yes"})),
            )
            .await;
        assert!(!response.is_error);

        let calls = tool.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0]["published"], json!(false));
        assert_eq!(calls[1]["published"], json!(true));
    }

    #[tokio::test]
    async fn test_events_carry_redacted_arguments() {
        let tool = MockTool::ok("Logged in.");
        let builder = GatewayBuilder::new()
            .register_tool(read_descriptor("login_check"), tool.clone())
            .unwrap();
        let (gateway, recorder) = with_recorder(builder);

        gateway
            .call(
                "mcp_tools___login_check",
                args(json!({"user": "admin", "password": "hunter2"})),
                Some(RequestId::from(11_i64)),
            )
            .await;

        let events = recorder.events();
        assert_eq!(recorder.event_types(), vec!["started", "succeeded"]);
        let invocation = events[0].invocation();
        assert_eq!(invocation.arguments["password"], json!("[REDACTED]"));
        assert_eq!(invocation.arguments["user"], json!("admin"));
        assert_eq!(invocation.request_id, Some(RequestId::Number(11)));
        assert_eq!(invocation.plugin_id, "mcp_tools:login_check");
        assert_eq!(invocation.tool_name, "mcp_tools___login_check");
        assert_eq!(
            events[0].metadata().correlation_id,
            events[1].metadata().correlation_id
        );

        assert_eq!(tool.calls()[0]["password"], json!("hunter2"));
    }

    #[tokio::test]
    async fn test_instantiation_failure() {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                read_descriptor("broken"),
                Arc::new(FailingFactory::new("missing service")),
            )
            .unwrap();
        let (gateway, recorder) = with_recorder(GatewayBuilder::new().with_registry(registry));

        let response = gateway.invoke(ToolInvocationRequest::new("mcp_tools:broken")).await;
        assert_eq!(response.error_code(), Some("INSTANTIATION_FAILED"));
        assert_eq!(
            response.error(),
            Some("Tool instantiation failed: missing service")
        );

        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1].failure_reason(),
            Some(FailureReason::InstantiationFailed)
        );
    }

    #[tokio::test]
    async fn test_timeout_becomes_execution_failure() {
        let builder = GatewayBuilder::new()
            .with_execution_timeout(Duration::from_millis(20))
            .register_tool(read_descriptor("hang"), HangingTool)
            .unwrap();
        let (gateway, recorder) = with_recorder(builder);

        let response = gateway.invoke(ToolInvocationRequest::new("mcp_tools:hang")).await;
        assert_eq!(response.error_code(), Some("EXECUTION_FAILED"));
        assert_eq!(response.error(), Some("Timeout after 20ms"));
        assert_eq!(
            recorder.events()[1].failure_reason(),
            Some(FailureReason::ExecutionFailed)
        );
    }

    #[tokio::test]
    async fn test_tool_reported_failure_is_not_audited() {
        let tool = MockTool::new(ToolOutput::failure("Node is locked."));
        let builder = GatewayBuilder::new()
            .with_scopes(read_write())
            .with_audit_log(AuditLog::in_memory("ops-bot"))
            .register_tool(delete_node_descriptor(), tool)
            .unwrap();
        let (gateway, recorder) = with_recorder(builder);

        let response = gateway
            .invoke(ToolInvocationRequest::new("mcp_tools:delete_node").with_argument("nid", json!(4)))
            .await;

        assert!(response.is_error);
        assert!(response.error_code().is_none());
        assert_eq!(response.human_text, "Node is locked.");
        assert_eq!(recorder.event_types(), vec!["started", "succeeded"]);
        assert!(gateway.audit_log().records().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_audit_uses_descriptor_metadata() {
        let builder = GatewayBuilder::new()
            .with_scopes(read_write())
            .with_audit_log(AuditLog::in_memory("ops-bot"))
            .register_tool(delete_node_descriptor(), MockTool::ok("Deleted."))
            .unwrap();
        let gateway = builder.build();

        gateway
            .invoke(
                ToolInvocationRequest::new("mcp_tools___delete_node")
                    .with_arguments(json!({"nid": "12", "token": "abc"})),
            )
            .await;

        let records = gateway.audit_log().records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, "delete_node");
        assert_eq!(records[0].target_type, "content");
        assert_eq!(records[0].target_id, "12");
        assert_eq!(records[0].details["token"], json!("[REDACTED]"));
    }

    #[test]
    fn test_audit_target_precedence() {
        let descriptor = delete_node_descriptor();
        let arguments = args(json!({"nid": 5}));

        let from_output = ToolOutput::success("ok").with_target_id("node/9");
        assert_eq!(audit_target(&descriptor, &from_output, &arguments), "node/9");

        let plain = ToolOutput::success("ok");
        assert_eq!(audit_target(&descriptor, &plain, &arguments), "5");
        assert_eq!(audit_target(&descriptor, &plain, &Map::new()), UNKNOWN_TARGET);

        let untargeted = create_node_descriptor();
        assert_eq!(audit_target(&untargeted, &plain, &arguments), UNKNOWN_TARGET);
    }

    #[test]
    fn test_builder_from_config() {
        let mut config = Config::default();
        config.access.default_scopes = vec!["read".to_owned(), "admin".to_owned()];
        config.access.allowed_scopes = Some(vec!["read".to_owned(), "admin".to_owned()]);
        config.audit.actor = "ops-bot".to_owned();

        let gateway = GatewayBuilder::from_config(&config).build();
        assert!(gateway.context().scopes.contains(Scope::Admin));
        assert_eq!(gateway.audit_log().actor(), "ops-bot");
        assert_eq!(gateway.events().subscriber_count(), 1);
    }

    #[test]
    fn test_builder_from_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = GatewayBuilder::from_config_file(&dir.path().join("absent.toml"))
            .unwrap()
            .build();
        assert!(!gateway.context().scopes.contains(Scope::Write));
    }

    #[test]
    fn test_panic_message_payloads() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(boxed.as_ref()), "static");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(5_u8);
        assert_eq!(panic_message(boxed.as_ref()), "non-string panic payload");
    }

    #[test]
    fn test_init_logging_rejects_bad_directive() {
        let mut config = Config::default();
        config.logging.directives = vec!["toolgate_gateway=loud".to_owned()];
        let err = init_logging(&config).unwrap_err();
        assert!(matches!(err, crate::GatewayError::Telemetry(_)));
    }
}
