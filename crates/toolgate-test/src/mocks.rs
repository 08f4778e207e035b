//! Mock implementations for testing.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use toolgate_audit::{AuditError, AuditRecord, AuditResult, AuditStorage};
use toolgate_events::{EventSubscriber, LifecycleEvent};
use toolgate_tools::{Tool, ToolError, ToolFactory, ToolOutput, ToolResult};

/// A tool that returns a fixed output and records every call.
///
/// Clones share the call log, so keep a clone to inspect calls after
/// handing the tool to a registry.
#[derive(Debug, Clone)]
pub struct MockTool {
    output: ToolOutput,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<Map<String, Value>>>>,
}

impl MockTool {
    /// Tool returning `output`.
    #[must_use]
    pub fn new(output: ToolOutput) -> Self {
        Self {
            output,
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Tool reporting success with `message`.
    #[must_use]
    pub fn ok(message: &str) -> Self {
        Self::new(ToolOutput::success(message))
    }

    /// Sleep before returning.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Arguments of every call so far.
    #[must_use]
    pub fn calls(&self) -> Vec<Map<String, Value>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl Tool for MockTool {
    async fn execute(&self, arguments: Map<String, Value>) -> ToolResult<ToolOutput> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(arguments);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.output.clone())
    }
}

/// A tool that fails with an execution error, optionally after a delay.
#[derive(Debug, Clone)]
pub struct FailingTool {
    message: String,
    delay: Option<Duration>,
}

impl FailingTool {
    /// Fail immediately with `message`.
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
            delay: None,
        }
    }

    /// Sleep before failing.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl Tool for FailingTool {
    async fn execute(&self, _arguments: Map<String, Value>) -> ToolResult<ToolOutput> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Err(ToolError::ExecutionFailed(self.message.clone()))
    }
}

/// A tool that panics.
#[derive(Debug, Clone)]
pub struct PanickingTool {
    message: String,
}

impl PanickingTool {
    /// Panic with `message`.
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

#[async_trait]
impl Tool for PanickingTool {
    async fn execute(&self, _arguments: Map<String, Value>) -> ToolResult<ToolOutput> {
        panic!("{}", self.message);
    }
}

/// A tool that never finishes in test time.
#[derive(Debug, Clone, Copy, Default)]
pub struct HangingTool;

#[async_trait]
impl Tool for HangingTool {
    async fn execute(&self, _arguments: Map<String, Value>) -> ToolResult<ToolOutput> {
        tokio::time::sleep(Duration::from_secs(3_600)).await;
        Ok(ToolOutput::success("woke up"))
    }
}

/// A factory that can never build its tool.
#[derive(Debug, Clone)]
pub struct FailingFactory {
    message: String,
}

impl FailingFactory {
    /// Fail with `message`.
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

impl ToolFactory for FailingFactory {
    fn create(&self) -> ToolResult<Arc<dyn Tool>> {
        Err(ToolError::InstantiationFailed(self.message.clone()))
    }
}

/// Records every event it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingSubscriber {
    name: String,
    events: Arc<Mutex<Vec<LifecycleEvent>>>,
}

impl RecordingSubscriber {
    /// Create a recorder.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Events received so far.
    #[must_use]
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Event type names received so far, e.g. `["started", "succeeded"]`.
    #[must_use]
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(LifecycleEvent::event_type)
            .collect()
    }
}

impl EventSubscriber for RecordingSubscriber {
    fn on_event(&self, event: &LifecycleEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Panics on every terminal event.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingSubscriber;

impl EventSubscriber for PanickingSubscriber {
    fn on_event(&self, event: &LifecycleEvent) {
        if event.is_terminal() {
            panic!("subscriber failure on {}", event.event_type());
        }
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

/// Audit storage whose writes always fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingAuditStorage;

impl AuditStorage for FailingAuditStorage {
    fn append(&self, _record: &AuditRecord) -> AuditResult<()> {
        Err(AuditError::StorageError("disk full".to_owned()))
    }

    fn records(&self) -> AuditResult<Vec<AuditRecord>> {
        Ok(Vec::new())
    }
}
