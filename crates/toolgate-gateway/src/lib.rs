//! Toolgate Gateway - the tool execution pipeline.
//!
//! [`ToolExecutionGateway::invoke`] takes one tool call through:
//!
//! 1. lookup in the [`ToolRegistry`](toolgate_tools::ToolRegistry), honouring the provider filter
//! 2. argument upcasting and schema validation
//! 3. access policy, then the rate limiter for write/admin tools
//! 4. a `Started` lifecycle event
//! 5. instantiation and execution inside a panic boundary and optional timeout
//! 6. timing
//! 7. auditing of successful write/admin operations
//! 8. exactly one terminal lifecycle event
//! 9. normalization into a [`NormalizedResponse`]
//!
//! Rejections in steps 1-3 publish no events. Every outcome, including
//! panics, is returned as an envelope; `invoke` has no error path.
//!
//! In gateway mode the server lists only three meta-tools
//! ([`DISCOVER_TOOL`], [`GET_INFO_TOOL`], [`EXECUTE_TOOL`]). Discovery honours
//! the provider filter, and `execute-tool` feeds the named tool through the
//! same pipeline.
//!
//! # Example
//!
//! ```rust
//! use serde_json::{Map, Value, json};
//! use toolgate_core::OperationKind;
//! use toolgate_gateway::prelude::*;
//! use toolgate_tools::{Tool, ToolDescriptor, ToolOutput, ToolResult};
//!
//! struct SiteStatus;
//!
//! #[async_trait::async_trait]
//! impl Tool for SiteStatus {
//!     async fn execute(&self, _args: Map<String, Value>) -> ToolResult<ToolOutput> {
//!         Ok(ToolOutput::success("Site is up.").with_data(json!({"cron": "ok"})))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = ToolExecutionGateway::builder()
//!     .register_tool(
//!         ToolDescriptor::new("mcp_tools:site_status", "mcp_tools", OperationKind::Read, "ops"),
//!         SiteStatus,
//!     )?
//!     .build();
//!
//! let response = gateway
//!     .invoke(ToolInvocationRequest::new("mcp_tools___site_status"))
//!     .await;
//! assert!(!response.is_error);
//! assert_eq!(response.structured["data"]["cron"], "ok");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod context;
mod error;
mod gateway;
mod meta;
mod outcome;
mod responder;

pub use context::GatewayContext;
pub use error::{GatewayError, GatewayResult};
pub use gateway::{
    EVENT_SOURCE, GatewayBuilder, ToolExecutionGateway, UNKNOWN_TARGET, init_logging,
};
pub use meta::{DISCOVER_TOOL, EXECUTE_TOOL, GET_INFO_TOOL, MetaTool, gateway_tools};
pub use outcome::{ExecutionOutcome, NormalizedResponse, ToolInvocationRequest};
pub use responder::{
    ACCESS_REMEDIATION, EXECUTION_REMEDIATION, ErrorResponder, INSTANTIATION_REMEDIATION,
    INVALID_TOOL_REMEDIATION, RATE_LIMIT_REMEDIATION, VALIDATION_REMEDIATION,
};
