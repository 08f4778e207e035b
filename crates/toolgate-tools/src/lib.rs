//! Toolgate Tools - descriptors, input schemas and the tool registry.
//!
//! A tool is a [`ToolDescriptor`] (static metadata the gateway reasons about)
//! plus a [`ToolFactory`] that produces a [`Tool`] instance per invocation.
//! Tools are registered explicitly in a [`ToolRegistry`]; there is no
//! discovery.
//!
//! # Example
//!
//! ```rust
//! use serde_json::{Map, Value};
//! use toolgate_core::OperationKind;
//! use toolgate_tools::prelude::*;
//!
//! struct SiteStatus;
//!
//! #[async_trait::async_trait]
//! impl Tool for SiteStatus {
//!     async fn execute(&self, _args: Map<String, Value>) -> ToolResult<ToolOutput> {
//!         Ok(ToolOutput::success("Site is up."))
//!     }
//! }
//!
//! let mut registry = ToolRegistry::new();
//! registry
//!     .register_tool(
//!         ToolDescriptor::new("mcp_tools:site_status", "mcp_tools", OperationKind::Read, "ops"),
//!         SiteStatus,
//!     )
//!     .unwrap();
//! assert!(registry.resolve("mcp_tools___site_status").is_some());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod descriptor;
pub mod error;
pub mod registry;
pub mod schema;
pub mod tool;

pub use descriptor::{ToolDescriptor, id_to_mcp_name, mcp_name_to_id};
pub use error::{RegistryError, RegistryResult, ToolError, ToolResult};
pub use registry::{ProviderFilter, RegisteredTool, ToolRegistry};
pub use schema::{FieldSpec, FieldType, InputSchema};
pub use tool::{FnToolFactory, SharedToolFactory, Tool, ToolFactory, ToolOutput};
