//! Toolgate Test - Shared test utilities for the Toolgate gateway.
//!
//! Mock tools, factories, subscribers and audit storage, descriptor and
//! configuration fixtures, and in-memory log capture. Intended as a dev-dependency.
//!
//! ```toml
//! [dev-dependencies]
//! toolgate-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use toolgate_test::{MockTool, RecordingSubscriber, create_node_descriptor};
//!
//! let tool = MockTool::ok("Created.");
//! let calls = tool.clone();
//! let gateway = ToolExecutionGateway::builder()
//!     .register_tool(create_node_descriptor(), tool)?
//!     .build();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod logs;
pub mod mocks;

pub use fixtures::*;
pub use logs::*;
pub use mocks::*;
