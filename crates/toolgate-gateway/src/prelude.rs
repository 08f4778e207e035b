//! Prelude module - commonly used types for convenient import.
//!
//! Use `use toolgate_gateway::prelude::*;` to import all essential types.

pub use crate::{
    ErrorResponder, ExecutionOutcome, GatewayBuilder, GatewayContext, GatewayError, GatewayResult,
    MetaTool, NormalizedResponse, ToolExecutionGateway, ToolInvocationRequest,
};
