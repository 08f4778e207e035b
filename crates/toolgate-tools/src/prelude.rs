//! Prelude module - commonly used types for convenient import.
//!
//! Use `use toolgate_tools::prelude::*;` to import all essential types.

pub use crate::{
    FieldSpec, FieldType, InputSchema, ProviderFilter, RegistryError, RegistryResult, Tool,
    ToolDescriptor, ToolError, ToolFactory, ToolOutput, ToolRegistry, ToolResult,
};
