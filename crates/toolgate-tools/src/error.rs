//! Tool and registry error types.

use thiserror::Error;

/// Errors raised by a tool factory or a running tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool could not be constructed.
    #[error("{0}")]
    InstantiationFailed(String),

    /// Execution failed. Displays the tool's own message.
    #[error("{0}")]
    ExecutionFailed(String),

    /// The tool panicked while executing.
    #[error("Tool panicked: {0}")]
    Panicked(String),

    /// Timeout.
    #[error("Timeout after {0}ms")]
    Timeout(u64),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors raised while populating a [`ToolRegistry`](crate::ToolRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A tool with the same id is already registered.
    #[error("tool already registered: {0}")]
    DuplicateTool(String),

    /// The descriptor is unusable.
    #[error("invalid descriptor for {id}: {reason}")]
    InvalidDescriptor {
        /// Tool id as declared.
        id: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
