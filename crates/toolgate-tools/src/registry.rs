//! Explicit registry of callable tools.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::descriptor::{ToolDescriptor, mcp_name_to_id};
use crate::error::{RegistryError, RegistryResult};
use crate::tool::{SharedToolFactory, Tool, ToolFactory};

/// Restricts which providers' tools are visible and callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderFilter {
    /// Every provider.
    All,
    /// Providers whose name starts with the prefix.
    Prefix(String),
}

impl ProviderFilter {
    /// Build from the gateway settings.
    #[must_use]
    pub fn new(include_all: bool, prefix: &str) -> Self {
        if include_all {
            Self::All
        } else {
            Self::Prefix(prefix.to_owned())
        }
    }

    /// Whether a tool from `provider` passes the filter.
    #[must_use]
    pub fn allows(&self, provider: &str) -> bool {
        match self {
            Self::All => true,
            Self::Prefix(prefix) => provider.starts_with(prefix.as_str()),
        }
    }
}

impl Default for ProviderFilter {
    fn default() -> Self {
        Self::Prefix("mcp_tools".to_owned())
    }
}

/// A descriptor paired with the factory that instantiates it.
#[derive(Clone)]
pub struct RegisteredTool {
    descriptor: ToolDescriptor,
    factory: Arc<dyn ToolFactory>,
}

impl RegisteredTool {
    /// Static metadata.
    #[must_use]
    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    /// Instance factory.
    #[must_use]
    pub fn factory(&self) -> &Arc<dyn ToolFactory> {
        &self.factory
    }
}

impl fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("id", &self.descriptor.id)
            .finish_non_exhaustive()
    }
}

/// Registry of tools keyed by id.
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool with its factory.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor is malformed or the id is taken.
    pub fn register(
        &mut self,
        descriptor: ToolDescriptor,
        factory: Arc<dyn ToolFactory>,
    ) -> RegistryResult<()> {
        descriptor.validate()?;
        if self.tools.contains_key(&descriptor.id) {
            return Err(RegistryError::DuplicateTool(descriptor.id));
        }
        debug!(tool = %descriptor.id, provider = %descriptor.provider, "Registered tool");
        self.tools.insert(
            descriptor.id.clone(),
            RegisteredTool {
                descriptor,
                factory,
            },
        );
        Ok(())
    }

    /// Register a single shared instance.
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register).
    pub fn register_tool<T>(&mut self, descriptor: ToolDescriptor, tool: T) -> RegistryResult<()>
    where
        T: Tool + 'static,
    {
        self.register(descriptor, Arc::new(SharedToolFactory::new(Arc::new(tool))))
    }

    /// Get a tool by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RegisteredTool> {
        self.tools.get(id)
    }

    /// Resolve a client-supplied name. Accepts both the id form
    /// (`provider:name`) and the MCP form (`provider___name`).
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools
            .get(name)
            .or_else(|| self.tools.get(&mcp_name_to_id(name)))
    }

    /// Resolve a name, hiding tools the filter rejects.
    #[must_use]
    pub fn resolve_visible(&self, name: &str, filter: &ProviderFilter) -> Option<&RegisteredTool> {
        self.resolve(name)
            .filter(|tool| filter.allows(&tool.descriptor.provider))
    }

    /// Descriptors of every visible tool, ordered by id.
    pub fn descriptors<'a>(
        &'a self,
        filter: &'a ProviderFilter,
    ) -> impl Iterator<Item = &'a ToolDescriptor> + 'a {
        self.tools
            .values()
            .map(RegisteredTool::descriptor)
            .filter(move |d| filter.allows(&d.provider))
    }

    /// MCP `tools/list` entries for every visible tool.
    #[must_use]
    pub fn list_tools(&self, filter: &ProviderFilter) -> Vec<Value> {
        self.descriptors(filter)
            .map(ToolDescriptor::to_mcp_definition)
            .collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
