//! Name → handler mapping with each tool's schema.

use std::collections::BTreeMap;
use std::sync::Arc;

use jsonschema::JSONSchema;
use tracing::debug;

use super::schema::compile_schema;
use super::ToolHandler;
use crate::error::ToolError;
use crate::message::ToolDescriptor;

/// A registry entry: the handler plus the descriptor captured at
/// registration and its compiled parameter schema.
#[derive(Clone)]
pub struct RegisteredTool {
    pub descriptor: ToolDescriptor,
    pub schema: Arc<JSONSchema>,
    pub handler: Arc<dyn ToolHandler>,
}

/// Static catalogue of the tools a model may call.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its descriptor's name.
    ///
    /// Fails on a name collision or a parameter schema that does not compile.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> Result<(), ToolError> {
        let descriptor = handler.descriptor();
        if self.tools.contains_key(&descriptor.name) {
            return Err(ToolError::DuplicateTool(descriptor.name));
        }
        let schema = compile_schema(&descriptor.name, &descriptor.parameters)?;
        debug!(tool = %descriptor.name, "Registered tool");
        self.tools.insert(
            descriptor.name.clone(),
            RegisteredTool {
                descriptor,
                schema: Arc::new(schema),
                handler,
            },
        );
        Ok(())
    }

    pub fn with_tool(mut self, handler: Arc<dyn ToolHandler>) -> Result<Self, ToolError> {
        self.register(handler)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Descriptors of every registered tool, sorted by name.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.values().map(|t| t.descriptor.clone()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
