//! Tool registry and dispatch.
//!
//! Tools are named, schema-described operations the model may request.
//! The registry maps a name to its handler; the dispatcher validates the
//! arguments against the declared schema and runs the handler, turning
//! every outcome into a [`ToolResult`](crate::ToolResult).

mod dispatcher;
mod registry;
mod schema;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::ToolError;
use crate::message::ToolDescriptor;

pub use dispatcher::ToolDispatcher;
pub use registry::{RegisteredTool, ToolRegistry};
pub use schema::{compile_schema, strip_nulls, validate_args};

/// Named arguments of a tool call.
pub type ToolArgs = serde_json::Map<String, serde_json::Value>;

/// A callable tool.
///
/// `call` only sees arguments that already passed [`validate_args`] against
/// the descriptor's schema, with `null`-valued arguments removed.
#[async_trait]
pub trait ToolHandler: Send + Sync + 'static {
    fn descriptor(&self) -> ToolDescriptor;

    async fn call(&self, args: ToolArgs) -> Result<serde_json::Value, ToolError>;
}

/// Decode validated arguments into a handler's typed parameter struct.
pub fn decode_args<T: DeserializeOwned>(tool: &str, args: ToolArgs) -> Result<T, ToolError> {
    serde_json::from_value(serde_json::Value::Object(args)).map_err(|e| {
        ToolError::InvalidArguments {
            tool: tool.to_string(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests;
