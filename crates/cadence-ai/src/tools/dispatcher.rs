//! Executes one tool call against the registry.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::registry::ToolRegistry;
use super::schema::{strip_nulls, validate_args};
use crate::error::ToolError;
use crate::message::{ToolCall, ToolResult};

/// Default per-call tool timeout.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs tool calls. Never fails: unknown tools, bad arguments, handler
/// errors, panics and timeouts all come back as error results.
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    timeout: Duration,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        debug!(tool = %call.name, call_id = %call.id, "Executing tool");
        match self.execute(call).await {
            Ok(payload) => ToolResult::success(call, payload),
            Err(e) => {
                warn!(tool = %call.name, call_id = %call.id, error = %e, "Tool call failed");
                ToolResult::error(call, e.to_string())
            }
        }
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let entry = self
            .registry
            .get(&call.name)
            .ok_or_else(|| ToolError::UnknownTool(call.name.clone()))?;

        let args = strip_nulls(&call.args);
        validate_args(&entry.schema, &args).map_err(|reason| ToolError::InvalidArguments {
            tool: call.name.clone(),
            reason,
        })?;

        // Run on its own task so a panicking handler cannot take the loop down.
        let handler = Arc::clone(&entry.handler);
        let task = tokio::spawn(async move { handler.call(args).await });
        let abort = task.abort_handle();

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) if join_error.is_panic() => {
                Err(ToolError::Panicked(call.name.clone()))
            }
            Ok(Err(_)) => Err(ToolError::Execution(format!(
                "tool {} was cancelled",
                call.name
            ))),
            Err(_) => {
                abort.abort();
                Err(ToolError::Timeout {
                    tool: call.name.clone(),
                    after: self.timeout,
                })
            }
        }
    }
}
