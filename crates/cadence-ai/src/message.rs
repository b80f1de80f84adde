//! Conversation message model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::ToolArgs;

/// One model-issued request to run a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique within the assistant turn that emitted it.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: ToolArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Error,
}

/// Outcome of executing one [`ToolCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_name: String,
    pub call_id: String,
    pub status: ToolStatus,
    pub payload: Value,
}

impl ToolResult {
    pub fn success(call: &ToolCall, payload: Value) -> Self {
        Self {
            tool_name: call.name.clone(),
            call_id: call.id.clone(),
            status: ToolStatus::Success,
            payload,
        }
    }

    pub fn error(call: &ToolCall, message: impl Into<String>) -> Self {
        Self {
            tool_name: call.name.clone(),
            call_id: call.id.clone(),
            status: ToolStatus::Error,
            payload: Value::String(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == ToolStatus::Error
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    User {
        text: String,
    },
    /// `text` is empty whenever `tool_calls` is not.
    Assistant {
        text: String,
        #[serde(default)]
        tool_calls: Vec<ToolCall>,
    },
    ToolResult(ToolResult),
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Message::User { text: text.into() }
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Message::Assistant {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Message::Assistant {
            text: String::new(),
            tool_calls,
        }
    }

    /// An assistant message with no tool calls ends a turn.
    pub fn is_final_answer(&self) -> bool {
        matches!(self, Message::Assistant { tool_calls, .. } if tool_calls.is_empty())
    }
}

/// Static description of a tool, sent to the model on every invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON schema (`type: object`) describing the accepted arguments.
    pub parameters: Value,
}
