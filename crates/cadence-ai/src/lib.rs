//! Tool-augmented dialogue engine for Cadence.
//!
//! Holds a conversation, asks a language model what to do next, runs any
//! tool the model requests and feeds the result back, until the model
//! produces a final answer:
//! - [`Conversation`] / [`ConversationStore`]: append-only message log per session
//! - [`ToolRegistry`] / [`ToolDispatcher`]: schema-checked tool execution
//! - [`ModelInvoker`] with a Gemini adapter ([`GeminiClient`])
//! - [`Orchestrator`]: the per-turn state machine
//! - [`ChatService`]: "submit text for a session, get a reply"

pub mod calendar;
pub mod conversation;
pub mod error;
pub mod gemini;
pub mod message;
pub mod orchestrator;
pub mod service;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_support;

use async_trait::async_trait;

pub use conversation::{Conversation, ConversationStore, TurnGuard};
pub use error::{AiError, ProtocolViolation, ToolError, TurnError};
pub use gemini::{GeminiClient, GeminiConfig};
pub use message::{Message, ToolCall, ToolDescriptor, ToolResult, ToolStatus};
pub use orchestrator::{Orchestrator, Turn, TurnLimits, TurnOutcome, TurnState, TurnStatus};
pub use service::{ChatRequest, ChatResponse, ChatService};
pub use tools::{ToolArgs, ToolDispatcher, ToolHandler, ToolRegistry};

/// What the model wants to happen next.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// A final, user-facing answer.
    Text(String),
    /// One or more tool executions, in the order the model emitted them.
    ToolCalls(Vec<ToolCall>),
}

/// Seam between the dialogue loop and a language-model service.
///
/// Implementations own translation to and from the service's wire format.
/// They must not retry or block on interactive input; every transport or
/// service failure comes back as an [`AiError`].
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(
        &self,
        history: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<ModelReply, AiError>;
}
