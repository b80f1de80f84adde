//! Error taxonomy for the dialogue loop.
//!
//! Tool errors stay inside the loop and are shown to the model. Model errors
//! end the turn with an apologetic reply. Protocol violations abort the turn.

use std::time::Duration;

use cadence_common::SessionId;

/// The model service could not produce a reply.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout after {0:?}")]
    Timeout(Duration),
    #[error("Not configured: {0}")]
    NotConfigured(String),
}

/// A tool call could not be executed successfully.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool {0}")]
    UnknownTool(String),
    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
    #[error("{0}")]
    Execution(String),
    #[error("tool {tool} timed out after {after:?}")]
    Timeout { tool: String, after: Duration },
    #[error("tool {0} panicked")]
    Panicked(String),
    #[error("tool {0} is already registered")]
    DuplicateTool(String),
    #[error("tool {tool} has an invalid parameter schema: {reason}")]
    InvalidSchema { tool: String, reason: String },
}

/// An append would break the conversation log's invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolViolation {
    #[error("tool result {call_id} does not answer a pending tool call")]
    OrphanToolResult { call_id: String },
    #[error("tool call {call_id} already has a result")]
    DuplicateToolResult { call_id: String },
    #[error("tool result {call_id} is for {expected}, not {actual}")]
    ToolNameMismatch {
        call_id: String,
        expected: String,
        actual: String,
    },
    #[error("{pending} tool call(s) are still pending")]
    UnresolvedToolCalls { pending: usize },
    #[error("assistant message carries both text and tool calls")]
    MixedAssistantMessage,
    #[error("tool call id {0} appears twice in one assistant turn")]
    DuplicateCallId(String),
}

/// Failure at the "submit text, get reply" boundary.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),
    #[error("session {0} is busy with another turn")]
    SessionBusy(SessionId),
    #[error("message text is empty")]
    EmptyInput,
}
