//! Append-only message log for one session.

use std::collections::HashSet;

use crate::error::ProtocolViolation;
use crate::message::{Message, ToolCall, ToolResult};

/// Ordered, append-only log of one session's messages.
///
/// Every append is checked against the log's invariants: tool results only
/// answer the most recent assistant turn, each call is answered once, and
/// no new user or assistant message is accepted while calls are pending.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return the new length.
    pub fn append(&mut self, message: Message) -> Result<usize, ProtocolViolation> {
        self.check(&message)?;
        self.messages.push(message);
        Ok(self.messages.len())
    }

    /// Read-only view of the full history.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// True when the last message is a final assistant answer.
    pub fn is_terminal(&self) -> bool {
        self.messages.last().is_some_and(Message::is_final_answer)
    }

    /// Unanswered calls of the latest assistant turn, in emitted order.
    pub fn pending_calls(&self) -> Vec<&ToolCall> {
        let Some((index, calls)) = self.latest_assistant_calls() else {
            return Vec::new();
        };
        let answered = self.answered_since(index);
        calls
            .iter()
            .filter(|call| !answered.contains(call.id.as_str()))
            .collect()
    }

    /// Answer every pending call with an error result carrying `reason`.
    /// Returns how many calls were closed.
    pub fn close_pending(&mut self, reason: &str) -> Result<usize, ProtocolViolation> {
        let pending: Vec<ToolCall> = self.pending_calls().into_iter().cloned().collect();
        for call in &pending {
            self.append(Message::ToolResult(ToolResult::error(call, reason)))?;
        }
        Ok(pending.len())
    }

    fn check(&self, message: &Message) -> Result<(), ProtocolViolation> {
        match message {
            Message::User { .. } => self.require_no_pending(),
            Message::Assistant { text, tool_calls } => {
                self.require_no_pending()?;
                if !text.is_empty() && !tool_calls.is_empty() {
                    return Err(ProtocolViolation::MixedAssistantMessage);
                }
                let mut seen = HashSet::new();
                for call in tool_calls {
                    if !seen.insert(call.id.as_str()) {
                        return Err(ProtocolViolation::DuplicateCallId(call.id.clone()));
                    }
                }
                Ok(())
            }
            Message::ToolResult(result) => self.check_tool_result(result),
        }
    }

    fn check_tool_result(&self, result: &ToolResult) -> Result<(), ProtocolViolation> {
        let orphan = || ProtocolViolation::OrphanToolResult {
            call_id: result.call_id.clone(),
        };
        let (index, calls) = self.latest_assistant_calls().ok_or_else(orphan)?;

        // A user message after the assistant turn closes it.
        if self.messages[index + 1..]
            .iter()
            .any(|m| matches!(m, Message::User { .. }))
        {
            return Err(orphan());
        }

        let call = calls
            .iter()
            .find(|call| call.id == result.call_id)
            .ok_or_else(orphan)?;

        if call.name != result.tool_name {
            return Err(ProtocolViolation::ToolNameMismatch {
                call_id: result.call_id.clone(),
                expected: call.name.clone(),
                actual: result.tool_name.clone(),
            });
        }

        if self.answered_since(index).contains(result.call_id.as_str()) {
            return Err(ProtocolViolation::DuplicateToolResult {
                call_id: result.call_id.clone(),
            });
        }

        Ok(())
    }

    fn require_no_pending(&self) -> Result<(), ProtocolViolation> {
        let pending = self.pending_calls().len();
        if pending > 0 {
            return Err(ProtocolViolation::UnresolvedToolCalls { pending });
        }
        Ok(())
    }

    fn latest_assistant_calls(&self) -> Option<(usize, &[ToolCall])> {
        self.messages
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, m)| match m {
                Message::Assistant { tool_calls, .. } => Some((i, tool_calls.as_slice())),
                _ => None,
            })
    }

    fn answered_since(&self, index: usize) -> HashSet<&str> {
        self.messages[index + 1..]
            .iter()
            .filter_map(|m| match m {
                Message::ToolResult(result) => Some(result.call_id.as_str()),
                _ => None,
            })
            .collect()
    }
}
