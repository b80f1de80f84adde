//! One turn in progress.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::{Orchestrator, TurnOutcome, TurnState, TurnStatus};
use crate::conversation::Conversation;
use crate::error::{AiError, ProtocolViolation};
use crate::message::{Message, ToolCall};
use crate::ModelReply;

/// A turn bound to one conversation, advanced with [`Turn::step`].
pub struct Turn<'a> {
    orchestrator: &'a Orchestrator,
    conversation: &'a mut Conversation,
    state: TurnState,
    model_calls: u32,
    correlation_id: String,
    outcome: Option<TurnOutcome>,
}

impl<'a> Turn<'a> {
    pub(super) fn new(
        orchestrator: &'a Orchestrator,
        conversation: &'a mut Conversation,
        correlation_id: String,
    ) -> Self {
        Self {
            orchestrator,
            conversation,
            state: TurnState::AwaitingModel,
            model_calls: 0,
            correlation_id,
            outcome: None,
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &*self.conversation
    }

    pub fn model_calls(&self) -> u32 {
        self.model_calls
    }

    /// The result, once the turn is done.
    pub fn outcome(&self) -> Option<&TurnOutcome> {
        self.outcome.as_ref()
    }

    pub(super) fn take_outcome(&mut self) -> Option<TurnOutcome> {
        self.outcome.take()
    }

    /// Advance by one transition and return the new state.
    ///
    /// Stepping a finished turn is a no-op.
    pub async fn step(&mut self) -> Result<TurnState, ProtocolViolation> {
        self.state = match self.state {
            TurnState::AwaitingModel => self.ask_model().await?,
            TurnState::AwaitingTool => self.run_next_tool().await?,
            TurnState::Done => TurnState::Done,
        };
        Ok(self.state)
    }

    async fn ask_model(&mut self) -> Result<TurnState, ProtocolViolation> {
        let limits = self.orchestrator.limits;
        if self.model_calls >= limits.max_model_calls {
            warn!(
                turn = %self.correlation_id,
                max_model_calls = limits.max_model_calls,
                "Turn limit reached"
            );
            let text = format!(
                "Sorry, I could not complete that request within {} steps.",
                limits.max_model_calls
            );
            return self.finish(text, TurnStatus::TurnLimitExceeded);
        }

        self.model_calls += 1;
        debug!(
            turn = %self.correlation_id,
            round = self.model_calls,
            history = self.conversation.len(),
            "Invoking model"
        );

        let invocation = self
            .orchestrator
            .invoker
            .invoke(self.conversation.snapshot(), &self.orchestrator.tools);
        let reply = match tokio::time::timeout(limits.model_timeout, invocation).await {
            Ok(reply) => reply,
            Err(_) => Err(AiError::Timeout(limits.model_timeout)),
        };

        match reply {
            Ok(ModelReply::Text(text)) => self.finish(text, TurnStatus::Answered),
            Ok(ModelReply::ToolCalls(calls)) => {
                if let Err(e) = check_tool_calls(&calls) {
                    return self.fail(e);
                }
                debug!(
                    turn = %self.correlation_id,
                    round = self.model_calls,
                    calls = calls.len(),
                    "Model requested tools"
                );
                self.conversation.append(Message::assistant_tool_calls(calls))?;
                Ok(TurnState::AwaitingTool)
            }
            Err(e) => self.fail(e),
        }
    }

    async fn run_next_tool(&mut self) -> Result<TurnState, ProtocolViolation> {
        let Some(call) = self.conversation.pending_calls().first().map(|c| (*c).clone()) else {
            return Ok(TurnState::AwaitingModel);
        };

        let result = self.orchestrator.dispatcher.dispatch(&call).await;
        debug!(
            turn = %self.correlation_id,
            tool = %call.name,
            call_id = %call.id,
            status = ?result.status,
            "Tool finished"
        );
        self.conversation.append(Message::ToolResult(result))?;

        if self.conversation.pending_calls().is_empty() {
            Ok(TurnState::AwaitingModel)
        } else {
            Ok(TurnState::AwaitingTool)
        }
    }

    fn fail(&mut self, error: AiError) -> Result<TurnState, ProtocolViolation> {
        warn!(turn = %self.correlation_id, error = %error, "Model invocation failed");
        let text = format!("Error: {error}. Please try again.");
        self.finish(text, TurnStatus::InvocationFailed)
    }

    fn finish(&mut self, text: String, status: TurnStatus) -> Result<TurnState, ProtocolViolation> {
        self.conversation.append(Message::assistant_text(text.clone()))?;
        info!(
            turn = %self.correlation_id,
            status = ?status,
            model_calls = self.model_calls,
            messages = self.conversation.len(),
            "Turn finished"
        );
        self.outcome = Some(TurnOutcome {
            reply: text,
            status,
            model_calls: self.model_calls,
        });
        Ok(TurnState::Done)
    }
}

/// A tool-call reply the log would refuse is a malformed model reply.
fn check_tool_calls(calls: &[ToolCall]) -> Result<(), AiError> {
    if calls.is_empty() {
        return Err(AiError::ParseError(
            "reply held an empty tool call list".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = calls.iter().find(|c| !seen.insert(c.id.as_str())) {
        return Err(AiError::ParseError(format!(
            "tool call id {} appears more than once in one reply",
            dup.id
        )));
    }
    Ok(())
}
