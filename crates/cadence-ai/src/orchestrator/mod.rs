//! The per-turn state machine.
//!
//! A turn starts in [`TurnState::AwaitingModel`]. Each [`Turn::step`] either
//! asks the model for its next move or runs exactly one pending tool call,
//! appending what it gets to the conversation, until the turn reaches
//! [`TurnState::Done`].

mod turn;


use std::sync::Arc;
use std::time::Duration;

use cadence_common::new_correlation_id;
use tracing::{info, warn};

use crate::conversation::Conversation;
use crate::error::ProtocolViolation;
use crate::message::{Message, ToolDescriptor};
use crate::tools::ToolDispatcher;
use crate::ModelInvoker;

pub use turn::Turn;

/// Result payload for a tool call whose turn ended before it finished.
pub const INTERRUPTED_CALL: &str = "tool call interrupted before it finished";

/// Where a turn currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitingModel,
    AwaitingTool,
    Done,
}

/// How a finished turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// The model produced a final answer.
    Answered,
    /// The model service failed; the reply is an error text.
    InvocationFailed,
    /// The model-call ceiling was hit; the reply is a "could not complete" text.
    TurnLimitExceeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub reply: String,
    pub status: TurnStatus,
    /// Model invocations made during the turn.
    pub model_calls: u32,
}

/// Bounds on a single turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnLimits {
    pub max_model_calls: u32,
    pub model_timeout: Duration,
}

impl Default for TurnLimits {
    fn default() -> Self {
        Self {
            max_model_calls: 10,
            model_timeout: Duration::from_secs(60),
        }
    }
}

/// Drives turns against a model and a tool dispatcher.
///
/// Holds no conversation state of its own; the conversation is passed in
/// per turn, so one orchestrator serves every session.
pub struct Orchestrator {
    invoker: Arc<dyn ModelInvoker>,
    dispatcher: ToolDispatcher,
    tools: Vec<ToolDescriptor>,
    limits: TurnLimits,
}

impl Orchestrator {
    pub fn new(invoker: Arc<dyn ModelInvoker>, dispatcher: ToolDispatcher) -> Self {
        let tools = dispatcher.registry().descriptors();
        Self {
            invoker,
            dispatcher,
            tools,
            limits: TurnLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: TurnLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> TurnLimits {
        self.limits
    }

    /// The catalogue sent to the model on every invocation.
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Append the user's text and return a turn positioned at
    /// [`TurnState::AwaitingModel`].
    ///
    /// Tool calls left open by a turn that was dropped mid-flight are
    /// answered with an error result first, so the session stays usable.
    pub fn begin<'a>(
        &'a self,
        conversation: &'a mut Conversation,
        text: impl Into<String>,
    ) -> Result<Turn<'a>, ProtocolViolation> {
        let closed = conversation.close_pending(INTERRUPTED_CALL)?;
        if closed > 0 {
            warn!(calls = closed, "Closed tool calls left open by an interrupted turn");
        }
        conversation.append(Message::user(text))?;
        let correlation_id = new_correlation_id();
        info!(turn = %correlation_id, history = conversation.len(), "Turn started");
        Ok(Turn::new(self, conversation, correlation_id))
    }

    /// Run a whole turn to completion.
    ///
    /// Only a broken conversation invariant is an error; model failures and
    /// the turn ceiling still produce a reply.
    pub async fn run_turn(
        &self,
        conversation: &mut Conversation,
        text: impl Into<String>,
    ) -> Result<TurnOutcome, ProtocolViolation> {
        let mut turn = self.begin(conversation, text)?;
        loop {
            turn.step().await?;
            if let Some(outcome) = turn.take_outcome() {
                return Ok(outcome);
            }
        }
    }
}
