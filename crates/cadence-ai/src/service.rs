//! "Submit text for a session, get a reply."

use std::sync::Arc;

use cadence_common::SessionId;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::conversation::ConversationStore;
use crate::error::TurnError;
use crate::message::Message;
use crate::orchestrator::Orchestrator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Front door of the dialogue engine. Cheap to clone and share between tasks.
#[derive(Clone)]
pub struct ChatService {
    store: ConversationStore,
    orchestrator: Arc<Orchestrator>,
}

impl ChatService {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self::with_store(orchestrator, ConversationStore::new())
    }

    pub fn with_store(orchestrator: Orchestrator, store: ConversationStore) -> Self {
        Self {
            store,
            orchestrator: Arc::new(orchestrator),
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Run one turn for `session`.
    ///
    /// Model failures and the turn ceiling still produce a reply. A second
    /// submit while the session's turn is running is rejected.
    pub async fn submit(
        &self,
        session: &SessionId,
        request: ChatRequest,
    ) -> Result<ChatResponse, TurnError> {
        if request.text.trim().is_empty() {
            return Err(TurnError::EmptyInput);
        }

        let mut conversation = self.store.begin_turn(session).await?;
        match self.orchestrator.run_turn(&mut conversation, request.text).await {
            Ok(outcome) => {
                info!(
                    session = %session,
                    status = ?outcome.status,
                    model_calls = outcome.model_calls,
                    "Reply ready"
                );
                Ok(ChatResponse {
                    reply: outcome.reply,
                })
            }
            Err(violation) => {
                error!(session = %session, error = %violation, "Turn aborted");
                Err(violation.into())
            }
        }
    }

    /// Full history of a session, if it exists.
    pub async fn history(&self, session: &SessionId) -> Option<Vec<Message>> {
        self.store.snapshot(session).await
    }
}
