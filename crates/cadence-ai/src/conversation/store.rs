//! Session store: maps session ids to their conversations.

use std::collections::HashMap;
use std::sync::Arc;

use cadence_common::SessionId;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;

use super::log::Conversation;
use crate::error::TurnError;
use crate::message::Message;

/// Exclusive access to one session's conversation for the length of a turn.
pub type TurnGuard = OwnedMutexGuard<Conversation>;

/// Thread-safe conversation store.
///
/// Each session has its own lock, so turns on different sessions run
/// concurrently while a second turn on a busy session is rejected.
#[derive(Clone, Default)]
pub struct ConversationStore {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<Mutex<Conversation>>>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the session's conversation for a turn, creating it empty on
    /// first use. Fails with [`TurnError::SessionBusy`] if a turn is
    /// already running for this session.
    pub async fn begin_turn(&self, session: &SessionId) -> Result<TurnGuard, TurnError> {
        let slot = self.slot(session).await;
        slot.try_lock_owned()
            .map_err(|_| TurnError::SessionBusy(session.clone()))
    }

    /// Copy of the session's history, waiting for any running turn to finish.
    pub async fn snapshot(&self, session: &SessionId) -> Option<Vec<Message>> {
        let slot = self.sessions.read().await.get(session).cloned()?;
        let conversation = slot.lock().await;
        Some(conversation.snapshot().to_vec())
    }

    /// Forget a session. A turn still holding it finishes on its own copy.
    pub async fn end_session(&self, session: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(session).is_some();
        if removed {
            debug!(session = %session, "Session ended");
        }
        removed
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn slot(&self, session: &SessionId) -> Arc<Mutex<Conversation>> {
        if let Some(slot) = self.sessions.read().await.get(session) {
            return Arc::clone(slot);
        }
        let mut map = self.sessions.write().await;
        Arc::clone(map.entry(session.clone()).or_insert_with(|| {
            debug!(session = %session, "Session created");
            Arc::new(Mutex::new(Conversation::new()))
        }))
    }
}
