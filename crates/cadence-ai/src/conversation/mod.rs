//! Conversation log and per-session store.

mod log;
mod store;


pub use log::Conversation;
pub use store::{ConversationStore, TurnGuard};
