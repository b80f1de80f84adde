//! In-process calendar backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{CalendarBackend, CalendarError, CalendarEvent, EventQuery, NewEvent};

/// Calendar held in memory. Contents are lost when the process exits.
#[derive(Default)]
pub struct InMemoryCalendar {
    events: RwLock<HashMap<String, CalendarEvent>>,
}

impl InMemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: impl IntoIterator<Item = CalendarEvent>) -> Self {
        let events = events.into_iter().map(|e| (e.id.clone(), e)).collect();
        Self {
            events: RwLock::new(events),
        }
    }

    /// Build a calendar from a JSON array of events.
    pub fn from_seed_json(json: &str) -> Result<Self, CalendarError> {
        let events: Vec<CalendarEvent> = serde_json::from_str(json)
            .map_err(|e| CalendarError::Backend(format!("invalid seed data: {e}")))?;
        info!(count = events.len(), "Seeded in-memory calendar");
        Ok(Self::with_events(events))
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl CalendarBackend for InMemoryCalendar {
    async fn list_events(&self, query: &EventQuery) -> Result<Vec<CalendarEvent>, CalendarError> {
        let events = self.events.read().await;
        let mut matching: Vec<CalendarEvent> =
            events.values().filter(|e| query.matches(e)).cloned().collect();
        matching.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        debug!(count = matching.len(), "Listed events");
        Ok(matching)
    }

    async fn insert_event(&self, event: NewEvent) -> Result<CalendarEvent, CalendarError> {
        event.validate()?;
        let created = event.into_event(uuid::Uuid::new_v4().simple().to_string());
        self.events
            .write()
            .await
            .insert(created.id.clone(), created.clone());
        debug!(event_id = %created.id, "Inserted event");
        Ok(created)
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), CalendarError> {
        match self.events.write().await.remove(event_id) {
            Some(_) => {
                debug!(event_id, "Deleted event");
                Ok(())
            }
            None => Err(CalendarError::NotFound(event_id.to_string())),
        }
    }
}
