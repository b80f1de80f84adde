//! Calendar domain: event types, the backend contract, and the four
//! calendar tools exposed to the model.
//!
//! The concrete calendar service client lives outside this crate; anything
//! implementing [`CalendarBackend`] can be plugged in. [`InMemoryCalendar`]
//! backs the console app and the tests.

mod clock;
mod memory;
mod tools;
mod types;

#[cfg(test)]
mod tests;

use async_trait::async_trait;

pub use clock::{Clock, FixedClock, SystemClock, DATETIME_FORMAT};
pub use memory::InMemoryCalendar;
pub use tools::{
    calendar_registry, AddCalendarEventTool, CurrentDateTimeTool, DeleteCalendarEventTool,
    GetCalendarEventsTool,
};
pub use types::{parse_datetime, CalendarEvent, EventQuery, NewEvent};

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("event {0} not found")]
    NotFound(String),
    #[error("invalid event: {0}")]
    InvalidEvent(String),
    #[error("calendar backend error: {0}")]
    Backend(String),
}

/// Contract the calendar tools need from a calendar service.
#[async_trait]
pub trait CalendarBackend: Send + Sync {
    /// Events matching `query`, ordered by start time.
    async fn list_events(&self, query: &EventQuery) -> Result<Vec<CalendarEvent>, CalendarError>;

    async fn insert_event(&self, event: NewEvent) -> Result<CalendarEvent, CalendarError>;

    async fn delete_event(&self, event_id: &str) -> Result<(), CalendarError>;
}
