//! The calendar tools offered to the model.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};

use super::clock::{Clock, DATETIME_FORMAT};
use super::types::parse_datetime;
use super::{CalendarBackend, CalendarError, EventQuery, NewEvent};
use crate::error::ToolError;
use crate::message::ToolDescriptor;
use crate::tools::{decode_args, ToolArgs, ToolHandler, ToolRegistry};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

impl From<CalendarError> for ToolError {
    fn from(err: CalendarError) -> Self {
        ToolError::Execution(err.to_string())
    }
}

/// Registry holding all four calendar tools.
pub fn calendar_registry(
    backend: Arc<dyn CalendarBackend>,
    clock: Arc<dyn Clock>,
) -> Result<ToolRegistry, ToolError> {
    ToolRegistry::new()
        .with_tool(Arc::new(GetCalendarEventsTool::new(Arc::clone(&backend))))?
        .with_tool(Arc::new(AddCalendarEventTool::new(Arc::clone(&backend))))?
        .with_tool(Arc::new(DeleteCalendarEventTool::new(backend)))?
        .with_tool(Arc::new(CurrentDateTimeTool::new(clock)))
}

fn invalid(tool: &str, reason: impl Into<String>) -> ToolError {
    ToolError::InvalidArguments {
        tool: tool.to_string(),
        reason: reason.into(),
    }
}

fn parse_date(
    tool: &str,
    field: &str,
    value: Option<String>,
) -> Result<Option<NaiveDate>, ToolError> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .map_err(|_| invalid(tool, format!("{field} '{v}' is not a YYYY-MM-DD date")))
        })
        .transpose()
}

// ---------------------------------------------------------------------------
// get_calendar_events
// ---------------------------------------------------------------------------

pub struct GetCalendarEventsTool {
    backend: Arc<dyn CalendarBackend>,
}

impl GetCalendarEventsTool {
    pub const NAME: &'static str = "get_calendar_events";

    pub fn new(backend: Arc<dyn CalendarBackend>) -> Self {
        Self { backend }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GetEventsParams {
    start_date: Option<String>,
    end_date: Option<String>,
    summary_keyword: Option<String>,
    attendee_email: Option<String>,
}

#[async_trait]
impl ToolHandler for GetCalendarEventsTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: Self::NAME.into(),
            description: "Fetches events from the calendar. Use it to search by date range, \
                          summary keyword or attendee email, e.g. to find an event id before \
                          deleting it."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "start_date": { "type": "string", "description": "Start date YYYY-MM-DD." },
                    "end_date": { "type": "string", "description": "End date YYYY-MM-DD." },
                    "summary_keyword": { "type": "string", "description": "Keyword to filter events." },
                    "attendee_email": { "type": "string", "description": "Filter by attendee email." }
                },
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, args: ToolArgs) -> Result<Value, ToolError> {
        let params: GetEventsParams = decode_args(Self::NAME, args)?;
        let query = EventQuery {
            start_date: parse_date(Self::NAME, "start_date", params.start_date)?,
            end_date: parse_date(Self::NAME, "end_date", params.end_date)?,
            summary_keyword: params.summary_keyword.filter(|k| !k.is_empty()),
            attendee_email: params.attendee_email.filter(|e| !e.is_empty()),
        };
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if start > end {
                return Err(invalid(Self::NAME, "start_date must not be after end_date"));
            }
        }

        let events = self.backend.list_events(&query).await?;
        tracing::info!(count = events.len(), "Found events matching criteria");
        Ok(json!({ "events": events }))
    }
}

// ---------------------------------------------------------------------------
// add_calendar_event
// ---------------------------------------------------------------------------

pub struct AddCalendarEventTool {
    backend: Arc<dyn CalendarBackend>,
}

impl AddCalendarEventTool {
    pub const NAME: &'static str = "add_calendar_event";

    pub fn new(backend: Arc<dyn CalendarBackend>) -> Self {
        Self { backend }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AddEventParams {
    summary: String,
    start_datetime: String,
    end_datetime: String,
    location: Option<String>,
    #[serde(default)]
    attendees: Option<Vec<String>>,
}

#[async_trait]
impl ToolHandler for AddCalendarEventTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: Self::NAME.into(),
            description: "Adds a new event to the calendar.".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "summary": { "type": "string", "description": "Event title." },
                    "start_datetime": { "type": "string", "description": "Start datetime in ISO format, e.g. 2025-07-03T14:00:00." },
                    "end_datetime": { "type": "string", "description": "End datetime in ISO format." },
                    "location": { "type": "string", "description": "Optional location." },
                    "attendees": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "List of attendee emails."
                    }
                },
                "required": ["summary", "start_datetime", "end_datetime"],
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, args: ToolArgs) -> Result<Value, ToolError> {
        let params: AddEventParams = decode_args(Self::NAME, args)?;
        let attendees = params.attendees.unwrap_or_default();
        if let Some(bad) = attendees.iter().find(|a| !EMAIL_RE.is_match(a)) {
            return Err(invalid(Self::NAME, format!("'{bad}' is not an email address")));
        }

        let event = NewEvent {
            summary: params.summary,
            start: parse_datetime(&params.start_datetime)
                .map_err(|e| invalid(Self::NAME, e.to_string()))?,
            end: parse_datetime(&params.end_datetime)
                .map_err(|e| invalid(Self::NAME, e.to_string()))?,
            location: params.location.filter(|l| !l.is_empty()),
            attendees,
        };

        let created = self.backend.insert_event(event).await?;
        Ok(json!({
            "event_id": created.id,
            "message": "Event created successfully."
        }))
    }
}

// ---------------------------------------------------------------------------
// delete_calendar_event
// ---------------------------------------------------------------------------

pub struct DeleteCalendarEventTool {
    backend: Arc<dyn CalendarBackend>,
}

impl DeleteCalendarEventTool {
    pub const NAME: &'static str = "delete_calendar_event";

    pub fn new(backend: Arc<dyn CalendarBackend>) -> Self {
        Self { backend }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DeleteEventParams {
    event_id: String,
}

#[async_trait]
impl ToolHandler for DeleteCalendarEventTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: Self::NAME.into(),
            description: "Deletes a calendar event by ID.".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "event_id": { "type": "string", "description": "ID of the event to delete." }
                },
                "required": ["event_id"],
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, args: ToolArgs) -> Result<Value, ToolError> {
        let params: DeleteEventParams = decode_args(Self::NAME, args)?;
        self.backend.delete_event(&params.event_id).await?;
        Ok(json!({
            "message": format!("Event {} deleted successfully.", params.event_id)
        }))
    }
}

// ---------------------------------------------------------------------------
// get_current_datetime
// ---------------------------------------------------------------------------

pub struct CurrentDateTimeTool {
    clock: Arc<dyn Clock>,
}

impl CurrentDateTimeTool {
    pub const NAME: &'static str = "get_current_datetime";

    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl ToolHandler for CurrentDateTimeTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: Self::NAME.into(),
            description: "Gets the current date and time as YYYY-MM-DD HH:MM:SS.".into(),
            parameters: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, _args: ToolArgs) -> Result<Value, ToolError> {
        Ok(Value::String(
            self.clock.now().format(DATETIME_FORMAT).to_string(),
        ))
    }
}
