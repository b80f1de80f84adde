//! Calendar event types and filters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::CalendarError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
}

/// An event to be created; the backend assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: Option<String>,
    pub attendees: Vec<String>,
}

impl NewEvent {
    pub fn validate(&self) -> Result<(), CalendarError> {
        if self.summary.trim().is_empty() {
            return Err(CalendarError::InvalidEvent("summary must not be empty".into()));
        }
        if self.end < self.start {
            return Err(CalendarError::InvalidEvent(format!(
                "end {} is before start {}",
                self.end.to_rfc3339(),
                self.start.to_rfc3339()
            )));
        }
        Ok(())
    }

    pub fn into_event(self, id: impl Into<String>) -> CalendarEvent {
        CalendarEvent {
            id: id.into(),
            summary: self.summary,
            start: self.start,
            end: self.end,
            location: self.location,
            attendees: self.attendees,
        }
    }
}

/// Filter for listing events. Every field is optional; an empty query
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    /// First day included (from 00:00:00 UTC).
    pub start_date: Option<NaiveDate>,
    /// Last day included (through 23:59:59 UTC).
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring of the summary.
    pub summary_keyword: Option<String>,
    /// Case-insensitive attendee address.
    pub attendee_email: Option<String>,
}

impl EventQuery {
    pub fn time_min(&self) -> Option<DateTime<Utc>> {
        self.start_date
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    pub fn time_max(&self) -> Option<DateTime<Utc>> {
        self.end_date
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .map(|dt| dt.and_utc())
    }

    /// True when the event overlaps the date window and matches the
    /// keyword and attendee filters.
    pub fn matches(&self, event: &CalendarEvent) -> bool {
        if self.time_min().is_some_and(|min| event.end < min) {
            return false;
        }
        if self.time_max().is_some_and(|max| event.start > max) {
            return false;
        }
        if let Some(keyword) = &self.summary_keyword {
            if !event
                .summary
                .to_lowercase()
                .contains(&keyword.to_lowercase())
            {
                return false;
            }
        }
        if let Some(email) = &self.attendee_email {
            if !event
                .attendees
                .iter()
                .any(|a| a.eq_ignore_ascii_case(email))
            {
                return false;
            }
        }
        true
    }
}

/// Parse an ISO-8601 datetime. Values with an offset are converted to UTC;
/// values without one (`2025-07-03T14:00:00`) are taken as UTC.
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, CalendarError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            CalendarError::InvalidEvent(format!(
                "'{value}' is not an ISO datetime such as 2025-07-03T14:00:00"
            ))
        })
}
