//! Tests for event filtering, the in-memory backend and the calendar tools.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};

use super::*;
use crate::message::{ToolCall, ToolStatus};
use crate::tools::{ToolArgs, ToolDispatcher, ToolHandler};

fn at(y: i32, m: u32, d: u32, h: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn event(id: &str, summary: &str, day: u32, attendees: &[&str]) -> CalendarEvent {
    CalendarEvent {
        id: id.into(),
        summary: summary.into(),
        start: at(2025, 7, day, 14),
        end: at(2025, 7, day, 15),
        location: None,
        attendees: attendees.iter().map(|a| a.to_string()).collect(),
    }
}

fn seeded() -> Arc<InMemoryCalendar> {
    Arc::new(InMemoryCalendar::with_events(vec![
        event("e3", "Dentist", 5, &[]),
        event("e1", "Team standup", 1, &["ana@example.com"]),
        event("e2", "Project review", 3, &["Bob@Example.com", "ana@example.com"]),
    ]))
}

fn args(value: Value) -> ToolArgs {
    value.as_object().cloned().unwrap_or_default()
}

fn dispatcher(calendar: Arc<InMemoryCalendar>) -> ToolDispatcher {
    let clock = FixedClock(
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    );
    ToolDispatcher::new(calendar_registry(calendar, Arc::new(clock)).unwrap())
}

fn call(name: &str, value: Value) -> ToolCall {
    ToolCall {
        id: format!("{name}-1"),
        name: name.into(),
        args: args(value),
    }
}

#[test]
fn query_date_window_is_whole_days() {
    let q = EventQuery {
        start_date: NaiveDate::from_ymd_opt(2025, 7, 3),
        end_date: NaiveDate::from_ymd_opt(2025, 7, 3),
        ..Default::default()
    };
    assert_eq!(q.time_min().unwrap(), at(2025, 7, 3, 0));
    assert_eq!(
        q.time_max().unwrap(),
        Utc.with_ymd_and_hms(2025, 7, 3, 23, 59, 59).unwrap()
    );
    assert!(q.matches(&event("x", "a", 3, &[])));
    assert!(!q.matches(&event("x", "a", 4, &[])));
    assert!(!q.matches(&event("x", "a", 2, &[])));
}

#[test]
fn query_keyword_and_attendee_ignore_case() {
    let e = event("x", "Project Review", 3, &["Bob@Example.com"]);
    let q = EventQuery {
        summary_keyword: Some("review".into()),
        attendee_email: Some("bob@example.COM".into()),
        ..Default::default()
    };
    assert!(q.matches(&e));

    let q = EventQuery {
        attendee_email: Some("carol@example.com".into()),
        ..Default::default()
    };
    assert!(!q.matches(&e));
}

#[test]
fn parse_datetime_accepts_naive_and_offset_forms() {
    assert_eq!(parse_datetime("2025-07-03T14:00:00").unwrap(), at(2025, 7, 3, 14));
    assert_eq!(parse_datetime("2025-07-03T14:00").unwrap(), at(2025, 7, 3, 14));
    assert_eq!(
        parse_datetime("2025-07-03T16:00:00+02:00").unwrap(),
        at(2025, 7, 3, 14)
    );
    assert!(parse_datetime("next tuesday").is_err());
}

#[tokio::test]
async fn in_memory_lists_in_start_order() {
    let calendar = seeded();
    let events = calendar.list_events(&EventQuery::default()).await.unwrap();
    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["e1", "e2", "e3"]);
}

#[tokio::test]
async fn in_memory_rejects_inverted_event() {
    let calendar = InMemoryCalendar::new();
    let err = calendar
        .insert_event(NewEvent {
            summary: "Backwards".into(),
            start: at(2025, 7, 3, 15),
            end: at(2025, 7, 3, 14),
            location: None,
            attendees: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CalendarError::InvalidEvent(_)));
    assert!(calendar.is_empty().await);
}

#[tokio::test]
async fn in_memory_delete_unknown_is_not_found() {
    let calendar = seeded();
    let err = calendar.delete_event("missing").await.unwrap_err();
    assert_eq!(err.to_string(), "event missing not found");
    assert_eq!(calendar.len().await, 3);
}

#[test]
fn seed_json_round_trips_events() {
    let json = serde_json::to_string(&vec![event("s1", "Seeded", 2, &[])]).unwrap();
    let calendar = InMemoryCalendar::from_seed_json(&json).unwrap();
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    assert_eq!(rt.block_on(calendar.len()), 1);

    assert!(InMemoryCalendar::from_seed_json("{not json").is_err());
}

#[test]
fn registry_exposes_four_tools() {
    let calendar: Arc<dyn CalendarBackend> = seeded();
    let registry = calendar_registry(calendar, Arc::new(SystemClock)).unwrap();
    assert_eq!(
        registry.names(),
        vec![
            "add_calendar_event",
            "delete_calendar_event",
            "get_calendar_events",
            "get_current_datetime"
        ]
    );
}

#[tokio::test]
async fn current_datetime_uses_clock() {
    let result = dispatcher(seeded())
        .dispatch(&call("get_current_datetime", json!({})))
        .await;
    assert_eq!(result.status, ToolStatus::Success);
    assert_eq!(result.payload, json!("2025-01-01 00:00:00"));
}

#[tokio::test]
async fn get_events_filters_through_dispatcher() {
    let result = dispatcher(seeded())
        .dispatch(&call(
            "get_calendar_events",
            json!({ "start_date": "2025-07-02", "attendee_email": "ana@example.com" }),
        ))
        .await;
    assert_eq!(result.status, ToolStatus::Success);
    let events = result.payload["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], "e2");
}

#[tokio::test]
async fn get_events_rejects_bad_dates() {
    let d = dispatcher(seeded());

    let result = d
        .dispatch(&call("get_calendar_events", json!({ "start_date": "July 3rd" })))
        .await;
    assert!(result.is_error());
    assert!(result.payload.as_str().unwrap().contains("YYYY-MM-DD"));

    let result = d
        .dispatch(&call(
            "get_calendar_events",
            json!({ "start_date": "2025-07-05", "end_date": "2025-07-01" }),
        ))
        .await;
    assert!(result.is_error());
}

#[tokio::test]
async fn add_event_then_find_it() {
    let calendar = Arc::new(InMemoryCalendar::new());
    let d = dispatcher(Arc::clone(&calendar));

    let created = d
        .dispatch(&call(
            "add_calendar_event",
            json!({
                "summary": "Lunch with Ana",
                "start_datetime": "2025-07-03T12:00:00",
                "end_datetime": "2025-07-03T13:00:00",
                "location": "Cafe",
                "attendees": ["ana@example.com"]
            }),
        ))
        .await;
    assert_eq!(created.status, ToolStatus::Success, "{:?}", created.payload);
    assert_eq!(created.payload["message"], "Event created successfully.");
    let id = created.payload["event_id"].as_str().unwrap().to_string();

    let events = calendar
        .list_events(&EventQuery {
            summary_keyword: Some("lunch".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, id);
    assert_eq!(events[0].location.as_deref(), Some("Cafe"));
}

#[tokio::test]
async fn add_event_validates_attendees_and_times() {
    let d = dispatcher(Arc::new(InMemoryCalendar::new()));

    let result = d
        .dispatch(&call(
            "add_calendar_event",
            json!({
                "summary": "x",
                "start_datetime": "2025-07-03T12:00:00",
                "end_datetime": "2025-07-03T13:00:00",
                "attendees": ["not-an-email"]
            }),
        ))
        .await;
    assert!(result.is_error());
    assert!(result.payload.as_str().unwrap().contains("not an email"));

    let result = d
        .dispatch(&call(
            "add_calendar_event",
            json!({
                "summary": "x",
                "start_datetime": "2025-07-03T13:00:00",
                "end_datetime": "2025-07-03T12:00:00"
            }),
        ))
        .await;
    assert!(result.is_error());
    assert!(result.payload.as_str().unwrap().contains("before start"));
}

#[tokio::test]
async fn delete_event_reports_outcome() {
    let calendar = seeded();
    let d = dispatcher(Arc::clone(&calendar));

    let ok = d
        .dispatch(&call("delete_calendar_event", json!({ "event_id": "e1" })))
        .await;
    assert_eq!(ok.status, ToolStatus::Success);
    assert_eq!(ok.payload["message"], "Event e1 deleted successfully.");
    assert_eq!(calendar.len().await, 2);

    let missing = d
        .dispatch(&call("delete_calendar_event", json!({ "event_id": "e1" })))
        .await;
    assert!(missing.is_error());
    assert_eq!(missing.payload, json!("event e1 not found"));
}

#[tokio::test]
async fn handler_decodes_args_directly() {
    let tool = DeleteCalendarEventTool::new(seeded());
    let err = tool.call(ToolArgs::new()).await.unwrap_err();
    assert!(err.to_string().contains("event_id"));
}

#[tokio::test]
async fn unknown_arguments_are_rejected_before_the_backend() {
    let calendar = seeded();
    let d = dispatcher(Arc::clone(&calendar));

    let result = d
        .dispatch(&call(
            "delete_calendar_event",
            json!({ "event_id": "e1", "force": true }),
        ))
        .await;

    assert!(result.is_error());
    assert_eq!(
        result.payload,
        json!("invalid arguments for delete_calendar_event: unexpected argument 'force'")
    );
    assert_eq!(calendar.len().await, 3);
}
