//! Tests for the registry, argument validation and the dispatcher.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::*;
use crate::message::{ToolCall, ToolStatus};

/// Counts invocations; fails when `fail` is set.
struct Counting {
    name: &'static str,
    calls: Arc<AtomicUsize>,
    fail: bool,
}

#[async_trait]
impl ToolHandler for Counting {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name.into(),
            description: "counts its calls".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "event_id": { "type": "string" },
                    "tags": { "type": "array", "items": { "type": "string" } },
                    "count": { "type": "integer" },
                    "mode": { "type": "string", "enum": ["fast", "slow"] }
                },
                "required": ["event_id"],
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, args: ToolArgs) -> Result<Value, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ToolError::Execution("backend said no".into()));
        }
        Ok(json!({ "echo": args }))
    }
}

struct Panicky;

#[async_trait]
impl ToolHandler for Panicky {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "panicky".into(),
            description: "always panics".into(),
            parameters: json!({ "type": "object", "properties": {} }),
        }
    }

    async fn call(&self, _args: ToolArgs) -> Result<Value, ToolError> {
        panic!("handler bug");
    }
}

struct Sleepy;

#[async_trait]
impl ToolHandler for Sleepy {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "sleepy".into(),
            description: "never finishes in time".into(),
            parameters: json!({ "type": "object", "properties": {} }),
        }
    }

    async fn call(&self, _args: ToolArgs) -> Result<Value, ToolError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Value::Null)
    }
}

fn counting_tool(name: &'static str, fail: bool) -> (Arc<dyn ToolHandler>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler = Arc::new(Counting {
        name,
        calls: Arc::clone(&calls),
        fail,
    });
    (handler, calls)
}

fn call(name: &str, args: Value) -> ToolCall {
    ToolCall {
        id: "call-1".into(),
        name: name.into(),
        args: args.as_object().cloned().unwrap_or_default(),
    }
}

#[test]
fn registry_rejects_duplicate_names() {
    let (a, _) = counting_tool("delete_calendar_event", false);
    let (b, _) = counting_tool("delete_calendar_event", false);
    let mut registry = ToolRegistry::new();
    registry.register(a).unwrap();
    let err = registry.register(b).unwrap_err();
    assert!(matches!(err, ToolError::DuplicateTool(name) if name == "delete_calendar_event"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn descriptors_are_sorted_by_name() {
    let (b, _) = counting_tool("b_tool", false);
    let (a, _) = counting_tool("a_tool", false);
    let registry = ToolRegistry::new()
        .with_tool(b)
        .unwrap()
        .with_tool(a)
        .unwrap();
    let names: Vec<String> = registry.descriptors().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["a_tool", "b_tool"]);
    assert!(registry.contains("a_tool"));
}

fn counting_schema() -> jsonschema::JSONSchema {
    let (handler, _) = counting_tool("t", false);
    compile_schema("t", &handler.descriptor().parameters).unwrap()
}

fn args(value: Value) -> ToolArgs {
    value.as_object().cloned().unwrap()
}

#[test]
fn schema_reports_missing_required() {
    let err = validate_args(&counting_schema(), &ToolArgs::new()).unwrap_err();
    assert_eq!(err, "missing required argument 'event_id'");
}

#[test]
fn null_arguments_count_as_absent() {
    let schema = counting_schema();
    let stripped = strip_nulls(&args(json!({ "event_id": null, "mode": null })));
    assert!(stripped.is_empty());
    let err = validate_args(&schema, &stripped).unwrap_err();
    assert_eq!(err, "missing required argument 'event_id'");

    let stripped = strip_nulls(&args(json!({ "event_id": "e1", "count": null })));
    assert!(validate_args(&schema, &stripped).is_ok());
}

#[test]
fn schema_rejects_unknown_and_mistyped_args() {
    let schema = counting_schema();

    let err = validate_args(&schema, &args(json!({ "event_id": "e1", "colour": "red" })))
        .unwrap_err();
    assert_eq!(err, "unexpected argument 'colour'");

    let err = validate_args(&schema, &args(json!({ "event_id": 42 }))).unwrap_err();
    assert!(err.starts_with("argument 'event_id'"), "{err}");
    assert!(err.contains("\"string\""), "{err}");

    let err = validate_args(&schema, &args(json!({ "event_id": "e1", "tags": ["ok", 3] })))
        .unwrap_err();
    assert!(err.starts_with("argument 'tags.1'"), "{err}");

    let result = validate_args(&schema, &args(json!({ "event_id": "e1", "count": 1.5 })));
    assert!(result.is_err());

    let err = validate_args(&schema, &args(json!({ "event_id": "e1", "mode": "warp" })))
        .unwrap_err();
    assert!(err.contains("is not one of"), "{err}");
}

#[test]
fn schema_accepts_valid_args() {
    let valid = args(json!({ "event_id": "e1", "tags": ["a"], "count": 2, "mode": "fast" }));
    assert!(validate_args(&counting_schema(), &valid).is_ok());
}

#[test]
fn registry_rejects_uncompilable_schema() {
    struct Broken;

    #[async_trait]
    impl ToolHandler for Broken {
        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor {
                name: "broken".into(),
                description: "bad schema".into(),
                parameters: json!({ "type": "no-such-type" }),
            }
        }

        async fn call(&self, _args: ToolArgs) -> Result<Value, ToolError> {
            Ok(Value::Null)
        }
    }

    let err = ToolRegistry::new().with_tool(Arc::new(Broken)).err().unwrap();
    assert!(matches!(err, ToolError::InvalidSchema { ref tool, .. } if tool == "broken"));
}

#[test]
fn decode_args_reports_tool_name() {
    #[derive(serde::Deserialize, Debug)]
    #[allow(dead_code)]
    struct Params {
        event_id: String,
    }
    let err = decode_args::<Params>("delete_calendar_event", ToolArgs::new()).unwrap_err();
    assert!(err.to_string().starts_with("invalid arguments for delete_calendar_event"));
}

#[tokio::test]
async fn unknown_tool_is_an_error_result() {
    let (handler, calls) = counting_tool("known", false);
    let dispatcher = ToolDispatcher::new(ToolRegistry::new().with_tool(handler).unwrap());

    let result = dispatcher.dispatch(&call("foo", json!({}))).await;
    assert_eq!(result.status, ToolStatus::Error);
    assert_eq!(result.payload, json!("unknown tool foo"));
    assert_eq!(result.tool_name, "foo");
    assert_eq!(result.call_id, "call-1");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_args_never_reach_handler() {
    let (handler, calls) = counting_tool("delete_calendar_event", false);
    let dispatcher = ToolDispatcher::new(ToolRegistry::new().with_tool(handler).unwrap());

    let result = dispatcher
        .dispatch(&call("delete_calendar_event", json!({})))
        .await;
    assert!(result.is_error());
    assert_eq!(
        result.payload,
        json!("invalid arguments for delete_calendar_event: missing required argument 'event_id'")
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn successful_call_wraps_return_value() {
    let (handler, calls) = counting_tool("t", false);
    let dispatcher = ToolDispatcher::new(ToolRegistry::new().with_tool(handler).unwrap());

    let result = dispatcher
        .dispatch(&call("t", json!({ "event_id": "e9", "mode": null })))
        .await;
    assert_eq!(result.status, ToolStatus::Success);
    assert_eq!(result.payload, json!({ "echo": { "event_id": "e9" } }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn handler_error_becomes_error_result() {
    let (handler, _) = counting_tool("t", true);
    let dispatcher = ToolDispatcher::new(ToolRegistry::new().with_tool(handler).unwrap());

    let result = dispatcher.dispatch(&call("t", json!({ "event_id": "e9" }))).await;
    assert!(result.is_error());
    assert_eq!(result.payload, json!("backend said no"));
}

#[tokio::test]
async fn handler_panic_is_contained() {
    let dispatcher =
        ToolDispatcher::new(ToolRegistry::new().with_tool(Arc::new(Panicky)).unwrap());

    let result = dispatcher.dispatch(&call("panicky", json!({}))).await;
    assert!(result.is_error());
    assert_eq!(result.payload, json!("tool panicky panicked"));
}

#[tokio::test(start_paused = true)]
async fn slow_handler_times_out() {
    let dispatcher = ToolDispatcher::new(ToolRegistry::new().with_tool(Arc::new(Sleepy)).unwrap())
        .with_timeout(Duration::from_millis(50));

    let result = dispatcher.dispatch(&call("sleepy", json!({}))).await;
    assert!(result.is_error());
    assert!(result.payload.as_str().unwrap().contains("timed out"));
}
