//! Shared fixtures for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::calendar::{calendar_registry, FixedClock, InMemoryCalendar};
use crate::message::{Message, ToolCall, ToolDescriptor};
use crate::tools::{ToolArgs, ToolDispatcher};
use crate::{AiError, ModelInvoker, ModelReply};

/// Model stub that replays a fixed script and records what it was shown.
///
/// Once the script runs out it keeps answering with `fallback`.
pub struct ScriptedInvoker {
    script: Mutex<VecDeque<Result<ModelReply, AiError>>>,
    fallback: Box<dyn Fn(usize) -> Result<ModelReply, AiError> + Send + Sync>,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedInvoker {
    pub fn new(script: Vec<Result<ModelReply, AiError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Box::new(|_| Ok(ModelReply::Text("(script exhausted)".into()))),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// A model that asks for another tool call on every invocation.
    pub fn always_calling(tool: &'static str) -> Self {
        let mut invoker = Self::new(Vec::new());
        invoker.fallback = Box::new(move |n| {
            Ok(ModelReply::ToolCalls(vec![call(&format!("c{n}"), tool, Value::Null)]))
        });
        invoker
    }

    /// Histories passed to each invocation, in order.
    pub fn histories(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }

    pub fn invocations(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelInvoker for ScriptedInvoker {
    async fn invoke(
        &self,
        history: &[Message],
        _tools: &[ToolDescriptor],
    ) -> Result<ModelReply, AiError> {
        let n = {
            let mut seen = self.seen.lock().unwrap();
            seen.push(history.to_vec());
            seen.len()
        };
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| (self.fallback)(n))
    }
}

pub fn call(id: &str, name: &str, args: Value) -> ToolCall {
    ToolCall {
        id: id.into(),
        name: name.into(),
        args: args.as_object().cloned().unwrap_or_else(ToolArgs::new),
    }
}

pub fn text(reply: &str) -> Result<ModelReply, AiError> {
    Ok(ModelReply::Text(reply.into()))
}

pub fn calls(calls: Vec<ToolCall>) -> Result<ModelReply, AiError> {
    Ok(ModelReply::ToolCalls(calls))
}

/// Dispatcher over the calendar tools with the clock pinned to 2025-01-01.
pub fn calendar_dispatcher(calendar: Arc<InMemoryCalendar>) -> ToolDispatcher {
    let now = NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    ToolDispatcher::new(calendar_registry(calendar, Arc::new(FixedClock(now))).unwrap())
}
