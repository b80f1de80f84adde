//! Gemini API client struct, request building, and response parsing.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::message::{Message, ToolCall, ToolDescriptor, ToolResult, ToolStatus};
use crate::{AiError, ModelReply};

use super::config::GeminiConfig;

pub(crate) const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub(crate) fn api_url(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.config.model)
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(
        &self,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> Value {
        let contents: Vec<Value> = messages.iter().map(to_content).collect();

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        });

        if let Some(system) = &self.config.system_prompt {
            body["systemInstruction"] = json!({
                "parts": [{ "text": system }]
            });
        }

        if !tools.is_empty() {
            let declarations: Vec<Value> = tools.iter().map(to_function_declaration).collect();
            body["tools"] = json!([{
                "functionDeclarations": declarations
            }]);
        }

        body
    }

    /// Parse a Gemini response into text or tool calls.
    pub(crate) fn parse_response(&self, json: Value) -> Result<ModelReply, AiError> {
        if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
            return Err(AiError::ApiError(format!("prompt blocked: {reason}")));
        }

        let first = json["candidates"]
            .as_array()
            .and_then(|c| c.first())
            .ok_or_else(|| AiError::ParseError("no candidates in response".to_string()))?;

        let parts = first["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut text = String::new();
        let mut tool_calls = Vec::new();

        for part in &parts {
            if let Some(t) = part["text"].as_str() {
                text.push_str(t);
            }
            if let Some(fc) = part.get("functionCall") {
                tool_calls.push(parse_function_call(fc)?);
            }
        }

        if !tool_calls.is_empty() {
            if !text.is_empty() {
                debug!(dropped = %text, "Discarding text sent alongside function calls");
            }
            return Ok(ModelReply::ToolCalls(tool_calls));
        }

        if text.is_empty() {
            let finish = first["finishReason"].as_str().unwrap_or("unknown");
            return Err(AiError::ParseError(format!(
                "response had no text or function calls (finishReason: {finish})"
            )));
        }

        Ok(ModelReply::Text(text))
    }
}

fn parse_function_call(fc: &Value) -> Result<ToolCall, AiError> {
    let name = fc["name"]
        .as_str()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AiError::ParseError("functionCall without a name".to_string()))?;

    let args = match &fc["args"] {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => {
            return Err(AiError::ParseError(format!(
                "functionCall {name} has non-object args: {other}"
            )))
        }
    };

    let id = fc["id"]
        .as_str()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    Ok(ToolCall {
        id,
        name: name.to_string(),
        args,
    })
}

/// Translate one message into a Gemini `Content`.
///
/// Tool results are attributed to the `model` role: they are presented as
/// spoken by the assistant side of the protocol, not by the user.
pub(crate) fn to_content(message: &Message) -> Value {
    match message {
        Message::User { text } => json!({
            "role": "user",
            "parts": [{ "text": text }]
        }),
        Message::Assistant { text, tool_calls } if tool_calls.is_empty() => json!({
            "role": "model",
            "parts": [{ "text": text }]
        }),
        Message::Assistant { tool_calls, .. } => {
            let parts: Vec<Value> = tool_calls
                .iter()
                .map(|tc| {
                    json!({
                        "functionCall": { "name": tc.name, "args": tc.args }
                    })
                })
                .collect();
            json!({ "role": "model", "parts": parts })
        }
        Message::ToolResult(result) => json!({
            "role": "model",
            "parts": [{
                "functionResponse": {
                    "name": result.tool_name,
                    "response": function_response(result)
                }
            }]
        }),
    }
}

/// `functionResponse.response` must be a JSON object.
fn function_response(result: &ToolResult) -> Value {
    match (result.status, &result.payload) {
        (ToolStatus::Success, Value::Object(_)) => result.payload.clone(),
        (ToolStatus::Success, payload) => json!({ "result": payload }),
        (ToolStatus::Error, payload) => json!({ "error": payload }),
    }
}

/// Convert a tool descriptor to a Gemini function declaration.
///
/// Gemini rejects object schemas with no properties, so parameterless
/// tools are declared without a `parameters` field. Its schema subset has
/// no `additionalProperties`; unknown arguments are caught at dispatch.
pub(crate) fn to_function_declaration(tool: &ToolDescriptor) -> Value {
    let mut declaration = json!({
        "name": tool.name,
        "description": tool.description,
    });
    let has_properties = tool.parameters["properties"]
        .as_object()
        .is_some_and(|p| !p.is_empty());
    if has_properties {
        let mut parameters = tool.parameters.clone();
        if let Some(schema) = parameters.as_object_mut() {
            schema.remove("additionalProperties");
        }
        declaration["parameters"] = parameters;
    }
    declaration
}
