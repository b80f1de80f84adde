//! Argument validation against a tool's JSON parameter schema.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{JSONSchema, ValidationError};
use serde_json::Value;

use super::ToolArgs;
use crate::error::ToolError;

/// Compile a tool's parameter schema once, at registration.
pub fn compile_schema(tool: &str, parameters: &Value) -> Result<JSONSchema, ToolError> {
    JSONSchema::compile(parameters).map_err(|e| ToolError::InvalidSchema {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

/// Drop arguments sent as explicit `null`; models use them for "not given".
pub fn strip_nulls(args: &ToolArgs) -> ToolArgs {
    args.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Check `args` against a compiled schema. The error names the offending
/// argument so the model can correct its call.
pub fn validate_args(schema: &JSONSchema, args: &ToolArgs) -> Result<(), String> {
    let instance = Value::Object(args.clone());
    if let Err(mut errors) = schema.validate(&instance) {
        let reason = errors
            .next()
            .map(|e| describe(&e))
            .unwrap_or_else(|| "arguments do not match the schema".to_string());
        return Err(reason);
    }
    Ok(())
}

fn describe(error: &ValidationError<'_>) -> String {
    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property.as_str().map_or_else(|| property.to_string(), str::to_string);
            format!("missing required argument '{name}'")
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("unexpected argument '{}'", unexpected.join("', '"))
        }
        _ => {
            let pointer = error.instance_path.to_string();
            let path = pointer.trim_start_matches('/').replace('/', ".");
            format!("argument '{path}': {error}")
        }
    }
}
