//! Full configuration validation.
//!
//! Checks numeric ranges and required strings, collecting every problem
//! into a single `ConfigError` so the user can fix them in one pass.

mod helpers;


use crate::schema::CadenceConfig;
use cadence_common::ConfigError;

use helpers::{validate_non_empty, validate_range, validate_range_f64, validate_range_u64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CadenceConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_model(&mut errors, config);
    validate_agent(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_model(errors: &mut Vec<String>, config: &CadenceConfig) {
    let model = &config.model;
    validate_non_empty(errors, "model.name", &model.name);
    validate_non_empty(errors, "model.api_key_env", &model.api_key_env);
    validate_range(errors, "model.max_tokens", model.max_tokens, 1, 65536);
    validate_range_f64(errors, "model.temperature", model.temperature, 0.0, 2.0);
    validate_range_u64(
        errors,
        "model.connect_timeout_secs",
        model.connect_timeout_secs,
        1,
        120,
    );
}

fn validate_agent(errors: &mut Vec<String>, config: &CadenceConfig) {
    let agent = &config.agent;
    validate_range(errors, "agent.max_model_calls", agent.max_model_calls, 1, 100);
    validate_range_u64(
        errors,
        "agent.model_timeout_secs",
        agent.model_timeout_secs,
        1,
        600,
    );
    validate_range_u64(
        errors,
        "agent.tool_timeout_secs",
        agent.tool_timeout_secs,
        1,
        600,
    );
    if let Some(prompt) = &agent.system_prompt {
        validate_non_empty(errors, "agent.system_prompt", prompt);
    }
}
