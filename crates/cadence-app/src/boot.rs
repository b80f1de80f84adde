//! Startup: config, the model client and the chat service.

use std::path::Path;
use std::sync::Arc;

use cadence_ai::calendar::{calendar_registry, InMemoryCalendar, SystemClock};
use cadence_ai::{
    ChatService, GeminiClient, GeminiConfig, ModelInvoker, Orchestrator, ToolDispatcher,
    TurnLimits,
};
use cadence_common::CadenceError;
use cadence_config::{toml_loader, validation, CadenceConfig};
use tracing::info;

use crate::cli::Args;

/// Load the config named on the command line, or the default one, and
/// apply command-line overrides.
pub fn load_config(args: &Args) -> Result<CadenceConfig, CadenceError> {
    let mut config = match &args.config {
        Some(path) => {
            let config = toml_loader::load_from_path(path)?;
            validation::validate(&config)?;
            config
        }
        None => cadence_config::load_config()?,
    };

    if let Some(max) = args.max_model_calls {
        config.agent.max_model_calls = max;
        validation::validate(&config)?;
    }
    Ok(config)
}

/// Gemini client configured from `[model]` and `[agent]`.
pub fn gemini_client(config: &CadenceConfig) -> Result<GeminiClient, CadenceError> {
    let model = &config.model;
    let mut gemini = GeminiConfig::from_env(&model.api_key_env)
        .map_err(|e| CadenceError::Model(e.to_string()))?
        .with_model(&model.name)
        .with_max_tokens(model.max_tokens)
        .with_temperature(model.temperature)
        .with_connect_timeout(std::time::Duration::from_secs(model.connect_timeout_secs));
    if let Some(prompt) = &config.agent.system_prompt {
        gemini = gemini.with_system_prompt(prompt);
    }
    info!(model = %gemini.model, "Gemini client configured");
    GeminiClient::new(gemini).map_err(|e| CadenceError::Model(e.to_string()))
}

/// In-process calendar, preloaded from `calendar.seed_file` when set.
pub async fn calendar(config: &CadenceConfig) -> Result<InMemoryCalendar, CadenceError> {
    match &config.calendar.seed_file {
        Some(path) => load_seed(path).await,
        None => Ok(InMemoryCalendar::new()),
    }
}

async fn load_seed(path: &Path) -> Result<InMemoryCalendar, CadenceError> {
    let json = tokio::fs::read_to_string(path).await?;
    InMemoryCalendar::from_seed_json(&json).map_err(|e| CadenceError::Calendar(e.to_string()))
}

/// Wire the calendar tools, dispatcher and orchestrator into a service.
pub fn chat_service(
    config: &CadenceConfig,
    invoker: Arc<dyn ModelInvoker>,
    calendar: InMemoryCalendar,
) -> Result<ChatService, CadenceError> {
    let registry = calendar_registry(Arc::new(calendar), Arc::new(SystemClock))
        .map_err(|e| CadenceError::Other(e.to_string()))?;
    info!(tools = ?registry.names(), "Tools registered");

    let dispatcher = ToolDispatcher::new(registry).with_timeout(config.agent.tool_timeout());
    let orchestrator = Orchestrator::new(invoker, dispatcher).with_limits(TurnLimits {
        max_model_calls: config.agent.max_model_calls,
        model_timeout: config.agent.model_timeout(),
    });
    Ok(ChatService::new(orchestrator))
}
