use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Dialogue loop limits and prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model invocations allowed per user turn (valid range: 1-100).
    pub max_model_calls: u32,
    /// Per-call model timeout in seconds (valid range: 1-600).
    pub model_timeout_secs: u64,
    /// Per-call tool timeout in seconds (valid range: 1-600).
    pub tool_timeout_secs: u64,
    pub system_prompt: Option<String>,
}

impl AgentConfig {
    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_model_calls: 10,
            model_timeout_secs: 60,
            tool_timeout_secs: 30,
            system_prompt: None,
        }
    }
}
