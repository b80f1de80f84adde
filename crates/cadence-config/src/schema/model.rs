use serde::{Deserialize, Serialize};

/// Language-model service settings.
///
/// The API key itself never lives in the file; `api_key_env` names the
/// environment variable it is read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub api_key_env: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// TCP connect timeout for the model service, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gemini-2.5-flash".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            max_tokens: 4096,
            temperature: 0.7,
            connect_timeout_secs: 10,
        }
    }
}
