//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Cadence Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[model]
# name = "gemini-2.5-flash"
# api_key_env = "GEMINI_API_KEY"   # environment variable holding the key
# max_tokens = 4096                # 1-65536
# temperature = 0.7                # 0.0-2.0
# connect_timeout_secs = 10        # 1-120

[agent]
# max_model_calls = 10             # 1-100 model calls per user message
# model_timeout_secs = 60          # 1-600
# tool_timeout_secs = 30           # 1-600
# system_prompt = "You are a helpful calendar assistant."

[calendar]
# seed_file = "/path/to/events.json"

[logging]
# level = "INFO"                   # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
