//! Cadence configuration system.
//!
//! TOML-based configuration with full validation. Every section uses
//! `serde(default)` so a partial config file works out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cadence_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("model: {}", config.model.name);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    AgentConfig, CadenceConfig, CalendarConfig, LogLevel, LoggingConfig, ModelConfig,
    CONFIG_SCHEMA_VERSION,
};

use cadence_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// Creates a commented default file on first run.
pub fn load_config() -> Result<CadenceConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}
