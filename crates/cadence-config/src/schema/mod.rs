//! Configuration schema types for Cadence.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod agent;
mod calendar;
mod logging;
mod model;

pub use agent::*;
pub use calendar::*;
pub use logging::*;
pub use model::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Cadence.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CadenceConfig {
    pub model: ModelConfig,
    pub agent: AgentConfig,
    pub calendar: CalendarConfig,
    pub logging: LoggingConfig,
}
