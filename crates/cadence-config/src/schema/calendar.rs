use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Calendar backend settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// JSON array of events preloaded into the in-process calendar.
    pub seed_file: Option<PathBuf>,
}
