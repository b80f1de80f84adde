use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Top-level error for the `cadence` binary and anything that glues crates
/// together. Library crates keep their own narrower error enums.
#[derive(Debug, thiserror::Error)]
pub enum CadenceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("model error: {0}")]
    Model(String),

    #[error("calendar error: {0}")]
    Calendar(String),

    #[error("{0}")]
    Other(String),
}
