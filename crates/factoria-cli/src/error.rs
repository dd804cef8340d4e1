use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("core error: {0}")]
    Core(#[from] factoria_core::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{failed} of {total} models failed")]
    ModelsFailed { failed: usize, total: usize },
    #[error("unsupported engine: {0}")]
    UnsupportedEngine(String),
}
