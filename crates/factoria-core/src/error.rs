use thiserror::Error;

/// Core error type shared across factoria crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Database error or provider failure.
    #[error("database error: {0}")]
    Db(String),
    /// The snapshot violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A requested table or model does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by factoria crates.
pub type Result<T> = std::result::Result<T, Error>;
