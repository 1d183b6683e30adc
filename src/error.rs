use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlateError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),
    #[error("invalid config {path}: {message}")]
    Config { path: String, message: String },
    #[error("plate lookup failed: {0}")]
    Lookup(String),
}

pub type Result<T> = std::result::Result<T, PlateError>;
