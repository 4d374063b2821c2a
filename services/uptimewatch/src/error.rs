//! Error types for the uptimewatch service

/// Errors that can occur while polling and rendering status
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Network(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Invalid status body: {0}")]
    Parse(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for uptimewatch operations
pub type Result<T> = std::result::Result<T, WatchError>;
