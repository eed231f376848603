use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodonSoupError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Failures at the gene pool boundary. Neither is fatal to a client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// Pool could not be reached; the caller may retry later.
    #[error("pool unavailable: {0}")]
    Unavailable(String),

    /// Pool refused the payload; retrying the same payload is pointless.
    #[error("submission rejected: {0}")]
    Rejected(String),
}

impl SyncError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Unavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, CodonSoupError>;
