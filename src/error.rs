// File: src/error.rs
use thiserror::Error;

/// Failures at the persisted key-value boundary.
///
/// The vocabulary and entity stores never surface these to their callers:
/// reads degrade to an empty state and writes are logged and dropped.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored document is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a data directory for this user")]
    NoDataDir,
}
