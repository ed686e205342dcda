//! Error types for folio-sync

use folio_domain::DocumentError;
use thiserror::Error;

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Main error type for sync operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// Document-related errors
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Settings-related errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Settings validation or parsing error
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Threshold values are invalid
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
