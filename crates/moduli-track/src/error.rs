//! Error types for tracking operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for tracking operations
pub type Result<T> = std::result::Result<T, TrackError>;
