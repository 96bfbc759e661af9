//! Error types for the partitioning engine.

use thiserror::Error;

/// Result type for partition operations.
pub type PartitionResult<T> = Result<T, PartitionError>;

/// Errors that can occur while reading, partitioning or writing shards.
#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("input file not found: {}", .0.display())]
    InputMissing(std::path::PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
