//! Error types for cursor persistence.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while reading or writing the sync cursor.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid cursor timestamp: {0}")]
    InvalidCursor(String),
}
