//! Last-synchronized-at cursor persistence.

use crate::error::{SyncError, SyncResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Well-known cursor file name under the data root.
pub const CURSOR_FILE_NAME: &str = ".last_sync";

/// Storage for the single "last synchronized at" timestamp.
///
/// The fetch client reads it to decide full vs incremental retrieval and
/// overwrites it after each successful fetch. Injecting the store keeps
/// drivers testable with a temp directory or an in-memory impl; nothing
/// bakes a path constant into the caller.
pub trait CursorStore {
    /// Returns the stored timestamp, or `None` on a fresh data directory.
    fn read(&self) -> SyncResult<Option<DateTime<Utc>>>;

    /// Overwrites the stored timestamp.
    fn write(&self, at: DateTime<Utc>) -> SyncResult<()>;
}

/// File-backed cursor: a single-line RFC 3339 timestamp.
///
/// Single-writer batch jobs only; writes go through a temp path and a
/// rename so a crashed run never leaves a torn cursor.
#[derive(Clone, Debug)]
pub struct FileCursor {
    path: PathBuf,
}

impl FileCursor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cursor at the well-known location under `data_root`.
    pub fn in_data_root(data_root: impl Into<PathBuf>) -> Self {
        Self::new(data_root.into().join(CURSOR_FILE_NAME))
    }
}

impl CursorStore for FileCursor {
    fn read(&self) -> SyncResult<Option<DateTime<Utc>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let trimmed = contents.trim();
        let at = DateTime::parse_from_rfc3339(trimmed)
            .map_err(|e| SyncError::InvalidCursor(format!("{trimmed:?}: {e}")))?
            .with_timezone(&Utc);
        Ok(Some(at))
    }

    fn write(&self, at: DateTime<Utc>) -> SyncResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, at.to_rfc3339())?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), %at, "cursor written");
        Ok(())
    }
}
