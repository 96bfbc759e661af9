//! Batch encryption over a shard tree.

use crate::envelope::encrypt_file;
use crate::error::{CryptoError, CryptoResult};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Shard files eligible for encryption.
const SHARD_SUFFIX: &str = ".json.gz";

/// Outcome of a batch encryption run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Number of files successfully encrypted.
    pub encrypted: usize,
    /// Files that failed, with the failure reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Encrypts every `*.json.gz` file under `root` into a `.enc` sibling.
///
/// One failing entry never aborts the walk: the failure is recorded in the
/// report and the remaining files are still processed. Encrypted outputs
/// (`*.json.gz.enc`) do not match the shard suffix and are left alone.
pub fn encrypt_tree(root: &Path, password: &str) -> CryptoResult<BatchReport> {
    if !root.is_dir() {
        return Err(CryptoError::MissingRoot(root.to_path_buf()));
    }

    let mut report = BatchReport::default();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                report.failed.push((path, e.to_string()));
                continue;
            }
        };

        if !entry.file_name().to_string_lossy().ends_with(SHARD_SUFFIX) {
            continue;
        }

        match encrypt_file(entry.path(), password) {
            Ok(_) => report.encrypted += 1,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "failed to encrypt");
                report.failed.push((entry.path().to_path_buf(), e.to_string()));
            }
        }
    }

    Ok(report)
}
