//! Gzip JSON I/O for combined datasets and month shards.
//!
//! Shards land at `<root>/<YYYY>/<MM>.json.gz`. Every write goes through
//! a temp path and a rename, so an interrupted run leaves no truncated
//! shard behind.

use crate::error::{PartitionError, PartitionResult};
use crate::types::{CombinedDataset, MonthKey, MonthShard};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use indexmap::IndexMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// One shard written to disk.
#[derive(Debug)]
pub struct WrittenShard {
    pub key: MonthKey,
    pub path: PathBuf,
    pub bytes: u64,
    pub records: usize,
}

/// Reads the gzip-compressed combined dataset deposited by the upstream
/// fetch client.
///
/// A missing file is fatal to the run and reported as
/// [`PartitionError::InputMissing`].
pub fn read_combined(path: &Path) -> PartitionResult<CombinedDataset> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PartitionError::InputMissing(path.to_path_buf())
        } else {
            PartitionError::Io(e)
        }
    })?;

    let decoder = GzDecoder::new(BufReader::new(file));
    let dataset: CombinedDataset = serde_json::from_reader(decoder)?;

    info!(
        input = %path.display(),
        records = dataset.details.len(),
        "combined dataset read"
    );
    Ok(dataset)
}

/// Path of a month shard under `out_root`.
pub fn shard_path(out_root: &Path, key: MonthKey) -> PathBuf {
    out_root
        .join(key.year.to_string())
        .join(format!("{:02}.json.gz", key.month))
}

/// Writes every shard to `<out_root>/<YYYY>/<MM>.json.gz`.
pub fn write_shards(
    shards: &IndexMap<MonthKey, MonthShard>,
    out_root: &Path,
) -> PartitionResult<Vec<WrittenShard>> {
    let mut written = Vec::with_capacity(shards.len());

    for (key, shard) in shards {
        let path = shard_path(out_root, *key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut tmp = path.clone();
        tmp.set_extension("gz.tmp");
        let mut encoder = GzEncoder::new(
            BufWriter::new(File::create(&tmp)?),
            Compression::default(),
        );
        serde_json::to_writer(&mut encoder, shard)?;
        encoder.finish()?.flush()?;
        fs::rename(&tmp, &path)?;

        let bytes = fs::metadata(&path)?.len();
        info!(
            month = %key,
            records = shard.total_records,
            path = %path.display(),
            bytes,
            "shard written"
        );
        written.push(WrittenShard {
            key: *key,
            path,
            bytes,
            records: shard.total_records,
        });
    }

    Ok(written)
}
