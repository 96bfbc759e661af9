//! Grouping records into calendar-month shards.

use crate::date::{self, DateError};
use crate::types::{CombinedDataset, MonthKey, MonthShard, Record};
use chrono::Utc;
use indexmap::IndexMap;
use serde_json::Value;
use std::path::Path;
use tracing::warn;

/// Result of a partitioning run: the shards in first-seen month order,
/// plus the number of records that had to be skipped.
#[derive(Debug)]
pub struct Partitioned {
    pub shards: IndexMap<MonthKey, MonthShard>,
    pub skipped: usize,
}

impl Partitioned {
    /// Total number of records across all shards.
    pub fn total_records(&self) -> usize {
        self.shards.values().map(|s| s.total_records).sum()
    }
}

/// Partitions a combined dataset into one shard per calendar month.
///
/// Grouping is stable: records keep their original relative order within
/// each month, and the returned map iterates months in first-seen order.
/// A record whose date cannot be resolved, or whose shape is not an
/// object, is logged under its `id` (or `"unknown"`) and skipped; one bad
/// record never aborts the run. An empty `details` list yields zero
/// shards.
pub fn partition(dataset: &CombinedDataset, source: &Path) -> Partitioned {
    let mut groups: IndexMap<MonthKey, Vec<Record>> = IndexMap::new();
    let mut skipped = 0usize;

    for entry in &dataset.details {
        let Some(record) = entry.as_object() else {
            warn!(record = %record_id(entry), "malformed record, not an object");
            skipped += 1;
            continue;
        };

        match date::resolve(record) {
            Ok(date) => {
                groups
                    .entry(MonthKey::from(date))
                    .or_default()
                    .push(record.clone());
            }
            Err(DateError::NotFound) => {
                warn!(record = %record_id(entry), "date not found");
                skipped += 1;
            }
            Err(DateError::Unrecognized(value)) => {
                warn!(record = %record_id(entry), value = %value, "unrecognized date format");
                skipped += 1;
            }
        }
    }

    let generated_at = Utc::now();
    let source = source.display().to_string();
    let shards = groups
        .into_iter()
        .map(|(key, records)| {
            let shard = MonthShard::new(
                key,
                records,
                dataset.summary.clone(),
                source.clone(),
                generated_at,
            );
            (key, shard)
        })
        .collect();

    Partitioned { shards, skipped }
}

fn record_id(entry: &Value) -> String {
    entry
        .get("id")
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
