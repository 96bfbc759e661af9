//! On-disk document shapes for the combined dataset and month shards.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One business record: an opaque field-name → value mapping.
///
/// The partitioner never mutates a record; it copies each one into
/// exactly one output group.
pub type Record = Map<String, Value>;

/// The combined dataset deposited by the upstream fetch client.
///
/// `details` stays untyped (`Value`) so that one malformed entry can be
/// skipped at partition time instead of failing the whole document parse.
/// Unknown top-level metadata is preserved in `extra`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CombinedDataset {
    #[serde(default)]
    pub details: Vec<Value>,
    #[serde(default)]
    pub summary: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Calendar month a shard covers. Displays as `YYYY-MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Provenance block stamped into every shard.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShardMetadata {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub record_count: usize,
}

/// One month's worth of records, serialized as a single compressed document.
///
/// Invariant: `total_records == metadata.record_count == details.len()`,
/// and every record resolves to this shard's (year, month).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonthShard {
    pub year: i32,
    pub month: u32,
    pub total_records: usize,
    pub details: Vec<Record>,
    pub summary: Map<String, Value>,
    pub metadata: ShardMetadata,
}

impl MonthShard {
    pub(crate) fn new(
        key: MonthKey,
        details: Vec<Record>,
        summary: Map<String, Value>,
        source: String,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let record_count = details.len();
        Self {
            year: key.year,
            month: key.month,
            total_records: record_count,
            details,
            summary,
            metadata: ShardMetadata {
                generated_at,
                source,
                record_count,
            },
        }
    }

    pub fn key(&self) -> MonthKey {
        MonthKey {
            year: self.year,
            month: self.month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_displays_zero_padded() {
        let key = MonthKey {
            year: 2024,
            month: 3,
        };
        assert_eq!(key.to_string(), "2024-03");
    }

    #[test]
    fn month_key_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            MonthKey::from(date),
            MonthKey {
                year: 2024,
                month: 12
            }
        );
    }
}
