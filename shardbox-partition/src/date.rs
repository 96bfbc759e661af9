//! Record date resolution.
//!
//! Upstream records carry their date under different field names and in
//! different formats depending on which ERP model they came from. This
//! module extracts a usable calendar date by trying a fixed field
//! precedence and an ordered chain of pure parsing strategies.

use crate::types::Record;
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Candidate date fields, in precedence order. The first present,
/// non-null value wins.
pub const DATE_FIELDS: [&str; 3] = ["date", "invoice_date", "create_date"];

/// A single total parsing strategy: string in, maybe a date out.
type ParseStrategy = fn(&str) -> Option<NaiveDate>;

/// Ordered parsing strategies, composed left-to-right with early exit.
///
/// The slash and dot forms are parsed day-first (`01/02/2024` is
/// February 1st). That is a fixed convention of the upstream export, not
/// a locale inference.
const STRATEGIES: [ParseStrategy; 4] = [parse_iso, parse_iso_datetime, parse_dotted, parse_slashed];

/// Why a record's date could not be resolved. Both cases are per-record
/// and non-fatal: the record is skipped, the run continues.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("no date field present")]
    NotFound,

    #[error("unrecognized date format: {0}")]
    Unrecognized(String),
}

/// Resolves the calendar date of a record.
///
/// Only the portion before the first whitespace is parsed, which strips
/// an embedded time-of-day (`"2024-03-15 10:30:00"` resolves like
/// `"2024-03-15"`).
pub fn resolve(record: &Record) -> Result<NaiveDate, DateError> {
    let value = DATE_FIELDS
        .iter()
        .find_map(|field| record.get(*field).filter(|v| !v.is_null()))
        .ok_or(DateError::NotFound)?;

    let raw = value
        .as_str()
        .ok_or_else(|| DateError::Unrecognized(value.to_string()))?;
    let token = raw.split_whitespace().next().unwrap_or("");

    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(token))
        .ok_or_else(|| DateError::Unrecognized(raw.to_string()))
}

fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

fn parse_dotted(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%d.%m.%Y").ok()
}

fn parse_slashed(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%d/%m/%Y").ok()
}
