//! Full-vs-incremental fetch planning.

use chrono::{DateTime, Duration, Utc};

/// Default incremental lookback window in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 180;

/// Requested sync mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Fetch everything.
    Full,
    /// Fetch only records changed inside the lookback window.
    #[default]
    Incremental,
}

/// The fetch the upstream client should perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncPlan {
    Full,
    Incremental {
        /// Fetch records changed at or after this instant.
        cutoff: DateTime<Utc>,
    },
}

/// Decides the fetch plan.
///
/// The cursor only gates the full-vs-incremental branch: an incremental
/// request on a fresh data directory (no cursor) falls back to a full
/// fetch. The cutoff itself is `now - window_days`, independent of the
/// cursor value.
pub fn plan(
    mode: SyncMode,
    last_sync: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window_days: i64,
) -> SyncPlan {
    match (mode, last_sync) {
        (SyncMode::Full, _) | (SyncMode::Incremental, None) => SyncPlan::Full,
        (SyncMode::Incremental, Some(_)) => SyncPlan::Incremental {
            cutoff: now - Duration::days(window_days),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn full_mode_always_plans_full() {
        let now = at("2025-08-06T12:00:00Z");
        let last = Some(at("2025-08-01T00:00:00Z"));
        assert_eq!(plan(SyncMode::Full, last, now, 180), SyncPlan::Full);
        assert_eq!(plan(SyncMode::Full, None, now, 180), SyncPlan::Full);
    }

    #[test]
    fn first_run_falls_back_to_full() {
        let now = at("2025-08-06T12:00:00Z");
        assert_eq!(plan(SyncMode::Incremental, None, now, 180), SyncPlan::Full);
    }

    #[test]
    fn incremental_cutoff_is_window_driven() {
        let now = at("2025-08-06T12:00:00Z");
        let last = Some(at("2025-08-01T00:00:00Z"));
        assert_eq!(
            plan(SyncMode::Incremental, last, now, 30),
            SyncPlan::Incremental {
                cutoff: at("2025-07-07T12:00:00Z"),
            }
        );
    }

    #[test]
    fn cutoff_ignores_the_cursor_value() {
        let now = at("2025-08-06T12:00:00Z");
        let old = Some(at("2020-01-01T00:00:00Z"));
        let recent = Some(at("2025-08-05T00:00:00Z"));
        assert_eq!(
            plan(SyncMode::Incremental, old, now, 30),
            plan(SyncMode::Incremental, recent, now, 30),
        );
    }
}
