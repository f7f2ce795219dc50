//! Sync orchestration: fetch, parse, persist for one calendar date
//!
//! The five data sources are fetched independently; a failed fetch
//! degrades that source to absent and never aborts the run. Only the
//! persist phase can fail the run, and it is all-or-nothing.

use std::fmt;

use chrono::{Duration, Local, NaiveDate};
use serde_json::Value;
use tracing::warn;

use crate::client::GarminApi;
use crate::db::models::DayBatch;
use crate::db::Database;
use crate::error::{Result, SyncError};
use crate::parsers;

/// What happened to one data source during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOutcome {
    /// Fetched and at least one row persisted
    Persisted,
    /// Fetched, but the payload held no usable record
    Empty,
    /// The fetch failed and the source was skipped
    FetchFailed,
}

impl fmt::Display for SourceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceOutcome::Persisted => write!(f, "persisted"),
            SourceOutcome::Empty => write!(f, "no data"),
            SourceOutcome::FetchFailed => write!(f, "fetch failed, skipped"),
        }
    }
}

/// Per-source outcomes and counts for one sync run
#[derive(Debug, Clone, Copy)]
pub struct SyncReport {
    pub date: NaiveDate,
    pub daily_summary: SourceOutcome,
    pub hydration: SourceOutcome,
    pub sleep: SourceOutcome,
    pub hrv: SourceOutcome,
    pub activities: SourceOutcome,
    pub activity_count: usize,
    pub split_count: usize,
}

impl SyncReport {
    /// True when the run wrote no rows at all
    pub fn nothing_persisted(&self) -> bool {
        !matches!(self.daily_summary, SourceOutcome::Persisted)
            && !matches!(self.sleep, SourceOutcome::Persisted)
            && !matches!(self.hrv, SourceOutcome::Persisted)
            && self.activity_count == 0
    }
}

/// Validate a YYYY-MM-DD date argument before anything is fetched
pub fn parse_target_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| SyncError::InvalidDateFormat(s.to_string()))
}

/// The previous calendar day, used when no date argument is given
pub fn default_target_date() -> NaiveDate {
    Local::now().date_naive() - Duration::days(1)
}

/// Sync engine for one run: fetches through the API boundary and
/// persists through a caller-owned database handle
pub struct SyncEngine<'a, A: GarminApi> {
    api: &'a A,
    db: &'a mut Database,
}

impl<'a, A: GarminApi> SyncEngine<'a, A> {
    pub fn new(api: &'a A, db: &'a mut Database) -> Self {
        Self { api, db }
    }

    /// Run fetch → parse → persist for one calendar date.
    ///
    /// The database transaction is scoped to the persist phase only and
    /// is skipped entirely when nothing was parsed.
    pub fn sync_date(&mut self, date: NaiveDate) -> Result<SyncReport> {
        let stats = self.fetch("stats_and_body", || self.api.stats_and_body(date));
        let hydration = self.fetch("hydration", || self.api.hydration(date));
        let sleep_payload = self.fetch("sleep", || self.api.sleep(date));
        let hrv_payload = self.fetch("hrv", || self.api.hrv(date));
        let activities_payload =
            self.fetch("activities_by_date", || self.api.activities_for_date(date));

        let summary = stats.as_ref().and_then(|value| {
            match parsers::parse_daily_summary(value, hydration.as_ref()) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(error = %err, "daily summary record skipped");
                    None
                }
            }
        });

        let sleep = sleep_payload.as_ref().and_then(parsers::parse_daily_sleep);
        let hrv = hrv_payload.as_ref().and_then(parsers::parse_daily_hrv);

        let activities = activities_payload
            .as_ref()
            .and_then(|v| v.as_array())
            .map(|entries| parsers::parse_activities(entries, date))
            .unwrap_or_default();

        let batch = DayBatch {
            summary,
            sleep,
            hrv,
            activities,
        };

        let report = if batch.is_empty() {
            Default::default()
        } else {
            self.db.persist_day(&batch)?
        };

        Ok(SyncReport {
            date,
            daily_summary: outcome(stats.is_some(), report.daily_summary),
            hydration: outcome(hydration.is_some(), report.daily_summary),
            sleep: outcome(sleep_payload.is_some(), report.daily_sleep),
            hrv: outcome(hrv_payload.is_some(), report.daily_hrv),
            activities: outcome(activities_payload.is_some(), report.activities > 0),
            activity_count: report.activities,
            split_count: report.splits,
        })
    }

    /// Fetch one source, isolating failure: an error is logged and the
    /// source degrades to absent
    fn fetch(&self, source: &str, call: impl FnOnce() -> Result<Value>) -> Option<Value> {
        match call() {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(source, error = %err, "fetch failed, source skipped");
                None
            }
        }
    }
}

fn outcome(fetched: bool, persisted: bool) -> SourceOutcome {
    if !fetched {
        SourceOutcome::FetchFailed
    } else if persisted {
        SourceOutcome::Persisted
    } else {
        SourceOutcome::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_date() {
        assert_eq!(
            parse_target_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_target_date_rejects_malformed() {
        for bad in ["03/01/2024", "2024-13-01", "yesterday", ""] {
            let err = parse_target_date(bad).unwrap_err();
            assert!(matches!(err, SyncError::InvalidDateFormat(_)), "{}", bad);
        }
    }

    #[test]
    fn test_default_target_date_is_yesterday() {
        let today = Local::now().date_naive();
        assert_eq!(default_target_date(), today - Duration::days(1));
    }

    #[test]
    fn test_outcome_tri_state() {
        assert_eq!(outcome(false, false), SourceOutcome::FetchFailed);
        assert_eq!(outcome(true, false), SourceOutcome::Empty);
        assert_eq!(outcome(true, true), SourceOutcome::Persisted);
    }
}
