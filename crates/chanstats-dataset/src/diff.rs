//! Day-over-day comparison of the latest snapshot.
//!
//! The comparison date is always the calendar day before the latest
//! collection date. If nothing was collected on that day, every delta is
//! [`Delta::NoData`]; an older snapshot is never substituted.

use std::collections::HashMap;
use std::fmt;

use chanstats_core::VideoRecord;
use chrono::{Days, NaiveDate};

use crate::error::DatasetError;

/// Change of one metric against the previous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delta {
    Change(i64),
    /// No record with the same title on the previous day.
    NoData,
}

impl Delta {
    #[must_use]
    pub fn between(current: u64, prior: Option<u64>) -> Self {
        match prior {
            Some(prior) => Delta::Change(signed_difference(current, prior)),
            None => Delta::NoData,
        }
    }

    #[must_use]
    pub fn value(self) -> Option<i64> {
        match self {
            Delta::Change(v) => Some(v),
            Delta::NoData => None,
        }
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delta::Change(v) => write!(f, "{v}"),
            Delta::NoData => f.write_str("—"),
        }
    }
}

fn signed_difference(current: u64, prior: u64) -> i64 {
    if current >= prior {
        i64::try_from(current - prior).unwrap_or(i64::MAX)
    } else {
        i64::try_from(prior - current).map_or(i64::MIN, |d| -d)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDiff {
    pub current: u64,
    pub delta: Delta,
}

/// One row of the report: a video from the latest snapshot with its deltas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow {
    /// 1-based position in the latest snapshot's fetch order.
    pub rank: usize,
    pub title: String,
    pub published_at: NaiveDate,
    pub views: MetricDiff,
    pub likes: MetricDiff,
    pub comments: MetricDiff,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayOverDay {
    pub latest_date: NaiveDate,
    pub prev_date: NaiveDate,
    /// Whether any record exists on `prev_date`.
    pub has_prior: bool,
    pub rows: Vec<DiffRow>,
}

/// Compares the latest snapshot in `records` with the previous calendar day.
///
/// Rows follow the latest snapshot's order in `records`. Titles are matched
/// exactly; if the previous day has duplicate titles the first one wins.
///
/// # Errors
///
/// Returns [`DatasetError::Empty`] if `records` is empty.
pub fn day_over_day(records: &[VideoRecord]) -> Result<DayOverDay, DatasetError> {
    let latest_date = records
        .iter()
        .map(|r| r.collected_at)
        .max()
        .ok_or(DatasetError::Empty)?;
    let prev_date = latest_date
        .checked_sub_days(Days::new(1))
        .unwrap_or(NaiveDate::MIN);

    let mut prior: HashMap<&str, &VideoRecord> = HashMap::new();
    for record in records.iter().filter(|r| r.collected_at == prev_date) {
        prior.entry(record.title.as_str()).or_insert(record);
    }

    if prior.is_empty() {
        tracing::warn!(%latest_date, %prev_date, "no snapshot for the previous day; deltas unavailable");
    }

    let rows = records
        .iter()
        .filter(|r| r.collected_at == latest_date)
        .enumerate()
        .map(|(i, current)| {
            let before = prior.get(current.title.as_str());
            DiffRow {
                rank: i + 1,
                title: current.title.clone(),
                published_at: current.published_at,
                views: MetricDiff {
                    current: current.view_count,
                    delta: Delta::between(current.view_count, before.map(|p| p.view_count)),
                },
                likes: MetricDiff {
                    current: current.like_count,
                    delta: Delta::between(current.like_count, before.map(|p| p.like_count)),
                },
                comments: MetricDiff {
                    current: current.comment_count,
                    delta: Delta::between(current.comment_count, before.map(|p| p.comment_count)),
                },
            }
        })
        .collect();

    Ok(DayOverDay {
        latest_date,
        prev_date,
        has_prior: !prior.is_empty(),
        rows,
    })
}
