//! Folding a freshly collected snapshot into the rolling dataset.
//!
//! The dataset is an ordered `Vec<VideoRecord>` whose identity key is
//! `(title, collected_at)`. After [`apply_snapshot`]:
//!
//! - each identity appears at most once, and a fresh record always replaces an
//!   existing one with the same identity;
//! - no record was published on the collection date itself;
//! - no record is older than `max(collected_at) - retention_days`.
//!
//! Existing records keep their relative order and the fresh batch is appended
//! after them in fetch order.

use std::collections::HashSet;

use chanstats_core::VideoRecord;
use chrono::{Days, NaiveDate};

/// Result of folding one snapshot into the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotOutcome {
    pub records: Vec<VideoRecord>,
    /// Titles dropped because they were published on the collection date.
    pub excluded_same_day: Vec<String>,
    /// Existing records replaced by a fresh record with the same identity.
    pub replaced: usize,
    /// Records dropped by the retention window.
    pub pruned: usize,
}

/// Drops records published on `today`, returning the kept records and the
/// titles that were dropped.
#[must_use]
pub fn exclude_published_on(
    fresh: Vec<VideoRecord>,
    today: NaiveDate,
) -> (Vec<VideoRecord>, Vec<String>) {
    let (excluded, kept): (Vec<_>, Vec<_>) = fresh
        .into_iter()
        .partition(|record| record.published_at == today);
    (kept, excluded.into_iter().map(|r| r.title).collect())
}

/// Merges `fresh` into `existing`.
///
/// Every existing record whose identity also appears in `fresh` is removed,
/// then `fresh` is appended. Duplicate identities inside `fresh` keep the
/// first occurrence. Returns the merged records and how many existing records
/// were replaced.
#[must_use]
pub fn merge(existing: Vec<VideoRecord>, fresh: Vec<VideoRecord>) -> (Vec<VideoRecord>, usize) {
    let mut seen: HashSet<(String, NaiveDate)> = HashSet::with_capacity(fresh.len());
    let fresh: Vec<VideoRecord> = fresh
        .into_iter()
        .filter(|record| {
            let first = seen.insert((record.title.clone(), record.collected_at));
            if !first {
                tracing::warn!(
                    title = %record.title,
                    collected_at = %record.collected_at,
                    "duplicate title in fresh batch; keeping the newest upload"
                );
            }
            first
        })
        .collect();

    let before = existing.len();
    let mut merged: Vec<VideoRecord> = existing
        .into_iter()
        .filter(|record| !seen.contains(&(record.title.clone(), record.collected_at)))
        .collect();
    let replaced = before - merged.len();

    merged.extend(fresh);
    (merged, replaced)
}

/// Drops records collected before `max(collected_at) - retention_days`.
/// Returns the kept records and how many were dropped.
#[must_use]
pub fn prune(records: Vec<VideoRecord>, retention_days: u32) -> (Vec<VideoRecord>, usize) {
    let Some(latest) = records.iter().map(|r| r.collected_at).max() else {
        return (records, 0);
    };
    let Some(cutoff) = latest.checked_sub_days(Days::new(u64::from(retention_days))) else {
        return (records, 0);
    };

    let before = records.len();
    let kept: Vec<VideoRecord> = records
        .into_iter()
        .filter(|record| record.collected_at >= cutoff)
        .collect();
    let pruned = before - kept.len();
    (kept, pruned)
}

/// Applies one collection run: same-day exclusion, merge, retention prune.
///
/// `fresh` must already be stamped with `collected_at == today`.
#[must_use]
pub fn apply_snapshot(
    existing: Vec<VideoRecord>,
    fresh: Vec<VideoRecord>,
    today: NaiveDate,
    retention_days: u32,
) -> SnapshotOutcome {
    let (fresh, excluded_same_day) = exclude_published_on(fresh, today);
    for title in &excluded_same_day {
        tracing::debug!(%title, %today, "published today; skipping until next collection");
    }

    let (merged, replaced) = merge(existing, fresh);
    let (records, pruned) = prune(merged, retention_days);

    SnapshotOutcome {
        records,
        excluded_same_day,
        replaced,
        pruned,
    }
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
