//! The rolling video-metrics dataset: its on-disk CSV format, the snapshot
//! merge and retention rules, and the day-over-day comparison the report is
//! built from.

pub mod codec;
pub mod diff;
pub mod error;
pub mod merge;

pub use codec::{decode, encode, load, load_or_empty, save};
pub use diff::{day_over_day, DayOverDay, Delta, DiffRow, MetricDiff};
pub use error::DatasetError;
pub use merge::{apply_snapshot, exclude_published_on, merge, prune, SnapshotOutcome};
