use chrono::NaiveDate;

/// One video's engagement metrics as observed on one collection date.
///
/// `(title, collected_at)` is the record's identity within a dataset. The
/// title is the display title reported by the platform, so a renamed video
/// starts a new series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub title: String,
    pub published_at: NaiveDate,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub collected_at: NaiveDate,
}

impl VideoRecord {
    /// The composite key the dataset deduplicates on.
    #[must_use]
    pub fn identity(&self) -> (&str, NaiveDate) {
        (self.title.as_str(), self.collected_at)
    }
}
