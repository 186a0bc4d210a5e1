//! Conversion from raw API items to [`chanstats_core::VideoRecord`].

use chanstats_core::VideoRecord;
use chrono::NaiveDate;

use crate::error::YoutubeError;
use crate::types::VideoItem;

/// Normalizes a [`VideoItem`] into a [`VideoRecord`] stamped with
/// `collected_at`.
///
/// `publishedAt` is truncated to its calendar date as reported (UTC). Absent
/// counters default to zero.
///
/// # Errors
///
/// Returns [`YoutubeError::InvalidDate`] if `publishedAt` does not start with
/// a `YYYY-MM-DD` date, or [`YoutubeError::InvalidCount`] if a counter is not
/// a non-negative integer.
pub fn normalize_video(item: VideoItem, collected_at: NaiveDate) -> Result<VideoRecord, YoutubeError> {
    let published_at = item
        .snippet
        .published_at
        .get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .ok_or_else(|| YoutubeError::InvalidDate {
            video_id: item.id.clone(),
            value: item.snippet.published_at.clone(),
        })?;

    let stats = &item.statistics;
    let view_count = parse_count(&item.id, "viewCount", stats.view_count.as_deref())?;
    let like_count = parse_count(&item.id, "likeCount", stats.like_count.as_deref())?;
    let comment_count = parse_count(&item.id, "commentCount", stats.comment_count.as_deref())?;

    Ok(VideoRecord {
        title: item.snippet.title,
        published_at,
        view_count,
        like_count,
        comment_count,
        collected_at,
    })
}

fn parse_count(video_id: &str, field: &'static str, raw: Option<&str>) -> Result<u64, YoutubeError> {
    let Some(raw) = raw else {
        tracing::debug!(%video_id, field, "statistics field absent; defaulting to 0");
        return Ok(0);
    };
    raw.trim()
        .parse::<u64>()
        .map_err(|_| YoutubeError::InvalidCount {
            video_id: video_id.to_string(),
            field,
            value: raw.to_string(),
        })
}
