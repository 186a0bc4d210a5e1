//! On-disk format of the dataset.
//!
//! A single UTF-8 CSV file with a leading byte-order mark and the header
//! `タイトル,投稿日,再生数,高評価,コメント数,取得日`. Dates are written as
//! `YYYY-MM-DD`. On read the BOM is optional, English header names are
//! accepted as aliases, and date cells with a trailing time component
//! (`2024-01-10 00:00:00`) are truncated to the day.

use std::fs;
use std::path::{Path, PathBuf};

use chanstats_core::VideoRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

const BOM: &str = "\u{feff}";

const HEADERS: [&str; 6] = ["タイトル", "投稿日", "再生数", "高評価", "コメント数", "取得日"];

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "タイトル", alias = "title")]
    title: String,
    #[serde(rename = "投稿日", alias = "published_at", with = "day")]
    published_at: NaiveDate,
    #[serde(rename = "再生数", alias = "view_count")]
    view_count: u64,
    #[serde(rename = "高評価", alias = "like_count")]
    like_count: u64,
    #[serde(rename = "コメント数", alias = "comment_count")]
    comment_count: u64,
    #[serde(rename = "取得日", alias = "collected_at", with = "day")]
    collected_at: NaiveDate,
}

impl From<CsvRow> for VideoRecord {
    fn from(row: CsvRow) -> Self {
        VideoRecord {
            title: row.title,
            published_at: row.published_at,
            view_count: row.view_count,
            like_count: row.like_count,
            comment_count: row.comment_count,
            collected_at: row.collected_at,
        }
    }
}

impl From<&VideoRecord> for CsvRow {
    fn from(record: &VideoRecord) -> Self {
        CsvRow {
            title: record.title.clone(),
            published_at: record.published_at,
            view_count: record.view_count,
            like_count: record.like_count,
            comment_count: record.comment_count,
            collected_at: record.collected_at,
        }
    }
}

mod day {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub(super) fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(FORMAT))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        let trimmed = raw.trim();
        let (day, rest) = if trimmed.is_char_boundary(10) {
            trimmed.split_at(10)
        } else {
            (trimmed, "")
        };
        // Anything after the day must be a time component.
        if !(rest.is_empty() || rest.starts_with(' ') || rest.starts_with('T')) {
            return Err(de::Error::custom(format!("invalid date '{trimmed}'")));
        }
        NaiveDate::parse_from_str(day, FORMAT)
            .map_err(|_| de::Error::custom(format!("invalid date '{trimmed}'")))
    }
}

/// Parses dataset CSV text. A leading BOM is ignored.
///
/// # Errors
///
/// Returns the underlying `csv::Error` for malformed rows, unknown headers or
/// unparseable cells.
pub fn decode(input: &str) -> Result<Vec<VideoRecord>, csv::Error> {
    let input = input.strip_prefix(BOM).unwrap_or(input);
    let mut reader = csv::ReaderBuilder::new().from_reader(input.as_bytes());
    reader
        .deserialize::<CsvRow>()
        .map(|row| row.map(VideoRecord::from))
        .collect()
}

/// Serializes records to dataset CSV bytes, BOM and header included. The
/// header is written even when `records` is empty.
///
/// # Errors
///
/// Returns [`DatasetError::Encode`] if a row cannot be serialized.
pub fn encode(records: &[VideoRecord]) -> Result<Vec<u8>, DatasetError> {
    let mut buf = BOM.as_bytes().to_vec();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(&mut buf);
    writer.write_record(HEADERS)?;
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    drop(writer);
    Ok(buf)
}

/// Loads the dataset at `path`.
///
/// # Errors
///
/// Returns [`DatasetError::Read`] if the file cannot be read (including when
/// it does not exist) and [`DatasetError::Parse`] if it is not a valid
/// dataset.
pub fn load(path: &Path) -> Result<Vec<VideoRecord>, DatasetError> {
    let content = fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&content).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the dataset at `path`, treating a missing file as an empty dataset.
///
/// # Errors
///
/// Same as [`load`] for every failure other than the file not existing.
pub fn load_or_empty(path: &Path) -> Result<Vec<VideoRecord>, DatasetError> {
    match load(path) {
        Err(DatasetError::Read { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no existing dataset; starting empty");
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Writes the dataset to `path`, replacing any previous file.
///
/// The bytes go to a sibling `.tmp` file which is then renamed over `path`,
/// so readers see either the old or the new dataset.
///
/// # Errors
///
/// Returns [`DatasetError::Encode`] if serialization fails and
/// [`DatasetError::Write`] on any filesystem failure.
pub fn save(path: &Path, records: &[VideoRecord]) -> Result<(), DatasetError> {
    let bytes = encode(records)?;
    let write_err = |source: std::io::Error| DatasetError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp = tmp_path(path);
    fs::write(&tmp, bytes).map_err(write_err)?;
    fs::rename(&tmp, path).map_err(write_err)?;

    tracing::debug!(path = %path.display(), records = records.len(), "dataset written");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(title: &str) -> VideoRecord {
        VideoRecord {
            title: title.to_string(),
            published_at: date(2024, 1, 7),
            view_count: 1_234_567,
            like_count: 890,
            comment_count: 12,
            collected_at: date(2024, 1, 10),
        }
    }

    #[test]
    fn encode_starts_with_bom_and_header() {
        let bytes = encode(&[record("A")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with('\u{feff}'));
        let mut lines = text.trim_start_matches('\u{feff}').lines();
        assert_eq!(
            lines.next(),
            Some("タイトル,投稿日,再生数,高評価,コメント数,取得日")
        );
        assert_eq!(lines.next(), Some("A,2024-01-07,1234567,890,12,2024-01-10"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn encode_empty_dataset_still_writes_header() {
        let text = String::from_utf8(encode(&[]).unwrap()).unwrap();
        assert_eq!(
            text,
            "\u{feff}タイトル,投稿日,再生数,高評価,コメント数,取得日\n"
        );
    }

    #[test]
    fn titles_with_commas_and_quotes_survive() {
        let records = vec![record("Live, \"Encore\" ver.")];
        let decoded = decode(&String::from_utf8(encode(&records).unwrap()).unwrap()).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn decode_without_bom() {
        let input = "タイトル,投稿日,再生数,高評価,コメント数,取得日\nA,2024-01-07,50,3,1,2024-01-10\n";
        let decoded = decode(input).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].view_count, 50);
        assert_eq!(decoded[0].collected_at, date(2024, 1, 10));
    }

    #[test]
    fn decode_accepts_timestamped_dates() {
        let input = "\u{feff}タイトル,投稿日,再生数,高評価,コメント数,取得日\nA,2024-01-07,50,3,1,2024-01-10 00:00:00\n";
        let decoded = decode(input).unwrap();
        assert_eq!(decoded[0].collected_at, date(2024, 1, 10));
    }

    #[test]
    fn decode_accepts_english_headers() {
        let input = "title,published_at,view_count,like_count,comment_count,collected_at\nA,2024-01-07,50,3,1,2024-01-10\n";
        let decoded = decode(input).unwrap();
        assert_eq!(decoded[0].title, "A");
        assert_eq!(decoded[0].like_count, 3);
    }

    #[test]
    fn decode_rejects_bad_count() {
        let input = "タイトル,投稿日,再生数,高評価,コメント数,取得日\nA,2024-01-07,lots,3,1,2024-01-10\n";
        assert!(decode(input).is_err());
    }

    #[test]
    fn decode_accepts_rfc3339_dates() {
        let input = "タイトル,投稿日,再生数,高評価,コメント数,取得日\nA,2024-01-07T09:00:00Z,50,3,1,2024-01-10\n";
        let decoded = decode(input).unwrap();
        assert_eq!(decoded[0].published_at, date(2024, 1, 7));
    }

    #[test]
    fn decode_rejects_trailing_garbage_after_date() {
        let input = "タイトル,投稿日,再生数,高評価,コメント数,取得日\nA,2024-01-07,50,3,1,2024-01-10xyz\n";
        assert!(decode(input).is_err());
    }

    #[test]
    fn decode_rejects_bad_date() {
        let input = "タイトル,投稿日,再生数,高評価,コメント数,取得日\nA,2024/01/07,50,3,1,2024-01-10\n";
        assert!(decode(input).is_err());
    }

    #[test]
    fn decode_empty_input_is_empty_dataset() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("\u{feff}").unwrap().is_empty());
    }

    #[test]
    fn tmp_path_is_a_sibling() {
        let tmp = tmp_path(Path::new("/data/video_stats.csv"));
        assert_eq!(tmp, PathBuf::from("/data/video_stats.csv.tmp"));
    }
}
