//! Static HTML rendering of a [`DayOverDay`] comparison.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chanstats_core::DateStyle;
use chanstats_dataset::{DayOverDay, DiffRow};
use chrono::NaiveDateTime;

use crate::error::ReportError;
use crate::format::{escape_html, format_count, format_date, format_delta, format_timestamp};

const COLUMNS: [&str; 9] = [
    "番号",
    "タイトル",
    "投稿日",
    "再生数",
    "再生数差分",
    "高評価",
    "高評価差分",
    "コメント数",
    "コメント数差分",
];

const STYLE: &str = "\
body { font-family: sans-serif; padding: 2em; background: #f9f9f9; }
h1, p.meta { text-align: center; }
.table-wrap { overflow-x: auto; max-width: 100vw; }
table { border-collapse: collapse; background: white; width: max-content; min-width: 700px; }
th, td { border: 1px solid #ccc; padding: 8px; text-align: center; font-size: 14px; white-space: nowrap; }
th { background-color: #f0f0f0; }
tr:nth-child(even) { background-color: #f9f9f9; }
td.no-data { color: #999; }";

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    /// Generation time shown under the heading; omitted when `None`.
    pub generated_at: Option<NaiveDateTime>,
    pub date_style: DateStyle,
}

/// Renders the full HTML document for `diff`.
#[must_use]
pub fn render_html(diff: &DayOverDay, options: &ReportOptions) -> String {
    let style = options.date_style;
    let title = escape_html(&options.title);
    let mut html = String::with_capacity(4096 + diff.rows.len() * 512);

    // `write!` into a `String` cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>{title}</title>\n<style>\n{STYLE}\n</style>\n</head>\n<body>\n<h1>{title}</h1>\n"
    );

    if let Some(at) = options.generated_at {
        let _ = writeln!(
            html,
            "<p class=\"meta\">生成日時: {}</p>",
            format_timestamp(at, style)
        );
    }

    let _ = writeln!(
        html,
        "<p class=\"meta\">最新日: {} ／ 前日: {}</p>",
        format_date(diff.latest_date, style),
        format_date(diff.prev_date, style)
    );

    html.push_str("<div class=\"table-wrap\">\n<table>\n<thead>\n<tr>");
    for column in COLUMNS {
        let _ = write!(html, "<th>{column}</th>");
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &diff.rows {
        render_row(&mut html, row, style);
    }

    html.push_str("</tbody>\n</table>\n</div>\n</body>\n</html>\n");
    html
}

fn render_row(html: &mut String, row: &DiffRow, style: DateStyle) {
    let _ = write!(
        html,
        "<tr><td>{}</td><td>{}</td><td>{}</td>",
        row.rank,
        escape_html(&row.title),
        format_date(row.published_at, style)
    );
    for metric in [row.views, row.likes, row.comments] {
        let class = if metric.delta.value().is_some() {
            ""
        } else {
            " class=\"no-data\""
        };
        let _ = write!(
            html,
            "<td>{}</td><td{class}>{}</td>",
            format_count(metric.current),
            format_delta(metric.delta)
        );
    }
    html.push_str("</tr>\n");
}

/// Writes `html` to `path`, replacing any previous report.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the parent directory cannot be created or
/// the file cannot be written.
pub fn write_report(path: &Path, html: &str) -> Result<(), ReportError> {
    let io_err = |source: std::io::Error| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, html).map_err(io_err)?;
    tracing::debug!(path = %path.display(), bytes = html.len(), "report written");
    Ok(())
}

#[cfg(test)]
#[path = "html_test.rs"]
mod tests;
