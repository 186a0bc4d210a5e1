//! Display formatting for report cells.

use chanstats_core::DateStyle;
use chanstats_dataset::Delta;
use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// `1234567` → `"1,234,567"`.
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Signed delta with separators, or the no-data marker verbatim.
#[must_use]
pub fn format_delta(delta: Delta) -> String {
    match delta {
        Delta::Change(v) if v < 0 => format!("-{}", format_count(v.unsigned_abs())),
        Delta::Change(v) => format_count(v.unsigned_abs()),
        Delta::NoData => Delta::NoData.to_string(),
    }
}

#[must_use]
pub fn format_date(date: NaiveDate, style: DateStyle) -> String {
    match style {
        DateStyle::Iso => date.format("%Y-%m-%d").to_string(),
        DateStyle::Japanese => format!("{}年{}月{}日", date.year(), date.month(), date.day()),
    }
}

#[must_use]
pub fn format_timestamp(at: NaiveDateTime, style: DateStyle) -> String {
    format!("{} {}", format_date(at.date(), style), at.format("%H:%M"))
}

/// Escapes text for use in HTML element content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_count_inserts_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_count(u64::MAX), "18,446,744,073,709,551,615");
    }

    #[test]
    fn format_delta_keeps_sign_and_marker() {
        assert_eq!(format_delta(Delta::Change(20)), "20");
        assert_eq!(format_delta(Delta::Change(0)), "0");
        assert_eq!(format_delta(Delta::Change(-12_345)), "-12,345");
        assert_eq!(format_delta(Delta::Change(i64::MIN)), "-9,223,372,036,854,775,808");
        assert_eq!(format_delta(Delta::NoData), "—");
    }

    #[test]
    fn format_date_styles() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(format_date(d, DateStyle::Iso), "2024-01-10");
        assert_eq!(format_date(d, DateStyle::Japanese), "2024年1月10日");
    }

    #[test]
    fn format_timestamp_styles() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(9, 5, 30)
            .unwrap();
        assert_eq!(format_timestamp(at, DateStyle::Iso), "2024-01-10 09:05");
        assert_eq!(format_timestamp(at, DateStyle::Japanese), "2024年1月10日 09:05");
    }

    #[test]
    fn escape_html_handles_markup() {
        assert_eq!(
            escape_html(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }
}
