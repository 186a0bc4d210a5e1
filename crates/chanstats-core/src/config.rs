use crate::app_config::{AppConfig, DateStyle};
use crate::ConfigError;

/// Upper bound the `playlistItems` endpoint accepts for `maxResults`.
const MAX_RESULTS_LIMIT: u32 = 50;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let non_empty = |var: &str| lookup(var).ok().filter(|v| !v.trim().is_empty());

    let youtube_api_key = non_empty("YOUTUBE_API_KEY");
    let channel_id = non_empty("CHANSTATS_CHANNEL_ID");

    let max_results = parse_u32("CHANSTATS_MAX_RESULTS", "20")?;
    if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
        return Err(invalid(
            "CHANSTATS_MAX_RESULTS",
            format!("must be between 1 and {MAX_RESULTS_LIMIT}, got {max_results}"),
        ));
    }

    let retention_days = parse_u32("CHANSTATS_RETENTION_DAYS", "5")?;

    let dataset_path = PathBuf::from(or_default("CHANSTATS_DATASET_PATH", "./video_stats.csv"));
    let report_path = PathBuf::from(or_default("CHANSTATS_REPORT_PATH", "./index.html"));
    let report_title = or_default("CHANSTATS_REPORT_TITLE", "前日差一覧");
    let report_timestamp = parse_bool("CHANSTATS_REPORT_TIMESTAMP", "true")?;
    let report_date_style = parse_date_style(&or_default("CHANSTATS_REPORT_DATE_STYLE", "iso"))
        .ok_or_else(|| {
            invalid(
                "CHANSTATS_REPORT_DATE_STYLE",
                "expected 'iso' or 'ja'".to_string(),
            )
        })?;

    let request_timeout_secs = parse_u64("CHANSTATS_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("CHANSTATS_USER_AGENT", "chanstats/0.1 (channel-metrics)");
    let log_level = or_default("CHANSTATS_LOG_LEVEL", "info");

    Ok(AppConfig {
        youtube_api_key,
        channel_id,
        max_results,
        retention_days,
        dataset_path,
        report_path,
        report_title,
        report_timestamp,
        report_date_style,
        request_timeout_secs,
        user_agent,
        log_level,
    })
}

/// Parse a string into a `DateStyle` variant.
fn parse_date_style(s: &str) -> Option<DateStyle> {
    match s.trim().to_ascii_lowercase().as_str() {
        "iso" => Some(DateStyle::Iso),
        "ja" | "japanese" => Some(DateStyle::Japanese),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
