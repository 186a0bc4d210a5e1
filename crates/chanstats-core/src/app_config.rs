use std::path::PathBuf;

use crate::ConfigError;

/// How calendar dates and the generation timestamp are printed in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `2024-01-10`
    #[default]
    Iso,
    /// `2024年1月10日`
    Japanese,
}

impl std::fmt::Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Iso => write!(f, "iso"),
            DateStyle::Japanese => write!(f, "ja"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub youtube_api_key: Option<String>,
    pub channel_id: Option<String>,
    pub max_results: u32,
    pub retention_days: u32,
    pub dataset_path: PathBuf,
    pub report_path: PathBuf,
    pub report_title: String,
    pub report_timestamp: bool,
    pub report_date_style: DateStyle,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
}

impl AppConfig {
    /// The YouTube API key, required by any command that calls the API.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `YOUTUBE_API_KEY` is unset or blank.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.youtube_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("YOUTUBE_API_KEY".to_string()))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `CHANSTATS_CHANNEL_ID` is unset or blank.
    pub fn require_channel_id(&self) -> Result<&str, ConfigError> {
        self.channel_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("CHANSTATS_CHANNEL_ID".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("channel_id", &self.channel_id)
            .field("max_results", &self.max_results)
            .field("retention_days", &self.retention_days)
            .field("dataset_path", &self.dataset_path)
            .field("report_path", &self.report_path)
            .field("report_title", &self.report_title)
            .field("report_timestamp", &self.report_timestamp)
            .field("report_date_style", &self.report_date_style)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("log_level", &self.log_level)
            .finish()
    }
}
