use thiserror::Error;

/// Errors returned by the YouTube Data API client.
///
/// Every variant is fatal for a collection run.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("YouTube API error (HTTP {status}) from {endpoint}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A listing that must contain at least one item came back empty.
    #[error("empty result from {context}")]
    EmptyResult { context: String },

    /// A statistics field was present but not a non-negative integer.
    #[error("invalid {field} '{value}' for video {video_id}")]
    InvalidCount {
        video_id: String,
        field: &'static str,
        value: String,
    },

    /// `publishedAt` did not start with a `YYYY-MM-DD` date.
    #[error("invalid publishedAt '{value}' for video {video_id}")]
    InvalidDate { video_id: String, value: String },

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}
