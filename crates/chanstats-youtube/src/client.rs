//! HTTP client for the YouTube Data API v3.
//!
//! Wraps `reqwest` with API key management, typed response deserialization and
//! the three calls the collector needs: resolve a channel's uploads playlist,
//! list its newest entries, and fetch snippet + statistics for those videos.
//! Requests are issued one at a time and never retried.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::YoutubeError;
use crate::types::{ApiErrorEnvelope, ChannelItem, ListResponse, PlaylistItem, VideoItem};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Client for the YouTube Data API.
///
/// Use [`YoutubeClient::new`] for production or
/// [`YoutubeClient::with_base_url`] to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YoutubeClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so joining "videos" appends a segment
        // instead of replacing "v3".
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| YoutubeError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Resolves a channel id to the id of its "uploads" playlist.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::EmptyResult`] if the channel does not exist.
    /// - [`YoutubeError::Api`] / [`YoutubeError::Http`] on request failure.
    /// - [`YoutubeError::Deserialize`] if the body has an unexpected shape.
    pub async fn uploads_playlist_id(&self, channel_id: &str) -> Result<String, YoutubeError> {
        let url = self.build_url(
            "channels",
            &[("part", "contentDetails"), ("id", channel_id)],
        )?;
        let context = format!("channels(id={channel_id})");
        let response: ListResponse<ChannelItem> = self.get_json(url, &context).await?;

        response
            .items
            .into_iter()
            .next()
            .map(|item| item.content_details.related_playlists.uploads)
            .ok_or(YoutubeError::EmptyResult { context })
    }

    /// Lists the newest `max_results` video ids in a playlist, newest first.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::EmptyResult`] if the playlist has no entries.
    /// - [`YoutubeError::Api`] / [`YoutubeError::Http`] on request failure.
    /// - [`YoutubeError::Deserialize`] if the body has an unexpected shape.
    pub async fn recent_video_ids(
        &self,
        playlist_id: &str,
        max_results: u32,
    ) -> Result<Vec<String>, YoutubeError> {
        let max = max_results.to_string();
        let url = self.build_url(
            "playlistItems",
            &[
                ("part", "contentDetails"),
                ("playlistId", playlist_id),
                ("maxResults", &max),
            ],
        )?;
        let context = format!("playlistItems(playlistId={playlist_id})");
        let response: ListResponse<PlaylistItem> = self.get_json(url, &context).await?;

        let ids: Vec<String> = response
            .items
            .into_iter()
            .map(|item| item.content_details.video_id)
            .take(usize::try_from(max_results).unwrap_or(usize::MAX))
            .collect();

        if ids.is_empty() {
            return Err(YoutubeError::EmptyResult { context });
        }
        Ok(ids)
    }

    /// Fetches snippet and statistics for a batch of videos.
    ///
    /// Items are returned in the order of `video_ids`. Ids the API does not
    /// return (private or deleted videos) are skipped with a warning.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::EmptyResult`] if none of the ids resolve.
    /// - [`YoutubeError::Api`] / [`YoutubeError::Http`] on request failure.
    /// - [`YoutubeError::Deserialize`] if the body has an unexpected shape.
    pub async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoItem>, YoutubeError> {
        let context = format!("videos(count={})", video_ids.len());
        if video_ids.is_empty() {
            return Err(YoutubeError::EmptyResult { context });
        }

        let joined = video_ids.join(",");
        let url = self.build_url("videos", &[("part", "snippet,statistics"), ("id", &joined)])?;
        let response: ListResponse<VideoItem> = self.get_json(url, &context).await?;

        let mut by_id: HashMap<String, VideoItem> = response
            .items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();

        let ordered: Vec<VideoItem> = video_ids
            .iter()
            .filter_map(|id| {
                let item = by_id.remove(id);
                if item.is_none() {
                    tracing::warn!(video_id = %id, "video missing from statistics response; skipping");
                }
                item
            })
            .collect();

        if ordered.is_empty() {
            return Err(YoutubeError::EmptyResult { context });
        }
        Ok(ordered)
    }

    /// Fetches the channel's `max_results` most recent uploads with their
    /// current statistics, newest first.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::uploads_playlist_id`],
    /// [`Self::recent_video_ids`] or [`Self::video_details`].
    pub async fn fetch_recent_videos(
        &self,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<VideoItem>, YoutubeError> {
        let playlist_id = self.uploads_playlist_id(channel_id).await?;
        tracing::debug!(%channel_id, %playlist_id, "resolved uploads playlist");

        let ids = self.recent_video_ids(&playlist_id, max_results).await?;
        tracing::debug!(count = ids.len(), "listed recent uploads");

        self.video_details(&ids).await
    }

    /// Builds the request URL for `endpoint` with percent-encoded query
    /// parameters. The API key is always appended last.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, YoutubeError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| YoutubeError::InvalidBaseUrl(format!("{}{endpoint}: {e}", self.base_url)))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request and deserializes a 2xx body into `T`.
    ///
    /// Non-2xx responses are decoded as the API's error envelope when
    /// possible. `reqwest` errors have their URL stripped since it carries
    /// the API key.
    async fn get_json<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T, YoutubeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());
            return Err(YoutubeError::Api {
                endpoint: context.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
