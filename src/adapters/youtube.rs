//! YouTube Data API v3 duration provider.
//!
//! Reads `contentDetails.duration` (an ISO-8601 duration) for a video id.
//! Without an API key the provider reports itself unavailable and never
//! issues a request.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{DurationProvider, LookupError};
use crate::core::duration::iso_duration_to_seconds;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube Data API client
pub struct YouTubeDataApi {
    /// API key; empty means unavailable
    api_key: String,
    /// Base URL (overridable for tests)
    base_url: String,
    /// HTTP client
    client: reqwest::Client,
}

/// Response from the videos endpoint
#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

impl YouTubeDataApi {
    /// Create a new client with a per-request timeout
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            api_key: api_key.into(),
            base_url: API_BASE.to_string(),
            client,
        }
    }

    /// Create from an optional key, e.g. straight from configuration
    pub fn from_key(api_key: Option<String>, timeout: Duration) -> Self {
        Self::new(api_key.unwrap_or_default(), timeout)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build API URL
    fn api_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), method)
    }

    async fn request_duration(&self, external_id: &str) -> Result<u64, LookupError> {
        let url = self.api_url("videos");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "contentDetails"),
                ("id", external_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        let body: VideoListResponse = response.json().await?;
        parse_duration(body)
    }
}

fn parse_duration(body: VideoListResponse) -> Result<u64, LookupError> {
    let iso = body
        .items
        .into_iter()
        .next()
        .and_then(|item| item.content_details)
        .and_then(|details| details.duration)
        .ok_or_else(|| LookupError::Malformed("missing contentDetails.duration".to_string()))?;

    Ok(iso_duration_to_seconds(&iso))
}

#[async_trait]
impl DurationProvider for YouTubeDataApi {
    fn is_available(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn video_duration(&self, external_id: &str) -> u64 {
        if !self.is_available() {
            return 0;
        }

        match self.request_duration(external_id).await {
            Ok(seconds) => seconds,
            Err(e) => {
                tracing::warn!(video_id = external_id, error = %e, "YouTube duration lookup failed");
                0
            }
        }
    }
}
