//! oEmbed metadata provider.
//!
//! YouTube and Vimeo URLs go to the platforms' own endpoints; anything
//! else goes to a configurable fallback (a noembed-style aggregator), if
//! one is set.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{EmbedMetadataProvider, LookupError};
use crate::domain::EmbedMetadata;

const YOUTUBE_ENDPOINT: &str = "https://www.youtube.com/oembed";
const VIMEO_ENDPOINT: &str = "https://vimeo.com/api/oembed.json";

/// oEmbed client
pub struct OEmbedClient {
    /// Endpoint for URLs no platform endpoint handles
    fallback_endpoint: Option<String>,
    /// HTTP client
    client: reqwest::Client,
}

/// Subset of the oEmbed response we read. `duration` is a Vimeo extension.
#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    #[serde(default)]
    duration: Option<serde_json::Value>,
    #[serde(default)]
    thumbnail_url: Option<String>,
    #[serde(default)]
    author_name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl OEmbedClient {
    pub fn new(fallback_endpoint: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            fallback_endpoint: fallback_endpoint.filter(|e| !e.trim().is_empty()),
            client,
        }
    }

    /// Endpoint that serves oEmbed data for `url`
    fn endpoint_for(&self, url: &str) -> Option<&str> {
        let lower = url.to_lowercase();
        if lower.contains("youtube.com") || lower.contains("youtu.be") {
            Some(YOUTUBE_ENDPOINT)
        } else if lower.contains("vimeo.com") {
            Some(VIMEO_ENDPOINT)
        } else {
            self.fallback_endpoint.as_deref()
        }
    }

    async fn request(&self, url: &str) -> Result<EmbedMetadata, LookupError> {
        let endpoint = self
            .endpoint_for(url)
            .ok_or_else(|| LookupError::NoEndpoint(url.to_string()))?;

        let response = self
            .client
            .get(endpoint)
            .query(&[("url", url), ("format", "json")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body: OEmbedResponse = response.json().await?;
        into_metadata(body)
    }
}

fn into_metadata(body: OEmbedResponse) -> Result<EmbedMetadata, LookupError> {
    if let Some(error) = body.error {
        return Err(LookupError::Malformed(error));
    }

    // Providers disagree on whether duration is a number or a string
    let duration = match body.duration {
        Some(serde_json::Value::Number(n)) => n.as_f64().map(|d| d.max(0.0) as u64),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok().map(|d| d.max(0.0) as u64),
        _ => None,
    }
    .filter(|d| *d > 0);

    Ok(EmbedMetadata {
        duration,
        thumbnail_url: body.thumbnail_url.filter(|s| !s.trim().is_empty()),
        author_name: body.author_name.filter(|s| !s.trim().is_empty()),
    })
}

#[async_trait]
impl EmbedMetadataProvider for OEmbedClient {
    async fn fetch(&self, url: &str) -> Option<EmbedMetadata> {
        match self.request(url).await {
            Ok(metadata) => Some(metadata),
            Err(LookupError::NoEndpoint(_)) => None,
            Err(e) => {
                tracing::warn!(url, error = %e, "oEmbed lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(fallback: Option<&str>) -> OEmbedClient {
        OEmbedClient::new(fallback.map(str::to_string), Duration::from_secs(5))
    }

    #[test]
    fn test_endpoint_selection() {
        let c = client(Some("https://noembed.com/embed"));
        assert_eq!(c.endpoint_for("https://youtu.be/abcdefghijk"), Some(YOUTUBE_ENDPOINT));
        assert_eq!(c.endpoint_for("https://vimeo.com/1"), Some(VIMEO_ENDPOINT));
        assert_eq!(
            c.endpoint_for("https://cdn.test/clip.mp4"),
            Some("https://noembed.com/embed")
        );
        assert_eq!(client(None).endpoint_for("https://cdn.test/clip.mp4"), None);
        assert_eq!(client(Some("")).endpoint_for("https://cdn.test/clip.mp4"), None);
    }

    #[tokio::test]
    async fn test_no_endpoint_is_no_data() {
        assert!(client(None).fetch("https://cdn.test/clip.mp4").await.is_none());
    }

    #[test]
    fn test_vimeo_payload() {
        let body: OEmbedResponse = serde_json::from_str(
            r#"{"type":"video","duration":213,"thumbnail_url":"https://i.vimeocdn.com/x.jpg","author_name":"Studio"}"#,
        )
        .unwrap();
        let meta = into_metadata(body).unwrap();
        assert_eq!(meta.duration, Some(213));
        assert_eq!(meta.thumbnail_url.as_deref(), Some("https://i.vimeocdn.com/x.jpg"));
        assert_eq!(meta.author_name.as_deref(), Some("Studio"));
    }

    #[test]
    fn test_youtube_payload_has_no_duration() {
        let body: OEmbedResponse =
            serde_json::from_str(r#"{"title":"x","thumbnail_url":"https://i.ytimg.com/a.jpg"}"#)
                .unwrap();
        let meta = into_metadata(body).unwrap();
        assert_eq!(meta.duration, None);
        assert!(meta.thumbnail_url.is_some());
    }

    #[test]
    fn test_error_payload() {
        let body: OEmbedResponse =
            serde_json::from_str(r#"{"error":"no matching providers found"}"#).unwrap();
        assert!(into_metadata(body).is_err());
    }
}
