//! Collaborators for the two lookups that leave the process.
//!
//! Both traits are infallible at their boundary: a missing provider, a
//! transport failure or an unexpected payload all come back as "no data".
//! Implementations keep their own typed errors internally and log them.

pub mod oembed;
pub mod youtube;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::EmbedMetadata;

pub use oembed::OEmbedClient;
pub use youtube::YouTubeDataApi;

/// Authoritative video duration lookup
#[async_trait]
pub trait DurationProvider: Send + Sync {
    /// Whether the provider is configured (credentials present). Must not
    /// touch the network.
    fn is_available(&self) -> bool;

    /// Duration in seconds, 0 when unknown
    async fn video_duration(&self, external_id: &str) -> u64;
}

/// oEmbed-style metadata lookup
#[async_trait]
pub trait EmbedMetadataProvider: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<EmbedMetadata>;
}

/// Provider that is never available
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDurationProvider;

#[async_trait]
impl DurationProvider for NoDurationProvider {
    fn is_available(&self) -> bool {
        false
    }

    async fn video_duration(&self, _external_id: &str) -> u64 {
        0
    }
}

/// Provider that never has metadata
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEmbedMetadata;

#[async_trait]
impl EmbedMetadataProvider for NoEmbedMetadata {
    async fn fetch(&self, _url: &str) -> Option<EmbedMetadata> {
        None
    }
}

/// Failures inside a lookup. Never crosses a provider boundary.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("No embed endpoint for {0}")]
    NoEndpoint(String),
}
