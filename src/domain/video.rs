//! Embedded video references.

use serde::{Deserialize, Serialize};

/// Hosting platform of an embedded video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    YouTube,
    Vimeo,
    /// Any other iframe/embed/`<video>` source
    Generic,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::YouTube => write!(f, "youtube"),
            Platform::Vimeo => write!(f, "vimeo"),
            Platform::Generic => write!(f, "generic"),
        }
    }
}

/// A video found in content, with the URLs derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoReference {
    pub platform: Platform,

    /// Platform video id (YouTube/Vimeo only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Known duration, filled in by a lookup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
}

impl VideoReference {
    /// Reference with no derived URLs yet
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            external_id: None,
            embed_url: None,
            content_url: None,
            thumbnail_url: None,
            duration_seconds: None,
        }
    }

    /// Duration in seconds, 0 when unknown
    pub fn duration_or_zero(&self) -> u64 {
        self.duration_seconds.unwrap_or(0)
    }

    /// The best URL to hand to a metadata lookup
    pub fn lookup_url(&self) -> Option<&str> {
        self.content_url.as_deref().or(self.embed_url.as_deref())
    }
}

/// Metadata returned by an oEmbed-style lookup. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}
