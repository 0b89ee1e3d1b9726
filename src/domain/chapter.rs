//! Timestamped video chapters.

use serde::{Deserialize, Serialize};

/// A named segment of a video, parsed from a timestamp line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// 1-based position in the order the timestamps appear
    pub position: u32,

    /// Chapter title (at least 3 characters)
    pub name: String,

    pub start_offset_seconds: u64,

    /// Start of the following chapter, or the video end for the last one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_offset_seconds: Option<u64>,

    /// Deep link to the chapter start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
