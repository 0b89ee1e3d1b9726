//! Video embed detection.
//!
//! Platform matchers are tried in a fixed order: YouTube, then Vimeo, then
//! a generic embed pass whose URL is re-dispatched to the platform
//! matchers when it points at one of them. The first hit wins.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::markup;
use crate::domain::{EmbedMetadata, Platform, VideoReference};

const YT_ID: &str = r"([A-Za-z0-9_-]{11})";

static YOUTUBE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        format!(r"(?i)youtube\.com/watch\?(?:[^\s<>]*?&(?:amp;)?)?v={YT_ID}"),
        format!(r"(?i)youtube(?:-nocookie)?\.com/embed/{YT_ID}"),
        format!(r"(?i)youtu\.be/{YT_ID}"),
        format!(r"(?i)youtube\.com/(?:shorts|live|v)/{YT_ID}"),
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static VIMEO_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)player\.vimeo\.com/video/(\d+)",
        r"(?i)vimeo\.com/(?:channels/[\w-]+/|groups/[\w-]+/videos/|video/)?(\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static GENERIC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // block editor embed: <!-- wp:embed {"url":"..."} -->
        r#"(?is)<!--\s*wp:(?:core-)?embed\b[^>]*?"url"\s*:\s*"([^"]+)""#,
        r#"(?is)<iframe\b[^>]*?\ssrc\s*=\s*["']([^"']+)["']"#,
        r#"(?is)<video\b[^>]*?\ssrc\s*=\s*["']([^"']+)["']"#,
        r#"(?is)<video\b.*?<source\b[^>]*?\ssrc\s*=\s*["']([^"']+)["']"#,
        r"(?is)\[embed[^\]]*\]\s*(https?://[^\[\s]+)\s*\[/embed\]",
        r"(?i)\[(?:video|embed)[^\]]*?\b(?:src|mp4|url)\s*=\s*.?(https?://[^\s\]]+?)(?:&quot;|&#8221;|&#8243;|['\x22\]\s])",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static MEDIA_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(?:mp4|m4v|webm|ogv|ogg|mov)(?:[?#]|$)").unwrap());

/// Find the first video referenced in the content.
pub fn extract_video(content: &str) -> Option<VideoReference> {
    if content.trim().is_empty() {
        return None;
    }

    if let Some(video) = match_youtube(content).or_else(|| match_vimeo(content)) {
        return Some(video);
    }

    let url = first_capture(&GENERIC_PATTERNS, content)?;
    let url = markup::decode_entities(&url.replace("\\/", "/"));
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let lower = url.to_lowercase();
    if lower.contains("youtube") || lower.contains("youtu.be") {
        if let Some(video) = match_youtube(url) {
            return Some(video);
        }
    } else if lower.contains("vimeo.com") {
        if let Some(video) = match_vimeo(url) {
            return Some(video);
        }
    }

    Some(generic_reference(url))
}

/// Match against the YouTube patterns only.
pub fn match_youtube(text: &str) -> Option<VideoReference> {
    first_capture(&YOUTUBE_PATTERNS, text).map(|id| youtube_reference(&id))
}

/// Match against the Vimeo patterns only.
pub fn match_vimeo(text: &str) -> Option<VideoReference> {
    first_capture(&VIMEO_PATTERNS, text).map(|id| vimeo_reference(&id))
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

pub fn youtube_reference(id: &str) -> VideoReference {
    VideoReference {
        external_id: Some(id.to_string()),
        embed_url: Some(format!("https://www.youtube.com/embed/{}", id)),
        content_url: Some(youtube_watch_url(id)),
        thumbnail_url: Some(youtube_default_thumbnail(id)),
        ..VideoReference::new(Platform::YouTube)
    }
}

pub fn vimeo_reference(id: &str) -> VideoReference {
    VideoReference {
        external_id: Some(id.to_string()),
        embed_url: Some(format!("https://player.vimeo.com/video/{}", id)),
        content_url: Some(format!("https://vimeo.com/{}", id)),
        ..VideoReference::new(Platform::Vimeo)
    }
}

fn generic_reference(url: &str) -> VideoReference {
    let content_url = MEDIA_FILE_RE.is_match(url).then(|| url.to_string());
    VideoReference {
        embed_url: Some(url.to_string()),
        content_url,
        ..VideoReference::new(Platform::Generic)
    }
}

pub fn youtube_watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", id)
}

/// Platform default thumbnail (YouTube serves one for every video id)
pub fn youtube_default_thumbnail(id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", id)
}

/// Pick a thumbnail, in order: explicitly mapped value, the platform
/// default (YouTube only), fetched embed metadata, the document's
/// principal image.
pub fn resolve_thumbnail(
    explicit: Option<&str>,
    video: Option<&VideoReference>,
    metadata: Option<&EmbedMetadata>,
    principal_image: Option<&str>,
) -> Option<String> {
    let non_empty = |s: &&str| !s.trim().is_empty();

    if let Some(url) = explicit.filter(non_empty) {
        return Some(url.to_string());
    }

    let platform_default = video
        .filter(|v| v.platform == Platform::YouTube)
        .and_then(|v| v.external_id.as_deref())
        .map(youtube_default_thumbnail);
    if platform_default.is_some() {
        return platform_default;
    }

    metadata
        .and_then(|m| m.thumbnail_url.as_deref())
        .filter(non_empty)
        .or(principal_image.filter(non_empty))
        .map(str::to_string)
}
