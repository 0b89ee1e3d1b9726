//! Chapter extraction from timestamp-prefixed lines.
//!
//! A chapter list needs at least two distinct timestamps; a lone match is
//! treated as incidental. Positions follow the order lines appear in the
//! content, not offset order.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::{markup, video};
use crate::domain::{Chapter, Platform, VideoReference};

static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\r?\n|<br\s*/?>|</?(?:li|p|div|h[1-6]|tr|td)\b[^>]*>").unwrap()
});

static CHAPTER_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[-*•·]\s*)?[\[(]?((?:\d{1,2}:)?\d{1,2}:\d{2})[\])]?\s*(?:[-–—:|.)]\s*)?(.+)$",
    )
    .unwrap()
});

static LEADING_TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\[(]?(?:\d{1,2}:)?\d{1,2}:\d{2}\b").unwrap());

const MIN_TITLE_CHARS: usize = 3;
const MIN_CHAPTERS: usize = 2;

/// Where chapter deep links should point.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChapterLinks<'a> {
    /// Page permalink; takes precedence over the video URL
    pub permalink: Option<&'a str>,
    pub video: Option<&'a VideoReference>,
}

/// Extract chapters from `content`. Returns an empty list unless at least
/// two valid timestamp lines with distinct offsets are found.
pub fn extract_chapters(content: &str, links: ChapterLinks<'_>) -> Vec<Chapter> {
    let candidates: Vec<(u64, String)> = LINE_BREAK_RE
        .split(content)
        .filter_map(parse_line)
        .collect();

    let distinct: HashSet<u64> = candidates.iter().map(|(offset, _)| *offset).collect();
    if candidates.len() < MIN_CHAPTERS || distinct.len() < MIN_CHAPTERS {
        return Vec::new();
    }

    let video_end = links
        .video
        .and_then(|v| v.duration_seconds)
        .filter(|d| *d > 0);

    let chapters: Vec<Chapter> = candidates
        .iter()
        .enumerate()
        .map(|(idx, (start, name))| {
            let end = match candidates.get(idx + 1) {
                Some((next, _)) => Some(*next),
                None => video_end,
            }
            .filter(|end| end >= start);

            Chapter {
                position: idx as u32 + 1,
                name: name.clone(),
                start_offset_seconds: *start,
                end_offset_seconds: end,
                url: chapter_url(links, *start),
            }
        })
        .collect();

    tracing::debug!(count = chapters.len(), "extracted chapters");
    chapters
}

fn parse_line(segment: &str) -> Option<(u64, String)> {
    let line = markup::clean_text(segment);
    let caps = CHAPTER_LINE_RE.captures(&line)?;

    let offset = markup::timestamp_to_seconds(caps.get(1)?.as_str())?;
    let title = caps.get(2)?.as_str().trim();

    if title.chars().count() < MIN_TITLE_CHARS || LEADING_TIMESTAMP_RE.is_match(title) {
        return None;
    }

    Some((offset, title.to_string()))
}

fn chapter_url(links: ChapterLinks<'_>, offset: u64) -> Option<String> {
    if let Some(permalink) = links.permalink.filter(|p| !p.trim().is_empty()) {
        let base = permalink.split('#').next().unwrap_or(permalink);
        return Some(format!("{}#t={}", base, offset));
    }

    let video = links.video?;
    match (video.platform, video.external_id.as_deref()) {
        (Platform::YouTube, Some(id)) => {
            Some(format!("{}&t={}", video::youtube_watch_url(id), offset))
        }
        _ => None,
    }
}
