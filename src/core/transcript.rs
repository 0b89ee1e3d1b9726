//! Transcript recovery.
//!
//! Three detectors run in order and the first to yield more than
//! [`MIN_TRANSCRIPT_CHARS`] of cleaned text wins:
//! 1. a transcript heading, up to the next heading of the same level
//! 2. a run of `[HH:MM:SS]` dialogue markers (at least three)
//! 3. a container whose class mentions a transcript

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::markup;

/// Default upper bound on transcript length, in characters
pub const DEFAULT_MAX_CHARS: usize = 5000;

/// Cleaned text at or below this length is rejected
pub const MIN_TRANSCRIPT_CHARS: usize = 50;

const MIN_DIALOGUE_MARKERS: usize = 3;

static HEADING_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h([1-6])(?:\s[^>]*)?>(.*?)</h[1-6]\s*>").unwrap());

static TRANSCRIPT_KEYWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)transcri|trascrizione|full text|testo completo").unwrap());

static DIALOGUE_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(?:\d{1,2}:)?\d{1,2}:\d{2}\]\s*(?:[A-Z][\w.'-]*(?:\s[A-Z][\w.'-]*){0,2}\s*:\s*)?")
        .unwrap()
});

static DIALOGUE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</(?:p|li|div|section)\s*>|\n\s*\n").unwrap());

static CLASS_MARKED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<(div|section|article|aside|pre|blockquote)\b[^>]*\bclass\s*=\s*["'][^"']*(?:transcri|trascri)[^"']*["'][^>]*>"#,
    )
    .unwrap()
});

// A capitalized name right after a timestamp is a speaker label.
static TIMESTAMP_ARTIFACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[\[(]?\b(?:\d{1,2}:)?\d{1,2}:\d{2}\b[\])]?(?:[ \t]*[A-Z][\w.'-]*(?: [A-Z][\w.'-]*){0,2}[ \t]*:[ \t])?",
    )
    .unwrap()
});

static LINE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|h[1-6])\s*>").unwrap());

static SPEAKER_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:[A-Z][A-Z0-9.'-]+(?: [A-Z][A-Z0-9.'-]+){0,2}|(?i:speaker|relatore)\s*\d+)\s*:\s+",
    )
    .unwrap()
});

/// Extract a transcript bounded to `max_chars` characters.
pub fn extract_transcript(content: &str, max_chars: usize) -> Option<String> {
    if content.trim().is_empty() {
        return None;
    }

    let strategies: [(&str, fn(&str) -> Option<String>); 3] = [
        ("heading", from_heading),
        ("dialogue", from_dialogue),
        ("class", from_marked_block),
    ];

    strategies.iter().find_map(|(name, strategy)| {
        let cleaned = clean_transcript(&strategy(content)?);
        if cleaned.chars().count() <= MIN_TRANSCRIPT_CHARS {
            return None;
        }
        tracing::debug!(strategy = *name, chars = cleaned.len(), "transcript found");
        Some(markup::truncate_at_word(&cleaned, max_chars))
    })
}

fn from_heading(content: &str) -> Option<String> {
    let caps = HEADING_OPEN_RE.captures_iter(content).find(|caps| {
        caps.get(2)
            .map(|m| TRANSCRIPT_KEYWORD_RE.is_match(&markup::clean_text(m.as_str())))
            .unwrap_or(false)
    })?;

    let level = caps.get(1)?.as_str();
    let body_start = caps.get(0)?.end();

    let lower = content[body_start..].to_ascii_lowercase();
    let next = format!("<h{}", level);
    let body_end = lower
        .find(&next)
        .map(|i| body_start + i)
        .unwrap_or(content.len());

    Some(content[body_start..body_end].to_string())
}

fn from_dialogue(content: &str) -> Option<String> {
    let markers: Vec<_> = DIALOGUE_MARKER_RE.find_iter(content).collect();
    if markers.len() < MIN_DIALOGUE_MARKERS {
        return None;
    }

    let lines: Vec<String> = markers
        .iter()
        .enumerate()
        .map(|(idx, marker)| {
            let limit = markers
                .get(idx + 1)
                .map(|next| next.start())
                .unwrap_or(content.len());
            let segment = &content[marker.end()..limit];
            let segment = DIALOGUE_END_RE
                .find(segment)
                .map(|end| &segment[..end.start()])
                .unwrap_or(segment);
            markup::clean_text(segment)
        })
        .filter(|line| !line.is_empty())
        .collect();

    Some(lines.join("\n"))
}

fn from_marked_block(content: &str) -> Option<String> {
    let caps = CLASS_MARKED_RE.captures(content)?;
    let tag = caps.get(1)?.as_str();
    let open_end = caps.get(0)?.end();
    Some(markup::element_inner(content, tag, open_end).to_string())
}

/// Strip markup, then timestamp and speaker artifacts, then whitespace.
fn clean_transcript(raw: &str) -> String {
    let lined = LINE_END_RE.replace_all(raw, "\n$0");
    let text = markup::decode_entities(&markup::strip_tags(&lined));
    let text = TIMESTAMP_ARTIFACT_RE.replace_all(&text, " ");
    let text: String = text
        .lines()
        .map(|line| SPEAKER_LABEL_RE.replace(line, "").into_owned())
        .collect::<Vec<_>>()
        .join("\n");
    markup::collapse_whitespace(&text)
}
