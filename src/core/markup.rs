//! Markup helpers shared by the extractors.
//!
//! Content arrives as loosely structured HTML (often with block-editor
//! comments mixed in). None of these helpers parse a DOM: they work on
//! byte offsets and regex matches, which is enough for the heuristics
//! built on top of them and never fails on malformed input.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").unwrap());

static BLOCK_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)<br\s*/?>|</?(?:p|div|li|ol|ul|h[1-6]|table|tr|td|th|section|article|blockquote|pre)\b[^>]*>",
    )
    .unwrap()
});

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h([1-6])(?:\s[^>]*)?>(.*?)</h[1-6]\s*>").unwrap());

static IMG_SRC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<img\b[^>]*?\ssrc\s*=\s*["']([^"']+)["']"#).unwrap());

/// A heading element located in the raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level (1-6)
    pub level: u8,
    /// Cleaned heading text
    pub text: String,
    /// Byte offset of the opening tag
    pub start: usize,
    /// Byte offset just past the closing tag
    pub end: usize,
}

/// Remove all tags and comments, turning block boundaries into spaces.
pub fn strip_tags(html: &str) -> String {
    let spaced = BLOCK_BREAK_RE.replace_all(html, " ");
    TAG_RE.replace_all(&spaced, "").into_owned()
}

/// Decode named (HTML5 table) and numeric character references.
/// Non-breaking spaces come back as plain spaces.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    html_escape::decode_html_entities(text).replace('\u{a0}', " ")
}

/// Collapse runs of whitespace to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Markup fragment to display text: strip, decode, collapse.
pub fn clean_text(html: &str) -> String {
    collapse_whitespace(&decode_entities(&strip_tags(html)))
}

/// Cut `text` to at most `max_chars` characters including the trailing
/// `...`, breaking at the last whitespace before the limit when possible.
/// Bounds too small to hold the ellipsis get a plain character cut.
pub fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    const ELLIPSIS: &str = "...";
    if max_chars <= ELLIPSIS.len() {
        return text.chars().take(max_chars).collect();
    }
    let budget = max_chars.saturating_sub(ELLIPSIS.len());
    let cut = text
        .char_indices()
        .nth(budget)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let head = &text[..cut];

    let head = match head.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => &head[..idx],
        _ => head,
    };

    format!("{}{}", head.trim_end(), ELLIPSIS)
}

/// All headings in document order.
pub fn headings(html: &str) -> Vec<Heading> {
    HEADING_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let level = caps.get(1)?.as_str().parse::<u8>().ok()?;
            Some(Heading {
                level,
                text: clean_text(caps.get(2).map(|m| m.as_str()).unwrap_or_default()),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// The raw markup between the end of `headings[idx]` and the next heading
/// (or end of content).
pub fn section_after<'a>(html: &'a str, headings: &[Heading], idx: usize) -> &'a str {
    let start = headings[idx].end;
    let end = headings
        .get(idx + 1)
        .map(|next| next.start)
        .unwrap_or(html.len());
    &html[start..end.max(start)]
}

/// `src` of the first `<img>` in the fragment.
pub fn first_image_src(html: &str) -> Option<String> {
    IMG_SRC_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| decode_entities(m.as_str().trim()))
        .filter(|src| !src.is_empty())
}

/// Inner markup of the element whose opening tag ends at `open_end`,
/// balancing nested tags with the same name. Unclosed elements run to
/// the end of the content.
pub fn element_inner<'a>(html: &'a str, tag: &str, open_end: usize) -> &'a str {
    let lower = html.to_ascii_lowercase();
    let open = format!("<{}", tag.to_ascii_lowercase());
    let close = format!("</{}", tag.to_ascii_lowercase());

    let mut depth = 1usize;
    let mut cursor = open_end;

    while cursor < lower.len() {
        let next_open = find_tag(&lower, &open, cursor);
        let next_close = lower[cursor..].find(&close).map(|i| i + cursor);

        match (next_open, next_close) {
            (Some(o), Some(c)) if o < c => {
                depth += 1;
                cursor = o + open.len();
            }
            (_, Some(c)) => {
                depth -= 1;
                if depth == 0 {
                    return &html[open_end..c];
                }
                cursor = c + close.len();
            }
            (_, None) => break,
        }
    }

    &html[open_end..]
}

/// A balanced element found by [`next_element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<'a> {
    /// Markup between the opening and closing tags
    pub inner: &'a str,
    /// Byte offset of the opening tag
    pub start: usize,
    /// Byte offset just past the closing tag (or end of content)
    pub end: usize,
}

/// First `tag` element opening at or after `from`, nesting balanced.
pub fn next_element<'a>(html: &'a str, tag: &str, from: usize) -> Option<Element<'a>> {
    let lower = html.to_ascii_lowercase();
    let open = format!("<{}", tag.to_ascii_lowercase());

    let start = find_tag(&lower, &open, from)?;
    let open_end = start + lower[start..].find('>')? + 1;
    let inner = element_inner(html, tag, open_end);
    let inner_end = open_end + inner.len();
    let end = lower[inner_end..]
        .find('>')
        .map(|i| inner_end + i + 1)
        .unwrap_or(html.len());

    Some(Element { inner, start, end })
}

/// Inner markup of every `tag` element not nested in another one.
pub fn top_level_elements<'a>(html: &'a str, tag: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut cursor = 0;
    while let Some(element) = next_element(html, tag, cursor) {
        found.push(element.inner);
        cursor = element.end;
    }
    found
}

/// Position of `<tag` followed by whitespace, `>` or `/` (so `<div` does
/// not match `<divider`).
fn find_tag(lower: &str, open: &str, from: usize) -> Option<usize> {
    let mut cursor = from;
    while let Some(rel) = lower[cursor..].find(open) {
        let at = cursor + rel;
        let after = lower[at + open.len()..].chars().next();
        match after {
            Some(c) if c.is_whitespace() || c == '>' || c == '/' => return Some(at),
            None => return None,
            _ => cursor = at + open.len(),
        }
    }
    None
}

/// Parse `[HH:]MM:SS` (or `M:SS`) into seconds. Every field after the
/// leading one must be below 60.
pub fn timestamp_to_seconds(stamp: &str) -> Option<u64> {
    let parts: Vec<&str> = stamp.trim().split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }
    if !parts
        .iter()
        .all(|p| !p.is_empty() && p.len() <= 2 && p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let values = parts
        .iter()
        .map(|p| p.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;
    if values[1..].iter().any(|v| *v >= 60) {
        return None;
    }

    Some(values.iter().fold(0, |acc, v| acc * 60 + v))
}
