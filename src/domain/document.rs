//! The content document every extractor reads from.

use std::sync::OnceLock;

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::core::{classify, markup};

static HEADING_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<h[1-6][\s>]").unwrap());
static LIST_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<(?:ul|ol)[\s>]").unwrap());
static ORDERED_LIST_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<ol[\s>]").unwrap());
static PRE_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<pre[\s>]").unwrap());
static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*```").unwrap());

/// Immutable wrapper around a raw markup string.
///
/// Derived facts are computed on first use and cached for the lifetime
/// of the instance.
#[derive(Debug, Default)]
pub struct ContentDocument {
    raw: String,
    text: OnceLock<String>,
    word_count: OnceLock<usize>,
    heading_count: OnceLock<usize>,
    list_count: OnceLock<usize>,
    ordered_list_count: OnceLock<usize>,
    code_block_count: OnceLock<usize>,
}

impl ContentDocument {
    /// Wrap raw content
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            ..Default::default()
        }
    }

    /// The raw markup
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Visible text with markup stripped and whitespace collapsed
    pub fn text(&self) -> &str {
        self.text.get_or_init(|| markup::clean_text(&self.raw))
    }

    pub fn word_count(&self) -> usize {
        *self
            .word_count
            .get_or_init(|| self.text().split_whitespace().count())
    }

    pub fn heading_count(&self) -> usize {
        *self
            .heading_count
            .get_or_init(|| HEADING_OPEN_RE.find_iter(&self.raw).count())
    }

    /// Ordered plus unordered lists
    pub fn list_count(&self) -> usize {
        *self
            .list_count
            .get_or_init(|| LIST_OPEN_RE.find_iter(&self.raw).count())
    }

    pub fn ordered_list_count(&self) -> usize {
        *self
            .ordered_list_count
            .get_or_init(|| ORDERED_LIST_OPEN_RE.find_iter(&self.raw).count())
    }

    /// `<pre>` blocks plus fenced (```) blocks
    pub fn code_block_count(&self) -> usize {
        *self.code_block_count.get_or_init(|| {
            let pre = PRE_OPEN_RE.find_iter(&self.raw).count();
            let fences = FENCE_RE.find_iter(&self.raw).count() / 2;
            pre + fences
        })
    }

    /// Estimated reading time in seconds at `words_per_minute`
    pub fn reading_seconds(&self, words_per_minute: u32) -> u64 {
        classify::reading_seconds(self.word_count(), words_per_minute)
    }

    /// Content fingerprint (SHA256(raw)[0:16]), usable as a cache key
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.raw.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..8])
    }
}

impl From<&str> for ContentDocument {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ContentDocument {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}
