//! Content signals and label classification.
//!
//! Signals are computed once per document and feed both classifiers.
//! The resource-type rules are evaluated in strict priority order.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::markup;
use crate::domain::{
    ClassificationSignals, ContentDocument, InteractivityType, ResourceType, VideoReference,
};

/// Reading speed used to weigh text against video time
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

const TUTORIAL_THRESHOLD: u32 = 3;
const VIDEO_DOMINANCE: f64 = 0.8;

static QUIZ_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\[(?:quiz|wp_quiz|ld_quiz|qsm|mlw_quizmaster|watupro|hdquiz|h5p|quiz-cat|ays_quiz|chained-quiz|wp_quiz_pro)[\s\]]",
        r"(?i)<!--\s*wp:(?:learndash/ld-quiz|h5p/|qsm/|quiz|ays-quiz|tutor/quiz)",
        r#"(?i)<(?:form|div|section)\b[^>]*\bclass\s*=\s*["'][^"']*\bquiz"#,
        r"(?i)<input\b[^>]*\btype\s*=\s*.?radio\b[^>]*\bname\s*=\s*.?(?:question|answer|quiz)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static INTERACTIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)<form[\s>]",
        r"(?i)<button[\s>]",
        r"(?i)<input[\s>]",
        r"(?i)<(?:details|summary)[\s>]",
        r#"(?i)class\s*=\s*["'][^"']*\b(?:accordion|toggle|tabs?|collapsible)\b"#,
        r"(?i)<!--\s*wp:(?:buttons|button|details|file|search|[\w-]+/(?:accordion|tabs|toggle|form|contact-form))\b",
        r"(?i)\[(?:contact-form-7|contact-form|wpforms|gravityform|ninja_form|formidable|accordion|toggle|tabs|download|sdm_download|wpdm_package)[\s\]]",
        r#"(?i)<a\b[^>]*\sdownload(?:[\s>=])"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static STEP_NUMBERING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:step|passo|fase)\s*\d+").unwrap());

static TUTORIAL_KEYWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:how to|how-to|tutorial|come fare|guida passo)\b").unwrap());

static HEADING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:step|passo|fase)\s*|#\s*)?(\d+)\s*[.):\-–—]?(?:\s|$)").unwrap()
});

/// Compute structural signals for a document.
pub fn compute_signals(doc: &ContentDocument) -> ClassificationSignals {
    let raw = doc.raw();

    let has_quiz = QUIZ_PATTERNS.iter().any(|re| re.is_match(raw));
    let has_interactive_elements = INTERACTIVE_PATTERNS.iter().any(|re| re.is_match(raw));
    let score = tutorial_score(doc);

    ClassificationSignals {
        has_quiz,
        has_tutorial_structure: score >= TUTORIAL_THRESHOLD,
        has_interactive_elements,
        word_count: doc.word_count(),
        heading_count: doc.heading_count(),
        list_count: doc.list_count(),
        code_block_count: doc.code_block_count(),
    }
}

/// Weighted evidence that the content walks through a procedure.
pub fn tutorial_score(doc: &ContentDocument) -> u32 {
    let raw = doc.raw();
    let text = doc.text();
    let mut score = 0;

    if STEP_NUMBERING_RE.find_iter(text).count() >= 2 {
        score += 2;
    }
    if TUTORIAL_KEYWORD_RE.is_match(text) {
        score += 1;
    }
    if doc.ordered_list_count() >= 2 {
        score += 1;
    }
    if doc.code_block_count() >= 3 {
        score += 1;
    }
    if longest_numbered_heading_run(raw) >= 3 {
        score += 2;
    }

    score
}

/// Length of the longest run of headings numbered n, n+1, n+2, ...
fn longest_numbered_heading_run(raw: &str) -> usize {
    let numbers: Vec<Option<u64>> = markup::headings(raw)
        .iter()
        .map(|h| {
            HEADING_NUMBER_RE
                .captures(&h.text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
        .collect();

    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<u64> = None;

    for number in numbers {
        match (previous, number) {
            (Some(prev), Some(n)) if n == prev + 1 => run += 1,
            (_, Some(_)) => run = 1,
            (_, None) => run = 0,
        }
        previous = number;
        best = best.max(run);
    }

    best
}

/// Resource type by strict priority; the first matching rule wins.
pub fn classify_resource_type(
    video: Option<&VideoReference>,
    signals: &ClassificationSignals,
) -> ResourceType {
    classify_resource_type_at(video, signals, DEFAULT_WORDS_PER_MINUTE)
}

/// [`classify_resource_type`] with an explicit reading speed.
pub fn classify_resource_type_at(
    video: Option<&VideoReference>,
    signals: &ClassificationSignals,
    words_per_minute: u32,
) -> ResourceType {
    if signals.has_quiz {
        return ResourceType::Quiz;
    }

    if let Some(video) = video {
        let video_seconds = video.duration_or_zero() as f64;
        let reading_seconds = reading_seconds(signals.word_count, words_per_minute) as f64;
        let total = video_seconds + reading_seconds;
        if total > 0.0 && video_seconds > VIDEO_DOMINANCE * total {
            return ResourceType::Video;
        }
    }

    if signals.has_interactive_elements && signals.code_block_count >= 2 {
        return ResourceType::Exercise;
    }

    if signals.has_tutorial_structure {
        return ResourceType::Tutorial;
    }

    if video.is_some() && signals.word_count > 300 {
        return ResourceType::Lecture;
    }

    if video.is_none() && signals.word_count > 500 && signals.heading_count >= 2 {
        return ResourceType::Reading;
    }

    ResourceType::Lesson
}

/// Active when the learner does something, expositive when they read or
/// watch, mixed when both apply.
pub fn classify_interactivity(
    video: Option<&VideoReference>,
    signals: &ClassificationSignals,
) -> InteractivityType {
    let active =
        signals.has_quiz || signals.has_interactive_elements || signals.code_block_count >= 2;
    let expositive = video.is_some() || signals.word_count > 200;

    match (active, expositive) {
        (true, true) => InteractivityType::Mixed,
        (true, false) => InteractivityType::Active,
        _ => InteractivityType::Expositive,
    }
}

/// Seconds needed to read `word_count` words
pub fn reading_seconds(word_count: usize, words_per_minute: u32) -> u64 {
    if words_per_minute == 0 {
        return 0;
    }
    (word_count as u64 * 60).div_ceil(u64::from(words_per_minute))
}
