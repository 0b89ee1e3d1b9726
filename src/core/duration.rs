//! Duration normalization to ISO-8601 and back.
//!
//! Accepted inputs:
//! - already-ISO strings (`PT1H`, `p1y`): passed through, uppercased
//! - bare numbers: interpreted per call site via [`NumericUnit`]
//! - clock strings: `HH:MM:SS` or `MM:SS`
//! - free text: `2 hours 15 minutes`, `20-30 minuti` (ranges average)
//!
//! Anything else degrades to `P` + the raw value instead of failing.

use once_cell::sync::Lazy;
use regex::Regex;

/// How a bare number should be read at a given call site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericUnit {
    Seconds,
    #[default]
    Minutes,
    Hours,
}

/// Input to [`normalize_duration`]
#[derive(Debug, Clone, PartialEq)]
pub enum DurationValue {
    Number(f64),
    Text(String),
}

impl From<u64> for DurationValue {
    fn from(v: u64) -> Self {
        DurationValue::Number(v as f64)
    }
}

impl From<u32> for DurationValue {
    fn from(v: u32) -> Self {
        DurationValue::Number(f64::from(v))
    }
}

impl From<i32> for DurationValue {
    fn from(v: i32) -> Self {
        DurationValue::Number(f64::from(v))
    }
}

impl From<f64> for DurationValue {
    fn from(v: f64) -> Self {
        DurationValue::Number(v)
    }
}

impl From<&str> for DurationValue {
    fn from(v: &str) -> Self {
        DurationValue::Text(v.to_string())
    }
}

impl From<String> for DurationValue {
    fn from(v: String) -> Self {
        DurationValue::Text(v)
    }
}

const NUM: &str = r"(\d+(?:[.,]\d+)?)";
// Longest spellings first: alternation is leftmost-first.
const UNIT: &str = r"(giorni|giorno|days|day|d|hours|hour|hrs|hr|ore|ora|h|minutes|minute|minuti|minuto|mins|min|m|seconds|second|secondi|secondo|secs|sec|s)";

static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(\d{1,3}):)?(\d{1,2}):(\d{2})$").unwrap());

static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i){NUM}\s*(?:-|–|—|to|a|~)\s*{NUM}\s*{UNIT}"
    ))
    .unwrap()
});

static COMPONENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i){NUM}\s*{UNIT}")).unwrap());

static ISO_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^P(?:\d|T\d)").unwrap());

static ISO_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)([HMS])").unwrap());

/// Normalize a duration-like value to an ISO-8601 duration string.
pub fn normalize_duration(value: impl Into<DurationValue>, unit: NumericUnit) -> String {
    match value.into() {
        DurationValue::Number(n) => number_to_iso(n, unit),
        DurationValue::Text(text) => text_to_iso(&text, unit),
    }
}

fn text_to_iso(raw: &str, unit: NumericUnit) -> String {
    let text = raw.trim();

    if ISO_PREFIX_RE.is_match(text) {
        return text.to_uppercase();
    }

    if let Some(n) = parse_number(text) {
        return number_to_iso(n, unit);
    }

    if let Some(caps) = CLOCK_RE.captures(text) {
        let field = |i: usize| {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .unwrap_or(0)
        };
        return seconds_to_iso(field(1) * 3600 + field(2) * 60 + field(3));
    }

    if let Some(seconds) = free_text_seconds(text) {
        return seconds_to_iso(seconds);
    }

    tracing::debug!(value = text, "unparseable duration, using degenerate form");
    format!("P{}", text)
}

/// Sum every `<number> <unit>` component; a leading range is averaged.
fn free_text_seconds(text: &str) -> Option<u64> {
    let range = RANGE_RE
        .captures_iter(text)
        .find(|caps| caps.get(3).is_some_and(|u| unit_ends_word(text, u.end())));
    if let Some(caps) = range {
        let low = parse_number(caps.get(1)?.as_str())?;
        let high = parse_number(caps.get(2)?.as_str())?;
        let per_unit = unit_seconds(caps.get(3)?.as_str())?;
        let mean = (low + high) / 2.0;
        return Some((mean * per_unit as f64).round() as u64);
    }

    let mut total = 0f64;
    let mut matched = false;
    for caps in COMPONENT_RE.captures_iter(text) {
        let (Some(n), Some(u)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if !unit_ends_word(text, u.end()) {
            continue;
        }
        if let (Some(n), Some(per_unit)) = (parse_number(n.as_str()), unit_seconds(u.as_str())) {
            total += n * per_unit as f64;
            matched = true;
        }
    }

    matched.then(|| total.round() as u64)
}

/// A unit must not be the prefix of a longer word ("s" in "settimane",
/// "m" in "mese"). A following digit is fine: "1h30m".
fn unit_ends_word(text: &str, unit_end: usize) -> bool {
    !text[unit_end..].starts_with(char::is_alphabetic)
}

fn unit_seconds(unit: &str) -> Option<u64> {
    match unit.to_lowercase().as_str() {
        "giorni" | "giorno" | "days" | "day" | "d" => Some(86_400),
        "hours" | "hour" | "hrs" | "hr" | "ore" | "ora" | "h" => Some(3600),
        "minutes" | "minute" | "minuti" | "minuto" | "mins" | "min" | "m" => Some(60),
        "seconds" | "second" | "secondi" | "secondo" | "secs" | "sec" | "s" => Some(1),
        _ => None,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let n = text.trim().replace(',', ".").parse::<f64>().ok()?;
    (n.is_finite() && n >= 0.0).then_some(n)
}

fn number_to_iso(n: f64, unit: NumericUnit) -> String {
    if !n.is_finite() || n < 0.0 {
        return format!("P{}", n);
    }

    match unit {
        NumericUnit::Seconds => seconds_to_iso(n.round() as u64),
        NumericUnit::Minutes => {
            let minutes = n.round() as u64;
            hours_minutes_iso(minutes / 60, minutes % 60)
        }
        NumericUnit::Hours => {
            let whole = n.trunc() as u64;
            let minutes = ((n - n.trunc()) * 60.0).round() as u64;
            hours_minutes_iso(whole + minutes / 60, minutes % 60)
        }
    }
}

fn hours_minutes_iso(hours: u64, minutes: u64) -> String {
    match (hours, minutes) {
        (0, m) => format!("PT{}M", m),
        (h, 0) => format!("PT{}H", h),
        (h, m) => format!("PT{}H{}M", h, m),
    }
}

/// Seconds to `PT#H#M#S`, omitting zero components (`PT0S` for zero).
pub fn seconds_to_iso(total: u64) -> String {
    if total == 0 {
        return "PT0S".to_string();
    }

    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    let mut out = String::from("PT");
    if h > 0 {
        out.push_str(&format!("{}H", h));
    }
    if m > 0 {
        out.push_str(&format!("{}M", m));
    }
    if s > 0 {
        out.push_str(&format!("{}S", s));
    }
    out
}

/// Total seconds in the time part of an ISO duration. Input that does not
/// start with `P` yields 0; date components are ignored.
pub fn iso_duration_to_seconds(iso: &str) -> u64 {
    let iso = iso.trim();
    if !iso.starts_with(['P', 'p']) {
        return 0;
    }

    let Some(t) = iso.find(['T', 't']) else {
        return 0;
    };

    let total: f64 = ISO_TIME_RE
        .captures_iter(&iso[t + 1..])
        .filter_map(|caps| {
            let n = caps.get(1)?.as_str().parse::<f64>().ok()?;
            let factor = match caps.get(2)?.as_str() {
                "H" | "h" => 3600.0,
                "M" | "m" => 60.0,
                _ => 1.0,
            };
            Some(n * factor)
        })
        .sum();

    total as u64
}

/// Reading time plus video time as one ISO duration.
pub fn total_duration_iso(reading_seconds: u64, video_seconds: u64) -> String {
    seconds_to_iso(reading_seconds + video_seconds)
}
