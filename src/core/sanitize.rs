//! Filtering of auto-populated tool/supply/skill lists.
//!
//! Field auto-population tends to drag in ids, placeholder keys, markup
//! and whole sentences. An item survives only if it reads like a label.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static ID_PAIR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+:\d+$").unwrap());
static FIELD_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^field_[0-9a-f]+$").unwrap());
static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").unwrap());

const MIN_CHARS: usize = 2;
const MAX_CHARS: usize = 200;
const MAX_PERIODS: usize = 2;
const MAX_COMMAS: usize = 3;

/// Something a list item can be judged by.
pub trait ItemLabel {
    /// The text to judge, or `None` when the item carries no label at all
    fn label(&self) -> Option<&str>;
}

impl ItemLabel for String {
    fn label(&self) -> Option<&str> {
        Some(self)
    }
}

impl ItemLabel for &str {
    fn label(&self) -> Option<&str> {
        Some(self)
    }
}

/// Strings are judged as-is; objects by their `name` (or `text`) field.
impl ItemLabel for Value {
    fn label(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Object(map) => map
                .get("name")
                .or_else(|| map.get("text"))
                .and_then(Value::as_str),
            _ => None,
        }
    }
}

/// Whether a single label looks like a real item name.
pub fn is_valid_label(label: &str) -> bool {
    let item = label.trim();
    if item.is_empty() {
        return false;
    }

    if NUMERIC_RE.is_match(item) || ID_PAIR_RE.is_match(item) || FIELD_KEY_RE.is_match(item) {
        return false;
    }

    if item.eq_ignore_ascii_case("default") || HTML_TAG_RE.is_match(item) {
        return false;
    }

    let chars = item.chars().count();
    if !(MIN_CHARS..=MAX_CHARS).contains(&chars) {
        return false;
    }

    // Prose, not a label
    item.matches('.').count() <= MAX_PERIODS && item.matches(',').count() <= MAX_COMMAS
}

/// Keep the items that look like labels, preserving order.
pub fn sanitize<T: ItemLabel + Clone>(items: &[T]) -> Vec<T> {
    let kept: Vec<T> = items
        .iter()
        .filter(|item| item.label().is_some_and(is_valid_label))
        .cloned()
        .collect();

    if kept.len() != items.len() {
        tracing::debug!(
            dropped = items.len() - kept.len(),
            kept = kept.len(),
            "sanitized item list"
        );
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_ids_and_placeholders() {
        let items = ["field_5f3a2b1c", "12345", "Phillips screwdriver", "a"];
        assert_eq!(sanitize(&items), vec!["Phillips screwdriver"]);
    }

    #[test]
    fn test_rejection_rules() {
        assert!(!is_valid_label("   "));
        assert!(!is_valid_label("12:34"));
        assert!(!is_valid_label("Default"));
        assert!(!is_valid_label("<b>Hammer</b>"));
        assert!(!is_valid_label(&"x".repeat(201)));
        assert!(!is_valid_label("One. Two. Three. Four"));
        assert!(!is_valid_label("a, b, c, d, e"));
        assert!(is_valid_label("Wood glue, clamps"));
        assert!(is_valid_label("  Sandpaper (120 grit) "));
    }

    #[test]
    fn test_preserves_order() {
        let items = vec![
            "Saw".to_string(),
            "0".to_string(),
            "Drill".to_string(),
            "Tape measure".to_string(),
        ];
        assert_eq!(sanitize(&items), vec!["Saw", "Drill", "Tape measure"]);
    }

    #[test]
    fn test_objects_judged_by_name() {
        let items = vec![
            json!({"@type": "HowToTool", "name": "Level"}),
            json!({"@type": "HowToTool", "name": "field_abc123"}),
            json!({"@type": "HowToTool"}),
            json!("Pencil"),
            json!(42),
        ];
        let kept = sanitize(&items);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0]["name"], "Level");
        assert_eq!(kept[1], json!("Pencil"));
    }
}
