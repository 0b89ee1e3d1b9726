//! Step extraction.
//!
//! Four strategies run in order; the first non-empty result is returned:
//! 1. ordered list blocks in block-editor markup
//! 2. plain `<ol>/<li>` lists
//! 3. numbered headings ("Step 2", "Passo 3", "4.", "#5")
//! 4. any h2-h4 section that is not a stock label like "Introduction"

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::markup::{self, Heading};
use crate::domain::Step;

/// Default cap on section body text for the heading-section strategy
pub const DEFAULT_SECTION_MAX_CHARS: usize = 500;

const MIN_HEADING_CHARS: usize = 3;

static BLOCK_MARKUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<!--\s*wp:").unwrap());

static ORDERED_BLOCK_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<!--\s*wp:list\s+\{[^}]*"ordered"\s*:\s*true[^}]*\}\s*-->"#).unwrap()
});

static BLOCK_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<!--\s*/wp:list\s*-->").unwrap());

static EMPHASIS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(?:strong|b|em)\b[^>]*>(.*?)</(?:strong|b|em)\s*>").unwrap());

static NUMBERED_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?:step|passo|fase)\s*(\d+)|#\s*(\d+)|(\d+)\s*[.)])\s*[:.)\-–—]?\s*(.*)$",
    )
    .unwrap()
});

/// Section labels that never count as steps (English and Italian)
const GENERIC_SECTIONS: &[&str] = &[
    "introduction",
    "introduzione",
    "intro",
    "overview",
    "panoramica",
    "conclusion",
    "conclusions",
    "conclusione",
    "conclusioni",
    "prerequisites",
    "prerequisiti",
    "requirements",
    "requisiti",
    "materials",
    "materiali",
    "what you need",
    "cosa serve",
    "occorrente",
    "tools",
    "strumenti",
    "attrezzi",
    "tips",
    "suggerimenti",
    "consigli",
    "notes",
    "note",
    "warnings",
    "warning",
    "avvertenze",
    "attenzione",
    "faq",
    "domande frequenti",
    "related",
    "correlati",
    "articoli correlati",
    "see also",
    "vedi anche",
];

/// Extract steps using the first strategy that yields any.
pub fn extract_steps(content: &str, section_max_chars: usize) -> Vec<Step> {
    if content.trim().is_empty() {
        return Vec::new();
    }

    let strategies: [(&str, &dyn Fn(&str) -> Vec<Step>); 4] = [
        ("list_blocks", &from_list_blocks),
        ("ordered_list", &from_ordered_lists),
        ("numbered_headings", &from_numbered_headings),
        ("heading_sections", &|c: &str| from_heading_sections(c, section_max_chars)),
    ];

    for (name, strategy) in strategies {
        let steps = strategy(content);
        if !steps.is_empty() {
            tracing::debug!(strategy = name, count = steps.len(), "extracted steps");
            return steps;
        }
    }

    Vec::new()
}

/// Strategy 1: `<!-- wp:list {"ordered":true} -->` blocks, text only.
fn from_list_blocks(content: &str) -> Vec<Step> {
    if !BLOCK_MARKUP_RE.is_match(content) {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut consumed = 0;
    for opener in ORDERED_BLOCK_OPEN_RE.find_iter(content) {
        // ordered blocks nested in a list already taken
        if opener.start() < consumed {
            continue;
        }
        let body = &content[opener.end()..];
        let Some(list) = markup::next_element(body, "ol", 0) else {
            continue;
        };
        if BLOCK_CLOSE_RE
            .find(body)
            .is_some_and(|close| close.start() < list.start)
        {
            continue;
        }
        consumed = opener.end() + list.end;
        items.extend(list_items(list.inner));
    }

    let texts = items
        .into_iter()
        .map(markup::clean_text)
        .filter(|text| !text.is_empty());

    number(texts.map(|text| Step::new(0, text)))
}

/// Strategy 2: `<ol>` items, with an emphasized lead-in as the name and
/// the first image as the step image. Nested lists stay inside the item
/// that holds them.
fn from_ordered_lists(content: &str) -> Vec<Step> {
    let steps = markup::top_level_elements(content, "ol")
        .into_iter()
        .flat_map(list_items)
        .filter_map(list_item_step);

    number(steps)
}

fn list_item_step(item: &str) -> Option<Step> {
    let image = markup::first_image_src(item);

    let (name, text) = match EMPHASIS_RE.captures(item) {
        Some(caps) => {
            let name = caps
                .get(1)
                .map(|m| markup::clean_text(m.as_str()))
                .filter(|n| !n.is_empty());
            let span = caps.get(0)?;
            let rest = format!("{}{}", &item[..span.start()], &item[span.end()..]);
            let rest = markup::clean_text(&rest);
            let rest = rest
                .trim_start_matches([':', '-', '–', '—', '.'])
                .trim()
                .to_string();
            (name, rest)
        }
        None => (None, markup::clean_text(item)),
    };

    match (name, text) {
        (Some(name), text) if text.is_empty() => Some(Step::new(0, name).with_image(image)),
        (None, text) if text.is_empty() => None,
        (name, text) => Some(Step::new(0, text).with_name(name).with_image(image)),
    }
}

/// Strategy 3: headings numbered "Step N", "Passo N", "Fase N", "N." or
/// "#N"; the section up to the next heading is the body.
fn from_numbered_headings(content: &str) -> Vec<Step> {
    let headings = markup::headings(content);

    let steps = headings.iter().enumerate().filter_map(|(idx, heading)| {
        let caps = NUMBERED_HEADING_RE.captures(&heading.text)?;
        let name = caps
            .get(4)
            .map(|m| m.as_str().trim().to_string())
            .filter(|n| !n.is_empty());

        let section = markup::section_after(content, &headings, idx);
        let body = markup::clean_text(section);
        let text = if body.is_empty() {
            heading.text.clone()
        } else {
            body
        };

        Some(
            Step::new(0, text)
                .with_name(name)
                .with_image(markup::first_image_src(section)),
        )
    });

    number(steps)
}

/// Strategy 4: every h2-h4 that is not a stock section label.
fn from_heading_sections(content: &str, max_chars: usize) -> Vec<Step> {
    let headings = markup::headings(content);

    let steps = headings
        .iter()
        .enumerate()
        .filter(|(_, h)| (2..=4).contains(&h.level))
        .filter(|(_, h)| is_step_heading(h))
        .map(|(idx, heading)| {
            let section = markup::section_after(content, &headings, idx);
            let body = markup::clean_text(section);
            let text = if body.is_empty() {
                heading.text.clone()
            } else {
                markup::truncate_at_word(&body, max_chars)
            };

            Step::new(0, text)
                .with_name(Some(heading.text.clone()))
                .with_image(markup::first_image_src(section))
        });

    number(steps)
}

fn is_step_heading(heading: &Heading) -> bool {
    let text = heading.text.trim();
    if text.chars().count() < MIN_HEADING_CHARS {
        return false;
    }
    !is_generic_section(text)
}

/// Whether a heading is a stock label ("Introduction", "Tips:", "FAQ",
/// "Related articles", ...).
pub fn is_generic_section(heading: &str) -> bool {
    let normalized = heading
        .trim()
        .trim_end_matches([':', '.', '!', '?'])
        .trim()
        .to_lowercase();

    GENERIC_SECTIONS.iter().any(|label| {
        normalized == *label
            || normalized
                .strip_prefix(label)
                .is_some_and(|rest| rest.starts_with(|c: char| !c.is_alphanumeric()))
    })
}

fn list_items(list: &str) -> Vec<&str> {
    markup::top_level_elements(list, "li")
}

/// Assign contiguous 1-based positions.
fn number(steps: impl Iterator<Item = Step>) -> Vec<Step> {
    steps
        .enumerate()
        .map(|(idx, mut step)| {
            step.position = idx as u32 + 1;
            step
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(content: &str) -> Vec<Step> {
        extract_steps(content, DEFAULT_SECTION_MAX_CHARS)
    }

    #[test]
    fn test_list_blocks() {
        let content = r#"<!-- wp:paragraph --><p>Intro</p><!-- /wp:paragraph -->
<!-- wp:list {"ordered":true} -->
<ol><!-- wp:list-item --><li>Cut the board</li><!-- /wp:list-item -->
<!-- wp:list-item --><li><strong>Sand</strong> the edges</li><!-- /wp:list-item --></ol>
<!-- /wp:list -->"#;
        let steps = extract(content);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], Step::new(1, "Cut the board"));
        // block strategy keeps text only
        assert_eq!(steps[1].text, "Sand the edges");
        assert!(steps[1].name.is_none());
    }

    #[test]
    fn test_nested_ordered_list_keeps_outer_items() {
        let content =
            "<ol><li>First<ol><li>sub a</li><li>sub b</li></ol></li><li>Second</li><li>Third</li></ol>";
        let steps = extract(content);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].text, "First sub a sub b");
        assert_eq!(steps[1].text, "Second");
        assert_eq!(steps[2].text, "Third");
        assert_eq!(
            steps.iter().map(|s| s.position).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_nested_list_blocks() {
        let content = r#"<!-- wp:list {"ordered":true} -->
<ol><!-- wp:list-item --><li>Outer one<!-- wp:list {"ordered":true} -->
<ol><!-- wp:list-item --><li>inner</li><!-- /wp:list-item --></ol>
<!-- /wp:list --></li><!-- /wp:list-item -->
<!-- wp:list-item --><li>Outer two</li><!-- /wp:list-item --></ol>
<!-- /wp:list -->"#;
        let steps = extract(content);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].text, "Outer one inner");
        assert_eq!(steps[1], Step::new(2, "Outer two"));
    }

    #[test]
    fn test_unordered_block_falls_through() {
        let content = r#"<!-- wp:list --><ul><li>Not a step</li></ul><!-- /wp:list -->
<ol><li>Real step</li></ol>"#;
        let steps = extract(content);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].text, "Real step");
    }

    #[test]
    fn test_ordered_list_with_name_and_image() {
        let content = r#"<ol>
<li><strong>Prepare:</strong> Gather everything. <img src="https://x.test/1.jpg"></li>
<li>Mix the ingredients</li>
<li><b>Bake</b></li>
</ol>"#;
        let steps = extract(content);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].name.as_deref(), Some("Prepare:"));
        assert_eq!(steps[0].text, "Gather everything.");
        assert_eq!(steps[0].image.as_deref(), Some("https://x.test/1.jpg"));
        assert_eq!(steps[1].name, None);
        assert_eq!(steps[1].text, "Mix the ingredients");
        assert_eq!(steps[2].text, "Bake");
        assert_eq!(
            steps.iter().map(|s| s.position).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_numbered_headings() {
        let content = r#"<h2>Introduction</h2><p>Welcome.</p>
<h2>Step 1: Unbox</h2><p>Open the box.</p><img src="https://x.test/a.png">
<h2>Passo 2 - Montaggio</h2><p>Monta i pezzi.</p>
<h3>3. Test</h3>
<h2>#4 Enjoy</h2><p>Done.</p>"#;
        let steps = extract(content);
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].name.as_deref(), Some("Unbox"));
        assert_eq!(steps[0].text, "Open the box.");
        assert_eq!(steps[0].image.as_deref(), Some("https://x.test/a.png"));
        assert_eq!(steps[1].name.as_deref(), Some("Montaggio"));
        assert_eq!(steps[2].name.as_deref(), Some("Test"));
        assert_eq!(steps[2].text, "3. Test");
        assert_eq!(steps[3].name.as_deref(), Some("Enjoy"));
        assert_eq!(steps[3].position, 4);
    }

    #[test]
    fn test_heading_sections_skip_generic_labels() {
        let content = r#"<h2>Introduction</h2><p>Hello.</p>
<h2>Choose a location</h2><p>Pick a sunny spot.</p>
<h3>Dig</h3><p>Make a hole.</p>
<h3>Plant the seeds</h3>
<h2>Tips:</h2><p>Water often.</p>
<h2>Related articles</h2><p>Links</p>"#;
        let steps = extract(content);
        let names: Vec<_> = steps.iter().filter_map(|s| s.name.as_deref()).collect();
        assert_eq!(names, vec!["Choose a location", "Dig", "Plant the seeds"]);
        assert_eq!(steps[0].text, "Pick a sunny spot.");
        // no body: falls back to the heading text
        assert_eq!(steps[2].text, "Plant the seeds");
    }

    #[test]
    fn test_section_text_is_capped() {
        let body = "word ".repeat(300);
        let content = format!("<h2>Long section</h2><p>{}</p>", body);
        let steps = extract(&content);
        assert_eq!(steps.len(), 1);
        assert!(steps[0].text.chars().count() <= DEFAULT_SECTION_MAX_CHARS);
        assert!(steps[0].text.ends_with("..."));
    }

    #[test]
    fn test_generic_section_matching() {
        assert!(is_generic_section("FAQ"));
        assert!(is_generic_section("Domande frequenti"));
        assert!(is_generic_section("Notes & warnings"));
        assert!(!is_generic_section("Notebook setup"));
        assert!(!is_generic_section("Install the tools"));
    }

    #[test]
    fn test_empty_content() {
        assert!(extract("").is_empty());
        assert!(extract("<p>plain paragraph</p>").is_empty());
    }
}
