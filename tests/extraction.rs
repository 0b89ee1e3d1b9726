//! Extraction Integration Tests
//!
//! Exercises each extractor through the public API on realistic content.

use extracta::core::duration::{iso_duration_to_seconds, normalize_duration, NumericUnit};
use extracta::core::sanitize::sanitize;
use extracta::core::steps::DEFAULT_SECTION_MAX_CHARS;
use extracta::core::transcript::DEFAULT_MAX_CHARS;
use extracta::core::{extract_chapters, extract_steps, extract_transcript, extract_video, ChapterLinks};
use extracta::Platform;

#[test]
fn test_ordered_list_yields_one_step_per_item() {
    let items: Vec<String> = (1..=7).map(|i| format!("<li>Do thing number {}</li>", i)).collect();
    let content = format!("<p>Before you start.</p><ol>{}</ol>", items.concat());

    let steps = extract_steps(&content, DEFAULT_SECTION_MAX_CHARS);
    assert_eq!(steps.len(), 7);
    for (idx, step) in steps.iter().enumerate() {
        assert_eq!(step.position, idx as u32 + 1);
        assert_eq!(step.text, format!("Do thing number {}", idx + 1));
    }
}

#[test]
fn test_heading_sections_skip_stock_labels() {
    let content = r#"<h2>Introduction</h2><p>Hello.</p>
<h2>Choose a location</h2><p>Find a sunny spot.</p>
<h3>Dig the bed</h3><p>Go deep.</p>
<h2>Conclusioni</h2><p>Bye.</p>
<h2>FAQ</h2><p>Questions.</p>"#;

    let steps = extract_steps(content, DEFAULT_SECTION_MAX_CHARS);
    let names: Vec<_> = steps.iter().filter_map(|s| s.name.as_deref()).collect();
    assert_eq!(names, vec!["Choose a location", "Dig the bed"]);
    assert_eq!(steps[0].text, "Find a sunny spot.");
}

#[test]
fn test_heading_section_body_is_capped() {
    let body = "lorem ".repeat(200);
    let content = format!("<h2>Long section</h2><p>{}</p>", body);

    let steps = extract_steps(&content, 100);
    assert_eq!(steps.len(), 1);
    assert!(steps[0].text.chars().count() <= 100);
    assert!(steps[0].text.ends_with("..."));
}

#[test]
fn test_no_steps_in_plain_prose() {
    assert!(extract_steps("<p>Just some words.</p>", DEFAULT_SECTION_MAX_CHARS).is_empty());
    assert!(extract_steps("", DEFAULT_SECTION_MAX_CHARS).is_empty());
}

#[test]
fn test_duration_examples() {
    assert_eq!(normalize_duration(90u64, NumericUnit::Minutes), "PT1H30M");
    assert_eq!(normalize_duration(45u64, NumericUnit::Minutes), "PT45M");
    assert_eq!(normalize_duration("P1Y", NumericUnit::Minutes), "P1Y");
    assert_eq!(iso_duration_to_seconds("PT1H30M45S"), 5445);
    assert_eq!(iso_duration_to_seconds("90 minutes"), 0);
}

#[test]
fn test_sanitize_example() {
    let items = ["field_5f3a2b1c", "12345", "Phillips screwdriver", "a"];
    assert_eq!(sanitize(&items), vec!["Phillips screwdriver"]);
}

#[test]
fn test_sanitize_keeps_order_of_objects() {
    let items: Vec<serde_json::Value> = serde_json::from_str(
        r#"[{"name":"Hammer"},{"name":"<b>bold</b>"},{"name":"Saw"},"Tape measure","default"]"#,
    )
    .unwrap();

    let kept = sanitize(&items);
    assert_eq!(
        kept,
        vec![
            serde_json::json!({"name": "Hammer"}),
            serde_json::json!({"name": "Saw"}),
            serde_json::json!("Tape measure"),
        ]
    );
}

#[test]
fn test_video_detection_order() {
    let content = r#"<iframe src="https://player.vimeo.com/video/76979871"></iframe>
<p>Also see https://www.youtube.com/watch?v=dQw4w9WgXcQ</p>"#;
    let video = extract_video(content).unwrap();
    assert_eq!(video.platform, Platform::YouTube);
    assert_eq!(video.external_id.as_deref(), Some("dQw4w9WgXcQ"));

    let vimeo = extract_video(r#"<iframe src="https://player.vimeo.com/video/76979871"></iframe>"#)
        .unwrap();
    assert_eq!(vimeo.platform, Platform::Vimeo);
    assert_eq!(vimeo.external_id.as_deref(), Some("76979871"));

    assert!(extract_video("<p>No video here.</p>").is_none());
}

#[test]
fn test_chapters_example() {
    let chapters = extract_chapters("0:00 Intro\n1:30 Main Topic\n", ChapterLinks::default());
    assert_eq!(chapters.len(), 2);
    assert_eq!(
        (chapters[0].name.as_str(), chapters[0].start_offset_seconds, chapters[0].position),
        ("Intro", 0, 1)
    );
    assert_eq!(
        (chapters[1].name.as_str(), chapters[1].start_offset_seconds, chapters[1].position),
        ("Main Topic", 90, 2)
    );

    assert!(extract_chapters("3:15 Only one mark\n", ChapterLinks::default()).is_empty());
}

#[test]
fn test_chapter_links_for_youtube() {
    let content = r#"<iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ"></iframe>
<p>0:00 Intro<br>2:05 Setup<br>10:00 Results</p>"#;
    let video = extract_video(content);
    let chapters = extract_chapters(
        content,
        ChapterLinks {
            permalink: None,
            video: video.as_ref(),
        },
    );

    assert_eq!(chapters.len(), 3);
    assert_eq!(
        chapters[1].url.as_deref(),
        Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=125")
    );
}

#[test]
fn test_transcript_truncated_at_word_boundary() {
    let content = format!("<h2>Transcript</h2><p>{}</p>", "word ".repeat(2000));

    let transcript = extract_transcript(&content, DEFAULT_MAX_CHARS).unwrap();
    assert!(transcript.chars().count() <= DEFAULT_MAX_CHARS);
    assert!(transcript.ends_with("..."));
    assert!(transcript.trim_end_matches("...").ends_with("word"));
}

#[test]
fn test_transcript_from_dialogue_markers() {
    let content = "<p>[00:00:01] Alice: Hello everyone and welcome to the show today.</p>\
<p>[00:00:05] Bob: Thanks for having me here, it is great.</p>\
<p>[00:00:09] Alice: Let us get started with the first topic.</p>";

    let transcript = extract_transcript(content, DEFAULT_MAX_CHARS).unwrap();
    assert!(transcript.starts_with("Hello everyone"));
    assert!(transcript.contains("first topic"));
    assert!(!transcript.contains("[00:"));
    assert!(!transcript.contains("Alice:"));
}

#[test]
fn test_short_transcript_rejected() {
    assert!(extract_transcript("<h2>Transcript</h2><p>Too short.</p>", DEFAULT_MAX_CHARS).is_none());
}

#[test]
fn test_extractors_are_idempotent() {
    let content = r#"<iframe src="https://youtu.be/dQw4w9WgXcQ"></iframe>
<ol><li><strong>Mix</strong> the flour</li><li>Knead</li></ol>
<p>0:00 Intro<br>1:00 Dough</p>"#;

    assert_eq!(
        extract_steps(content, DEFAULT_SECTION_MAX_CHARS),
        extract_steps(content, DEFAULT_SECTION_MAX_CHARS)
    );
    assert_eq!(extract_video(content), extract_video(content));
    assert_eq!(
        extract_chapters(content, ChapterLinks::default()),
        extract_chapters(content, ChapterLinks::default())
    );
    assert_eq!(
        extract_transcript(content, DEFAULT_MAX_CHARS),
        extract_transcript(content, DEFAULT_MAX_CHARS)
    );
}
