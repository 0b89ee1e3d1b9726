//! Classification Integration Tests
//!
//! Signals from real-looking documents and the label priority rules.

use extracta::core::classify::{classify_interactivity, classify_resource_type, compute_signals};
use extracta::core::extract_video;
use extracta::{ClassificationSignals, ContentDocument, InteractivityType, ResourceType};

fn paragraph(words: usize) -> String {
    format!("<p>{}</p>", "lorem ".repeat(words))
}

#[test]
fn test_quiz_always_wins() {
    let mut video = extract_video("https://youtu.be/dQw4w9WgXcQ").unwrap();
    video.duration_seconds = Some(7200);

    for has_tutorial_structure in [false, true] {
        for has_interactive_elements in [false, true] {
            for word_count in [0, 400, 4000] {
                let signals = ClassificationSignals {
                    has_quiz: true,
                    has_tutorial_structure,
                    has_interactive_elements,
                    word_count,
                    heading_count: 5,
                    list_count: 2,
                    code_block_count: 4,
                };
                assert_eq!(classify_resource_type(None, &signals), ResourceType::Quiz);
                assert_eq!(
                    classify_resource_type(Some(&video), &signals),
                    ResourceType::Quiz
                );
            }
        }
    }
}

#[test]
fn test_long_article_is_reading() {
    let content = format!(
        "<h2>Background</h2>{}<h2>Analysis</h2>{}",
        paragraph(300),
        paragraph(300)
    );
    let doc = ContentDocument::new(content);
    let signals = compute_signals(&doc);

    assert_eq!(signals.heading_count, 2);
    assert!(signals.word_count > 500);
    assert_eq!(classify_resource_type(None, &signals), ResourceType::Reading);
    assert_eq!(classify_interactivity(None, &signals), InteractivityType::Expositive);
}

#[test]
fn test_short_video_post_is_video() {
    let content = r#"<iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ"></iframe><p>Watch this.</p>"#;
    let doc = ContentDocument::new(content);
    let mut video = extract_video(doc.raw()).unwrap();
    video.duration_seconds = Some(900);

    let signals = compute_signals(&doc);
    assert_eq!(
        classify_resource_type(Some(&video), &signals),
        ResourceType::Video
    );
    assert_eq!(
        classify_interactivity(Some(&video), &signals),
        InteractivityType::Expositive
    );
}

#[test]
fn test_coding_exercise() {
    let content = r#"<p>Complete the function.</p>
<pre><code>fn add(a: i32, b: i32) -> i32 { todo!() }</code></pre>
<pre><code>assert_eq!(add(1, 2), 3);</code></pre>
<form><input type="text" name="answer"><button>Check</button></form>"#;
    let doc = ContentDocument::new(content);
    let signals = compute_signals(&doc);

    assert!(signals.has_interactive_elements);
    assert_eq!(signals.code_block_count, 2);
    assert_eq!(classify_resource_type(None, &signals), ResourceType::Exercise);
    assert_eq!(classify_interactivity(None, &signals), InteractivityType::Active);
}

#[test]
fn test_numbered_tutorial() {
    let content = "<h1>How to repot a plant</h1>\
<h2>Step 1: Water</h2><p>Water the plant the day before.</p>\
<h2>Step 2: Remove</h2><p>Slide it out of the pot.</p>\
<h2>Step 3: Replant</h2><p>Set it in fresh soil.</p>";
    let doc = ContentDocument::new(content);
    let signals = compute_signals(&doc);

    assert!(signals.has_tutorial_structure);
    assert_eq!(classify_resource_type(None, &signals), ResourceType::Tutorial);
}

#[test]
fn test_short_note_is_lesson() {
    let doc = ContentDocument::new("<p>A short note.</p>");
    let signals = compute_signals(&doc);
    assert_eq!(classify_resource_type(None, &signals), ResourceType::Lesson);
}
