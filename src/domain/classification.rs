//! Content signals and the labels derived from them.

use serde::{Deserialize, Serialize};

/// Structural signals computed once per document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSignals {
    pub has_quiz: bool,
    pub has_tutorial_structure: bool,
    pub has_interactive_elements: bool,
    pub word_count: usize,
    pub heading_count: usize,
    pub list_count: usize,
    pub code_block_count: usize,
}

/// Pedagogical shape of a piece of content. `Lesson` is the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Quiz,
    Video,
    Exercise,
    Tutorial,
    Lecture,
    Reading,
    Lesson,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Quiz => "Quiz",
            ResourceType::Video => "Video",
            ResourceType::Exercise => "Exercise",
            ResourceType::Tutorial => "Tutorial",
            ResourceType::Lecture => "Lecture",
            ResourceType::Reading => "Reading",
            ResourceType::Lesson => "Lesson",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the learner engages with the content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractivityType {
    Active,
    Expositive,
    Mixed,
}

impl InteractivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractivityType::Active => "active",
            InteractivityType::Expositive => "expositive",
            InteractivityType::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for InteractivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
