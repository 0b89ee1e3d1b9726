//! Extraction and classification logic.
//!
//! This module contains:
//! - Markup: Shared HTML scanning helpers
//! - Duration: ISO-8601 normalization
//! - Sanitize: Candidate label filtering
//! - Video, Chapters, Transcript, Steps: The extractors
//! - Classify: Signals and labels
//! - Engine: The consolidated service over all of the above

pub mod chapters;
pub mod classify;
pub mod duration;
pub mod engine;
pub mod hooks;
pub mod markup;
pub mod sanitize;
pub mod steps;
pub mod transcript;
pub mod video;

// Re-export commonly used types
pub use chapters::{extract_chapters, ChapterLinks};
pub use classify::{classify_interactivity, classify_resource_type, compute_signals};
pub use duration::{
    iso_duration_to_seconds, normalize_duration, seconds_to_iso, DurationValue, NumericUnit,
};
pub use engine::{AnalyzeOptions, ContentAnalysis, EngineSettings, ExtractionEngine};
pub use hooks::{Hook, PostProcessors};
pub use sanitize::{is_valid_label, sanitize, ItemLabel};
pub use steps::extract_steps;
pub use transcript::extract_transcript;
pub use video::{extract_video, resolve_thumbnail};
