//! Domain types for the extraction engine.
//!
//! This module contains the core data structures:
//! - ContentDocument: Immutable content with cached derived counts
//! - Step, Chapter, VideoReference: Extracted values
//! - ClassificationSignals and labels

pub mod chapter;
pub mod classification;
pub mod document;
pub mod step;
pub mod video;

// Re-export commonly used types
pub use chapter::Chapter;
pub use classification::{ClassificationSignals, InteractivityType, ResourceType};
pub use document::ContentDocument;
pub use step::Step;
pub use video::{EmbedMetadata, Platform, VideoReference};
