//! extracta - Content extraction and classification engine
//!
//! Derives structured facts from loosely structured rich-text content:
//! ordered instructional steps, embedded video identity and duration,
//! timestamped chapters, transcripts, normalized durations and
//! content-category labels.
//!
//! # Architecture
//!
//! Every extractor is a pure function over a content string. The only
//! I/O is two best-effort lookups (video duration, embed metadata) that
//! sit behind traits and degrade to "no data" on any failure.
//!
//! # Modules
//!
//! - `adapters`: Lookup providers (YouTube Data API, oEmbed)
//! - `core`: Extractors, classifier and the `ExtractionEngine`
//! - `domain`: Data structures (ContentDocument, Step, VideoReference, ...)
//! - `config`: YAML configuration with env overrides
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Everything at once
//! extracta analyze --input post.html
//!
//! # One extractor
//! cat post.html | extracta chapters --permalink https://example.com/post
//!
//! # Duration helpers
//! extracta duration "20-30 minuti"
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{DurationProvider, EmbedMetadataProvider, OEmbedClient, YouTubeDataApi};
pub use crate::core::{
    AnalyzeOptions, ContentAnalysis, EngineSettings, ExtractionEngine, PostProcessors,
};
pub use domain::{
    Chapter, ClassificationSignals, ContentDocument, EmbedMetadata, InteractivityType, Platform,
    ResourceType, Step, VideoReference,
};
