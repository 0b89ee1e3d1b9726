//! Consolidated extraction engine.
//!
//! One stateless service over every extractor. Collaborators (the two
//! lookup providers), settings and post-processing hooks are injected at
//! construction; nothing is read from global state.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::adapters::{
    DurationProvider, EmbedMetadataProvider, NoDurationProvider, NoEmbedMetadata,
};
use crate::domain::{
    Chapter, ClassificationSignals, ContentDocument, EmbedMetadata, InteractivityType, Platform,
    ResourceType, Step, VideoReference,
};

use super::chapters::{extract_chapters, ChapterLinks};
use super::classify::{
    classify_interactivity, classify_resource_type_at, compute_signals, DEFAULT_WORDS_PER_MINUTE,
};
use super::duration::{seconds_to_iso, total_duration_iso};
use super::hooks::{apply, PostProcessors};
use super::markup;
use super::steps::{extract_steps, DEFAULT_SECTION_MAX_CHARS};
use super::transcript::{extract_transcript, DEFAULT_MAX_CHARS};
use super::video::{extract_video, resolve_thumbnail};

/// Tunables for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Upper bound on transcript length, in characters
    pub transcript_max_chars: usize,
    /// Upper bound on a heading-section step body, in characters
    pub section_max_chars: usize,
    /// Reading speed used for reading-time estimates
    pub words_per_minute: u32,
    /// Per-call timeout for each remote lookup
    pub lookup_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            transcript_max_chars: DEFAULT_MAX_CHARS,
            section_max_chars: DEFAULT_SECTION_MAX_CHARS,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            lookup_timeout: Duration::from_secs(5),
        }
    }
}

/// Per-call inputs for [`ExtractionEngine::analyze`]
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Page permalink for chapter deep links
    pub permalink: Option<String>,
    /// Run the remote duration/metadata lookups
    pub resolve_remote: bool,
    /// Thumbnail supplied by the caller; wins over everything else
    pub explicit_thumbnail: Option<String>,
    /// Principal image; defaults to the first `<img>` in the content
    pub principal_image: Option<String>,
}

/// Everything the engine derives from one document
#[derive(Debug, Clone, Serialize)]
pub struct ContentAnalysis {
    /// Content fingerprint (cache key)
    pub fingerprint: String,
    pub steps: Vec<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoReference>,
    pub chapters: Vec<Chapter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub signals: ClassificationSignals,
    pub resource_type: ResourceType,
    pub interactivity: InteractivityType,
    pub reading_seconds: u64,
    /// Reading time as an ISO duration
    pub time_required: String,
    /// Reading time plus video time as an ISO duration
    pub total_duration: String,
}

/// The extraction and classification service
pub struct ExtractionEngine {
    duration_provider: Arc<dyn DurationProvider>,
    metadata_provider: Arc<dyn EmbedMetadataProvider>,
    settings: EngineSettings,
    hooks: PostProcessors,
}

impl Default for ExtractionEngine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl std::fmt::Debug for ExtractionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionEngine")
            .field("duration_available", &self.duration_provider.is_available())
            .field("settings", &self.settings)
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl ExtractionEngine {
    /// Engine with no remote lookups
    pub fn new(settings: EngineSettings) -> Self {
        Self::with_providers(
            settings,
            Arc::new(NoDurationProvider),
            Arc::new(NoEmbedMetadata),
        )
    }

    pub fn with_providers(
        settings: EngineSettings,
        duration_provider: Arc<dyn DurationProvider>,
        metadata_provider: Arc<dyn EmbedMetadataProvider>,
    ) -> Self {
        Self {
            duration_provider,
            metadata_provider,
            settings,
            hooks: PostProcessors::default(),
        }
    }

    /// Replace the post-processing hooks
    pub fn with_hooks(mut self, hooks: PostProcessors) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn steps(&self, doc: &ContentDocument) -> Vec<Step> {
        let steps = extract_steps(doc.raw(), self.settings.section_max_chars);
        apply(&self.hooks.steps, steps, doc)
    }

    pub fn video(&self, doc: &ContentDocument) -> Option<VideoReference> {
        apply(&self.hooks.video, extract_video(doc.raw()), doc)
    }

    pub fn chapters(
        &self,
        doc: &ContentDocument,
        video: Option<&VideoReference>,
        permalink: Option<&str>,
    ) -> Vec<Chapter> {
        let chapters = extract_chapters(doc.raw(), ChapterLinks { permalink, video });
        apply(&self.hooks.chapters, chapters, doc)
    }

    pub fn transcript(&self, doc: &ContentDocument) -> Option<String> {
        let transcript = extract_transcript(doc.raw(), self.settings.transcript_max_chars);
        apply(&self.hooks.transcript, transcript, doc)
    }

    pub fn signals(&self, doc: &ContentDocument) -> ClassificationSignals {
        compute_signals(doc)
    }

    pub fn resource_type(
        &self,
        doc: &ContentDocument,
        video: Option<&VideoReference>,
        signals: &ClassificationSignals,
    ) -> ResourceType {
        let label = classify_resource_type_at(video, signals, self.settings.words_per_minute);
        apply(&self.hooks.resource_type, label, doc)
    }

    pub fn interactivity(
        &self,
        doc: &ContentDocument,
        video: Option<&VideoReference>,
        signals: &ClassificationSignals,
    ) -> InteractivityType {
        apply(&self.hooks.interactivity, classify_interactivity(video, signals), doc)
    }

    /// Video duration in seconds, 0 when unknown.
    ///
    /// A duration already on the reference is returned as is. Otherwise the
    /// authoritative provider is asked (YouTube only, and only when it is
    /// available), then the embed metadata provider.
    #[instrument(skip(self, video), fields(platform = %video.platform))]
    pub async fn resolve_duration(&self, video: &VideoReference) -> u64 {
        if let Some(known) = video.duration_seconds.filter(|d| *d > 0) {
            return known;
        }

        if let Some(seconds) = self.authoritative_duration(video).await {
            return seconds;
        }

        self.fetch_metadata(video)
            .await
            .and_then(|m| m.duration)
            .unwrap_or(0)
    }

    /// Duration, thumbnail and author for a video, combining both
    /// providers. Values already on the reference take precedence.
    #[instrument(skip(self, video), fields(platform = %video.platform))]
    pub async fn resolve_metadata(&self, video: &VideoReference) -> EmbedMetadata {
        let mut metadata = EmbedMetadata {
            duration: video.duration_seconds.filter(|d| *d > 0),
            thumbnail_url: video.thumbnail_url.clone(),
            author_name: None,
        };

        if metadata.duration.is_none() {
            metadata.duration = self.authoritative_duration(video).await;
        }

        if let Some(fetched) = self.fetch_metadata(video).await {
            metadata.duration = metadata.duration.or(fetched.duration);
            metadata.thumbnail_url = metadata.thumbnail_url.or(fetched.thumbnail_url);
            metadata.author_name = fetched.author_name;
        }

        metadata
    }

    /// Copy of `video` with missing duration and thumbnail filled in
    pub async fn enrich_video(&self, video: &VideoReference) -> VideoReference {
        let metadata = self.resolve_metadata(video).await;
        let mut enriched = video.clone();
        if enriched.duration_seconds.is_none() {
            enriched.duration_seconds = metadata.duration;
        }
        if enriched.thumbnail_url.is_none() {
            enriched.thumbnail_url = metadata.thumbnail_url;
        }
        enriched
    }

    /// Run every extractor over `doc`.
    #[instrument(skip(self, doc, options), fields(fingerprint = %doc.fingerprint()))]
    pub async fn analyze(&self, doc: &ContentDocument, options: &AnalyzeOptions) -> ContentAnalysis {
        let mut video = self.video(doc);
        let mut metadata = None;

        if options.resolve_remote {
            if let Some(found) = video.as_ref() {
                let resolved = self.resolve_metadata(found).await;
                let mut enriched = found.clone();
                enriched.duration_seconds = enriched.duration_seconds.or(resolved.duration);
                video = Some(enriched);
                metadata = Some(resolved);
            }
        }

        let principal_image = options
            .principal_image
            .clone()
            .or_else(|| markup::first_image_src(doc.raw()));
        let thumbnail_url = resolve_thumbnail(
            options.explicit_thumbnail.as_deref(),
            video.as_ref(),
            metadata.as_ref(),
            principal_image.as_deref(),
        );
        if let Some(v) = video.as_mut() {
            if v.thumbnail_url.is_none() {
                v.thumbnail_url = thumbnail_url.clone();
            }
        }

        let signals = self.signals(doc);
        let reading_seconds = doc.reading_seconds(self.settings.words_per_minute);
        let video_seconds = video.as_ref().map(VideoReference::duration_or_zero).unwrap_or(0);

        let analysis = ContentAnalysis {
            fingerprint: doc.fingerprint(),
            steps: self.steps(doc),
            chapters: self.chapters(doc, video.as_ref(), options.permalink.as_deref()),
            transcript: self.transcript(doc),
            thumbnail_url,
            author_name: metadata.and_then(|m| m.author_name),
            resource_type: self.resource_type(doc, video.as_ref(), &signals),
            interactivity: self.interactivity(doc, video.as_ref(), &signals),
            signals,
            reading_seconds,
            time_required: seconds_to_iso(reading_seconds),
            total_duration: total_duration_iso(reading_seconds, video_seconds),
            video,
        };

        debug!(
            steps = analysis.steps.len(),
            chapters = analysis.chapters.len(),
            resource_type = %analysis.resource_type,
            "Analysis complete"
        );

        analysis
    }

    async fn authoritative_duration(&self, video: &VideoReference) -> Option<u64> {
        if video.platform != Platform::YouTube || !self.duration_provider.is_available() {
            return None;
        }
        let id = video.external_id.as_deref()?;

        match tokio::time::timeout(
            self.settings.lookup_timeout,
            self.duration_provider.video_duration(id),
        )
        .await
        {
            Ok(seconds) => Some(seconds).filter(|s| *s > 0),
            Err(_) => {
                warn!(video_id = id, "Duration lookup timed out");
                None
            }
        }
    }

    async fn fetch_metadata(&self, video: &VideoReference) -> Option<EmbedMetadata> {
        let url = video.lookup_url()?;

        match tokio::time::timeout(self.settings.lookup_timeout, self.metadata_provider.fetch(url))
            .await
        {
            Ok(metadata) => metadata,
            Err(_) => {
                warn!(url, "Embed metadata lookup timed out");
                None
            }
        }
    }
}
