//! Post-processing extension point.
//!
//! Callers register ordered transformations per output kind; the engine
//! runs them, in registration order, on each extractor's result.

use crate::domain::{Chapter, ContentDocument, InteractivityType, ResourceType, Step, VideoReference};

/// A transformation applied to an extracted value
pub type Hook<T> = Box<dyn Fn(T, &ContentDocument) -> T + Send + Sync>;

/// Ordered hook lists, one per extracted value
#[derive(Default)]
pub struct PostProcessors {
    pub steps: Vec<Hook<Vec<Step>>>,
    pub video: Vec<Hook<Option<VideoReference>>>,
    pub chapters: Vec<Hook<Vec<Chapter>>>,
    pub transcript: Vec<Hook<Option<String>>>,
    pub resource_type: Vec<Hook<ResourceType>>,
    pub interactivity: Vec<Hook<InteractivityType>>,
}

impl PostProcessors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_steps(
        mut self,
        hook: impl Fn(Vec<Step>, &ContentDocument) -> Vec<Step> + Send + Sync + 'static,
    ) -> Self {
        self.steps.push(Box::new(hook));
        self
    }

    pub fn on_video(
        mut self,
        hook: impl Fn(Option<VideoReference>, &ContentDocument) -> Option<VideoReference>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.video.push(Box::new(hook));
        self
    }

    pub fn on_chapters(
        mut self,
        hook: impl Fn(Vec<Chapter>, &ContentDocument) -> Vec<Chapter> + Send + Sync + 'static,
    ) -> Self {
        self.chapters.push(Box::new(hook));
        self
    }

    pub fn on_transcript(
        mut self,
        hook: impl Fn(Option<String>, &ContentDocument) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.transcript.push(Box::new(hook));
        self
    }

    pub fn on_resource_type(
        mut self,
        hook: impl Fn(ResourceType, &ContentDocument) -> ResourceType + Send + Sync + 'static,
    ) -> Self {
        self.resource_type.push(Box::new(hook));
        self
    }

    pub fn on_interactivity(
        mut self,
        hook: impl Fn(InteractivityType, &ContentDocument) -> InteractivityType
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.interactivity.push(Box::new(hook));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
            && self.video.is_empty()
            && self.chapters.is_empty()
            && self.transcript.is_empty()
            && self.resource_type.is_empty()
            && self.interactivity.is_empty()
    }
}

impl std::fmt::Debug for PostProcessors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostProcessors")
            .field("steps", &self.steps.len())
            .field("video", &self.video.len())
            .field("chapters", &self.chapters.len())
            .field("transcript", &self.transcript.len())
            .field("resource_type", &self.resource_type.len())
            .field("interactivity", &self.interactivity.len())
            .finish()
    }
}

/// Run `hooks` over `value` in order.
pub fn apply<T>(hooks: &[Hook<T>], value: T, doc: &ContentDocument) -> T {
    hooks.iter().fold(value, |acc, hook| hook(acc, doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hooks_run_in_order() {
        let hooks = PostProcessors::new()
            .on_transcript(|t, _| t.map(|s| format!("{}-a", s)))
            .on_transcript(|t, _| t.map(|s| format!("{}-b", s)));
        let doc = ContentDocument::new("");
        assert_eq!(
            apply(&hooks.transcript, Some("x".to_string()), &doc),
            Some("x-a-b".to_string())
        );
    }

    #[test]
    fn test_empty_hooks_are_identity() {
        let hooks = PostProcessors::new();
        assert!(hooks.is_empty());
        let doc = ContentDocument::new("");
        assert_eq!(
            apply(&hooks.resource_type, ResourceType::Reading, &doc),
            ResourceType::Reading
        );
    }
}
