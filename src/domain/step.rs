//! Instructional steps.

use serde::{Deserialize, Serialize};

/// One step of an ordered procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based position in extraction order
    pub position: u32,

    /// Short step title, when the source marks one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Step body text
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Step {
    /// Create a text-only step
    pub fn new(position: u32, text: impl Into<String>) -> Self {
        Self {
            position,
            name: None,
            text: text.into(),
            image: None,
            url: None,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }
}
