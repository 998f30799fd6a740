//! Wire types for the synthesized dialogue.

use serde::{Deserialize, Serialize};

/// A single attributed utterance in the synthesized dialogue (who, what).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Speaker label as it appeared in the script, trimmed (e.g. "Host A").
    pub speaker: String,
    /// Utterance text; never empty after parsing.
    pub text: String,
}

impl Segment {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

/// Response body shared by both generation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodcastResponse {
    /// True whenever no error reached the HTTP boundary.
    pub success: bool,
    /// Raw script text as returned by the model.
    pub script: String,
    /// Parsed and bounded dialogue segments.
    pub segments: Vec<Segment>,
}
