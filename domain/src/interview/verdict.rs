//! Verdict value object

use crate::interview::topic::Level;
use serde::{Deserialize, Serialize};

/// Closing assessment of a topic, produced once its probing concludes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Topic name as echoed by the agent
    pub name: String,
    pub assessed_level: Level,
    /// 0..=5
    pub score: f32,
    /// 0..=1
    pub confidence: f32,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
}

impl Verdict {
    pub fn new(name: impl Into<String>, assessed_level: Level, score: f32) -> Self {
        Self {
            name: name.into(),
            assessed_level,
            score: score.clamp(0.0, 5.0),
            confidence: 1.0,
            strengths: Vec::new(),
            gaps: Vec::new(),
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_strengths(mut self, strengths: Vec<String>) -> Self {
        self.strengths = strengths;
        self
    }

    pub fn with_gaps(mut self, gaps: Vec<String>) -> Self {
        self.gaps = gaps;
        self
    }

    /// Whether the demonstrated level reaches `required`.
    pub fn meets(&self, required: Level) -> bool {
        self.assessed_level >= required
    }
}
