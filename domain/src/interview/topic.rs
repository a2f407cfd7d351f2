//! Topic value object

use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Depth of knowledge a topic requires (or a candidate demonstrated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Basic,
    Solid,
    Deep,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Basic => "basic",
            Level::Solid => "solid",
            Level::Deep => "deep",
        }
    }

    pub const ALL: [Level; 3] = [Level::Basic, Level::Solid, Level::Deep];
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Level::Basic),
            "solid" => Ok(Level::Solid),
            "deep" => Ok(Level::Deep),
            other => Err(ValidationError::UnknownRequiredLevel(other.to_string())),
        }
    }
}

/// Valid importance range (inclusive).
pub const IMPORTANCE_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// A subject area probed by a bounded number of question/answer turns.
///
/// `importance` is informational: the orchestration visits topics in
/// planning order and never consults it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub importance: u8,
    pub required_level: Level,
    #[serde(default)]
    pub merged_from: Vec<String>,
}

impl Topic {
    pub fn new(name: impl Into<String>, importance: u8, required_level: Level) -> Self {
        Self {
            name: name.into(),
            importance,
            required_level,
            merged_from: Vec::new(),
        }
    }

    pub fn with_merged_from(mut self, sources: Vec<String>) -> Self {
        self.merged_from = sources;
        self
    }

    /// Check the invariants `initialize` relies on.
    pub fn validate(&self, index: usize) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyTopicName { index });
        }
        if !IMPORTANCE_RANGE.contains(&self.importance) {
            return Err(ValidationError::ImportanceOutOfRange {
                topic: self.name.clone(),
                value: self.importance,
            });
        }
        Ok(())
    }
}
