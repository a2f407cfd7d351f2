//! Typed agent outputs

use crate::interview::topic::{Level, Topic};
use crate::interview::verdict::Verdict;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Planner output: the topic list to probe, in visiting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerOutput {
    pub topics: Vec<Topic>,
}

/// One TopicAgent turn: either another question or the closing verdict.
#[derive(Debug, Clone, PartialEq)]
pub enum TopicTurn {
    Ask { text: String },
    Final { verdict: Verdict },
}

impl TopicTurn {
    pub fn is_final(&self) -> bool {
        matches!(self, TopicTurn::Final { .. })
    }
}

/// Overall fit label of the closing summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitLabel {
    StrongFit,
    GoodFit,
    PartialFit,
    PoorFit,
}

impl FitLabel {
    pub const ALL: [FitLabel; 4] = [
        FitLabel::StrongFit,
        FitLabel::GoodFit,
        FitLabel::PartialFit,
        FitLabel::PoorFit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FitLabel::StrongFit => "strong_fit",
            FitLabel::GoodFit => "good_fit",
            FitLabel::PartialFit => "partial_fit",
            FitLabel::PoorFit => "poor_fit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == s)
    }
}

impl fmt::Display for FitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-topic line of the closing summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub name: String,
    pub score: f32,
    pub assessed_level: Level,
    pub comment: String,
}

/// Closing summary over all collected verdicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalSummary {
    pub per_topic: Vec<TopicSummary>,
    /// 0..=100
    pub fit_overall_percent: u8,
    pub fit_label: FitLabel,
}
