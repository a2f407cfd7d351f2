//! Agent roles

use serde::{Deserialize, Serialize};
use std::fmt;

/// The remote agent a request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Turns job description + CV into the ordered topic list
    Planner,
    /// Asks questions about one topic and closes it with a verdict
    TopicAgent,
    /// Summarizes all verdicts into an overall fit assessment
    FinalSummary,
}

impl AgentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Planner => "planner",
            AgentRole::TopicAgent => "topic_agent",
            AgentRole::FinalSummary => "final_summary",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
