//! Per-topic progress

use crate::interview::verdict::Verdict;
use serde::{Deserialize, Serialize};

/// Lifecycle of a single topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    #[default]
    NotStarted,
    Probing,
    Done,
}

impl TopicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicStatus::NotStarted => "not_started",
            TopicStatus::Probing => "probing",
            TopicStatus::Done => "done",
        }
    }
}

impl std::fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One question/answer turn. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Progress of one topic, indexed by the topic's planning position.
///
/// Invariants (maintained by [`TopicSessionState`](super::session::TopicSessionState)):
/// `Done` implies a verdict; `NotStarted` implies an empty history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicState {
    pub status: TopicStatus,
    pub qa_list: Vec<QaPair>,
    pub verdict: Option<Verdict>,
}

impl TopicState {
    pub fn is_done(&self) -> bool {
        self.status == TopicStatus::Done
    }

    pub fn questions_asked(&self) -> usize {
        self.qa_list.len()
    }
}
