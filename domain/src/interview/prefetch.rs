//! Prefetched opening questions

use serde_json::Value;

/// A materialized "ask" response for a topic not yet begun.
///
/// Cached in the session until consumed by a topic transition or
/// discarded with the session. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefetchEntry {
    pub topic_index: usize,
    pub question_text: String,
    pub raw_agent_output: Value,
}

impl PrefetchEntry {
    pub fn new(topic_index: usize, question_text: impl Into<String>, raw: Value) -> Self {
        Self {
            topic_index,
            question_text: question_text.into(),
            raw_agent_output: raw,
        }
    }
}
