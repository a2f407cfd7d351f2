//! Domain error types

use thiserror::Error;

/// Bad local input: rejected immediately, never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Topic list is empty")]
    EmptyTopics,

    #[error("Topic #{index} has an empty name")]
    EmptyTopicName { index: usize },

    #[error("Topic '{topic}' has importance {value}, expected 1..=5")]
    ImportanceOutOfRange { topic: String, value: u8 },

    #[error("Unknown required level '{0}' (expected basic, solid or deep)")]
    UnknownRequiredLevel(String),

    #[error("max_questions_per_topic must be at least 1")]
    ZeroQuestionLimit,

    #[error("{field} is too short ({len} chars, minimum {min})")]
    TooShort {
        field: &'static str,
        len: usize,
        min: usize,
    },

    #[error("{field} is too long ({len} chars, maximum {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Answer cannot be empty")]
    EmptyAnswer,

    #[error("Topic index {index} is out of range ({len} topics)")]
    TopicIndexOutOfRange { index: usize, len: usize },

    #[error("Corrupt session record: {0}")]
    CorruptSession(String),
}
