//! Persisted interview snapshot

use crate::interview::context::CandidateContext;
use crate::interview::session::TopicSessionState;
use serde::{Deserialize, Serialize};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to resume an interview after interruption.
///
/// Background verdict tasks and prefetched questions are intentionally
/// absent: a resumed interview starts with neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSnapshot {
    pub version: u32,
    pub context: CandidateContext,
    pub session: TopicSessionState,
    /// The question awaiting an answer when the snapshot was taken.
    pub current_question: Option<String>,
}

impl InterviewSnapshot {
    pub fn new(
        context: CandidateContext,
        session: TopicSessionState,
        current_question: Option<String>,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            context,
            session,
            current_question,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::topic::{Level, Topic};

    #[test]
    fn test_snapshot_round_trip() {
        let mut session = TopicSessionState::initialize(
            vec![
                Topic::new("Ownership", 5, Level::Deep),
                Topic::new("Testing", 2, Level::Basic).with_merged_from(vec!["QA".into()]),
            ],
            3,
            true,
        )
        .unwrap();
        session.record_answer("What is a move?", "Transfer of ownership").unwrap();

        let snapshot = InterviewSnapshot::new(
            CandidateContext::new("Backend role", "Ten years of Rust"),
            session,
            Some("And a borrow?".into()),
        );
        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        let restored: InterviewSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.version, SNAPSHOT_VERSION);
        assert_eq!(restored.context, snapshot.context);
        assert_eq!(restored.session.topics(), snapshot.session.topics());
        assert_eq!(restored.session.topic_states(), snapshot.session.topic_states());
        assert_eq!(restored.current_question.as_deref(), Some("And a borrow?"));
    }
}
