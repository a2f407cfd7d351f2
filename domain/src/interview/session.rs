//! Topic session state: the ordered topic list, per-topic Q&A history,
//! verdicts, the current-topic cursor and the prefetch slots.
//!
//! Every mutation goes through the methods below, which are the sole
//! writers. Callers that share a session across tasks wrap it in a lock
//! and hold it only for the duration of one call, so every reader observes
//! a consistent snapshot between operations.
//!
//! Verdict writes take an explicit topic index so a late background write
//! always lands on the topic it was requested for, never on whatever topic
//! the cursor points at when it completes.

use crate::core::error::ValidationError;
use crate::interview::prefetch::PrefetchEntry;
use crate::interview::topic::Topic;
use crate::interview::topic_state::{QaPair, TopicState, TopicStatus};
use crate::interview::verdict::Verdict;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Live state of one interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SessionRecord", into = "SessionRecord")]
pub struct TopicSessionState {
    topics: Vec<Topic>,
    topic_states: Vec<TopicState>,
    current_topic_index: usize,
    max_questions_per_topic: usize,
    enable_final_summary: bool,
    prefetched: BTreeMap<usize, PrefetchEntry>,
}

impl TopicSessionState {
    /// Create a session with every topic `NotStarted` and the cursor at 0.
    pub fn initialize(
        topics: Vec<Topic>,
        max_questions_per_topic: usize,
        enable_final_summary: bool,
    ) -> Result<Self, ValidationError> {
        if topics.is_empty() {
            return Err(ValidationError::EmptyTopics);
        }
        if max_questions_per_topic == 0 {
            return Err(ValidationError::ZeroQuestionLimit);
        }
        for (index, topic) in topics.iter().enumerate() {
            topic.validate(index)?;
        }

        let topic_states = vec![TopicState::default(); topics.len()];
        Ok(Self {
            topics,
            topic_states,
            current_topic_index: 0,
            max_questions_per_topic,
            enable_final_summary,
            prefetched: BTreeMap::new(),
        })
    }

    // ==================== Read accessors ====================

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topic_states(&self) -> &[TopicState] {
        &self.topic_states
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn current_topic_index(&self) -> usize {
        self.current_topic_index
    }

    pub fn max_questions_per_topic(&self) -> usize {
        self.max_questions_per_topic
    }

    pub fn enable_final_summary(&self) -> bool {
        self.enable_final_summary
    }

    pub fn topic(&self, index: usize) -> Option<&Topic> {
        self.topics.get(index)
    }

    pub fn topic_state(&self, index: usize) -> Option<&TopicState> {
        self.topic_states.get(index)
    }

    /// `None` once the cursor is outside the topic list.
    pub fn current_topic(&self) -> Option<&Topic> {
        self.topics.get(self.current_topic_index)
    }

    pub fn current_topic_state(&self) -> Option<&TopicState> {
        self.topic_states.get(self.current_topic_index)
    }

    /// Whether a topic exists after the current one.
    pub fn has_next_topic(&self) -> bool {
        self.current_topic_index + 1 < self.topics.len()
    }

    /// Questions the current topic may still receive before hitting its cap.
    pub fn questions_remaining(&self) -> usize {
        self.current_topic_state()
            .map(|s| self.max_questions_per_topic.saturating_sub(s.qa_list.len()))
            .unwrap_or(0)
    }

    // ==================== Mutations ====================

    /// Append a turn to the current topic, moving it to `Probing` if it had
    /// not started yet. Returns the index written to.
    pub fn record_answer(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<usize, ValidationError> {
        let index = self.current_topic_index;
        let len = self.topic_states.len();
        let state = self
            .topic_states
            .get_mut(index)
            .ok_or(ValidationError::TopicIndexOutOfRange { index, len })?;

        state.qa_list.push(QaPair::new(question, answer));
        if state.status == TopicStatus::NotStarted {
            state.status = TopicStatus::Probing;
        }
        Ok(index)
    }

    /// Set the verdict of `index` (or of the current topic) and mark it done.
    ///
    /// An existing verdict is replaced outright; the latest call wins.
    pub fn record_verdict(
        &mut self,
        verdict: Verdict,
        index: Option<usize>,
    ) -> Result<usize, ValidationError> {
        let index = index.unwrap_or(self.current_topic_index);
        let len = self.topic_states.len();
        let state = self
            .topic_states
            .get_mut(index)
            .ok_or(ValidationError::TopicIndexOutOfRange { index, len })?;

        state.verdict = Some(verdict);
        state.status = TopicStatus::Done;
        Ok(index)
    }

    /// Move the cursor forward by one. Returns `false` (and changes nothing)
    /// on the last topic; the cursor never moves backwards.
    pub fn advance_topic(&mut self) -> bool {
        if !self.has_next_topic() {
            return false;
        }
        self.current_topic_index += 1;
        true
    }

    /// The sole policy gate for "ask another question" vs. "finalize".
    pub fn should_continue_topic(&self) -> bool {
        match self.current_topic_state() {
            Some(state) => {
                state.qa_list.len() < self.max_questions_per_topic
                    && state.status != TopicStatus::Done
            }
            None => false,
        }
    }

    // ==================== Prefetch slots ====================

    /// Cache a prefetched opening question. Only topics that have not begun
    /// (strictly ahead of the cursor and still `NotStarted`) accept an entry;
    /// a second entry for the same index overwrites the first.
    pub fn store_prefetch(&mut self, entry: PrefetchEntry) -> bool {
        let index = entry.topic_index;
        let not_begun = index > self.current_topic_index
            && self
                .topic_states
                .get(index)
                .is_some_and(|s| s.status == TopicStatus::NotStarted);
        if !not_begun {
            return false;
        }
        self.prefetched.insert(index, entry);
        true
    }

    /// Remove and return the cached entry for `index`.
    pub fn take_prefetch(&mut self, index: usize) -> Option<PrefetchEntry> {
        self.prefetched.remove(&index)
    }

    pub fn has_prefetch(&self, index: usize) -> bool {
        self.prefetched.contains_key(&index)
    }

    pub fn clear_prefetches(&mut self) {
        self.prefetched.clear();
    }

    // ==================== Aggregate queries ====================

    /// Verdicts in planning order, skipping topics without one.
    pub fn all_verdicts(&self) -> Vec<&Verdict> {
        self.topic_states
            .iter()
            .filter_map(|s| s.verdict.as_ref())
            .collect()
    }

    /// Indices of topics whose status is not `Done`.
    pub fn incomplete_topics(&self) -> Vec<usize> {
        self.topic_states
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_done())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Serialized form of [`TopicSessionState`]. Prefetch slots are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionRecord {
    topics: Vec<Topic>,
    topic_states: Vec<TopicState>,
    current_topic_index: usize,
    max_questions_per_topic: usize,
    enable_final_summary: bool,
}

impl From<TopicSessionState> for SessionRecord {
    fn from(state: TopicSessionState) -> Self {
        Self {
            topics: state.topics,
            topic_states: state.topic_states,
            current_topic_index: state.current_topic_index,
            max_questions_per_topic: state.max_questions_per_topic,
            enable_final_summary: state.enable_final_summary,
        }
    }
}

impl TryFrom<SessionRecord> for TopicSessionState {
    type Error = ValidationError;

    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        let mut state = TopicSessionState::initialize(
            record.topics,
            record.max_questions_per_topic,
            record.enable_final_summary,
        )?;

        if record.topic_states.len() != state.topics.len() {
            return Err(ValidationError::CorruptSession(format!(
                "{} topic states for {} topics",
                record.topic_states.len(),
                state.topics.len()
            )));
        }
        if record.current_topic_index >= state.topics.len() {
            return Err(ValidationError::CorruptSession(format!(
                "cursor {} outside {} topics",
                record.current_topic_index,
                state.topics.len()
            )));
        }
        for (index, topic_state) in record.topic_states.iter().enumerate() {
            match topic_state.status {
                TopicStatus::Done if topic_state.verdict.is_none() => {
                    return Err(ValidationError::CorruptSession(format!(
                        "topic {index} is done without a verdict"
                    )));
                }
                TopicStatus::NotStarted if !topic_state.qa_list.is_empty() => {
                    return Err(ValidationError::CorruptSession(format!(
                        "topic {index} has answers but never started"
                    )));
                }
                _ => {}
            }
        }

        state.topic_states = record.topic_states;
        state.current_topic_index = record.current_topic_index;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::topic::Level;
    use serde_json::json;

    fn topics(n: usize) -> Vec<Topic> {
        (0..n)
            .map(|i| Topic::new(format!("Topic {i}"), 3, Level::Solid))
            .collect()
    }

    fn verdict(name: &str) -> Verdict {
        Verdict::new(name, Level::Solid, 3.0).with_confidence(0.7)
    }

    #[test]
    fn test_initialize_all_lengths() {
        for n in 1..=10 {
            let session = TopicSessionState::initialize(topics(n), 5, true).unwrap();
            assert_eq!(session.topic_states().len(), n);
            assert_eq!(session.current_topic_index(), 0);
            assert!(session.topic_states().iter().all(|s| {
                s.status == TopicStatus::NotStarted && s.qa_list.is_empty() && s.verdict.is_none()
            }));
        }
    }

    #[test]
    fn test_initialize_rejects_empty() {
        let err = TopicSessionState::initialize(vec![], 5, true).unwrap_err();
        assert_eq!(err, ValidationError::EmptyTopics);
    }

    #[test]
    fn test_initialize_rejects_bad_importance() {
        let list = vec![Topic::new("Rust", 3, Level::Deep), Topic::new("SQL", 0, Level::Basic)];
        let err = TopicSessionState::initialize(list, 5, true).unwrap_err();
        assert!(matches!(err, ValidationError::ImportanceOutOfRange { value: 0, .. }));
    }

    #[test]
    fn test_initialize_rejects_zero_question_limit() {
        let err = TopicSessionState::initialize(topics(2), 0, true).unwrap_err();
        assert_eq!(err, ValidationError::ZeroQuestionLimit);
    }

    #[test]
    fn test_record_answer_starts_probing() {
        let mut session = TopicSessionState::initialize(topics(2), 5, true).unwrap();
        let index = session.record_answer("Q1", "A1").unwrap();
        assert_eq!(index, 0);
        let state = session.current_topic_state().unwrap();
        assert_eq!(state.status, TopicStatus::Probing);
        assert_eq!(state.qa_list, vec![QaPair::new("Q1", "A1")]);
    }

    #[test]
    fn test_should_continue_until_cap() {
        let mut session = TopicSessionState::initialize(topics(1), 5, true).unwrap();
        for i in 0..4 {
            session.record_answer(format!("Q{i}"), "A").unwrap();
        }
        assert!(session.should_continue_topic());
        assert_eq!(session.questions_remaining(), 1);

        session.record_answer("Q4", "A").unwrap();
        assert!(!session.should_continue_topic());
        assert_eq!(session.questions_remaining(), 0);
    }

    #[test]
    fn test_should_continue_false_when_done() {
        let mut session = TopicSessionState::initialize(topics(1), 5, true).unwrap();
        session.record_answer("Q", "A").unwrap();
        session.record_verdict(verdict("Topic 0"), None).unwrap();
        assert!(!session.should_continue_topic());
    }

    #[test]
    fn test_record_verdict_overwrites() {
        let mut session = TopicSessionState::initialize(topics(2), 5, true).unwrap();
        session.record_verdict(verdict("first"), Some(1)).unwrap();
        session.record_verdict(verdict("second"), Some(1)).unwrap();
        let state = session.topic_state(1).unwrap();
        assert_eq!(state.status, TopicStatus::Done);
        assert_eq!(state.verdict.as_ref().unwrap().name, "second");
    }

    #[test]
    fn test_record_verdict_explicit_index_ignores_cursor() {
        let mut session = TopicSessionState::initialize(topics(4), 5, true).unwrap();
        session.advance_topic();
        session.advance_topic();
        session.advance_topic();
        session.record_verdict(verdict("Topic 0"), Some(0)).unwrap();
        assert!(session.topic_state(0).unwrap().is_done());
        assert!(!session.current_topic_state().unwrap().is_done());
    }

    #[test]
    fn test_record_verdict_out_of_range() {
        let mut session = TopicSessionState::initialize(topics(2), 5, true).unwrap();
        let err = session.record_verdict(verdict("x"), Some(7)).unwrap_err();
        assert_eq!(err, ValidationError::TopicIndexOutOfRange { index: 7, len: 2 });
    }

    #[test]
    fn test_advance_topic_bounds() {
        let mut session = TopicSessionState::initialize(topics(3), 5, true).unwrap();
        assert!(session.advance_topic());
        assert_eq!(session.current_topic_index(), 1);
        assert!(session.advance_topic());
        assert_eq!(session.current_topic_index(), 2);
        assert!(!session.advance_topic());
        assert_eq!(session.current_topic_index(), 2);
        assert!(!session.advance_topic());
        assert_eq!(session.current_topic_index(), 2);
    }

    #[test]
    fn test_prefetch_slot_lifecycle() {
        let mut session = TopicSessionState::initialize(topics(3), 5, true).unwrap();
        assert!(session.store_prefetch(PrefetchEntry::new(1, "Opening for 1", json!({}))));
        assert!(session.has_prefetch(1));

        let entry = session.take_prefetch(1).unwrap();
        assert_eq!(entry.question_text, "Opening for 1");
        assert!(!session.has_prefetch(1));
        assert!(session.take_prefetch(1).is_none());
    }

    #[test]
    fn test_prefetch_second_store_overwrites() {
        let mut session = TopicSessionState::initialize(topics(3), 5, true).unwrap();
        session.store_prefetch(PrefetchEntry::new(2, "first", json!({})));
        session.store_prefetch(PrefetchEntry::new(2, "second", json!({})));
        assert_eq!(session.take_prefetch(2).unwrap().question_text, "second");
        assert!(session.take_prefetch(2).is_none());
    }

    #[test]
    fn test_prefetch_rejected_for_begun_topic() {
        let mut session = TopicSessionState::initialize(topics(3), 5, true).unwrap();
        assert!(!session.store_prefetch(PrefetchEntry::new(0, "current", json!({}))));
        session.advance_topic();
        assert!(!session.store_prefetch(PrefetchEntry::new(1, "now current", json!({}))));
        assert!(!session.store_prefetch(PrefetchEntry::new(9, "missing", json!({}))));
    }

    #[test]
    fn test_aggregates() {
        let mut session = TopicSessionState::initialize(topics(3), 5, true).unwrap();
        session.record_verdict(verdict("Topic 1"), Some(1)).unwrap();
        assert_eq!(session.all_verdicts().len(), 1);
        assert_eq!(session.incomplete_topics(), vec![0, 2]);
    }

    #[test]
    fn test_serde_round_trip_drops_prefetch() {
        let mut session = TopicSessionState::initialize(topics(3), 4, false).unwrap();
        session.record_answer("Q", "A").unwrap();
        session.record_verdict(verdict("Topic 0"), None).unwrap();
        session.advance_topic();
        session.store_prefetch(PrefetchEntry::new(2, "cached", json!({})));

        let json = serde_json::to_string(&session).unwrap();
        let restored: TopicSessionState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.topics(), session.topics());
        assert_eq!(restored.topic_states(), session.topic_states());
        assert_eq!(restored.current_topic_index(), 1);
        assert_eq!(restored.max_questions_per_topic(), 4);
        assert!(!restored.enable_final_summary());
        assert!(!restored.has_prefetch(2));
    }

    #[test]
    fn test_deserialize_rejects_done_without_verdict() {
        let json = json!({
            "topics": [{"name": "Rust", "importance": 3, "required_level": "deep"}],
            "topic_states": [{"status": "done", "qa_list": [], "verdict": null}],
            "current_topic_index": 0,
            "max_questions_per_topic": 3,
            "enable_final_summary": true
        });
        let result: Result<TopicSessionState, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_cursor_out_of_bounds() {
        let json = json!({
            "topics": [{"name": "Rust", "importance": 3, "required_level": "deep"}],
            "topic_states": [{"status": "not_started", "qa_list": [], "verdict": null}],
            "current_topic_index": 1,
            "max_questions_per_topic": 3,
            "enable_final_summary": true
        });
        let result: Result<TopicSessionState, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }
}
