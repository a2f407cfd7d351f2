//! Request payloads per agent role.
//!
//! Each builder produces the JSON document handed to the agent gateway.
//! Payloads are plain data; the role's system prompt carries the
//! instructions.

use crate::interview::context::CandidateContext;
use crate::interview::session::TopicSessionState;
use crate::interview::topic::Topic;
use crate::interview::topic_state::QaPair;
use crate::agent::validation::MAX_PLANNED_TOPICS;
use serde::Serialize;
use serde_json::{Value, json};

/// What a TopicAgent turn is allowed to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnMode {
    /// First question of a topic; history is empty, must ask
    Open,
    /// Follow-up turn; may ask again or close early with a verdict
    Continue,
    /// Question budget exhausted (or topic left behind); must return a verdict
    Close,
}

/// Planner request.
pub fn planner_input(context: &CandidateContext) -> Value {
    json!({
        "job_description": context.job_description,
        "cv": context.cv,
        "max_topics": MAX_PLANNED_TOPICS,
    })
}

/// TopicAgent request for `topic_index` with the given history.
pub fn topic_agent_input(
    context: &CandidateContext,
    topic: &Topic,
    topic_index: usize,
    total_topics: usize,
    qa_history: &[QaPair],
    max_questions: usize,
    mode: TurnMode,
) -> Value {
    json!({
        "job_description": context.job_description,
        "cv": context.cv,
        "topic": topic,
        "topic_index": topic_index,
        "total_topics": total_topics,
        "qa_history": qa_history,
        "questions_asked": qa_history.len(),
        "max_questions": max_questions,
        "mode": mode,
    })
}

/// FinalSummary request over every topic and its verdict (if any).
pub fn final_summary_input(context: &CandidateContext, session: &TopicSessionState) -> Value {
    let topics: Vec<Value> = session
        .topics()
        .iter()
        .zip(session.topic_states())
        .map(|(topic, state)| {
            json!({
                "name": topic.name,
                "importance": topic.importance,
                "required_level": topic.required_level,
                "verdict": state.verdict,
            })
        })
        .collect();

    json!({
        "job_description": context.job_description,
        "topics": topics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::topic::Level;

    #[test]
    fn test_topic_agent_input_shape() {
        let context = CandidateContext::new("JD", "CV");
        let topic = Topic::new("Ownership", 4, Level::Deep);
        let history = vec![QaPair::new("Q1", "A1")];
        let value = topic_agent_input(&context, &topic, 1, 3, &history, 5, TurnMode::Close);

        assert_eq!(value["topic"]["name"], "Ownership");
        assert_eq!(value["questions_asked"], 1);
        assert_eq!(value["mode"], "close");
        assert_eq!(value["qa_history"][0]["answer"], "A1");
    }

    #[test]
    fn test_final_summary_input_includes_missing_verdicts_as_null() {
        let context = CandidateContext::new("JD", "CV");
        let session = TopicSessionState::initialize(
            vec![Topic::new("Ownership", 4, Level::Deep)],
            3,
            true,
        )
        .unwrap();
        let value = final_summary_input(&context, &session);
        assert!(value["topics"][0]["verdict"].is_null());
    }
}
