//! Types for the interview orchestrator.

use crate::ports::agent_gateway::GatewayError;
use crate::ports::session_store::StoreError;
use crate::use_cases::prefetch::DrainReport;
use crate::use_cases::shared::AgentCallError;
use interview_domain::{
    FinalSummary, Level, SchemaError, TopicSessionState, TopicStatus, ValidationError, Verdict,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Lifecycle phase of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewPhase {
    Idle,
    Planning,
    AwaitingAnswer,
    Transitioning,
    Ending,
}

impl InterviewPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewPhase::Idle => "idle",
            InterviewPhase::Planning => "planning",
            InterviewPhase::AwaitingAnswer => "awaiting an answer",
            InterviewPhase::Transitioning => "moving to the next question",
            InterviewPhase::Ending => "ending",
        }
    }
}

impl fmt::Display for InterviewPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors surfaced by interview operations
#[derive(Error, Debug)]
pub enum InterviewError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Another interview operation is still running")]
    Concurrency,

    #[error("Cannot {operation} while {phase}")]
    InvalidState {
        operation: &'static str,
        phase: InterviewPhase,
    },

    #[error("The last answer is recorded but its follow-up failed; retry first")]
    RetryPending,

    #[error("Nothing to retry")]
    NothingToRetry,

    #[error("No saved interview to resume")]
    NothingToResume,

    #[error("Could not load saved interview: {0}")]
    Store(#[from] StoreError),
}

impl From<AgentCallError> for InterviewError {
    fn from(e: AgentCallError) -> Self {
        match e {
            AgentCallError::Gateway(e) => InterviewError::Gateway(e),
            AgentCallError::Schema(e) => InterviewError::Schema(e),
        }
    }
}

impl InterviewError {
    /// Whether `retry` can pick up where the failed operation stopped.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, InterviewError::Gateway(_) | InterviewError::Schema(_))
    }
}

/// The question the candidate should answer next.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentQuestion {
    pub topic_index: usize,
    pub total_topics: usize,
    pub topic_name: String,
    /// 1-based position of this question within its topic
    pub question_number: usize,
    pub max_questions: usize,
    pub text: String,
    /// Served from the prefetch cache rather than a synchronous call
    pub from_prefetch: bool,
}

impl CurrentQuestion {
    pub(crate) fn from_session(
        session: &TopicSessionState,
        text: impl Into<String>,
        from_prefetch: bool,
    ) -> Self {
        let index = session.current_topic_index();
        Self {
            topic_index: index,
            total_topics: session.len(),
            topic_name: session
                .topic(index)
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            question_number: session
                .topic_state(index)
                .map(|s| s.questions_asked() + 1)
                .unwrap_or(1),
            max_questions: session.max_questions_per_topic(),
            text: text.into(),
            from_prefetch,
        }
    }
}

/// Result of submitting an answer (or retrying / resuming).
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    NextQuestion(CurrentQuestion),
    Finished(InterviewReport),
}

/// Per-topic line of the final report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicReport {
    pub name: String,
    pub importance: u8,
    pub required_level: Level,
    pub status: TopicStatus,
    pub questions_asked: usize,
    pub verdict: Option<Verdict>,
}

/// Everything the interview produced.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewReport {
    pub topics: Vec<TopicReport>,
    /// Names of topics that ended without a verdict
    pub incomplete: Vec<String>,
    pub summary: Option<FinalSummary>,
    pub drain: DrainReport,
}

impl InterviewReport {
    pub(crate) fn from_session(
        session: &TopicSessionState,
        summary: Option<FinalSummary>,
        drain: DrainReport,
    ) -> Self {
        let topics: Vec<TopicReport> = session
            .topics()
            .iter()
            .zip(session.topic_states())
            .map(|(topic, state)| TopicReport {
                name: topic.name.clone(),
                importance: topic.importance,
                required_level: topic.required_level,
                status: state.status,
                questions_asked: state.questions_asked(),
                verdict: state.verdict.clone(),
            })
            .collect();
        let incomplete = topics
            .iter()
            .filter(|t| t.verdict.is_none())
            .map(|t| t.name.clone())
            .collect();

        Self {
            topics,
            incomplete,
            summary,
            drain,
        }
    }

    pub fn verdicts(&self) -> impl Iterator<Item = &Verdict> {
        self.topics.iter().filter_map(|t| t.verdict.as_ref())
    }
}

/// Read-only view for `/status`.
#[derive(Debug, Clone)]
pub struct InterviewStatus {
    pub phase: InterviewPhase,
    pub session: TopicSessionState,
    pub current_question: Option<String>,
    pub pending_background_verdicts: usize,
}
