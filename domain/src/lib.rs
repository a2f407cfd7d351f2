//! Domain layer for interviewer
//!
//! This crate contains the core interview model and the agent contracts.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Topic session state
//!
//! An interview walks an ordered list of [`Topic`]s planned from a job
//! description and a CV. [`TopicSessionState`] owns the per-topic Q&A
//! history, the verdicts and the cursor, and is the only place any of them
//! is mutated.
//!
//! ## Agent contracts
//!
//! Three agent roles ([`AgentRole`]) are called through a gateway. Their raw
//! output passes the validation layer ([`validate_topic_turn`] and friends)
//! and arrives as tagged unions such as [`TopicTurn`].

pub mod agent;
pub mod config;
pub mod core;
pub mod interview;
pub mod prompt;

// Re-export commonly used types
pub use agent::{
    input::{TurnMode, final_summary_input, planner_input, topic_agent_input},
    parsing::extract_json,
    response::{FinalSummary, FitLabel, PlannerOutput, TopicSummary, TopicTurn},
    role::AgentRole,
    validation::{
        FieldIssue, MAX_PLANNED_TOPICS, SchemaError, validate_final_summary,
        validate_planner_output, validate_topic_turn,
    },
};
pub use config::{ConfigIssue, OutputFormat, Severity};
pub use core::{error::ValidationError, limits::InputLimits};
pub use interview::{
    context::CandidateContext,
    prefetch::PrefetchEntry,
    session::TopicSessionState,
    snapshot::{InterviewSnapshot, SNAPSHOT_VERSION},
    topic::{Level, Topic},
    topic_state::{QaPair, TopicState, TopicStatus},
    verdict::Verdict,
};
pub use prompt::PromptTemplate;
