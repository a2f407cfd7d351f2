//! Application layer for interviewer
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::InterviewParams;
pub use ports::{
    agent_gateway::{AgentGateway, GatewayError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{InterviewProgressNotifier, NoProgress},
    session_store::{InMemorySessionStore, NoSessionStore, SessionStore, StoreError},
};
pub use use_cases::prefetch::DrainReport;
pub use use_cases::run_interview::{
    CurrentQuestion, InterviewError, InterviewOrchestrator, InterviewPhase, InterviewReport,
    InterviewStatus, SubmitOutcome, TopicReport,
};
