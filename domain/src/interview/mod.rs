//! Interview domain.
//!
//! - [`topic::Topic`]: a planned subject area, immutable after planning
//! - [`verdict::Verdict`]: the closing assessment of a topic
//! - [`topic_state::TopicState`]: per-topic Q&A history and status
//! - [`session::TopicSessionState`]: the single writer over all of the above
//! - [`snapshot::InterviewSnapshot`]: persisted form used for resumption

pub mod context;
pub mod prefetch;
pub mod session;
pub mod snapshot;
pub mod topic;
pub mod topic_state;
pub mod verdict;
