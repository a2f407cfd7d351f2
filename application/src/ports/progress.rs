//! Progress notification port
//!
//! Defines the interface for reporting progress while an interview runs.
//! Only foreground agent calls (the ones the candidate is waiting on) go
//! through `on_agent_call_*`; background work reports through the
//! dedicated prefetch and verdict hooks.

use interview_domain::{AgentRole, Topic, Verdict};

/// Callback for progress updates during an interview
///
/// Implementations live in the presentation layer.
pub trait InterviewProgressNotifier: Send + Sync {
    /// Called when a foreground agent call is issued
    fn on_agent_call_start(&self, role: AgentRole, topic: Option<&str>);

    /// Called when a foreground agent call returns
    fn on_agent_call_end(&self, role: AgentRole, success: bool);

    fn on_topics_planned(&self, _topics: &[Topic]) {}

    /// Called when the cursor moves onto a topic
    fn on_topic_started(&self, _index: usize, _topic: &Topic) {}

    /// Called when a verdict is recorded for a topic
    fn on_topic_completed(&self, _index: usize, _verdict: &Verdict) {}

    /// Called when a speculative opening question has been stored
    fn on_prefetch_ready(&self, _index: usize) {}

    /// Called when a background closing verdict settles
    fn on_background_verdict(&self, _index: usize, _success: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl InterviewProgressNotifier for NoProgress {
    fn on_agent_call_start(&self, _role: AgentRole, _topic: Option<&str>) {}
    fn on_agent_call_end(&self, _role: AgentRole, _success: bool) {}
}
