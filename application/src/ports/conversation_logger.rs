//! Interview transcript port
//!
//! Every question, answer, verdict and prefetch hand-off is reported as a
//! [`ConversationEvent`]. Adapters decide where the transcript goes; the
//! orchestrator never learns whether writing it worked. Diagnostic messages
//! stay on `tracing`.

use serde_json::Value;

/// One transcript entry: a snake_case kind plus a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEvent {
    /// `question_asked`, `verdict_recorded`, `prefetch_consumed`, ...
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for transcript events. Infallible from the caller's side.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every event (no `--conversation-log`).
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
