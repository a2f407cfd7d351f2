//! Interview parameters for the use case loop.
//!
//! [`InterviewParams`] groups the static parameters that control
//! [`InterviewOrchestrator`](crate::use_cases::run_interview::InterviewOrchestrator).
//! These are application-layer concerns, not domain policy.

use interview_domain::InputLimits;
use std::time::Duration;

/// Interview loop control parameters.
#[derive(Debug, Clone)]
pub struct InterviewParams {
    /// Answers a topic may receive before it is closed.
    pub max_questions_per_topic: usize,
    /// Request the closing FinalSummary at the end of the interview.
    pub enable_final_summary: bool,
    /// How long `end` waits for background verdicts before cancelling them.
    /// `None` waits indefinitely.
    pub drain_timeout: Option<Duration>,
    /// Character bounds for job description, CV and answers.
    pub limits: InputLimits,
}

impl Default for InterviewParams {
    fn default() -> Self {
        Self {
            max_questions_per_topic: 4,
            enable_final_summary: true,
            drain_timeout: Some(Duration::from_secs(60)),
            limits: InputLimits::default(),
        }
    }
}

impl InterviewParams {
    // ==================== Builder Methods ====================

    pub fn with_max_questions_per_topic(mut self, max: usize) -> Self {
        self.max_questions_per_topic = max;
        self
    }

    pub fn with_final_summary(mut self, enabled: bool) -> Self {
        self.enable_final_summary = enabled;
        self
    }

    pub fn with_drain_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.drain_timeout = timeout;
        self
    }

    pub fn with_limits(mut self, limits: InputLimits) -> Self {
        self.limits = limits;
        self
    }
}
