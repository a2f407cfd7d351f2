//! Interview configuration from TOML (`[interview]` section)

use interview_application::InterviewParams;
use interview_domain::{ConfigIssue, InputLimits};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw interview configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInterviewConfig {
    pub max_questions_per_topic: usize,
    pub enable_final_summary: bool,
    /// Wait for background verdicts at the end; `0` waits without bound
    pub drain_timeout_seconds: u64,
    pub max_answer_chars: usize,
    pub min_job_description_chars: usize,
    pub max_job_description_chars: usize,
    pub min_cv_chars: usize,
    pub max_cv_chars: usize,
}

impl Default for FileInterviewConfig {
    fn default() -> Self {
        let limits = InputLimits::default();
        Self {
            max_questions_per_topic: 4,
            enable_final_summary: true,
            drain_timeout_seconds: 60,
            max_answer_chars: limits.max_answer_chars,
            min_job_description_chars: limits.min_job_description_chars,
            max_job_description_chars: limits.max_job_description_chars,
            min_cv_chars: limits.min_cv_chars,
            max_cv_chars: limits.max_cv_chars,
        }
    }
}

impl FileInterviewConfig {
    pub fn to_params(&self) -> InterviewParams {
        let drain_timeout = match self.drain_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        InterviewParams::default()
            .with_max_questions_per_topic(self.max_questions_per_topic)
            .with_final_summary(self.enable_final_summary)
            .with_drain_timeout(drain_timeout)
            .with_limits(InputLimits {
                min_job_description_chars: self.min_job_description_chars,
                max_job_description_chars: self.max_job_description_chars,
                min_cv_chars: self.min_cv_chars,
                max_cv_chars: self.max_cv_chars,
                max_answer_chars: self.max_answer_chars,
            })
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        if self.max_questions_per_topic == 0 {
            issues.push(ConfigIssue::error(
                "interview.max_questions_per_topic",
                "max_questions_per_topic must be at least 1",
            ));
        }
        if self.max_answer_chars == 0 {
            issues.push(ConfigIssue::error(
                "interview.max_answer_chars",
                "max_answer_chars must be at least 1",
            ));
        }
        if self.min_job_description_chars > self.max_job_description_chars {
            issues.push(ConfigIssue::error(
                "interview.min_job_description_chars",
                "minimum job description length exceeds the maximum",
            ));
        }
        if self.min_cv_chars > self.max_cv_chars {
            issues.push(ConfigIssue::error(
                "interview.min_cv_chars",
                "minimum CV length exceeds the maximum",
            ));
        }
    }
}
