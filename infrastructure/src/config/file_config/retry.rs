//! Retry configuration from TOML (`[retry]` section)

use crate::gateway::RetryPolicy;
use interview_domain::ConfigIssue;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw retry/backoff configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// Total attempts per agent call, including the first
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

impl FileRetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
        }
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        if self.max_attempts == 0 {
            issues.push(ConfigIssue::error(
                "retry.max_attempts",
                "max_attempts must be at least 1",
            ));
        }
        if self.initial_delay_ms > self.max_delay_ms {
            issues.push(ConfigIssue::warning(
                "retry.initial_delay_ms",
                format!(
                    "initial delay {}ms exceeds max delay {}ms; every wait will be {}ms",
                    self.initial_delay_ms, self.max_delay_ms, self.max_delay_ms
                ),
            ));
        }
    }
}
