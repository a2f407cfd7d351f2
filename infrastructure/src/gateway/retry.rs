//! Capped exponential backoff for transient agent failures.

use interview_application::GatewayError;
use interview_domain::AgentRole;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Backoff schedule for one agent call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Delay after the `attempt`-th failure (1-based):
    /// `initial * 2^(attempt-1)`, capped at `max_delay`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.initial_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }

    /// Server-provided `Retry-After` wins over the schedule; both are capped.
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        match retry_after {
            Some(delay) => delay.min(self.max_delay),
            None => self.backoff(attempt),
        }
    }
}

/// Failure of a single HTTP attempt.
#[derive(Debug)]
pub(crate) struct AttemptError {
    pub error: GatewayError,
    pub retry_after: Option<Duration>,
}

impl From<GatewayError> for AttemptError {
    fn from(error: GatewayError) -> Self {
        Self {
            error,
            retry_after: None,
        }
    }
}

/// Run `attempt` until it succeeds, fails permanently, or the policy is
/// exhausted.
pub(crate) async fn retry_transient<T, F, Fut>(
    policy: &RetryPolicy,
    role: AgentRole,
    mut attempt: F,
) -> Result<T, GatewayError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut n = 1;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(AttemptError {
                error: GatewayError::Transient(message),
                retry_after,
            }) => {
                if n >= max_attempts {
                    return Err(GatewayError::RetriesExhausted {
                        attempts: n,
                        last: message,
                    });
                }
                let delay = policy.delay_for(n, retry_after);
                warn!(
                    role = %role,
                    attempt = n,
                    "Transient agent failure, retrying in {}ms: {}",
                    delay.as_millis(),
                    message
                );
                tokio::time::sleep(delay).await;
                n += 1;
            }
            Err(AttemptError { error, .. }) => return Err(error),
        }
    }
}
