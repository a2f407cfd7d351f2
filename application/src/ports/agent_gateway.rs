//! Agent gateway port
//!
//! Defines the single call the interview makes to the remote reasoning
//! service: send a structured input to an agent role, receive its JSON
//! output. Transport, prompting and retry/backoff live behind this port.

use async_trait::async_trait;
use interview_domain::AgentRole;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during agent gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Network failure, HTTP 5xx or 429. Retried by the gateway itself.
    #[error("Transient error: {0}")]
    Transient(String),

    /// Any other 4xx or a malformed response. Never retried.
    #[error("Request rejected: {0}")]
    Permanent(String),

    /// Transient failures persisted through every allowed attempt.
    #[error("Agent call failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

impl GatewayError {
    /// Whether the gateway may retry this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Transient(_))
    }
}

/// Gateway for agent calls
///
/// The interview core performs no retries of its own and treats every
/// error returned here as an opaque failure to propagate.
#[async_trait]
pub trait AgentGateway: Send + Sync {
    /// Invoke `role` with `input` and return its (not yet validated) output.
    async fn invoke_agent(&self, role: AgentRole, input: &Value) -> Result<Value, GatewayError>;

    /// Check that credentials are configured before any call is made.
    fn validate_credentials(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}
