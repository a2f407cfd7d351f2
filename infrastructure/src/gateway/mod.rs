//! Agent gateway adapter
//!
//! [`HttpAgentGateway`] implements the
//! [`AgentGateway`](interview_application::AgentGateway) port against an
//! OpenAI-compatible chat completions endpoint. Transient failures are
//! retried here with capped exponential backoff; the interview core never
//! retries on its own.

mod http;
mod protocol;
mod retry;

pub use http::{HttpAgentGateway, HttpGatewayConfig};
pub use retry::RetryPolicy;
