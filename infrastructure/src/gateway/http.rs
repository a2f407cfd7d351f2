//! reqwest-backed gateway for OpenAI-compatible chat completions.

use super::protocol::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ErrorResponse, JsonSchemaFormat,
    ResponseFormat,
};
use super::retry::{AttemptError, RetryPolicy, retry_transient};
use crate::config::{FileAgentConfig, FileRetryConfig};
use async_trait::async_trait;
use interview_application::{AgentGateway, GatewayError};
use interview_domain::core::string::truncate;
use interview_domain::{AgentRole, PromptTemplate, extract_json};
use reqwest::StatusCode;
use reqwest::header::{HeaderValue, RETRY_AFTER};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Longest error body kept in a `Permanent` message
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Everything needed to reach the agent endpoint.
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    pub base_url: String,
    pub model: String,
    /// Resolved key; `None` fails `validate_credentials`
    pub api_key: Option<String>,
    /// Name of the variable the key was looked up in, for error messages
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl HttpGatewayConfig {
    pub fn from_file_config(agent: &FileAgentConfig, retry: &FileRetryConfig) -> Self {
        Self {
            base_url: agent.base_url.clone(),
            model: agent.model.clone(),
            api_key: agent.resolve_api_key(),
            api_key_env: agent.api_key_env.clone(),
            temperature: agent.temperature,
            max_tokens: agent.max_tokens,
            timeout: Duration::from_secs(agent.timeout_seconds),
            retry: retry.to_policy(),
        }
    }
}

/// Gateway calling one chat completions endpoint for all three roles.
///
/// Each role sends its fixed system prompt, the JSON input as the user
/// message, and its output schema as a `json_schema` response format.
pub struct HttpAgentGateway {
    client: reqwest::Client,
    endpoint: String,
    config: HttpGatewayConfig,
}

impl HttpAgentGateway {
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Permanent(format!("Failed to build HTTP client: {e}")))?;
        let endpoint = format!(
            "{}/v1/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        info!("Agent gateway: {} (model {})", endpoint, config.model);

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, role: AgentRole, input: &Value) -> ChatCompletionRequest {
        let user = serde_json::to_string_pretty(input).unwrap_or_else(|_| input.to_string());
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: PromptTemplate::system(role).to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: role.schema_name(),
                    schema: role.output_schema(),
                    strict: false,
                },
            },
        }
    }

    async fn attempt(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<Value, AttemptError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers().get(RETRY_AFTER));
        let body = response
            .text()
            .await
            .map_err(classify_transport_error)?;

        if !status.is_success() {
            return Err(AttemptError {
                error: map_http_error(status, &body),
                retry_after,
            });
        }
        parse_completion(&body).map_err(AttemptError::from)
    }
}

#[async_trait]
impl AgentGateway for HttpAgentGateway {
    async fn invoke_agent(&self, role: AgentRole, input: &Value) -> Result<Value, GatewayError> {
        self.validate_credentials()?;
        let api_key = self.config.api_key.as_deref().unwrap_or_default();
        let request = &self.build_request(role, input);

        debug!(role = %role, "Calling agent");
        retry_transient(&self.config.retry, role, move || self.attempt(api_key, request)).await
    }

    fn validate_credentials(&self) -> Result<(), GatewayError> {
        match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(GatewayError::MissingCredentials(format!(
                "No API key found; set {} or agent.api_key",
                self.config.api_key_env
            ))),
        }
    }
}

/// Network-level failures never reached the server's logic. A request
/// that could not be built fails the same way on every attempt.
fn classify_transport_error(e: reqwest::Error) -> AttemptError {
    let error = if e.is_builder() {
        GatewayError::Permanent(format!("Invalid request: {e}"))
    } else if e.is_connect() || e.is_timeout() || e.is_body() {
        GatewayError::Transient(format!("Network error: {e}"))
    } else {
        GatewayError::Permanent(format!("HTTP error: {e}"))
    };
    error.into()
}

fn map_http_error(status: StatusCode, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| truncate(body, MAX_ERROR_BODY_CHARS));
    let message = format!("HTTP {}: {}", status.as_u16(), message);

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        GatewayError::Transient(message)
    } else {
        GatewayError::Permanent(message)
    }
}

/// Only the delta-seconds form is understood.
fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Pull the agent's JSON object out of a completion body.
fn parse_completion(body: &str) -> Result<Value, GatewayError> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::Permanent(format!("Malformed completion response: {e}")))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| GatewayError::Permanent("Completion has no message content".into()))?;

    extract_json(&content).ok_or_else(|| {
        GatewayError::Permanent(format!(
            "Agent reply is not JSON: {}",
            truncate(&content, MAX_ERROR_BODY_CHARS)
        ))
    })
}
