//! Agent endpoint configuration from TOML (`[agent]` section)

use interview_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Raw agent endpoint configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Base URL of an OpenAI-compatible API (without `/v1/...`)
    pub base_url: String,
    /// Model name sent with every request
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Inline API key; takes precedence over `api_key_env`
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-request timeout
    pub timeout_seconds: u64,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            temperature: 0.2,
            max_tokens: 2048,
            timeout_seconds: 60,
        }
    }
}

impl FileAgentConfig {
    /// The API key from the inline value or the configured variable.
    /// Blank values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error("agent.model", "model name cannot be empty"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            issues.push(ConfigIssue::error(
                "agent.base_url",
                format!("'{}' is not an http(s) URL", self.base_url),
            ));
        }
        if self.timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                "agent.timeout_seconds",
                "timeout_seconds cannot be 0",
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            issues.push(ConfigIssue::warning(
                "agent.temperature",
                format!("temperature {} is outside 0.0..=2.0", self.temperature),
            ));
        }
        if self.api_key.is_some() {
            issues.push(ConfigIssue::warning(
                "agent.api_key",
                "API key stored in the config file; prefer api_key_env",
            ));
        }
    }
}
