//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agent;
mod interview;
mod logging;
mod output;
mod persistence;
mod retry;

pub use agent::FileAgentConfig;
pub use interview::FileInterviewConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use persistence::FilePersistenceConfig;
pub use retry::FileRetryConfig;

use interview_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Agent endpoint and model
    pub agent: FileAgentConfig,
    /// Backoff for transient agent failures
    pub retry: FileRetryConfig,
    /// Interview loop settings
    pub interview: FileInterviewConfig,
    /// Snapshot persistence
    pub persistence: FilePersistenceConfig,
    /// Conversation transcript
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Errors make the configuration unusable; warnings are reported and
    /// startup continues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        self.agent.validate(&mut issues);
        self.retry.validate(&mut issues);
        self.interview.validate(&mut issues);
        issues
    }
}
