//! Presentation-level configuration
//!
//! Resolved settings for report output and the answer prompt, built by the
//! binary from the file config and CLI flags.

use interview_domain::OutputFormat;
use std::path::PathBuf;

/// How the final report is rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Full,
            color: true,
        }
    }
}

/// Settings of the interactive answer prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    /// Show spinners while agents work
    pub show_progress: bool,
    /// Where answer history is kept; `None` disables history
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: dirs::data_dir().map(|p| p.join("interviewer").join("history.txt")),
        }
    }
}

impl ReplConfig {
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn without_history(mut self) -> Self {
        self.history_file = None;
        self
    }
}
