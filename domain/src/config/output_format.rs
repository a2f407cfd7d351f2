//! Output format value object

use serde::{Deserialize, Serialize};

/// How the final interview report is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Formatted console report with per-topic verdicts (default)
    #[default]
    Full,
    /// JSON report
    Json,
}
