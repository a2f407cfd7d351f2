//! Presentation layer for interviewer
//!
//! This crate contains CLI definitions, the interactive answer prompt,
//! output formatters and progress reporters.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;
pub mod repl;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use config::{OutputConfig, ReplConfig};
pub use output::console::ConsoleFormatter;
pub use output::formatter::ReportFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use repl::{InterviewRepl, ReplCommand};
