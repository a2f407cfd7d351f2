//! Configuration value objects shared across layers.

mod issue;
mod output_format;

pub use issue::{ConfigIssue, Severity};
pub use output_format::OutputFormat;
