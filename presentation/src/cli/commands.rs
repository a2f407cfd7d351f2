//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How the final report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Formatted report with per-topic verdicts and the summary
    Full,
    /// JSON report
    Json,
}

impl From<OutputFormat> for interview_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => interview_domain::OutputFormat::Full,
            OutputFormat::Json => interview_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for interviewer
#[derive(Parser, Debug)]
#[command(name = "interviewer")]
#[command(author, version, about = "Multi-topic technical interviewer driven by LLM agents")]
#[command(long_about = r#"
Interviewer plans a set of topics from a job description and a CV, then
interviews the candidate one topic at a time.

Each topic gets a few questions; when its budget is spent the topic receives
a verdict and the next topic begins. The opening question of the next topic
is prepared in the background so moving on does not wait for the agent.

Configuration files are loaded from (in priority order):
1. --config <path>                         Explicit config file
2. ./interviewer.toml                      Project-level config
3. ~/.config/interviewer/config.toml       Global config

Example:
  interviewer --job-description jd.md --cv cv.md
  interviewer --job-description jd.md --cv cv.md --max-questions 2 --output json
  interviewer --resume
"#)]
pub struct Cli {
    /// File containing the job description
    #[arg(short, long, value_name = "PATH", required_unless_present_any = ["resume", "show_config"], requires = "cv")]
    pub job_description: Option<PathBuf>,

    /// File containing the candidate's CV
    #[arg(long, value_name = "PATH", requires = "job_description")]
    pub cv: Option<PathBuf>,

    /// Continue the interview saved by a previous run
    #[arg(long, conflicts_with_all = ["job_description", "cv"])]
    pub resume: bool,

    /// Questions per topic before its verdict is requested
    #[arg(long, value_name = "N")]
    pub max_questions: Option<usize>,

    /// Skip the final summary
    #[arg(long)]
    pub no_summary: bool,

    /// Model name sent to the agent endpoint
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Do not save the interview for --resume
    #[arg(long)]
    pub no_persist: bool,

    /// Output format of the final report
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostic logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Append the interview transcript (JSONL) to this file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,
}
