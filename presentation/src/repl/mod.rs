//! Interactive answer prompt
//!
//! Provides a readline-based loop that feeds candidate answers to the
//! interview orchestrator.

mod command;
mod interview;

pub use command::ReplCommand;
pub use interview::InterviewRepl;
