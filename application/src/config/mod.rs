//! Application-level configuration.
//!
//! - [`InterviewParams`]: interview loop control (question budget, summary,
//!   drain timeout, input bounds)

pub mod interview_params;

pub use interview_params::InterviewParams;
