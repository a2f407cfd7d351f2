//! Candidate context shared by every agent call.

use crate::core::error::ValidationError;
use crate::core::limits::InputLimits;
use serde::{Deserialize, Serialize};

/// The free-text inputs an interview is planned from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateContext {
    pub job_description: String,
    pub cv: String,
}

impl CandidateContext {
    pub fn new(job_description: impl Into<String>, cv: impl Into<String>) -> Self {
        Self {
            job_description: job_description.into(),
            cv: cv.into(),
        }
    }

    pub fn validate(&self, limits: &InputLimits) -> Result<(), ValidationError> {
        limits.check_job_description(&self.job_description)?;
        limits.check_cv(&self.cv)
    }
}
