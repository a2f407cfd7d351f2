//! Length bounds for the free-text inputs of an interview.

use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Character-count bounds for job description, CV and answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLimits {
    pub min_job_description_chars: usize,
    pub max_job_description_chars: usize,
    pub min_cv_chars: usize,
    pub max_cv_chars: usize,
    pub max_answer_chars: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            min_job_description_chars: 40,
            max_job_description_chars: 20_000,
            min_cv_chars: 40,
            max_cv_chars: 30_000,
            max_answer_chars: 4_000,
        }
    }
}

impl InputLimits {
    pub fn check_job_description(&self, text: &str) -> Result<(), ValidationError> {
        check_bounds(
            "job description",
            text,
            self.min_job_description_chars,
            self.max_job_description_chars,
        )
    }

    pub fn check_cv(&self, text: &str) -> Result<(), ValidationError> {
        check_bounds("CV", text, self.min_cv_chars, self.max_cv_chars)
    }

    /// Answers only need to be non-blank; the upper bound still applies.
    pub fn check_answer(&self, text: &str) -> Result<(), ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyAnswer);
        }
        check_bounds("answer", text, 1, self.max_answer_chars)
    }
}

fn check_bounds(
    field: &'static str,
    text: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = text.trim().chars().count();
    if len < min {
        return Err(ValidationError::TooShort { field, len, min });
    }
    if len > max {
        return Err(ValidationError::TooLong { field, len, max });
    }
    Ok(())
}
