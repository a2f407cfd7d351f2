//! Core domain concepts shared across all subdomains.
//!
//! - [`error::ValidationError`]: rejected local input
//! - [`limits::InputLimits`]: length bounds for free-text input
//! - [`string`]: UTF-8 safe string helpers

pub mod error;
pub mod limits;
pub mod string;
