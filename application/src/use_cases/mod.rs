//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod prefetch;
pub mod run_interview;
pub(crate) mod shared;
pub(crate) mod snapshot;

#[cfg(test)]
pub(crate) mod test_support;
