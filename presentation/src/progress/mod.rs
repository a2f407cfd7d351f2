//! Progress display while agents work

pub mod reporter;
