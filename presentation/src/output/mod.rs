//! Report and question rendering

pub mod console;
pub mod formatter;
