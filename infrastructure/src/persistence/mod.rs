//! Saved-interview storage.

mod json_store;

pub use json_store::JsonFileSessionStore;
