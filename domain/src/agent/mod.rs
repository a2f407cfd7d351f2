//! Agent contracts.
//!
//! Every remote call goes to one of three agent roles. Their raw JSON output
//! is checked by the validation layer and converted into tagged-union
//! response types before the orchestration sees it.
//!
//! - [`role::AgentRole`]: Planner, TopicAgent, FinalSummary
//! - [`input`]: request payloads per role
//! - [`response`]: typed outputs (`TopicTurn::Ask` / `TopicTurn::Final`, ...)
//! - [`validation`]: per-role output checks with field-level diagnostics
//! - [`schema`]: JSON schemas sent to the endpoint as response format
//! - [`parsing`]: extraction of the JSON document from model text

pub mod input;
pub mod parsing;
pub mod response;
pub mod role;
pub mod schema;
pub mod validation;
