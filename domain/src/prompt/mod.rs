//! Prompt domain
//!
//! System prompts for each agent role of the interview flow.

mod template;

pub use template::PromptTemplate;
