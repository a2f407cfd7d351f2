//! Conversation transcript logging.
//!
//! [`JsonlConversationLogger`] appends interview events to a JSONL file and
//! implements the [`ConversationLogger`](interview_application::ConversationLogger)
//! port.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
