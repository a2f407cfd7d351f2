//! Infrastructure layer for interviewer
//!
//! Adapters implementing the ports defined in the application layer: the
//! HTTP agent gateway, the JSON snapshot store and the JSONL transcript
//! logger, plus configuration file loading.

pub mod config;
pub mod gateway;
pub mod logging;
pub mod persistence;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileAgentConfig, FileConfig, FileInterviewConfig, FileLoggingConfig,
    FileOutputConfig, FileOutputFormat, FilePersistenceConfig, FileRetryConfig,
};
pub use gateway::{HttpAgentGateway, HttpGatewayConfig, RetryPolicy};
pub use logging::JsonlConversationLogger;
pub use persistence::JsonFileSessionStore;
