//! Configuration file loading for interviewer
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `INTERVIEWER_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./interviewer.toml` or `./.interviewer.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/interviewer/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAgentConfig, FileConfig, FileInterviewConfig, FileLoggingConfig, FileOutputConfig,
    FileOutputFormat, FilePersistenceConfig, FileRetryConfig,
};
pub use loader::ConfigLoader;
