//! Persistence configuration from TOML (`[persistence]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw persistence configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePersistenceConfig {
    /// Save a snapshot after every answer so `--resume` can continue
    pub enabled: bool,
    /// Snapshot file; defaults to `<data_dir>/interviewer/session.json`
    pub path: Option<String>,
}

impl Default for FilePersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl FilePersistenceConfig {
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match &self.path {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::default_path(),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("interviewer").join("session.json"))
    }
}
