//! Interview snapshot stored as a pretty-printed JSON file.
//!
//! Writes go to a sibling `*.tmp` file which is synced and then renamed over
//! the target, so a crash mid-save leaves the previous snapshot intact.

use interview_application::{SessionStore, StoreError};
use interview_domain::InterviewSnapshot;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct JsonFileSessionStore {
    path: PathBuf,
}

impl JsonFileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn io_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io(format!("{}: {}", path.display(), e))
}

impl SessionStore for JsonFileSessionStore {
    fn save(&self, snapshot: &InterviewSnapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| StoreError::Encoding(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let tmp = self.tmp_path();
        {
            let mut file = File::create(&tmp).map_err(|e| io_error(&tmp, e))?;
            file.write_all(json.as_bytes())
                .and_then(|_| file.sync_all())
                .map_err(|e| io_error(&tmp, e))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| io_error(&self.path, e))?;

        debug!("Saved interview to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<InterviewSnapshot>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&self.path, e)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Encoding(format!("{}: {}", self.path.display(), e)))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&self.path, e)),
        }
    }
}
