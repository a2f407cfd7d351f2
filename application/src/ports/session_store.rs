//! Session persistence port
//!
//! A key-value style store holding at most one interview snapshot. The
//! orchestrator saves after every state-mutating operation and treats
//! failures as best-effort: they are logged, never fatal.

use interview_domain::InterviewSnapshot;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur while saving or loading a snapshot
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Snapshot encoding error: {0}")]
    Encoding(String),
}

/// Port for snapshot persistence.
pub trait SessionStore: Send + Sync {
    fn save(&self, snapshot: &InterviewSnapshot) -> Result<(), StoreError>;

    /// `Ok(None)` when nothing has been saved.
    fn load(&self) -> Result<Option<InterviewSnapshot>, StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

/// Store that keeps nothing (`--no-persist`).
pub struct NoSessionStore;

impl SessionStore for NoSessionStore {
    fn save(&self, _snapshot: &InterviewSnapshot) -> Result<(), StoreError> {
        Ok(())
    }

    fn load(&self) -> Result<Option<InterviewSnapshot>, StoreError> {
        Ok(None)
    }

    fn clear(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// In-process store. Keeps the serialized JSON so a load goes through the
/// same encoding as a file-backed store.
#[derive(Default)]
pub struct InMemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.lock().map(|s| s.is_none()).unwrap_or(true)
    }
}

impl SessionStore for InMemorySessionStore {
    fn save(&self, snapshot: &InterviewSnapshot) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(snapshot).map_err(|e| StoreError::Encoding(e.to_string()))?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        *slot = Some(json);
        Ok(())
    }

    fn load(&self) -> Result<Option<InterviewSnapshot>, StoreError> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        slot.as_deref()
            .map(|json| serde_json::from_str(json).map_err(|e| StoreError::Encoding(e.to_string())))
            .transpose()
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}
