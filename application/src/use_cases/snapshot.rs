//! Snapshot saving shared by the foreground and background paths.

use crate::ports::session_store::SessionStore;
use crate::use_cases::prefetch::{SharedSession, lock};
use interview_domain::{CandidateContext, InterviewSnapshot};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Writes interview snapshots to the session store.
///
/// Saves are serialized, and each one copies the session at the moment it
/// runs, so a later save never carries an older session than an earlier one.
pub(crate) struct SnapshotWriter {
    store: Arc<dyn SessionStore>,
    context: Arc<CandidateContext>,
    /// Question on screen as of the last foreground save.
    question: Mutex<Option<String>>,
}

impl SnapshotWriter {
    pub fn new(store: Arc<dyn SessionStore>, context: Arc<CandidateContext>) -> Self {
        Self {
            store,
            context,
            question: Mutex::new(None),
        }
    }

    /// Save after a foreground operation, recording the question on screen.
    pub fn save(&self, session: &SharedSession, question: Option<String>) {
        let mut current = self.question.lock().unwrap_or_else(PoisonError::into_inner);
        *current = question;
        self.write(session, current.clone());
    }

    /// Save after background work changed the session. The question is the
    /// one recorded by the last foreground save.
    pub fn refresh(&self, session: &SharedSession) {
        let current = self.question.lock().unwrap_or_else(PoisonError::into_inner);
        debug!("Saving snapshot after background update");
        self.write(session, current.clone());
    }

    fn write(&self, session: &SharedSession, question: Option<String>) {
        let session = lock(session).clone();
        let snapshot = InterviewSnapshot::new(self.context.as_ref().clone(), session, question);
        if let Err(e) = self.store.save(&snapshot) {
            warn!("Failed to save interview snapshot: {}", e);
        }
    }
}
