//! Background work of a running interview.
//!
//! Two kinds of speculative tasks run while the candidate is typing:
//!
//! - **Prefetch**: the opening question of an upcoming topic, generated
//!   before the cursor gets there and parked in the session's prefetch
//!   slot. Failures are logged and forgotten; the foreground path simply
//!   falls back to a synchronous call.
//! - **Closing verdict**: when a cached opening question lets the cursor
//!   move on immediately, the verdict of the topic being left is computed
//!   in the background and written to the index captured at launch.
//!
//! Closing verdicts are tracked until [`PrefetchManager::drain`] collects
//! them at the end of the interview.

use crate::ports::agent_gateway::AgentGateway;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::progress::InterviewProgressNotifier;
use crate::use_cases::shared::{self, TopicRequest};
use crate::use_cases::snapshot::SnapshotWriter;
use interview_domain::{CandidateContext, PrefetchEntry, TopicSessionState};
use serde::Serialize;
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Session shared between the foreground operation and background tasks.
///
/// Only ever locked for synchronous reads and writes, never across an
/// `.await`.
pub(crate) type SharedSession = Arc<Mutex<TopicSessionState>>;

pub(crate) fn lock(session: &SharedSession) -> MutexGuard<'_, TopicSessionState> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Outcome of waiting for background verdicts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Verdicts written to the session
    pub completed: usize,
    /// Verdict calls that failed; their topics are retried at the end
    pub failed: usize,
    /// Verdict calls cancelled because the drain timeout elapsed
    pub timed_out: usize,
}

/// Result of one background closing verdict.
struct VerdictOutcome {
    topic_index: usize,
    result: Result<(), String>,
}

/// Owns the background tasks of one interview.
pub(crate) struct PrefetchManager<G: AgentGateway + 'static> {
    gateway: Arc<G>,
    context: Arc<CandidateContext>,
    session: SharedSession,
    progress: Arc<dyn InterviewProgressNotifier>,
    logger: Arc<dyn ConversationLogger>,
    snapshots: Arc<SnapshotWriter>,
    cancel: CancellationToken,
    /// Topics with a prefetch running or delivered. A failed prefetch is
    /// removed when reaped so the topic can be fetched again.
    launched: HashSet<usize>,
    /// Each task yields its topic index and whether an entry was obtained.
    prefetches: JoinSet<(usize, bool)>,
    verdicts: JoinSet<VerdictOutcome>,
}

impl<G: AgentGateway + 'static> PrefetchManager<G> {
    pub fn new(
        gateway: Arc<G>,
        context: Arc<CandidateContext>,
        session: SharedSession,
        progress: Arc<dyn InterviewProgressNotifier>,
        logger: Arc<dyn ConversationLogger>,
        snapshots: Arc<SnapshotWriter>,
    ) -> Self {
        Self {
            gateway,
            context,
            session,
            progress,
            logger,
            snapshots,
            cancel: CancellationToken::new(),
            launched: HashSet::new(),
            prefetches: JoinSet::new(),
            verdicts: JoinSet::new(),
        }
    }

    /// Start generating the opening question of `index` in the background.
    ///
    /// At most one prefetch is launched per topic. Out-of-range indices and
    /// topics that have already begun are ignored.
    pub fn prefetch_opening(&mut self, index: usize) {
        self.reap_prefetches();

        let request = {
            let session = lock(&self.session);
            if index <= session.current_topic_index() || session.has_prefetch(index) {
                return;
            }
            match TopicRequest::opening(&session, index) {
                Some(request) => request,
                None => return,
            }
        };
        if !self.launched.insert(index) {
            return;
        }

        debug!(topic = index, "Prefetching opening question");
        let gateway = Arc::clone(&self.gateway);
        let context = Arc::clone(&self.context);
        let session = Arc::clone(&self.session);
        let progress = Arc::clone(&self.progress);
        let logger = Arc::clone(&self.logger);
        let cancel = self.cancel.clone();

        self.prefetches.spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return (index, false),
                result = shared::opening_question(gateway.as_ref(), &context, &request) => result,
            };

            match result {
                Ok((question, raw)) => {
                    let stored = lock(&session).store_prefetch(PrefetchEntry::new(
                        index,
                        question.clone(),
                        raw,
                    ));
                    if stored {
                        info!(topic = index, "Prefetched opening question stored");
                        logger.log(ConversationEvent::new(
                            "prefetch_stored",
                            json!({ "topic_index": index, "question": question }),
                        ));
                        progress.on_prefetch_ready(index);
                    } else {
                        debug!(topic = index, "Topic already begun, prefetch discarded");
                    }
                    (index, true)
                }
                Err(e) => {
                    warn!(topic = index, "Prefetch failed: {}", e);
                    (index, false)
                }
            }
        });
    }

    /// Collect finished prefetch tasks, forgetting the topics whose prefetch
    /// failed.
    fn reap_prefetches(&mut self) {
        while let Some(joined) = self.prefetches.try_join_next() {
            match joined {
                Ok((index, false)) => {
                    self.launched.remove(&index);
                }
                Ok((_, true)) => {}
                Err(e) if e.is_panic() => warn!("Prefetch task panicked: {}", e),
                Err(_) => {}
            }
        }
    }

    /// Remove and return the cached opening question for `index`.
    pub fn take(&mut self, index: usize) -> Option<PrefetchEntry> {
        let entry = lock(&self.session).take_prefetch(index)?;
        self.logger.log(ConversationEvent::new(
            "prefetch_consumed",
            json!({ "topic_index": index, "question": entry.question_text }),
        ));
        Some(entry)
    }

    /// Compute the closing verdict of `index` in the background.
    ///
    /// The history is captured now and the verdict is written to `index`
    /// whatever the cursor has moved to by the time it arrives.
    pub fn spawn_closing_verdict(&mut self, index: usize) {
        let Some(request) = TopicRequest::capture(&lock(&self.session), index) else {
            return;
        };

        info!(topic = index, "Closing verdict moved to background");
        let gateway = Arc::clone(&self.gateway);
        let context = Arc::clone(&self.context);
        let session = Arc::clone(&self.session);
        let progress = Arc::clone(&self.progress);
        let logger = Arc::clone(&self.logger);
        let snapshots = Arc::clone(&self.snapshots);
        let cancel = self.cancel.clone();

        self.verdicts.spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err("cancelled".to_string()),
                result = shared::closing_verdict(gateway.as_ref(), &context, &request) => {
                    result.map_err(|e| e.to_string())
                }
            };

            let result = result.and_then(|verdict| {
                let recorded = lock(&session).record_verdict(verdict.clone(), Some(index));
                recorded.map_err(|e| e.to_string())?;
                snapshots.refresh(&session);
                logger.log(ConversationEvent::new(
                    "background_verdict",
                    json!({ "topic_index": index, "verdict": verdict }),
                ));
                progress.on_topic_completed(index, &verdict);
                Ok(())
            });

            progress.on_background_verdict(index, result.is_ok());
            VerdictOutcome {
                topic_index: index,
                result,
            }
        });
    }

    /// Number of background verdicts not yet collected.
    pub fn pending_verdicts(&self) -> usize {
        self.verdicts.len()
    }

    /// Wait for every outstanding background verdict.
    ///
    /// With a timeout, verdicts still running when it elapses are aborted
    /// and counted as timed out; their topics are left without a verdict.
    pub async fn drain(&mut self, timeout: Option<Duration>) -> DrainReport {
        let mut report = DrainReport::default();
        if self.verdicts.is_empty() {
            return report;
        }

        info!("Waiting for {} background verdict(s)", self.verdicts.len());
        let deadline = timeout.map(|t| Instant::now() + t);

        loop {
            let next = match deadline {
                Some(deadline) => {
                    match tokio::time::timeout_at(deadline, self.verdicts.join_next()).await {
                        Ok(next) => next,
                        Err(_) => {
                            report.timed_out = self.verdicts.len();
                            warn!(
                                "Drain timed out, cancelling {} background verdict(s)",
                                report.timed_out
                            );
                            self.verdicts.shutdown().await;
                            break;
                        }
                    }
                }
                None => self.verdicts.join_next().await,
            };

            let Some(joined) = next else {
                break;
            };

            match joined {
                Ok(VerdictOutcome {
                    result: Ok(()),
                    topic_index,
                }) => {
                    debug!(topic = topic_index, "Background verdict collected");
                    report.completed += 1;
                }
                Ok(VerdictOutcome {
                    result: Err(e),
                    topic_index,
                }) => {
                    warn!(topic = topic_index, "Background verdict failed: {}", e);
                    report.failed += 1;
                }
                Err(e) => {
                    warn!("Background verdict task panicked: {}", e);
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Abort outstanding prefetches and empty the prefetch slots.
    pub fn discard_prefetches(&mut self) {
        self.prefetches.abort_all();
        lock(&self.session).clear_prefetches();
    }

    /// Cancel every background task and wait for them to stop.
    pub async fn shutdown(&mut self) {
        self.cancel.cancel();
        self.prefetches.shutdown().await;
        self.verdicts.shutdown().await;
    }
}
