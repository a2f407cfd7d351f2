//! Run Interview use case
//!
//! Drives one interview from planning to the final report:
//!
//! | Operation       | Allowed in      | Agent calls                           |
//! |-----------------|-----------------|---------------------------------------|
//! | `start`         | Idle            | Planner, opening question of topic 0  |
//! | `submit_answer` | AwaitingAnswer  | follow-up, or verdict + next opening  |
//! | `retry`         | AwaitingAnswer  | whatever the failed transition needed |
//! | `end`           | AwaitingAnswer  | fallback verdicts, FinalSummary       |
//! | `abandon`       | any             | none                                  |
//! | `resume`        | Idle            | only if the snapshot lacks a question |
//!
//! At most one operation runs at a time; a second caller fails fast with
//! [`InterviewError::Concurrency`] instead of queueing. Speculative work
//! (prefetched opening questions, background closing verdicts) is owned by
//! the per-interview [`PrefetchManager`].

mod ending;
mod transition;
mod types;

pub use types::{
    CurrentQuestion, InterviewError, InterviewPhase, InterviewReport, InterviewStatus,
    SubmitOutcome, TopicReport,
};

use crate::config::InterviewParams;
use crate::ports::agent_gateway::AgentGateway;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{InterviewProgressNotifier, NoProgress};
use crate::ports::session_store::SessionStore;
use crate::use_cases::prefetch::{PrefetchManager, SharedSession, lock};
use crate::use_cases::shared::{self, AgentCallError, TopicRequest};
use crate::use_cases::snapshot::SnapshotWriter;
use interview_domain::{
    AgentRole, CandidateContext, InterviewSnapshot, TopicSessionState, ValidationError,
};
use serde_json::json;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// State of the interview currently in progress.
pub(super) struct LiveInterview<G: AgentGateway + 'static> {
    pub(super) context: Arc<CandidateContext>,
    pub(super) session: SharedSession,
    /// Question on screen; `None` between recording an answer and producing
    /// the next question.
    pub(super) current_question: Option<String>,
    pub(super) prefetch: PrefetchManager<G>,
    pub(super) snapshots: Arc<SnapshotWriter>,
    /// An answer was recorded but the transition after it has not succeeded.
    pub(super) awaiting_transition: bool,
}

/// Clears the busy flag when the operation holding it returns.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, InterviewError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| InterviewError::Concurrency)?;
        Ok(Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Use case for running an interview
pub struct InterviewOrchestrator<G: AgentGateway + 'static> {
    pub(super) gateway: Arc<G>,
    pub(super) store: Arc<dyn SessionStore>,
    pub(super) progress: Arc<dyn InterviewProgressNotifier>,
    pub(super) conversation_logger: Arc<dyn ConversationLogger>,
    pub(super) params: InterviewParams,
    busy: AtomicBool,
    phase: Mutex<InterviewPhase>,
    live: tokio::sync::Mutex<Option<LiveInterview<G>>>,
}

impl<G: AgentGateway + 'static> InterviewOrchestrator<G> {
    pub fn new(gateway: Arc<G>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            gateway,
            store,
            progress: Arc::new(NoProgress),
            conversation_logger: Arc::new(NoConversationLogger),
            params: InterviewParams::default(),
            busy: AtomicBool::new(false),
            phase: Mutex::new(InterviewPhase::Idle),
            live: tokio::sync::Mutex::new(None),
        }
    }

    pub fn with_params(mut self, params: InterviewParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn InterviewProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn params(&self) -> &InterviewParams {
        &self.params
    }

    pub fn phase(&self) -> InterviewPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn set_phase(&self, phase: InterviewPhase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    fn require_phase(
        &self,
        operation: &'static str,
        expected: InterviewPhase,
    ) -> Result<(), InterviewError> {
        let phase = self.phase();
        if phase != expected {
            return Err(InterviewError::InvalidState { operation, phase });
        }
        Ok(())
    }

    /// Snapshot of the running interview, or `None` when idle or while an
    /// operation holds the interview.
    pub fn status(&self) -> Option<InterviewStatus> {
        let slot = self.live.try_lock().ok()?;
        let live = slot.as_ref()?;
        let session = lock(&live.session).clone();
        Some(InterviewStatus {
            phase: self.phase(),
            session,
            current_question: live.current_question.clone(),
            pending_background_verdicts: live.prefetch.pending_verdicts(),
        })
    }

    // ==================== Operations ====================

    /// Plan the topics and return the opening question of the first one.
    pub async fn start(&self, context: CandidateContext) -> Result<CurrentQuestion, InterviewError> {
        let _busy = BusyGuard::acquire(&self.busy)?;
        self.require_phase("start an interview", InterviewPhase::Idle)?;

        context.validate(&self.params.limits)?;
        if self.params.max_questions_per_topic == 0 {
            return Err(ValidationError::ZeroQuestionLimit.into());
        }
        self.gateway.validate_credentials()?;

        self.set_phase(InterviewPhase::Planning);
        self.conversation_logger.log(ConversationEvent::new(
            "interview_started",
            json!({
                "job_description_chars": context.job_description.chars().count(),
                "cv_chars": context.cv.chars().count(),
                "max_questions_per_topic": self.params.max_questions_per_topic,
            }),
        ));

        match self.plan_and_open(context).await {
            Ok(question) => {
                self.set_phase(InterviewPhase::AwaitingAnswer);
                Ok(question)
            }
            Err(e) => {
                warn!("Interview could not start: {}", e);
                self.set_phase(InterviewPhase::Idle);
                Err(e)
            }
        }
    }

    async fn plan_and_open(
        &self,
        context: CandidateContext,
    ) -> Result<CurrentQuestion, InterviewError> {
        let plan = self
            .tracked(
                AgentRole::Planner,
                None,
                shared::plan_topics(self.gateway.as_ref(), &context),
            )
            .await?;

        info!("Planned {} topic(s)", plan.topics.len());
        self.progress.on_topics_planned(&plan.topics);
        self.conversation_logger.log(ConversationEvent::new(
            "topics_planned",
            json!({ "topics": plan.topics }),
        ));

        let session = TopicSessionState::initialize(
            plan.topics,
            self.params.max_questions_per_topic,
            self.params.enable_final_summary,
        )?;
        let request = TopicRequest::opening(&session, 0).ok_or(ValidationError::EmptyTopics)?;
        let (text, _) = self
            .tracked(
                AgentRole::TopicAgent,
                Some(request.topic.name.as_str()),
                shared::opening_question(self.gateway.as_ref(), &context, &request),
            )
            .await?;

        let question = CurrentQuestion::from_session(&session, text.clone(), false);
        let mut live = self.new_live(Arc::new(context), session, Some(text));

        self.announce_topic(&live, 0);
        self.log_question(&question);
        self.persist(&live);
        live.prefetch.prefetch_opening(1);

        *self.live.lock().await = Some(live);
        Ok(question)
    }

    /// Record an answer to the current question and move on.
    ///
    /// The answer is persisted before any agent call. If the following
    /// call fails, the answer stays recorded and [`retry`](Self::retry)
    /// resumes from there.
    pub async fn submit_answer(&self, answer: &str) -> Result<SubmitOutcome, InterviewError> {
        let _busy = BusyGuard::acquire(&self.busy)?;
        self.require_phase("submit an answer", InterviewPhase::AwaitingAnswer)?;
        self.params.limits.check_answer(answer)?;

        let mut slot = self.live.lock().await;
        let Some(live) = slot.as_mut() else {
            return Err(self.no_interview("submit an answer"));
        };
        if live.awaiting_transition {
            return Err(InterviewError::RetryPending);
        }

        let question = live.current_question.take().unwrap_or_default();
        let answer = answer.trim();
        let index = lock(&live.session).record_answer(question.clone(), answer)?;
        live.awaiting_transition = true;

        self.conversation_logger.log(ConversationEvent::new(
            "answer_recorded",
            json!({ "topic_index": index, "question": question, "answer": answer }),
        ));
        self.persist(live);

        self.run_transition(slot).await
    }

    /// Re-run the transition that failed after the last recorded answer.
    pub async fn retry(&self) -> Result<SubmitOutcome, InterviewError> {
        let _busy = BusyGuard::acquire(&self.busy)?;
        self.require_phase("retry", InterviewPhase::AwaitingAnswer)?;

        let slot = self.live.lock().await;
        if !slot.as_ref().is_some_and(|live| live.awaiting_transition) {
            return Err(InterviewError::NothingToRetry);
        }
        info!("Retrying transition after recorded answer");
        self.run_transition(slot).await
    }

    /// Finish the interview now, producing verdicts for whatever was covered.
    pub async fn end(&self) -> Result<InterviewReport, InterviewError> {
        let _busy = BusyGuard::acquire(&self.busy)?;
        self.require_phase("end the interview", InterviewPhase::AwaitingAnswer)?;

        let live = self.live.lock().await.take();
        match live {
            Some(live) => Ok(self.finish(live).await),
            None => Err(self.no_interview("end the interview")),
        }
    }

    /// Drop the interview without a report and delete the saved snapshot.
    pub async fn abandon(&self) -> Result<(), InterviewError> {
        let _busy = BusyGuard::acquire(&self.busy)?;

        let live = self.live.lock().await.take();
        if let Some(mut live) = live {
            live.prefetch.shutdown().await;
            let answered: usize = lock(&live.session)
                .topic_states()
                .iter()
                .map(|s| s.questions_asked())
                .sum();
            info!("Interview abandoned after {} answer(s)", answered);
            self.conversation_logger.log(ConversationEvent::new(
                "interview_abandoned",
                json!({ "answers": answered }),
            ));
        }
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear saved interview: {}", e);
        }
        self.set_phase(InterviewPhase::Idle);
        Ok(())
    }

    /// Continue an interview from the saved snapshot.
    ///
    /// Background work is not part of the snapshot: prefetches are
    /// relaunched and topics whose background verdict was lost get a
    /// fallback verdict when the interview ends.
    pub async fn resume(&self) -> Result<SubmitOutcome, InterviewError> {
        let _busy = BusyGuard::acquire(&self.busy)?;
        self.require_phase("resume", InterviewPhase::Idle)?;

        let snapshot = self.store.load()?.ok_or(InterviewError::NothingToResume)?;
        self.gateway.validate_credentials()?;

        let InterviewSnapshot {
            context,
            session,
            current_question,
            ..
        } = snapshot;
        info!(
            "Resuming interview at topic {}/{}",
            session.current_topic_index() + 1,
            session.len()
        );
        self.conversation_logger.log(ConversationEvent::new(
            "interview_resumed",
            json!({
                "topic_index": session.current_topic_index(),
                "pending_question": current_question.is_some(),
            }),
        ));

        let current_done = session.current_topic_state().is_some_and(|s| s.is_done());
        let mut slot = self.live.lock().await;
        let live = slot.insert(self.new_live(Arc::new(context), session, current_question));

        if let Some(text) = live.current_question.clone() {
            let question = CurrentQuestion::from_session(&lock(&live.session), text, false);
            let next = question.topic_index + 1;
            live.prefetch.prefetch_opening(next);
            self.set_phase(InterviewPhase::AwaitingAnswer);
            return Ok(SubmitOutcome::NextQuestion(question));
        }

        if current_done {
            // Last verdict was recorded but the report never produced.
            let live = slot.take();
            return match live {
                Some(live) => Ok(SubmitOutcome::Finished(self.finish(live).await)),
                None => Err(self.no_interview("resume")),
            };
        }

        live.awaiting_transition = true;
        self.run_transition(slot).await
    }

    // ==================== Helpers ====================

    fn new_live(
        &self,
        context: Arc<CandidateContext>,
        session: TopicSessionState,
        current_question: Option<String>,
    ) -> LiveInterview<G> {
        let session: SharedSession = Arc::new(Mutex::new(session));
        let snapshots = Arc::new(SnapshotWriter::new(
            Arc::clone(&self.store),
            Arc::clone(&context),
        ));
        let prefetch = PrefetchManager::new(
            Arc::clone(&self.gateway),
            Arc::clone(&context),
            Arc::clone(&session),
            Arc::clone(&self.progress),
            Arc::clone(&self.conversation_logger),
            Arc::clone(&snapshots),
        );
        LiveInterview {
            context,
            session,
            current_question,
            prefetch,
            snapshots,
            awaiting_transition: false,
        }
    }

    /// Run a foreground agent call with progress notifications.
    pub(super) async fn tracked<T>(
        &self,
        role: AgentRole,
        topic: Option<&str>,
        call: impl Future<Output = Result<T, AgentCallError>>,
    ) -> Result<T, AgentCallError> {
        self.progress.on_agent_call_start(role, topic);
        let result = call.await;
        self.progress.on_agent_call_end(role, result.is_ok());
        result
    }

    /// Save a snapshot. Failures are logged and otherwise ignored.
    pub(super) fn persist(&self, live: &LiveInterview<G>) {
        live.snapshots.save(&live.session, live.current_question.clone());
    }

    pub(super) fn announce_topic(&self, live: &LiveInterview<G>, index: usize) {
        let topic = lock(&live.session).topic(index).cloned();
        if let Some(topic) = topic {
            info!(topic = index, "Topic started: {}", topic.name);
            self.progress.on_topic_started(index, &topic);
        }
    }

    pub(super) fn log_question(&self, question: &CurrentQuestion) {
        self.conversation_logger.log(ConversationEvent::new(
            "question_asked",
            json!({
                "topic_index": question.topic_index,
                "question_number": question.question_number,
                "question": question.text,
                "from_prefetch": question.from_prefetch,
            }),
        ));
    }

    fn no_interview(&self, operation: &'static str) -> InterviewError {
        InterviewError::InvalidState {
            operation,
            phase: self.phase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::agent_gateway::GatewayError;
    use crate::ports::session_store::InMemorySessionStore;
    use crate::use_cases::test_support::*;
    use interview_domain::TopicStatus;
    use serde_json::Value;
    use std::time::Duration;

    fn orchestrator(
        gateway: Arc<MockGateway>,
        max_questions: usize,
    ) -> InterviewOrchestrator<MockGateway> {
        InterviewOrchestrator::new(gateway, Arc::new(InMemorySessionStore::new())).with_params(
            InterviewParams::default().with_max_questions_per_topic(max_questions),
        )
    }

    async fn session_of(orch: &InterviewOrchestrator<MockGateway>) -> SharedSession {
        let slot = orch.live.lock().await;
        Arc::clone(&slot.as_ref().unwrap().session)
    }

    fn next_question(outcome: SubmitOutcome) -> CurrentQuestion {
        match outcome {
            SubmitOutcome::NextQuestion(q) => q,
            SubmitOutcome::Finished(_) => panic!("expected another question"),
        }
    }

    fn finished(outcome: SubmitOutcome) -> InterviewReport {
        match outcome {
            SubmitOutcome::Finished(report) => report,
            SubmitOutcome::NextQuestion(q) => panic!("expected the end, got {:?}", q),
        }
    }

    #[tokio::test]
    async fn test_start_asks_first_topic_and_prefetches_second() {
        let gateway = Arc::new(MockGateway::scripted(3));
        let orch = orchestrator(gateway.clone(), 2);

        let q = orch.start(context()).await.unwrap();
        assert_eq!(q.topic_index, 0);
        assert_eq!(q.total_topics, 3);
        assert_eq!(q.question_number, 1);
        assert_eq!(q.text, "T0 opening");
        assert!(!q.from_prefetch);
        assert_eq!(orch.phase(), InterviewPhase::AwaitingAnswer);

        let session = session_of(&orch).await;
        wait_until(|| lock(&session).has_prefetch(1)).await;
        assert_eq!(gateway.count(AgentRole::Planner, None, None), 1);
    }

    #[tokio::test]
    async fn test_two_topic_interview_end_to_end() {
        let gateway = Arc::new(MockGateway::scripted(2));
        let orch = orchestrator(gateway.clone(), 2);

        orch.start(context()).await.unwrap();
        let session = session_of(&orch).await;
        wait_until(|| lock(&session).has_prefetch(1)).await;

        let q = next_question(orch.submit_answer("Tokio runtime internals").await.unwrap());
        assert_eq!(q.text, "T0 follow-up 1");
        assert_eq!(q.question_number, 2);

        let q = next_question(orch.submit_answer("Work stealing").await.unwrap());
        assert_eq!(q.topic_index, 1);
        assert_eq!(q.text, "T1 opening");
        assert!(q.from_prefetch);
        assert!(!lock(&session).has_prefetch(1));

        let q = next_question(orch.submit_answer("Indexes").await.unwrap());
        assert_eq!(q.text, "T1 follow-up 1");

        let report = finished(orch.submit_answer("MVCC").await.unwrap());
        assert_eq!(report.verdicts().count(), 2);
        assert!(report.incomplete.is_empty());
        assert!(report.summary.is_some());
        assert_eq!(report.drain.completed, 1);
        assert!(report.topics.iter().all(|t| t.questions_asked == 2));
        assert_eq!(orch.phase(), InterviewPhase::Idle);
        assert!(orch.status().is_none());
    }

    #[tokio::test]
    async fn test_transcript_follows_the_prefetch_handoff() {
        let gateway = Arc::new(MockGateway::scripted(2));
        let logger = Arc::new(RecordingLogger::default());
        let orch = orchestrator(gateway, 1).with_conversation_logger(logger.clone());

        orch.start(context()).await.unwrap();
        let session = session_of(&orch).await;
        wait_until(|| lock(&session).has_prefetch(1)).await;

        next_question(orch.submit_answer("Borrow checker").await.unwrap());
        finished(orch.submit_answer("Query planner").await.unwrap());

        let kinds = logger.kinds();
        let position = |kind: &str| kinds.iter().position(|k| *k == kind).unwrap();
        assert_eq!(kinds.first(), Some(&"interview_started"));
        assert_eq!(kinds.last(), Some(&"interview_ended"));
        assert!(position("topics_planned") < position("prefetch_stored"));
        assert!(position("prefetch_consumed") < position("summary_generated"));
        assert_eq!(logger.of_kind("answer_recorded").len(), 2);
        assert_eq!(logger.of_kind("question_asked").len(), 2);
        assert_eq!(logger.of_kind("background_verdict").len(), 1);
        assert_eq!(logger.of_kind("verdict_recorded").len(), 1);
    }

    #[tokio::test]
    async fn test_background_verdict_lands_on_captured_topic() {
        let gateway = Arc::new(MockGateway::scripted(3));
        let (entered, release) = gateway.gate(AgentRole::TopicAgent, Some("close"), Some(0));
        let orch = orchestrator(gateway.clone(), 1);

        orch.start(context()).await.unwrap();
        let session = session_of(&orch).await;
        wait_until(|| lock(&session).has_prefetch(1)).await;

        let q = next_question(orch.submit_answer("first").await.unwrap());
        assert_eq!(q.topic_index, 1);
        assert!(q.from_prefetch);
        entered.notified().await;

        wait_until(|| lock(&session).has_prefetch(2)).await;
        let q = next_question(orch.submit_answer("second").await.unwrap());
        assert_eq!(q.topic_index, 2);
        assert!(lock(&session).topic_state(0).unwrap().verdict.is_none());

        release.notify_one();
        wait_until(|| lock(&session).topic_state(0).unwrap().is_done()).await;

        let s = lock(&session);
        assert_eq!(s.current_topic_index(), 2);
        assert_eq!(
            s.topic_state(0).unwrap().verdict.as_ref().unwrap().name,
            "Topic 0"
        );
        assert!(s.topic_state(2).unwrap().verdict.is_none());
        assert_eq!(s.topic_state(2).unwrap().status, TopicStatus::NotStarted);
    }

    #[tokio::test]
    async fn test_close_without_prefetch_requests_verdict_and_opening_together() {
        let gateway = Arc::new(MockGateway::scripted(2));
        let (entered, release) = gateway.gate(AgentRole::TopicAgent, Some("open"), Some(1));
        let orch = orchestrator(gateway.clone(), 1);

        orch.start(context()).await.unwrap();
        entered.notified().await;

        let q = next_question(orch.submit_answer("answer").await.unwrap());
        assert_eq!(q.topic_index, 1);
        assert!(!q.from_prefetch);
        assert_eq!(gateway.count(AgentRole::TopicAgent, Some("close"), Some(0)), 1);
        assert_eq!(gateway.count(AgentRole::TopicAgent, Some("open"), Some(1)), 2);

        let session = session_of(&orch).await;
        assert!(lock(&session).topic_state(0).unwrap().is_done());

        // The late prefetch finds its topic already begun.
        release.notify_one();
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        assert!(!lock(&session).has_prefetch(1));
    }

    #[tokio::test]
    async fn test_prefetch_landing_during_synchronous_open_is_dropped() {
        let gateway = Arc::new(MockGateway::scripted(2));
        let (open_entered, open_release) =
            gateway.gate(AgentRole::TopicAgent, Some("open"), Some(1));
        let (close_entered, close_release) =
            gateway.gate(AgentRole::TopicAgent, Some("close"), Some(0));
        let orch = Arc::new(orchestrator(gateway.clone(), 1));

        orch.start(context()).await.unwrap();
        let session = session_of(&orch).await;
        open_entered.notified().await;

        let submit = {
            let orch = Arc::clone(&orch);
            tokio::spawn(async move { orch.submit_answer("answer").await })
        };
        close_entered.notified().await;

        open_release.notify_one();
        wait_until(|| lock(&session).has_prefetch(1)).await;
        close_release.notify_one();

        let q = next_question(submit.await.unwrap().unwrap());
        assert_eq!(q.topic_index, 1);
        assert!(!q.from_prefetch);

        let s = lock(&session);
        assert_eq!(s.current_topic_index(), 1);
        assert!(!s.has_prefetch(1));
    }

    #[tokio::test]
    async fn test_failed_prefetch_is_retried_on_last_question() {
        let opens = Arc::new(Counter::default());
        let counter = Arc::clone(&opens);
        let gateway = Arc::new(MockGateway::new(Box::new(
            move |role: AgentRole, input: &Value| {
                if mode(input) == "open" && topic_index(input) == 1 && counter.bump() == 0 {
                    Err(GatewayError::Transient("503".into()))
                } else {
                    Ok(default_reply(role, input, 2))
                }
            },
        )));
        let orch = orchestrator(gateway.clone(), 2);

        orch.start(context()).await.unwrap();
        let session = session_of(&orch).await;
        wait_until(|| gateway.count(AgentRole::TopicAgent, Some("open"), Some(1)) == 1).await;
        tokio::task::yield_now().await;
        assert!(!lock(&session).has_prefetch(1));

        let q = next_question(orch.submit_answer("first").await.unwrap());
        assert_eq!(q.question_number, 2);
        wait_until(|| lock(&session).has_prefetch(1)).await;
        assert_eq!(gateway.count(AgentRole::TopicAgent, Some("open"), Some(1)), 2);

        let q = next_question(orch.submit_answer("second").await.unwrap());
        assert_eq!(q.topic_index, 1);
        assert!(q.from_prefetch);
    }

    #[tokio::test]
    async fn test_background_verdict_reaches_the_store() {
        let gateway = Arc::new(MockGateway::scripted(3));
        let (entered, release) = gateway.gate(AgentRole::TopicAgent, Some("close"), Some(0));
        let store = Arc::new(InMemorySessionStore::new());
        let orch = InterviewOrchestrator::new(gateway.clone(), store.clone())
            .with_params(InterviewParams::default().with_max_questions_per_topic(1));

        orch.start(context()).await.unwrap();
        let session = session_of(&orch).await;
        wait_until(|| lock(&session).has_prefetch(1)).await;
        orch.submit_answer("first").await.unwrap();
        entered.notified().await;

        let saved = store.load().unwrap().unwrap();
        assert!(saved.session.topic_state(0).unwrap().verdict.is_none());

        release.notify_one();
        wait_until(|| {
            store
                .load()
                .unwrap()
                .is_some_and(|s| s.session.topic_state(0).unwrap().is_done())
        })
        .await;

        let saved = store.load().unwrap().unwrap();
        assert_eq!(saved.current_question.as_deref(), Some("T1 opening"));
        assert_eq!(saved.session.current_topic_index(), 1);
    }

    #[tokio::test]
    async fn test_agent_may_close_topic_early() {
        let gateway = Arc::new(MockGateway::new(Box::new(
            |role: AgentRole, input: &Value| {
                if mode(input) == "continue" && topic_index(input) == 0 {
                    Ok(verdict("Early"))
                } else {
                    Ok(default_reply(role, input, 2))
                }
            },
        )));
        let orch = orchestrator(gateway.clone(), 4);

        orch.start(context()).await.unwrap();
        let q = next_question(orch.submit_answer("decisive answer").await.unwrap());
        assert_eq!(q.topic_index, 1);

        let session = session_of(&orch).await;
        let s = lock(&session);
        let state = s.topic_state(0).unwrap();
        assert_eq!(state.verdict.as_ref().unwrap().name, "Early");
        assert_eq!(state.questions_asked(), 1);
        assert_eq!(gateway.count(AgentRole::TopicAgent, Some("close"), Some(0)), 0);
    }

    #[tokio::test]
    async fn test_concurrent_submit_fails_fast() {
        let gateway = Arc::new(MockGateway::scripted(2));
        let (entered, release) = gateway.gate(AgentRole::TopicAgent, Some("continue"), Some(0));
        let orch = Arc::new(orchestrator(gateway.clone(), 3));
        orch.start(context()).await.unwrap();

        let first = {
            let orch = Arc::clone(&orch);
            tokio::spawn(async move { orch.submit_answer("first answer").await })
        };
        entered.notified().await;

        let err = orch.submit_answer("second answer").await.unwrap_err();
        assert!(matches!(err, InterviewError::Concurrency));
        assert!(matches!(
            orch.end().await.unwrap_err(),
            InterviewError::Concurrency
        ));

        release.notify_one();
        let q = next_question(first.await.unwrap().unwrap());
        assert_eq!(q.question_number, 2);

        let session = session_of(&orch).await;
        assert_eq!(lock(&session).topic_state(0).unwrap().questions_asked(), 1);
    }

    #[tokio::test]
    async fn test_schema_failure_keeps_answer_and_retry_resumes() {
        let failures = Arc::new(Counter::default());
        let counter = Arc::clone(&failures);
        let gateway = Arc::new(MockGateway::new(Box::new(
            move |role: AgentRole, input: &Value| {
                if mode(input) == "continue" && counter.bump() == 0 {
                    Ok(serde_json::json!({ "status": "maybe" }))
                } else {
                    Ok(default_reply(role, input, 2))
                }
            },
        )));
        let orch = orchestrator(gateway.clone(), 3);
        orch.start(context()).await.unwrap();

        let err = orch.submit_answer("my answer").await.unwrap_err();
        assert!(matches!(err, InterviewError::Schema(_)));
        assert!(err.is_recoverable());
        assert_eq!(orch.phase(), InterviewPhase::AwaitingAnswer);

        let session = session_of(&orch).await;
        assert_eq!(lock(&session).topic_state(0).unwrap().questions_asked(), 1);

        assert!(matches!(
            orch.submit_answer("again").await.unwrap_err(),
            InterviewError::RetryPending
        ));

        let q = next_question(orch.retry().await.unwrap());
        assert_eq!(q.text, "T0 follow-up 1");
        assert_eq!(lock(&session).topic_state(0).unwrap().questions_asked(), 1);
        assert!(matches!(
            orch.retry().await.unwrap_err(),
            InterviewError::NothingToRetry
        ));
    }

    #[tokio::test]
    async fn test_question_in_reply_to_close_is_schema_error() {
        let gateway = Arc::new(MockGateway::new(Box::new(
            |role: AgentRole, input: &Value| {
                if mode(input) == "close" {
                    Ok(ask("one more?"))
                } else {
                    Ok(default_reply(role, input, 1))
                }
            },
        )));
        let orch = orchestrator(gateway.clone(), 1);
        orch.start(context()).await.unwrap();

        let err = orch.submit_answer("answer").await.unwrap_err();
        assert!(matches!(err, InterviewError::Schema(_)));

        let session = session_of(&orch).await;
        let s = lock(&session);
        assert_eq!(s.topic_state(0).unwrap().questions_asked(), 1);
        assert!(!s.topic_state(0).unwrap().is_done());
    }

    #[tokio::test]
    async fn test_end_retries_failed_background_verdict() {
        let calls = Arc::new(Counter::default());
        let counter = Arc::clone(&calls);
        let gateway = Arc::new(MockGateway::new(Box::new(
            move |role: AgentRole, input: &Value| {
                if mode(input) == "close" && topic_index(input) == 0 && counter.bump() == 0 {
                    Err(GatewayError::RetriesExhausted {
                        attempts: 4,
                        last: "503".into(),
                    })
                } else {
                    Ok(default_reply(role, input, 3))
                }
            },
        )));
        let orch = orchestrator(gateway.clone(), 1);

        orch.start(context()).await.unwrap();
        let session = session_of(&orch).await;
        wait_until(|| lock(&session).has_prefetch(1)).await;
        orch.submit_answer("answer").await.unwrap();

        let report = orch.end().await.unwrap();
        assert_eq!(report.drain.failed, 1);
        assert_eq!(report.verdicts().count(), 1);
        assert_eq!(report.topics[0].verdict.as_ref().unwrap().name, "Topic 0");
        assert_eq!(report.incomplete, vec!["Topic 1", "Topic 2"]);
        assert_eq!(gateway.count(AgentRole::TopicAgent, Some("close"), Some(0)), 2);
    }

    #[tokio::test]
    async fn test_drain_timeout_falls_back_to_synchronous_verdict() {
        let gateway = Arc::new(MockGateway::scripted(2));
        let (entered, _release) = gateway.gate(AgentRole::TopicAgent, Some("close"), Some(0));
        let orch = InterviewOrchestrator::new(
            gateway.clone(),
            Arc::new(InMemorySessionStore::new()),
        )
        .with_params(
            InterviewParams::default()
                .with_max_questions_per_topic(1)
                .with_drain_timeout(Some(Duration::from_millis(30))),
        );

        orch.start(context()).await.unwrap();
        let session = session_of(&orch).await;
        wait_until(|| lock(&session).has_prefetch(1)).await;
        orch.submit_answer("answer").await.unwrap();
        entered.notified().await;

        let report = orch.end().await.unwrap();
        assert_eq!(report.drain.timed_out, 1);
        assert_eq!(report.topics[0].verdict.as_ref().unwrap().name, "Topic 0");
        assert_eq!(report.incomplete, vec!["Topic 1"]);
    }

    #[tokio::test]
    async fn test_early_end_reports_uncovered_topics() {
        let gateway = Arc::new(MockGateway::scripted(2));
        let store = Arc::new(InMemorySessionStore::new());
        let orch = InterviewOrchestrator::new(gateway.clone(), store.clone())
            .with_params(InterviewParams::default().with_max_questions_per_topic(3));

        orch.start(context()).await.unwrap();
        orch.submit_answer("only answer").await.unwrap();
        assert!(!store.is_empty());

        let report = orch.end().await.unwrap();
        assert_eq!(report.topics[0].verdict.as_ref().unwrap().name, "Topic 0");
        assert_eq!(report.incomplete, vec!["Topic 1"]);
        assert!(store.is_empty());
        assert_eq!(orch.phase(), InterviewPhase::Idle);
    }

    #[tokio::test]
    async fn test_summary_failure_degrades_to_verdicts_only() {
        let gateway = Arc::new(MockGateway::new(Box::new(
            |role: AgentRole, input: &Value| match role {
                AgentRole::FinalSummary => Err(GatewayError::Permanent("400 bad request".into())),
                _ => Ok(default_reply(role, input, 1)),
            },
        )));
        let orch = orchestrator(gateway.clone(), 1);

        orch.start(context()).await.unwrap();
        let report = finished(orch.submit_answer("answer").await.unwrap());
        assert!(report.summary.is_none());
        assert_eq!(report.verdicts().count(), 1);
    }

    #[tokio::test]
    async fn test_summary_disabled_is_not_requested() {
        let gateway = Arc::new(MockGateway::scripted(1));
        let orch = InterviewOrchestrator::new(
            gateway.clone(),
            Arc::new(InMemorySessionStore::new()),
        )
        .with_params(
            InterviewParams::default()
                .with_max_questions_per_topic(1)
                .with_final_summary(false),
        );

        orch.start(context()).await.unwrap();
        let report = finished(orch.submit_answer("answer").await.unwrap());
        assert!(report.summary.is_none());
        assert_eq!(gateway.count(AgentRole::FinalSummary, None, None), 0);
    }

    #[tokio::test]
    async fn test_resume_restores_question_and_history() {
        let store = Arc::new(InMemorySessionStore::new());
        let first = InterviewOrchestrator::new(Arc::new(MockGateway::scripted(2)), store.clone())
            .with_params(InterviewParams::default().with_max_questions_per_topic(3));
        first.start(context()).await.unwrap();
        first.submit_answer("before the crash").await.unwrap();
        let before = first.status().unwrap().session;

        let gateway = Arc::new(MockGateway::scripted(2));
        let second = InterviewOrchestrator::new(gateway.clone(), store.clone())
            .with_params(InterviewParams::default().with_max_questions_per_topic(3));
        let q = next_question(second.resume().await.unwrap());
        assert_eq!(q.text, "T0 follow-up 1");
        assert_eq!(q.question_number, 2);
        assert_eq!(second.phase(), InterviewPhase::AwaitingAnswer);

        let status = second.status().unwrap();
        assert_eq!(status.session.topics(), before.topics());
        assert_eq!(status.session.topic_states(), before.topic_states());
        assert_eq!(status.pending_background_verdicts, 0);
        assert_eq!(gateway.count(AgentRole::Planner, None, None), 0);
    }

    #[tokio::test]
    async fn test_resume_without_question_reruns_transition() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut session = TopicSessionState::initialize(
            vec![interview_domain::Topic::new(
                "Topic 0",
                3,
                interview_domain::Level::Solid,
            )],
            3,
            true,
        )
        .unwrap();
        session.record_answer("Q", "A").unwrap();
        store
            .save(&InterviewSnapshot::new(context(), session, None))
            .unwrap();

        let orch = InterviewOrchestrator::new(Arc::new(MockGateway::scripted(1)), store);
        let q = next_question(orch.resume().await.unwrap());
        assert_eq!(q.text, "T0 follow-up 1");
    }

    #[tokio::test]
    async fn test_resume_with_nothing_saved() {
        let orch = orchestrator(Arc::new(MockGateway::scripted(1)), 2);
        assert!(matches!(
            orch.resume().await.unwrap_err(),
            InterviewError::NothingToResume
        ));
    }

    #[tokio::test]
    async fn test_invalid_context_rejected_before_any_call() {
        let gateway = Arc::new(MockGateway::scripted(1));
        let orch = orchestrator(gateway.clone(), 2);

        let err = orch
            .start(CandidateContext::new("short", "cv"))
            .await
            .unwrap_err();
        assert!(matches!(err, InterviewError::Validation(_)));
        assert!(gateway.calls().is_empty());
        assert_eq!(orch.phase(), InterviewPhase::Idle);
    }

    #[tokio::test]
    async fn test_planner_schema_failure_returns_to_idle() {
        let gateway = Arc::new(MockGateway::new(Box::new(
            |_: AgentRole, _: &Value| Ok(serde_json::json!({ "topics": [] })),
        )));
        let orch = orchestrator(gateway.clone(), 2);

        let err = orch.start(context()).await.unwrap_err();
        assert!(matches!(err, InterviewError::Schema(_)));
        assert_eq!(orch.phase(), InterviewPhase::Idle);
        assert!(orch.status().is_none());
    }

    #[tokio::test]
    async fn test_operations_checked_against_phase() {
        let orch = orchestrator(Arc::new(MockGateway::scripted(1)), 2);

        assert!(matches!(
            orch.submit_answer("answer").await.unwrap_err(),
            InterviewError::InvalidState {
                phase: InterviewPhase::Idle,
                ..
            }
        ));
        assert!(matches!(
            orch.end().await.unwrap_err(),
            InterviewError::InvalidState { .. }
        ));

        orch.start(context()).await.unwrap();
        assert!(matches!(
            orch.start(context()).await.unwrap_err(),
            InterviewError::InvalidState { .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_answer_rejected_without_recording() {
        let orch = orchestrator(Arc::new(MockGateway::scripted(1)), 2);
        orch.start(context()).await.unwrap();

        let err = orch.submit_answer("   ").await.unwrap_err();
        assert!(matches!(
            err,
            InterviewError::Validation(ValidationError::EmptyAnswer)
        ));
        let session = session_of(&orch).await;
        assert_eq!(lock(&session).topic_state(0).unwrap().questions_asked(), 0);
    }

    #[tokio::test]
    async fn test_abandon_clears_snapshot() {
        let store = Arc::new(InMemorySessionStore::new());
        let orch = InterviewOrchestrator::new(Arc::new(MockGateway::scripted(2)), store.clone());
        orch.start(context()).await.unwrap();
        assert!(!store.is_empty());

        orch.abandon().await.unwrap();
        assert!(store.is_empty());
        assert_eq!(orch.phase(), InterviewPhase::Idle);
        assert!(orch.status().is_none());
    }

    #[tokio::test]
    async fn test_missing_credentials_block_start() {
        struct NoKey(MockGateway);

        #[async_trait::async_trait]
        impl AgentGateway for NoKey {
            async fn invoke_agent(
                &self,
                role: AgentRole,
                input: &Value,
            ) -> Result<Value, GatewayError> {
                self.0.invoke_agent(role, input).await
            }

            fn validate_credentials(&self) -> Result<(), GatewayError> {
                Err(GatewayError::MissingCredentials("INTERVIEWER_API_KEY".into()))
            }
        }

        let gateway = Arc::new(NoKey(MockGateway::scripted(1)));
        let orch = InterviewOrchestrator::new(gateway.clone(), Arc::new(InMemorySessionStore::new()));
        let err = orch.start(context()).await.unwrap_err();
        assert!(matches!(
            err,
            InterviewError::Gateway(GatewayError::MissingCredentials(_))
        ));
        assert!(gateway.0.calls().is_empty());
    }
}
