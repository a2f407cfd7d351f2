//! Moving from a recorded answer to the next question.
//!
//! The session gate decides between another question on the same topic and
//! closing it. Closing a topic that has a successor takes one of two paths:
//!
//! - a prefetched opening question exists: it is served at once and the
//!   closing verdict is computed in the background;
//! - otherwise the closing verdict and the next opening question are
//!   requested together and both must succeed.
//!
//! Nothing is written to the session until every call the step depends on
//! has succeeded, so a failed step leaves only the recorded answer behind.

use super::{CurrentQuestion, InterviewError, InterviewOrchestrator, InterviewPhase, LiveInterview};
use super::types::SubmitOutcome;
use crate::ports::agent_gateway::AgentGateway;
use crate::ports::conversation_logger::ConversationEvent;
use crate::use_cases::prefetch::lock;
use crate::use_cases::shared::{self, TopicRequest};
use interview_domain::{AgentRole, TopicTurn, TurnMode, ValidationError, Verdict};
use serde_json::json;
use tokio::sync::MutexGuard;
use tracing::{debug, info, warn};

/// Where a transition ended up.
pub(super) enum Step {
    Asked(CurrentQuestion),
    /// The last topic received its verdict.
    Completed,
}

impl<G: AgentGateway + 'static> InterviewOrchestrator<G> {
    /// Run the transition for the recorded answer and settle the phase.
    pub(super) async fn run_transition(
        &self,
        mut slot: MutexGuard<'_, Option<LiveInterview<G>>>,
    ) -> Result<SubmitOutcome, InterviewError> {
        let Some(live) = slot.as_mut() else {
            return Err(InterviewError::NothingToRetry);
        };

        self.set_phase(InterviewPhase::Transitioning);
        match self.transition(live).await {
            Ok(Step::Asked(question)) => {
                live.awaiting_transition = false;
                self.persist(live);
                self.set_phase(InterviewPhase::AwaitingAnswer);
                Ok(SubmitOutcome::NextQuestion(question))
            }
            Ok(Step::Completed) => match slot.take() {
                Some(live) => Ok(SubmitOutcome::Finished(self.finish(live).await)),
                None => Err(InterviewError::NothingToRetry),
            },
            Err(e) => {
                warn!("Transition failed, answer kept for retry: {}", e);
                self.set_phase(InterviewPhase::AwaitingAnswer);
                Err(e)
            }
        }
    }

    async fn transition(&self, live: &mut LiveInterview<G>) -> Result<Step, InterviewError> {
        let (index, should_continue) = {
            let session = lock(&live.session);
            (
                session.current_topic_index(),
                session.should_continue_topic(),
            )
        };

        if should_continue {
            self.continue_topic(live, index).await
        } else {
            self.close_topic(live, index).await
        }
    }

    /// Ask the TopicAgent for a follow-up; it may close the topic early.
    async fn continue_topic(
        &self,
        live: &mut LiveInterview<G>,
        index: usize,
    ) -> Result<Step, InterviewError> {
        let request = capture(live, index)?;
        let (turn, _) = self
            .tracked(
                AgentRole::TopicAgent,
                Some(request.topic.name.as_str()),
                shared::topic_turn(
                    self.gateway.as_ref(),
                    &live.context,
                    &request,
                    TurnMode::Continue,
                ),
            )
            .await?;

        match turn {
            TopicTurn::Ask { text } => {
                let (question, remaining) = {
                    let session = lock(&live.session);
                    (
                        CurrentQuestion::from_session(&session, text.clone(), false),
                        session.questions_remaining(),
                    )
                };
                live.current_question = Some(text);
                self.log_question(&question);

                // The question just asked is the topic's last one.
                if remaining == 1 {
                    live.prefetch.prefetch_opening(index + 1);
                }
                Ok(Step::Asked(question))
            }
            TopicTurn::Final { verdict } => {
                info!(topic = index, "Topic closed early by the agent");
                self.leave_topic(live, index, verdict).await
            }
        }
    }

    /// Leave `index` with a verdict already in hand.
    async fn leave_topic(
        &self,
        live: &mut LiveInterview<G>,
        index: usize,
        verdict: Verdict,
    ) -> Result<Step, InterviewError> {
        let has_next = lock(&live.session).has_next_topic();
        if !has_next {
            self.record_verdict(live, index, verdict)?;
            return Ok(Step::Completed);
        }

        let next = index + 1;
        let (text, from_prefetch) = match live.prefetch.take(next) {
            Some(entry) => (entry.question_text, true),
            None => {
                let opening = opening(live, next)?;
                let (text, _) = self
                    .tracked(
                        AgentRole::TopicAgent,
                        Some(opening.topic.name.as_str()),
                        shared::opening_question(self.gateway.as_ref(), &live.context, &opening),
                    )
                    .await?;
                (text, false)
            }
        };

        self.record_verdict(live, index, verdict)?;
        Ok(Step::Asked(self.enter_topic(live, next, text, from_prefetch)))
    }

    /// The question budget of `index` is spent: obtain its verdict and move on.
    async fn close_topic(
        &self,
        live: &mut LiveInterview<G>,
        index: usize,
    ) -> Result<Step, InterviewError> {
        let has_next = lock(&live.session).has_next_topic();
        let request = capture(live, index)?;

        if !has_next {
            let verdict = self
                .tracked(
                    AgentRole::TopicAgent,
                    Some(request.topic.name.as_str()),
                    shared::closing_verdict(self.gateway.as_ref(), &live.context, &request),
                )
                .await?;
            self.record_verdict(live, index, verdict)?;
            return Ok(Step::Completed);
        }

        let next = index + 1;
        if let Some(entry) = live.prefetch.take(next) {
            debug!(topic = next, "Serving prefetched opening question");
            live.prefetch.spawn_closing_verdict(index);
            return Ok(Step::Asked(self.enter_topic(
                live,
                next,
                entry.question_text,
                true,
            )));
        }

        let opening = opening(live, next)?;
        let (verdict, opened) = tokio::join!(
            self.tracked(
                AgentRole::TopicAgent,
                Some(request.topic.name.as_str()),
                shared::closing_verdict(self.gateway.as_ref(), &live.context, &request),
            ),
            self.tracked(
                AgentRole::TopicAgent,
                Some(opening.topic.name.as_str()),
                shared::opening_question(self.gateway.as_ref(), &live.context, &opening),
            ),
        );
        let verdict = verdict?;
        let (text, _) = opened?;

        self.record_verdict(live, index, verdict)?;
        Ok(Step::Asked(self.enter_topic(live, next, text, false)))
    }

    /// Move the cursor onto `next` with its opening question.
    fn enter_topic(
        &self,
        live: &mut LiveInterview<G>,
        next: usize,
        text: String,
        from_prefetch: bool,
    ) -> CurrentQuestion {
        let question = {
            let mut session = lock(&live.session);
            session.advance_topic();
            // A prefetch that landed while the opening was fetched here.
            session.take_prefetch(next);
            CurrentQuestion::from_session(&session, text.clone(), from_prefetch)
        };
        live.current_question = Some(text);

        self.announce_topic(live, next);
        self.log_question(&question);
        live.prefetch.prefetch_opening(next + 1);
        question
    }

    pub(super) fn record_verdict(
        &self,
        live: &LiveInterview<G>,
        index: usize,
        verdict: Verdict,
    ) -> Result<(), InterviewError> {
        lock(&live.session).record_verdict(verdict.clone(), Some(index))?;
        info!(
            topic = index,
            "Verdict recorded: {} ({}, {:.1})",
            verdict.name,
            verdict.assessed_level,
            verdict.score
        );
        self.conversation_logger.log(ConversationEvent::new(
            "verdict_recorded",
            json!({ "topic_index": index, "verdict": verdict }),
        ));
        self.progress.on_topic_completed(index, &verdict);
        Ok(())
    }
}

fn capture<G: AgentGateway + 'static>(
    live: &LiveInterview<G>,
    index: usize,
) -> Result<TopicRequest, InterviewError> {
    let session = lock(&live.session);
    TopicRequest::capture(&session, index).ok_or_else(|| {
        ValidationError::TopicIndexOutOfRange {
            index,
            len: session.len(),
        }
        .into()
    })
}

fn opening<G: AgentGateway + 'static>(
    live: &LiveInterview<G>,
    index: usize,
) -> Result<TopicRequest, InterviewError> {
    let session = lock(&live.session);
    TopicRequest::opening(&session, index).ok_or_else(|| {
        ValidationError::TopicIndexOutOfRange {
            index,
            len: session.len(),
        }
        .into()
    })
}
