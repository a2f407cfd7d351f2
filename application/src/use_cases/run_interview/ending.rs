//! Ending an interview: drain, fallback verdicts, summary, report.

use super::{InterviewOrchestrator, InterviewPhase, InterviewReport, LiveInterview};
use crate::ports::agent_gateway::AgentGateway;
use crate::ports::conversation_logger::ConversationEvent;
use crate::use_cases::prefetch::lock;
use crate::use_cases::shared::{self, TopicRequest};
use interview_domain::{AgentRole, FinalSummary};
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

impl<G: AgentGateway + 'static> InterviewOrchestrator<G> {
    /// Produce the report and return to `Idle`. Never fails: every agent
    /// call made here degrades to a missing verdict or summary.
    pub(super) async fn finish(&self, mut live: LiveInterview<G>) -> InterviewReport {
        self.set_phase(InterviewPhase::Ending);
        info!("Ending interview");

        let drain = live.prefetch.drain(self.params.drain_timeout).await;
        live.prefetch.discard_prefetches();

        self.fallback_verdicts(&live).await;
        let summary = self.summarize(&live).await;
        live.prefetch.shutdown().await;

        let report = InterviewReport::from_session(&lock(&live.session), summary, drain);
        info!(
            "Interview ended: {}/{} topic(s) with a verdict",
            report.topics.len() - report.incomplete.len(),
            report.topics.len()
        );
        self.conversation_logger.log(ConversationEvent::new(
            "interview_ended",
            json!({
                "verdicts": report.topics.len() - report.incomplete.len(),
                "incomplete": report.incomplete,
                "summary": report.summary.is_some(),
            }),
        ));

        if let Err(e) = self.store.clear() {
            warn!("Failed to clear saved interview: {}", e);
        }
        self.set_phase(InterviewPhase::Idle);
        report
    }

    /// Request closing verdicts, concurrently, for every topic that has at
    /// least one answer but no verdict. Failures leave the topic incomplete.
    async fn fallback_verdicts(&self, live: &LiveInterview<G>) {
        let requests: Vec<TopicRequest> = {
            let session = lock(&live.session);
            session
                .incomplete_topics()
                .into_iter()
                .filter_map(|i| TopicRequest::capture(&session, i))
                .filter(|r| !r.history.is_empty())
                .collect()
        };
        if requests.is_empty() {
            debug!("No fallback verdicts needed");
            return;
        }

        info!("Requesting {} fallback verdict(s)", requests.len());
        let mut join_set = JoinSet::new();
        for request in requests {
            let gateway = Arc::clone(&self.gateway);
            let context = Arc::clone(&live.context);
            self.progress
                .on_agent_call_start(AgentRole::TopicAgent, Some(request.topic.name.as_str()));

            join_set.spawn(async move {
                let result = shared::closing_verdict(gateway.as_ref(), &context, &request).await;
                (request.index, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, Ok(verdict))) => {
                    self.progress.on_agent_call_end(AgentRole::TopicAgent, true);
                    if let Err(e) = self.record_verdict(live, index, verdict) {
                        warn!(topic = index, "Could not record fallback verdict: {}", e);
                    }
                }
                Ok((index, Err(e))) => {
                    self.progress.on_agent_call_end(AgentRole::TopicAgent, false);
                    warn!(
                        topic = index,
                        "Fallback verdict failed, topic left incomplete: {}", e
                    );
                }
                Err(e) => {
                    self.progress.on_agent_call_end(AgentRole::TopicAgent, false);
                    warn!("Fallback verdict task panicked: {}", e);
                }
            }
        }
    }

    /// Best-effort FinalSummary over the verdicts collected so far.
    async fn summarize(&self, live: &LiveInterview<G>) -> Option<FinalSummary> {
        let session = lock(&live.session).clone();
        if !session.enable_final_summary() {
            return None;
        }
        if session.all_verdicts().is_empty() {
            info!("No verdicts recorded, skipping final summary");
            return None;
        }

        let result = self
            .tracked(
                AgentRole::FinalSummary,
                None,
                shared::final_summary(self.gateway.as_ref(), &live.context, &session),
            )
            .await;

        match result {
            Ok(summary) => {
                info!(
                    "Final summary: {}% ({})",
                    summary.fit_overall_percent, summary.fit_label
                );
                self.conversation_logger.log(ConversationEvent::new(
                    "summary_generated",
                    json!({ "summary": summary }),
                ));
                Some(summary)
            }
            Err(e) => {
                warn!("Final summary failed, reporting verdicts only: {}", e);
                None
            }
        }
    }
}
