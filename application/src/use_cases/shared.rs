//! Shared utilities for use cases.
//!
//! Every agent call goes gateway-then-validate: the raw JSON is checked
//! by the domain validation layer before anything reaches the session.
//! Mode-specific expectations (an opening turn must ask, a closing turn
//! must return a verdict) are enforced here as schema failures.

use crate::ports::agent_gateway::{AgentGateway, GatewayError};
use interview_domain::{
    AgentRole, CandidateContext, FinalSummary, PlannerOutput, QaPair, SchemaError, Topic,
    TopicSessionState, TopicTurn, TurnMode, Verdict, final_summary_input, planner_input,
    topic_agent_input, validate_final_summary, validate_planner_output, validate_topic_turn,
};
use serde_json::Value;
use thiserror::Error;

/// Failure of a single validated agent call.
#[derive(Error, Debug, Clone)]
pub(crate) enum AgentCallError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Owned view of one topic, captured under the session lock so the call
/// itself can run without holding it.
#[derive(Debug, Clone)]
pub(crate) struct TopicRequest {
    pub index: usize,
    pub total: usize,
    pub topic: Topic,
    pub history: Vec<QaPair>,
    pub max_questions: usize,
}

impl TopicRequest {
    /// Topic `index` with its current Q&A history.
    pub fn capture(session: &TopicSessionState, index: usize) -> Option<Self> {
        let topic = session.topic(index)?.clone();
        let history = session.topic_state(index)?.qa_list.clone();
        Some(Self {
            index,
            total: session.len(),
            topic,
            history,
            max_questions: session.max_questions_per_topic(),
        })
    }

    /// Topic `index` as it looks before its first question.
    pub fn opening(session: &TopicSessionState, index: usize) -> Option<Self> {
        let mut request = Self::capture(session, index)?;
        request.history.clear();
        Some(request)
    }

    fn to_input(&self, context: &CandidateContext, mode: TurnMode) -> Value {
        topic_agent_input(
            context,
            &self.topic,
            self.index,
            self.total,
            &self.history,
            self.max_questions,
            mode,
        )
    }
}

pub(crate) async fn plan_topics<G: AgentGateway + ?Sized>(
    gateway: &G,
    context: &CandidateContext,
) -> Result<PlannerOutput, AgentCallError> {
    let raw = gateway
        .invoke_agent(AgentRole::Planner, &planner_input(context))
        .await?;
    Ok(validate_planner_output(&raw)?)
}

/// One TopicAgent turn in `mode`. Returns the validated turn and the raw
/// output it was parsed from.
pub(crate) async fn topic_turn<G: AgentGateway + ?Sized>(
    gateway: &G,
    context: &CandidateContext,
    request: &TopicRequest,
    mode: TurnMode,
) -> Result<(TopicTurn, Value), AgentCallError> {
    let raw = gateway
        .invoke_agent(AgentRole::TopicAgent, &request.to_input(context, mode))
        .await?;
    let turn = validate_topic_turn(&raw)?;
    Ok((turn, raw))
}

/// Opening question of a topic. A verdict here is a contract violation.
pub(crate) async fn opening_question<G: AgentGateway + ?Sized>(
    gateway: &G,
    context: &CandidateContext,
    request: &TopicRequest,
) -> Result<(String, Value), AgentCallError> {
    match topic_turn(gateway, context, request, TurnMode::Open).await? {
        (TopicTurn::Ask { text }, raw) => Ok((text, raw)),
        (TopicTurn::Final { .. }, _) => Err(SchemaError::single(
            AgentRole::TopicAgent,
            "status",
            "expected 'ask' for an opening turn, got 'final'",
        )
        .into()),
    }
}

/// Closing verdict of a topic. Another question here is a contract
/// violation.
pub(crate) async fn closing_verdict<G: AgentGateway + ?Sized>(
    gateway: &G,
    context: &CandidateContext,
    request: &TopicRequest,
) -> Result<Verdict, AgentCallError> {
    match topic_turn(gateway, context, request, TurnMode::Close).await? {
        (TopicTurn::Final { verdict }, _) => Ok(verdict),
        (TopicTurn::Ask { .. }, _) => Err(SchemaError::single(
            AgentRole::TopicAgent,
            "status",
            "expected 'final' for a closing turn, got 'ask'",
        )
        .into()),
    }
}

pub(crate) async fn final_summary<G: AgentGateway + ?Sized>(
    gateway: &G,
    context: &CandidateContext,
    session: &TopicSessionState,
) -> Result<FinalSummary, AgentCallError> {
    let raw = gateway
        .invoke_agent(
            AgentRole::FinalSummary,
            &final_summary_input(context, session),
        )
        .await?;
    Ok(validate_final_summary(&raw)?)
}
