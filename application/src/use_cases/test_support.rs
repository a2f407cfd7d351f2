//! Scripted gateway shared by the use case tests.

use crate::ports::agent_gateway::{AgentGateway, GatewayError};
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use async_trait::async_trait;
use interview_domain::{AgentRole, CandidateContext};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

pub type Responder = Box<dyn Fn(AgentRole, &Value) -> Result<Value, GatewayError> + Send + Sync>;

/// Holds the first matching call until released.
pub struct Gate {
    role: AgentRole,
    mode: Option<&'static str>,
    topic_index: Option<usize>,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl Gate {
    fn matches(&self, role: AgentRole, input: &Value) -> bool {
        role == self.role
            && self
                .mode
                .is_none_or(|m| input.get("mode").and_then(Value::as_str) == Some(m))
            && self.topic_index.is_none_or(|i| {
                input.get("topic_index").and_then(Value::as_u64) == Some(i as u64)
            })
    }
}

pub struct MockGateway {
    responder: Responder,
    calls: Mutex<Vec<(AgentRole, Value)>>,
    gates: Mutex<Vec<Gate>>,
}

impl MockGateway {
    pub fn new(responder: Responder) -> Self {
        Self {
            responder,
            calls: Mutex::new(Vec::new()),
            gates: Mutex::new(Vec::new()),
        }
    }

    /// Planner returns `topics` topics; TopicAgent asks on open/continue and
    /// closes on close; FinalSummary succeeds.
    pub fn scripted(topics: usize) -> Self {
        Self::new(Box::new(move |role: AgentRole, input: &Value| Ok(default_reply(role, input, topics))))
    }

    /// Gate the first call matching `role`/`mode`/`topic_index`.
    pub fn gate(
        &self,
        role: AgentRole,
        mode: Option<&'static str>,
        topic_index: Option<usize>,
    ) -> (Arc<Notify>, Arc<Notify>) {
        let gate = Gate {
            role,
            mode,
            topic_index,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        };
        let handles = (gate.entered.clone(), gate.release.clone());
        self.gates.lock().unwrap().push(gate);
        handles
    }

    pub fn calls(&self) -> Vec<(AgentRole, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, role: AgentRole, mode: Option<&str>, topic_index: Option<usize>) -> usize {
        self.calls()
            .iter()
            .filter(|(r, input)| {
                *r == role
                    && mode.is_none_or(|m| input.get("mode").and_then(Value::as_str) == Some(m))
                    && topic_index.is_none_or(|i| {
                        input.get("topic_index").and_then(Value::as_u64) == Some(i as u64)
                    })
            })
            .count()
    }
}

#[async_trait]
impl AgentGateway for MockGateway {
    async fn invoke_agent(&self, role: AgentRole, input: &Value) -> Result<Value, GatewayError> {
        self.calls.lock().unwrap().push((role, input.clone()));

        let gate = {
            let mut gates = self.gates.lock().unwrap();
            let pos = gates.iter().position(|g| g.matches(role, input));
            pos.map(|p| gates.remove(p))
        };
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        (self.responder)(role, input)
    }
}

pub fn topic_index(input: &Value) -> usize {
    input["topic_index"].as_u64().unwrap_or(0) as usize
}

pub fn mode(input: &Value) -> &str {
    input["mode"].as_str().unwrap_or("")
}

pub fn plan(topics: usize) -> Value {
    let items: Vec<Value> = (0..topics)
        .map(|i| json!({"name": format!("Topic {i}"), "importance": 3, "required_level": "solid"}))
        .collect();
    json!({ "topics": items })
}

pub fn ask(text: impl Into<String>) -> Value {
    json!({"status": "ask", "question": {"text": text.into()}, "verdict": null})
}

pub fn verdict(name: impl Into<String>) -> Value {
    json!({
        "status": "final",
        "question": null,
        "verdict": {
            "name": name.into(),
            "assessed_level": "solid",
            "score": 3.5,
            "confidence": 0.8,
            "strengths": ["clear"],
            "gaps": []
        }
    })
}

pub fn summary() -> Value {
    json!({
        "per_topic": [],
        "fit_overall_percent": 70,
        "fit_label": "good_fit"
    })
}

pub fn default_reply(role: AgentRole, input: &Value, topics: usize) -> Value {
    match role {
        AgentRole::Planner => plan(topics),
        AgentRole::TopicAgent => {
            let index = topic_index(input);
            match mode(input) {
                "open" => ask(format!("T{index} opening")),
                "continue" => ask(format!(
                    "T{index} follow-up {}",
                    input["questions_asked"].as_u64().unwrap_or(0)
                )),
                _ => verdict(format!("Topic {index}")),
            }
        }
        AgentRole::FinalSummary => summary(),
    }
}

/// Counts calls matching a predicate so a responder can fail the first N.
#[derive(Default)]
pub struct Counter(AtomicUsize);

impl Counter {
    pub fn bump(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

pub fn context() -> CandidateContext {
    CandidateContext::new(
        "Senior backend engineer: Rust, async networking, PostgreSQL, observability.",
        "Eight years building services in Rust and Go; led a migration to tokio.",
    )
}

/// Yield until `cond` holds; background tasks run while we yield.
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

/// Keeps every transcript event in memory.
#[derive(Default)]
pub struct RecordingLogger {
    events: Mutex<Vec<ConversationEvent>>,
}

impl RecordingLogger {
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.event_type)
            .collect()
    }

    pub fn of_kind(&self, kind: &str) -> Vec<Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.event_type == kind)
            .map(|e| e.payload.clone())
            .collect()
    }
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.events.lock().unwrap().push(event);
    }
}
