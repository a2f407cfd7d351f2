//! JSON schemas describing each role's output.
//!
//! Sent to the completion endpoint as the structured response format. The
//! TopicAgent schema declares `question` and `verdict` as nullable and
//! required, so the inapplicable branch arrives as an explicit `null`.

use crate::agent::response::FitLabel;
use crate::agent::role::AgentRole;
use crate::agent::validation::MAX_PLANNED_TOPICS;
use serde_json::{Value, json};

const LEVELS: [&str; 3] = ["basic", "solid", "deep"];

impl AgentRole {
    /// Name used for the schema in the response format request.
    pub fn schema_name(&self) -> &'static str {
        match self {
            AgentRole::Planner => "interview_plan",
            AgentRole::TopicAgent => "topic_turn",
            AgentRole::FinalSummary => "final_summary",
        }
    }

    pub fn output_schema(&self) -> Value {
        match self {
            AgentRole::Planner => planner_schema(),
            AgentRole::TopicAgent => topic_turn_schema(),
            AgentRole::FinalSummary => final_summary_schema(),
        }
    }
}

fn planner_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["topics"],
        "properties": {
            "topics": {
                "type": "array",
                "minItems": 1,
                "maxItems": MAX_PLANNED_TOPICS,
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["name", "importance", "required_level", "merged_from"],
                    "properties": {
                        "name": {"type": "string"},
                        "importance": {"type": "integer", "minimum": 1, "maximum": 5},
                        "required_level": {"type": "string", "enum": LEVELS},
                        "merged_from": {"type": "array", "items": {"type": "string"}}
                    }
                }
            }
        }
    })
}

fn verdict_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["name", "assessed_level", "score", "confidence", "strengths", "gaps"],
        "properties": {
            "name": {"type": "string"},
            "assessed_level": {"type": "string", "enum": LEVELS},
            "score": {"type": "number", "minimum": 0, "maximum": 5},
            "confidence": {"type": "number", "minimum": 0, "maximum": 1},
            "strengths": {"type": "array", "items": {"type": "string"}},
            "gaps": {"type": "array", "items": {"type": "string"}}
        }
    })
}

fn topic_turn_schema() -> Value {
    let mut verdict = verdict_schema();
    verdict["type"] = json!(["object", "null"]);
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["status", "question", "verdict"],
        "properties": {
            "status": {"type": "string", "enum": ["ask", "final"]},
            "question": {
                "type": ["object", "null"],
                "additionalProperties": false,
                "required": ["text"],
                "properties": {"text": {"type": "string"}}
            },
            "verdict": verdict
        }
    })
}

fn final_summary_schema() -> Value {
    let labels: Vec<&str> = FitLabel::ALL.iter().map(|l| l.as_str()).collect();
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["per_topic", "fit_overall_percent", "fit_label"],
        "properties": {
            "per_topic": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["name", "score", "assessed_level", "comment"],
                    "properties": {
                        "name": {"type": "string"},
                        "score": {"type": "number", "minimum": 0, "maximum": 5},
                        "assessed_level": {"type": "string", "enum": LEVELS},
                        "comment": {"type": "string"}
                    }
                }
            },
            "fit_overall_percent": {"type": "integer", "minimum": 0, "maximum": 100},
            "fit_label": {"type": "string", "enum": labels}
        }
    })
}
