//! Validation layer: per-role checks of raw agent output.
//!
//! Each `validate_*` function walks the JSON document once, collects every
//! problem as a [`FieldIssue`] with a path such as `topics[2].importance`,
//! and only builds the typed response when no issue was found. A failed
//! check becomes a [`SchemaError`] which aborts the operation that asked.
//!
//! Fields that belong to the inapplicable branch of a TopicAgent turn must
//! be present and `null`; a missing key is an issue, not an implicit null.

use crate::agent::response::{FinalSummary, FitLabel, PlannerOutput, TopicSummary, TopicTurn};
use crate::agent::role::AgentRole;
use crate::interview::topic::{IMPORTANCE_RANGE, Level, Topic};
use crate::interview::verdict::Verdict;
use serde_json::{Map, Value};
use thiserror::Error;

/// Maximum number of topics a plan may contain.
pub const MAX_PLANNED_TOPICS: usize = 10;

/// One structural problem in an agent output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Agent output failed structural validation.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{role} output failed validation: {}", join_issues(.issues))]
pub struct SchemaError {
    pub role: AgentRole,
    pub issues: Vec<FieldIssue>,
}

impl SchemaError {
    pub fn single(role: AgentRole, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            role,
            issues: vec![FieldIssue {
                path: path.into(),
                message: message.into(),
            }],
        }
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Accumulates issues while extracting values.
struct Checker {
    issues: Vec<FieldIssue>,
}

impl Checker {
    fn new() -> Self {
        Self { issues: Vec::new() }
    }

    fn issue(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    fn finish<T>(self, role: AgentRole, value: Option<T>) -> Result<T, SchemaError> {
        match value {
            Some(v) if self.issues.is_empty() => Ok(v),
            _ => Err(SchemaError {
                role,
                issues: self.issues,
            }),
        }
    }

    fn object<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
        let obj = value.as_object();
        if obj.is_none() {
            self.issue(path, "expected an object");
        }
        obj
    }

    fn required<'a>(
        &mut self,
        obj: &'a Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<&'a Value> {
        let value = obj.get(key);
        if value.is_none() {
            self.issue(join(path, key), "missing field");
        }
        value
    }

    fn text(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<String> {
        let value = self.required(obj, path, key)?;
        match value.as_str() {
            Some(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(_) => {
                self.issue(join(path, key), "must not be empty");
                None
            }
            None => {
                self.issue(join(path, key), "expected a string");
                None
            }
        }
    }

    /// Like [`text`](Self::text) but an empty string is accepted.
    fn any_text(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<String> {
        let value = self.required(obj, path, key)?;
        let s = value.as_str().map(str::to_string);
        if s.is_none() {
            self.issue(join(path, key), "expected a string");
        }
        s
    }

    fn number(
        &mut self,
        obj: &Map<String, Value>,
        path: &str,
        key: &str,
        min: f64,
        max: f64,
    ) -> Option<f64> {
        let value = self.required(obj, path, key)?;
        match value.as_f64() {
            Some(n) if (min..=max).contains(&n) => Some(n),
            Some(n) => {
                self.issue(join(path, key), format!("{n} outside {min}..={max}"));
                None
            }
            None => {
                self.issue(join(path, key), "expected a number");
                None
            }
        }
    }

    fn integer(
        &mut self,
        obj: &Map<String, Value>,
        path: &str,
        key: &str,
        min: i64,
        max: i64,
    ) -> Option<i64> {
        let value = self.required(obj, path, key)?;
        match value.as_i64() {
            Some(n) if (min..=max).contains(&n) => Some(n),
            Some(n) => {
                self.issue(join(path, key), format!("{n} outside {min}..={max}"));
                None
            }
            None => {
                self.issue(join(path, key), "expected an integer");
                None
            }
        }
    }

    fn level(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<Level> {
        let raw = self.any_text(obj, path, key)?;
        match raw.parse::<Level>() {
            Ok(level) => Some(level),
            Err(_) => {
                self.issue(
                    join(path, key),
                    format!("'{raw}' is not one of basic, solid, deep"),
                );
                None
            }
        }
    }

    /// Array of strings; `None` key yields an empty list when not `required`.
    fn strings(
        &mut self,
        obj: &Map<String, Value>,
        path: &str,
        key: &str,
        required: bool,
    ) -> Option<Vec<String>> {
        let value = match obj.get(key) {
            Some(v) => v,
            None if required => {
                self.issue(join(path, key), "missing field");
                return None;
            }
            None => return Some(Vec::new()),
        };
        let Some(items) = value.as_array() else {
            self.issue(join(path, key), "expected an array of strings");
            return None;
        };
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(s) => out.push(s.to_string()),
                None => self.issue(format!("{}[{i}]", join(path, key)), "expected a string"),
            }
        }
        Some(out)
    }

    /// The key must exist and hold `null`.
    fn explicit_null(&mut self, obj: &Map<String, Value>, path: &str, key: &str) {
        match obj.get(key) {
            Some(Value::Null) => {}
            Some(_) => self.issue(join(path, key), "must be null for this status"),
            None => self.issue(join(path, key), "missing field (must be null)"),
        }
    }

    fn verdict(&mut self, value: &Value, path: &str) -> Option<Verdict> {
        let obj = self.object(value, path)?;
        let name = self.text(obj, path, "name");
        let assessed_level = self.level(obj, path, "assessed_level");
        let score = self.number(obj, path, "score", 0.0, 5.0);
        let confidence = self.number(obj, path, "confidence", 0.0, 1.0);
        let strengths = self.strings(obj, path, "strengths", true);
        let gaps = self.strings(obj, path, "gaps", true);

        Some(
            Verdict::new(name?, assessed_level?, score? as f32)
                .with_confidence(confidence? as f32)
                .with_strengths(strengths?)
                .with_gaps(gaps?),
        )
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// Validate Planner output: `{topics: Topic[]}` with 1..=10 entries.
pub fn validate_planner_output(value: &Value) -> Result<PlannerOutput, SchemaError> {
    let mut c = Checker::new();
    let topics = (|| {
        let obj = c.object(value, "$")?;
        let raw = c.required(obj, "", "topics")?;
        let Some(items) = raw.as_array() else {
            c.issue("topics", "expected an array");
            return None;
        };
        if items.is_empty() || items.len() > MAX_PLANNED_TOPICS {
            c.issue(
                "topics",
                format!("expected 1..={MAX_PLANNED_TOPICS} topics, got {}", items.len()),
            );
            return None;
        }

        let mut topics = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = format!("topics[{i}]");
            let Some(t) = c.object(item, &path) else {
                continue;
            };
            let name = c.text(t, &path, "name");
            let importance = c.integer(
                t,
                &path,
                "importance",
                i64::from(*IMPORTANCE_RANGE.start()),
                i64::from(*IMPORTANCE_RANGE.end()),
            );
            let level = c.level(t, &path, "required_level");
            let merged_from = c.strings(t, &path, "merged_from", false);

            if let (Some(name), Some(importance), Some(level), Some(merged_from)) =
                (name, importance, level, merged_from)
            {
                // Range-checked above, so the narrowing is lossless.
                topics.push(Topic::new(name, importance as u8, level).with_merged_from(merged_from));
            }
        }
        Some(PlannerOutput { topics })
    })();
    c.finish(AgentRole::Planner, topics)
}

/// Validate a TopicAgent turn: `{status: ask|final, question, verdict}`.
pub fn validate_topic_turn(value: &Value) -> Result<TopicTurn, SchemaError> {
    let mut c = Checker::new();
    let turn = (|| {
        let obj = c.object(value, "$")?;
        let status = c.any_text(obj, "", "status")?;
        match status.as_str() {
            "ask" => {
                c.explicit_null(obj, "", "verdict");
                let question = c.required(obj, "", "question")?;
                let q = c.object(question, "question")?;
                let text = c.text(q, "question", "text")?;
                Some(TopicTurn::Ask { text })
            }
            "final" => {
                c.explicit_null(obj, "", "question");
                let raw = c.required(obj, "", "verdict")?;
                let verdict = c.verdict(raw, "verdict")?;
                Some(TopicTurn::Final { verdict })
            }
            other => {
                c.issue("status", format!("'{other}' is not one of ask, final"));
                None
            }
        }
    })();
    c.finish(AgentRole::TopicAgent, turn)
}

/// Validate FinalSummary output.
pub fn validate_final_summary(value: &Value) -> Result<FinalSummary, SchemaError> {
    let mut c = Checker::new();
    let summary = (|| {
        let obj = c.object(value, "$")?;

        let per_topic = match c.required(obj, "", "per_topic").map(Value::as_array) {
            Some(Some(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let path = format!("per_topic[{i}]");
                    let Some(t) = c.object(item, &path) else {
                        continue;
                    };
                    let name = c.text(t, &path, "name");
                    let score = c.number(t, &path, "score", 0.0, 5.0);
                    let level = c.level(t, &path, "assessed_level");
                    let comment = c.any_text(t, &path, "comment");
                    if let (Some(name), Some(score), Some(assessed_level), Some(comment)) =
                        (name, score, level, comment)
                    {
                        out.push(TopicSummary {
                            name,
                            score: score as f32,
                            assessed_level,
                            comment,
                        });
                    }
                }
                Some(out)
            }
            Some(None) => {
                c.issue("per_topic", "expected an array");
                None
            }
            None => None,
        };

        let percent = c.integer(obj, "", "fit_overall_percent", 0, 100);
        let label = c.any_text(obj, "", "fit_label").and_then(|raw| {
            let parsed = FitLabel::parse(&raw);
            if parsed.is_none() {
                c.issue("fit_label", format!("'{raw}' is not a known fit label"));
            }
            parsed
        });

        Some(FinalSummary {
            per_topic: per_topic?,
            fit_overall_percent: percent? as u8,
            fit_label: label?,
        })
    })();
    c.finish(AgentRole::FinalSummary, summary)
}
