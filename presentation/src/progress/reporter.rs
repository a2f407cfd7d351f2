//! Progress reporting for agent calls

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use interview_application::InterviewProgressNotifier;
use interview_domain::{AgentRole, Topic};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Spinner per in-flight foreground agent call
pub struct ProgressReporter {
    multi: MultiProgress,
    spinners: Mutex<Vec<(AgentRole, ProgressBar)>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            spinners: Mutex::new(Vec::new()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn role_display_name(role: AgentRole) -> &'static str {
        match role {
            AgentRole::Planner => "Planning topics",
            AgentRole::TopicAgent => "Interviewer",
            AgentRole::FinalSummary => "Summarizing",
        }
    }

    fn call_message(role: AgentRole, topic: Option<&str>) -> String {
        match (role, topic) {
            (AgentRole::TopicAgent, Some(topic)) => format!("thinking about {}", topic),
            (_, Some(topic)) => topic.to_string(),
            _ => String::new(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewProgressNotifier for ProgressReporter {
    fn on_agent_call_start(&self, role: AgentRole, topic: Option<&str>) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(Self::role_display_name(role));
        pb.set_message(Self::call_message(role, topic));
        pb.enable_steady_tick(Duration::from_millis(100));

        self.spinners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((role, pb));
    }

    fn on_agent_call_end(&self, role: AgentRole, success: bool) {
        let pb = {
            let mut spinners = self.spinners.lock().unwrap_or_else(PoisonError::into_inner);
            spinners
                .iter()
                .position(|(r, _)| *r == role)
                .map(|i| spinners.remove(i).1)
        };
        if let Some(pb) = pb {
            if success {
                pb.finish_and_clear();
            } else {
                pb.abandon_with_message(format!("{}", "failed".red()));
            }
        }
    }

    fn on_topics_planned(&self, topics: &[Topic]) {
        let _ = self.multi.println(ConsoleFormatter::format_plan(topics));
    }
}

/// Plain text progress (no spinners)
pub struct SimpleProgress;

impl InterviewProgressNotifier for SimpleProgress {
    fn on_agent_call_start(&self, role: AgentRole, topic: Option<&str>) {
        println!(
            "{} {} {}",
            "->".cyan(),
            ProgressReporter::role_display_name(role).bold(),
            ProgressReporter::call_message(role, topic).dimmed()
        );
    }

    fn on_agent_call_end(&self, role: AgentRole, success: bool) {
        if !success {
            println!("  {} {} (failed)", "x".red(), role);
        }
    }

    fn on_topics_planned(&self, topics: &[Topic]) {
        println!("{}", ConsoleFormatter::format_plan(topics));
    }
}
