//! Console rendering of questions, status and the final report

use crate::output::formatter::ReportFormatter;
use colored::Colorize;
use interview_application::{CurrentQuestion, InterviewReport, InterviewStatus, TopicReport};
use interview_domain::{FinalSummary, Topic, TopicStatus, Verdict};

/// Formats interview output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Complete report: every topic's verdict, incomplete topics, summary.
    pub fn format(report: &InterviewReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Interview Report"));
        output.push('\n');

        output.push_str(&Self::section_header("Topics"));
        for (index, topic) in report.topics.iter().enumerate() {
            output.push_str(&Self::format_topic_report(index, topic));
        }

        if !report.incomplete.is_empty() {
            output.push_str(&format!(
                "\n{}\n",
                "Not assessed:".yellow().bold()
            ));
            for name in &report.incomplete {
                output.push_str(&format!("  * {}\n", name));
            }
        }

        if let Some(summary) = &report.summary {
            output.push_str(&Self::section_header("Summary"));
            output.push_str(&Self::format_summary(summary));
        }

        let drain = &report.drain;
        if drain.failed > 0 || drain.timed_out > 0 {
            output.push_str(&format!(
                "\n{} {} background verdict(s) failed, {} timed out\n",
                "Note:".dimmed(),
                drain.failed,
                drain.timed_out
            ));
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_json(report: &InterviewReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// The question block printed before each answer prompt.
    pub fn format_question(question: &CurrentQuestion) -> String {
        let mut output = String::new();
        if question.question_number == 1 {
            output.push_str(&format!(
                "\n{}\n",
                format!(
                    "── Topic {}/{}: {} ──",
                    question.topic_index + 1,
                    question.total_topics,
                    question.topic_name
                )
                .cyan()
                .bold()
            ));
        }
        output.push_str(&format!(
            "\n{} {}\n",
            format!("Q{}/{}", question.question_number, question.max_questions)
                .yellow()
                .bold(),
            question.text
        ));
        output
    }

    /// Planned topics, printed once after planning.
    pub fn format_plan(topics: &[Topic]) -> String {
        let mut output = format!("\n{}\n", "Planned topics:".cyan().bold());
        for (index, topic) in topics.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} {}\n",
                index + 1,
                topic.name.bold(),
                format!(
                    "(importance {}, {} level)",
                    topic.importance, topic.required_level
                )
                .dimmed()
            ));
        }
        output
    }

    /// Topic table for `/status`.
    pub fn format_status(status: &InterviewStatus) -> String {
        let session = &status.session;
        let mut output = format!(
            "\n{} {}\n",
            "Phase:".cyan().bold(),
            status.phase
        );

        for (index, (topic, state)) in session
            .topics()
            .iter()
            .zip(session.topic_states())
            .enumerate()
        {
            let marker = if index == session.current_topic_index() {
                ">".green().bold().to_string()
            } else {
                " ".to_string()
            };
            output.push_str(&format!(
                "{} {:>2}. {:<32} {:<12} {}/{}\n",
                marker,
                index + 1,
                topic.name,
                Self::status_label(state.status),
                state.questions_asked(),
                session.max_questions_per_topic()
            ));
        }

        if status.pending_background_verdicts > 0 {
            output.push_str(&format!(
                "{} {} verdict(s) still being prepared\n",
                "…".dimmed(),
                status.pending_background_verdicts
            ));
        }
        output
    }

    fn status_label(status: TopicStatus) -> String {
        match status {
            TopicStatus::NotStarted => status.as_str().dimmed().to_string(),
            TopicStatus::Probing => status.as_str().yellow().to_string(),
            TopicStatus::Done => status.as_str().green().to_string(),
        }
    }

    fn format_topic_report(index: usize, topic: &TopicReport) -> String {
        let title = format!(
            "{}. {} (importance {}, requires {})",
            index + 1,
            topic.name,
            topic.importance,
            topic.required_level
        );
        match &topic.verdict {
            Some(verdict) => format!(
                "\n{}\n{}",
                title.yellow().bold(),
                Self::format_verdict(verdict, topic.required_level)
            ),
            None => format!(
                "\n{}\n  {} after {} question(s)\n",
                title.red().bold(),
                "No verdict".red(),
                topic.questions_asked
            ),
        }
    }

    fn format_verdict(verdict: &Verdict, required: interview_domain::Level) -> String {
        let level = if verdict.meets(required) {
            verdict.assessed_level.to_string().green()
        } else {
            verdict.assessed_level.to_string().red()
        };
        let mut output = format!(
            "  Level: {}  Score: {:.1}/5  Confidence: {:.0}%\n",
            level,
            verdict.score,
            verdict.confidence * 100.0
        );
        for strength in &verdict.strengths {
            output.push_str(&format!("  {} {}\n", "+".green(), strength));
        }
        for gap in &verdict.gaps {
            output.push_str(&format!("  {} {}\n", "-".red(), gap));
        }
        output
    }

    fn format_summary(summary: &FinalSummary) -> String {
        let mut output = format!(
            "\n{} {}% ({})\n",
            "Overall fit:".bold(),
            summary.fit_overall_percent,
            summary.fit_label.as_str().cyan()
        );
        for topic in &summary.per_topic {
            output.push_str(&format!(
                "  * {} [{} {:.1}]: {}\n",
                topic.name.bold(),
                topic.assessed_level,
                topic.score,
                topic.comment
            ));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format(&self, report: &InterviewReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &InterviewReport) -> String {
        Self::format_json(report)
    }
}
