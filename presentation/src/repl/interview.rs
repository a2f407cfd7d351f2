//! Answer loop for one interview

use super::command::ReplCommand;
use crate::config::{OutputConfig, ReplConfig};
use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use interview_application::{
    AgentGateway, InterviewError, InterviewOrchestrator, InterviewReport, SubmitOutcome,
};
use interview_domain::OutputFormat;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use tracing::{debug, warn};

/// What the loop should do after handling a line
enum Flow {
    Continue,
    Finished(InterviewReport),
    Abandoned,
}

/// Interactive interview REPL
pub struct InterviewRepl<G: AgentGateway + 'static> {
    orchestrator: InterviewOrchestrator<G>,
    output: OutputConfig,
    config: ReplConfig,
}

impl<G: AgentGateway + 'static> InterviewRepl<G> {
    pub fn new(orchestrator: InterviewOrchestrator<G>) -> Self {
        Self {
            orchestrator,
            output: OutputConfig::default(),
            config: ReplConfig::default(),
        }
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    pub fn orchestrator(&self) -> &InterviewOrchestrator<G> {
        &self.orchestrator
    }

    /// Run the loop starting from `first`, the outcome of `start` or
    /// `resume`. Returns the report, or `None` if the interview was
    /// abandoned.
    pub async fn run(&self, first: SubmitOutcome) -> RlResult<Option<InterviewReport>> {
        let question = match first {
            SubmitOutcome::NextQuestion(question) => question,
            SubmitOutcome::Finished(report) => {
                self.print_report(&report);
                return Ok(Some(report));
            }
        };

        let mut rl = DefaultEditor::new()?;
        if let Some(path) = &self.config.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if rl.load_history(path).is_err() {
                debug!("No answer history at {}", path.display());
            }
        }

        self.print_welcome();
        println!("{}", ConsoleFormatter::format_question(&question));

        let result = loop {
            let line = match rl.readline("answer> ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!(
                        "^C  (type {} to finish or {} to abandon)",
                        "/end".cyan(),
                        "/quit".cyan()
                    );
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Ending interview...");
                    let report = after_input_closed(self.end().await);
                    if report.is_none() {
                        println!(
                            "Input closed. Your answers are saved; run with {} to continue.",
                            "--resume".cyan()
                        );
                    }
                    break report;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break None;
                }
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let flow = match ReplCommand::parse(line) {
                Some(command) => {
                    debug!("REPL command: {:?}", command);
                    self.handle_command(command).await
                }
                None => {
                    let _ = rl.add_history_entry(line);
                    let result = self.orchestrator.submit_answer(line).await;
                    self.handle_outcome(result)
                }
            };

            match flow {
                Flow::Continue => continue,
                Flow::Finished(report) => break Some(report),
                Flow::Abandoned => break None,
            }
        };

        if let Some(path) = &self.config.history_file
            && let Err(e) = rl.save_history(path)
        {
            warn!("Could not save answer history to {}: {}", path.display(), e);
        }

        if let Some(report) = &result {
            self.print_report(report);
        }
        Ok(result)
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│                 Interviewer                 │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Answer each question on one line. Type {} for commands.",
            "/help".cyan()
        );
    }

    async fn handle_command(&self, command: ReplCommand) -> Flow {
        match command {
            ReplCommand::Help => {
                println!();
                println!("{}", "Commands:".bold());
                for (names, description) in ReplCommand::help() {
                    println!("  {:<16} - {}", names, description);
                }
                println!();
                Flow::Continue
            }
            ReplCommand::Status => {
                match self.orchestrator.status() {
                    Some(status) => println!("{}", ConsoleFormatter::format_status(&status)),
                    None => println!("No interview status available right now."),
                }
                Flow::Continue
            }
            ReplCommand::Retry => {
                let result = self.orchestrator.retry().await;
                self.handle_outcome(result)
            }
            ReplCommand::End => self.end().await,
            ReplCommand::Quit => match self.orchestrator.abandon().await {
                Ok(()) => {
                    println!("Interview abandoned.");
                    Flow::Abandoned
                }
                Err(e) => {
                    eprintln!("{} {}", "Error:".red().bold(), e);
                    Flow::Continue
                }
            },
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type {} for available commands", "/help".cyan());
                Flow::Continue
            }
        }
    }

    async fn end(&self) -> Flow {
        match self.orchestrator.end().await {
            Ok(report) => Flow::Finished(report),
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                Flow::Continue
            }
        }
    }

    fn handle_outcome(&self, result: Result<SubmitOutcome, InterviewError>) -> Flow {
        match result {
            Ok(SubmitOutcome::NextQuestion(question)) => {
                println!("{}", ConsoleFormatter::format_question(&question));
                Flow::Continue
            }
            Ok(SubmitOutcome::Finished(report)) => Flow::Finished(report),
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                if e.is_recoverable() || matches!(e, InterviewError::RetryPending) {
                    println!(
                        "Your answer is saved. Type {} to try again or {} to finish.",
                        "/retry".cyan(),
                        "/end".cyan()
                    );
                }
                Flow::Continue
            }
        }
    }

    fn print_report(&self, report: &InterviewReport) {
        match self.output.format {
            OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(report)),
            OutputFormat::Full => println!("{}", ConsoleFormatter::format(report)),
        }
    }
}

/// Input is gone, so the loop stops whatever `end` produced.
fn after_input_closed(flow: Flow) -> Option<InterviewReport> {
    match flow {
        Flow::Finished(report) => Some(report),
        Flow::Continue | Flow::Abandoned => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_input_stops_after_failed_end() {
        assert!(after_input_closed(Flow::Continue).is_none());
        assert!(after_input_closed(Flow::Abandoned).is_none());
    }
}
