//! Slash commands understood at the answer prompt.

/// A line starting with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    /// Topic table with status and question counts
    Status,
    /// Re-run the step that failed after the last answer
    Retry,
    /// Finish now and print the report
    End,
    /// Abandon without a report
    Quit,
    Unknown(String),
}

impl ReplCommand {
    /// `None` when `line` is an answer rather than a command.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if !line.starts_with('/') {
            return None;
        }
        let command = line.split_whitespace().next().unwrap_or(line);

        Some(match command {
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/status" | "/s" => ReplCommand::Status,
            "/retry" | "/r" => ReplCommand::Retry,
            "/end" | "/done" => ReplCommand::End,
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            other => ReplCommand::Unknown(other.to_string()),
        })
    }

    pub fn help() -> &'static [(&'static str, &'static str)] {
        &[
            ("/help, /h, /?", "Show this help"),
            ("/status, /s", "Show topics and progress"),
            ("/retry, /r", "Retry after a failed agent call"),
            ("/end, /done", "Finish now and print the report (also Ctrl-D)"),
            ("/quit, /q", "Abandon the interview without a report"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_are_not_commands() {
        assert_eq!(ReplCommand::parse("I would use a channel"), None);
        assert_eq!(ReplCommand::parse("  path/to/file  "), None);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(ReplCommand::parse("/s"), Some(ReplCommand::Status));
        assert_eq!(ReplCommand::parse(" /retry "), Some(ReplCommand::Retry));
        assert_eq!(ReplCommand::parse("/done"), Some(ReplCommand::End));
        assert_eq!(ReplCommand::parse("/exit"), Some(ReplCommand::Quit));
    }

    #[test]
    fn test_unknown_keeps_the_word() {
        assert_eq!(
            ReplCommand::parse("/skip topic"),
            Some(ReplCommand::Unknown("/skip".into()))
        );
    }
}
