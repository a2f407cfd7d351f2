//! CLI entrypoint for interviewer
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;
use interview_application::{
    ConversationLogger, InterviewOrchestrator, InterviewProgressNotifier, NoConversationLogger,
    NoProgress, NoSessionStore, SessionStore, SubmitOutcome,
};
use interview_domain::CandidateContext;
use interview_infrastructure::{
    ConfigLoader, FileConfig, HttpAgentGateway, HttpGatewayConfig, JsonFileSessionStore,
    JsonlConversationLogger,
};
use interview_presentation::{Cli, InterviewRepl, OutputConfig, ProgressReporter, ReplConfig};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    info!("Starting interviewer");

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {e}"))?
    };
    apply_cli_overrides(&mut config, &cli);
    check_config(&config)?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let gateway = Arc::new(
        HttpAgentGateway::new(HttpGatewayConfig::from_file_config(
            &config.agent,
            &config.retry,
        ))
        .context("Failed to create the agent gateway")?,
    );

    let store: Arc<dyn SessionStore> = match config.persistence.resolved_path() {
        Some(path) if config.persistence.enabled => {
            info!("Saving interview progress to {}", path.display());
            Arc::new(JsonFileSessionStore::new(path))
        }
        _ => Arc::new(NoSessionStore),
    };

    let conversation_log = cli
        .conversation_log
        .clone()
        .or_else(|| config.logging.conversation_log.as_ref().map(Into::into));
    let logger: Arc<dyn ConversationLogger> = match conversation_log
        .as_deref()
        .and_then(JsonlConversationLogger::open)
    {
        Some(logger) => {
            info!("Transcript: {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    };

    let progress: Arc<dyn InterviewProgressNotifier> = if cli.quiet {
        Arc::new(NoProgress)
    } else {
        Arc::new(ProgressReporter::new())
    };

    let orchestrator = InterviewOrchestrator::new(gateway, Arc::clone(&store))
        .with_params(config.interview.to_params())
        .with_progress(progress)
        .with_conversation_logger(logger);

    // === Start or resume ===
    let first = if cli.resume {
        orchestrator
            .resume()
            .await
            .context("Could not resume the saved interview")?
    } else {
        let (Some(jd_path), Some(cv_path)) = (&cli.job_description, &cli.cv) else {
            bail!("--job-description and --cv are required unless --resume is given");
        };
        if matches!(store.load(), Ok(Some(_))) {
            println!(
                "{} a saved interview exists and will be replaced (use {} to continue it)",
                "Note:".yellow().bold(),
                "--resume".cyan()
            );
        }

        let context = CandidateContext::new(read_input(jd_path)?, read_input(cv_path)?);
        let question = orchestrator
            .start(context)
            .await
            .context("Could not start the interview")?;
        SubmitOutcome::NextQuestion(question)
    };

    let output = OutputConfig {
        format: cli
            .output
            .map(Into::into)
            .or(config.output.format)
            .unwrap_or_default(),
        color: config.output.color,
    };
    let repl = InterviewRepl::new(orchestrator)
        .with_output(output)
        .with_config(ReplConfig::default().with_progress(!cli.quiet));

    match repl.run(first).await? {
        Some(report) if !report.incomplete.is_empty() => {
            warn!("{} topic(s) ended without a verdict", report.incomplete.len());
        }
        Some(_) => info!("Interview complete"),
        None => info!("Interview abandoned"),
    }

    Ok(())
}

/// Diagnostics go to stderr, and also to `--log-file` when given.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let Some(path) = &cli.log_file else {
        tracing_subscriber::registry().with(stderr_layer).init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("--log-file must name a file: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        dir, file_name,
    ));
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter());

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(Some(guard))
}

fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(model) = &cli.model {
        config.agent.model = model.clone();
    }
    if let Some(max_questions) = cli.max_questions {
        config.interview.max_questions_per_topic = max_questions;
    }
    if cli.no_summary {
        config.interview.enable_final_summary = false;
    }
    if cli.no_persist {
        config.persistence.enabled = false;
    }
}

/// Print warnings; fail on errors.
fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    let mut errors = 0;
    for issue in &issues {
        if issue.is_error() {
            errors += 1;
            eprintln!("{} {}: {}", "config error:".red().bold(), issue.key, issue.message);
        } else {
            eprintln!("{} {}: {}", "config warning:".yellow(), issue.key, issue.message);
        }
    }
    if errors > 0 {
        bail!("{errors} configuration error(s)");
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
