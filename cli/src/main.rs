//! CLI entrypoint for code-tutor
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::io::{IsTerminal, Read};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};
use tutor_application::{
    BehaviorConfig, NoProgress, Orchestrator, ReviewAgent, ReviewProgressNotifier, ReviewSession,
};
use tutor_domain::ExecutionMode;
use tutor_infrastructure::{ConfigLoader, FileConfig, ToolRegistry, build_oracle};
use tutor_presentation::{
    Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter, ReviewRepl, SimpleProgress,
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref())?;

    info!("Starting code-tutor");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config error: {}", issue);
        }
        bail!("Invalid configuration ({} issue(s))", issues.len());
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    let mut behavior = config.session.to_behavior_config();
    if let Some(mode) = cli.mode {
        behavior = BehaviorConfig::with_execution_mode(mode.into());
    }
    let show_progress = !cli.quiet && config.output.show_progress;

    // === Dependency Injection ===
    let session = build_session(&config, &behavior)?;

    match cli.command.clone().unwrap_or(Command::Repl { file: None }) {
        Command::Repl { file } => {
            let mut session = session;
            if let Some(path) = file {
                session.submit_code(&read_source(&path)?);
            }
            let mut repl = ReviewRepl::new(session)
                .with_progress(show_progress)
                .with_history_file(config.repl.history_path())
                .with_history_size(config.repl.history_size);
            repl.run().await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Plan { file } => {
            let mut session = session;
            load(&mut session, &file)?;
            let progress = progress_notifier(show_progress, cli.output);
            let resolution = session.generate_plan_with_progress(progress.as_ref()).await?;
            let output = match cli.output {
                OutputFormat::Text => ConsoleFormatter::format_plan(&resolution),
                OutputFormat::Json => ConsoleFormatter::format_plan_json(&resolution),
            };
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Command::Execute { file } => {
            let mut session = session;
            load(&mut session, &file)?;
            let progress = progress_notifier(show_progress, cli.output);
            let resolution = session.generate_plan_with_progress(progress.as_ref()).await?;
            if cli.output == OutputFormat::Text {
                println!("{}", ConsoleFormatter::format_plan(&resolution));
            }
            let report = session.execute_all(progress.as_ref()).await?;
            let output = match cli.output {
                OutputFormat::Text => ConsoleFormatter::format_execution(&report),
                OutputFormat::Json => {
                    ConsoleFormatter::format_execution_json(session.plan(), &report)
                }
            };
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Command::Review { file } => {
            let mut session = session;
            // Nobody is around to resume a paused batch run
            session.set_mode(ExecutionMode::FreeRun);
            load(&mut session, &file)?;

            if !cli.quiet && cli.output == OutputFormat::Text {
                println!();
                println!("+============================================================+");
                println!("|              Code Tutor - Multi-Agent Review               |");
                println!("+============================================================+");
                println!();
                println!("Oracle: {}", session.orchestrator().oracle_name());
                println!("Mode:   {}", session.mode());
                println!();
            }

            let progress = progress_notifier(show_progress, cli.output);
            let resolution = session.generate_plan_with_progress(progress.as_ref()).await?;
            if cli.output == OutputFormat::Text {
                println!("{}", ConsoleFormatter::format_plan(&resolution));
            }

            let summary = session.run_or_resume_with_progress(progress.as_ref()).await?;

            let output = match cli.output {
                OutputFormat::Text => ConsoleFormatter::format_transcript(session.transcript()),
                OutputFormat::Json => ConsoleFormatter::format_json(session.transcript()),
            };
            println!("{}", output);

            if summary.stop.is_failure() {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Console logging by verbosity, plus a daily rotated file when `log_dir`
/// is given. The returned guard flushes the file writer on drop.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "code-tutor.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(log_filter(verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn log_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    }
}

/// Oracle, tools and agents from the configuration, wrapped in a session
fn build_session(config: &FileConfig, behavior: &BehaviorConfig) -> Result<ReviewSession> {
    let oracle = build_oracle(&config.oracle).context("Failed to set up the oracle")?;
    let tools = ToolRegistry::from_config(&config.tools)?;

    let roster = config
        .agents
        .profiles()?
        .into_iter()
        .map(|profile| {
            let tool = tools.get(profile.concern);
            Arc::new(ReviewAgent::new(profile, tool, Arc::clone(&oracle)))
        })
        .collect();

    let orchestrator = Orchestrator::new(roster, oracle)?;
    info!(
        "Roster: {}",
        orchestrator
            .roster_names()
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(ReviewSession::new(orchestrator, behavior))
}

/// Spinners on a terminal, plain lines when piped, nothing for JSON or `-q`
fn progress_notifier(show_progress: bool, output: OutputFormat) -> Box<dyn ReviewProgressNotifier> {
    if !show_progress {
        return Box::new(NoProgress);
    }
    if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else if output == OutputFormat::Text {
        Box::new(SimpleProgress)
    } else {
        Box::new(NoProgress)
    }
}

fn load(session: &mut ReviewSession, path: &Path) -> Result<()> {
    let code = read_source(path)?;
    if code.trim().is_empty() {
        bail!("{} is empty; nothing to review", path.display());
    }
    session.submit_code(&code);
    Ok(())
}

/// File contents, or stdin for `-`
fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut code = String::new();
        std::io::stdin()
            .read_to_string(&mut code)
            .context("Failed to read code from stdin")?;
        return Ok(code);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tutor_infrastructure::{FileOracleConfig, OracleProvider};

    #[test]
    fn test_read_source_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "print('hi')\n").unwrap();
        assert_eq!(read_source(file.path()).unwrap(), "print('hi')\n");
    }

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source(Path::new("/definitely/not/here.py")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_build_session_from_defaults() {
        let config = ConfigLoader::load_defaults();
        let session = build_session(&config, &BehaviorConfig::default()).unwrap();
        assert_eq!(session.orchestrator().roster().len(), 9);
        assert!(session.plan().is_empty());
    }

    #[test]
    fn test_build_session_rejects_missing_oracle_command() {
        let config = FileConfig {
            oracle: FileOracleConfig {
                provider: OracleProvider::Command,
                command: None,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(build_session(&config, &BehaviorConfig::default()).is_err());
    }
}
