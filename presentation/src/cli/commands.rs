//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tutor_domain::ExecutionMode;

/// Output format for transcripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable transcript
    Text,
    /// Transcript entries as a JSON array
    Json,
}

/// How the review advances after an agent passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Keep going until the first failing agent or the end of the plan
    FreeRun,
    /// Stop after every passing agent
    Interactive,
}

impl From<ModeArg> for ExecutionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::FreeRun => ExecutionMode::FreeRun,
            ModeArg::Interactive => ExecutionMode::Interactive,
        }
    }
}

/// CLI arguments for code-tutor
#[derive(Parser, Debug)]
#[command(name = "code-tutor")]
#[command(author, version, about = "Multi-agent code review tutor backed by an LLM")]
#[command(long_about = r#"
code-tutor reviews a code snippet with a team of specialised agents
(syntax, semantics, style, structure, security, efficiency, documentation,
error handling, best practices).

An orchestrator drafts a plan naming the agents to run. Agents then run in
order; each one runs its analysis tool, writes a report and decides whether
the code passes. The first failing agent stops the review until you submit
corrected code, and the review resumes at that same agent.

Configuration files are loaded from (in priority order):
1. TUTOR_* environment variables
2. --config <path>     Explicit config file
3. ./tutor.toml        Project-level config
4. ~/.config/code-tutor/config.toml   Global config

Example:
  code-tutor review snippet.py
  code-tutor plan snippet.py
  code-tutor --mode interactive repl snippet.py
  cat snippet.py | code-tutor review -
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Override the session execution mode
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to a daily rotated file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Draft a plan and run the review until an agent fails or all pass
    Review {
        /// Source file to review (`-` for stdin)
        file: PathBuf,
    },
    /// Run every planned agent regardless of verdicts and print all reports
    Execute {
        /// Source file to review (`-` for stdin)
        file: PathBuf,
    },
    /// Only draft and print the execution plan
    Plan {
        /// Source file to review (`-` for stdin)
        file: PathBuf,
    },
    /// Interactive session (the default)
    Repl {
        /// Optional file to load as the initial code
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_review_with_flags() {
        let cli = Cli::parse_from([
            "code-tutor",
            "-vv",
            "--mode",
            "interactive",
            "review",
            "snippet.py",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.mode, Some(ModeArg::Interactive));
        assert_eq!(
            cli.command,
            Some(Command::Review {
                file: PathBuf::from("snippet.py")
            })
        );
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::parse_from(["code-tutor", "--quiet"]);
        assert!(cli.quiet);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_mode_conversion() {
        assert_eq!(ExecutionMode::from(ModeArg::FreeRun), ExecutionMode::FreeRun);
        assert_eq!(
            ExecutionMode::from(ModeArg::Interactive),
            ExecutionMode::Interactive
        );
    }
}
