//! External checker command as an analysis tool
//!
//! The code under review is written to the command's stdin. Every non-empty
//! stdout line becomes one finding, whatever the exit code. A non-clean exit
//! with nothing on stdout is a tool error. `path:line[:col]: message` lines
//! keep their line number, and a `[LOW]`/`[MEDIUM]`/`[HIGH]` or
//! `severity: <level>` marker sets the severity.

use crate::config::FileToolCommandConfig;
use crate::process::{self, ProcessError};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;
use tutor_application::{AnalysisTool, ToolError};
use tutor_domain::agent::findings::{Finding, Findings, Severity};
use tutor_domain::core::string::preview;

static LOCATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[^:\s]*:)?(\d+):(?:\d+:)?\s*(.+)$").unwrap());

static SEVERITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[(low|medium|high)\]|severity\W+(low|medium|high)\b").unwrap()
});

pub struct CommandAnalysisTool {
    command: String,
    args: Vec<String>,
    clean_exit_codes: Vec<i32>,
    timeout: Duration,
    description: String,
}

impl CommandAnalysisTool {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        let command = command.into();
        let description = format!(
            "Runs `{}` on the code and reports one finding per output line.",
            command
        );
        Self {
            command,
            args,
            clean_exit_codes: vec![0],
            timeout: Duration::from_secs(30),
            description,
        }
    }

    pub fn from_config(config: &FileToolCommandConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
            .with_clean_exit_codes(config.clean_exit_codes.clone())
            .with_timeout_seconds(config.timeout_seconds)
    }

    pub fn with_clean_exit_codes(mut self, codes: Vec<i32>) -> Self {
        self.clean_exit_codes = codes;
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }

}

/// One output line into a finding
fn parse_line(line: &str) -> Finding {
    let mut finding = match LOCATED.captures(line) {
        Some(caps) => match caps[1].parse::<usize>() {
            Ok(number) => Finding::new(caps[2].trim()).at_line(number),
            Err(_) => Finding::new(line),
        },
        None => Finding::new(line),
    };

    if let Some(caps) = SEVERITY.captures(line) {
        let level = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
        if let Some(severity) = level.and_then(|l| l.parse::<Severity>().ok()) {
            finding = finding.with_severity(severity);
        }
    }
    finding
}

#[async_trait]
impl AnalysisTool for CommandAnalysisTool {
    fn name(&self) -> &str {
        &self.command
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn analyze(&self, code: &str) -> Result<Findings, ToolError> {
        debug!("Running analysis command {}", self.command);
        let output = process::run_with_stdin(&self.command, &self.args, code, self.timeout)
            .await
            .map_err(|e| match e {
                ProcessError::NotFound(cmd) => ToolError::NotAvailable(cmd),
                ProcessError::Timeout(_, secs) => ToolError::Timeout(secs),
                other => ToolError::ExecutionFailed(other.to_string()),
            })?;

        let items: Vec<Finding> = output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(parse_line)
            .collect();

        // Checkers that exit non-zero on findings still print them
        let clean_exit = output
            .exit_code
            .is_some_and(|code| self.clean_exit_codes.contains(&code));
        if !clean_exit && items.is_empty() {
            return Err(ToolError::ExecutionFailed(format!(
                "{} exited with {}: {}",
                self.command,
                output
                    .exit_code
                    .map_or_else(|| "signal".to_string(), |c| c.to_string()),
                preview(output.stderr.trim(), 200)
            )));
        }

        Ok(Findings::from_items(
            items,
            format!("No issues reported by {}.", self.command),
        ))
    }
}
