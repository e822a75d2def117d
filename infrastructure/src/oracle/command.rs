//! Command-backed oracle
//!
//! Runs a local command per prompt (e.g. `ollama run llama3`, `llm -m ...`):
//! the prompt goes to stdin and trimmed stdout is the answer.

use crate::process::{self, ProcessError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use tutor_application::{OracleError, TextOracle};
use tutor_domain::core::string::preview;

pub struct CommandOracle {
    command: String,
    args: Vec<String>,
    timeout: Duration,
    label: String,
}

impl CommandOracle {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        let command = command.into();
        let label = if args.is_empty() {
            command.clone()
        } else {
            format!("{} {}", command, args.join(" "))
        };
        Self {
            command,
            args,
            timeout: Duration::from_secs(120),
            label,
        }
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }

    /// Is the command installed?
    pub fn is_available(&self) -> bool {
        process::locate(&self.command).is_ok()
    }
}

#[async_trait]
impl TextOracle for CommandOracle {
    fn name(&self) -> &str {
        &self.label
    }

    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        debug!("Running oracle command {}", self.label);
        let output = process::run_with_stdin(&self.command, &self.args, prompt, self.timeout)
            .await
            .map_err(|e| match e {
                ProcessError::NotFound(cmd) => OracleError::Unavailable(cmd),
                ProcessError::Timeout(..) => OracleError::Timeout,
                other => OracleError::RequestFailed(other.to_string()),
            })?;

        if output.exit_code != Some(0) {
            return Err(OracleError::RequestFailed(format!(
                "{} exited with {}: {}",
                self.command,
                output
                    .exit_code
                    .map_or_else(|| "signal".to_string(), |c| c.to_string()),
                preview(&output.stderr, 200)
            )));
        }

        let answer = output.stdout.trim();
        if answer.is_empty() {
            return Err(OracleError::InvalidResponse(format!(
                "{} produced no output",
                self.command
            )));
        }
        Ok(answer.to_string())
    }
}
