//! External analysis tool configuration from TOML (`[tools.<concern>]`)
//!
//! ```toml
//! [tools.security]
//! command = "bandit"
//! args = ["-q", "-f", "custom", "--msg-template", "{line}: {msg}", "-"]
//! clean_exit_codes = [0]
//! ```

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};
use tutor_domain::Concern;

/// Checker command replacing the built-in heuristic for one concern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolCommandConfig {
    pub command: String,
    pub args: Vec<String>,
    /// Exit codes that mean "ran successfully" (findings may still exist)
    pub clean_exit_codes: Vec<i32>,
    pub timeout_seconds: u64,
}

impl Default for FileToolCommandConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            args: Vec::new(),
            clean_exit_codes: vec![0],
            timeout_seconds: 30,
        }
    }
}

impl FileToolCommandConfig {
    pub(super) fn validate(&self, key: &str) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        if key.parse::<Concern>().is_err() {
            issues.push(ConfigValidationError::UnknownConcern(key.to_string()));
        }
        if self.command.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyToolCommand(key.to_string()));
        }
        if self.timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidToolTimeout(key.to_string()));
        }
        issues
    }
}
