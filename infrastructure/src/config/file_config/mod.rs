//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agents;
mod oracle;
mod output;
mod repl;
mod session;
mod tools;

pub use agents::FileAgentsConfig;
pub use oracle::{FileOracleConfig, OracleProvider};
pub use output::FileOutputConfig;
pub use repl::FileReplConfig;
pub use session::FileSessionConfig;
pub use tools::FileToolCommandConfig;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("oracle.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("oracle.model cannot be empty")]
    EmptyModelName,

    #[error("oracle.endpoint cannot be empty")]
    EmptyEndpoint,

    #[error("oracle.command is required when provider = \"command\"")]
    MissingOracleCommand,

    #[error("agents.roster cannot be empty")]
    EmptyRoster,

    #[error("duplicate agent in agents.roster: {0}")]
    DuplicateAgent(String),

    #[error("unknown agent in agents.roster: {0}")]
    UnknownAgent(String),

    #[error("agents.policies.{0} is set but {0} is not in the roster")]
    OrphanPolicy(String),

    #[error("unknown concern in [tools]: {0}")]
    UnknownConcern(String),

    #[error("tools.{0}.command cannot be empty")]
    EmptyToolCommand(String),

    #[error("tools.{0}.timeout_seconds cannot be 0")]
    InvalidToolTimeout(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Text oracle (LLM) settings
    pub oracle: FileOracleConfig,
    /// Review session behavior
    pub session: FileSessionConfig,
    /// Agent roster and validation policies
    pub agents: FileAgentsConfig,
    /// External checkers replacing built-in analysis tools, keyed by concern
    pub tools: BTreeMap<String, FileToolCommandConfig>,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        issues.extend(self.oracle.validate());
        issues.extend(self.agents.validate());
        for (concern, tool) in &self.tools {
            issues.extend(tool.validate(concern));
        }
        issues
    }
}
