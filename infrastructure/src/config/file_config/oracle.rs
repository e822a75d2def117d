//! Oracle configuration from TOML (`[oracle]` section)

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};

/// Which adapter answers prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleProvider {
    /// OpenAI-compatible chat-completions endpoint
    #[default]
    Http,
    /// External command: prompt on stdin, answer on stdout
    Command,
}

/// Raw oracle configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOracleConfig {
    pub provider: OracleProvider,
    /// Full chat-completions URL (works with OpenAI, Ollama, vLLM, LM Studio)
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key; unset means no auth header
    pub api_key_env: String,
    /// Executable for the `command` provider
    pub command: Option<String>,
    pub args: Vec<String>,
    pub timeout_seconds: u64,
    pub temperature: Option<f32>,
    /// Retries for transient HTTP failures (connection, 429, timeout)
    pub max_retries: u32,
}

impl Default for FileOracleConfig {
    fn default() -> Self {
        Self {
            provider: OracleProvider::Http,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            command: None,
            args: Vec::new(),
            timeout_seconds: 120,
            temperature: None,
            max_retries: 2,
        }
    }
}

impl FileOracleConfig {
    pub(super) fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        if self.timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        match self.provider {
            OracleProvider::Http => {
                if self.endpoint.trim().is_empty() {
                    issues.push(ConfigValidationError::EmptyEndpoint);
                }
                if self.model.trim().is_empty() {
                    issues.push(ConfigValidationError::EmptyModelName);
                }
            }
            OracleProvider::Command => {
                if self.command.as_deref().is_none_or(|c| c.trim().is_empty()) {
                    issues.push(ConfigValidationError::MissingOracleCommand);
                }
            }
        }
        issues
    }
}
