//! Text oracle port
//!
//! Defines the interface for the text-generation model every agent and the
//! orchestrator talk to.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during oracle calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Oracle not available: {0}")]
    Unavailable(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl OracleError {
    /// Errors worth retrying at the adapter level
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OracleError::Connection(_) | OracleError::RateLimited | OracleError::Timeout
        )
    }
}

/// Prompt in, text out.
///
/// Implementations (adapters) live in the infrastructure layer and own
/// timeouts and retries; callers convert every error into visible text.
#[async_trait]
pub trait TextOracle: Send + Sync {
    /// Short label for logs and `--show-config`
    fn name(&self) -> &str;

    /// Complete a single prompt
    async fn complete(&self, prompt: &str) -> Result<String, OracleError>;
}
