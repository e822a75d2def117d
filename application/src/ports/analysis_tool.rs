//! Analysis tool port
//!
//! One deterministic checker per review concern.

use async_trait::async_trait;
use thiserror::Error;
use tutor_domain::Findings;

/// Errors raised by an analysis tool
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Tool not available: {0}")]
    NotAvailable(String),

    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Tool timed out after {0}s")]
    Timeout(u64),

    #[error("Invalid tool output: {0}")]
    InvalidOutput(String),
}

/// Static analysis over a code snippet
#[async_trait]
pub trait AnalysisTool: Send + Sync {
    fn name(&self) -> &str;

    /// One-line description, included in the agent's planning prompt
    fn description(&self) -> &str;

    /// Analyze `code`. Findings are opaque to the agent and rendered
    /// verbatim into the report prompt.
    async fn analyze(&self, code: &str) -> Result<Findings, ToolError>;
}
