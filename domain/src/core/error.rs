//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No review agents configured")]
    EmptyRoster,

    #[error("Duplicate agent name in roster: {0}")]
    DuplicateAgent(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Unknown concern: {0}")]
    UnknownConcern(String),

    #[error("Invalid severity: {0}")]
    InvalidSeverity(String),

    #[error("Invalid execution mode: {0}")]
    InvalidExecutionMode(String),
}

impl DomainError {
    /// Check if this error comes from roster construction
    pub fn is_roster_error(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyRoster | DomainError::DuplicateAgent(_) | DomainError::UnknownAgent(_)
        )
    }
}
