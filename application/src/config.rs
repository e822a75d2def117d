//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave.

use tutor_domain::ExecutionMode;

/// Application behavior configuration.
///
/// Controls how a review session advances between agents.
#[derive(Debug, Clone, Default)]
pub struct BehaviorConfig {
    /// Whether the session pauses after every passing agent.
    pub execution_mode: ExecutionMode,
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig with the given execution mode.
    pub fn with_execution_mode(mode: ExecutionMode) -> Self {
        Self {
            execution_mode: mode,
        }
    }
}
