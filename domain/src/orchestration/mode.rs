//! Execution mode for the review session.
//!
//! Decides what happens after an agent passes while more agents remain:
//! - FreeRun: continue immediately until completion or first failure
//! - Interactive: pause and wait for the human to advance

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the session advances between passing agents.
///
/// Neither mode ever proceeds past a failing agent on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Run to completion or the first failing agent
    #[default]
    FreeRun,
    /// Pause after every passing agent until the human advances
    Interactive,
}

impl ExecutionMode {
    pub fn description(&self) -> &'static str {
        match self {
            ExecutionMode::FreeRun => "Free-run: continue until completion or first failure",
            ExecutionMode::Interactive => "Interactive: pause after every passing agent",
        }
    }

    pub fn pauses_between_agents(&self) -> bool {
        matches!(self, ExecutionMode::Interactive)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::FreeRun => write!(f, "free_run"),
            ExecutionMode::Interactive => write!(f, "interactive"),
        }
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "free_run" | "freerun" | "auto" | "f" => Ok(ExecutionMode::FreeRun),
            "interactive" | "step" | "i" => Ok(ExecutionMode::Interactive),
            _ => Err(DomainError::InvalidExecutionMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_free_run() {
        assert_eq!(ExecutionMode::default(), ExecutionMode::FreeRun);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("free-run".parse::<ExecutionMode>().unwrap(), ExecutionMode::FreeRun);
        assert_eq!("Interactive".parse::<ExecutionMode>().unwrap(), ExecutionMode::Interactive);
        assert!("sometimes".parse::<ExecutionMode>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for mode in [ExecutionMode::FreeRun, ExecutionMode::Interactive] {
            assert_eq!(mode.to_string().parse::<ExecutionMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ExecutionMode::FreeRun).unwrap();
        assert_eq!(json, "\"free_run\"");
    }
}
