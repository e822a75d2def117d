//! Review session phases

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a review session.
///
/// ```text
/// Idle ──plan──▶ PlanReady ──run──▶ Running ──fail──▶ AwaitingFix
///                   ▲                  │  │              │
///                   │ adjust           │  └─pass(step)─▶ Paused
///                   │                  └─all pass──────▶ Complete
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No plan yet
    #[default]
    Idle,
    /// A plan was drafted or adjusted; cursor is 0
    PlanReady,
    /// Agents are executing
    Running,
    /// An agent failed; waiting for corrected code
    AwaitingFix,
    /// An agent passed in interactive mode; waiting for the human to advance
    Paused,
    /// Every planned agent passed
    Complete,
}

impl SessionPhase {
    pub fn as_str(&self) -> &str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::PlanReady => "plan_ready",
            SessionPhase::Running => "running",
            SessionPhase::AwaitingFix => "awaiting_fix",
            SessionPhase::Paused => "paused",
            SessionPhase::Complete => "complete",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            SessionPhase::Idle => "Idle",
            SessionPhase::PlanReady => "Plan Ready",
            SessionPhase::Running => "Running",
            SessionPhase::AwaitingFix => "Awaiting Fix",
            SessionPhase::Paused => "Paused",
            SessionPhase::Complete => "Complete",
        }
    }

    /// Can `run_or_resume` start from this phase?
    pub fn can_run(&self) -> bool {
        matches!(
            self,
            SessionPhase::PlanReady
                | SessionPhase::AwaitingFix
                | SessionPhase::Paused
                | SessionPhase::Complete
        )
    }

    /// Can the plan be (re)generated or adjusted from this phase?
    pub fn can_replan(&self) -> bool {
        !matches!(self, SessionPhase::Running)
    }

    pub fn is_awaiting_fix(&self) -> bool {
        matches!(self, SessionPhase::AwaitingFix)
    }

    pub fn has_plan(&self) -> bool {
        !matches!(self, SessionPhase::Idle)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_run() {
        assert!(!SessionPhase::Idle.can_run());
        assert!(SessionPhase::PlanReady.can_run());
        assert!(!SessionPhase::Running.can_run());
        assert!(SessionPhase::AwaitingFix.can_run());
        assert!(SessionPhase::Paused.can_run());
        assert!(SessionPhase::Complete.can_run());
    }

    #[test]
    fn test_can_replan_anywhere_but_running() {
        assert!(SessionPhase::AwaitingFix.can_replan());
        assert!(SessionPhase::Complete.can_replan());
        assert!(!SessionPhase::Running.can_replan());
    }

    #[test]
    fn test_has_plan() {
        assert!(!SessionPhase::Idle.has_plan());
        assert!(SessionPhase::Paused.has_plan());
    }
}
