//! Types for the review session use case.

use super::transcript::TranscriptEntry;
use thiserror::Error;
use tutor_domain::{AgentName, AgentOutcome, SessionPhase};

/// Errors that stop a session operation before any agent runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No code submitted yet")]
    NoCode,

    #[error("No plan yet; generate one first")]
    NoPlan,

    #[error("Execution plan is empty; adjust or regenerate the plan")]
    EmptyPlan,

    #[error("Feedback is empty")]
    EmptyFeedback,

    #[error("A run is in progress or was interrupted; generate a new plan")]
    RunInProgress,
}

/// Why a run returned control to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStop {
    /// The agent at `index` failed; the session awaits a fix
    Failed { index: usize, agent: AgentName },
    /// Interactive mode paused before the agent at `index`
    Paused { index: usize, agent: AgentName },
    /// Every planned agent passed
    Completed,
}

impl RunStop {
    pub fn is_failure(&self) -> bool {
        matches!(self, RunStop::Failed { .. })
    }
}

/// What one call to `run_or_resume` did
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub stop: RunStop,
    /// Outcomes of the agents that ran during this call, in order
    pub outcomes: Vec<AgentOutcome>,
}

/// Read-only snapshot of a session for rendering
#[derive(Debug, Clone)]
pub struct SessionView<'a> {
    pub phase: SessionPhase,
    pub cursor: usize,
    pub plan_len: usize,
    pub awaiting_fix: bool,
    /// Index of the agent that must pass before the run can continue
    pub blocking_index: Option<usize>,
    pub blocking_agent: Option<&'a AgentName>,
    pub transcript: &'a [TranscriptEntry],
}
