//! Progress notification port
//!
//! Defines the interface for reporting progress during planning and review.

use tutor_domain::{AgentName, PlanResolution, ReviewStage};

/// Callback for progress updates during a review
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain text). Every method defaults to
/// a no-op.
pub trait ReviewProgressNotifier: Send + Sync {
    /// Called before the orchestrator asks for a plan
    fn on_plan_start(&self) {}

    /// Called once a plan has been drafted or adjusted and resolved
    fn on_plan_resolved(&self, _resolution: &PlanResolution) {}

    /// Called before an agent runs; `index` is its position in the plan
    fn on_agent_start(&self, _agent: &AgentName, _index: usize, _total: usize) {}

    /// Called when an agent enters one of its four stages
    fn on_stage_start(&self, _agent: &AgentName, _stage: ReviewStage) {}

    /// Called when a stage degraded to error text
    fn on_stage_error(&self, _agent: &AgentName, _stage: ReviewStage, _error: &str) {}

    /// Called when an agent produced its verdict
    fn on_agent_complete(&self, _agent: &AgentName, _is_valid: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ReviewProgressNotifier for NoProgress {}
