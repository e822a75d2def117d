//! Domain layer for code-tutor
//!
//! This crate contains the core review model: agent profiles, findings,
//! validation policies, execution plans and the review session cursor.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Review Agents
//!
//! Every agent follows the same four-stage protocol
//! (plan → analyze → report → validate). What differs between agents is
//! data: an [`AgentProfile`] (prompt wording, domain exclusions) and a
//! [`ValidationPolicy`] (how findings and the report gate the pipeline).
//!
//! ## Execution Plan
//!
//! The orchestrator asks the oracle for a prose plan, then for a flat JSON
//! array of agent names. [`decode_agent_names`] is the strict decoder for
//! the latter and [`ExecutionPlan::resolve`] matches names against the roster.
//!
//! ## Session Cursor
//!
//! [`SessionPhase`] and [`ExecutionCursor`] model the stop-on-failure loop
//! that lets a human fix code and resume at the failing agent.

pub mod agent;
pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use agent::{
    entities::{AgentOutcome, ReviewStage},
    findings::{Finding, FindingSection, Findings, Severity},
    profile::{AgentName, AgentProfile, Concern},
    validation::{ValidationPolicy, answer_is, report_contradicts_findings},
};
pub use core::{code::CodeSnapshot, error::DomainError};
pub use orchestration::{
    action::NextAction,
    mode::ExecutionMode,
    plan::{ExecutionPlan, PlanResolution, PlanWarning},
    plan_parser::{PlanDecodeError, decode_agent_names},
};
pub use prompt::{AgentPromptTemplate, OrchestratorPromptTemplate};
pub use session::{cursor::ExecutionCursor, phase::SessionPhase};
