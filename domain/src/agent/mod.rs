//! Review agent domain module
//!
//! Contains agent profiles, tool findings, validation policies and the
//! outcome of a single agent run.

pub mod entities;
pub mod findings;
pub mod profile;
pub mod validation;

pub use entities::{AgentOutcome, ReviewStage};
pub use findings::{Finding, FindingSection, Findings, Severity};
pub use profile::{AgentName, AgentProfile, Concern};
pub use validation::ValidationPolicy;
