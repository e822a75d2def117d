//! Prompt domain
//!
//! Templates for every oracle call: the orchestrator's draft/parse/adjust
//! prompts and the review agents' plan/report/validate prompts.

pub mod agent;
mod template;

pub use agent::AgentPromptTemplate;
pub use template::OrchestratorPromptTemplate;
