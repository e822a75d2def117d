//! Application layer for code-tutor
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    analysis_tool::{AnalysisTool, ToolError},
    progress::{NoProgress, ReviewProgressNotifier},
    text_oracle::{OracleError, TextOracle},
};
pub use use_cases::orchestrator::Orchestrator;
pub use use_cases::review_agent::ReviewAgent;
pub use use_cases::review_session::{
    EntryKind, ReviewSession, RunStop, RunSummary, SessionError, SessionView, TranscriptEntry,
};
