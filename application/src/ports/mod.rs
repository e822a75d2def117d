//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod analysis_tool;
pub mod progress;
pub mod text_oracle;
