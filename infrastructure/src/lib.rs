//! Infrastructure layer for code-tutor
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: analysis tools, text oracles and
//! configuration file loading.

pub mod analysis;
pub mod config;
pub mod oracle;
pub mod process;

// Re-export commonly used types
pub use analysis::{CommandAnalysisTool, ToolRegistry, builtin_tool};
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentsConfig, FileConfig, FileOracleConfig,
    FileOutputConfig, FileReplConfig, FileSessionConfig, FileToolCommandConfig, OracleProvider,
};
pub use oracle::{CommandOracle, HttpOracle, build_oracle};
