//! Analysis tool adapters
//!
//! - [`builtin`]: one heuristic checker per review concern
//! - [`CommandAnalysisTool`]: an external checker command
//! - [`ToolRegistry`]: which tool backs which concern

pub mod builtin;
mod command;
mod registry;
pub mod source;

pub use builtin::builtin_tool;
pub use command::CommandAnalysisTool;
pub use registry::ToolRegistry;
