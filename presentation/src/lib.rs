//! Presentation layer for code-tutor
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive review REPL.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ReplCommand, ReviewRepl};
pub use cli::commands::{Cli, Command, ModeArg, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
