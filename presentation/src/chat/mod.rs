//! Interactive review module
//!
//! Provides a line-editor based session where code is loaded, the plan is
//! reviewed and agents are run one fix at a time.

mod command;
mod repl;

pub use command::ReplCommand;
pub use repl::ReviewRepl;
