//! Review session domain
//!
//! The phase machine and execution cursor behind the stop-on-failure loop.

pub mod cursor;
pub mod phase;

pub use cursor::ExecutionCursor;
pub use phase::SessionPhase;
