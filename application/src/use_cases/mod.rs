//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod orchestrator;
pub mod review_agent;
pub mod review_session;

#[cfg(test)]
pub(crate) mod testing;
