//! Orchestration domain
//!
//! Execution plans, the strict plan-name decoder and the session's
//! execution mode.

pub mod action;
pub mod mode;
pub mod plan;
pub mod plan_parser;

pub use action::NextAction;
pub use mode::ExecutionMode;
pub use plan::{ExecutionPlan, PlanResolution, PlanWarning};
pub use plan_parser::{PlanDecodeError, decode_agent_names};
