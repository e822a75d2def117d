//! Agent domain entities

use super::findings::Findings;
use super::profile::AgentName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of the four-stage review protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewStage {
    /// Oracle drafts a short checklist for this concern
    Plan,
    /// The bound analysis tool inspects the code
    Analyze,
    /// Oracle writes the human-facing report
    Report,
    /// Oracle answers whether the report still shows violations
    Validate,
}

impl ReviewStage {
    pub const ORDER: [ReviewStage; 4] = [
        ReviewStage::Plan,
        ReviewStage::Analyze,
        ReviewStage::Report,
        ReviewStage::Validate,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ReviewStage::Plan => "plan",
            ReviewStage::Analyze => "analyze",
            ReviewStage::Report => "report",
            ReviewStage::Validate => "validate",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            ReviewStage::Plan => "Planning",
            ReviewStage::Analyze => "Analyzing",
            ReviewStage::Report => "Reporting",
            ReviewStage::Validate => "Validating",
        }
    }
}

impl fmt::Display for ReviewStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Result of one agent run against one code submission.
///
/// Ephemeral: every re-run regenerates it from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentOutcome {
    pub agent: AgentName,
    /// Human-facing report (or error text when a stage failed)
    pub report: String,
    /// `true` means clean
    pub is_valid: bool,
    /// What the tool returned, kept for display and debugging
    pub findings: Findings,
    /// Stages whose oracle/tool call failed and was replaced by error text
    pub degraded_stages: Vec<ReviewStage>,
}

impl AgentOutcome {
    pub fn new(
        agent: AgentName,
        report: impl Into<String>,
        is_valid: bool,
        findings: Findings,
    ) -> Self {
        Self {
            agent,
            report: report.into(),
            is_valid,
            findings,
            degraded_stages: Vec::new(),
        }
    }

    /// Outcome for a run that failed outright. Always invalid.
    pub fn fault(agent: AgentName, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            agent,
            report: message.clone(),
            is_valid: false,
            findings: Findings::tool_error(message),
            degraded_stages: Vec::new(),
        }
    }

    pub fn with_degraded_stages(mut self, stages: Vec<ReviewStage>) -> Self {
        self.degraded_stages = stages;
        self
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded_stages.is_empty()
    }

    /// The `(report, isValid)` pair of the agent contract
    pub fn into_pair(self) -> (String, bool) {
        (self.report, self.is_valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let names: Vec<_> = ReviewStage::ORDER.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["plan", "analyze", "report", "validate"]);
    }

    #[test]
    fn test_fault_is_never_valid() {
        let outcome = AgentOutcome::fault(AgentName::new("SyntaxAgent"), "boom");
        assert!(!outcome.is_valid);
        assert_eq!(outcome.clone().into_pair(), ("boom".to_string(), false));
        assert!(outcome.findings.is_tool_error());
    }

    #[test]
    fn test_degraded_flag() {
        let outcome = AgentOutcome::new(
            AgentName::new("SyntaxAgent"),
            "report",
            true,
            Findings::clean("ok"),
        )
        .with_degraded_stages(vec![ReviewStage::Plan]);
        assert!(outcome.is_degraded());
    }
}
