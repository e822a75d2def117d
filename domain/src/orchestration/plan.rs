//! Execution plan entities

use crate::agent::profile::AgentName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The resolved plan: the prose shown to the human and the ordered agent
/// list that will actually execute.
///
/// Both halves are always replaced together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    explanation: String,
    agents: Vec<AgentName>,
}

impl ExecutionPlan {
    pub fn new(explanation: impl Into<String>, agents: Vec<AgentName>) -> Self {
        Self {
            explanation: explanation.into(),
            agents,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve decoded agent names against the roster.
    ///
    /// Matching is case-sensitive and exact. Matched names keep the order the
    /// oracle gave; unmatched names are dropped and reported in a single
    /// [`PlanWarning::UnmatchedAgents`]. An empty result adds
    /// [`PlanWarning::Empty`].
    pub fn resolve(
        explanation: impl Into<String>,
        decoded: &[String],
        roster: &[AgentName],
    ) -> PlanResolution {
        let mut agents = Vec::new();
        let mut unmatched = Vec::new();

        for name in decoded {
            match roster.iter().find(|candidate| candidate.as_str() == name) {
                Some(agent) => agents.push(agent.clone()),
                None => unmatched.push(name.clone()),
            }
        }

        let mut warnings = Vec::new();
        if !unmatched.is_empty() {
            warnings.push(PlanWarning::UnmatchedAgents(unmatched));
        }
        if agents.is_empty() {
            warnings.push(PlanWarning::Empty);
        }

        PlanResolution {
            plan: ExecutionPlan::new(explanation, agents),
            warnings,
        }
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn agents(&self) -> &[AgentName] {
        &self.agents
    }

    pub fn get(&self, index: usize) -> Option<&AgentName> {
        self.agents.get(index)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agent names joined for display, e.g. `SyntaxAgent → SemanticsAgent`
    pub fn summary(&self) -> String {
        if self.agents.is_empty() {
            return "(no agents)".to_string();
        }
        self.agents
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

/// Non-fatal problems met while resolving a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanWarning {
    /// The oracle's name list could not be decoded
    DecodeFailed(String),
    /// The oracle could not be reached for planning
    OracleUnavailable(String),
    /// Names with no roster entry, in the order they appeared
    UnmatchedAgents(Vec<String>),
    /// The resolved plan contains no agents
    Empty,
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::DecodeFailed(reason) => {
                write!(f, "Could not parse agent names from the plan: {}", reason)
            }
            PlanWarning::OracleUnavailable(reason) => {
                write!(f, "Planning oracle unavailable: {}", reason)
            }
            PlanWarning::UnmatchedAgents(names) => {
                write!(f, "Ignoring unknown agents: {}", names.join(", "))
            }
            PlanWarning::Empty => write!(
                f,
                "Execution plan is empty. Check the plan text and the parsed agent names."
            ),
        }
    }
}

/// A resolved plan plus every warning raised on the way
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanResolution {
    pub plan: ExecutionPlan,
    pub warnings: Vec<PlanWarning>,
}

impl PlanResolution {
    /// Empty plan produced by a fault before name matching
    pub fn failed(explanation: impl Into<String>, warning: PlanWarning) -> Self {
        Self {
            plan: ExecutionPlan::new(explanation, Vec::new()),
            warnings: vec![warning, PlanWarning::Empty],
        }
    }

    /// Distinguishes "could not decode" from "deliberately chose nothing"
    pub fn decode_failed(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, PlanWarning::DecodeFailed(_)))
    }

    pub fn unmatched(&self) -> &[String] {
        self.warnings
            .iter()
            .find_map(|w| match w {
                PlanWarning::UnmatchedAgents(names) => Some(names.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
