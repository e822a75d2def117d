//! Agent profiles: the per-concern data that parameterizes the generic
//! review agent.
//!
//! All review agents share the same four-stage protocol. A profile carries
//! everything that differs between them: the expert role used in prompts,
//! what the checklist should cover, how the report must be written, which
//! neighbouring concerns are out of scope, and the validation policy.

use super::findings::Severity;
use super::validation::ValidationPolicy;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique name of an agent within a roster (e.g. `SyntaxAgent`).
///
/// Plan resolution matches these case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentName(String);

impl AgentName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AgentName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AgentName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The review concern an agent is responsible for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concern {
    Syntax,
    Semantics,
    Style,
    Structure,
    Security,
    Efficiency,
    Documentation,
    ErrorHandling,
    BestPractices,
}

impl Concern {
    pub const ALL: [Concern; 9] = [
        Concern::Syntax,
        Concern::Semantics,
        Concern::Style,
        Concern::Structure,
        Concern::Security,
        Concern::Efficiency,
        Concern::Documentation,
        Concern::ErrorHandling,
        Concern::BestPractices,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Concern::Syntax => "syntax",
            Concern::Semantics => "semantics",
            Concern::Style => "style",
            Concern::Structure => "structure",
            Concern::Security => "security",
            Concern::Efficiency => "efficiency",
            Concern::Documentation => "documentation",
            Concern::ErrorHandling => "error_handling",
            Concern::BestPractices => "best_practices",
        }
    }

    /// Default agent name for this concern
    pub fn agent_name(&self) -> &'static str {
        match self {
            Concern::Syntax => "SyntaxAgent",
            Concern::Semantics => "SemanticsAgent",
            Concern::Style => "CodeStyleAgent",
            Concern::Structure => "CodeStructureAgent",
            Concern::Security => "SecurityAnalysisAgent",
            Concern::Efficiency => "CodeEfficiencyAgent",
            Concern::Documentation => "DocumentationAgent",
            Concern::ErrorHandling => "ErrorHandlingAgent",
            Concern::BestPractices => "BestPracticesAgent",
        }
    }

    /// Look up a concern by its default agent name
    pub fn from_agent_name(name: &str) -> Option<Concern> {
        Concern::ALL.into_iter().find(|c| c.agent_name() == name)
    }

    /// Foundational concerns must be scheduled first whenever present
    pub fn is_foundational(&self) -> bool {
        matches!(self, Concern::Syntax | Concern::Semantics)
    }
}

impl fmt::Display for Concern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Concern {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "syntax" => Ok(Concern::Syntax),
            "semantics" | "semantic" => Ok(Concern::Semantics),
            "style" | "code_style" => Ok(Concern::Style),
            "structure" | "code_structure" => Ok(Concern::Structure),
            "security" | "security_analysis" => Ok(Concern::Security),
            "efficiency" | "code_efficiency" => Ok(Concern::Efficiency),
            "documentation" | "docs" => Ok(Concern::Documentation),
            "error_handling" | "errors" => Ok(Concern::ErrorHandling),
            "best_practices" => Ok(Concern::BestPractices),
            _ => Concern::from_agent_name(s.trim())
                .ok_or_else(|| DomainError::UnknownConcern(s.to_string())),
        }
    }
}

/// Prompt data and pass/fail policy for one review agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub name: AgentName,
    pub concern: Concern,
    /// Expert persona, e.g. "a syntax analysis expert"
    pub role: String,
    /// What the checklist must cover
    pub plan_focus: String,
    /// What the report must contain
    pub report_task: String,
    /// Extra report rules beyond the shared ones
    pub report_rules: Vec<String>,
    /// Neighbouring concerns this agent must not flag
    pub exclusions: Vec<String>,
    /// Plural noun for the issues this agent looks for ("syntax issues")
    pub issue_noun: String,
    pub policy: ValidationPolicy,
}

impl AgentProfile {
    /// Built-in profile for a concern
    pub fn builtin(concern: Concern) -> Self {
        let (role, plan_focus, report_task, issue_noun) = match concern {
            Concern::Syntax => (
                "a syntax analysis expert",
                "all possible aspects of syntax analysis: unbalanced brackets, missing colons, invalid indentation and malformed statements",
                "Generate a short report summarizing all syntax issues within the code.",
                "syntax issues",
            ),
            Concern::Semantics => (
                "a semantics analysis expert",
                "type checks, logic errors, and edge cases",
                "Generate a short report summarizing all semantic issues within the code.",
                "semantic issues",
            ),
            Concern::Style => (
                "a coding style expert",
                "indentation, naming conventions, whitespace and overall readability",
                "Generate a short report summarizing all coding style issues and suggesting improvements.",
                "style issues",
            ),
            Concern::Structure => (
                "a software architecture expert",
                "function/class structure, cyclomatic complexity, maintainability, and coupling",
                "Generate a short report summarizing all modularity and structural issues and suggesting improvements.",
                "structural issues",
            ),
            Concern::Security => (
                "a cybersecurity expert",
                "input validation, hardcoded credentials or secrets, insecure function usage (eval, exec), weak cryptographic practices and unsafe imports",
                "Generate a short report summarizing all security vulnerabilities and suggesting improvements.",
                "security vulnerabilities",
            ),
            Concern::Efficiency => (
                "a software optimization expert",
                "algorithm complexity, redundant operations, suboptimal data structures, and inefficient loops",
                "Generate a short report summarizing all efficiency issues and suggesting improvements.",
                "efficiency issues",
            ),
            Concern::Documentation => (
                "a code documentation expert",
                "function/class docstrings, inline comments, and overall readability",
                "Generate a short report summarizing all documentation issues within the code.",
                "documentation issues",
            ),
            Concern::ErrorHandling => (
                "an error handling analysis expert",
                "try/except blocks, specific exception types, error messages, and graceful failure",
                "Generate a short report summarizing all error handling issues within the code. Ensure that your response is logically consistent.",
                "error handling issues",
            ),
            Concern::BestPractices => (
                "an expert in software engineering best practices",
                "meaningful names, magic numbers and clean coding principles",
                "List all best practice violations in the code so that fixing the listed issues makes the code fully compliant.",
                "best practices violations",
            ),
        };

        let report_rules: Vec<&str> = match concern {
            Concern::Style | Concern::Structure | Concern::Efficiency => vec![
                "Focus only on issues detected by the tool and ignore any comments in the code.",
                "If the issues are only minor, do not report them as problems.",
            ],
            Concern::Security => vec![
                "Focus only on issues detected by the tool.",
                "If no major security issues are found, state that the code appears secure.",
                "If only 1-2 LOW severity issues are found, state that the code appears mostly secure, still suggest improvements, and say they do not require immediate action.",
            ],
            _ => vec![],
        };

        let exclusions: Vec<&str> = match concern {
            Concern::Syntax => vec!["style", "naming", "performance", "documentation"],
            Concern::Semantics => vec!["formatting", "documentation"],
            Concern::Style => vec!["logic errors", "security", "documentation"],
            Concern::Structure => vec!["formatting", "documentation"],
            Concern::Security => vec!["style", "documentation", "performance"],
            Concern::Efficiency => vec!["style", "documentation"],
            Concern::Documentation => vec!["style", "logic errors", "performance"],
            Concern::ErrorHandling => vec!["style", "documentation"],
            Concern::BestPractices => vec!["documentation", "error handling"],
        };

        let policy = match concern {
            Concern::Style | Concern::Structure | Concern::Efficiency => {
                ValidationPolicy::ReportOnly
            }
            Concern::Security => ValidationPolicy::SeverityThreshold {
                fail_at: Severity::High,
                max_low: 2,
            },
            _ => ValidationPolicy::Strict,
        };

        Self {
            name: AgentName::new(concern.agent_name()),
            concern,
            role: role.to_string(),
            plan_focus: plan_focus.to_string(),
            report_task: report_task.to_string(),
            report_rules: report_rules.into_iter().map(String::from).collect(),
            exclusions: exclusions.into_iter().map(String::from).collect(),
            issue_noun: issue_noun.to_string(),
            policy,
        }
    }

    /// Built-in profiles for every concern, in canonical roster order
    pub fn builtin_all() -> Vec<Self> {
        Concern::ALL.into_iter().map(Self::builtin).collect()
    }

    pub fn with_name(mut self, name: impl Into<AgentName>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn is_foundational(&self) -> bool {
        self.concern.is_foundational()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concern_agent_name_round_trip() {
        for concern in Concern::ALL {
            assert_eq!(Concern::from_agent_name(concern.agent_name()), Some(concern));
        }
    }

    #[test]
    fn test_concern_from_str_accepts_aliases() {
        assert_eq!("error-handling".parse::<Concern>().unwrap(), Concern::ErrorHandling);
        assert_eq!("Best Practices".parse::<Concern>().unwrap(), Concern::BestPractices);
        assert_eq!("SecurityAnalysisAgent".parse::<Concern>().unwrap(), Concern::Security);
        assert!("ghost".parse::<Concern>().is_err());
    }

    #[test]
    fn test_foundational_concerns() {
        assert!(Concern::Syntax.is_foundational());
        assert!(Concern::Semantics.is_foundational());
        assert!(!Concern::Security.is_foundational());
    }

    #[test]
    fn test_builtin_policies() {
        assert_eq!(
            AgentProfile::builtin(Concern::Syntax).policy,
            ValidationPolicy::Strict
        );
        assert_eq!(
            AgentProfile::builtin(Concern::Style).policy,
            ValidationPolicy::ReportOnly
        );
        assert_eq!(
            AgentProfile::builtin(Concern::Security).policy,
            ValidationPolicy::SeverityThreshold {
                fail_at: Severity::High,
                max_low: 2
            }
        );
    }

    #[test]
    fn test_best_practices_excludes_documentation_and_error_handling() {
        let profile = AgentProfile::builtin(Concern::BestPractices);
        assert!(profile.exclusions.contains(&"documentation".to_string()));
        assert!(profile.exclusions.contains(&"error handling".to_string()));
    }

    #[test]
    fn test_builtin_all_has_unique_names() {
        let profiles = AgentProfile::builtin_all();
        let mut names: Vec<_> = profiles.iter().map(|p| p.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 9);
    }

    #[test]
    fn test_agent_name_serializes_transparently() {
        let json = serde_json::to_string(&AgentName::new("SyntaxAgent")).unwrap();
        assert_eq!(json, "\"SyntaxAgent\"");
    }
}
