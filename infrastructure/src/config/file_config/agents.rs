//! Agent configuration from TOML (`[agents]` section)
//!
//! ```toml
//! [agents]
//! roster = ["SyntaxAgent", "SemanticsAgent", "SecurityAnalysisAgent"]
//!
//! [agents.policies.CodeStyleAgent]
//! kind = "strict"
//! ```

use super::ConfigValidationError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tutor_domain::{AgentProfile, Concern, ValidationPolicy};

/// Raw agent configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    /// Ordered agent names offered to the planner
    pub roster: Vec<String>,
    /// Validation policy overrides keyed by agent name
    pub policies: BTreeMap<String, ValidationPolicy>,
}

impl Default for FileAgentsConfig {
    fn default() -> Self {
        Self {
            roster: Concern::ALL
                .iter()
                .map(|c| c.agent_name().to_string())
                .collect(),
            policies: BTreeMap::new(),
        }
    }
}

impl FileAgentsConfig {
    /// Build the roster's profiles with policy overrides applied
    pub fn profiles(&self) -> Result<Vec<AgentProfile>, ConfigValidationError> {
        if let Some(issue) = self.validate().into_iter().next() {
            return Err(issue);
        }
        Ok(self
            .roster
            .iter()
            .filter_map(|name| Concern::from_agent_name(name))
            .map(|concern| {
                let profile = AgentProfile::builtin(concern);
                match self.policies.get(concern.agent_name()) {
                    Some(policy) => profile.with_policy(*policy),
                    None => profile,
                }
            })
            .collect())
    }

    pub(super) fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        if self.roster.is_empty() {
            issues.push(ConfigValidationError::EmptyRoster);
        }
        let mut seen = HashSet::new();
        for name in &self.roster {
            if Concern::from_agent_name(name).is_none() {
                issues.push(ConfigValidationError::UnknownAgent(name.clone()));
            } else if !seen.insert(name.as_str()) {
                issues.push(ConfigValidationError::DuplicateAgent(name.clone()));
            }
        }
        for name in self.policies.keys() {
            if !self.roster.contains(name) {
                issues.push(ConfigValidationError::OrphanPolicy(name.clone()));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_domain::Severity;

    #[test]
    fn test_default_roster_has_every_builtin_agent() {
        let profiles = FileAgentsConfig::default().profiles().unwrap();
        assert_eq!(profiles.len(), 9);
        assert_eq!(profiles[0].name.as_str(), "SyntaxAgent");
        assert_eq!(profiles[8].name.as_str(), "BestPracticesAgent");
    }

    #[test]
    fn test_policy_override_is_applied() {
        let mut policies = BTreeMap::new();
        policies.insert("CodeStyleAgent".to_string(), ValidationPolicy::Strict);
        let config = FileAgentsConfig {
            roster: vec!["CodeStyleAgent".to_string(), "SecurityAnalysisAgent".to_string()],
            policies,
        };

        let profiles = config.profiles().unwrap();

        assert_eq!(profiles[0].policy, ValidationPolicy::Strict);
        assert_eq!(
            profiles[1].policy,
            ValidationPolicy::SeverityThreshold {
                fail_at: Severity::High,
                max_low: 2
            }
        );
    }

    #[test]
    fn test_orphan_policy_is_reported() {
        let mut policies = BTreeMap::new();
        policies.insert("DocumentationAgent".to_string(), ValidationPolicy::ReportOnly);
        let config = FileAgentsConfig {
            roster: vec!["SyntaxAgent".to_string()],
            policies,
        };
        assert_eq!(
            config.profiles().unwrap_err(),
            ConfigValidationError::OrphanPolicy("DocumentationAgent".to_string())
        );
    }

    #[test]
    fn test_empty_roster_is_rejected() {
        let config = FileAgentsConfig {
            roster: Vec::new(),
            policies: BTreeMap::new(),
        };
        assert_eq!(config.profiles().unwrap_err(), ConfigValidationError::EmptyRoster);
    }
}
