//! Pass/fail policy for the validate stage.
//!
//! The verdict of an agent combines two signals:
//!
//! 1. A gate over the structured tool findings ([`ValidationPolicy::findings_allow_pass`])
//! 2. The oracle's strict yes/no answer to "does this report still show
//!    violations?" ([`answer_is`])
//!
//! The agent passes only when both agree the code is clean. Anything the
//! oracle says other than an exact "no" counts as "issues present".

use super::findings::{Findings, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an agent turns findings plus its report into a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Any non-empty findings fail; otherwise the oracle decides
    #[default]
    Strict,
    /// The oracle's judgement of the report decides, unless the tool errored
    ReportOnly,
    /// Findings at or above `fail_at` fail, as do more than `max_low`
    /// low-severity findings; the oracle must also answer "no"
    SeverityThreshold { fail_at: Severity, max_low: usize },
}

impl ValidationPolicy {
    /// Does the structured output of the tool still allow a pass?
    ///
    /// A tool error never allows a pass, whatever the policy: the code
    /// could not be checked.
    pub fn findings_allow_pass(&self, findings: &Findings) -> bool {
        if findings.is_tool_error() {
            return false;
        }
        match self {
            ValidationPolicy::Strict => findings.is_clean(),
            ValidationPolicy::ReportOnly => true,
            ValidationPolicy::SeverityThreshold { fail_at, max_low } => {
                let items = findings.items();
                // Untagged findings are treated as medium
                let blocking = items
                    .iter()
                    .any(|f| f.severity.unwrap_or(Severity::Medium) >= *fail_at);
                let low_count = items
                    .iter()
                    .filter(|f| f.severity == Some(Severity::Low))
                    .count();
                !blocking && low_count <= *max_low
            }
        }
    }

    /// Final verdict: `true` means clean
    pub fn verdict(&self, findings: &Findings, oracle_says_clean: bool) -> bool {
        self.findings_allow_pass(findings) && oracle_says_clean
    }

    /// Threshold wording appended to the validation question
    pub fn question_clause(&self) -> String {
        match self {
            ValidationPolicy::Strict | ValidationPolicy::ReportOnly => {
                "Answer only 'yes' if there are issues or 'no' if the code is fine.".to_string()
            }
            ValidationPolicy::SeverityThreshold { fail_at, max_low } => format!(
                "Answer only 'yes' if there are issues of {} severity or above, or more than {} LOW severity issues. \
                 Answer only 'no' if the code is clean or only contains up to {} LOW severity issues.",
                fail_at, max_low, max_low
            ),
        }
    }
}

impl fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationPolicy::Strict => write!(f, "strict"),
            ValidationPolicy::ReportOnly => write!(f, "report_only"),
            ValidationPolicy::SeverityThreshold { fail_at, max_low } => {
                write!(f, "severity_threshold(fail_at={}, max_low={})", fail_at.as_str(), max_low)
            }
        }
    }
}

/// Does the oracle's answer exactly match `token` (case-insensitive)?
///
/// Surrounding whitespace, quotes, backticks, asterisks and a trailing
/// period are tolerated; anything else ("no issues", "yes and no") is not a
/// match.
pub fn answer_is(answer: &str, token: &str) -> bool {
    let trimmed = answer
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '*'))
        .trim()
        .trim_end_matches(['.', '!'])
        .trim();
    trimmed.eq_ignore_ascii_case(token)
}

const CLEAN_CLAIMS: &[&str] = &[
    "no issues",
    "no problems",
    "all checks passed",
    "no violations",
    "no vulnerabilities",
    "appears secure",
];

/// Does a report claim the code is clean even though the tool found issues?
pub fn report_contradicts_findings(report: &str, findings: &Findings) -> bool {
    if findings.is_clean() {
        return false;
    }
    let lower = report.to_lowercase();
    CLEAN_CLAIMS.iter().any(|claim| lower.contains(claim))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::findings::Finding;

    fn issues(items: Vec<Finding>) -> Findings {
        Findings::Issues { items }
    }

    #[test]
    fn test_answer_is_exact_match_only() {
        assert!(answer_is("no", "no"));
        assert!(answer_is("  No.\n", "no"));
        assert!(answer_is("**NO**", "no"));
        assert!(answer_is("'no'", "no"));
        assert!(!answer_is("no issues", "no"));
        assert!(!answer_is("yes", "no"));
        assert!(!answer_is("", "no"));
        assert!(!answer_is("Nope", "no"));
    }

    #[test]
    fn test_strict_fails_on_any_finding() {
        let policy = ValidationPolicy::Strict;
        let findings = issues(vec![Finding::new("Missing docstring").at_line(1)]);
        assert!(!policy.findings_allow_pass(&findings));
        assert!(!policy.verdict(&findings, true));
        assert!(policy.verdict(&Findings::clean("ok"), true));
        assert!(!policy.verdict(&Findings::clean("ok"), false));
    }

    #[test]
    fn test_tool_error_fails_under_every_policy() {
        let policies = [
            ValidationPolicy::Strict,
            ValidationPolicy::ReportOnly,
            ValidationPolicy::SeverityThreshold {
                fail_at: Severity::High,
                max_low: 2,
            },
        ];
        for policy in policies {
            assert!(
                !policy.verdict(&Findings::tool_error("boom"), true),
                "{}",
                policy
            );
        }
    }

    #[test]
    fn test_report_only_defers_to_oracle() {
        let policy = ValidationPolicy::ReportOnly;
        let findings = issues(vec![Finding::new("Extra spaces detected.")]);
        assert!(policy.verdict(&findings, true));
        assert!(!policy.verdict(&findings, false));
    }

    #[test]
    fn test_severity_threshold_tolerates_two_low() {
        let policy = ValidationPolicy::SeverityThreshold {
            fail_at: Severity::High,
            max_low: 2,
        };
        let two_low = issues(vec![
            Finding::new("assert used").with_severity(Severity::Low),
            Finding::new("subprocess import").with_severity(Severity::Low),
        ]);
        assert!(policy.findings_allow_pass(&two_low));

        let three_low = issues(vec![
            Finding::new("a").with_severity(Severity::Low),
            Finding::new("b").with_severity(Severity::Low),
            Finding::new("c").with_severity(Severity::Low),
        ]);
        assert!(!policy.findings_allow_pass(&three_low));

        let medium = issues(vec![Finding::new("md5").with_severity(Severity::Medium)]);
        assert!(policy.findings_allow_pass(&medium));

        let high = issues(vec![Finding::new("eval").with_severity(Severity::High)]);
        assert!(!policy.findings_allow_pass(&high));
    }

    #[test]
    fn test_severity_threshold_untagged_counts_as_medium() {
        let policy = ValidationPolicy::SeverityThreshold {
            fail_at: Severity::Medium,
            max_low: 2,
        };
        assert!(!policy.findings_allow_pass(&issues(vec![Finding::new("untagged")])));
    }

    #[test]
    fn test_question_clause_mentions_threshold() {
        let policy = ValidationPolicy::SeverityThreshold {
            fail_at: Severity::High,
            max_low: 2,
        };
        let clause = policy.question_clause();
        assert!(clause.contains("HIGH"));
        assert!(clause.contains("up to 2 LOW"));
    }

    #[test]
    fn test_policy_deserializes_from_tagged_json() {
        let policy: ValidationPolicy = serde_json::from_str(
            r#"{"kind": "severity_threshold", "fail_at": "medium", "max_low": 0}"#,
        )
        .unwrap();
        assert_eq!(
            policy,
            ValidationPolicy::SeverityThreshold {
                fail_at: Severity::Medium,
                max_low: 0
            }
        );
    }

    #[test]
    fn test_report_contradicts_findings() {
        let findings = issues(vec![Finding::new("Missing docstring")]);
        assert!(report_contradicts_findings("All checks passed!", &findings));
        assert!(!report_contradicts_findings(
            "1. Function `f` lacks a docstring.",
            &findings
        ));
        assert!(!report_contradicts_findings(
            "No issues found.",
            &Findings::clean("ok")
        ));
    }
}
