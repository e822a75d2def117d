//! Prompt templates for the review agents

use crate::agent::findings::Findings;
use crate::agent::profile::AgentProfile;
use crate::agent::validation::ValidationPolicy;

/// Templates for the three oracle-backed stages of a review agent
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// Stage 1: a short checklist for this concern. Must not fix the code.
    pub fn plan(profile: &AgentProfile, tool_description: &str, code: &str) -> String {
        format!(
            r#"You are {role}. Create a simple step-by-step plan of max 5 steps to identify {noun} in the provided code.
Ensure your plan covers aspects such as {focus}.

Do not analyze or improve/revise the code yet.

This is your analysis tool: {tool}

Code:
{code}"#,
            role = profile.role,
            noun = profile.issue_noun,
            focus = profile.plan_focus,
            tool = tool_description,
            code = code,
        )
    }

    /// Stage 3: synthesize plan, findings and code into the report
    pub fn report(profile: &AgentProfile, plan: &str, findings: &Findings, code: &str) -> String {
        let mut prompt = format!(
            r#"You are {role}. Based on the following:
- Analysis Plan: {plan}
- Tool Feedback: {findings}
- Code: {code}

{task}
"#,
            role = profile.role,
            plan = plan,
            findings = findings.render(),
            code = code,
            task = profile.report_task,
        );

        let mut rules: Vec<String> = Vec::new();
        if findings.is_clean() {
            rules.push("If there are no issues, say so briefly and clearly.".to_string());
        } else {
            rules.push(format!(
                "The tool reported {} finding(s). Do NOT say that there are no issues or that all checks passed; list the problems instead.",
                findings.issue_count()
            ));
        }
        rules.push("Do not improve, rewrite or fix the code.".to_string());
        if !profile.exclusions.is_empty() {
            rules.push(format!(
                "Only report {}. Do not flag {} issues; other agents handle those.",
                profile.issue_noun,
                profile.exclusions.join(", ")
            ));
        }
        rules.extend(profile.report_rules.iter().cloned());

        prompt.push_str("\nRules:\n");
        for rule in rules {
            prompt.push_str(&format!("- {}\n", rule));
        }

        prompt
    }

    /// Stage 4: strict yes/no over the generated report
    pub fn validate(profile: &AgentProfile, report: &str, findings: &Findings) -> String {
        let mut prompt = format!(
            r#"You are {role}. Based on the following report, does the code still contain any {noun}?

Report: {report}
"#,
            role = profile.role,
            noun = profile.issue_noun,
            report = report,
        );
        if matches!(profile.policy, ValidationPolicy::SeverityThreshold { .. }) {
            prompt.push_str(&format!("Tool Feedback: {}\n", findings.render()));
        }
        prompt.push_str(&profile.policy.question_clause());
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::findings::{Finding, Severity};
    use crate::agent::profile::Concern;

    #[test]
    fn test_plan_prompt_forbids_fixing() {
        let profile = AgentProfile::builtin(Concern::Syntax);
        let prompt = AgentPromptTemplate::plan(&profile, "Checks brackets", "def f(:");
        assert!(prompt.contains("max 5 steps"));
        assert!(prompt.contains("Do not analyze or improve/revise the code"));
        assert!(prompt.contains("def f(:"));
    }

    #[test]
    fn test_report_prompt_with_findings_forbids_clean_claim() {
        let profile = AgentProfile::builtin(Concern::Syntax);
        let findings = Findings::Issues {
            items: vec![Finding::new("'(' was never closed").at_line(2)],
        };
        let prompt = AgentPromptTemplate::report(&profile, "1. check", &findings, "code");
        assert!(prompt.contains("Line 2: '(' was never closed"));
        assert!(prompt.contains("The tool reported 1 finding(s)"));
        assert!(prompt.contains("Do not improve, rewrite or fix the code."));
    }

    #[test]
    fn test_report_prompt_lists_exclusions() {
        let profile = AgentProfile::builtin(Concern::BestPractices);
        let prompt =
            AgentPromptTemplate::report(&profile, "plan", &Findings::clean("ok"), "code");
        assert!(prompt.contains("Do not flag documentation, error handling issues"));
    }

    #[test]
    fn test_validate_prompt_uses_policy_clause() {
        let security = AgentProfile::builtin(Concern::Security);
        let prompt = AgentPromptTemplate::validate(&security, "report", &Findings::clean("none"));
        assert!(prompt.contains("LOW severity"));
        assert!(prompt.contains("Tool Feedback: none"));

        let syntax = AgentProfile::builtin(Concern::Syntax);
        let prompt = AgentPromptTemplate::validate(&syntax, "report", &Findings::clean("none"));
        assert!(prompt.contains("Answer only 'yes' if there are issues or 'no'"));
        assert!(!prompt.contains("Tool Feedback"));
    }

    #[test]
    fn test_validate_prompt_feeds_tool_output_to_any_threshold_policy() {
        let style = AgentProfile::builtin(Concern::Style).with_policy(
            ValidationPolicy::SeverityThreshold {
                fail_at: Severity::Medium,
                max_low: 0,
            },
        );
        let findings = Findings::Issues {
            items: vec![Finding::new("line too long").at_line(4)],
        };
        let prompt = AgentPromptTemplate::validate(&style, "report", &findings);
        assert!(prompt.contains("Tool Feedback: - Line 4: line too long"));
        assert!(prompt.contains("LOW severity"));
    }
}
