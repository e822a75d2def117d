//! Analysis tool findings.
//!
//! Tools return wildly different shapes: a clean sentinel sentence, a list
//! of `{line, message}` records, or a composite report made of several
//! sub-analyses. [`Findings`] covers all of them so the agent layer can
//! stay opaque to the shape and render it verbatim into prompts.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity attached to a finding (security and structure tools set it).
///
/// Ordered `Low < Medium < High` so thresholds compare naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "l" => Ok(Severity::Low),
            "medium" | "med" | "m" => Ok(Severity::Medium),
            "high" | "h" | "critical" => Ok(Severity::High),
            _ => Err(DomainError::InvalidSeverity(s.to_string())),
        }
    }
}

/// A single issue reported by an analysis tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// 1-based line number, when the tool can locate the issue
    pub line: Option<usize>,
    pub message: String,
    pub severity: Option<Severity>,
    /// Short identifier of the check that produced this finding
    pub rule: Option<String>,
}

impl Finding {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
            severity: None,
            rule: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Line {}: {}", line, self.message)?,
            None => write!(f, "{}", self.message)?,
        }
        if let Some(severity) = self.severity {
            write!(f, " [severity: {}]", severity)?;
        }
        Ok(())
    }
}

/// Named group of findings inside a composite result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingSection {
    pub name: String,
    pub items: Vec<Finding>,
}

impl FindingSection {
    pub fn new(name: impl Into<String>, items: Vec<Finding>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

/// Output of one analysis tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Findings {
    /// Sentinel value: nothing found ("No syntax issues found.")
    Clean { summary: String },
    /// Flat list of issues
    Issues { items: Vec<Finding> },
    /// Several independent sub-analyses bundled together
    Composite { sections: Vec<FindingSection> },
    /// The tool itself failed; carries the error text forward
    ToolError { message: String },
}

impl Findings {
    pub fn clean(summary: impl Into<String>) -> Self {
        Findings::Clean {
            summary: summary.into(),
        }
    }

    /// Build from a list of items, falling back to the clean sentinel when
    /// the list is empty.
    pub fn from_items(items: Vec<Finding>, clean_summary: impl Into<String>) -> Self {
        if items.is_empty() {
            Findings::clean(clean_summary)
        } else {
            Findings::Issues { items }
        }
    }

    /// Build a composite result, dropping nothing: empty sections stay
    /// visible so the report can say which sub-analyses came back clean.
    pub fn composite(sections: Vec<FindingSection>) -> Self {
        Findings::Composite { sections }
    }

    pub fn tool_error(message: impl Into<String>) -> Self {
        Findings::ToolError {
            message: message.into(),
        }
    }

    pub fn is_tool_error(&self) -> bool {
        matches!(self, Findings::ToolError { .. })
    }

    /// True only for the clean sentinel or a composite with no items.
    ///
    /// A tool error is never clean: the code could not be checked.
    pub fn is_clean(&self) -> bool {
        match self {
            Findings::Clean { .. } => true,
            Findings::Issues { items } => items.is_empty(),
            Findings::Composite { sections } => sections.iter().all(|s| s.items.is_empty()),
            Findings::ToolError { .. } => false,
        }
    }

    /// All located/unlocated issue items, in tool order
    pub fn items(&self) -> Vec<&Finding> {
        match self {
            Findings::Issues { items } => items.iter().collect(),
            Findings::Composite { sections } => {
                sections.iter().flat_map(|s| s.items.iter()).collect()
            }
            Findings::Clean { .. } | Findings::ToolError { .. } => Vec::new(),
        }
    }

    /// Number of issues; a tool error counts as one
    pub fn issue_count(&self) -> usize {
        match self {
            Findings::ToolError { .. } => 1,
            _ => self.items().len(),
        }
    }

    /// Render for inclusion in an oracle prompt
    pub fn render(&self) -> String {
        match self {
            Findings::Clean { summary } => summary.clone(),
            Findings::Issues { items } => items
                .iter()
                .map(|item| format!("- {}", item))
                .collect::<Vec<_>>()
                .join("\n"),
            Findings::Composite { sections } => {
                let mut out = String::new();
                for section in sections {
                    out.push_str(&format!("[{}]\n", section.name));
                    if section.items.is_empty() {
                        out.push_str("- nothing detected\n");
                    }
                    for item in &section.items {
                        out.push_str(&format!("- {}\n", item));
                    }
                }
                out.trim_end().to_string()
            }
            Findings::ToolError { message } => format!("Tool error: {}", message),
        }
    }
}

impl fmt::Display for Findings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("LOW".parse::<Severity>().unwrap(), Severity::Low);
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::High);
        assert!("severe-ish".parse::<Severity>().is_err());
    }

    #[test]
    fn test_from_items_empty_is_clean() {
        let findings = Findings::from_items(vec![], "No syntax issues found.");
        assert!(findings.is_clean());
        assert_eq!(findings.render(), "No syntax issues found.");
    }

    #[test]
    fn test_issue_rendering_includes_line_and_severity() {
        let findings = Findings::from_items(
            vec![
                Finding::new("'(' was never closed").at_line(2),
                Finding::new("Use of eval").with_severity(Severity::Medium),
            ],
            "unused",
        );
        assert!(!findings.is_clean());
        assert_eq!(findings.issue_count(), 2);
        assert_eq!(
            findings.render(),
            "- Line 2: '(' was never closed\n- Use of eval [severity: MEDIUM]"
        );
    }

    #[test]
    fn test_composite_clean_only_when_all_sections_empty() {
        let clean = Findings::composite(vec![
            FindingSection::new("nested_loops", vec![]),
            FindingSection::new("recursion", vec![]),
        ]);
        assert!(clean.is_clean());

        let dirty = Findings::composite(vec![
            FindingSection::new("nested_loops", vec![Finding::new("Nested loop")]),
            FindingSection::new("recursion", vec![]),
        ]);
        assert!(!dirty.is_clean());
        assert_eq!(dirty.items().len(), 1);
        assert!(dirty.render().contains("[recursion]\n- nothing detected"));
    }

    #[test]
    fn test_tool_error_is_never_clean() {
        let findings = Findings::tool_error("checker crashed");
        assert!(!findings.is_clean());
        assert_eq!(findings.issue_count(), 1);
        assert_eq!(findings.render(), "Tool error: checker crashed");
    }

    #[test]
    fn test_serde_tagged_shape() {
        let json = serde_json::to_value(Findings::clean("ok")).unwrap();
        assert_eq!(json["kind"], "clean");
        assert_eq!(json["summary"], "ok");
    }
}
