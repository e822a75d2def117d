//! Console output formatter for review transcripts

use colored::Colorize;
use tutor_application::{EntryKind, SessionView, TranscriptEntry};
use tutor_domain::{ExecutionMode, ExecutionPlan, PlanResolution};

/// Formats session state for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a single transcript entry
    pub fn format_entry(entry: &TranscriptEntry) -> String {
        match &entry.kind {
            EntryKind::System => format!("{} {}", "->".cyan(), entry.text),
            EntryKind::AgentStart { agent } => {
                format!("\n{}", format!("▶ {}", agent).cyan().bold())
            }
            EntryKind::AgentReport { agent, is_valid } => {
                let title = if *is_valid {
                    format!("── {} ── passed", agent).green().bold()
                } else {
                    format!("── {} ── issues found", agent).red().bold()
                };
                format!("{}\n{}", title, Self::indent(&entry.text, "  "))
            }
            EntryKind::Notice => entry.text.yellow().bold().to_string(),
            EntryKind::Plan => format!(
                "{}{}",
                Self::section_header("Execution Plan"),
                entry.text
            ),
            EntryKind::Warning => format!("{} {}", "warning:".yellow().bold(), entry.text),
        }
    }

    /// Format a run of transcript entries, one block per entry
    pub fn format_transcript(entries: &[TranscriptEntry]) -> String {
        entries
            .iter()
            .map(Self::format_entry)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format transcript entries as JSON
    pub fn format_json(entries: &[TranscriptEntry]) -> String {
        serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string())
    }

    /// Format a resolved plan as JSON
    pub fn format_plan_json(resolution: &PlanResolution) -> String {
        serde_json::to_string_pretty(resolution).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a resolved plan: the prose, the agent order, then any warnings
    pub fn format_plan(resolution: &PlanResolution) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Execution Plan"));
        output.push('\n');
        output.push_str(resolution.plan.explanation().trim_end());
        output.push('\n');

        output.push_str(&Self::section_header("Agents"));
        output.push_str(&Self::format_agents(&resolution.plan));

        if resolution.has_warnings() {
            output.push('\n');
            for warning in &resolution.warnings {
                output.push_str(&format!("{} {}\n", "warning:".yellow().bold(), warning));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Numbered agent list, or a placeholder for an empty plan
    pub fn format_agents(plan: &ExecutionPlan) -> String {
        if plan.is_empty() {
            return format!("  {}\n", "(no agents)".dimmed());
        }
        plan.agents()
            .iter()
            .enumerate()
            .map(|(i, agent)| format!("  {}. {}\n", i + 1, agent))
            .collect()
    }

    /// Session status: phase, mode and where the cursor sits in the plan
    pub fn format_status(
        view: &SessionView<'_>,
        mode: ExecutionMode,
        plan: &ExecutionPlan,
    ) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            "Phase:".cyan().bold(),
            view.phase.display_name()
        ));
        output.push_str(&format!("{} {} ({})\n", "Mode:".cyan().bold(), mode, mode.description()));

        if view.plan_len == 0 {
            output.push_str(&format!("{} {}\n", "Plan:".cyan().bold(), "none".dimmed()));
            return output;
        }

        output.push_str(&format!(
            "{} {}/{} agents done\n",
            "Progress:".cyan().bold(),
            view.cursor.min(view.plan_len),
            view.plan_len
        ));
        for (i, agent) in plan.agents().iter().enumerate() {
            let marker = if Some(i) == view.blocking_index {
                "✗".red().to_string()
            } else if i < view.cursor {
                "✓".green().to_string()
            } else if i == view.cursor {
                "→".yellow().to_string()
            } else {
                " ".to_string()
            };
            output.push_str(&format!("  {} {}. {}\n", marker, i + 1, agent));
        }

        if let Some(agent) = view.blocking_agent {
            output.push_str(&format!(
                "\n{} {} must pass before the review continues. Submit a fix.\n",
                "Blocked:".red().bold(),
                agent
            ));
        }

        output
    }

    /// Code listing with line numbers
    pub fn format_code(code: &str) -> String {
        if code.trim().is_empty() {
            return "(no code loaded)".dimmed().to_string();
        }
        let width = code.lines().count().to_string().len();
        code.lines()
            .enumerate()
            .map(|(i, line)| {
                let number = format!("{:>width$}", i + 1, width = width);
                format!("{} │ {}", number.dimmed(), line)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Combined report of a full `execute` pass
    pub fn format_execution(report: &str) -> String {
        format!(
            "{}\n{}\n{}",
            Self::header("Full Review"),
            report.trim_end(),
            Self::footer()
        )
    }

    /// Full review report as JSON, next to the plan that produced it
    pub fn format_execution_json(plan: &ExecutionPlan, report: &str) -> String {
        let value = serde_json::json!({
            "agents": plan.agents(),
            "report": report,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_domain::{AgentName, PlanWarning, SessionPhase};

    fn plain() {
        colored::control::set_override(false);
    }

    fn plan() -> ExecutionPlan {
        ExecutionPlan::new(
            "1. **SyntaxAgent**\n2. **StyleAgent**",
            vec![AgentName::from("SyntaxAgent"), AgentName::from("StyleAgent")],
        )
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }

    #[test]
    fn test_format_report_entry() {
        plain();
        let entry = TranscriptEntry::new(
            EntryKind::AgentReport {
                agent: AgentName::from("SyntaxAgent"),
                is_valid: false,
            },
            "Line 2: '(' was never closed",
        );
        let text = ConsoleFormatter::format_entry(&entry);
        assert_eq!(
            text,
            "── SyntaxAgent ── issues found\n  Line 2: '(' was never closed"
        );
    }

    #[test]
    fn test_format_plan_lists_agents_and_warnings() {
        plain();
        let resolution = PlanResolution {
            plan: plan(),
            warnings: vec![PlanWarning::UnmatchedAgents(vec!["TypoAgent".to_string()])],
        };
        let text = ConsoleFormatter::format_plan(&resolution);
        assert!(text.contains("  1. SyntaxAgent\n  2. StyleAgent\n"));
        assert!(text.contains("warning: Ignoring unknown agents: TypoAgent"));
    }

    #[test]
    fn test_format_empty_plan() {
        plain();
        let text = ConsoleFormatter::format_agents(&ExecutionPlan::empty());
        assert_eq!(text, "  (no agents)\n");
    }

    #[test]
    fn test_format_status_marks_blocking_agent() {
        plain();
        let plan = plan();
        let agent = AgentName::from("StyleAgent");
        let view = SessionView {
            phase: SessionPhase::AwaitingFix,
            cursor: 1,
            plan_len: 2,
            awaiting_fix: true,
            blocking_index: Some(1),
            blocking_agent: Some(&agent),
            transcript: &[],
        };
        let text = ConsoleFormatter::format_status(&view, ExecutionMode::FreeRun, &plan);
        assert!(text.contains("Progress: 1/2 agents done"));
        assert!(text.contains("  ✓ 1. SyntaxAgent\n"));
        assert!(text.contains("  ✗ 2. StyleAgent\n"));
        assert!(text.contains("Blocked: StyleAgent must pass"));
    }

    #[test]
    fn test_format_json() {
        let entries = vec![TranscriptEntry::new(EntryKind::Notice, "fix me")];
        let json = ConsoleFormatter::format_json(&entries);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["kind"]["kind"], "notice");
        assert_eq!(value[0]["text"], "fix me");
    }

    #[test]
    fn test_format_plan_json() {
        let resolution = PlanResolution {
            plan: plan(),
            warnings: vec![PlanWarning::Empty],
        };
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_plan_json(&resolution)).unwrap();
        assert_eq!(value["plan"]["agents"][1], "StyleAgent");
        assert_eq!(value["warnings"][0], "Empty");
    }

    #[test]
    fn test_format_code_numbers_lines() {
        plain();
        assert_eq!(ConsoleFormatter::format_code("a\nb"), "1 │ a\n2 │ b");
    }
}
