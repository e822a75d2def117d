//! Orchestrator use case
//!
//! Owns the agent roster and the current [`ExecutionPlan`]. Planning is two
//! oracle calls: one for the prose plan shown to the human, one for the
//! ordered agent names that will actually run.

use crate::ports::progress::{NoProgress, ReviewProgressNotifier};
use crate::ports::text_oracle::TextOracle;
use crate::use_cases::review_agent::ReviewAgent;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tutor_domain::{
    AgentName, DomainError, ExecutionPlan, NextAction, OrchestratorPromptTemplate,
    PlanResolution, PlanWarning, decode_agent_names,
};

/// Plans and runs review agents
pub struct Orchestrator {
    roster: Vec<Arc<ReviewAgent>>,
    oracle: Arc<dyn TextOracle>,
    plan: ExecutionPlan,
}

impl Orchestrator {
    /// Create an orchestrator over an ordered roster.
    ///
    /// The roster must be non-empty and agent names unique.
    pub fn new(
        roster: Vec<Arc<ReviewAgent>>,
        oracle: Arc<dyn TextOracle>,
    ) -> Result<Self, DomainError> {
        if roster.is_empty() {
            return Err(DomainError::EmptyRoster);
        }
        let mut seen = HashSet::new();
        for agent in &roster {
            if !seen.insert(agent.name().as_str()) {
                return Err(DomainError::DuplicateAgent(agent.name().to_string()));
            }
        }

        Ok(Self {
            roster,
            oracle,
            plan: ExecutionPlan::empty(),
        })
    }

    pub fn roster(&self) -> &[Arc<ReviewAgent>] {
        &self.roster
    }

    pub fn roster_names(&self) -> Vec<AgentName> {
        self.roster.iter().map(|a| a.name().clone()).collect()
    }

    pub fn agent(&self, name: &AgentName) -> Option<&Arc<ReviewAgent>> {
        self.roster.iter().find(|a| a.name() == name)
    }

    /// The currently stored plan
    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Draft a new plan for `code`, resolve it and store it.
    ///
    /// Never fails: an oracle fault becomes the plan text and an empty plan.
    pub async fn draft_plan(&mut self, code: &str) -> PlanResolution {
        let roster = self.roster_names();
        let foundational: Vec<AgentName> = self
            .roster
            .iter()
            .filter(|a| a.profile().is_foundational())
            .map(|a| a.name().clone())
            .collect();

        info!("Drafting analysis plan over {} agents", roster.len());
        let prompt = OrchestratorPromptTemplate::draft_plan(&roster, &foundational, code);
        let resolution = match self.oracle.complete(&prompt).await {
            Ok(text) => self.parse_plan(&text).await,
            Err(e) => {
                warn!("Plan drafting failed: {}", e);
                PlanResolution::failed(
                    format!("Error generating plan: {}", e),
                    PlanWarning::OracleUnavailable(e.to_string()),
                )
            }
        };

        self.store(&resolution);
        resolution
    }

    /// Ask the oracle which agents `plan_text` runs and resolve them against
    /// the roster. Does not store the result.
    pub async fn parse_plan(&self, plan_text: &str) -> PlanResolution {
        let roster = self.roster_names();
        let prompt = OrchestratorPromptTemplate::parse_plan(plan_text, &roster);

        let answer = match self.oracle.complete(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Plan parsing failed: {}", e);
                return PlanResolution::failed(
                    plan_text,
                    PlanWarning::OracleUnavailable(e.to_string()),
                );
            }
        };

        let resolution = match decode_agent_names(&answer) {
            Ok(names) => {
                debug!("Decoded agent names: {:?}", names);
                ExecutionPlan::resolve(plan_text, &names, &roster)
            }
            Err(e) => {
                warn!("Could not decode agent names from {:?}: {}", answer.trim(), e);
                PlanResolution::failed(plan_text, PlanWarning::DecodeFailed(e.to_string()))
            }
        };

        for warning in &resolution.warnings {
            warn!("{}", warning);
        }
        resolution
    }

    /// Revise `prior_plan` from user feedback. The result replaces the
    /// stored plan in full.
    pub async fn adjust_plan(&mut self, prior_plan: &str, feedback: &str) -> PlanResolution {
        let roster = self.roster_names();
        info!("Adjusting analysis plan");
        let prompt = OrchestratorPromptTemplate::adjust_plan(prior_plan, feedback, &roster);
        let resolution = match self.oracle.complete(&prompt).await {
            Ok(text) => self.parse_plan(&text).await,
            Err(e) => {
                warn!("Plan adjustment failed: {}", e);
                PlanResolution::failed(
                    format!("Error adjusting plan: {}", e),
                    PlanWarning::OracleUnavailable(e.to_string()),
                )
            }
        };

        self.store(&resolution);
        resolution
    }

    /// Run every planned agent with default (no-op) progress
    pub async fn execute(&self, code: &str) -> String {
        self.execute_with_progress(code, &NoProgress).await
    }

    /// Run every planned agent in order, regardless of verdicts, and
    /// concatenate their reports.
    pub async fn execute_with_progress(
        &self,
        code: &str,
        progress: &dyn ReviewProgressNotifier,
    ) -> String {
        if self.plan.is_empty() {
            warn!("{}", PlanWarning::Empty);
            return PlanWarning::Empty.to_string();
        }

        let total = self.plan.len();
        let mut sections = Vec::with_capacity(total);
        for (index, name) in self.plan.agents().iter().enumerate() {
            progress.on_agent_start(name, index, total);
            let (report, is_valid) = match self.agent(name) {
                Some(agent) => agent.run_with_progress(code, progress).await.into_pair(),
                None => (format!("Error: agent {} is not in the roster", name), false),
            };
            progress.on_agent_complete(name, is_valid);
            sections.push(format!(
                "## {}\n{}\n\nVerdict: {}",
                name,
                report.trim_end(),
                if is_valid { "passed" } else { "issues found" }
            ));
        }

        sections.join("\n\n")
    }

    /// Classify free-text user input into the next workflow step.
    ///
    /// Oracle faults and unexpected answers yield [`NextAction::Unknown`].
    pub async fn interpret_command(&self, user_input: &str, last_feedback: &str) -> NextAction {
        let prompt = OrchestratorPromptTemplate::decide_next_action(
            self.plan.agents(),
            last_feedback,
            user_input,
        );
        match self.oracle.complete(&prompt).await {
            Ok(answer) => {
                let action = NextAction::parse_answer(&answer);
                debug!("Interpreted {:?} as {}", user_input, action);
                action
            }
            Err(e) => {
                warn!("Could not interpret command: {}", e);
                NextAction::Unknown
            }
        }
    }

    fn store(&mut self, resolution: &PlanResolution) {
        info!("Execution plan: {}", resolution.plan.summary());
        self.plan = resolution.plan.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::analysis_tool::AnalysisTool;
    use crate::ports::text_oracle::OracleError;
    use crate::use_cases::testing::{NeedleTool, ScriptedOracle};
    use tutor_domain::{AgentProfile, Concern};

    fn roster(oracle: &Arc<ScriptedOracle>, concerns: &[Concern]) -> Vec<Arc<ReviewAgent>> {
        concerns
            .iter()
            .map(|c| {
                let tool: Arc<dyn AnalysisTool> = Arc::new(NeedleTool::new("print(", "unclosed"));
                Arc::new(ReviewAgent::new(
                    AgentProfile::builtin(*c),
                    tool,
                    oracle.clone(),
                ))
            })
            .collect()
    }

    fn orchestrator(oracle: &Arc<ScriptedOracle>) -> Orchestrator {
        Orchestrator::new(
            roster(
                oracle,
                &[
                    Concern::Syntax,
                    Concern::Semantics,
                    Concern::Style,
                    Concern::Security,
                ],
            ),
            oracle.clone(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_empty_roster() {
        let oracle = Arc::new(ScriptedOracle::new(vec![]));
        let result = Orchestrator::new(Vec::new(), oracle);
        assert!(matches!(result, Err(DomainError::EmptyRoster)));
    }

    #[test]
    fn test_new_rejects_duplicate_names() {
        let oracle = Arc::new(ScriptedOracle::new(vec![]));
        let result = Orchestrator::new(
            roster(&oracle, &[Concern::Syntax, Concern::Syntax]),
            oracle.clone(),
        );
        assert!(matches!(result, Err(DomainError::DuplicateAgent(name)) if name == "SyntaxAgent"));
    }

    #[tokio::test]
    async fn test_parse_plan_returns_named_agents_in_order() {
        let oracle = Arc::new(ScriptedOracle::new(vec![r#"["SyntaxAgent","SemanticsAgent"]"#]));
        let orchestrator = orchestrator(&oracle);

        let resolution = orchestrator.parse_plan("1. SyntaxAgent 2. SemanticsAgent").await;

        assert_eq!(resolution.plan.summary(), "SyntaxAgent → SemanticsAgent");
        assert!(!resolution.has_warnings());
    }

    #[tokio::test]
    async fn test_parse_plan_malformed_gives_empty_plan_without_fault() {
        let oracle = Arc::new(ScriptedOracle::new(vec!["['SyntaxAgent', 'SemanticsAgent']"]));
        let orchestrator = orchestrator(&oracle);

        let resolution = orchestrator.parse_plan("plan").await;

        assert!(resolution.plan.is_empty());
        assert!(resolution.decode_failed());
    }

    #[tokio::test]
    async fn test_parse_plan_unknown_and_mixed_names() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            r#"["GhostAgent"]"#,
            "```json\n[\"CodeStyleAgent\", \"GhostAgent\", \"SyntaxAgent\"]\n```",
        ]));
        let orchestrator = orchestrator(&oracle);

        let ghost = orchestrator.parse_plan("plan").await;
        assert!(ghost.plan.is_empty());
        assert_eq!(ghost.unmatched(), &["GhostAgent".to_string()]);
        assert!(ghost.warnings.contains(&PlanWarning::Empty));

        let mixed = orchestrator.parse_plan("plan").await;
        assert_eq!(mixed.plan.summary(), "CodeStyleAgent → SyntaxAgent");
        assert_eq!(mixed.unmatched(), &["GhostAgent".to_string()]);
    }

    #[tokio::test]
    async fn test_draft_plan_stores_plan_and_prompts_foundational_first() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            "1. **SyntaxAgent**: syntax\n2. **SemanticsAgent**: logic",
            r#"["SyntaxAgent","SemanticsAgent"]"#,
        ]));
        let mut orchestrator = orchestrator(&oracle);

        let resolution = orchestrator.draft_plan("print('x')").await;

        assert_eq!(resolution.plan.len(), 2);
        assert_eq!(orchestrator.plan().len(), 2);
        assert!(orchestrator.plan().explanation().contains("**SyntaxAgent**"));
        let prompts = oracle.prompts();
        assert!(prompts[0].contains("Always schedule SyntaxAgent, SemanticsAgent first"));
        assert!(prompts[1].contains("**SemanticsAgent**: logic"));
    }

    #[tokio::test]
    async fn test_draft_plan_oracle_fault_gives_empty_plan() {
        let oracle = Arc::new(ScriptedOracle::with_results(vec![Err(OracleError::Timeout)]));
        let mut orchestrator = orchestrator(&oracle);

        let resolution = orchestrator.draft_plan("x = 1").await;

        assert!(resolution.plan.is_empty());
        assert_eq!(resolution.plan.explanation(), "Error generating plan: Timeout");
        assert!(
            resolution
                .warnings
                .contains(&PlanWarning::OracleUnavailable("Timeout".to_string()))
        );
    }

    #[tokio::test]
    async fn test_adjust_plan_replaces_stored_plan() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            "1. SyntaxAgent",
            r#"["SyntaxAgent"]"#,
            "1. SyntaxAgent\n2. SecurityAnalysisAgent",
            r#"["SyntaxAgent","SecurityAnalysisAgent"]"#,
        ]));
        let mut orchestrator = orchestrator(&oracle);
        orchestrator.draft_plan("x = 1").await;
        let prior = orchestrator.plan().explanation().to_string();

        orchestrator.adjust_plan(&prior, "also check security").await;

        assert_eq!(
            orchestrator.plan().summary(),
            "SyntaxAgent → SecurityAnalysisAgent"
        );
        assert_eq!(
            orchestrator.plan().explanation(),
            "1. SyntaxAgent\n2. SecurityAnalysisAgent"
        );
        assert!(oracle.prompts()[2].contains("also check security"));
    }

    #[tokio::test]
    async fn test_execute_runs_all_agents_even_after_failure() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            "plan",
            r#"["SyntaxAgent","SemanticsAgent"]"#,
            // SyntaxAgent
            "check",
            "Unclosed paren on line 1",
            "yes",
            // SemanticsAgent
            "check",
            "Logic looks fine",
            "yes",
        ]));
        let mut orchestrator = orchestrator(&oracle);
        orchestrator.draft_plan("print('x'").await;

        let output = orchestrator.execute("print('x'").await;

        assert!(output.contains("## SyntaxAgent\nUnclosed paren on line 1"));
        assert!(output.contains("## SemanticsAgent\nLogic looks fine"));
        assert!(output.find("SyntaxAgent").unwrap() < output.find("SemanticsAgent").unwrap());
        assert_eq!(output.matches("Verdict: issues found").count(), 2);
        assert_eq!(oracle.remaining(), 0);
    }

    #[tokio::test]
    async fn test_execute_with_empty_plan() {
        let oracle = Arc::new(ScriptedOracle::new(vec![]));
        let orchestrator = orchestrator(&oracle);

        let output = orchestrator.execute("x = 1").await;

        assert!(output.starts_with("Execution plan is empty"));
        assert!(oracle.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_interpret_command() {
        let oracle = Arc::new(ScriptedOracle::with_results(vec![
            Ok("Run.".to_string()),
            Ok("'adjust'".to_string()),
            Ok("let's stop".to_string()),
            Err(OracleError::Timeout),
        ]));
        let orchestrator = orchestrator(&oracle);

        assert_eq!(orchestrator.interpret_command("go", "").await, NextAction::Run);
        assert_eq!(orchestrator.interpret_command("change", "").await, NextAction::Adjust);
        assert_eq!(orchestrator.interpret_command("hmm", "").await, NextAction::Unknown);
        assert_eq!(orchestrator.interpret_command("bye", "").await, NextAction::Unknown);
    }
}
