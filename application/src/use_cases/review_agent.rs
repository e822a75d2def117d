//! Review agent use case
//!
//! One generic agent drives the four-stage protocol
//! (plan → analyze → report → validate) for any concern. The concern-specific
//! parts come from an [`AgentProfile`] and the bound [`AnalysisTool`].

use crate::ports::analysis_tool::AnalysisTool;
use crate::ports::progress::{NoProgress, ReviewProgressNotifier};
use crate::ports::text_oracle::TextOracle;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tutor_domain::{
    AgentName, AgentOutcome, AgentProfile, AgentPromptTemplate, Findings, ReviewStage,
    answer_is, report_contradicts_findings,
};

/// A review agent: one profile, one tool, one oracle.
///
/// Immutable and stateless across runs, so the same agent can be shared
/// between sessions.
pub struct ReviewAgent {
    profile: AgentProfile,
    tool: Arc<dyn AnalysisTool>,
    oracle: Arc<dyn TextOracle>,
}

impl ReviewAgent {
    pub fn new(
        profile: AgentProfile,
        tool: Arc<dyn AnalysisTool>,
        oracle: Arc<dyn TextOracle>,
    ) -> Self {
        Self {
            profile,
            tool,
            oracle,
        }
    }

    pub fn name(&self) -> &AgentName {
        &self.profile.name
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    /// Run the agent with default (no-op) progress
    pub async fn run(&self, code: &str) -> AgentOutcome {
        self.run_with_progress(code, &NoProgress).await
    }

    /// Run all four stages against `code`.
    ///
    /// Never fails: stage faults become visible text and a panic anywhere in
    /// the pipeline becomes an invalid outcome carrying the panic message.
    pub async fn run_with_progress(
        &self,
        code: &str,
        progress: &dyn ReviewProgressNotifier,
    ) -> AgentOutcome {
        info!("Running agent {}", self.name());

        match AssertUnwindSafe(self.run_stages(code, progress))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message =
                    format!("Error in {}: {}", self.name(), panic_message(payload.as_ref()));
                warn!("{}", message);
                AgentOutcome::fault(self.name().clone(), message)
            }
        }
    }

    async fn run_stages(&self, code: &str, progress: &dyn ReviewProgressNotifier) -> AgentOutcome {
        let name = self.name();
        let mut degraded = Vec::new();

        // Stage 1: Plan (advisory)
        progress.on_stage_start(name, ReviewStage::Plan);
        let prompt = AgentPromptTemplate::plan(&self.profile, self.tool.description(), code);
        let plan = match self.oracle.complete(&prompt).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!("{}: plan stage failed: {}", name, e);
                progress.on_stage_error(name, ReviewStage::Plan, &e.to_string());
                degraded.push(ReviewStage::Plan);
                format!("Error generating analysis plan: {}", e)
            }
        };

        // Stage 2: Analyze
        progress.on_stage_start(name, ReviewStage::Analyze);
        let findings = match self.tool.analyze(code).await {
            Ok(findings) => findings,
            Err(e) => {
                warn!("{}: {} failed: {}", name, self.tool.name(), e);
                progress.on_stage_error(name, ReviewStage::Analyze, &e.to_string());
                degraded.push(ReviewStage::Analyze);
                Findings::tool_error(e.to_string())
            }
        };
        debug!("{}: {} finding(s)", name, findings.issue_count());

        // Stage 3: Report
        progress.on_stage_start(name, ReviewStage::Report);
        let prompt = AgentPromptTemplate::report(&self.profile, &plan, &findings, code);
        let mut report = match self.oracle.complete(&prompt).await {
            Ok(report) => report,
            Err(e) => {
                warn!("{}: report stage failed: {}", name, e);
                progress.on_stage_error(name, ReviewStage::Report, &e.to_string());
                degraded.push(ReviewStage::Report);
                format!("Error generating report: {}\n\nTool feedback:\n{}", e, findings)
            }
        };

        if report_contradicts_findings(&report, &findings) {
            warn!(
                "{}: report claims a clean result but the tool reported {} finding(s)",
                name,
                findings.issue_count()
            );
            report.push_str(&format!(
                "\n\nNote: {} reported the following:\n{}",
                self.tool.name(),
                findings
            ));
        }

        // Stage 4: Validate
        progress.on_stage_start(name, ReviewStage::Validate);
        let prompt = AgentPromptTemplate::validate(&self.profile, &report, &findings);
        let is_valid = match self.oracle.complete(&prompt).await {
            Ok(answer) => {
                let oracle_says_clean = answer_is(&answer, "no");
                debug!("{}: validation answer {:?}", name, answer.trim());
                // Without a real analysis or report there is nothing to vouch for
                let unchecked = degraded
                    .iter()
                    .any(|stage| matches!(stage, ReviewStage::Analyze | ReviewStage::Report));
                !unchecked && self.profile.policy.verdict(&findings, oracle_says_clean)
            }
            Err(e) => {
                warn!("{}: validate stage failed: {}", name, e);
                progress.on_stage_error(name, ReviewStage::Validate, &e.to_string());
                degraded.push(ReviewStage::Validate);
                report.push_str(&format!("\n\nError validating report: {}", e));
                false
            }
        };

        info!(
            "Agent {} finished: {}",
            name,
            if is_valid { "passed" } else { "issues found" }
        );

        AgentOutcome::new(name.clone(), report, is_valid, findings).with_degraded_stages(degraded)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
