//! Review session use case
//!
//! Drives the orchestrator and its agents across turns. The session owns the
//! code under review, the execution cursor and the transcript; a failing
//! agent parks the session in [`SessionPhase::AwaitingFix`] until corrected
//! code is submitted, and the next run resumes at the same agent.
//!
//! ```text
//! generate_plan ──▶ PlanReady ──run_or_resume──▶ Running
//!                                                  │
//!          ┌───────── fail (cursor stays) ◀────────┤
//!          ▼                                       │
//!     AwaitingFix ──submit_fix──▶ Running          ├── pass, interactive ──▶ Paused
//!                                                  └── all pass ──▶ Complete (cursor 0)
//! ```

mod transcript;
mod types;

pub use transcript::{EntryKind, Transcript, TranscriptEntry};
pub use types::{RunStop, RunSummary, SessionError, SessionView};

use crate::config::BehaviorConfig;
use crate::ports::progress::{NoProgress, ReviewProgressNotifier};
use crate::use_cases::orchestrator::Orchestrator;
use tracing::{debug, info};
use tutor_domain::{
    AgentOutcome, CodeSnapshot, ExecutionCursor, ExecutionMode, ExecutionPlan, NextAction,
    PlanResolution, SessionPhase,
};

const ISSUES_DETECTED: &str = "⚠️ Issues detected! Please correct the code below and submit it.";
const ALL_PASSED: &str = "🎉 All checks passed! Your code is valid!";
const CODE_UPDATED: &str = "✅ Code updated! Resuming analysis...";

/// Stateful review loop over one code snapshot
pub struct ReviewSession {
    orchestrator: Orchestrator,
    mode: ExecutionMode,
    phase: SessionPhase,
    cursor: ExecutionCursor,
    code: CodeSnapshot,
    transcript: Transcript,
    /// Report of the last agent that ran, used to interpret free text
    last_feedback: String,
}

impl ReviewSession {
    pub fn new(orchestrator: Orchestrator, config: &BehaviorConfig) -> Self {
        Self {
            orchestrator,
            mode: config.execution_mode,
            phase: SessionPhase::Idle,
            cursor: ExecutionCursor::default(),
            code: CodeSnapshot::default(),
            transcript: Transcript::default(),
            last_feedback: String::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn cursor(&self) -> ExecutionCursor {
        self.cursor
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ExecutionMode) {
        self.mode = mode;
    }

    pub fn code(&self) -> &CodeSnapshot {
        &self.code
    }

    pub fn plan(&self) -> &ExecutionPlan {
        self.orchestrator.plan()
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        self.transcript.entries()
    }

    pub fn last_feedback(&self) -> &str {
        &self.last_feedback
    }

    /// Snapshot for rendering
    pub fn view(&self) -> SessionView<'_> {
        let awaiting_fix = self.phase.is_awaiting_fix();
        let blocking_index = awaiting_fix.then(|| self.cursor.position());
        SessionView {
            phase: self.phase,
            cursor: self.cursor.position(),
            plan_len: self.cursor.len(),
            awaiting_fix,
            blocking_index,
            blocking_agent: blocking_index.and_then(|i| self.orchestrator.plan().get(i)),
            transcript: self.transcript.entries(),
        }
    }

    /// Replace the code under review.
    ///
    /// Blank or unchanged submissions keep the current snapshot; the next run
    /// simply retries it. Returns whether the snapshot changed. The cursor
    /// is never touched.
    pub fn submit_code(&mut self, code: &str) -> bool {
        let changed = self.code.replace_with(code);
        if changed {
            debug!("Code snapshot replaced ({} lines)", self.code.line_count());
            if self.phase.is_awaiting_fix() {
                self.transcript.system(CODE_UPDATED);
            }
        } else if self.phase.is_awaiting_fix() {
            self.transcript.notice("Code unchanged; retrying the same code.");
        }
        changed
    }

    /// Submit corrected code and resume at the failing agent. The transcript
    /// is kept so the earlier report stays visible.
    pub async fn submit_fix(&mut self, code: &str) -> Result<RunSummary, SessionError> {
        self.submit_fix_with_progress(code, &NoProgress).await
    }

    pub async fn submit_fix_with_progress(
        &mut self,
        code: &str,
        progress: &dyn ReviewProgressNotifier,
    ) -> Result<RunSummary, SessionError> {
        self.submit_code(code);
        self.run_from_cursor(progress, false).await
    }

    /// Draft a brand-new plan for the current code
    pub async fn generate_plan(&mut self) -> Result<PlanResolution, SessionError> {
        self.generate_plan_with_progress(&NoProgress).await
    }

    pub async fn generate_plan_with_progress(
        &mut self,
        progress: &dyn ReviewProgressNotifier,
    ) -> Result<PlanResolution, SessionError> {
        if self.code.is_blank() {
            return Err(SessionError::NoCode);
        }
        progress.on_plan_start();
        let resolution = self.orchestrator.draft_plan(self.code.as_str()).await;
        self.install_plan(&resolution);
        progress.on_plan_resolved(&resolution);
        Ok(resolution)
    }

    /// Revise the current plan from free-text feedback
    pub async fn adjust_plan(&mut self, feedback: &str) -> Result<PlanResolution, SessionError> {
        self.adjust_plan_with_progress(feedback, &NoProgress).await
    }

    pub async fn adjust_plan_with_progress(
        &mut self,
        feedback: &str,
        progress: &dyn ReviewProgressNotifier,
    ) -> Result<PlanResolution, SessionError> {
        if !self.phase.has_plan() {
            return Err(SessionError::NoPlan);
        }
        if !self.phase.can_replan() {
            return Err(SessionError::RunInProgress);
        }
        if feedback.trim().is_empty() {
            return Err(SessionError::EmptyFeedback);
        }
        progress.on_plan_start();
        let prior = self.orchestrator.plan().explanation().to_string();
        let resolution = self.orchestrator.adjust_plan(&prior, feedback.trim()).await;
        self.install_plan(&resolution);
        progress.on_plan_resolved(&resolution);
        Ok(resolution)
    }

    /// Run from the cursor with default (no-op) progress
    pub async fn run_or_resume(&mut self) -> Result<RunSummary, SessionError> {
        self.run_or_resume_with_progress(&NoProgress).await
    }

    /// Run the plan from the cursor until an agent fails, interactive mode
    /// pauses, or every agent has passed.
    ///
    /// A run that starts at the first agent discards the previous transcript.
    pub async fn run_or_resume_with_progress(
        &mut self,
        progress: &dyn ReviewProgressNotifier,
    ) -> Result<RunSummary, SessionError> {
        self.run_from_cursor(progress, true).await
    }

    async fn run_from_cursor(
        &mut self,
        progress: &dyn ReviewProgressNotifier,
        fresh_transcript: bool,
    ) -> Result<RunSummary, SessionError> {
        if !self.phase.has_plan() {
            return Err(SessionError::NoPlan);
        }
        // A dropped run future leaves the phase at Running
        if !self.phase.can_run() {
            return Err(SessionError::RunInProgress);
        }
        if self.code.is_blank() {
            return Err(SessionError::NoCode);
        }
        let agents = self.orchestrator.plan().agents().to_vec();
        if agents.is_empty() {
            self.transcript
                .warning("Execution plan is empty. Adjust or regenerate the plan first.");
            return Err(SessionError::EmptyPlan);
        }

        if self.cursor.is_finished() {
            self.cursor.reset();
        }
        if fresh_transcript && self.cursor.is_at_start() {
            self.transcript.clear();
        }

        info!(
            "Running plan from agent {} of {}",
            self.cursor.position() + 1,
            agents.len()
        );
        self.phase = SessionPhase::Running;
        let total = agents.len();
        let mut outcomes = Vec::new();

        while let Some(name) = agents.get(self.cursor.position()) {
            let index = self.cursor.position();
            self.transcript.push(
                EntryKind::AgentStart {
                    agent: name.clone(),
                },
                format!("Running agent: {}", name),
            );
            progress.on_agent_start(name, index, total);

            let outcome = match self.orchestrator.agent(name) {
                Some(agent) => {
                    agent
                        .run_with_progress(self.code.as_str(), progress)
                        .await
                }
                None => AgentOutcome::fault(
                    name.clone(),
                    format!("Error: agent {} is not in the roster", name),
                ),
            };
            progress.on_agent_complete(name, outcome.is_valid);

            self.transcript.push(
                EntryKind::AgentReport {
                    agent: name.clone(),
                    is_valid: outcome.is_valid,
                },
                outcome.report.clone(),
            );
            self.last_feedback = outcome.report.clone();
            let passed = outcome.is_valid;
            outcomes.push(outcome);

            if !passed {
                info!("{} found issues; awaiting fix", name);
                self.transcript.notice(ISSUES_DETECTED);
                self.phase = SessionPhase::AwaitingFix;
                return Ok(RunSummary {
                    stop: RunStop::Failed {
                        index,
                        agent: name.clone(),
                    },
                    outcomes,
                });
            }

            self.cursor.advance();
            if let Some(next) = agents.get(self.cursor.position()) {
                self.transcript
                    .system(format!("Next agent: {} will run next.", next));
                if self.mode.pauses_between_agents() {
                    self.phase = SessionPhase::Paused;
                    return Ok(RunSummary {
                        stop: RunStop::Paused {
                            index: self.cursor.position(),
                            agent: next.clone(),
                        },
                        outcomes,
                    });
                }
            }
        }

        info!("All {} agents passed", total);
        self.transcript.system(ALL_PASSED);
        self.cursor.reset();
        self.phase = SessionPhase::Complete;
        Ok(RunSummary {
            stop: RunStop::Completed,
            outcomes,
        })
    }

    /// Run every planned agent regardless of verdicts. Leaves the cursor
    /// and phase alone.
    pub async fn execute_all(
        &self,
        progress: &dyn ReviewProgressNotifier,
    ) -> Result<String, SessionError> {
        if self.code.is_blank() {
            return Err(SessionError::NoCode);
        }
        Ok(self
            .orchestrator
            .execute_with_progress(self.code.as_str(), progress)
            .await)
    }

    /// Classify free text as run / adjust / exit
    pub async fn interpret_command(&self, input: &str) -> NextAction {
        self.orchestrator
            .interpret_command(input, &self.last_feedback)
            .await
    }

    fn install_plan(&mut self, resolution: &PlanResolution) {
        self.transcript.clear();
        self.cursor = ExecutionCursor::new(resolution.plan.len());
        self.phase = SessionPhase::PlanReady;
        self.transcript
            .push(EntryKind::Plan, resolution.plan.explanation());
        for warning in &resolution.warnings {
            self.transcript.warning(warning.to_string());
        }
    }
}
