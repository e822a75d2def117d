//! Progress reporting while the orchestrator plans and agents run

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use tutor_application::ReviewProgressNotifier;
use tutor_domain::{AgentName, PlanResolution, ReviewStage};

/// Reports progress with one spinner per running agent
pub struct ProgressReporter {
    multi: MultiProgress,
    current: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            current: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap()
    }

    fn start_spinner(&self, prefix: String, message: &str) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(prefix);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Some(previous) = self.current.lock().unwrap().replace(pb) {
            previous.finish_and_clear();
        }
    }

    fn stage_message(stage: ReviewStage) -> String {
        format!("{}...", stage.display_name())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewProgressNotifier for ProgressReporter {
    fn on_plan_start(&self) {
        self.start_spinner("Orchestrator".to_string(), "drafting plan...");
    }

    fn on_plan_resolved(&self, resolution: &PlanResolution) {
        if let Some(pb) = self.current.lock().unwrap().take() {
            pb.finish_with_message(format!(
                "{} {}",
                "plan ready:".green(),
                resolution.plan.summary()
            ));
        }
    }

    fn on_agent_start(&self, agent: &AgentName, index: usize, total: usize) {
        self.start_spinner(format!("[{}/{}] {}", index + 1, total, agent), "starting...");
    }

    fn on_stage_start(&self, _agent: &AgentName, stage: ReviewStage) {
        if let Some(pb) = self.current.lock().unwrap().as_ref() {
            pb.set_message(Self::stage_message(stage));
        }
    }

    fn on_stage_error(&self, _agent: &AgentName, stage: ReviewStage, error: &str) {
        if let Some(pb) = self.current.lock().unwrap().as_ref() {
            pb.println(format!(
                "  {} {} failed: {}",
                "!".yellow(),
                stage.as_str(),
                error
            ));
        }
    }

    fn on_agent_complete(&self, _agent: &AgentName, is_valid: bool) {
        if let Some(pb) = self.current.lock().unwrap().take() {
            if is_valid {
                pb.finish_with_message(format!("{}", "v passed".green()));
            } else {
                pb.finish_with_message(format!("{}", "x issues found".red()));
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ReviewProgressNotifier for SimpleProgress {
    fn on_plan_start(&self) {
        println!("{} {}", "->".cyan(), "Drafting execution plan".bold());
    }

    fn on_plan_resolved(&self, resolution: &PlanResolution) {
        println!("  {} {}", "plan:".dimmed(), resolution.plan.summary());
    }

    fn on_agent_start(&self, agent: &AgentName, index: usize, total: usize) {
        println!(
            "{} {} ({}/{})",
            "->".cyan(),
            agent.as_str().bold(),
            index + 1,
            total
        );
    }

    fn on_stage_error(&self, _agent: &AgentName, stage: ReviewStage, error: &str) {
        println!("  {} {} failed: {}", "!".yellow(), stage.as_str(), error);
    }

    fn on_agent_complete(&self, agent: &AgentName, is_valid: bool) {
        if is_valid {
            println!("  {} {}", "v".green(), agent);
        } else {
            println!("  {} {} (issues found)", "x".red(), agent);
        }
    }
}
