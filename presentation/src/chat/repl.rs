//! REPL (Read-Eval-Print Loop) for interactive reviews

use super::command::{ReplCommand, ends_paste};
use crate::ConsoleFormatter;
use crate::ProgressReporter;
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use tracing::{debug, warn};
use tutor_application::{
    NoProgress, ReviewProgressNotifier, ReviewSession, RunStop, SessionError, TranscriptEntry,
};
use tutor_domain::{ExecutionMode, NextAction};

/// Interactive review REPL
pub struct ReviewRepl {
    session: ReviewSession,
    show_progress: bool,
    history_file: Option<PathBuf>,
    history_size: usize,
    follower: TranscriptFollower,
}

impl ReviewRepl {
    pub fn new(session: ReviewSession) -> Self {
        Self {
            session,
            show_progress: true,
            history_file: dirs::data_dir().map(|p| p.join("code-tutor").join("history.txt")),
            history_size: 1000,
            follower: TranscriptFollower::default(),
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Override the history file location
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.history_file = path;
        }
        self
    }

    pub fn with_history_size(mut self, size: usize) -> Self {
        self.history_size = size;
        self
    }

    pub fn session(&self) -> &ReviewSession {
        &self.session
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = self.editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("tutor".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt) {
                Ok(Signal::Success(line)) => {
                    let Some(command) = ReplCommand::parse(&line) else {
                        continue;
                    };
                    if self.handle_command(command, &mut editor).await {
                        break;
                    }
                }
                Ok(Signal::CtrlC) => {
                    println!("^C");
                    continue;
                }
                Ok(_) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    fn editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = &self.history_file else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(self.history_size, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!("History disabled ({}): {}", path.display(), e);
                editor
            }
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          Code Tutor - Review Session        │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Agents: {}",
            self.session
                .orchestrator()
                .roster_names()
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("Oracle: {}", self.session.orchestrator().oracle_name());
        println!("Mode:   {}", self.session.mode());
        if !self.session.code().is_blank() {
            println!(
                "Code:   {} lines loaded",
                self.session.code().line_count()
            );
        }
        println!();
        println!("Type {} for commands. Free text is read as run / adjust / exit.", "/help".cyan());
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /load <path>        - Load code from a file");
        println!("  /paste              - Paste code (finish with /end or a lone '.')");
        println!("  /show               - Show the loaded code");
        println!("  /plan               - Draft a new execution plan");
        println!("  /adjust <feedback>  - Revise the plan");
        println!("  /run, /next         - Run the plan or resume at the current agent");
        println!("  /fix                - Paste corrected code and resume");
        println!("  /execute            - Run every planned agent and show all reports");
        println!("  /status             - Show phase, mode and plan progress");
        println!("  /mode [free_run|interactive] - Show or switch the execution mode");
        println!("  /transcript         - Print the whole session transcript");
        println!("  /help, /h, /?       - Show this help");
        println!("  /quit, /exit, /q    - Exit");
        println!();
    }

    /// Handle one parsed command. Returns true if should exit.
    async fn handle_command(&mut self, command: ReplCommand, editor: &mut Reedline) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::Load(path) => match std::fs::read_to_string(&path) {
                Ok(code) => self.load_code(&code),
                Err(e) => eprintln!("{} {}: {}", "Error:".red(), path.display(), e),
            },
            ReplCommand::Paste => {
                if let Some(code) = Self::read_paste(editor) {
                    self.load_code(&code);
                }
            }
            ReplCommand::Show => {
                println!("{}", ConsoleFormatter::format_code(self.session.code().as_str()))
            }
            ReplCommand::Plan => self.generate_plan().await,
            ReplCommand::Adjust(feedback) => self.adjust_plan(&feedback).await,
            ReplCommand::Run => self.run_plan().await,
            ReplCommand::Fix => {
                if let Some(code) = Self::read_paste(editor) {
                    self.submit_fix(&code).await;
                }
            }
            ReplCommand::Execute => self.execute_all().await,
            ReplCommand::Status => println!(
                "{}",
                ConsoleFormatter::format_status(
                    &self.session.view(),
                    self.session.mode(),
                    self.session.plan()
                )
            ),
            ReplCommand::Mode(None) => println!(
                "Mode: {} ({})",
                self.session.mode(),
                self.session.mode().description()
            ),
            ReplCommand::Mode(Some(name)) => match name.parse::<ExecutionMode>() {
                Ok(mode) => {
                    self.session.set_mode(mode);
                    println!("Mode set to {}", mode.to_string().green());
                }
                Err(e) => eprintln!("{} {}", "Error:".red(), e),
            },
            ReplCommand::Transcript => {
                println!("{}", ConsoleFormatter::format_transcript(self.session.transcript()));
                self.follower.mark_seen(self.session.transcript());
            }
            ReplCommand::Input(text) => return self.interpret(&text).await,
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    /// Route free text through the orchestrator's run / adjust / exit classifier
    async fn interpret(&mut self, text: &str) -> bool {
        let action = self.session.interpret_command(text).await;
        debug!("Free text classified as {}", action.as_str());
        match action {
            NextAction::Run => self.run_plan().await,
            NextAction::Adjust => self.adjust_plan(text).await,
            NextAction::Exit => {
                println!("Bye!");
                return true;
            }
            NextAction::Unknown => {
                println!("Not sure what you meant. Try /run, /adjust <feedback> or /help.");
            }
        }
        false
    }

    fn read_paste(editor: &mut Reedline) -> Option<String> {
        println!("{}", "Paste code, then /end or '.' on its own line:".dimmed());
        let prompt = DefaultPrompt::new(DefaultPromptSegment::Empty, DefaultPromptSegment::Empty);
        let mut lines = Vec::new();
        loop {
            match editor.read_line(&prompt) {
                Ok(Signal::Success(line)) if ends_paste(&line) => break,
                Ok(Signal::Success(line)) => lines.push(line),
                Ok(Signal::CtrlC) => {
                    println!("^C (paste cancelled)");
                    return None;
                }
                Ok(_) => break,
                Err(e) => {
                    eprintln!("Error: {:?}", e);
                    return None;
                }
            }
        }
        let mut code = lines.join("\n");
        code.push('\n');
        Some(code)
    }

    fn load_code(&mut self, code: &str) {
        if self.session.submit_code(code) {
            println!(
                "{} {} lines loaded.",
                "✓".green(),
                self.session.code().line_count()
            );
        } else if self.session.code().is_blank() {
            println!("Nothing to load; the code is empty.");
        }
        self.print_new_entries();
    }

    fn progress(&self) -> Box<dyn ReviewProgressNotifier> {
        if self.show_progress {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(NoProgress)
        }
    }

    async fn generate_plan(&mut self) {
        let progress = self.progress();
        match self.session.generate_plan_with_progress(progress.as_ref()).await {
            Ok(resolution) => {
                println!("{}", ConsoleFormatter::format_plan(&resolution));
                self.follower.mark_seen(self.session.transcript());
            }
            Err(e) => Self::print_error(&e),
        }
    }

    async fn adjust_plan(&mut self, feedback: &str) {
        let progress = self.progress();
        match self
            .session
            .adjust_plan_with_progress(feedback, progress.as_ref())
            .await
        {
            Ok(resolution) => {
                println!("{}", ConsoleFormatter::format_plan(&resolution));
                self.follower.mark_seen(self.session.transcript());
            }
            Err(e) => Self::print_error(&e),
        }
    }

    async fn run_plan(&mut self) {
        let progress = self.progress();
        let result = self
            .session
            .run_or_resume_with_progress(progress.as_ref())
            .await;
        self.after_run(result);
    }

    async fn submit_fix(&mut self, code: &str) {
        let progress = self.progress();
        let result = self
            .session
            .submit_fix_with_progress(code, progress.as_ref())
            .await;
        self.after_run(result);
    }

    fn after_run(&mut self, result: Result<tutor_application::RunSummary, SessionError>) {
        self.print_new_entries();
        match result {
            Ok(summary) => match summary.stop {
                RunStop::Failed { agent, .. } => println!(
                    "\n{} Fix the code with {} (or {}) and the review resumes at {}.",
                    "→".yellow(),
                    "/fix".cyan(),
                    "/load".cyan(),
                    agent
                ),
                RunStop::Paused { agent, .. } => println!(
                    "\n{} Paused before {}. Type {} to continue.",
                    "→".yellow(),
                    agent,
                    "/next".cyan()
                ),
                RunStop::Completed => {}
            },
            Err(e) => Self::print_error(&e),
        }
    }

    async fn execute_all(&mut self) {
        let progress = self.progress();
        match self.session.execute_all(progress.as_ref()).await {
            Ok(report) => println!("{}", ConsoleFormatter::format_execution(&report)),
            Err(e) => Self::print_error(&e),
        }
    }

    fn print_new_entries(&mut self) {
        let entries = self.follower.take_new(self.session.transcript());
        if !entries.is_empty() {
            println!("{}", ConsoleFormatter::format_transcript(entries));
        }
    }

    fn print_error(error: &SessionError) {
        eprintln!("{} {}", "Error:".red().bold(), error);
    }
}

/// Tracks how much of the session transcript has been printed.
///
/// The session clears its transcript when a plan changes or a run restarts,
/// so a shrunk or rewritten transcript is printed again from the start.
#[derive(Debug, Default)]
struct TranscriptFollower {
    seen: usize,
    last: Option<TranscriptEntry>,
}

impl TranscriptFollower {
    fn take_new<'a>(&mut self, entries: &'a [TranscriptEntry]) -> &'a [TranscriptEntry] {
        let continues = self.seen <= entries.len()
            && (self.seen == 0 || entries.get(self.seen - 1) == self.last.as_ref());
        let start = if continues { self.seen } else { 0 };
        self.mark_seen(entries);
        &entries[start..]
    }

    fn mark_seen(&mut self, entries: &[TranscriptEntry]) {
        self.seen = entries.len();
        self.last = entries.last().cloned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_application::EntryKind;

    fn entry(text: &str) -> TranscriptEntry {
        TranscriptEntry::new(EntryKind::System, text)
    }

    #[test]
    fn test_follower_returns_only_new_entries() {
        let mut follower = TranscriptFollower::default();
        let mut entries = vec![entry("a"), entry("b")];
        assert_eq!(follower.take_new(&entries).len(), 2);
        assert!(follower.take_new(&entries).is_empty());

        entries.push(entry("c"));
        let new = follower.take_new(&entries);
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].text, "c");
    }

    #[test]
    fn test_follower_restarts_after_transcript_reset() {
        let mut follower = TranscriptFollower::default();
        let before = vec![entry("a"), entry("b"), entry("c")];
        follower.take_new(&before);

        // Cleared and rebuilt with fewer entries
        let shorter = vec![entry("plan")];
        assert_eq!(follower.take_new(&shorter).len(), 1);

        // Cleared and rebuilt past the old length
        let rebuilt = vec![entry("x"), entry("y"), entry("z")];
        assert_eq!(follower.take_new(&rebuilt).len(), 3);
    }
}
