//! Slash-command parsing for the review REPL

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    /// Load code from a file
    Load(PathBuf),
    /// Read code from the terminal until `/end`
    Paste,
    Show,
    Plan,
    Adjust(String),
    /// Start the plan or resume at the cursor
    Run,
    /// Paste corrected code and resume at the failing agent
    Fix,
    /// Run every planned agent regardless of verdicts
    Execute,
    Status,
    /// Show or switch the execution mode
    Mode(Option<String>),
    Transcript,
    /// Free text for the orchestrator to classify
    Input(String),
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if !line.starts_with('/') {
            return Some(ReplCommand::Input(line.to_string()));
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let arg = (!arg.is_empty()).then(|| arg.to_string());

        let command = match (name, arg) {
            ("/quit" | "/exit" | "/q", _) => ReplCommand::Quit,
            ("/help" | "/h" | "/?", _) => ReplCommand::Help,
            ("/load", Some(path)) => ReplCommand::Load(PathBuf::from(path)),
            ("/paste", _) => ReplCommand::Paste,
            ("/show" | "/code", _) => ReplCommand::Show,
            ("/plan", _) => ReplCommand::Plan,
            ("/adjust", Some(feedback)) => ReplCommand::Adjust(feedback),
            ("/run" | "/next" | "/continue", _) => ReplCommand::Run,
            ("/fix", _) => ReplCommand::Fix,
            ("/execute", _) => ReplCommand::Execute,
            ("/status", _) => ReplCommand::Status,
            ("/mode", mode) => ReplCommand::Mode(mode),
            ("/transcript", _) => ReplCommand::Transcript,
            _ => ReplCommand::Unknown(line.to_string()),
        };
        Some(command)
    }
}

/// True for a line that ends a pasted code block
pub(crate) fn ends_paste(line: &str) -> bool {
    matches!(line.trim(), "/end" | ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_is_ignored() {
        assert_eq!(ReplCommand::parse("   "), None);
    }

    #[test]
    fn test_free_text_is_input() {
        assert_eq!(
            ReplCommand::parse("  looks good, go ahead "),
            Some(ReplCommand::Input("looks good, go ahead".to_string()))
        );
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(
            ReplCommand::parse("/load  src/app.py"),
            Some(ReplCommand::Load(PathBuf::from("src/app.py")))
        );
        assert_eq!(
            ReplCommand::parse("/adjust skip the style checks"),
            Some(ReplCommand::Adjust("skip the style checks".to_string()))
        );
        assert_eq!(
            ReplCommand::parse("/mode interactive"),
            Some(ReplCommand::Mode(Some("interactive".to_string())))
        );
        assert_eq!(ReplCommand::parse("/mode"), Some(ReplCommand::Mode(None)));
    }

    #[test]
    fn test_missing_argument_is_unknown() {
        assert_eq!(
            ReplCommand::parse("/load"),
            Some(ReplCommand::Unknown("/load".to_string()))
        );
        assert_eq!(
            ReplCommand::parse("/adjust"),
            Some(ReplCommand::Unknown("/adjust".to_string()))
        );
    }

    #[test]
    fn test_aliases() {
        assert_eq!(ReplCommand::parse("/q"), Some(ReplCommand::Quit));
        assert_eq!(ReplCommand::parse("/next"), Some(ReplCommand::Run));
        assert_eq!(ReplCommand::parse("/?"), Some(ReplCommand::Help));
    }

    #[test]
    fn test_ends_paste() {
        assert!(ends_paste("/end"));
        assert!(ends_paste(" . "));
        assert!(!ends_paste("x = 1"));
    }
}
