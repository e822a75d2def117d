//! Next-action classification for free-text user input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user wants to do next with the current plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NextAction {
    Run,
    Adjust,
    Exit,
    /// The oracle answered something other than one of the three words
    Unknown,
}

impl NextAction {
    /// Parse the oracle's single-word answer. Anything else is `Unknown`.
    pub fn parse_answer(answer: &str) -> Self {
        let word = answer
            .trim()
            .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '*' | '.'))
            .to_lowercase();
        match word.as_str() {
            "run" => NextAction::Run,
            "adjust" => NextAction::Adjust,
            "exit" => NextAction::Exit,
            _ => NextAction::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NextAction::Run => "run",
            NextAction::Adjust => "adjust",
            NextAction::Exit => "exit",
            NextAction::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
