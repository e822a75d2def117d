//! REPL configuration from TOML (`[repl]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// History file; a leading `~/` is the home directory
    pub history_file: Option<String>,
    /// Entries kept in the history file
    pub history_size: usize,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            history_file: None,
            history_size: 1000,
        }
    }
}

impl FileReplConfig {
    /// Configured history location with `~/` expanded
    pub fn history_path(&self) -> Option<PathBuf> {
        let raw = self.history_file.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.strip_prefix("~/") {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
            None => Some(PathBuf::from(raw)),
        }
    }
}
