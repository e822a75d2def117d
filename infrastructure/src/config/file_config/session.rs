//! Session configuration from TOML (`[session]` section)

use serde::{Deserialize, Serialize};
use tutor_application::BehaviorConfig;
use tutor_domain::ExecutionMode;

/// Raw session configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// `free_run` keeps going after each passing agent, `interactive` pauses
    pub mode: ExecutionMode,
}

impl FileSessionConfig {
    pub fn to_behavior_config(&self) -> BehaviorConfig {
        BehaviorConfig::with_execution_mode(self.mode)
    }
}
