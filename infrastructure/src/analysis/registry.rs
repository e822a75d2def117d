//! Concern → analysis tool lookup
//!
//! Every concern starts out backed by its built-in heuristic. A
//! `[tools.<concern>]` section in the configuration swaps in an external
//! checker command for that concern only.

use super::builtin::builtin_tool;
use super::command::CommandAnalysisTool;
use crate::config::{ConfigValidationError, FileToolCommandConfig};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::info;
use tutor_application::AnalysisTool;
use tutor_domain::agent::profile::Concern;

pub struct ToolRegistry {
    tools: HashMap<Concern, Arc<dyn AnalysisTool>>,
}

impl ToolRegistry {
    /// Registry with the built-in tool for every concern
    pub fn builtin() -> Self {
        let tools = Concern::ALL
            .into_iter()
            .map(|concern| (concern, builtin_tool(concern)))
            .collect();
        Self { tools }
    }

    /// Built-in tools with configured commands layered on top
    pub fn from_config(
        overrides: &BTreeMap<String, FileToolCommandConfig>,
    ) -> Result<Self, ConfigValidationError> {
        let mut registry = Self::builtin();
        for (key, config) in overrides {
            let concern: Concern = key
                .parse()
                .map_err(|_| ConfigValidationError::UnknownConcern(key.clone()))?;
            if config.command.trim().is_empty() {
                return Err(ConfigValidationError::EmptyToolCommand(key.clone()));
            }
            info!("Using external command {} for {}", config.command, concern);
            registry.register(concern, Arc::new(CommandAnalysisTool::from_config(config)));
        }
        Ok(registry)
    }

    /// Replace the tool for `concern`
    pub fn register(&mut self, concern: Concern, tool: Arc<dyn AnalysisTool>) {
        self.tools.insert(concern, tool);
    }

    pub fn get(&self, concern: Concern) -> Arc<dyn AnalysisTool> {
        match self.tools.get(&concern) {
            Some(tool) => Arc::clone(tool),
            None => builtin_tool(concern),
        }
    }

    /// (concern, tool name) pairs in roster order
    pub fn describe(&self) -> Vec<(Concern, String)> {
        Concern::ALL
            .into_iter()
            .map(|concern| (concern, self.get(concern).name().to_string()))
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
