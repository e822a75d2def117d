//! In-memory oracle and tool doubles shared by the use-case tests

use crate::ports::analysis_tool::{AnalysisTool, ToolError};
use crate::ports::text_oracle::{OracleError, TextOracle};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tutor_domain::{Finding, Findings};

/// Oracle that answers from a queue and records every prompt
pub(crate) struct ScriptedOracle {
    responses: Mutex<VecDeque<Result<String, OracleError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub(crate) fn new(responses: Vec<&str>) -> Self {
        Self::with_results(responses.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    pub(crate) fn with_results(responses: Vec<Result<String, OracleError>>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(responses)),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn push(&self, response: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.to_string()));
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl TextOracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(OracleError::Other("No more responses".to_string())))
    }
}

/// Tool that flags one finding per line containing `needle`
pub(crate) struct NeedleTool {
    needle: &'static str,
    message: &'static str,
}

impl NeedleTool {
    pub(crate) fn new(needle: &'static str, message: &'static str) -> Self {
        Self { needle, message }
    }
}

#[async_trait]
impl AnalysisTool for NeedleTool {
    fn name(&self) -> &str {
        "needle"
    }

    fn description(&self) -> &str {
        "Flags lines containing a marker"
    }

    async fn analyze(&self, code: &str) -> Result<Findings, ToolError> {
        let items = code
            .lines()
            .enumerate()
            .filter(|(_, line)| line.contains(self.needle))
            .map(|(i, _)| Finding::new(self.message).at_line(i + 1))
            .collect();
        Ok(Findings::from_items(items, "No issues found."))
    }
}

/// Tool that always fails
pub(crate) struct BrokenTool;

#[async_trait]
impl AnalysisTool for BrokenTool {
    fn name(&self) -> &str {
        "broken"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    async fn analyze(&self, _code: &str) -> Result<Findings, ToolError> {
        Err(ToolError::ExecutionFailed("checker crashed".to_string()))
    }
}

/// Tool that panics mid-analysis
pub(crate) struct PanickingTool;

#[async_trait]
impl AnalysisTool for PanickingTool {
    fn name(&self) -> &str {
        "panicking"
    }

    fn description(&self) -> &str {
        "Panics"
    }

    async fn analyze(&self, _code: &str) -> Result<Findings, ToolError> {
        panic!("index out of bounds")
    }
}
