//! Execution cursor

use serde::{Deserialize, Serialize};

/// Index of the next agent to run (or re-run) within the current plan.
///
/// Invariant: `0 <= position <= len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionCursor {
    position: usize,
    len: usize,
}

impl ExecutionCursor {
    /// Fresh cursor at 0 for a plan of `len` agents
    pub fn new(len: usize) -> Self {
        Self { position: 0, len }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_at_start(&self) -> bool {
        self.position == 0
    }

    /// Every agent from the cursor onward has passed
    pub fn is_finished(&self) -> bool {
        self.position >= self.len
    }

    pub fn remaining(&self) -> usize {
        self.len - self.position
    }

    /// Move past the agent at the current position (saturates at `len`)
    pub fn advance(&mut self) {
        if self.position < self.len {
            self.position += 1;
        }
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}
