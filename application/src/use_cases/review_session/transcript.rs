//! Session transcript
//!
//! Append-only log of everything the session showed the human, cleared
//! when a plan changes or a run starts from the first agent.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tutor_domain::AgentName;

/// What produced a transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryKind {
    /// Progress messages ("Running agent: X", "Next agent: Y")
    System,
    AgentStart { agent: AgentName },
    AgentReport { agent: AgentName, is_valid: bool },
    /// Messages that need the human's attention
    Notice,
    Plan,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: EntryKind,
    pub text: String,
}

impl TranscriptEntry {
    pub fn new(kind: EntryKind, text: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push(&mut self, kind: EntryKind, text: impl Into<String>) {
        self.entries.push(TranscriptEntry::new(kind, text));
    }

    pub fn system(&mut self, text: impl Into<String>) {
        self.push(EntryKind::System, text);
    }

    pub fn notice(&mut self, text: impl Into<String>) {
        self.push(EntryKind::Notice, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(EntryKind::Warning, text);
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.text.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_timestamped_in_order() {
        let mut transcript = Transcript::default();
        transcript.system("first");
        transcript.system("second");
        let entries = transcript.entries();
        assert!(entries[0].timestamp <= entries[1].timestamp);
        assert_eq!(transcript.len(), 2);
        transcript.clear();
        assert!(transcript.is_empty());
    }
}
