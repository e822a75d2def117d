//! The code currently under review

use serde::{Deserialize, Serialize};
use std::fmt;

/// The single "current code under review".
///
/// A snapshot is never patched: a correction from the human replaces it
/// wholesale via [`CodeSnapshot::replace_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnapshot(String);

impl CodeSnapshot {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the snapshot holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.0.lines().count()
    }

    /// Replace the snapshot with a submitted correction.
    ///
    /// Blank submissions and submissions identical to the current code leave
    /// the snapshot untouched. Returns whether the code actually changed.
    pub fn replace_with(&mut self, submitted: &str) -> bool {
        if submitted.trim().is_empty() || submitted == self.0 {
            return false;
        }
        self.0 = submitted.to_string();
        true
    }
}

impl From<&str> for CodeSnapshot {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CodeSnapshot {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for CodeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_with_new_code() {
        let mut code = CodeSnapshot::new("print(1");
        assert!(code.replace_with("print(1)"));
        assert_eq!(code.as_str(), "print(1)");
    }

    #[test]
    fn test_blank_submission_keeps_previous_code() {
        let mut code = CodeSnapshot::new("x = 1");
        assert!(!code.replace_with("   \n  "));
        assert_eq!(code.as_str(), "x = 1");
    }

    #[test]
    fn test_unchanged_submission_is_noop() {
        let mut code = CodeSnapshot::new("x = 1");
        assert!(!code.replace_with("x = 1"));
    }

    #[test]
    fn test_blank_and_line_count() {
        assert!(CodeSnapshot::default().is_blank());
        assert_eq!(CodeSnapshot::new("a\nb\nc").line_count(), 3);
    }
}
