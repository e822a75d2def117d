//! Efficiency review: loops, recursion and dead imports as separate sections

use super::Heuristic;
use crate::analysis::source::{Source, contains_word, defined_name};
use regex::Regex;
use std::sync::LazyLock;
use tutor_domain::agent::findings::{Finding, FindingSection, Findings};

static RANGE_LEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bfor\s+\w+\s+in\s+range\s*\(\s*len\s*\(").unwrap());

pub struct EfficiencyChecker;

impl Heuristic for EfficiencyChecker {
    fn name(&self) -> &str {
        "efficiency_analyzer"
    }

    fn description(&self) -> &str {
        "Looks for inefficient patterns in Python code. Returns three sections: nested_loops (nested iteration and index-based loops), recursion (functions that call themselves) and unused_imports."
    }

    fn check(&self, code: &str) -> Findings {
        let source = Source::parse(code);
        Findings::composite(vec![
            FindingSection::new("nested_loops", loop_issues(&source)),
            FindingSection::new("recursion", recursion_issues(&source)),
            FindingSection::new("unused_imports", unused_imports(&source)),
        ])
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// `def` or `class`: loops outside do not nest with loops inside
    Scope,
    Loop,
    Other,
}

fn loop_issues(source: &Source) -> Vec<Finding> {
    let mut items = Vec::new();
    let mut blocks: Vec<(usize, Frame)> = Vec::new();

    for (index, line) in source.lines.iter().enumerate() {
        if !line.is_statement() {
            continue;
        }
        while blocks.last().is_some_and(|&(indent, _)| indent >= line.indent) {
            blocks.pop();
        }
        let Some(keyword) = line.keyword() else {
            continue;
        };
        let text = source.logical_text(index);

        if RANGE_LEN.is_match(&text) {
            items.push(
                Finding::new("iterating over range(len(...)); iterate the sequence directly or use enumerate()")
                    .at_line(line.number),
            );
        }

        if !text.ends_with(':') {
            continue;
        }
        let frame = if keyword.ends_with("def") || keyword == "class" {
            Frame::Scope
        } else if keyword.ends_with("for") || keyword == "while" {
            Frame::Loop
        } else {
            Frame::Other
        };

        if frame == Frame::Loop {
            let depth = 1 + blocks
                .iter()
                .rev()
                .take_while(|&&(_, f)| f != Frame::Scope)
                .filter(|&&(_, f)| f == Frame::Loop)
                .count();
            if depth >= 2 {
                items.push(
                    Finding::new(format!(
                        "nested loop (depth {}) gives O(n^{}) behaviour; consider a set, dict or single pass",
                        depth, depth
                    ))
                    .at_line(line.number),
                );
            }
        }
        blocks.push((line.indent, frame));
    }

    items
}

fn recursion_issues(source: &Source) -> Vec<Finding> {
    let mut items = Vec::new();

    for (index, line) in source.lines.iter().enumerate() {
        if !line.keyword().is_some_and(|k| k.ends_with("def")) {
            continue;
        }
        let Some(name) = defined_name(line.stmt()) else {
            continue;
        };
        let end = source.block_end(index);
        let call = format!("{}(", name);
        let recursive = source.lines[index + 1..=end]
            .iter()
            .any(|l| l.stmt().match_indices(&call).any(|(at, _)| {
                !l.stmt()[..at]
                    .chars()
                    .next_back()
                    .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.')
            }));
        let memoized = index > 0
            && source.lines[..index]
                .iter()
                .rev()
                .take_while(|l| l.stmt().starts_with('@') || l.stmt().is_empty())
                .any(|l| l.stmt().contains("cache"));

        if recursive && !memoized {
            items.push(
                Finding::new(format!(
                    "function '{}' calls itself; deep inputs may be slow or exceed the recursion limit (consider iteration or functools.cache)",
                    name
                ))
                .at_line(line.number),
            );
        }
    }

    items
}

/// Names bound by an import statement
fn imported_names(stmt: &str) -> Vec<String> {
    let clause = if let Some(rest) = stmt.strip_prefix("import ") {
        rest
    } else if let Some(rest) = stmt.strip_prefix("from ") {
        match rest.split_once(" import ") {
            Some((_, names)) => names,
            None => return Vec::new(),
        }
    } else {
        return Vec::new();
    };

    clause
        .trim_matches(|c| c == '(' || c == ')' || c == ' ')
        .split(',')
        .filter_map(|part| {
            let part = part.trim().trim_end_matches(')').trim();
            if part.is_empty() || part == "*" {
                return None;
            }
            let bound = match part.split_once(" as ") {
                Some((_, alias)) => alias.trim(),
                // `import os.path` binds `os`
                None => part.split('.').next().unwrap_or(part),
            };
            Some(bound.to_string())
        })
        .collect()
}

fn unused_imports(source: &Source) -> Vec<Finding> {
    let mut items = Vec::new();

    for (index, line) in source.lines.iter().enumerate() {
        if !line.is_statement() {
            continue;
        }
        let text = source.logical_text(index);
        for name in imported_names(&text) {
            let used = source
                .lines
                .iter()
                .enumerate()
                .filter(|(i, l)| *i != index && !(l.continuation && *i > index && is_part_of(source, index, *i)))
                .any(|(_, l)| contains_word(&l.code, &name));
            if !used {
                items.push(
                    Finding::new(format!("'{}' imported but unused", name)).at_line(line.number),
                );
            }
        }
    }

    items
}

/// Is line `i` a continuation of the statement starting at `start`?
fn is_part_of(source: &Source, start: usize, i: usize) -> bool {
    source.lines[start + 1..=i].iter().all(|l| l.continuation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section<'a>(findings: &'a Findings, name: &str) -> &'a [Finding] {
        match findings {
            Findings::Composite { sections } => sections
                .iter()
                .find(|s| s.name == name)
                .map(|s| s.items.as_slice())
                .unwrap(),
            other => panic!("expected composite, got {:?}", other),
        }
    }

    #[test]
    fn test_clean_code_keeps_all_sections() {
        let findings = EfficiencyChecker.check("import os\n\nprint(os.getcwd())\n");
        assert!(findings.is_clean());
        assert!(findings.render().contains("[recursion]\n- nothing detected"));
    }

    #[test]
    fn test_nested_loops() {
        let code = "for a in xs:\n    for b in ys:\n        if a == b:\n            print(a)\n";
        let findings = EfficiencyChecker.check(code);
        let loops = section(&findings, "nested_loops");
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].line, Some(2));
        assert!(loops[0].message.contains("depth 2"));
    }

    #[test]
    fn test_sibling_loops_are_not_nested() {
        let code = "for a in xs:\n    pass\nfor b in ys:\n    pass\n";
        assert!(EfficiencyChecker.check(code).is_clean());
    }

    #[test]
    fn test_range_len() {
        let findings = EfficiencyChecker.check("for i in range(len(xs)):\n    print(xs[i])\n");
        assert!(section(&findings, "nested_loops")[0].message.contains("range(len"));
    }

    #[test]
    fn test_recursion_and_memoization() {
        let code = "def fib(n):\n    return n if n < 2 else fib(n - 1) + fib(n - 2)\n";
        let findings = EfficiencyChecker.check(code);
        assert_eq!(section(&findings, "recursion").len(), 1);

        let cached = format!("@functools.cache\n{}", code);
        assert!(EfficiencyChecker.check(&cached).is_clean());

        // A method calling a different object's method of the same name
        let method = "def run(self):\n    self.inner.run()\n";
        assert!(EfficiencyChecker.check(method).is_clean());
    }

    #[test]
    fn test_unused_imports() {
        let code = "import os, sys\nfrom typing import (List,\n    Dict)\nimport numpy as np\n\nx: List[int] = np.zeros(sys.maxsize)\n";
        let findings = EfficiencyChecker.check(code);
        let unused: Vec<_> = section(&findings, "unused_imports")
            .iter()
            .map(|f| f.message.clone())
            .collect();
        assert_eq!(
            unused,
            vec!["'os' imported but unused", "'Dict' imported but unused"]
        );
    }

    #[test]
    fn test_imported_names() {
        assert_eq!(imported_names("import os.path"), vec!["os"]);
        assert_eq!(imported_names("from a import b as c, d"), vec!["c", "d"]);
        assert!(imported_names("from a import *").is_empty());
    }
}
