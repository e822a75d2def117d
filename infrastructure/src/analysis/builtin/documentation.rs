//! Docstring and comment coverage

use super::Heuristic;
use crate::analysis::source::{Source, defined_name};
use tutor_domain::agent::findings::{Finding, Findings};

/// Statements before an uncommented snippet is worth flagging
const COMMENT_THRESHOLD: usize = 10;

pub struct DocumentationChecker;

impl Heuristic for DocumentationChecker {
    fn name(&self) -> &str {
        "documentation_checker"
    }

    fn description(&self) -> &str {
        "Checks Python code for missing docstrings on functions and classes, missing comments in longer code, and leftover TODO/FIXME markers."
    }

    fn check(&self, code: &str) -> Findings {
        Findings::from_items(
            documentation_issues(&Source::parse(code)),
            "No documentation issues found.",
        )
    }
}

fn is_docstring(stmt: &str) -> bool {
    let stmt = stmt.trim_start_matches(['r', 'R', 'u', 'U']);
    stmt.starts_with('"') || stmt.starts_with('\'')
}

fn documentation_issues(source: &Source) -> Vec<Finding> {
    let mut items = Vec::new();

    for (index, line) in source.lines.iter().enumerate() {
        let Some(keyword) = line.keyword() else {
            continue;
        };
        let kind = if keyword.ends_with("def") {
            "function"
        } else if keyword == "class" {
            "class"
        } else {
            continue;
        };
        let Some(name) = defined_name(line.stmt()) else {
            continue;
        };
        if name.starts_with("__") && name.ends_with("__") && name != "__init__" {
            continue;
        }
        let documented = source
            .first_body_line(index)
            .is_some_and(|body| is_docstring(body.stmt()));
        if !documented {
            items.push(
                Finding::new(format!("{} '{}' has no docstring", kind, name)).at_line(line.number),
            );
        }
    }

    for line in &source.lines {
        if let Some(comment) = &line.comment {
            let upper = comment.to_uppercase();
            if upper.starts_with("TODO") || upper.starts_with("FIXME") || upper.starts_with("XXX") {
                items.push(
                    Finding::new(format!("unresolved marker comment: {}", comment))
                        .at_line(line.number),
                );
            }
        }
    }

    let statements = source.statements().count();
    if statements >= COMMENT_THRESHOLD && !source.has_comments() {
        items.push(Finding::new(format!(
            "no comments in {} statements of code",
            statements
        )));
    }

    items.sort_by_key(|f| f.line.unwrap_or(usize::MAX));
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(code: &str) -> Vec<String> {
        DocumentationChecker
            .check(code)
            .items()
            .iter()
            .map(|f| f.to_string())
            .collect()
    }

    #[test]
    fn test_documented_code_is_clean() {
        let code = "class Greeter:\n    \"\"\"Says hello.\"\"\"\n\n    def greet(self, name):\n        '''Greet someone.'''\n        print(name)\n";
        let findings = DocumentationChecker.check(code);
        assert!(findings.is_clean());
        assert_eq!(findings.render(), "No documentation issues found.");
    }

    #[test]
    fn test_missing_docstrings() {
        let messages = messages("def greet(name):\n    print(name)\n\nclass A:\n    pass\n");
        assert_eq!(
            messages,
            vec![
                "Line 1: function 'greet' has no docstring",
                "Line 4: class 'A' has no docstring"
            ]
        );
    }

    #[test]
    fn test_multiline_docstring_and_dunder() {
        let code = "def f():\n    \"\"\"\n    Long doc.\n    \"\"\"\n    return 1\n\ndef __repr__(self):\n    return 'x'\n";
        assert!(messages(code).is_empty());
    }

    #[test]
    fn test_todo_marker() {
        let messages = messages("x = 1  # TODO: handle negatives\n");
        assert_eq!(messages, vec!["Line 1: unresolved marker comment: TODO: handle negatives"]);
    }

    #[test]
    fn test_uncommented_code() {
        let code: String = (0..12).map(|i| format!("x{} = {}\n", i, i)).collect();
        assert_eq!(messages(&code), vec!["no comments in 12 statements of code"]);

        let commented = format!("# setup\n{}", code);
        assert!(messages(&commented).is_empty());
    }
}
