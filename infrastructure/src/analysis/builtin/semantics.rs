//! Semantic sanity checks layered on the syntax scan

use super::Heuristic;
use super::syntax::syntax_errors;
use crate::analysis::source::{Source, defined_name};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tutor_domain::agent::findings::{Finding, Findings};

static MUTABLE_DEFAULT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"=\s*(\[\s*\]|\{\s*\}|list\(\s*\)|dict\(\s*\)|set\(\s*\))").unwrap()
});

static IS_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bis\s+(not\s+)?(-?\d|["'])"#).unwrap());

pub struct SemanticsChecker;

impl Heuristic for SemanticsChecker {
    fn name(&self) -> &str {
        "semantic_checker"
    }

    fn description(&self) -> &str {
        "Checks that Python code is meaningful beyond parsing: statements used outside their block, unreachable code, redefinitions, mutable default arguments and literal identity comparisons."
    }

    fn check(&self, code: &str) -> Findings {
        let source = Source::parse(code);

        let syntax = syntax_errors(&source);
        if let Some(first) = syntax.first() {
            return Findings::Issues {
                items: vec![Finding::new(format!(
                    "semantic analysis skipped because the code does not parse ({})",
                    first
                ))],
            };
        }

        Findings::from_items(semantic_issues(&source), "No semantic issues found.")
    }
}

#[derive(Debug)]
struct Block {
    indent: usize,
    keyword: &'static str,
}

fn semantic_issues(source: &Source) -> Vec<Finding> {
    let mut items = Vec::new();
    let mut blocks: Vec<Block> = Vec::new();
    // scope indent -> (name -> line)
    let mut definitions: HashMap<usize, HashMap<String, usize>> = HashMap::new();
    let mut terminated: Option<(usize, &'static str)> = None;
    let mut decorated = false;

    for (index, line) in source.lines.iter().enumerate() {
        if !line.is_statement() {
            continue;
        }
        let stmt = line.stmt();

        while blocks.last().is_some_and(|b| b.indent >= line.indent) {
            blocks.pop();
        }
        definitions.retain(|&indent, _| indent <= line.indent);

        if let Some((indent, keyword)) = terminated.take() {
            if line.indent == indent {
                items.push(
                    Finding::new(format!("unreachable code after '{}'", keyword))
                        .at_line(line.number),
                );
            }
        }

        let in_function = blocks.iter().any(|b| b.keyword.ends_with("def"));
        let in_loop = blocks
            .iter()
            .rev()
            .take_while(|b| !b.keyword.ends_with("def"))
            .any(|b| b.keyword.ends_with("for") || b.keyword == "while");

        let first_word = stmt.split_whitespace().next().unwrap_or("");
        match first_word {
            "return" | "yield" if !in_function => items.push(
                Finding::new(format!("'{}' outside function", first_word)).at_line(line.number),
            ),
            "break" | "continue" if !in_loop => {
                let message = if first_word == "break" {
                    "'break' outside loop"
                } else {
                    "'continue' not properly in loop"
                };
                items.push(Finding::new(message).at_line(line.number));
            }
            _ => {}
        }
        terminated = match first_word {
            "return" => Some((line.indent, "return")),
            "raise" => Some((line.indent, "raise")),
            "break" => Some((line.indent, "break")),
            "continue" => Some((line.indent, "continue")),
            _ => None,
        };

        if IS_LITERAL.is_match(stmt) {
            items.push(
                Finding::new("'is' used to compare with a literal; use '==' instead")
                    .at_line(line.number),
            );
        }

        if let Some(keyword) = line.keyword() {
            let text = source.logical_text(index);

            if keyword.ends_with("def") {
                if let Some(name) = defined_name(&text) {
                    if MUTABLE_DEFAULT.is_match(&text) {
                        items.push(
                            Finding::new(format!(
                                "mutable default argument in '{}' is shared between calls",
                                name
                            ))
                            .at_line(line.number),
                        );
                    }
                    if blocks.last().is_some_and(|b| b.keyword == "class")
                        && !decorated
                        && text.contains(&format!("{}()", name))
                    {
                        items.push(
                            Finding::new(format!(
                                "method '{}' takes no arguments; 'self' is missing",
                                name
                            ))
                            .at_line(line.number),
                        );
                    }
                }
            }

            if keyword.ends_with("def") || keyword == "class" {
                if let Some(name) = defined_name(&text) {
                    let scope = definitions.entry(line.indent).or_default();
                    if let Some(previous) = scope.insert(name.to_string(), line.number) {
                        if !decorated {
                            items.push(
                                Finding::new(format!(
                                    "redefinition of '{}' from line {}",
                                    name, previous
                                ))
                                .at_line(line.number),
                            );
                        }
                    }
                }
            }

            if text.ends_with(':') {
                blocks.push(Block {
                    indent: line.indent,
                    keyword,
                });
            }
        }

        decorated = stmt.starts_with('@');
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(code: &str) -> Vec<String> {
        SemanticsChecker
            .check(code)
            .items()
            .iter()
            .map(|f| f.to_string())
            .collect()
    }

    #[test]
    fn test_clean_code() {
        let findings = SemanticsChecker.check("def greet(name):\n    print(\"Hello\")\n");
        assert!(findings.is_clean());
        assert_eq!(findings.render(), "No semantic issues found.");
    }

    #[test]
    fn test_syntax_error_short_circuits() {
        let messages = messages("print(\"x\"\n");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("does not parse"));
        assert!(messages[0].contains("was never closed"));
    }

    #[test]
    fn test_return_and_break_outside_their_blocks() {
        assert_eq!(messages("return 1\n"), vec!["Line 1: 'return' outside function"]);
        assert_eq!(messages("x = 1\nbreak\n"), vec!["Line 2: 'break' outside loop"]);

        assert!(messages_clean(
            "def f(xs):\n    for x in xs:\n        if x:\n            break\n    return xs\n"
        ));
    }

    fn messages_clean(code: &str) -> bool {
        messages(code).is_empty()
    }

    #[test]
    fn test_break_inside_nested_function_is_not_in_loop() {
        let messages = messages("for x in y:\n    def g():\n        continue\n");
        assert_eq!(messages, vec!["Line 3: 'continue' not properly in loop"]);
    }

    #[test]
    fn test_unreachable_code() {
        let messages = messages("def f():\n    return 1\n    print('never')\n");
        assert_eq!(messages, vec!["Line 3: unreachable code after 'return'"]);
    }

    #[test]
    fn test_redefinition_and_mutable_default() {
        let messages = messages("def f(a=[]):\n    return a\n\ndef f():\n    return 2\n");
        assert!(messages[0].contains("mutable default argument in 'f'"));
        assert!(messages[1].contains("redefinition of 'f' from line 1"));
    }

    #[test]
    fn test_decorated_redefinition_is_allowed() {
        let code = "class A:\n    @property\n    def x(self):\n        return 1\n\n    @x.setter\n    def x(self, v):\n        pass\n";
        assert!(messages_clean(code));
    }

    #[test]
    fn test_method_without_self_and_literal_identity() {
        let messages = messages("class A:\n    def m():\n        pass\n\nif x is 1:\n    pass\n");
        assert!(messages[0].contains("'self' is missing"));
        assert!(messages[1].contains("'is' used to compare with a literal"));
    }
}
