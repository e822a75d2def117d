//! Exception handling review

use super::Heuristic;
use crate::analysis::source::Source;
use tutor_domain::agent::findings::{Finding, Findings};

pub struct ErrorHandlingChecker;

impl Heuristic for ErrorHandlingChecker {
    fn name(&self) -> &str {
        "error_handling_checker"
    }

    fn description(&self) -> &str {
        "Checks exception handling in Python code: bare or overly broad except clauses, silently swallowed exceptions, bare raise outside a handler, try blocks without handlers and generic exceptions being raised."
    }

    fn check(&self, code: &str) -> Findings {
        Findings::from_items(
            error_handling_issues(&Source::parse(code)),
            "No error handling issues found.",
        )
    }
}

fn error_handling_issues(source: &Source) -> Vec<Finding> {
    let mut items = Vec::new();
    // (indent, keyword) of enclosing blocks
    let mut blocks: Vec<(usize, &'static str)> = Vec::new();

    for (index, line) in source.lines.iter().enumerate() {
        if !line.is_statement() {
            continue;
        }
        while blocks.last().is_some_and(|&(indent, _)| indent >= line.indent) {
            blocks.pop();
        }
        let stmt = line.stmt();
        let n = line.number;

        if stmt == "raise" && !blocks.iter().any(|&(_, k)| k == "except") {
            items.push(
                Finding::new("bare 'raise' outside an except block has no active exception to re-raise")
                    .at_line(n),
            );
        }
        if stmt.starts_with("raise Exception(") || stmt == "raise Exception" {
            items.push(
                Finding::new("raising the generic Exception; raise a specific exception type")
                    .at_line(n),
            );
        }

        let Some(keyword) = line.keyword() else {
            continue;
        };

        match keyword {
            "except" => {
                let clause = stmt
                    .trim_start_matches("except")
                    .split(':')
                    .next()
                    .unwrap_or("")
                    .trim();
                if clause.is_empty() {
                    items.push(
                        Finding::new("bare 'except:' also catches SystemExit and KeyboardInterrupt")
                            .at_line(n),
                    );
                } else if matches!(
                    clause.split_whitespace().next(),
                    Some("Exception") | Some("BaseException")
                ) {
                    items.push(
                        Finding::new(format!(
                            "catching too general exception '{}'",
                            clause.split_whitespace().next().unwrap_or(clause)
                        ))
                        .at_line(n),
                    );
                }

                let end = source.block_end(index);
                let body: Vec<_> = source.lines[index + 1..=end]
                    .iter()
                    .filter(|l| l.is_statement())
                    .collect();
                let inline = stmt.split_once(':').map(|(_, rest)| rest.trim()).unwrap_or("");
                let swallowed = if body.is_empty() {
                    matches!(inline, "pass" | "...")
                } else {
                    body.iter().all(|l| matches!(l.stmt(), "pass" | "..."))
                };
                if swallowed {
                    items.push(
                        Finding::new("exception silently ignored (handler only contains 'pass')")
                            .at_line(n),
                    );
                }
            }
            "try" => {
                let end = source.block_end(index);
                let handled = source.lines[end + 1..]
                    .iter()
                    .find(|l| l.is_statement())
                    .is_some_and(|next| {
                        next.indent == line.indent
                            && matches!(next.keyword(), Some("except") | Some("finally"))
                    });
                if !handled {
                    items.push(
                        Finding::new("'try' without an 'except' or 'finally' clause").at_line(n),
                    );
                }
            }
            _ => {}
        }

        if source.logical_text(index).ends_with(':') {
            blocks.push((line.indent, keyword));
        }
    }

    items
}
