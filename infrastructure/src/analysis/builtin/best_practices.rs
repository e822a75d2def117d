//! General Python idioms: naming, literals, comparisons, imports

use super::Heuristic;
use crate::analysis::source::Source;
use regex::Regex;
use std::sync::LazyLock;
use tutor_domain::agent::findings::{Finding, Findings};

static SHORT_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z])\s*(=[^=]|\+=|-=|\*=|/=)").unwrap());

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^\w.])(\d+(?:\.\d+)?)\b").unwrap());

static CONSTANT_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*\s*(:[^=]*)?=").unwrap());

static NONE_COMPARISON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(==|!=)\s*None\b").unwrap());

static BOOL_COMPARISON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(==|!=)\s*(True|False)\b").unwrap());

static TYPE_COMPARISON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\btype\s*\([^)]*\)\s*(==|!=|is)").unwrap());

static OPEN_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^.\w])open\s*\(").unwrap());

const ALLOWED_SHORT_NAMES: &[&str] = &["_", "i", "j", "k"];
const ALLOWED_NUMBERS: &[&str] = &["0", "1", "2", "0.0", "1.0"];

pub struct BestPracticesChecker;

impl Heuristic for BestPracticesChecker {
    fn name(&self) -> &str {
        "best_practices_checker"
    }

    fn description(&self) -> &str {
        "Checks Python code for common bad practices: non-descriptive short names, magic numbers, comparisons to None/True/False, type comparisons, wildcard imports, global statements and files opened without a context manager."
    }

    fn check(&self, code: &str) -> Findings {
        Findings::from_items(
            best_practice_issues(&Source::parse(code)),
            "No best practice issues found.",
        )
    }
}

fn best_practice_issues(source: &Source) -> Vec<Finding> {
    let mut items = Vec::new();

    for (index, line) in source.lines.iter().enumerate() {
        if !line.is_statement() {
            continue;
        }
        let stmt = line.stmt();
        let text = source.logical_text(index);
        let n = line.number;

        if let Some(captures) = SHORT_ASSIGNMENT.captures(stmt) {
            let name = &captures[1];
            if !ALLOWED_SHORT_NAMES.contains(&name) {
                items.push(
                    Finding::new(format!(
                        "variable name '{}' is too short to be descriptive",
                        name
                    ))
                    .at_line(n),
                );
            }
        }

        if !CONSTANT_ASSIGNMENT.is_match(stmt) {
            let magic: Vec<&str> = NUMBER
                .captures_iter(&text)
                .filter_map(|c| c.get(2).map(|m| m.as_str()))
                .filter(|number| !ALLOWED_NUMBERS.contains(number))
                .collect();
            if !magic.is_empty() {
                items.push(
                    Finding::new(format!(
                        "magic number {}; give it a named constant",
                        magic.join(", ")
                    ))
                    .at_line(n),
                );
            }
        }

        if NONE_COMPARISON.is_match(&text) {
            items.push(
                Finding::new("comparison to None should use 'is' or 'is not'").at_line(n),
            );
        }
        if BOOL_COMPARISON.is_match(&text) {
            items.push(
                Finding::new("comparison to True/False; use the truth value directly")
                    .at_line(n),
            );
        }
        if TYPE_COMPARISON.is_match(&text) {
            items.push(Finding::new("use isinstance() instead of comparing types").at_line(n));
        }
        if stmt.starts_with("from ") && stmt.ends_with("import *") {
            items.push(
                Finding::new("wildcard import makes it unclear which names are in scope")
                    .at_line(n),
            );
        }
        if stmt.starts_with("global ") {
            items.push(
                Finding::new("'global' statement couples functions through shared state")
                    .at_line(n),
            );
        }
        let in_with = stmt.starts_with("with ") || stmt.starts_with("async with ");
        if OPEN_CALL.is_match(&text) && !in_with {
            items.push(
                Finding::new("open() outside a 'with' block may leak the file handle").at_line(n),
            );
        }
    }

    items
}
