//! Style checks in the spirit of pycodestyle

use super::Heuristic;
use crate::analysis::source::{Source, defined_name};
use tutor_domain::agent::findings::{Finding, Findings};

const MAX_LINE_LENGTH: usize = 79;
const MAX_BLANK_LINES: usize = 2;

pub struct StyleChecker;

impl Heuristic for StyleChecker {
    fn name(&self) -> &str {
        "style_checker"
    }

    fn description(&self) -> &str {
        "Checks Python code against PEP 8 layout rules: indentation, line length, whitespace, semicolons, blank lines and naming."
    }

    fn check(&self, code: &str) -> Findings {
        Findings::from_items(style_issues(&Source::parse(code)), "No style issues found.")
    }
}

fn issue(rule: &str, message: impl Into<String>, line: usize) -> Finding {
    Finding::new(format!("{} {}", rule, message.into()))
        .at_line(line)
        .with_rule(rule)
}

fn style_issues(source: &Source) -> Vec<Finding> {
    let mut items = Vec::new();
    let mut blank_run = 0;

    for line in &source.lines {
        let n = line.number;

        if line.is_blank() {
            blank_run += 1;
            if !line.raw.is_empty() {
                items.push(issue("W293", "whitespace on blank line", n));
            }
            continue;
        }
        if blank_run > MAX_BLANK_LINES {
            items.push(issue("E303", format!("too many blank lines ({})", blank_run), n));
        }
        blank_run = 0;

        if line.raw.trim_end().len() != line.raw.len() {
            items.push(issue("W291", "trailing whitespace", n));
        }

        let length = line.raw.chars().count();
        if length > MAX_LINE_LENGTH {
            items.push(issue(
                "E501",
                format!("line too long ({} > {} characters)", length, MAX_LINE_LENGTH),
                n,
            ));
        }

        if !line.is_statement() {
            continue;
        }

        if line.tab_indent {
            items.push(issue("W191", "indentation contains tabs", n));
        } else if line.indent % 4 != 0 {
            items.push(issue("E111", "indentation is not a multiple of four", n));
        }

        let stmt = line.stmt();
        if stmt.ends_with(';') {
            items.push(issue("E703", "statement ends with a semicolon", n));
        } else if stmt.contains(';') {
            items.push(issue("E702", "multiple statements on one line (semicolon)", n));
        }

        let chars: Vec<char> = stmt.chars().collect();
        if chars.windows(2).any(|w| {
            w[0] == ',' && !w[1].is_whitespace() && !matches!(w[1], ')' | ']' | '}')
        }) {
            items.push(issue("E231", "missing whitespace after ','", n));
        }

        if let Some(name) = defined_name(stmt) {
            if stmt.starts_with("class ") {
                if !name.chars().next().is_some_and(|c| c.is_uppercase()) || name.contains('_') {
                    items.push(issue(
                        "N801",
                        format!("class name '{}' should use CapWords convention", name),
                        n,
                    ));
                }
            } else if name.chars().any(|c| c.is_uppercase()) {
                items.push(issue(
                    "N802",
                    format!("function name '{}' should be lowercase", name),
                    n,
                ));
            }
        }
    }

    if blank_run > 0 && source.lines.last().is_some_and(|l| l.is_blank()) {
        let line = source.lines.len();
        items.push(issue("W391", "blank line at end of file", line));
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(code: &str) -> Vec<String> {
        StyleChecker
            .check(code)
            .items()
            .iter()
            .filter_map(|f| f.rule.clone())
            .collect()
    }

    #[test]
    fn test_clean_code() {
        let findings = StyleChecker.check("def greet(name):\n    print(\"Hello\", name)\n");
        assert!(findings.is_clean());
        assert_eq!(findings.render(), "No style issues found.");
    }

    #[test]
    fn test_whitespace_rules() {
        assert_eq!(rules("x = 1   \n"), vec!["W291"]);
        assert_eq!(rules("if x:\n\ty = 1\n"), vec!["W191"]);
        assert_eq!(rules("if x:\n   y = 1\n"), vec!["E111"]);
        assert_eq!(rules("f(a,b)\n"), vec!["E231"]);
        assert!(rules("f(a, (b,))\n").is_empty());
    }

    #[test]
    fn test_semicolons() {
        assert_eq!(rules("x = 1;\n"), vec!["E703"]);
        assert_eq!(rules("x = 1; y = 2\n"), vec!["E702"]);
        assert!(rules("s = \"a;b\"\n").is_empty());
    }

    #[test]
    fn test_line_length_and_blank_lines() {
        let long = format!("x = '{}'\n", "a".repeat(90));
        let findings = StyleChecker.check(&long);
        assert_eq!(
            findings.items()[0].to_string(),
            "Line 1: E501 line too long (96 > 79 characters)"
        );

        assert_eq!(rules("x = 1\n\n\n\ny = 2\n"), vec!["E303"]);
        assert_eq!(rules("x = 1\n\n"), vec!["W391"]);
    }

    #[test]
    fn test_naming() {
        assert_eq!(rules("def doThing():\n    pass\n"), vec!["N802"]);
        assert_eq!(rules("class my_thing:\n    pass\n"), vec!["N801"]);
        assert!(rules("class MyThing:\n    pass\n").is_empty());
    }
}
