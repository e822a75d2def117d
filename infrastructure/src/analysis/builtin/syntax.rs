//! Syntax scan: brackets, strings, block headers and indentation

use super::Heuristic;
use crate::analysis::source::{BracketIssue, Source};
use tutor_domain::agent::findings::{Finding, Findings};

/// Keywords that always open a block and therefore need a trailing `:`
const HARD_HEADERS: &[&str] = &[
    "async def", "async for", "async with", "def", "class", "if", "elif", "else", "for",
    "while", "try", "except", "finally", "with",
];

pub struct SyntaxChecker;

impl Heuristic for SyntaxChecker {
    fn name(&self) -> &str {
        "syntax_checker"
    }

    fn description(&self) -> &str {
        "Scans Python code for syntax errors (unbalanced brackets, unterminated strings, missing colons, indentation errors) and reports them with line numbers."
    }

    fn check(&self, code: &str) -> Findings {
        Findings::from_items(syntax_errors(&Source::parse(code)), "No syntax issues found.")
    }
}

/// Syntax problems in line order
pub(crate) fn syntax_errors(source: &Source) -> Vec<Finding> {
    let mut items = Vec::new();

    for &line in &source.unterminated_strings {
        items.push(Finding::new("unterminated string literal").at_line(line));
    }

    for issue in &source.brackets {
        items.push(match *issue {
            BracketIssue::Unclosed { open, line } => {
                Finding::new(format!("'{}' was never closed", open)).at_line(line)
            }
            BracketIssue::Stray { close, line } => {
                Finding::new(format!("unmatched '{}'", close)).at_line(line)
            }
            BracketIssue::Mismatched {
                open,
                open_line,
                close,
                line,
            } => Finding::new(format!(
                "closing parenthesis '{}' does not match opening parenthesis '{}' on line {}",
                close, open, open_line
            ))
            .at_line(line),
        });
    }

    for line in &source.lines {
        let leading: String = line.raw.chars().take_while(|c| c.is_whitespace()).collect();
        if line.is_statement() && leading.contains('\t') && leading.contains(' ') {
            items.push(
                Finding::new("inconsistent use of tabs and spaces in indentation")
                    .at_line(line.number),
            );
        }
    }

    indentation_errors(source, &mut items);

    items.sort_by_key(|f| f.line);
    items
}

fn hard_header(stmt: &str) -> Option<&'static str> {
    HARD_HEADERS.iter().copied().find(|kw| {
        stmt.strip_prefix(kw)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', ':', '(', '\t']))
    })
}

fn indentation_errors(source: &Source, items: &mut Vec<Finding>) {
    let mut levels = vec![0usize];
    let mut pending: Option<(usize, &'static str)> = None;

    for (index, line) in source.lines.iter().enumerate() {
        if !line.is_statement() {
            continue;
        }
        let top = levels.last().copied().unwrap_or(0);

        if let Some((header_line, keyword)) = pending.take() {
            if line.indent > top {
                levels.push(line.indent);
            } else {
                items.push(
                    Finding::new(format!(
                        "expected an indented block after '{}' statement on line {}",
                        keyword, header_line
                    ))
                    .at_line(line.number),
                );
            }
        } else if line.indent > top {
            items.push(Finding::new("unexpected indent").at_line(line.number));
            levels.push(line.indent);
        }

        if line.indent < levels.last().copied().unwrap_or(0) {
            while levels.last().is_some_and(|&l| l > line.indent) {
                levels.pop();
            }
            if levels.last().copied().unwrap_or(0) != line.indent {
                items.push(
                    Finding::new("unindent does not match any outer indentation level")
                        .at_line(line.number),
                );
                levels.push(line.indent);
            }
        }

        let text = source.logical_text(index);
        if let Some(keyword) = hard_header(&text) {
            if !text.contains(':') {
                items.push(Finding::new("expected ':'").at_line(line.number));
            } else if text.ends_with(':') {
                pending = Some((line.number, keyword));
            }
        }
    }

    if let Some((header_line, keyword)) = pending {
        items.push(
            Finding::new(format!(
                "expected an indented block after '{}' statement on line {}",
                keyword, header_line
            ))
            .at_line(header_line),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(code: &str) -> Findings {
        SyntaxChecker.check(code)
    }

    #[test]
    fn test_clean_code() {
        let findings = check("def greet(name):\n    print(\"Hello\", name)\n\ngreet('x')\n");
        assert!(findings.is_clean());
        assert_eq!(findings.render(), "No syntax issues found.");
    }

    #[test]
    fn test_missing_paren_reported_once_at_opening_line() {
        let findings = check("def greet(name):\n    print(\"Hello\"\n");
        let items = findings.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].line, Some(2));
        assert_eq!(items[0].message, "'(' was never closed");
    }

    #[test]
    fn test_missing_colon() {
        let findings = check("if x > 1\n    y = 2\n");
        let messages: Vec<_> = findings.items().iter().map(|f| f.to_string()).collect();
        assert!(messages.contains(&"Line 1: expected ':'".to_string()));
    }

    #[test]
    fn test_one_line_compound_statement_is_fine() {
        assert!(check("if x: y = 1\nelse: y = 2\n").is_clean());
    }

    #[test]
    fn test_multiline_header() {
        assert!(check("def f(\n    a,\n    b,\n):\n    return a\n").is_clean());
    }

    #[test]
    fn test_expected_indented_block() {
        let findings = check("def f():\nreturn 1\n");
        let items = findings.items();
        assert_eq!(items[0].line, Some(2));
        assert!(items[0].message.contains("expected an indented block after 'def'"));

        let findings = check("for x in y:\n");
        assert_eq!(findings.items()[0].line, Some(1));
    }

    #[test]
    fn test_unexpected_indent_and_bad_dedent() {
        let findings = check("x = 1\n    y = 2\n");
        assert_eq!(findings.items()[0].message, "unexpected indent");

        let findings = check("if x:\n        a = 1\n    b = 2\n");
        assert_eq!(
            findings.items()[0].message,
            "unindent does not match any outer indentation level"
        );
    }

    #[test]
    fn test_unterminated_string_and_mismatch() {
        let findings = check("x = 'abc\n");
        assert_eq!(findings.items()[0].message, "unterminated string literal");

        let findings = check("x = [1, 2)\n");
        assert!(findings.items()[0].message.contains("does not match"));
    }

    #[test]
    fn test_comments_and_strings_do_not_confuse_the_scan() {
        let code = "# if broken\ns = \"def (\"\nt = '''\nif\n'''\n";
        assert!(check(code).is_clean());
    }
}
