//! Structural metrics: function size, parameters, complexity, nesting, imports

use super::Heuristic;
use crate::analysis::source::{Source, contains_word, defined_name};
use tutor_domain::agent::findings::{Finding, Findings, Severity};

const MAX_FUNCTION_LINES: usize = 50;
const MAX_PARAMETERS: usize = 5;
const MAX_COMPLEXITY: usize = 10;
const MAX_NESTING: usize = 4;
const MAX_IMPORTS: usize = 15;

const BRANCH_WORDS: &[&str] = &["if", "elif", "for", "while", "except", "and", "or"];

pub struct StructureChecker;

impl Heuristic for StructureChecker {
    fn name(&self) -> &str {
        "structure_analyzer"
    }

    fn description(&self) -> &str {
        "Measures the structure of Python code: function length, parameter count, cyclomatic complexity, nesting depth and import count."
    }

    fn check(&self, code: &str) -> Findings {
        Findings::from_items(
            structure_issues(&Source::parse(code)),
            "No structural issues found.",
        )
    }
}

fn structure_issues(source: &Source) -> Vec<Finding> {
    let mut items = Vec::new();

    for (index, line) in source.lines.iter().enumerate() {
        if !line.keyword().is_some_and(|k| k.ends_with("def")) {
            continue;
        }
        let text = source.logical_text(index);
        let Some(name) = defined_name(&text) else {
            continue;
        };
        let end = source.block_end(index);

        let length = end - index + 1;
        if length > MAX_FUNCTION_LINES {
            items.push(
                Finding::new(format!(
                    "function '{}' is too long ({} lines > {})",
                    name, length, MAX_FUNCTION_LINES
                ))
                .at_line(line.number)
                .with_severity(Severity::Medium),
            );
        }

        let parameters = parameter_count(&text);
        if parameters > MAX_PARAMETERS {
            items.push(
                Finding::new(format!(
                    "function '{}' has too many parameters ({} > {})",
                    name, parameters, MAX_PARAMETERS
                ))
                .at_line(line.number)
                .with_severity(Severity::Low),
            );
        }

        let complexity = 1 + source.lines[index + 1..=end]
            .iter()
            .map(|l| BRANCH_WORDS.iter().filter(|w| contains_word(l.stmt(), w)).count())
            .sum::<usize>();
        if complexity > MAX_COMPLEXITY {
            let severity = if complexity > 20 {
                Severity::High
            } else {
                Severity::Medium
            };
            items.push(
                Finding::new(format!(
                    "function '{}' has cyclomatic complexity {} (> {})",
                    name, complexity, MAX_COMPLEXITY
                ))
                .at_line(line.number)
                .with_severity(severity),
            );
        }
    }

    nesting_issues(source, &mut items);

    let imports: Vec<_> = source
        .statements()
        .filter(|l| l.stmt().starts_with("import ") || l.stmt().starts_with("from "))
        .collect();
    if imports.len() > MAX_IMPORTS {
        items.push(
            Finding::new(format!(
                "module has too many import statements ({} > {})",
                imports.len(),
                MAX_IMPORTS
            ))
            .at_line(imports[MAX_IMPORTS].number)
            .with_severity(Severity::Low),
        );
    }

    items.sort_by_key(|f| f.line);
    items
}

/// Parameters in a `def` header, excluding `self`, `cls` and bare markers
fn parameter_count(header: &str) -> usize {
    let Some(open) = header.find('(') else {
        return 0;
    };
    let mut depth = 0usize;
    let mut current = String::new();
    let mut params = Vec::new();
    for c in header[open + 1..].chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' if depth == 0 => break,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                params.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    params.push(current);

    params
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty() && !matches!(*p, "self" | "cls" | "*" | "/"))
        .count()
}

fn nesting_issues(source: &Source, items: &mut Vec<Finding>) {
    // (indent, counts toward nesting)
    let mut blocks: Vec<(usize, bool)> = Vec::new();
    let mut reported_until: Option<usize> = None;

    for (index, line) in source.lines.iter().enumerate() {
        if !line.is_statement() {
            continue;
        }
        while blocks.last().is_some_and(|&(indent, _)| indent >= line.indent) {
            blocks.pop();
        }
        if reported_until.is_some_and(|base| line.indent <= base) {
            reported_until = None;
        }

        let Some(keyword) = line.keyword() else {
            continue;
        };
        if !source.logical_text(index).ends_with(':') {
            continue;
        }
        let counts = !(keyword.ends_with("def") || keyword == "class");
        blocks.push((line.indent, counts));

        let depth = blocks
            .iter()
            .rev()
            .take_while(|&&(_, counts)| counts)
            .count();
        if depth > MAX_NESTING && reported_until.is_none() {
            items.push(
                Finding::new(format!(
                    "nesting depth {} exceeds {}",
                    depth, MAX_NESTING
                ))
                .at_line(line.number)
                .with_severity(Severity::Medium),
            );
            reported_until = Some(line.indent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_code() {
        let findings = StructureChecker.check("def greet(name):\n    print(\"Hello\")\n");
        assert!(findings.is_clean());
        assert_eq!(findings.render(), "No structural issues found.");
    }

    #[test]
    fn test_parameter_count() {
        assert_eq!(parameter_count("def f(self, a, b=(1, 2), *args, **kw):"), 4);
        assert_eq!(parameter_count("def f():"), 0);

        let findings = StructureChecker.check("def f(a, b, c, d, e, g):\n    pass\n");
        assert!(findings.items()[0].message.contains("too many parameters (6 > 5)"));
    }

    #[test]
    fn test_long_function() {
        let mut code = String::from("def big():\n");
        for i in 0..55 {
            code.push_str(&format!("    x{} = {}\n", i, i));
        }
        let findings = StructureChecker.check(&code);
        assert!(findings.items()[0].message.contains("'big' is too long (56 lines > 50)"));
    }

    #[test]
    fn test_deep_nesting_reported_once() {
        let code = "\
def f(x):
    if x:
        for a in x:
            while a:
                if a > 1:
                    with open(a) as fh:
                        if fh:
                            pass
";
        let findings = StructureChecker.check(code);
        let nesting: Vec<_> = findings
            .items()
            .into_iter()
            .filter(|f| f.message.starts_with("nesting depth"))
            .collect();
        assert_eq!(nesting.len(), 1);
        assert_eq!(nesting[0].line, Some(6));
        assert_eq!(nesting[0].message, "nesting depth 5 exceeds 4");
    }

    #[test]
    fn test_complexity() {
        let mut code = String::from("def branchy(x):\n");
        for i in 0..11 {
            code.push_str(&format!("    if x == {}:\n        return {}\n", i, i));
        }
        let findings = StructureChecker.check(&code);
        let item = findings.items()[0].clone();
        assert!(item.message.contains("cyclomatic complexity 12"));
        assert_eq!(item.severity, Some(Severity::Medium));
    }

    #[test]
    fn test_too_many_imports() {
        let code: String = (0..16).map(|i| format!("import mod{}\n", i)).collect();
        let findings = StructureChecker.check(&code);
        assert_eq!(findings.items()[0].line, Some(16));
    }
}
