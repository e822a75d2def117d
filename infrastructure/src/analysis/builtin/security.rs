//! Pattern-based security scan with bandit-style rule ids and severities

use super::Heuristic;
use crate::analysis::source::Source;
use regex::Regex;
use std::sync::LazyLock;
use tutor_domain::agent::findings::{Finding, Findings, Severity};

struct Rule {
    id: &'static str,
    pattern: Regex,
    message: &'static str,
    severity: Severity,
    /// Match against the raw line (string contents visible)
    raw: bool,
}

impl Rule {
    fn new(id: &'static str, pattern: &str, message: &'static str, severity: Severity) -> Self {
        Self {
            id,
            pattern: Regex::new(pattern).unwrap(),
            message,
            severity,
            raw: false,
        }
    }

    fn on_raw(mut self) -> Self {
        self.raw = true;
        self
    }
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new("B307", r"(^|[^.\w])eval\s*\(", "use of eval() can execute arbitrary code", Severity::High),
        Rule::new("B102", r"(^|[^.\w])exec\s*\(", "use of exec() can execute arbitrary code", Severity::High),
        Rule::new("B605", r"\bos\.(system|popen)\s*\(", "starting a process with a shell", Severity::High),
        Rule::new("B602", r"\bsubprocess\.\w+\(.*shell\s*=\s*True", "subprocess call with shell=True", Severity::High),
        Rule::new("B301", r"\b(c?pickle|marshal)\.loads?\s*\(", "deserializing untrusted data with pickle/marshal", Severity::Medium),
        Rule::new("B506", r"\byaml\.load\s*\(", "yaml.load without a safe loader", Severity::Medium),
        Rule::new("B324", r"\bhashlib\.(md5|sha1)\s*\(", "weak hash function (md5/sha1)", Severity::Medium),
        Rule::new("B608", r#"\.execute\s*\(\s*(f["']|["'].*["']\s*(%|\+)|.*\.format\s*\()"#, "SQL query built with string formatting", Severity::Medium).on_raw(),
        Rule::new("B501", r"\bverify\s*=\s*False", "TLS certificate verification disabled", Severity::High),
        Rule::new("B306", r"\btempfile\.mktemp\s*\(", "insecure temporary file (mktemp)", Severity::Medium),
        Rule::new("B401", r"^\s*(import|from)\s+(telnetlib|ftplib)\b", "insecure protocol module imported", Severity::High),
        Rule::new("B105", r#"(?i)\b\w*(password|passwd|pwd|secret|token|api_?key)\w*\s*=\s*["'][^"']+["']"#, "possible hard-coded secret", Severity::Low).on_raw(),
        Rule::new("B311", r"\brandom\.(random|randint|choice|randrange)\s*\(", "standard pseudo-random generator is not suitable for security purposes", Severity::Low),
        Rule::new("B101", r"^\s*assert\b", "assert is removed when compiling to optimised byte code", Severity::Low),
    ]
});

pub struct SecurityScanner;

impl Heuristic for SecurityScanner {
    fn name(&self) -> &str {
        "security_scanner"
    }

    fn description(&self) -> &str {
        "Scans Python code for security issues (code execution, shell injection, unsafe deserialization, weak hashing, hard-coded secrets) and tags each finding with a LOW, MEDIUM or HIGH severity."
    }

    fn check(&self, code: &str) -> Findings {
        let source = Source::parse(code);
        let mut items = Vec::new();

        for (index, line) in source.lines.iter().enumerate() {
            if !line.is_statement() {
                continue;
            }
            let masked = source.logical_text(index);
            for rule in RULES.iter() {
                let subject = if rule.raw { line.raw.as_str() } else { masked.as_str() };
                if rule.id == "B506" && masked.contains("SafeLoader") {
                    continue;
                }
                if rule.pattern.is_match(subject) {
                    items.push(
                        Finding::new(format!("{} {}", rule.id, rule.message))
                            .at_line(line.number)
                            .with_severity(rule.severity)
                            .with_rule(rule.id),
                    );
                }
            }
        }

        Findings::from_items(items, "No security issues found.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(code: &str) -> Vec<(String, Severity)> {
        SecurityScanner
            .check(code)
            .items()
            .iter()
            .map(|f| (f.rule.clone().unwrap(), f.severity.unwrap()))
            .collect()
    }

    #[test]
    fn test_clean_code() {
        let findings = SecurityScanner.check("def add(a, b):\n    return a + b\n");
        assert!(findings.is_clean());
        assert_eq!(findings.render(), "No security issues found.");
    }

    #[test]
    fn test_code_execution() {
        assert_eq!(rules("x = eval(data)\n"), vec![("B307".into(), Severity::High)]);
        assert_eq!(rules("exec(code)\n"), vec![("B102".into(), Severity::High)]);
        // Method calls and strings are not the builtin
        assert!(rules("model.eval()\nprint('eval(x)')\n").is_empty());
    }

    #[test]
    fn test_shell_and_deserialization() {
        assert_eq!(rules("os.system(cmd)\n")[0].0, "B605");
        assert_eq!(
            rules("subprocess.run(cmd, shell=True)\n"),
            vec![("B602".into(), Severity::High)]
        );
        assert_eq!(
            rules("obj = pickle.loads(blob)\n"),
            vec![("B301".into(), Severity::Medium)]
        );
        assert_eq!(rules("cfg = yaml.load(fh)\n")[0].0, "B506");
        assert!(rules("cfg = yaml.load(fh, Loader=yaml.SafeLoader)\n").is_empty());
    }

    #[test]
    fn test_hardcoded_secret_is_low() {
        assert_eq!(
            rules("API_KEY = \"sk-123\"\n"),
            vec![("B105".into(), Severity::Low)]
        );
        assert!(rules("password = os.environ[\"PW\"]\n").is_empty());
    }

    #[test]
    fn test_sql_formatting() {
        assert_eq!(
            rules("cur.execute(f\"SELECT * FROM t WHERE id = {uid}\")\n")[0].0,
            "B608"
        );
        assert!(rules("cur.execute(\"SELECT * FROM t WHERE id = ?\", (uid,))\n").is_empty());
    }

    #[test]
    fn test_severity_rendered() {
        let findings = SecurityScanner.check("assert x\n");
        assert_eq!(
            findings.render(),
            "- Line 1: B101 assert is removed when compiling to optimised byte code [severity: LOW]"
        );
    }
}
