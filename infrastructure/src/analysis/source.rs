//! Line scanner for Python-like source
//!
//! One pass over the code that masks string contents, strips comments and
//! tracks bracket nesting, so the heuristics never trip over a `(` inside a
//! string literal or a `#` inside a comment.

/// One physical line of source
#[derive(Debug, Clone)]
pub struct SourceLine {
    /// 1-based line number
    pub number: usize,
    pub raw: String,
    /// Code with string contents blanked and the comment removed
    pub code: String,
    pub comment: Option<String>,
    /// Leading whitespace width (a tab counts as one column)
    pub indent: usize,
    /// Leading whitespace contains a tab
    pub tab_indent: bool,
    /// Line starts inside brackets, a multi-line string or after a `\`
    pub continuation: bool,
}

impl SourceLine {
    /// Masked code without surrounding whitespace
    pub fn stmt(&self) -> &str {
        self.code.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }

    /// Starts a new statement (not blank, not a comment-only line, not a
    /// continuation of the previous one)
    pub fn is_statement(&self) -> bool {
        !self.continuation && !self.stmt().is_empty()
    }

    /// Block header such as `def f():`, `if x:` or `else:`
    pub fn is_block_header(&self) -> bool {
        self.is_statement() && self.stmt().ends_with(':') && header_keyword(self.stmt()).is_some()
    }

    /// First word of the statement if it is a block keyword
    pub fn keyword(&self) -> Option<&'static str> {
        if self.is_statement() {
            header_keyword(self.stmt())
        } else {
            None
        }
    }
}

const BLOCK_KEYWORDS: &[&str] = &[
    "async def", "async for", "async with", "def", "class", "if", "elif", "else", "for",
    "while", "try", "except", "finally", "with", "match", "case",
];

fn header_keyword(stmt: &str) -> Option<&'static str> {
    BLOCK_KEYWORDS.iter().copied().find(|kw| {
        stmt.strip_prefix(kw).is_some_and(|rest| {
            rest.is_empty() || rest.starts_with([' ', ':', '(', '\t'])
        })
    })
}

/// A bracket problem found while scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketIssue {
    /// Opener at `line` never closed
    Unclosed { open: char, line: usize },
    /// Closer at `line` with nothing open
    Stray { close: char, line: usize },
    /// Closer at `line` does not match the opener from `open_line`
    Mismatched {
        open: char,
        open_line: usize,
        close: char,
        line: usize,
    },
}

/// Result of scanning a whole snippet
#[derive(Debug, Clone, Default)]
pub struct Source {
    pub lines: Vec<SourceLine>,
    pub brackets: Vec<BracketIssue>,
    /// Line where an unterminated string literal starts
    pub unterminated_strings: Vec<usize>,
}

impl Source {
    pub fn parse(code: &str) -> Self {
        Scanner::default().scan(code)
    }

    /// Lines that start statements
    pub fn statements(&self) -> impl Iterator<Item = &SourceLine> {
        self.lines.iter().filter(|l| l.is_statement())
    }

    /// Statement starting at `index` joined with its continuation lines
    pub fn logical_text(&self, index: usize) -> String {
        let mut text = self.lines[index].stmt().to_string();
        for line in self.lines[index + 1..].iter().take_while(|l| l.continuation) {
            let part = line.stmt();
            if !part.is_empty() {
                text.push(' ');
                text.push_str(part);
            }
        }
        text
    }

    pub fn has_comments(&self) -> bool {
        self.lines.iter().any(|l| l.comment.is_some())
    }

    /// Index (into `lines`) of the last line of the block opened at `header`
    pub fn block_end(&self, header: usize) -> usize {
        let indent = self.lines[header].indent;
        let mut end = header;
        for (i, line) in self.lines.iter().enumerate().skip(header + 1) {
            if line.is_blank() || line.continuation || line.stmt().is_empty() {
                continue;
            }
            if line.indent <= indent {
                break;
            }
            end = i;
        }
        // Trailing continuation lines belong to the block's last statement
        while end + 1 < self.lines.len() && self.lines[end + 1].continuation {
            end += 1;
        }
        end
    }

    /// First statement line inside the block opened at `header`
    pub fn first_body_line(&self, header: usize) -> Option<&SourceLine> {
        let indent = self.lines[header].indent;
        self.lines
            .iter()
            .skip(header + 1)
            .find(|l| l.is_statement())
            .filter(|l| l.indent > indent)
    }
}

#[derive(Default)]
struct Scanner {
    stack: Vec<(char, usize)>,
    /// (quote, triple, start line)
    string: Option<(char, bool, usize)>,
    backslash: bool,
    out: Source,
}

impl Scanner {
    fn scan(mut self, code: &str) -> Source {
        for (index, raw) in code.lines().enumerate() {
            let number = index + 1;
            let continuation = !self.stack.is_empty() || self.string.is_some() || self.backslash;
            let (code, comment) = self.mask_line(raw, number);

            self.backslash = code.trim_end().ends_with('\\');

            let leading: String = raw.chars().take_while(|c| c.is_whitespace()).collect();
            self.out.lines.push(SourceLine {
                number,
                raw: raw.to_string(),
                code,
                comment,
                indent: leading.chars().count(),
                tab_indent: leading.contains('\t'),
                continuation,
            });
        }

        if let Some((_, _, line)) = self.string.take() {
            self.out.unterminated_strings.push(line);
        }
        for (open, line) in self.stack.drain(..) {
            self.out.brackets.push(BracketIssue::Unclosed { open, line });
        }
        self.out
    }

    fn mask_line(&mut self, raw: &str, number: usize) -> (String, Option<String>) {
        let chars: Vec<char> = raw.chars().collect();
        let mut code = String::with_capacity(raw.len());
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if let Some((quote, triple, _)) = self.string {
                if c == '\\' {
                    code.push(' ');
                    if i + 1 < chars.len() {
                        code.push(' ');
                    }
                    i += 2;
                    continue;
                }
                if c == quote {
                    if !triple {
                        code.push(quote);
                        self.string = None;
                        i += 1;
                        continue;
                    }
                    if chars.get(i + 1) == Some(&quote) && chars.get(i + 2) == Some(&quote) {
                        code.extend([quote; 3]);
                        self.string = None;
                        i += 3;
                        continue;
                    }
                }
                code.push(' ');
                i += 1;
                continue;
            }

            match c {
                '#' => {
                    let comment: String = chars[i + 1..].iter().collect();
                    return (code, Some(comment.trim().to_string()));
                }
                '"' | '\'' => {
                    let triple = chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c);
                    if triple {
                        code.extend([c; 3]);
                        i += 3;
                    } else {
                        code.push(c);
                        i += 1;
                    }
                    self.string = Some((c, triple, number));
                    continue;
                }
                '(' | '[' | '{' => self.stack.push((c, number)),
                ')' | ']' | '}' => {
                    let expected = match c {
                        ')' => '(',
                        ']' => '[',
                        _ => '{',
                    };
                    match self.stack.pop() {
                        Some((open, _)) if open == expected => {}
                        Some((open, open_line)) => {
                            self.out.brackets.push(BracketIssue::Mismatched {
                                open,
                                open_line,
                                close: c,
                                line: number,
                            });
                        }
                        None => self.out.brackets.push(BracketIssue::Stray {
                            close: c,
                            line: number,
                        }),
                    }
                }
                _ => {}
            }
            code.push(c);
            i += 1;
        }

        // A single-quoted string cannot span lines without a backslash
        if let Some((_, false, start)) = self.string {
            if !raw.trim_end().ends_with('\\') {
                self.out.unterminated_strings.push(start);
                self.string = None;
            }
        }

        (code, None)
    }
}

/// Names defined by a `def`/`class` statement
pub fn defined_name(stmt: &str) -> Option<&str> {
    let rest = stmt
        .strip_prefix("async def ")
        .or_else(|| stmt.strip_prefix("def "))
        .or_else(|| stmt.strip_prefix("class "))?;
    let end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let name = &rest[..end];
    (!name.is_empty()).then_some(name)
}

/// Does `text` contain `word` as a whole identifier?
pub fn contains_word(text: &str, word: &str) -> bool {
    text.match_indices(word).any(|(at, _)| {
        let before = text[..at].chars().next_back();
        let after = text[at + word.len()..].chars().next();
        !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char)
    })
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
