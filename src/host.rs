//! Embedded string-literal walker
//!
//! Finds string literals in host source code (VB.NET by default), unescapes
//! them, runs the SQL engine over the ones that mention `SELECT`, and splices
//! the rewritten SQL back with the host's escaping. Everything outside the
//! rewritten literals is copied through untouched.

use crate::engine::rewrite_sql;
use crate::util::contains_word_ci;

/// String-literal syntax of the host language
///
/// Literals are delimited by `delimiter` on both sides; a doubled delimiter
/// inside a literal stands for one literal delimiter character. Outside a
/// literal, `line_comment` starts a comment running to the end of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostSyntax {
    pub delimiter: char,
    pub line_comment: Option<char>,
}

impl HostSyntax {
    /// VB.NET / VBScript: `"He said ""hi"""` and `' comment`
    pub const VISUAL_BASIC: HostSyntax = HostSyntax {
        delimiter: '"',
        line_comment: Some('\''),
    };

    /// Literals delimited by `delimiter`, with no line comments.
    pub fn with_delimiter(delimiter: char) -> Self {
        HostSyntax {
            delimiter,
            line_comment: None,
        }
    }

    fn is_comment_start(&self, c: char) -> bool {
        c != self.delimiter && self.line_comment == Some(c)
    }

    fn doubled(&self) -> String {
        let mut doubled = String::with_capacity(self.delimiter.len_utf8() * 2);
        doubled.push(self.delimiter);
        doubled.push(self.delimiter);
        doubled
    }

    fn unescape(&self, inner: &str) -> String {
        inner.replace(&self.doubled(), self.delimiter.encode_utf8(&mut [0; 4]))
    }

    fn escape(&self, sql: &str) -> String {
        sql.replace(self.delimiter, &self.doubled())
    }

    /// Offset of the delimiter that closes a literal whose content starts at `from`.
    fn find_closing(&self, text: &str, from: usize) -> Option<usize> {
        let width = self.delimiter.len_utf8();
        let mut i = from;
        while let Some(rel) = text[i..].find(self.delimiter) {
            let at = i + rel;
            if text[at + width..].starts_with(self.delimiter) {
                i = at + 2 * width;
                continue;
            }
            return Some(at);
        }
        None
    }
}

impl Default for HostSyntax {
    fn default() -> Self {
        Self::VISUAL_BASIC
    }
}

/// Result of rewriting one host source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRewrite {
    pub text: String,
    pub statements_changed: usize,
    pub tables_changed: usize,
    /// Number of string literals whose content was rewritten
    pub literals_changed: usize,
}

impl HostRewrite {
    pub fn is_changed(&self) -> bool {
        self.literals_changed > 0
    }
}

/// Rewrite the SQL embedded in the string literals of `text`.
///
/// Line comments are skipped, so a stray delimiter inside one cannot shift
/// literal boundaries. An unterminated literal at the end of the input is
/// passed through as-is.
pub fn rewrite_host_text(text: &str, syntax: &HostSyntax) -> HostRewrite {
    let width = syntax.delimiter.len_utf8();
    let mut out = String::with_capacity(text.len());
    let mut copied_to = 0;
    let mut pos = 0;
    let mut result = HostRewrite {
        text: String::new(),
        statements_changed: 0,
        tables_changed: 0,
        literals_changed: 0,
    };

    while let Some(rel) = text[pos..].find(|c| c == syntax.delimiter || syntax.is_comment_start(c)) {
        let open = pos + rel;
        if !text[open..].starts_with(syntax.delimiter) {
            pos = text[open..].find('\n').map_or(text.len(), |n| open + n);
            continue;
        }
        let content_start = open + width;
        let Some(close) = syntax.find_closing(text, content_start) else {
            break;
        };
        pos = close + width;

        let inner = &text[content_start..close];
        let sql = syntax.unescape(inner);
        if !contains_word_ci(sql.as_bytes(), b"select") {
            continue;
        }

        let rewrite = rewrite_sql(&sql);
        if !rewrite.is_changed() || rewrite.text == sql {
            continue;
        }

        out.push_str(&text[copied_to..content_start]);
        out.push_str(&syntax.escape(&rewrite.text));
        copied_to = close;

        result.statements_changed += rewrite.statements_changed;
        result.tables_changed += rewrite.tables_changed;
        result.literals_changed += 1;
    }

    out.push_str(&text[copied_to..]);
    result.text = out;
    result
}
