//! Table alias recognition

use super::mask::{keyword_at, skip_whitespace};
use super::object_path::scan_identifier;

/// Words that end a table source instead of naming it.
///
/// Only consulted for bare identifiers with no preceding `AS`.
const RESERVED_AFTER_TABLE: &[&str] = &[
    "join",
    "inner",
    "left",
    "right",
    "full",
    "cross",
    "on",
    "where",
    "group",
    "order",
    "having",
    "union",
    "intersect",
    "except",
    "option",
    "for",
    "outer",
    "apply",
    "pivot",
    "unpivot",
    "with",
    "tablesample",
    // Statement starters, for batches that omit the `;` separator
    "select",
    "insert",
    "update",
    "delete",
    "merge",
    "set",
    "declare",
    "exec",
    "execute",
    "if",
    "else",
    "begin",
    "end",
    "return",
    "go",
];

/// An alias following a table reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alias {
    /// Start of the alias identifier (after any `AS`)
    pub start: usize,
    /// End of the alias identifier
    pub end: usize,
}

/// Returns true if `word` is reserved after a table reference.
pub fn is_reserved_after_table(word: &str) -> bool {
    RESERVED_AFTER_TABLE
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(word))
}

/// Parse an optional alias (`AS name`, `name`, `[name]`, `"name"`) at `pos`.
pub fn parse_alias(doc: &[u8], mask: &[u8], pos: usize, limit: usize) -> Option<Alias> {
    let mut i = skip_whitespace(mask, pos, limit);

    let has_as = i + 2 <= limit && keyword_at(mask, i, "as");
    if has_as {
        i = skip_whitespace(mask, i + 2, limit);
    }

    let (end, delimited) = scan_identifier(doc, i, limit)?;

    if !has_as && !delimited {
        let word = std::str::from_utf8(&doc[i..end]).ok()?;
        if is_reserved_after_table(word) {
            return None;
        }
    }

    Some(Alias { start: i, end })
}
