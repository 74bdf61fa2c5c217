//! Top-level statement segmentation over a masked document

use super::mask::{keyword_at, skip_whitespace};

/// Keywords that start a data-modification statement.
///
/// A `SELECT` range ends at one of these when it appears outside parentheses,
/// so a following `DELETE`/`UPDATE` without a `;` separator is never edited.
const DML_KEYWORDS: &[&str] = &["delete", "update", "insert", "merge"];

/// One top-level statement, as a `start..end` byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementRange {
    pub start: usize,
    pub end: usize,
    /// Whether the statement begins with `SELECT`
    pub is_select: bool,
}

impl StatementRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Whether a DML keyword starts at `pos` (`MERGE JOIN` is a join hint, not a statement).
fn dml_keyword_at(mask: &[u8], pos: usize) -> bool {
    DML_KEYWORDS.iter().any(|kw| {
        keyword_at(mask, pos, kw)
            && !(*kw == "merge" && {
                let next = skip_whitespace(mask, pos + kw.len(), mask.len());
                keyword_at(mask, next, "join")
            })
    })
}

/// End of the `SELECT` statement starting at `start`: the next `;`, a DML
/// keyword outside parentheses, or the end of the text.
fn select_end(mask: &[u8], start: usize) -> usize {
    let mut depth = 0usize;
    let mut i = start + "select".len();
    while i < mask.len() {
        match mask[i] {
            b';' => return i,
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b if depth == 0 && b.is_ascii_alphabetic() && dml_keyword_at(mask, i) => return i,
            _ => {}
        }
        i += 1;
    }
    mask.len()
}

/// Record a non-select statement unless it is blank.
fn push_other(ranges: &mut Vec<StatementRange>, mask: &[u8], start: usize, end: usize) {
    if mask[start..end].iter().any(|b| !b.is_ascii_whitespace()) {
        ranges.push(StatementRange {
            start,
            end,
            is_select: false,
        });
    }
}

/// Split a masked document into statements.
///
/// A `SELECT` keyword opens a select range only when nothing but whitespace
/// separates it from the previous `;` (or the start of the text). Nested
/// selects belong to the enclosing range and are not re-segmented.
pub fn segment_statements(mask: &[u8]) -> Vec<StatementRange> {
    let mut ranges = Vec::new();
    let mut stmt_start = 0;
    let mut i = 0;

    while i < mask.len() {
        match mask[i] {
            b';' => {
                push_other(&mut ranges, mask, stmt_start, i);
                stmt_start = i + 1;
                i += 1;
            }
            b's' | b'S'
                if keyword_at(mask, i, "select")
                    && mask[stmt_start..i].iter().all(u8::is_ascii_whitespace) =>
            {
                let end = select_end(mask, i);
                ranges.push(StatementRange {
                    start: i,
                    end,
                    is_select: true,
                });
                stmt_start = end;
                i = end;
            }
            _ => i += 1,
        }
    }
    push_other(&mut ranges, mask, stmt_start, mask.len());

    ranges
}
