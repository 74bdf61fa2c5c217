//! NOLOCK rewriting of a single SQL document

use super::edit::{apply_edits, EditSet};
use super::hint::{plan_reference, scan_table_source, TableSource};
use super::mask::{keyword_at, skip_whitespace, MaskedView};
use super::segment::{segment_statements, StatementRange};

/// Result of rewriting one SQL document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlRewrite {
    /// The rewritten SQL (identical to the input when nothing changed)
    pub text: String,
    /// Number of `SELECT` statements with at least one modified reference
    pub statements_changed: usize,
    /// Number of table references that were modified
    pub tables_changed: usize,
}

impl SqlRewrite {
    pub fn is_changed(&self) -> bool {
        self.tables_changed > 0
    }
}

/// Find the next `FROM` or `JOIN` keyword in `from..limit`.
fn next_table_keyword(mask: &[u8], from: usize, limit: usize) -> Option<(usize, usize)> {
    (from..limit).find_map(|i| match mask[i] {
        b'f' | b'F' if i + 4 <= limit && keyword_at(mask, i, "from") => Some((i, i + 4)),
        b'j' | b'J' if i + 4 <= limit && keyword_at(mask, i, "join") => Some((i, i + 4)),
        _ => None,
    })
}

/// Offset of the innermost `(` enclosing `pos` within the statement.
fn enclosing_paren(mask: &[u8], stmt_start: usize, pos: usize) -> Option<usize> {
    let mut depth = 0usize;
    for i in (stmt_start..pos).rev() {
        match mask[i] {
            b')' => depth += 1,
            b'(' if depth == 0 => return Some(i),
            b'(' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Whether the `(` at `open` starts a parenthesized join: it follows a
/// query's `FROM`/`JOIN`, or another such group.
fn opens_join_group(mask: &[u8], stmt_start: usize, open: usize) -> bool {
    let Some(prev) = (stmt_start..open)
        .rev()
        .find(|&i| !mask[i].is_ascii_whitespace())
    else {
        return false;
    };
    if mask[prev] == b'(' {
        return opens_join_group(mask, stmt_start, prev);
    }
    prev >= stmt_start + 3
        && (keyword_at(mask, prev - 3, "from") || keyword_at(mask, prev - 3, "join"))
        && in_query_context(mask, stmt_start, prev - 3)
}

/// Whether the keyword at `pos` belongs to a query rather than to a function
/// call such as `TRIM(' ' FROM col)`.
///
/// The innermost parenthesis enclosing `pos` must open a subquery or a
/// parenthesized join; a keyword at the top level of the statement always
/// qualifies.
fn in_query_context(mask: &[u8], stmt_start: usize, pos: usize) -> bool {
    match enclosing_paren(mask, stmt_start, pos) {
        None => true,
        Some(open) => {
            let first = skip_whitespace(mask, open + 1, pos);
            keyword_at(mask, first, "select") || opens_join_group(mask, stmt_start, open)
        }
    }
}

/// Collect edits for the comma-separated table sources starting at `pos`.
///
/// Returns the number of references that gained edits.
fn collect_source_list(
    sql: &str,
    mask: &[u8],
    pos: usize,
    limit: usize,
    edits: &mut EditSet,
) -> usize {
    let doc = sql.as_bytes();
    let mut changed = 0;
    let mut source_pos = pos;

    loop {
        let end = match scan_table_source(doc, mask, source_pos, limit) {
            TableSource::Table(table) => {
                let planned = plan_reference(sql, mask, &table);
                if edits.push_reference(table.path_start, planned) {
                    changed += 1;
                }
                table.end()
            }
            // Later joins inside the group are reached by the keyword scan
            TableSource::Group { open, close } => {
                changed += collect_source_list(sql, mask, open + 1, close, edits);
                close + 1
            }
            TableSource::Skipped { end } => end,
            TableSource::Missing => break,
        };
        let after = skip_whitespace(mask, end, limit);
        if after < limit && mask[after] == b',' {
            source_pos = after + 1;
        } else {
            break;
        }
    }

    changed
}

/// Collect edits for every table source in one `SELECT` statement.
fn collect_statement_edits(
    sql: &str,
    mask: &[u8],
    range: &StatementRange,
    edits: &mut EditSet,
) -> usize {
    let mut changed = 0;
    let mut next_scan = range.start;

    while let Some((kw_start, kw_end)) = next_table_keyword(mask, next_scan, range.end) {
        next_scan = kw_end;
        if in_query_context(mask, range.start, kw_start) {
            changed += collect_source_list(sql, mask, kw_end, range.end, edits);
        }
    }

    changed
}

/// Ensure every table reference in every top-level `SELECT` carries NOLOCK.
///
/// Total over all input: text without a `SELECT` statement comes back
/// unchanged with zero counts.
pub fn rewrite_sql(sql: &str) -> SqlRewrite {
    let mask = MaskedView::new(sql);
    let mut edits = EditSet::new();
    let mut statements_changed = 0;

    for range in segment_statements(mask.as_bytes())
        .iter()
        .filter(|range| range.is_select)
    {
        if collect_statement_edits(sql, mask.as_bytes(), range, &mut edits) > 0 {
            statements_changed += 1;
        }
    }

    if edits.is_empty() {
        return SqlRewrite {
            text: sql.to_string(),
            statements_changed: 0,
            tables_changed: 0,
        };
    }

    SqlRewrite {
        text: apply_edits(sql, &edits),
        statements_changed,
        tables_changed: edits.reference_count(),
    }
}
