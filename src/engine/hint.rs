//! Table-hint clause location and NOLOCK merging
//!
//! A table reference is parsed into a [`TableRef`] (object path, optional
//! alias, optional `WITH (...)` clause) and then planned into edits:
//!
//! 1. A hint clause between the table name and its alias is moved after the
//!    alias, gaining NOLOCK on the way.
//! 2. A hint clause after the alias (or after a bare table name) stays put and
//!    gains NOLOCK if it lacks it.
//! 3. Otherwise a new ` WITH (NOLOCK)` clause is inserted after the alias, or
//!    after the table name when there is no alias.

use super::alias::{parse_alias, Alias};
use super::edit::Edit;
use super::mask::{find_matching_paren, keyword_at, skip_whitespace};
use super::object_path::{parse_object_path, scan_identifier, PathScan};
use crate::util::contains_word_ci;

/// Hint inserted when a table reference has no hint clause
pub const NOLOCK_CLAUSE: &str = " WITH (NOLOCK)";

/// Hint name looked for (case-insensitively) inside existing clauses
pub const NOLOCK: &str = "NOLOCK";

/// A `WITH ( ... )` table-hint clause, or the legacy `alias (...)` form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintClause {
    /// Offset of the `WITH` keyword (of the `(` for the legacy form)
    pub with_start: usize,
    /// Offset of the opening parenthesis
    pub open: usize,
    /// Offset of the closing parenthesis
    pub close: usize,
}

impl HintClause {
    /// Offset just past the closing parenthesis
    pub fn end(&self) -> usize {
        self.close + 1
    }

    /// Whether the clause already names NOLOCK (comments and literals ignored).
    pub fn has_nolock(&self, mask: &[u8]) -> bool {
        contains_word_ci(&mask[self.open + 1..self.close], NOLOCK.as_bytes())
    }

    /// Text to insert before the closing parenthesis so the clause names NOLOCK.
    fn nolock_addition(&self, mask: &[u8]) -> &'static str {
        let inner = &mask[self.open + 1..self.close];
        if inner.iter().all(u8::is_ascii_whitespace) {
            "NOLOCK"
        } else {
            ", NOLOCK"
        }
    }
}

/// Where an existing hint clause sits relative to the alias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintPlacement {
    /// `table WITH (...) alias`
    BeforeAlias(HintClause),
    /// `table alias WITH (...)` or `table WITH (...)`
    AfterAlias(HintClause),
}

/// A table reference in a `FROM`/`JOIN` position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRef {
    pub path_start: usize,
    pub path_end: usize,
    pub alias: Option<Alias>,
    pub hint: Option<HintPlacement>,
}

impl TableRef {
    /// Canonical hint position: after the alias, else after the table name.
    pub fn anchor(&self) -> usize {
        self.alias.map_or(self.path_end, |alias| alias.end)
    }

    /// Offset just past the last token belonging to this reference
    pub fn end(&self) -> usize {
        match self.hint {
            Some(HintPlacement::AfterAlias(clause)) => clause.end(),
            _ => self.anchor(),
        }
    }
}

/// What was found in a table-source position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
    /// A table that may need a hint
    Table(TableRef),
    /// A derived table, table-valued function or table variable, ending at `end`
    Skipped { end: usize },
    /// A parenthesized join such as `(a JOIN b ON ...)`; its sources lie in `open + 1..close`
    Group { open: usize, close: usize },
    /// Nothing recognizable
    Missing,
}

/// Locate a `WITH ( ... )` clause starting at `pos` (after whitespace).
///
/// `WITH` without a following parenthesis, or with an unclosed one, is not a
/// hint clause.
pub fn locate_hint(mask: &[u8], pos: usize, limit: usize) -> Option<HintClause> {
    let with_start = skip_whitespace(mask, pos, limit);
    if with_start + 4 > limit || !keyword_at(mask, with_start, "with") {
        return None;
    }
    let open = skip_whitespace(mask, with_start + 4, limit);
    if open >= limit || mask[open] != b'(' {
        return None;
    }
    let close = find_matching_paren(mask, open, limit)?;
    Some(HintClause {
        with_start,
        open,
        close,
    })
}

/// Locate a legacy hint list written without `WITH`, as in `Orders o (NOLOCK)`.
///
/// Only meaningful after an alias: a bare `name (...)` is a function call.
pub fn locate_legacy_hint(mask: &[u8], pos: usize, limit: usize) -> Option<HintClause> {
    let open = skip_whitespace(mask, pos, limit);
    if open >= limit || mask[open] != b'(' {
        return None;
    }
    let close = find_matching_paren(mask, open, limit)?;
    Some(HintClause {
        with_start: open,
        open,
        close,
    })
}

/// Offset past an optional alias at `pos`, or `pos` itself.
fn skip_alias(doc: &[u8], mask: &[u8], pos: usize, limit: usize) -> usize {
    parse_alias(doc, mask, pos, limit).map_or(pos, |alias| alias.end)
}

/// Whether the group at `open` holds a query, possibly behind more parentheses.
fn opens_subquery(mask: &[u8], open: usize, close: usize) -> bool {
    let first = (open..close)
        .find(|&i| mask[i] != b'(' && !mask[i].is_ascii_whitespace())
        .unwrap_or(close);
    keyword_at(mask, first, "select")
}

/// Parse the table source that starts at `pos` (just after `FROM`, `JOIN` or `,`).
pub fn scan_table_source(doc: &[u8], mask: &[u8], pos: usize, limit: usize) -> TableSource {
    let start = skip_whitespace(mask, pos, limit);
    if start >= limit {
        return TableSource::Missing;
    }

    if mask[start] == b'(' {
        return match find_matching_paren(mask, start, limit) {
            Some(close) if opens_subquery(mask, start, close) => TableSource::Skipped {
                end: skip_alias(doc, mask, close + 1, limit),
            },
            Some(close) => TableSource::Group { open: start, close },
            None => TableSource::Missing,
        };
    }

    let (path_start, path_end) = match parse_object_path(doc, mask, start, limit) {
        PathScan::Path { start, end } => (start, end),
        PathScan::Variable => {
            let end = scan_identifier(doc, start + 1, limit).map_or(start + 1, |(end, _)| end);
            return TableSource::Skipped {
                end: skip_alias(doc, mask, end, limit),
            };
        }
        PathScan::Missing => return TableSource::Missing,
    };

    let after_path = skip_whitespace(mask, path_end, limit);
    if after_path < limit && mask[after_path] == b'(' {
        // Table-valued function
        return match find_matching_paren(mask, after_path, limit) {
            Some(close) => TableSource::Skipped {
                end: skip_alias(doc, mask, close + 1, limit),
            },
            None => TableSource::Missing,
        };
    }

    let (alias, hint) = match locate_hint(mask, path_end, limit) {
        Some(clause) => match parse_alias(doc, mask, clause.end(), limit) {
            Some(alias) => (Some(alias), Some(HintPlacement::BeforeAlias(clause))),
            None => (None, Some(HintPlacement::AfterAlias(clause))),
        },
        None => {
            let alias = parse_alias(doc, mask, path_end, limit);
            let hint = match alias {
                Some(alias) => locate_hint(mask, alias.end, limit)
                    .or_else(|| locate_legacy_hint(mask, alias.end, limit)),
                None => locate_hint(mask, path_end, limit),
            };
            (alias, hint.map(HintPlacement::AfterAlias))
        }
    };

    TableSource::Table(TableRef {
        path_start,
        path_end,
        alias,
        hint,
    })
}

/// Compute the edits that guarantee NOLOCK for `table`.
///
/// Returns an empty list when the reference already carries NOLOCK.
pub fn plan_reference(doc: &str, mask: &[u8], table: &TableRef) -> Vec<Edit> {
    match table.hint {
        None => vec![Edit::Insert {
            offset: table.anchor(),
            text: NOLOCK_CLAUSE.to_string(),
        }],
        Some(HintPlacement::AfterAlias(clause)) => {
            if clause.has_nolock(mask) {
                return Vec::new();
            }
            vec![Edit::Insert {
                offset: clause.close,
                text: clause.nolock_addition(mask).to_string(),
            }]
        }
        Some(HintPlacement::BeforeAlias(clause)) => {
            if clause.has_nolock(mask) {
                return Vec::new();
            }
            // Take the whitespace in front of WITH along with the clause
            let bytes = doc.as_bytes();
            let mut leading = clause.with_start;
            while leading > table.path_end && bytes[leading - 1].is_ascii_whitespace() {
                leading -= 1;
            }

            let mut relocated = String::with_capacity(clause.end() - clause.with_start + 10);
            relocated.push(' ');
            relocated.push_str(&doc[clause.with_start..clause.close]);
            relocated.push_str(clause.nolock_addition(mask));
            relocated.push(')');

            let mut edits = vec![
                Edit::Remove {
                    start: leading,
                    end: clause.end(),
                },
                Edit::Insert {
                    offset: table.anchor(),
                    text: relocated,
                },
            ];
            // `dbo.T WITH (INDEX(1))t` must not collapse into `dbo.Tt`
            if bytes
                .get(clause.end())
                .map_or(false, |b| !b.is_ascii_whitespace())
            {
                edits.push(Edit::Insert {
                    offset: leading,
                    text: " ".to_string(),
                });
            }
            edits
        }
    }
}
