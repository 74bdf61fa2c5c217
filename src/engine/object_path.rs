//! Multi-part object name parsing
//!
//! Recognizes `server.database.schema.object` style names where every part
//! may be bare, `[bracketed]` or `"quoted"`.

use super::mask::skip_whitespace;

/// Maximum number of dotted parts in an object path
pub const MAX_PATH_PARTS: usize = 4;

/// Outcome of scanning for an object path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathScan {
    /// A table variable (`@t`); never rewritten
    Variable,
    /// No identifier at the scan position
    Missing,
    /// An object path spanning `start..end`
    Path { start: usize, end: usize },
}

/// Bytes allowed in a bare (undelimited) identifier part.
#[inline]
pub fn is_bare_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'#' | b'$') || b >= 0x80
}

/// Consume a delimited identifier whose opening delimiter sits at `pos`.
///
/// `close` is the closing delimiter; a doubled `close` is an escape. An
/// unterminated identifier runs to `limit`.
fn scan_delimited(doc: &[u8], pos: usize, close: u8, limit: usize) -> usize {
    let mut i = pos + 1;
    while i < limit {
        if doc[i] == close {
            if i + 1 < limit && doc[i + 1] == close {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    limit
}

/// Consume one identifier (delimited or bare) at `pos`.
///
/// Returns the end offset and whether the identifier was delimited, or `None`
/// when no identifier starts at `pos`.
pub fn scan_identifier(doc: &[u8], pos: usize, limit: usize) -> Option<(usize, bool)> {
    match doc.get(pos).copied().filter(|_| pos < limit)? {
        b'[' => Some((scan_delimited(doc, pos, b']', limit), true)),
        b'"' => Some((scan_delimited(doc, pos, b'"', limit), true)),
        _ => {
            let end = doc[pos..limit]
                .iter()
                .position(|&b| !is_bare_ident_byte(b))
                .map_or(limit, |n| pos + n);
            (end > pos).then_some((end, false))
        }
    }
}

/// Parse an object path starting at `pos` (after skipping whitespace).
///
/// Whitespace and comments may surround the dots (`[dbo] . [Orders]`); the
/// path ends after its last identifier, never on trailing whitespace.
pub fn parse_object_path(doc: &[u8], mask: &[u8], pos: usize, limit: usize) -> PathScan {
    let start = skip_whitespace(mask, pos, limit);
    if start < limit && doc[start] == b'@' {
        return PathScan::Variable;
    }

    let mut i = start;
    let mut end = start;
    let mut parts = 0;
    while parts < MAX_PATH_PARTS {
        match scan_identifier(doc, i, limit) {
            Some((ident_end, _)) => {
                i = ident_end;
                end = ident_end;
                parts += 1;
            }
            // `db..table` leaves the schema part empty
            None if parts > 0 && i < limit && mask[i] == b'.' => parts += 1,
            None => break,
        }
        if parts == MAX_PATH_PARTS {
            break;
        }
        let dot = skip_whitespace(mask, i, limit);
        if dot < limit && mask[dot] == b'.' {
            i = skip_whitespace(mask, dot + 1, limit);
            continue;
        }
        break;
    }

    if end == start {
        PathScan::Missing
    } else {
        PathScan::Path { start, end }
    }
}
