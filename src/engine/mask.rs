//! Offset-preserving masking lexer
//!
//! Builds a byte-for-byte stand-in for a SQL document in which comments and
//! the contents of quoted strings and identifiers are blanked out. Keyword
//! searches run against the mask, edits are computed against the original
//! document, and the two share every offset.
//!
//! Quote and bracket delimiters are kept visible so whitespace skipping stops
//! in front of a delimited identifier:
//!
//! ```text
//! SELECT 'a;b' FROM [My Table] -- from here
//! SELECT '   ' FROM [        ]
//! ```

use crate::util::{is_ident_byte, starts_with_ci};

/// Replacement byte for masked content.
pub const BLANK: u8 = b' ';

/// Lexer states for the masking pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    LineComment,
    BlockComment,
    /// Inside a `'`, `"` or `` ` `` quoted run, closed by the same byte
    Quoted(u8),
    /// Inside `[...]`
    Bracketed,
}

/// Same-length masked copy of a SQL document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedView {
    bytes: Vec<u8>,
}

impl MaskedView {
    /// Mask `doc` in a single left-to-right pass.
    ///
    /// Unterminated comments and literals are not errors: the state simply
    /// persists and blanks the rest of the input.
    pub fn new(doc: &str) -> Self {
        let src = doc.as_bytes();
        let mut bytes = src.to_vec();
        let mut state = State::Normal;
        let mut i = 0;

        while i < src.len() {
            let b = src[i];
            let next = src.get(i + 1).copied();

            match state {
                State::Normal => match (b, next) {
                    (b'-', Some(b'-')) => {
                        bytes[i] = BLANK;
                        bytes[i + 1] = BLANK;
                        state = State::LineComment;
                        i += 2;
                        continue;
                    }
                    (b'/', Some(b'*')) => {
                        bytes[i] = BLANK;
                        bytes[i + 1] = BLANK;
                        state = State::BlockComment;
                        i += 2;
                        continue;
                    }
                    (b'\'' | b'"' | b'`', _) => state = State::Quoted(b),
                    (b'[', _) => state = State::Bracketed,
                    _ => {}
                },
                State::LineComment => {
                    if b == b'\n' {
                        state = State::Normal;
                    } else {
                        bytes[i] = BLANK;
                    }
                }
                State::BlockComment => {
                    bytes[i] = BLANK;
                    if b == b'*' && next == Some(b'/') {
                        bytes[i + 1] = BLANK;
                        state = State::Normal;
                        i += 2;
                        continue;
                    }
                }
                State::Quoted(_) | State::Bracketed => {
                    let close = match state {
                        State::Quoted(delim) => delim,
                        _ => b']',
                    };
                    if b == close {
                        if next == Some(close) {
                            // Doubled delimiter is an escaped literal character
                            bytes[i] = BLANK;
                            bytes[i + 1] = BLANK;
                            i += 2;
                            continue;
                        }
                        state = State::Normal;
                    } else {
                        bytes[i] = BLANK;
                    }
                }
            }
            i += 1;
        }

        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Advance past ASCII whitespace (masked comments included), stopping at `limit`.
pub fn skip_whitespace(mask: &[u8], mut pos: usize, limit: usize) -> usize {
    while pos < limit && mask[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// True if `word` starts at `pos` as a standalone keyword.
///
/// The byte before must not be an identifier byte or a `.` (so `t.from` and
/// `@from` are not keywords) and the byte after must not be an identifier byte.
pub fn keyword_at(mask: &[u8], pos: usize, word: &str) -> bool {
    let word = word.as_bytes();
    if pos > mask.len() || !starts_with_ci(&mask[pos..], word) {
        return false;
    }
    let before_ok = pos == 0 || {
        let prev = mask[pos - 1];
        !is_ident_byte(prev) && prev != b'.'
    };
    let after_ok = mask
        .get(pos + word.len())
        .map_or(true, |&b| !is_ident_byte(b));
    before_ok && after_ok
}

/// Find the `)` matching the `(` at `open`, ignoring parentheses inside
/// masked regions. Returns `None` if the group is not closed before `limit`.
pub fn find_matching_paren(mask: &[u8], open: usize, limit: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in mask.iter().enumerate().take(limit).skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
