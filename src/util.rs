//! Shared utility helpers.

/// Case-insensitive starts_with check on raw bytes without allocating.
#[inline]
pub fn starts_with_ci(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

/// Bytes that may appear inside a bare T-SQL identifier or variable name.
///
/// Non-ASCII bytes count as identifier bytes so that a Unicode name is never
/// split in the middle of a character.
#[inline]
pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'#' | b'$' | b'@') || b >= 0x80
}

/// True if `word` occurs in `haystack` case-insensitively as a whole word.
pub fn contains_word_ci(haystack: &[u8], word: &[u8]) -> bool {
    if word.is_empty() || word.len() > haystack.len() {
        return false;
    }
    (0..=haystack.len() - word.len()).any(|i| {
        haystack[i..i + word.len()].eq_ignore_ascii_case(word)
            && (i == 0 || !is_ident_byte(haystack[i - 1]))
            && haystack
                .get(i + word.len())
                .map_or(true, |&b| !is_ident_byte(b))
    })
}
