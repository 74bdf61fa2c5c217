//! Positional text edits and their application

use std::cmp::Reverse;
use std::collections::BTreeSet;

/// A single change against the original document, in byte offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Insert `text` before the byte at `offset`
    Insert { offset: usize, text: String },
    /// Remove the bytes in `start..end`
    Remove { start: usize, end: usize },
}

impl Edit {
    /// The offset the edit is anchored at (the start of a removal).
    pub fn offset(&self) -> usize {
        match self {
            Edit::Insert { offset, .. } => *offset,
            Edit::Remove { start, .. } => *start,
        }
    }

    /// Removals sort ahead of insertions at the same offset.
    fn kind_rank(&self) -> u8 {
        match self {
            Edit::Remove { .. } => 0,
            Edit::Insert { .. } => 1,
        }
    }
}

/// Edits collected for one document, grouped per table reference
#[derive(Debug, Default, Clone)]
pub struct EditSet {
    edits: Vec<Edit>,
    /// Start offsets of the references that contributed edits
    references: BTreeSet<usize>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record all edits for the table reference starting at `reference_start`.
    ///
    /// Returns false (and records nothing) when `edits` is empty or the
    /// reference already contributed edits.
    pub fn push_reference(&mut self, reference_start: usize, edits: Vec<Edit>) -> bool {
        if edits.is_empty() || !self.references.insert(reference_start) {
            return false;
        }
        self.edits.extend(edits);
        true
    }

    /// Number of table references that contributed edits
    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Edits in application order: strictly decreasing offset, removals first on ties.
    pub fn sorted(&self) -> Vec<&Edit> {
        let mut ordered: Vec<&Edit> = self.edits.iter().collect();
        ordered.sort_by_key(|edit| (Reverse(edit.offset()), edit.kind_rank()));
        ordered
    }
}

/// Apply `edits` to `doc`, producing a new string.
///
/// Equivalent to splicing each edit in decreasing-offset order, but done in a
/// single forward pass over the document. An edit that overlaps one already
/// applied, or that does not fall on a character boundary, is dropped.
pub fn apply_edits(doc: &str, edits: &EditSet) -> String {
    let inserted: usize = edits
        .edits
        .iter()
        .map(|edit| match edit {
            Edit::Insert { text, .. } => text.len(),
            Edit::Remove { .. } => 0,
        })
        .sum();
    let mut out = String::with_capacity(doc.len() + inserted);
    let mut cursor = 0;

    for edit in edits.sorted().into_iter().rev() {
        match edit {
            Edit::Insert { offset, text } => {
                if *offset < cursor || !doc.is_char_boundary(*offset) {
                    tracing::debug!("Dropping overlapping insert at {}", offset);
                    continue;
                }
                out.push_str(&doc[cursor..*offset]);
                out.push_str(text);
                cursor = *offset;
            }
            Edit::Remove { start, end } => {
                if *start < cursor
                    || start > end
                    || !doc.is_char_boundary(*start)
                    || !doc.is_char_boundary(*end)
                {
                    tracing::debug!("Dropping overlapping removal {}..{}", start, end);
                    continue;
                }
                out.push_str(&doc[cursor..*start]);
                cursor = *end;
            }
        }
    }

    out.push_str(&doc[cursor..]);
    out
}
