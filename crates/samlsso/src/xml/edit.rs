//! Text edits against a parsed document's source.

use std::ops::Range;

/// Replacement of a byte range of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Byte range replaced.
    pub range: Range<usize>,
    /// Text written in its place.
    pub replacement: String,
}

impl Edit {
    /// Replaces `range` with `replacement`.
    pub fn replace(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    /// Deletes `range`.
    #[must_use]
    pub fn remove(range: Range<usize>) -> Self {
        Self::replace(range, String::new())
    }

    /// Inserts `text` at byte offset `at`.
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at..at, text)
    }
}

/// Applies `edits` to `source` and returns the new text.
///
/// Edits are applied in source order. An edit starting inside a range an
/// earlier edit already replaced is dropped, so removing an element and
/// one of its descendants removes the element once.
#[must_use]
pub fn splice(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| (e.range.start, e.range.end));

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        if edit.range.start < cursor || edit.range.end > source.len() {
            continue;
        }
        out.push_str(&source[cursor..edit.range.start]);
        out.push_str(&edit.replacement);
        cursor = edit.range.end;
    }
    out.push_str(&source[cursor..]);
    out
}
