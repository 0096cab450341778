//! Core editor types: text ranges and note classification.
//!
//! These types are framework-agnostic and are shared by the storage, the
//! paragraph styler and the formatter.

use std::fmt;

/// A half-open range of character offsets, `[start, end)`.
///
/// A zero-length range is a caret. Offsets are in Unicode scalar values
/// (chars), never bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    /// Create a range from its bounds. Bounds given out of order are swapped.
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Create a range from a location and a length.
    pub fn at(location: usize, len: usize) -> Self {
        Self {
            start: location,
            end: location + len,
        }
    }

    /// Create a zero-length range (a caret).
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_caret(&self) -> bool {
        self.is_empty()
    }

    /// Check if an offset is inside the range.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Check if the range can index a buffer of `len` chars.
    pub fn fits(&self, len: usize) -> bool {
        self.end <= len
    }

    /// Whether two ranges share at least one position.
    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The overlapping part of two ranges, if any.
    pub fn intersection(&self, other: &TextRange) -> Option<TextRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(TextRange { start, end })
    }

    /// The smallest range covering both.
    pub fn union(&self, other: &TextRange) -> TextRange {
        TextRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Move both bounds by a signed delta.
    pub fn shifted(&self, delta: isize) -> TextRange {
        TextRange {
            start: self.start.saturating_add_signed(delta),
            end: self.end.saturating_add_signed(delta),
        }
    }

    /// Clamp both bounds to `len`.
    pub fn clamped(&self, len: usize) -> TextRange {
        TextRange {
            start: self.start.min(len),
            end: self.end.min(len),
        }
    }

    /// Where this range ends up after `edited` is replaced by `inserted_len` chars.
    ///
    /// Positions before the edit stay, positions after it shift by the length
    /// delta, positions inside the replaced run collapse onto its end.
    pub fn adjusted_for_edit(&self, edited: TextRange, inserted_len: usize) -> TextRange {
        let map = |offset: usize| -> usize {
            if offset <= edited.start {
                offset
            } else if offset >= edited.end {
                offset - edited.len() + inserted_len
            } else {
                edited.start + inserted_len
            }
        };
        TextRange {
            start: map(self.start),
            end: map(self.end),
        }
    }

    pub fn to_range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<std::ops::Range<usize>> for TextRange {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<TextRange> for std::ops::Range<usize> {
    fn from(r: TextRange) -> Self {
        r.start..r.end
    }
}

/// How a note's text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoteKind {
    #[default]
    Markdown,
    RichText,
    PlainText,
}

impl NoteKind {
    pub fn is_markdown(self) -> bool {
        self == NoteKind::Markdown
    }

    /// Whether edits to this kind of note are written back through the save hook.
    pub fn persists_attributes(self) -> bool {
        matches!(self, NoteKind::Markdown | NoteKind::RichText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_order() {
        assert_eq!(TextRange::new(5, 2), TextRange::new(2, 5));
        assert_eq!(TextRange::at(3, 4), TextRange::new(3, 7));
    }

    #[test]
    fn test_contains_is_half_open() {
        let range = TextRange::new(2, 5);
        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(4));
        assert!(!range.contains(5));
        assert!(!TextRange::caret(3).contains(3));
    }

    #[test]
    fn test_intersection_and_union() {
        let a = TextRange::new(0, 5);
        let b = TextRange::new(3, 9);
        assert_eq!(a.intersection(&b), Some(TextRange::new(3, 5)));
        assert_eq!(a.union(&b), TextRange::new(0, 9));
        assert_eq!(a.intersection(&TextRange::new(5, 6)), None);
    }

    #[test]
    fn test_adjusted_for_edit() {
        let edit = TextRange::new(4, 6);

        // Before the edit: untouched.
        assert_eq!(
            TextRange::new(0, 3).adjusted_for_edit(edit, 5),
            TextRange::new(0, 3)
        );
        // After the edit: shifted by +3.
        assert_eq!(
            TextRange::new(8, 10).adjusted_for_edit(edit, 5),
            TextRange::new(11, 13)
        );
        // Inside the replaced run: collapses to the end of the insertion.
        assert_eq!(
            TextRange::caret(5).adjusted_for_edit(edit, 1),
            TextRange::caret(5)
        );
    }

    #[test]
    fn test_fits() {
        assert!(TextRange::new(0, 4).fits(4));
        assert!(!TextRange::new(2, 5).fits(4));
    }
}
