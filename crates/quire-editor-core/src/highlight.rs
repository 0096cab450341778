//! Markdown highlighting hook.

use crate::text::TextStorage;
use crate::types::{NoteKind, TextRange};

/// Applies markdown token styling to a range of storage.
///
/// Called with the affected paragraph range when an edit transaction on a
/// markdown note commits.
pub trait Highlighter {
    fn highlight_markdown(&self, storage: &mut dyn TextStorage, range: TextRange, kind: NoteKind);
}

/// Leaves the text unstyled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHighlighter;

impl Highlighter for NoopHighlighter {
    fn highlight_markdown(&self, _storage: &mut dyn TextStorage, _range: TextRange, _kind: NoteKind) {}
}

impl<F> Highlighter for F
where
    F: Fn(&mut dyn TextStorage, TextRange, NoteKind),
{
    fn highlight_markdown(&self, storage: &mut dyn TextStorage, range: TextRange, kind: NoteKind) {
        self(storage, range, kind)
    }
}
