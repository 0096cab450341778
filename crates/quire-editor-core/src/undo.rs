//! Undo/redo management for editor operations.
//!
//! Provides:
//! - `UndoManager` trait for abstracting undo implementations
//! - `UndoableBuffer<T>` - wraps a TextStorage and provides grouped undo/redo

use crate::attribute::{Attribute, AttributeKey};
use crate::attributed::{AttributeStore, AttributedString};
use crate::text::{Replacement, TextStorage};
use crate::types::TextRange;

/// Trait for managing undo/redo operations.
///
/// Implementations must actually perform the undo/redo, not just track state.
/// Mutations made between `begin_group` and the matching `end_group` are
/// undone and redone as one step. Groups nest; only the outermost one counts.
pub trait UndoManager {
    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;

    /// Perform undo. Returns true if successful.
    fn undo(&mut self) -> bool;

    /// Perform redo. Returns true if successful.
    fn redo(&mut self) -> bool;

    /// Clear all undo/redo history.
    fn clear_history(&mut self);

    /// Open a group of edits.
    fn begin_group(&mut self);

    /// Close the innermost open group.
    fn end_group(&mut self);
}

/// A recorded edit operation for undo/redo.
///
/// Attribute-only changes are recorded as a replace of a run by the same
/// text with different attributes.
#[derive(Debug, Clone)]
struct EditOperation {
    /// Character position where edit occurred
    pos: usize,
    /// Content that was removed (empty for pure insertions)
    deleted: AttributedString,
    /// Content that was inserted (empty for pure deletions)
    inserted: AttributedString,
}

/// A TextStorage wrapper that tracks edits and provides undo/redo.
///
/// All mutations go through this wrapper, which records them for undo.
pub struct UndoableBuffer<T> {
    buffer: T,
    undo_stack: Vec<Vec<EditOperation>>,
    redo_stack: Vec<Vec<EditOperation>>,
    open_group: Vec<EditOperation>,
    group_depth: usize,
    max_steps: usize,
}

impl<T: Clone> Clone for UndoableBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            undo_stack: self.undo_stack.clone(),
            redo_stack: self.redo_stack.clone(),
            open_group: self.open_group.clone(),
            group_depth: self.group_depth,
            max_steps: self.max_steps,
        }
    }
}

impl<T: TextStorage + Default> Default for UndoableBuffer<T> {
    fn default() -> Self {
        Self::new(T::default(), 100)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for UndoableBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoableBuffer")
            .field("buffer", &self.buffer)
            .field("undo_steps", &self.undo_stack.len())
            .field("redo_steps", &self.redo_stack.len())
            .finish()
    }
}

impl<T: TextStorage> UndoableBuffer<T> {
    /// Create a new undoable buffer wrapping the given buffer.
    pub fn new(buffer: T, max_steps: usize) -> Self {
        Self {
            buffer,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            open_group: Vec::new(),
            group_depth: 0,
            max_steps,
        }
    }

    /// Get a reference to the inner buffer.
    pub fn inner(&self) -> &T {
        &self.buffer
    }

    /// Get a mutable reference to the inner buffer.
    /// WARNING: Edits made directly bypass undo tracking!
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.buffer
    }

    /// Record an operation (called internally by TextStorage impl).
    fn record_op(&mut self, pos: usize, deleted: AttributedString, inserted: AttributedString) {
        if deleted == inserted {
            return;
        }
        // Clear redo stack on new edit
        self.redo_stack.clear();

        let op = EditOperation {
            pos,
            deleted,
            inserted,
        };

        if self.group_depth > 0 {
            self.open_group.push(op);
        } else {
            self.push_step(vec![op]);
        }
    }

    fn push_step(&mut self, step: Vec<EditOperation>) {
        self.undo_stack.push(step);

        // Trim if over max
        while self.undo_stack.len() > self.max_steps {
            self.undo_stack.remove(0);
        }
    }

    /// Close every open group, e.g. before undoing.
    fn flush_group(&mut self) {
        if self.group_depth > 0 {
            tracing::warn!(
                target: "quire::undo",
                depth = self.group_depth,
                "closing unbalanced edit group"
            );
            self.group_depth = 0;
        }
        let step = std::mem::take(&mut self.open_group);
        if !step.is_empty() {
            self.push_step(step);
        }
    }

    /// Apply a same-length attribute change, recording it.
    fn restyle_tracked(&mut self, range: TextRange, apply: impl FnOnce(&mut T)) {
        if range.is_empty() || !range.fits(self.buffer.len_chars()) {
            return;
        }
        let before = self.buffer.attributed_substring(range).unwrap_or_default();
        apply(&mut self.buffer);
        let after = self.buffer.attributed_substring(range).unwrap_or_default();
        self.record_op(range.start, before, after);
    }
}

// Implement TextStorage by delegating to inner buffer + recording operations
impl<T: TextStorage> TextStorage for UndoableBuffer<T> {
    fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    fn slice(&self, range: TextRange) -> Option<smol_str::SmolStr> {
        self.buffer.slice(range)
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.buffer.char_at(offset)
    }

    fn to_string(&self) -> String {
        self.buffer.to_string()
    }

    fn replace(&mut self, range: TextRange, content: Replacement<'_>) {
        // Get the content being replaced for undo
        let Some(deleted) = self.buffer.attributed_substring(range) else {
            self.buffer.replace(range, content);
            return;
        };
        let inserted_len = content.len_chars();
        self.buffer.replace(range, content);
        let inserted = self
            .buffer
            .attributed_substring(TextRange::at(range.start, inserted_len))
            .unwrap_or_default();
        self.record_op(range.start, deleted, inserted);
    }

    fn attributes(&self) -> &AttributeStore {
        self.buffer.attributes()
    }

    fn attributes_mut(&mut self) -> &mut AttributeStore {
        self.buffer.attributes_mut()
    }

    fn add_attribute(&mut self, range: TextRange, value: Attribute) {
        self.restyle_tracked(range, |buffer| buffer.add_attribute(range, value));
    }

    fn remove_attribute(&mut self, range: TextRange, key: AttributeKey) {
        self.restyle_tracked(range, |buffer| buffer.remove_attribute(range, key));
    }
}

impl<T: TextStorage> UndoManager for UndoableBuffer<T> {
    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || !self.open_group.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn undo(&mut self) -> bool {
        self.flush_group();
        let Some(step) = self.undo_stack.pop() else {
            return false;
        };

        // Apply inverse: replace what was inserted with what was deleted
        for op in step.iter().rev() {
            let range = TextRange::at(op.pos, op.inserted.len());
            self.buffer.replace(range, Replacement::Attributed(&op.deleted));
        }
        tracing::debug!(target: "quire::undo", ops = step.len(), "undo");

        self.redo_stack.push(step);
        true
    }

    fn redo(&mut self) -> bool {
        self.flush_group();
        let Some(step) = self.redo_stack.pop() else {
            return false;
        };

        // Re-apply original: replace what was deleted with what was inserted
        for op in &step {
            let range = TextRange::at(op.pos, op.deleted.len());
            self.buffer.replace(range, Replacement::Attributed(&op.inserted));
        }
        tracing::debug!(target: "quire::undo", ops = step.len(), "redo");

        self.undo_stack.push(step);
        true
    }

    fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.open_group.clear();
    }

    fn begin_group(&mut self) {
        self.group_depth += 1;
        tracing::trace!(target: "quire::undo", depth = self.group_depth, "begin group");
    }

    fn end_group(&mut self) {
        if self.group_depth == 0 {
            tracing::warn!(target: "quire::undo", "end_group without begin_group");
            return;
        }
        self.group_depth -= 1;
        tracing::trace!(target: "quire::undo", depth = self.group_depth, "end group");
        if self.group_depth == 0 {
            let step = std::mem::take(&mut self.open_group);
            if !step.is_empty() {
                self.push_step(step);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::AttributedRope;

    fn buffer(text: &str) -> UndoableBuffer<AttributedRope> {
        UndoableBuffer::new(AttributedRope::from_str(text), 100)
    }

    #[test]
    fn test_undoable_buffer_insert_undo() {
        let mut buf = buffer("hello");

        assert_eq!(buf.to_string(), "hello");
        assert!(!buf.can_undo());

        // Insert " world"
        buf.replace(TextRange::caret(5), " world".into());
        assert_eq!(buf.to_string(), "hello world");
        assert!(buf.can_undo());

        // Undo
        assert!(buf.undo());
        assert_eq!(buf.to_string(), "hello");
        assert!(!buf.can_undo());
        assert!(buf.can_redo());

        // Redo
        assert!(buf.redo());
        assert_eq!(buf.to_string(), "hello world");
        assert!(buf.can_undo());
        assert!(!buf.can_redo());
    }

    #[test]
    fn test_undoable_buffer_replace_undo() {
        let mut buf = buffer("hello world");

        buf.replace(TextRange::new(6, 11), "rust".into());
        assert_eq!(buf.to_string(), "hello rust");

        assert!(buf.undo());
        assert_eq!(buf.to_string(), "hello world");
    }

    #[test]
    fn test_attribute_change_is_undoable() {
        let mut buf = buffer("strike me");
        buf.add_attribute(TextRange::new(0, 6), Attribute::Strikethrough(1));
        assert_eq!(
            buf.attribute_at(AttributeKey::Strikethrough, 3),
            Some(&Attribute::Strikethrough(1))
        );

        assert!(buf.undo());
        assert_eq!(buf.attribute_at(AttributeKey::Strikethrough, 3), None);
        assert_eq!(buf.to_string(), "strike me");

        assert!(buf.redo());
        assert_eq!(
            buf.attribute_at(AttributeKey::Strikethrough, 3),
            Some(&Attribute::Strikethrough(1))
        );
    }

    #[test]
    fn test_undo_restores_surrounding_runs() {
        let mut buf = buffer("0123456789");
        buf.inner_mut()
            .add_attribute(TextRange::new(0, 10), Attribute::Strikethrough(1));
        let before = buf.attributed_string();

        buf.remove_attribute(TextRange::new(2, 5), AttributeKey::Strikethrough);
        assert_eq!(buf.attributes().runs(AttributeKey::Strikethrough).len(), 2);

        assert!(buf.undo());
        assert_eq!(buf.attributed_string(), before);
    }

    #[test]
    fn test_group_undoes_as_one_step() {
        let mut buf = buffer("a\nb\n");

        buf.begin_group();
        buf.replace(TextRange::caret(2), "    ".into());
        buf.begin_group();
        buf.replace(TextRange::caret(0), "    ".into());
        buf.end_group();
        buf.end_group();
        assert_eq!(buf.to_string(), "    a\n    b\n");

        assert!(buf.undo());
        assert_eq!(buf.to_string(), "a\nb\n");
        assert!(!buf.can_undo());

        assert!(buf.redo());
        assert_eq!(buf.to_string(), "    a\n    b\n");
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut buf = buffer("abc");

        buf.replace(TextRange::caret(3), "d".into());
        assert!(buf.undo());
        assert!(buf.can_redo());

        // New edit should clear redo
        buf.replace(TextRange::caret(3), "e".into());
        assert!(!buf.can_redo());
    }

    #[test]
    fn test_max_steps() {
        let mut buf = UndoableBuffer::new(AttributedRope::new(), 3);

        buf.replace(TextRange::caret(0), "a".into());
        buf.replace(TextRange::caret(1), "b".into());
        buf.replace(TextRange::caret(2), "c".into());
        buf.replace(TextRange::caret(3), "d".into()); // should evict "a"

        assert_eq!(buf.to_string(), "abcd");

        assert!(buf.undo()); // removes d
        assert!(buf.undo()); // removes c
        assert!(buf.undo()); // removes b
        assert!(!buf.undo()); // a was evicted

        assert_eq!(buf.to_string(), "a");
    }

    #[test]
    fn test_clear_history() {
        let mut buf = buffer("a");
        buf.replace(TextRange::caret(1), "b".into());
        buf.replace(TextRange::caret(2), "c".into());
        assert!(buf.undo());

        buf.clear_history();
        assert!(!buf.can_undo());
        assert!(!buf.can_redo());
        assert_eq!(buf.to_string(), "ab");
    }

    #[test]
    fn test_unbalanced_end_group_is_ignored() {
        let mut buf = buffer("x");
        buf.end_group();
        buf.replace(TextRange::caret(1), "y".into());
        assert!(buf.undo());
        assert_eq!(buf.to_string(), "x");
    }
}
