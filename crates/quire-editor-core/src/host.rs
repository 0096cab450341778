//! The editing host: storage plus selection state.
//!
//! Defines the `EditorHost` trait the formatter drives. A host owns an
//! undo-aware buffer, the current selection and the typing attributes, and
//! exposes an untracked view of its storage for styling passes.

use std::ops::{Deref, DerefMut};

use smol_str::SmolStr;

use crate::attribute::{Attribute, AttributeKey};
use crate::attributed::AttributedString;
use crate::text::{AttributedRope, Replacement, TextStorage};
use crate::types::TextRange;
use crate::undo::{UndoManager, UndoableBuffer};

/// Core trait for editor hosts.
///
/// Every text change goes through [`EditorHost::replace`], which records the
/// change for undo and keeps the selection inside the buffer. Styling passes
/// that should not appear in the undo history use [`EditorHost::storage_mut`].
pub trait EditorHost {
    /// The buffer type used for text storage and undo.
    type Buffer: TextStorage + UndoManager;

    // === Required: Buffer access ===

    /// Get a reference to the underlying buffer.
    fn buffer(&self) -> &Self::Buffer;

    /// Get a mutable reference to the underlying buffer.
    fn buffer_mut(&mut self) -> &mut Self::Buffer;

    /// The storage without undo tracking.
    /// WARNING: changes made here bypass undo tracking!
    fn storage_mut(&mut self) -> &mut dyn TextStorage;

    // === Required: Selection state ===

    /// Get the current selection.
    fn selection(&self) -> TextRange;

    /// Store a selection without validation.
    fn store_selection(&mut self, range: TextRange);

    // === Required: Typing attributes ===

    /// Attributes applied to text typed at the caret.
    fn typing_attributes(&self) -> &[Attribute];

    fn typing_attributes_mut(&mut self) -> &mut Vec<Attribute>;

    // === Provided: Convenience accessors ===

    fn storage(&self) -> &dyn TextStorage {
        self.buffer()
    }

    /// Get length in characters.
    fn len_chars(&self) -> usize {
        self.buffer().len_chars()
    }

    /// Check if the text is empty.
    fn is_empty(&self) -> bool {
        self.buffer().len_chars() == 0
    }

    /// Get the full content as a String.
    fn content_string(&self) -> String {
        self.buffer().to_string()
    }

    /// Get a slice of the content.
    fn slice(&self, range: TextRange) -> Option<SmolStr> {
        self.buffer().slice(range)
    }

    /// Get character at offset.
    fn char_at(&self, offset: usize) -> Option<char> {
        self.buffer().char_at(offset)
    }

    fn attributed_substring(&self, range: TextRange) -> Option<AttributedString> {
        self.buffer().attributed_substring(range)
    }

    fn paragraph_range(&self, range: TextRange) -> Option<TextRange> {
        self.buffer().paragraph_range(range)
    }

    // === Provided: Selection ===

    /// Set the selection. Out-of-bounds ranges are rejected and the current
    /// selection is kept.
    fn set_selection(&mut self, range: TextRange) -> bool {
        let len = self.len_chars();
        if !range.fits(len) {
            tracing::warn!(
                target: "quire::format",
                ?range,
                len,
                "rejected out-of-bounds selection"
            );
            return false;
        }
        self.store_selection(range);
        true
    }

    // === Provided: Text operations ===

    /// Replace `range` with `content`, recorded for undo.
    ///
    /// The selection is carried across the edit but not moved to it;
    /// callers set the selection they want afterwards.
    fn replace(&mut self, range: TextRange, content: Replacement<'_>) {
        let len = self.len_chars();
        if !range.fits(len) {
            tracing::warn!(target: "quire::format", ?range, len, "replace outside of buffer ignored");
            return;
        }
        let inserted = content.len_chars();
        self.buffer_mut().replace(range, content);
        let selection = self
            .selection()
            .adjusted_for_edit(range, inserted)
            .clamped(self.len_chars());
        self.store_selection(selection);
    }

    /// Apply an attribute, recorded for undo.
    fn add_attribute(&mut self, range: TextRange, value: Attribute) {
        self.buffer_mut().add_attribute(range, value);
    }

    /// Remove an attribute, recorded for undo.
    fn remove_attribute(&mut self, range: TextRange, key: AttributeKey) {
        self.buffer_mut().remove_attribute(range, key);
    }

    /// The host's own newline handling: replace the selection by a line
    /// break and put the caret after it.
    fn insert_newline(&mut self) {
        let selection = self.selection();
        self.replace(selection, Replacement::Plain("\n"));
        self.set_selection(TextRange::caret(selection.start + 1));
    }

    /// Ask the host to re-highlight the whole text.
    fn request_rescan(&mut self) {}

    // === Provided: Typing attributes ===

    fn typing_attribute(&self, key: AttributeKey) -> Option<&Attribute> {
        self.typing_attributes().iter().find(|value| value.key() == key)
    }

    fn set_typing_attribute(&mut self, value: Attribute) {
        let attributes = self.typing_attributes_mut();
        attributes.retain(|existing| existing.key() != value.key());
        attributes.push(value);
    }

    fn remove_typing_attribute(&mut self, key: AttributeKey) {
        self.typing_attributes_mut()
            .retain(|existing| existing.key() != key);
    }

    // === Provided: Undo/Redo ===

    fn begin_group(&mut self) {
        self.buffer_mut().begin_group();
    }

    fn end_group(&mut self) {
        self.buffer_mut().end_group();
    }

    /// Open an edit group closed when the guard drops.
    fn group(&mut self) -> EditGroup<'_, Self>
    where
        Self: Sized,
    {
        EditGroup::new(self)
    }

    fn undo(&mut self) -> bool {
        let done = self.buffer_mut().undo();
        if done {
            let selection = self.selection().clamped(self.len_chars());
            self.store_selection(selection);
        }
        done
    }

    fn redo(&mut self) -> bool {
        let done = self.buffer_mut().redo();
        if done {
            let selection = self.selection().clamped(self.len_chars());
            self.store_selection(selection);
        }
        done
    }

    fn can_undo(&self) -> bool {
        self.buffer().can_undo()
    }

    fn can_redo(&self) -> bool {
        self.buffer().can_redo()
    }
}

/// An open edit group; the group closes when this guard is dropped, on
/// every exit path.
pub struct EditGroup<'a, H: EditorHost + ?Sized> {
    host: &'a mut H,
}

impl<'a, H: EditorHost + ?Sized> EditGroup<'a, H> {
    pub fn new(host: &'a mut H) -> Self {
        host.begin_group();
        Self { host }
    }
}

impl<H: EditorHost + ?Sized> Deref for EditGroup<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: EditorHost + ?Sized> DerefMut for EditGroup<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: EditorHost + ?Sized> Drop for EditGroup<'_, H> {
    fn drop(&mut self) {
        self.host.end_group();
    }
}

/// Simple field-based implementation of EditorHost.
///
/// Stores selection and typing attributes as plain fields. Use this for
/// headless editing and as a base for testing.
#[derive(Clone, Debug)]
pub struct TextView<T: TextStorage = AttributedRope> {
    buffer: UndoableBuffer<T>,
    selection: TextRange,
    typing_attributes: Vec<Attribute>,
    rescan_requested: bool,
}

impl<T: TextStorage + Default> Default for TextView<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl TextView<AttributedRope> {
    /// A view over unattributed text, caret at the start.
    pub fn with_text(text: &str) -> Self {
        Self::new(AttributedRope::from_str(text))
    }

    pub fn with_attributed(text: &AttributedString) -> Self {
        Self::new(AttributedRope::from_attributed(text))
    }
}

impl<T: TextStorage> TextView<T> {
    /// Create a new view with the given storage.
    pub fn new(storage: T) -> Self {
        Self {
            buffer: UndoableBuffer::new(storage, 100),
            selection: TextRange::caret(0),
            typing_attributes: Vec::new(),
            rescan_requested: false,
        }
    }

    /// Get direct access to the inner storage (bypasses trait).
    pub fn inner(&self) -> &T {
        self.buffer.inner()
    }

    /// Whether a full rescan was requested since the last call.
    pub fn take_rescan_request(&mut self) -> bool {
        std::mem::take(&mut self.rescan_requested)
    }
}

impl<T: TextStorage> EditorHost for TextView<T> {
    type Buffer = UndoableBuffer<T>;

    fn buffer(&self) -> &Self::Buffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut Self::Buffer {
        &mut self.buffer
    }

    fn storage_mut(&mut self) -> &mut dyn TextStorage {
        self.buffer.inner_mut()
    }

    fn selection(&self) -> TextRange {
        self.selection
    }

    fn store_selection(&mut self, range: TextRange) {
        self.selection = range;
    }

    fn typing_attributes(&self) -> &[Attribute] {
        &self.typing_attributes
    }

    fn typing_attributes_mut(&mut self) -> &mut Vec<Attribute> {
        &mut self.typing_attributes
    }

    fn request_rescan(&mut self) {
        self.rescan_requested = true;
    }
}
