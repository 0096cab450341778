//! The note being edited.

use std::cell::RefCell;

use crate::attributed::AttributedString;
use crate::error::EditorError;
use crate::types::NoteKind;

/// A note supplies its kind and persists edited text.
pub trait Note {
    fn kind(&self) -> NoteKind;

    /// Persist the full attributed text of the note.
    fn save(&self, text: &AttributedString) -> Result<(), EditorError>;

    fn is_markdown(&self) -> bool {
        self.kind().is_markdown()
    }
}

/// A note that keeps every saved revision in memory.
#[derive(Debug, Default)]
pub struct MemoryNote {
    kind: NoteKind,
    saves: RefCell<Vec<AttributedString>>,
}

impl MemoryNote {
    pub fn new(kind: NoteKind) -> Self {
        Self {
            kind,
            saves: RefCell::new(Vec::new()),
        }
    }

    pub fn markdown() -> Self {
        Self::new(NoteKind::Markdown)
    }

    /// Number of times the note was saved.
    pub fn save_count(&self) -> usize {
        self.saves.borrow().len()
    }

    /// The most recently saved text.
    pub fn last_saved(&self) -> Option<AttributedString> {
        self.saves.borrow().last().cloned()
    }
}

impl Note for MemoryNote {
    fn kind(&self) -> NoteKind {
        self.kind
    }

    fn save(&self, text: &AttributedString) -> Result<(), EditorError> {
        self.saves.borrow_mut().push(text.clone());
        Ok(())
    }
}
