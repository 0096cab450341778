//! Attributed text storage.
//!
//! The `TextStorage` trait is the common interface for styled text: a char
//! buffer plus an [`AttributeStore`]. `AttributedRope` is the ropey-backed
//! implementation used by the reference host; `UndoableBuffer` wraps any
//! storage to record its mutations.

use ropey::Rope;
use smol_str::{SmolStr, ToSmolStr};

use crate::attribute::{Attribute, AttributeKey};
use crate::attributed::{AttributeStore, AttributedString};
use crate::text_helpers::{find_line_start, find_paragraph_end};
use crate::types::TextRange;

/// Content handed to a replace: plain text picks up the attributes around
/// the edit, attributed text brings its own.
#[derive(Debug, Clone, Copy)]
pub enum Replacement<'a> {
    Plain(&'a str),
    Attributed(&'a AttributedString),
}

impl Replacement<'_> {
    pub fn text(&self) -> &str {
        match self {
            Replacement::Plain(text) => text,
            Replacement::Attributed(attributed) => attributed.as_str(),
        }
    }

    pub fn len_chars(&self) -> usize {
        self.text().chars().count()
    }
}

impl<'a> From<&'a str> for Replacement<'a> {
    fn from(s: &'a str) -> Self {
        Replacement::Plain(s)
    }
}

impl<'a> From<&'a String> for Replacement<'a> {
    fn from(s: &'a String) -> Self {
        Replacement::Plain(s)
    }
}

impl<'a> From<&'a AttributedString> for Replacement<'a> {
    fn from(s: &'a AttributedString) -> Self {
        Replacement::Attributed(s)
    }
}

/// Styled text storage addressed by char offsets.
///
/// All offsets are in Unicode scalar values (chars), not bytes or UTF-16.
/// Out-of-bounds ranges are ignored by every mutating method rather than
/// corrupting the buffer.
pub trait TextStorage {
    /// Total length in chars.
    fn len_chars(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Get a slice as SmolStr. Returns None if range is invalid.
    fn slice(&self, range: TextRange) -> Option<SmolStr>;

    /// Get character at offset. Returns None if out of bounds.
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Convert entire buffer to String.
    fn to_string(&self) -> String;

    /// Replace `range` with `content`.
    ///
    /// Plain text inherits the attributes of the first replaced character,
    /// or for an insertion those of the preceding (else following)
    /// character. Character-bound attributes are never inherited.
    fn replace(&mut self, range: TextRange, content: Replacement<'_>);

    fn attributes(&self) -> &AttributeStore;

    /// Direct access to the attribute runs.
    /// WARNING: changes made here bypass undo tracking!
    fn attributes_mut(&mut self) -> &mut AttributeStore;

    fn add_attribute(&mut self, range: TextRange, value: Attribute) {
        if range.fits(self.len_chars()) {
            self.attributes_mut().set(range, value);
        }
    }

    fn remove_attribute(&mut self, range: TextRange, key: AttributeKey) {
        if range.fits(self.len_chars()) {
            self.attributes_mut().clear(range, key);
        }
    }

    fn attribute_at(&self, key: AttributeKey, offset: usize) -> Option<&Attribute> {
        self.attributes().get(key, offset)
    }

    /// Text and attributes of `range`. None if out of bounds.
    fn attributed_substring(&self, range: TextRange) -> Option<AttributedString> {
        let text = self.slice(range)?;
        Some(AttributedString::from_parts(
            text.to_string(),
            self.attributes().slice(range),
        ))
    }

    /// The whole buffer with its attributes.
    fn attributed_string(&self) -> AttributedString {
        AttributedString::from_parts(
            self.to_string(),
            self.attributes().slice(TextRange::new(0, self.len_chars())),
        )
    }

    /// The whole paragraphs covering `range`, including the line break that
    /// ends the last one. None if `range` does not fit the buffer.
    ///
    /// A caret at the very end of a buffer ending in a line break yields the
    /// empty paragraph after it.
    fn paragraph_range(&self, range: TextRange) -> Option<TextRange> {
        if !range.fits(self.len_chars()) {
            return None;
        }
        let start = find_line_start(self, range.start);
        let last = if range.is_empty() {
            range.start
        } else {
            range.end - 1
        };
        let end = find_paragraph_end(self, last).max(range.end);
        Some(TextRange::new(start, end))
    }
}

/// Ropey-backed attributed text.
///
/// Provides O(log n) editing and offset conversions; attribute runs are kept
/// in a separate sparse store and spliced on every edit.
#[derive(Clone, Default)]
pub struct AttributedRope {
    rope: Rope,
    attributes: AttributeStore,
}

impl AttributedRope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from unattributed text.
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
            attributes: AttributeStore::new(),
        }
    }

    pub fn from_attributed(s: &AttributedString) -> Self {
        Self {
            rope: Rope::from_str(s.as_str()),
            attributes: s.attributes().clone(),
        }
    }

    /// Get a reference to the underlying rope (for advanced operations).
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    fn inherited_attributes(&self, range: TextRange) -> Vec<Attribute> {
        let len = self.rope.len_chars();
        let source = if !range.is_empty() {
            Some(range.start)
        } else if range.start > 0 {
            Some(range.start - 1)
        } else if range.start < len {
            Some(range.start)
        } else {
            None
        };
        source
            .map(|offset| {
                self.attributes
                    .attributes_at(offset)
                    .into_iter()
                    .filter(|value| !value.key().is_character_bound())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl TextStorage for AttributedRope {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn slice(&self, range: TextRange) -> Option<SmolStr> {
        if !range.fits(self.rope.len_chars()) {
            return None;
        }
        Some(self.rope.slice(range.to_range()).to_smolstr())
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        if offset >= self.rope.len_chars() {
            return None;
        }
        Some(self.rope.char(offset))
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }

    fn replace(&mut self, range: TextRange, content: Replacement<'_>) {
        if !range.fits(self.rope.len_chars()) {
            tracing::warn!(
                target: "quire::text",
                ?range,
                len = self.rope.len_chars(),
                "replace outside of buffer ignored"
            );
            return;
        }
        let inherited = match content {
            Replacement::Plain(_) => self.inherited_attributes(range),
            Replacement::Attributed(_) => Vec::new(),
        };

        self.rope.remove(range.to_range());
        self.rope.insert(range.start, content.text());

        let inserted = content.len_chars();
        self.attributes.splice(range, inserted);
        match content {
            Replacement::Plain(_) => {
                let gap = TextRange::at(range.start, inserted);
                for value in inherited {
                    self.attributes.set(gap, value);
                }
            }
            Replacement::Attributed(attributed) => {
                self.attributes.overlay(range.start, attributed.attributes());
            }
        }
    }

    fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.attributes
    }
}

impl From<&str> for AttributedRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for AttributedRope {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl std::fmt::Debug for AttributedRope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributedRope")
            .field("text", &format_args!("{:?}", self.rope.to_string()))
            .field("attributes", &self.attributes)
            .finish()
    }
}
