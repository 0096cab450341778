//! Todo checkbox glyphs.
//!
//! A todo item is rendered as one attachment character carrying the todo
//! attribute, followed by a plain space.

use crate::attribute::{Attachment, Attribute, Color};
use crate::attributed::AttributedString;
use crate::prefs::Preferences;
use crate::types::TextRange;

/// The object replacement character that carries checkbox attachments.
pub const TODO_GLYPH: char = '\u{FFFC}';

/// Source of the attributed checkbox sequences.
pub trait TodoGlyphs {
    /// Interactive checked glyph plus trailing space.
    fn checked(&self) -> AttributedString;
    /// Interactive unchecked glyph plus trailing space.
    fn unchecked(&self) -> AttributedString;
    /// Checked glyph with only the todo and attachment attributes.
    fn clean_checked(&self) -> AttributedString;
    /// Unchecked glyph with only the todo and attachment attributes.
    fn clean_unchecked(&self) -> AttributedString;

    fn glyph(&self, checked: bool) -> AttributedString {
        if checked {
            self.checked()
        } else {
            self.unchecked()
        }
    }
}

/// Glyphs coloured from the preferences.
#[derive(Debug, Clone)]
pub struct StandardTodoGlyphs {
    checkbox_color: Color,
    text_color: Color,
}

impl StandardTodoGlyphs {
    pub fn new(prefs: &Preferences) -> Self {
        Self {
            checkbox_color: prefs.syntax_color(),
            text_color: prefs.main_text_color(),
        }
    }

    fn clean(checked: bool) -> AttributedString {
        let mut glyph = AttributedString::plain(format!("{TODO_GLYPH} "));
        let cell = TextRange::new(0, 1);
        glyph.add_attribute(cell, Attribute::Todo(u8::from(checked)));
        glyph.add_attribute(cell, Attribute::Attachment(Attachment::checkbox(checked)));
        glyph
    }

    fn interactive(&self, checked: bool) -> AttributedString {
        let mut glyph = Self::clean(checked);
        glyph.add_attribute(
            TextRange::new(0, 1),
            Attribute::ForegroundColor(self.checkbox_color),
        );
        glyph.add_attribute(
            TextRange::new(1, 2),
            Attribute::ForegroundColor(self.text_color),
        );
        glyph
    }
}

impl TodoGlyphs for StandardTodoGlyphs {
    fn checked(&self) -> AttributedString {
        self.interactive(true)
    }

    fn unchecked(&self) -> AttributedString {
        self.interactive(false)
    }

    fn clean_checked(&self) -> AttributedString {
        Self::clean(true)
    }

    fn clean_unchecked(&self) -> AttributedString {
        Self::clean(false)
    }
}
