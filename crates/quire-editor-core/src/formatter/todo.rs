//! Todo checkbox toggling.

use crate::attribute::{Attribute, AttributeKey};
use crate::host::EditorHost;
use crate::markers::find_checkbox_text;
use crate::note::Note;
use crate::text::{Replacement, TextStorage};
use crate::types::TextRange;

use super::TextFormatter;

impl<H: EditorHost, N: Note + ?Sized> TextFormatter<'_, H, N> {
    /// Toggle the todo at `location`, or the one in the current paragraph.
    ///
    /// A paragraph without a todo glyph has a written `- [ ]` / `- [x]`
    /// converted into a glyph of the opposite state; failing that a fresh
    /// unchecked glyph is inserted at the selection.
    pub fn toggle_todo(&mut self, location: Option<usize>) {
        if !self.kind().persists_attributes() {
            return;
        }
        tracing::debug!(target: "quire::format", command = "toggle_todo", ?location, range = ?self.range);

        if let Some(location) = location
            && let Some(state) = self.todo_state_at(location)
        {
            self.flip_todo(location, state);
            return;
        }

        let paragraph = match location {
            Some(location) => self.paragraph_at(location),
            None => self.paragraph_range(),
        };
        let Some(paragraph) = paragraph else {
            return;
        };

        let existing = self
            .host
            .buffer()
            .attributes()
            .runs_in(AttributeKey::Todo, paragraph)
            .find_map(|(run, value)| value.as_todo().map(|state| (run.start, state)));
        if let Some((at, state)) = existing {
            self.flip_todo(at, state);
            return;
        }

        if self.convert_checkbox_text(paragraph) {
            return;
        }

        let glyph = self.ctx.glyphs.unchecked();
        self.insert_text(Replacement::Attributed(&glyph), None, None);
    }

    fn todo_state_at(&self, location: usize) -> Option<u8> {
        self.host
            .buffer()
            .attribute_at(AttributeKey::Todo, location)
            .and_then(Attribute::as_todo)
    }

    /// Replace the glyph at `location` by its opposite and strike or unstrike
    /// the paragraph, as one undo step.
    fn flip_todo(&mut self, location: usize, state: u8) {
        let checked = state == 0;
        let Some(paragraph) = self.paragraph_at(location) else {
            return;
        };
        let Some(cell) = self
            .ctx
            .glyphs
            .glyph(checked)
            .substring(TextRange::new(0, 1))
        else {
            return;
        };
        tracing::trace!(target: "quire::format", location, checked, ?paragraph, "flip todo");

        {
            let mut group = self.host.group();
            group.replace(TextRange::at(location, 1), Replacement::Attributed(&cell));
            if checked {
                group.add_attribute(paragraph, Attribute::Strikethrough(1));
            } else {
                group.remove_attribute(paragraph, AttributeKey::Strikethrough);
            }
        }
        self.restyle(paragraph);

        if self.paragraph_at(self.host.selection().start) == Some(paragraph) {
            self.host
                .set_typing_attribute(Attribute::Strikethrough(u8::from(checked)));
        }
    }

    /// Turn a written checkbox into a glyph. Returns false if the paragraph
    /// has none.
    fn convert_checkbox_text(&mut self, paragraph: TextRange) -> bool {
        let text = self.paragraph_text(paragraph);
        let Some(checkbox) = find_checkbox_text(&text) else {
            return false;
        };
        let start = paragraph.start + checkbox.offset;
        let mut len = checkbox.len;
        if self.host.char_at(start + len) == Some(' ') {
            len += 1;
        }
        let checked = !checkbox.checked;
        let glyph = self.ctx.glyphs.glyph(checked);

        {
            let mut group = self.host.group();
            group.replace(TextRange::at(start, len), Replacement::Attributed(&glyph));
            let paragraph = TextRange::new(paragraph.start, paragraph.end + glyph.len() - len);
            if checked {
                group.add_attribute(paragraph, Attribute::Strikethrough(1));
            } else {
                group.remove_attribute(paragraph, AttributeKey::Strikethrough);
            }
        }
        self.set_selected_range(TextRange::caret(start + glyph.len()));
        true
    }
}
