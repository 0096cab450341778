//! Font commands for rich-text notes and code-font helpers.

use crate::attribute::{Attribute, AttributeKey, Font, FontTraits};
use crate::attributed::AttributedString;
use crate::host::EditorHost;
use crate::note::Note;
use crate::text::TextStorage;
use crate::types::{NoteKind, TextRange};

use super::{FormatContext, TextFormatter};

impl FormatContext<'_> {
    /// `text` in the code font.
    pub fn attributed_code(&self, text: &str) -> AttributedString {
        AttributedString::styled(text, Attribute::Font(self.prefs.code_font()))
    }
}

impl<H: EditorHost, N: Note + ?Sized> TextFormatter<'_, H, N> {
    pub fn toggle_bold_font(&mut self) {
        self.toggle_font_trait("toggle_bold_font", FontTraits::BOLD);
    }

    pub fn toggle_italic_font(&mut self) {
        self.toggle_font_trait("toggle_italic_font", FontTraits::ITALIC);
    }

    /// Flip `flag` on the typing font, or set it across the selection.
    ///
    /// The font at the selection start decides the direction; every font
    /// run in the selection keeps its family and size.
    fn toggle_font_trait(&mut self, command: &str, flag: FontTraits) {
        if self.kind() != NoteKind::RichText {
            return;
        }
        tracing::debug!(target: "quire::format", command, range = ?self.range);
        let note_font = self.ctx.prefs.note_font();

        if self.range.is_empty() {
            let font = self
                .host
                .typing_attribute(AttributeKey::Font)
                .and_then(Attribute::as_font)
                .cloned()
                .unwrap_or(note_font);
            self.host.set_typing_attribute(Attribute::Font(font.toggled(flag)));
            return;
        }

        let range = self.range.clamped(self.host.len_chars());
        let enable = !self
            .host
            .buffer()
            .attribute_at(AttributeKey::Font, range.start)
            .and_then(Attribute::as_font)
            .unwrap_or(&note_font)
            .traits
            .contains(flag);
        let pieces = self.font_runs(range, &note_font);

        let mut group = self.host.group();
        for (run, mut font) in pieces {
            font.traits.set(flag, enable);
            group.add_attribute(run, Attribute::Font(font));
        }
    }

    /// The fonts covering `range`; unstyled gaps get `fallback`.
    fn font_runs(&self, range: TextRange, fallback: &Font) -> Vec<(TextRange, Font)> {
        let mut pieces = Vec::new();
        let mut pos = range.start;
        for (run, value) in self
            .host
            .buffer()
            .attributes()
            .runs_in(AttributeKey::Font, range)
        {
            if run.start > pos {
                pieces.push((TextRange::new(pos, run.start), fallback.clone()));
            }
            if let Some(font) = value.as_font() {
                pieces.push((run, font.clone()));
            }
            pos = run.end;
        }
        if pos < range.end {
            pieces.push((TextRange::new(pos, range.end), fallback.clone()));
        }
        pieces
    }
}

#[cfg(test)]
mod tests {
    use crate::attribute::{Attribute, AttributeKey, Font, FontTraits};
    use crate::attributed::AttributedString;
    use crate::formatter::testing::{Fixture, view};
    use crate::host::{EditorHost, TextView};
    use crate::note::MemoryNote;
    use crate::text::TextStorage;
    use crate::types::{NoteKind, TextRange};

    fn font_at(view: &TextView, offset: usize) -> Option<Font> {
        view.buffer()
            .attribute_at(AttributeKey::Font, offset)
            .and_then(Attribute::as_font)
            .cloned()
    }

    #[test]
    fn test_bold_font_on_empty_selection_toggles_typing_font() {
        let fixture = Fixture::new();
        let note = MemoryNote::new(NoteKind::RichText);
        let mut v = view("abc", TextRange::caret(1));
        fixture.run_on(&mut v, &note, |f| f.toggle_bold_font());
        assert_eq!(
            v.typing_attribute(AttributeKey::Font),
            Some(&Attribute::Font(
                fixture.prefs.note_font().with_traits(FontTraits::BOLD)
            ))
        );

        fixture.run_on(&mut v, &note, |f| f.toggle_bold_font());
        assert_eq!(
            v.typing_attribute(AttributeKey::Font),
            Some(&Attribute::Font(fixture.prefs.note_font()))
        );
    }

    #[test]
    fn test_italic_font_over_mixed_runs() {
        let fixture = Fixture::new();
        let note = MemoryNote::new(NoteKind::RichText);
        let bold = fixture.prefs.note_font().with_traits(FontTraits::BOLD);
        let text = AttributedString::plain("plain bold").with_attribute(
            TextRange::new(6, 10),
            Attribute::Font(bold.clone()),
        );
        let mut v = TextView::with_attributed(&text);
        v.set_selection(TextRange::new(0, 10));

        fixture.run_on(&mut v, &note, |f| f.toggle_italic_font());
        assert_eq!(
            font_at(&v, 0).map(|font| font.traits),
            Some(FontTraits::ITALIC)
        );
        assert_eq!(
            font_at(&v, 7).map(|font| font.traits),
            Some(FontTraits::BOLD | FontTraits::ITALIC)
        );

        assert!(v.undo());
        assert_eq!(font_at(&v, 0), None);
        assert_eq!(font_at(&v, 7), Some(bold));
    }

    #[test]
    fn test_font_toggles_ignored_for_markdown() {
        let fixture = Fixture::new();
        let mut v = view("abc", TextRange::new(0, 3));
        fixture.run(&mut v, |f| f.toggle_bold_font());
        assert_eq!(font_at(&v, 0), None);
    }
}
