//! The edit transformer.
//!
//! A `TextFormatter` is built for one user command. It reads the selection
//! once at construction, applies the command through the host's replace
//! primitive, sets the resulting selection, and on [`TextFormatter::commit`]
//! re-highlights, restyles and persists the affected paragraph.
//!
//! Commands never fail: when a precondition does not hold they do nothing.

mod indent;
mod inline;
mod newline;
mod rich;
#[cfg(test)]
pub(crate) mod testing;
mod todo;

use crate::attribute::{Attribute, AttributeKey};
use crate::attributed::AttributedString;
use crate::error::EditorError;
use crate::highlight::Highlighter;
use crate::host::EditorHost;
use crate::metrics::FontMetrics;
use crate::note::Note;
use crate::prefs::Preferences;
use crate::styler::ParagraphStyler;
use crate::text::{Replacement, TextStorage};
use crate::todo::TodoGlyphs;
use crate::types::{NoteKind, TextRange};

/// Collaborators a formatter needs besides the host and the note.
#[derive(Clone, Copy)]
pub struct FormatContext<'a> {
    pub prefs: &'a Preferences,
    pub glyphs: &'a dyn TodoGlyphs,
    pub metrics: &'a dyn FontMetrics,
    pub highlighter: &'a dyn Highlighter,
}

impl<'a> FormatContext<'a> {
    pub fn new(
        prefs: &'a Preferences,
        glyphs: &'a dyn TodoGlyphs,
        metrics: &'a dyn FontMetrics,
        highlighter: &'a dyn Highlighter,
    ) -> Self {
        Self {
            prefs,
            glyphs,
            metrics,
            highlighter,
        }
    }

    pub fn styler(&self) -> ParagraphStyler<'a> {
        ParagraphStyler::new(self.prefs, self.metrics)
    }
}

/// Applies one editing command to a host.
pub struct TextFormatter<'a, H: EditorHost, N: Note + ?Sized> {
    host: &'a mut H,
    note: &'a N,
    ctx: FormatContext<'a>,
    /// Selection when the formatter was created.
    range: TextRange,
    /// Content of `range` when the formatter was created.
    selected: AttributedString,
    should_scan_markdown: bool,
}

impl<'a, H: EditorHost, N: Note + ?Sized> TextFormatter<'a, H, N> {
    pub fn new(host: &'a mut H, note: &'a N, ctx: FormatContext<'a>) -> Self {
        let range = host.selection();
        let selected = host.attributed_substring(range).unwrap_or_default();
        if host.typing_attribute(AttributeKey::Font).is_none() {
            host.set_typing_attribute(Attribute::Font(ctx.prefs.note_font()));
        }
        let should_scan_markdown = note.is_markdown();
        Self {
            host,
            note,
            ctx,
            range,
            selected,
            should_scan_markdown,
        }
    }

    /// Whether commit runs the markdown highlighter. Never for non-markdown notes.
    pub fn scan_markdown(mut self, scan: bool) -> Self {
        self.should_scan_markdown = scan && self.note.is_markdown();
        self
    }

    /// The selection the formatter was created with.
    pub fn range(&self) -> TextRange {
        self.range
    }

    /// The selected content the formatter was created with.
    pub fn selected(&self) -> &AttributedString {
        &self.selected
    }

    pub fn host(&self) -> &H {
        self.host
    }

    fn kind(&self) -> NoteKind {
        self.note.kind()
    }

    fn is_markdown(&self) -> bool {
        self.note.is_markdown()
    }

    /// Paragraphs around the creation-time selection, if it still fits.
    fn paragraph_range(&self) -> Option<TextRange> {
        self.host.paragraph_range(self.range)
    }

    /// Paragraph around `location`, if it is inside the text.
    fn paragraph_at(&self, location: usize) -> Option<TextRange> {
        self.host.paragraph_range(TextRange::caret(location))
    }

    fn paragraph_text(&self, paragraph: TextRange) -> String {
        self.host
            .slice(paragraph)
            .map(|s| s.to_string())
            .unwrap_or_default()
    }

    /// Replace `replacement` (default: the live selection) and put the caret
    /// after the inserted content, or at `select` when given.
    fn insert_text(
        &mut self,
        content: Replacement<'_>,
        replacement: Option<TextRange>,
        select: Option<TextRange>,
    ) {
        let range = replacement.unwrap_or_else(|| self.host.selection());
        let inserted = content.len_chars();
        self.host.replace(range, content);
        self.host.set_selection(TextRange::caret(range.start + inserted));
        if let Some(select) = select {
            self.host.set_selection(select);
        }
    }

    /// Set the selection; out-of-bounds ranges are ignored.
    fn set_selected_range(&mut self, range: TextRange) {
        self.host.set_selection(range);
    }

    fn restyle(&mut self, range: TextRange) {
        let styler = self.ctx.styler();
        styler.restyle(self.host.storage_mut(), range);
    }

    /// Paragraphs touched by the command: the creation-time selection and
    /// the selection now, clamped to the text.
    fn affected_paragraph(&self) -> Option<TextRange> {
        let len = self.host.len_chars();
        let touched = self
            .range
            .clamped(len)
            .union(&self.host.selection().clamped(len));
        self.host.paragraph_range(touched)
    }

    /// Finish the transaction: highlight and restyle the affected paragraph,
    /// then save markdown and rich-text notes.
    pub fn commit(mut self) -> Result<(), EditorError> {
        let kind = self.kind();
        if let Some(paragraph) = self.affected_paragraph() {
            if self.should_scan_markdown {
                self.ctx
                    .highlighter
                    .highlight_markdown(self.host.storage_mut(), paragraph, kind);
            }
            let styler = self.ctx.styler();
            styler.restyle(self.host.storage_mut(), paragraph);
        }

        if kind.persists_attributes() {
            let text = self.host.buffer().attributed_string();
            if let Err(err) = self.note.save(&text) {
                tracing::warn!(target: "quire::format", error = %err, "failed to save note");
                return Err(err);
            }
        }
        Ok(())
    }
}
