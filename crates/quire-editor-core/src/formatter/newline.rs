//! Return key handling with todo, list and indent continuation.

use crate::attribute::AttributeKey;
use crate::attributed::AttributedString;
use crate::host::EditorHost;
use crate::markers::leading_run;
use crate::note::Note;
use crate::text::{Replacement, TextStorage};
use crate::text_helpers::{ListContext, detect_list_context, paragraph_content};
use crate::types::TextRange;

use super::TextFormatter;

impl<H: EditorHost, N: Note + ?Sized> TextFormatter<'_, H, N> {
    /// Break the line at the caret.
    ///
    /// Markdown notes continue todo items and lists onto the new line and
    /// keep a leading tab or space indent. An empty item ends its list
    /// instead. Everything else gets the host's native newline.
    pub fn new_line(&mut self) {
        let Some(paragraph) = self.paragraph_range() else {
            return;
        };
        tracing::debug!(target: "quire::format", command = "new_line", ?paragraph, range = ?self.range);

        if self.is_markdown()
            && (self.continue_todo(paragraph)
                || self.continue_list(paragraph)
                || self.preserve_indent(paragraph))
        {
            return;
        }
        self.host.insert_newline();
    }

    fn continue_todo(&mut self, paragraph: TextRange) -> bool {
        let selection = self.host.selection();
        if selection.start == paragraph.start || paragraph.len() < 2 {
            return false;
        }
        let before_caret = TextRange::new(paragraph.start, selection.start);
        let Some(todo_at) = self
            .host
            .buffer()
            .attributes()
            .runs_in(AttributeKey::Todo, before_caret)
            .next()
            .map(|(run, _)| run.start)
        else {
            return false;
        };

        if self.is_empty_todo(paragraph, selection) {
            tracing::trace!(target: "quire::format", ?paragraph, "ending todo list");
            self.insert_text(
                Replacement::Plain("\n"),
                Some(paragraph),
                Some(TextRange::caret(paragraph.start)),
            );
            return true;
        }

        let lead = self
            .host
            .slice(TextRange::new(paragraph.start, todo_at))
            .unwrap_or_default();
        let mut item = AttributedString::plain(format!("\n{lead}"));
        item.append(&self.ctx.glyphs.unchecked());
        self.insert_text(Replacement::Attributed(&item), None, None);
        true
    }

    /// The caret sits right after a todo glyph and its space, with nothing
    /// left to the end of the paragraph.
    fn is_empty_todo(&self, paragraph: TextRange, selection: TextRange) -> bool {
        let Some(glyph_at) = selection.end.checked_sub(2) else {
            return false;
        };
        if self.host.buffer().attribute_at(AttributeKey::Todo, glyph_at).is_none() {
            return false;
        }
        let rest = self
            .host
            .slice(TextRange::new(selection.end, paragraph.end))
            .unwrap_or_default();
        rest.is_empty() || rest == "\n"
    }

    fn continue_list(&mut self, paragraph: TextRange) -> bool {
        let Some(list) = detect_list_context(self.host.buffer(), paragraph) else {
            return false;
        };
        // A caret inside the marker itself is an ordinary line break.
        if self.host.selection().start < paragraph.start + list.lead_len() {
            return false;
        }

        if paragraph_content(self.host.buffer(), paragraph) == list.lead() {
            tracing::trace!(target: "quire::format", ?paragraph, "ending list");
            self.insert_text(
                Replacement::Plain("\n"),
                Some(paragraph),
                Some(TextRange::caret(paragraph.start)),
            );
            return true;
        }

        let continuation = format!("\n{}", list.continuation());
        self.insert_text(Replacement::Plain(&continuation), None, None);
        if let ListContext::Ordered { .. } = list {
            let caret = self.host.selection().start;
            if let Some(current) = self.paragraph_at(caret) {
                self.restyle(current);
            }
        }
        true
    }

    fn preserve_indent(&mut self, paragraph: TextRange) -> bool {
        let text = self.paragraph_text(paragraph);
        let lead = if text.starts_with('\t') {
            leading_run(&text, '\t')
        } else if text.starts_with("    ") {
            leading_run(&text, ' ')
        } else {
            None
        };
        let Some(lead) = lead else {
            return false;
        };

        let line = if self.host.selection().start != paragraph.start {
            format!("\n{lead}")
        } else {
            "\n".to_string()
        };
        let code = self.ctx.attributed_code(&line);
        self.insert_text(Replacement::Attributed(&code), None, None);
        true
    }
}
