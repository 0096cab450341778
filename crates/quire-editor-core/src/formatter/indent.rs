//! Paragraph indentation and the tab key.

use crate::host::EditorHost;
use crate::note::Note;
use crate::text::Replacement;
use crate::text_helpers::line_starts;
use crate::types::TextRange;

use super::TextFormatter;

const INDENT: &str = "    ";

impl<H: EditorHost, N: Note + ?Sized> TextFormatter<'_, H, N> {
    /// Indent the current paragraph, or every line of the selected ones, by
    /// four spaces.
    pub fn tab(&mut self) {
        let Some(paragraph) = self.paragraph_range() else {
            return;
        };
        tracing::debug!(target: "quire::format", command = "tab", range = ?self.range);
        let was_empty = self.host.is_empty();

        if self.range.is_empty() {
            let caret = self.range.start + INDENT.len();
            self.insert_text(
                Replacement::Plain(INDENT),
                Some(TextRange::caret(paragraph.start)),
                Some(TextRange::caret(caret)),
            );
        } else {
            let rewritten = self.prefix_lines(paragraph, INDENT);
            self.set_selected_range(rewritten);
        }

        if was_empty {
            self.host.request_rescan();
        }
    }

    /// Remove one level of indentation: four spaces, else a tab.
    pub fn untab(&mut self) {
        let Some(paragraph) = self.paragraph_range() else {
            return;
        };
        tracing::debug!(target: "quire::format", command = "untab", range = ?self.range);

        if self.range.is_empty() {
            let Some(removed) = self.indent_width_at(paragraph.start) else {
                return;
            };
            self.host
                .replace(TextRange::at(paragraph.start, removed), Replacement::Plain(""));
            let caret = self
                .range
                .start
                .saturating_sub(removed)
                .max(paragraph.start);
            self.set_selected_range(TextRange::caret(caret));
            return;
        }

        let starts = line_starts(self.host.buffer(), paragraph);
        let cuts: Vec<TextRange> = starts
            .iter()
            .filter_map(|start| {
                self.indent_width_at(*start)
                    .map(|width| TextRange::at(*start, width))
            })
            .collect();
        let removed: usize = cuts.iter().map(TextRange::len).sum();
        {
            let mut group = self.host.group();
            for cut in cuts.iter().rev() {
                group.replace(*cut, Replacement::Plain(""));
            }
        }
        self.set_selected_range(TextRange::new(paragraph.start, paragraph.end - removed));
    }

    /// Width of the indentation unit at a line start. A tab is preferred
    /// over spaces; lines without either give None.
    fn indent_width_at(&self, start: usize) -> Option<usize> {
        if self.host.char_at(start) == Some('\t') {
            return Some(1);
        }
        let lead = self.host.slice(TextRange::at(start, INDENT.len()))?;
        (lead == INDENT).then_some(INDENT.len())
    }

    /// A literal tab at the selection.
    ///
    /// On an empty last paragraph of a markdown note the tab opens its own
    /// line so the following text is not pulled into an indented block.
    pub fn tab_key(&mut self) {
        let Some(paragraph) = self.paragraph_range() else {
            return;
        };
        let location = self.range.start;
        let len = self.host.len_chars();
        tracing::debug!(target: "quire::format", command = "tab_key", location);

        if self.is_markdown() && (location == 0 || location == len) && paragraph.is_empty() {
            if self.host.is_empty() {
                self.host.request_rescan();
            }
            let range = self.range;
            self.insert_text(
                Replacement::Plain("\t\n"),
                Some(range),
                Some(TextRange::caret(location + 1)),
            );
            return;
        }

        self.insert_text(Replacement::Plain("\t"), None, None);
    }
}
