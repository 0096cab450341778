//! Markdown wrapping commands: emphasis fences, links, code and block leads.

use crate::attributed::AttributedString;
use crate::host::EditorHost;
use crate::note::Note;
use crate::text::Replacement;
use crate::text_helpers::line_starts;
use crate::types::TextRange;

use super::TextFormatter;

impl<H: EditorHost, N: Note + ?Sized> TextFormatter<'_, H, N> {
    pub fn bold(&mut self) {
        self.wrap("bold", "**", "**", 2, 4);
    }

    pub fn italic(&mut self) {
        self.wrap("italic", "_", "_", 1, 2);
    }

    pub fn strikethrough(&mut self) {
        self.wrap("strikethrough", "~~", "~~", 2, 4);
    }

    pub fn link(&mut self) {
        self.wrap("link", "[", "]()", 1, 3);
    }

    pub fn image(&mut self) {
        self.wrap("image", "![", "]()", 2, 4);
    }

    /// Surround the selected text with `open` and `close`. The caret lands
    /// `empty_caret` past the selection start when nothing was selected,
    /// else `filled_caret` past the selection end.
    fn wrap(&mut self, command: &str, open: &str, close: &str, empty_caret: usize, filled_caret: usize) {
        if !self.is_markdown() {
            return;
        }
        tracing::debug!(target: "quire::format", command, range = ?self.range, "wrap");
        let text = format!("{open}{}{close}", self.selected.as_str());
        let caret = if self.range.is_empty() {
            self.range.start + empty_caret
        } else {
            self.range.end + filled_caret
        };
        let range = self.range;
        self.insert_text(Replacement::Plain(&text), Some(range), Some(TextRange::caret(caret)));
    }

    /// Inline code span in the code font.
    pub fn back_tick(&mut self) {
        if !self.is_markdown() {
            return;
        }
        tracing::debug!(target: "quire::format", command = "back_tick", range = ?self.range);
        self.host.request_rescan();
        let range = self.range;
        if range.is_empty() {
            self.insert_text(
                Replacement::Plain("``"),
                Some(range),
                Some(TextRange::caret(range.start + 1)),
            );
            return;
        }
        let code = self.ctx.attributed_code(&format!("`{}`", self.selected.as_str()));
        self.insert_text(Replacement::Attributed(&code), Some(range), None);
    }

    /// Fenced code block around the selection, or an empty one.
    pub fn code_block(&mut self) {
        if !self.is_markdown() {
            return;
        }
        tracing::debug!(target: "quire::format", command = "code_block", range = ?self.range);
        self.host.request_rescan();
        let range = self.range;
        if range.is_empty() {
            self.insert_text(
                Replacement::Plain("```\n\n```\n"),
                Some(range),
                Some(TextRange::caret(range.start + 4)),
            );
            return;
        }
        let mut block = AttributedString::plain("```\n");
        block.append(&self.selected);
        if !self.selected.as_str().ends_with('\n') {
            block.push_str("\n");
        }
        block.push_str("```\n");
        self.insert_text(
            Replacement::Attributed(&block),
            Some(range),
            Some(TextRange::caret(range.start + 3)),
        );
    }

    /// Heading lead `marker` at the start of the paragraph.
    pub fn header(&mut self, marker: &str) {
        if !self.is_markdown() {
            return;
        }
        let Some(paragraph) = self.paragraph_range() else {
            return;
        };
        tracing::debug!(target: "quire::format", command = "header", marker, range = ?self.range);
        let prefix = if self.paragraph_text(paragraph).starts_with('#') {
            marker.to_string()
        } else {
            format!("{marker} ")
        };
        let caret = self.range.end + prefix.chars().count();
        self.insert_text(
            Replacement::Plain(&prefix),
            Some(TextRange::caret(paragraph.start)),
            Some(TextRange::caret(caret)),
        );
    }

    /// Quote the current paragraph, or every line of the selected ones.
    pub fn quote(&mut self) {
        if !self.is_markdown() {
            return;
        }
        let Some(paragraph) = self.paragraph_range() else {
            return;
        };
        tracing::debug!(target: "quire::format", command = "quote", range = ?self.range);
        self.host.request_rescan();
        if self.range.is_empty() {
            let caret = self.range.start + 2;
            self.insert_text(
                Replacement::Plain("> "),
                Some(TextRange::caret(paragraph.start)),
                Some(TextRange::caret(caret)),
            );
            return;
        }
        let rewritten = self.prefix_lines(paragraph, "> ");
        let content_end = match self.host.char_at(rewritten.end.saturating_sub(1)) {
            Some('\n') => rewritten.end - 1,
            _ => rewritten.end,
        };
        self.set_selected_range(TextRange::caret(content_end));
    }

    /// Insert `prefix` at the start of every line of `paragraph` as one
    /// grouped edit. Returns the rewritten range.
    pub(super) fn prefix_lines(&mut self, paragraph: TextRange, prefix: &str) -> TextRange {
        let starts = line_starts(self.host.buffer(), paragraph);
        {
            let mut group = self.host.group();
            for start in starts.iter().rev() {
                group.replace(TextRange::caret(*start), Replacement::Plain(prefix));
            }
        }
        TextRange::new(
            paragraph.start,
            paragraph.end + prefix.chars().count() * starts.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::attribute::{Attribute, AttributeKey};
    use crate::formatter::testing::{Fixture, view};
    use crate::host::EditorHost;
    use crate::note::MemoryNote;
    use crate::text::TextStorage;
    use crate::types::{NoteKind, TextRange};

    #[test]
    fn test_bold_empty_selection() {
        let fixture = Fixture::new();
        let mut v = view("", TextRange::caret(0));
        fixture.run(&mut v, |f| f.bold());
        assert_eq!(v.content_string(), "****");
        assert_eq!(v.selection(), TextRange::caret(2));
    }

    #[test]
    fn test_bold_wraps_selection() {
        let fixture = Fixture::new();
        let mut v = view("say hello now", TextRange::new(4, 9));
        fixture.run(&mut v, |f| f.bold());
        assert_eq!(v.content_string(), "say **hello** now");
        assert_eq!(v.selection(), TextRange::caret(13));
    }

    #[test]
    fn test_italic_and_strikethrough() {
        let fixture = Fixture::new();
        let mut v = view("ab", TextRange::new(0, 2));
        fixture.run(&mut v, |f| f.italic());
        assert_eq!(v.content_string(), "_ab_");
        assert_eq!(v.selection(), TextRange::caret(4));

        let mut v = view("", TextRange::caret(0));
        fixture.run(&mut v, |f| f.strikethrough());
        assert_eq!(v.content_string(), "~~~~");
        assert_eq!(v.selection(), TextRange::caret(2));
    }

    #[test]
    fn test_wrapping_ignored_for_plain_text() {
        let fixture = Fixture::new();
        let note = MemoryNote::new(NoteKind::PlainText);
        let mut v = view("ab", TextRange::new(0, 2));
        fixture.run_on(&mut v, &note, |f| f.bold());
        assert_eq!(v.content_string(), "ab");
    }

    #[test]
    fn test_link_and_image() {
        let fixture = Fixture::new();
        let mut v = view("", TextRange::caret(0));
        fixture.run(&mut v, |f| f.link());
        assert_eq!(v.content_string(), "[]()");
        assert_eq!(v.selection(), TextRange::caret(1));

        let mut v = view("site", TextRange::new(0, 4));
        fixture.run(&mut v, |f| f.link());
        assert_eq!(v.content_string(), "[site]()");
        assert_eq!(v.selection(), TextRange::caret(7));

        let mut v = view("", TextRange::caret(0));
        fixture.run(&mut v, |f| f.image());
        assert_eq!(v.content_string(), "![]()");
        assert_eq!(v.selection(), TextRange::caret(2));

        let mut v = view("cat", TextRange::new(0, 3));
        fixture.run(&mut v, |f| f.image());
        assert_eq!(v.content_string(), "![cat]()");
        assert_eq!(v.selection(), TextRange::caret(7));
    }

    #[test]
    fn test_back_tick() {
        let fixture = Fixture::new();
        let mut v = view("run ls now", TextRange::new(4, 6));
        fixture.run(&mut v, |f| f.back_tick());
        assert_eq!(v.content_string(), "run `ls` now");
        assert_eq!(v.selection(), TextRange::caret(8));
        assert_eq!(
            v.buffer().attribute_at(AttributeKey::Font, 5),
            Some(&Attribute::Font(fixture.prefs.code_font()))
        );
        assert!(v.take_rescan_request());

        let mut v = view("", TextRange::caret(0));
        fixture.run(&mut v, |f| f.back_tick());
        assert_eq!(v.content_string(), "``");
        assert_eq!(v.selection(), TextRange::caret(1));
    }

    #[test]
    fn test_code_block() {
        let fixture = Fixture::new();
        let mut v = view("", TextRange::caret(0));
        fixture.run(&mut v, |f| f.code_block());
        assert_eq!(v.content_string(), "```\n\n```\n");
        assert_eq!(v.selection(), TextRange::caret(4));

        let mut v = view("x\nfn main() {}\ny", TextRange::new(2, 14));
        fixture.run(&mut v, |f| f.code_block());
        assert_eq!(v.content_string(), "x\n```\nfn main() {}\n```\n\ny");
        assert_eq!(v.selection(), TextRange::caret(5));

        let mut v = view("code\n", TextRange::new(0, 5));
        fixture.run(&mut v, |f| f.code_block());
        assert_eq!(v.content_string(), "```\ncode\n```\n");
    }

    #[test]
    fn test_header() {
        let fixture = Fixture::new();
        let mut v = view("intro\ntitle", TextRange::caret(8));
        fixture.run(&mut v, |f| f.header("#"));
        assert_eq!(v.content_string(), "intro\n# title");
        assert_eq!(v.selection(), TextRange::caret(10));

        fixture.run(&mut v, |f| f.header("#"));
        assert_eq!(v.content_string(), "intro\n## title");
        assert_eq!(v.selection(), TextRange::caret(11));
    }

    #[test]
    fn test_quote_caret() {
        let fixture = Fixture::new();
        let mut v = view("one\ntwo", TextRange::caret(5));
        fixture.run(&mut v, |f| f.quote());
        assert_eq!(v.content_string(), "one\n> two");
        assert_eq!(v.selection(), TextRange::caret(7));
    }

    #[test]
    fn test_quote_selection_keeps_trailing_break() {
        let fixture = Fixture::new();
        let mut v = view("one\ntwo\nrest", TextRange::new(1, 5));
        fixture.run(&mut v, |f| f.quote());
        assert_eq!(v.content_string(), "> one\n> two\nrest");
        assert_eq!(v.selection(), TextRange::caret(11));

        assert!(v.undo());
        assert_eq!(v.content_string(), "one\ntwo\nrest");
    }
}
