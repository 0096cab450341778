//! Shared fixtures for formatter tests.

use crate::highlight::NoopHighlighter;
use crate::host::{EditorHost, TextView};
use crate::metrics::FixedAdvanceMetrics;
use crate::note::MemoryNote;
use crate::prefs::Preferences;
use crate::todo::StandardTodoGlyphs;
use crate::types::TextRange;

use super::{FormatContext, TextFormatter};

pub(crate) struct Fixture {
    pub prefs: Preferences,
    pub glyphs: StandardTodoGlyphs,
    pub metrics: FixedAdvanceMetrics,
    pub highlighter: NoopHighlighter,
}

impl Fixture {
    pub fn new() -> Self {
        let prefs = Preferences::default();
        let glyphs = StandardTodoGlyphs::new(&prefs);
        Self {
            prefs,
            glyphs,
            metrics: FixedAdvanceMetrics::default(),
            highlighter: NoopHighlighter,
        }
    }

    pub fn ctx(&self) -> FormatContext<'_> {
        FormatContext::new(&self.prefs, &self.glyphs, &self.metrics, &self.highlighter)
    }

    /// Run one command on a markdown note and commit it.
    pub fn run(
        &self,
        view: &mut TextView,
        command: impl FnOnce(&mut TextFormatter<'_, TextView, MemoryNote>),
    ) {
        let note = MemoryNote::markdown();
        self.run_on(view, &note, command);
    }

    pub fn run_on(
        &self,
        view: &mut TextView,
        note: &MemoryNote,
        command: impl FnOnce(&mut TextFormatter<'_, TextView, MemoryNote>),
    ) {
        let mut formatter = TextFormatter::new(view, note, self.ctx());
        command(&mut formatter);
        formatter.commit().unwrap();
    }
}

/// A view over `text` with `selection` set.
pub(crate) fn view(text: &str, selection: TextRange) -> TextView {
    let mut view = TextView::with_text(text);
    assert!(view.set_selection(selection));
    view
}
