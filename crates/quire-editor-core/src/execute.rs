//! Action execution against an editor host.
//!
//! `execute_action` dispatches a [`FormatAction`] to the matching
//! [`TextFormatter`] command. `apply_action` runs one whole transaction:
//! build the formatter on the live selection, execute, commit.

use crate::actions::FormatAction;
use crate::error::EditorError;
use crate::formatter::{FormatContext, TextFormatter};
use crate::host::EditorHost;
use crate::note::Note;

/// Execute an action on a formatter.
///
/// This is the central dispatch point for all editing commands.
pub fn execute_action<H: EditorHost, N: Note + ?Sized>(
    formatter: &mut TextFormatter<'_, H, N>,
    action: &FormatAction,
) {
    match action {
        FormatAction::Bold => formatter.bold(),
        FormatAction::Italic => formatter.italic(),
        FormatAction::Strikethrough => formatter.strikethrough(),
        FormatAction::Link => formatter.link(),
        FormatAction::Image => formatter.image(),
        FormatAction::BackTick => formatter.back_tick(),
        FormatAction::CodeBlock => formatter.code_block(),
        FormatAction::Quote => formatter.quote(),
        FormatAction::Header(marker) => formatter.header(marker),
        FormatAction::Tab => formatter.tab(),
        FormatAction::UnTab => formatter.untab(),
        FormatAction::TabKey => formatter.tab_key(),
        FormatAction::NewLine => formatter.new_line(),
        FormatAction::ToggleTodo(location) => formatter.toggle_todo(*location),
        FormatAction::ToggleBoldFont => formatter.toggle_bold_font(),
        FormatAction::ToggleItalicFont => formatter.toggle_italic_font(),
    }
}

/// Run `action` as one edit transaction on `host`.
pub fn apply_action<H: EditorHost, N: Note + ?Sized>(
    host: &mut H,
    note: &N,
    ctx: FormatContext<'_>,
    action: &FormatAction,
) -> Result<(), EditorError> {
    let mut formatter = TextFormatter::new(host, note, ctx);
    execute_action(&mut formatter, action);
    formatter.commit()
}
