//! quire-editor-core: the editing core of a markdown and rich-text notes app.
//!
//! This crate provides:
//! - `TextStorage` trait for attributed text storage, with `AttributedRope`
//! - `UndoableBuffer` - grouped undo/redo over any storage
//! - `EditorHost` trait and the field-based `TextView` host
//! - `ParagraphStyler` - paragraph indentation, tab stops and line spacing
//! - `TextFormatter` - the editing commands, one transaction per command
//! - `FormatAction` and `execute_action` for driving commands as data

pub mod actions;
pub mod attribute;
pub mod attributed;
pub mod error;
pub mod execute;
pub mod formatter;
pub mod highlight;
pub mod host;
pub mod markers;
pub mod metrics;
pub mod note;
pub mod prefs;
pub mod styler;
pub mod text;
pub mod text_helpers;
pub mod todo;
pub mod types;
pub mod undo;

pub use actions::FormatAction;
pub use attribute::{
    Attachment, AttachmentKind, Attribute, AttributeKey, Color, Font, FontTraits, ImageSize,
    ParagraphStyle, TabStop, TextAlignment,
};
pub use attributed::{AttributeStore, AttributedString};
pub use error::EditorError;
pub use execute::{apply_action, execute_action};
pub use formatter::{FormatContext, TextFormatter};
pub use highlight::{Highlighter, NoopHighlighter};
pub use host::{EditGroup, EditorHost, TextView};
pub use metrics::{FixedAdvanceMetrics, FontMetrics};
pub use note::{MemoryNote, Note};
pub use prefs::{Appearance, Preferences};
pub use smol_str::SmolStr;
pub use styler::{ParagraphLayout, ParagraphStyler, paragraph_layout};
pub use text::{AttributedRope, Replacement, TextStorage};
pub use todo::{StandardTodoGlyphs, TodoGlyphs};
pub use types::{NoteKind, TextRange};
pub use undo::{UndoManager, UndoableBuffer};
