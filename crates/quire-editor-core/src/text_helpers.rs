//! Text navigation and analysis helpers.
//!
//! These functions work with the `TextStorage` trait to provide common
//! text operations like finding paragraph boundaries and detecting list
//! items for continuation.

use crate::markers::{ordered_prefix, space_prefix, unordered_prefix};
use crate::text::TextStorage;
use crate::types::TextRange;

/// Find start of line containing offset.
pub fn find_line_start<S: TextStorage + ?Sized>(storage: &S, offset: usize) -> usize {
    let mut pos = offset.min(storage.len_chars());
    while pos > 0 {
        if let Some('\n') = storage.char_at(pos - 1) {
            return pos;
        }
        pos -= 1;
    }
    0
}

/// Find end of line containing offset (position of newline or end of text).
pub fn find_line_end<S: TextStorage + ?Sized>(storage: &S, offset: usize) -> usize {
    let len = storage.len_chars();
    let mut pos = offset;
    while pos < len {
        if let Some('\n') = storage.char_at(pos) {
            return pos;
        }
        pos += 1;
    }
    len
}

/// Find end of paragraph containing offset, just past its line break.
pub fn find_paragraph_end<S: TextStorage + ?Sized>(storage: &S, offset: usize) -> usize {
    let end = find_line_end(storage, offset);
    if end < storage.len_chars() { end + 1 } else { end }
}

/// Split a range into the paragraphs it covers, each with its line break.
pub fn paragraphs_in<S: TextStorage + ?Sized>(storage: &S, range: TextRange) -> Vec<TextRange> {
    let mut paragraphs = Vec::new();
    let mut pos = range.start;
    loop {
        let end = find_paragraph_end(storage, pos);
        paragraphs.push(TextRange::new(pos, end));
        if end >= range.end || end == pos {
            break;
        }
        pos = end;
    }
    paragraphs
}

/// Start offset of every line in `range`.
///
/// A line break at the very end of `range` does not open a new line.
pub fn line_starts<S: TextStorage + ?Sized>(storage: &S, range: TextRange) -> Vec<usize> {
    let mut starts = vec![range.start];
    for offset in range.start..range.end {
        if storage.char_at(offset) == Some('\n') && offset + 1 < range.end {
            starts.push(offset + 1);
        }
    }
    starts
}

/// Paragraph text without its terminating line break.
pub fn paragraph_content<S: TextStorage + ?Sized>(storage: &S, paragraph: TextRange) -> String {
    let text = storage
        .slice(paragraph)
        .map(|s| s.to_string())
        .unwrap_or_default();
    match text.strip_suffix('\n') {
        Some(content) => content.to_string(),
        None => text,
    }
}

/// Describes what kind of list item a paragraph is, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum ListContext {
    /// Bullet, quote or checkbox list; `prefix` is the full lead including
    /// indentation and trailing space.
    Unordered { prefix: String },
    /// Ordered list; `digits` is the number as written, zero padding kept.
    Ordered { indent: String, digits: String },
}

impl ListContext {
    /// This item's own lead, as it appears in the text.
    pub fn lead(&self) -> String {
        match self {
            ListContext::Unordered { prefix } => prefix.clone(),
            ListContext::Ordered { indent, digits } => format!("{indent}{digits}. "),
        }
    }

    /// The lead for the next item.
    pub fn continuation(&self) -> String {
        match self {
            ListContext::Unordered { prefix } => prefix.clone(),
            ListContext::Ordered { indent, digits } => {
                format!("{indent}{}. ", next_number(digits))
            }
        }
    }

    /// Length in chars of this item's own lead.
    pub fn lead_len(&self) -> usize {
        self.lead().chars().count()
    }
}

/// The number after `digits`, padded with zeros to the same width.
fn next_number(digits: &str) -> String {
    match digits.parse::<u64>() {
        Ok(number) => format!("{:0width$}", number.saturating_add(1), width = digits.len()),
        Err(_) => digits.to_string(),
    }
}

/// Detect the list lead of the paragraph at `paragraph`.
pub fn detect_list_context<S: TextStorage + ?Sized>(
    storage: &S,
    paragraph: TextRange,
) -> Option<ListContext> {
    let text = storage.slice(paragraph)?;
    if let Some(prefix) = unordered_prefix(&text) {
        return Some(ListContext::Unordered {
            prefix: prefix.to_string(),
        });
    }
    let marker = ordered_prefix(&text)?;
    let indent = space_prefix(marker);
    let digits = marker[indent.len()..].trim_end_matches(". ");
    digits.parse::<u64>().ok()?;
    Some(ListContext::Ordered {
        indent: indent.to_string(),
        digits: digits.to_string(),
    })
}
