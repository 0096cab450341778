//! Markdown paragraph lead detection.
//!
//! Recognizes the leads that drive list continuation and paragraph
//! indentation: bullets, quotes, checkbox items and ordered-list numbers.
//! All returned prefixes are substrings of the input starting at 0.

use std::sync::LazyLock;

use regex::Regex;

/// Bullet, quote or markdown checkbox lead, including indentation and the
/// trailing space. The checkbox form is tried first.
static UNORDERED_LEAD: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?:[ \t]*- \[[x ]*\] )|^(?:[ \t]*[-–—*•>+] )").ok()
});

/// Ordered-list lead: indentation, digits, a dot and one space.
static ORDERED_LEAD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?:[ \t]*[0-9]+\. )").ok());

/// Markdown checkbox written out as text.
static CHECKBOX_TEXT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"- \[([x ])\]").ok());

fn leading_match<'a>(regex: &LazyLock<Option<Regex>>, text: &'a str) -> Option<&'a str> {
    let regex = regex.as_ref()?;
    regex.find(text).map(|m| &text[..m.end()])
}

/// Unordered or checkbox lead at the start of `text`.
pub fn unordered_prefix(text: &str) -> Option<&str> {
    leading_match(&UNORDERED_LEAD, text)
}

/// Ordered-list lead at the start of `text`, as used for list continuation.
pub fn ordered_prefix(text: &str) -> Option<&str> {
    leading_match(&ORDERED_LEAD, text)
}

/// A `- [ ]` or `- [x]` run somewhere in `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckboxText {
    /// Char offset of the run within the text.
    pub offset: usize,
    /// Length of the run in chars (always 5).
    pub len: usize,
    pub checked: bool,
}

/// Find the first markdown checkbox written as text.
pub fn find_checkbox_text(text: &str) -> Option<CheckboxText> {
    let regex = CHECKBOX_TEXT.as_ref()?;
    let captures = regex.captures(text)?;
    let whole = captures.get(0)?;
    let checked = captures.get(1).is_some_and(|m| m.as_str() == "x");
    Some(CheckboxText {
        offset: text[..whole.start()].chars().count(),
        len: whole.as_str().chars().count(),
        checked,
    })
}

/// Ordered-list marker used for paragraph indentation.
///
/// Needs at least one digit and then a single dot, with whitespace allowed
/// anywhere before completion. Returns everything up to and including the
/// first whitespace after the dot. A second dot or any other character
/// before that point is no match.
pub fn number_list_prefix(paragraph: &str) -> Option<&str> {
    let mut digits = false;
    let mut dot = false;
    for (index, ch) in paragraph.char_indices() {
        if ch.is_whitespace() {
            if dot {
                return Some(&paragraph[..index + ch.len_utf8()]);
            }
        } else if ch.is_ascii_digit() {
            digits = true;
        } else if ch == '.' && digits && !dot {
            dot = true;
        } else {
            return None;
        }
    }
    None
}

/// The leading run of spaces and tabs.
pub fn space_prefix(text: &str) -> &str {
    let end = text
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(text.len());
    &text[..end]
}

/// The leading run of `ch`, or None if `text` does not start with it.
pub fn leading_run(text: &str, ch: char) -> Option<&str> {
    let end = text.find(|c: char| c != ch).unwrap_or(text.len());
    (end > 0).then(|| &text[..end])
}

/// The lead that determines a paragraph's hanging indent, if the paragraph
/// is a list, quote or indented block.
///
/// Returns `Some("")` for a paragraph that is indented but carries no
/// recognized marker: it is still a structured paragraph, with zero indent.
pub fn indent_lead(paragraph: &str) -> Option<&str> {
    if paragraph.chars().count() <= 1 {
        return None;
    }
    const MARKERS: [&str; 4] = ["* ", "- ", "+ ", "> "];
    let ordered = number_list_prefix(paragraph);
    let structured = paragraph.starts_with("    ")
        || paragraph.starts_with('\t')
        || MARKERS.iter().any(|marker| paragraph.starts_with(marker))
        || ordered.is_some();
    if !structured {
        return None;
    }
    if let Some(ordered) = ordered {
        return Some(ordered);
    }

    let indent = space_prefix(paragraph);
    let rest = &paragraph[indent.len()..];
    let indented = MARKERS
        .iter()
        .find(|marker| rest.starts_with(*marker))
        .map(|marker| &paragraph[..indent.len() + marker.len()]);
    let bare = MARKERS
        .iter()
        .find(|marker| paragraph.starts_with(*marker))
        .map(|marker| &paragraph[..marker.len()]);
    Some(indented.or(bare).unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unordered_prefix() {
        assert_eq!(unordered_prefix("- item"), Some("- "));
        assert_eq!(unordered_prefix("\t* item"), Some("\t* "));
        assert_eq!(unordered_prefix("> quote"), Some("> "));
        assert_eq!(unordered_prefix("• dot"), Some("• "));
        assert_eq!(unordered_prefix("  - [ ] task"), Some("  - [ ] "));
        assert_eq!(unordered_prefix("- [x] done"), Some("- [x] "));
        assert_eq!(unordered_prefix("-item"), None);
        assert_eq!(unordered_prefix("text - item"), None);
    }

    #[test]
    fn test_ordered_prefix() {
        assert_eq!(ordered_prefix("1. first"), Some("1. "));
        assert_eq!(ordered_prefix("  42. answer"), Some("  42. "));
        assert_eq!(ordered_prefix("1.first"), None);
        assert_eq!(ordered_prefix("a. first"), None);
    }

    #[test]
    fn test_number_list_prefix() {
        assert_eq!(number_list_prefix("1. first"), Some("1. "));
        assert_eq!(number_list_prefix("  12.\tx"), Some("  12.\t"));
        assert_eq!(number_list_prefix("1 . spaced"), Some("1 . "));
        assert_eq!(number_list_prefix("1.2. nested"), None);
        assert_eq!(number_list_prefix("a1. letter"), None);
        assert_eq!(number_list_prefix(". dot"), None);
        assert_eq!(number_list_prefix("1."), None);
    }

    #[test]
    fn test_find_checkbox_text() {
        assert_eq!(
            find_checkbox_text("ab - [ ] task"),
            Some(CheckboxText {
                offset: 3,
                len: 5,
                checked: false
            })
        );
        assert_eq!(find_checkbox_text("- [x] done").map(|c| c.checked), Some(true));
        assert_eq!(find_checkbox_text("- [] nope"), None);
    }

    #[test]
    fn test_indent_lead() {
        assert_eq!(indent_lead("- item"), Some("- "));
        assert_eq!(indent_lead("    - nested"), Some("    - "));
        assert_eq!(indent_lead("\t> quoted"), Some("\t> "));
        assert_eq!(indent_lead("    code"), Some(""));
        assert_eq!(indent_lead("3. third"), Some("3. "));
        assert_eq!(indent_lead("plain"), None);
        assert_eq!(indent_lead("-"), None);
    }

    #[test]
    fn test_leading_run() {
        assert_eq!(leading_run("\t\tx", '\t'), Some("\t\t"));
        assert_eq!(leading_run("x", '\t'), None);
        assert_eq!(space_prefix(" \t x"), " \t ");
    }
}
