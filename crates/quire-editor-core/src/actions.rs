//! Editing commands as data.
//!
//! A `FormatAction` names one edit transformer command. Actions parse from
//! and print as short command words, so a driver can take them from the
//! command line or a key binding table.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

use crate::error::EditorError;

/// One user-facing editing command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormatAction {
    // === Markdown wrapping ===
    /// Wrap the selection in `**`.
    Bold,

    /// Wrap the selection in `_`.
    Italic,

    /// Wrap the selection in `~~`.
    Strikethrough,

    /// Wrap the selection as `[text]()`.
    Link,

    /// Wrap the selection as `![text]()`.
    Image,

    /// Inline code span.
    BackTick,

    /// Fenced code block.
    CodeBlock,

    /// Prefix lines with `> `.
    Quote,

    /// Insert a heading marker at the paragraph start.
    Header(SmolStr),

    // === Indentation ===
    Tab,
    UnTab,
    TabKey,

    // === Structure ===
    /// Return key with list and todo continuation.
    NewLine,

    /// Toggle the todo at an offset, or in the current paragraph.
    ToggleTodo(Option<usize>),

    // === Rich text ===
    ToggleBoldFont,
    ToggleItalicFont,
}

impl FormatAction {
    /// The command word, without arguments.
    pub fn name(&self) -> &'static str {
        match self {
            FormatAction::Bold => "bold",
            FormatAction::Italic => "italic",
            FormatAction::Strikethrough => "strikethrough",
            FormatAction::Link => "link",
            FormatAction::Image => "image",
            FormatAction::BackTick => "backtick",
            FormatAction::CodeBlock => "code-block",
            FormatAction::Quote => "quote",
            FormatAction::Header(_) => "header",
            FormatAction::Tab => "tab",
            FormatAction::UnTab => "untab",
            FormatAction::TabKey => "tab-key",
            FormatAction::NewLine => "newline",
            FormatAction::ToggleTodo(_) => "todo",
            FormatAction::ToggleBoldFont => "bold-font",
            FormatAction::ToggleItalicFont => "italic-font",
        }
    }

    /// Whether the command does nothing outside markdown notes.
    pub fn is_markdown_only(&self) -> bool {
        !matches!(
            self,
            FormatAction::Tab
                | FormatAction::UnTab
                | FormatAction::TabKey
                | FormatAction::NewLine
                | FormatAction::ToggleTodo(_)
                | FormatAction::ToggleBoldFont
                | FormatAction::ToggleItalicFont
        )
    }
}

impl fmt::Display for FormatAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatAction::Header(marker) => write!(f, "header:{marker}"),
            FormatAction::ToggleTodo(Some(offset)) => write!(f, "todo@{offset}"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for FormatAction {
    type Err = EditorError;

    /// Parse a command word. `header` takes an optional `:MARKER` (default
    /// `#`), `todo` an optional `@OFFSET`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || EditorError::UnknownCommand(s.to_string());

        if let Some(rest) = s.strip_prefix("header") {
            return match rest.strip_prefix(':') {
                Some(marker) if !marker.is_empty() => Ok(FormatAction::Header(marker.into())),
                None if rest.is_empty() => Ok(FormatAction::Header(SmolStr::new_static("#"))),
                _ => Err(unknown()),
            };
        }
        if let Some(rest) = s.strip_prefix("todo") {
            if rest.is_empty() {
                return Ok(FormatAction::ToggleTodo(None));
            }
            let offset = rest
                .strip_prefix('@')
                .and_then(|offset| offset.parse().ok())
                .ok_or_else(unknown)?;
            return Ok(FormatAction::ToggleTodo(Some(offset)));
        }

        let action = match s {
            "bold" => FormatAction::Bold,
            "italic" => FormatAction::Italic,
            "strikethrough" => FormatAction::Strikethrough,
            "link" => FormatAction::Link,
            "image" => FormatAction::Image,
            "backtick" => FormatAction::BackTick,
            "code-block" => FormatAction::CodeBlock,
            "quote" => FormatAction::Quote,
            "tab" => FormatAction::Tab,
            "untab" => FormatAction::UnTab,
            "tab-key" => FormatAction::TabKey,
            "newline" => FormatAction::NewLine,
            "bold-font" => FormatAction::ToggleBoldFont,
            "italic-font" => FormatAction::ToggleItalicFont,
            _ => return Err(unknown()),
        };
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_words() {
        assert_eq!("bold".parse::<FormatAction>().unwrap(), FormatAction::Bold);
        assert_eq!(
            "code-block".parse::<FormatAction>().unwrap(),
            FormatAction::CodeBlock
        );
        assert_eq!(
            "header".parse::<FormatAction>().unwrap(),
            FormatAction::Header("#".into())
        );
        assert_eq!(
            "header:###".parse::<FormatAction>().unwrap(),
            FormatAction::Header("###".into())
        );
        assert_eq!(
            "todo@12".parse::<FormatAction>().unwrap(),
            FormatAction::ToggleTodo(Some(12))
        );
    }

    #[test]
    fn test_display_parses_back() {
        for word in ["quote", "header:##", "todo", "todo@3", "italic-font"] {
            let action: FormatAction = word.parse().unwrap();
            assert_eq!(action.to_string(), word);
        }
    }

    #[test]
    fn test_unknown_commands() {
        for word in ["", "shout", "header:", "headers", "todo@", "todo@x"] {
            let err = word.parse::<FormatAction>().unwrap_err();
            assert!(matches!(err, EditorError::UnknownCommand(_)), "{word}");
        }
    }

    #[test]
    fn test_markdown_only() {
        assert!(FormatAction::Quote.is_markdown_only());
        assert!(!FormatAction::Tab.is_markdown_only());
        assert!(!FormatAction::ToggleTodo(None).is_markdown_only());
    }
}
