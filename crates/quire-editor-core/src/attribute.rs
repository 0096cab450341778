//! Style attributes carried by runs of text.
//!
//! Every character position in the storage can carry at most one value per
//! [`AttributeKey`]. Values are plain data: fonts are described, not loaded,
//! and attachments reference their content by id.

use bitflags::bitflags;
use smol_str::SmolStr;

bitflags! {
    /// Symbolic font traits preserved when a font is rebuilt at a new size.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontTraits: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const MONOSPACE = 1 << 2;
    }
}

/// A font description: family, point size and traits.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: SmolStr,
    pub size: f32,
    pub traits: FontTraits,
}

impl Font {
    pub fn new(family: impl Into<SmolStr>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            traits: FontTraits::empty(),
        }
    }

    pub fn with_traits(mut self, traits: FontTraits) -> Self {
        self.traits = traits;
        self
    }

    /// The same face at another point size.
    pub fn with_size(&self, size: f32) -> Self {
        Self {
            family: self.family.clone(),
            size,
            traits: self.traits,
        }
    }

    pub fn is_bold(&self) -> bool {
        self.traits.contains(FontTraits::BOLD)
    }

    pub fn is_italic(&self) -> bool {
        self.traits.contains(FontTraits::ITALIC)
    }

    pub fn toggled(&self, trait_flag: FontTraits) -> Self {
        Self {
            family: self.family.clone(),
            size: self.size,
            traits: self.traits ^ trait_flag,
        }
    }
}

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextAlignment {
    #[default]
    Natural,
    Left,
    Right,
    Center,
}

/// A left-aligned tab stop at a fixed location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabStop {
    pub location: f32,
    pub alignment: TextAlignment,
}

/// Number of tab stops in every generated set.
pub const TAB_STOP_COUNT: usize = 25;

/// Distance between consecutive tab stops.
pub const TAB_INTERVAL: f32 = 40.0;

/// The fixed tab stop set: 25 left stops at multiples of 40.
pub fn default_tab_stops() -> Vec<TabStop> {
    (1..=TAB_STOP_COUNT)
        .map(|index| TabStop {
            location: TAB_INTERVAL * index as f32,
            alignment: TextAlignment::Left,
        })
        .collect()
}

/// Paragraph-level layout carried by every character of a paragraph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParagraphStyle {
    pub head_indent: f32,
    pub line_spacing: f32,
    pub alignment: TextAlignment,
    pub tab_stops: Vec<TabStop>,
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// What an attachment character renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// A checkbox glyph for a todo item.
    Checkbox { checked: bool },
    /// An image with its natural pixel size.
    Image { natural: ImageSize },
}

/// An inline attachment occupying one character (U+FFFC).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attachment {
    pub id: SmolStr,
    pub kind: AttachmentKind,
    /// The size of the rendering cell, once computed.
    pub display: Option<ImageSize>,
}

impl Attachment {
    pub fn image(id: impl Into<SmolStr>, natural: ImageSize) -> Self {
        Self {
            id: id.into(),
            kind: AttachmentKind::Image { natural },
            display: None,
        }
    }

    pub fn checkbox(checked: bool) -> Self {
        let id = if checked { "checkbox-checked" } else { "checkbox-unchecked" };
        Self {
            id: SmolStr::new_static(id),
            kind: AttachmentKind::Checkbox { checked },
            display: None,
        }
    }
}

/// Identifies one attribute slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKey {
    Font,
    ForegroundColor,
    Strikethrough,
    ParagraphStyle,
    Todo,
    Attachment,
    Link,
}

impl AttributeKey {
    pub const ALL: [AttributeKey; 7] = [
        AttributeKey::Font,
        AttributeKey::ForegroundColor,
        AttributeKey::Strikethrough,
        AttributeKey::ParagraphStyle,
        AttributeKey::Todo,
        AttributeKey::Attachment,
        AttributeKey::Link,
    ];

    /// Keys that belong to one specific character and must never spread to
    /// text typed next to it.
    pub fn is_character_bound(self) -> bool {
        matches!(
            self,
            AttributeKey::Todo | AttributeKey::Attachment | AttributeKey::Link
        )
    }
}

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Font(Font),
    ForegroundColor(Color),
    /// Strikethrough style; 0 means none.
    Strikethrough(u8),
    ParagraphStyle(ParagraphStyle),
    /// Todo marker state; 0 is unchecked, anything else checked.
    Todo(u8),
    Attachment(Attachment),
    Link(SmolStr),
}

impl Attribute {
    pub fn key(&self) -> AttributeKey {
        match self {
            Attribute::Font(_) => AttributeKey::Font,
            Attribute::ForegroundColor(_) => AttributeKey::ForegroundColor,
            Attribute::Strikethrough(_) => AttributeKey::Strikethrough,
            Attribute::ParagraphStyle(_) => AttributeKey::ParagraphStyle,
            Attribute::Todo(_) => AttributeKey::Todo,
            Attribute::Attachment(_) => AttributeKey::Attachment,
            Attribute::Link(_) => AttributeKey::Link,
        }
    }

    pub fn as_font(&self) -> Option<&Font> {
        match self {
            Attribute::Font(font) => Some(font),
            _ => None,
        }
    }

    pub fn as_todo(&self) -> Option<u8> {
        match self {
            Attribute::Todo(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_attachment(&self) -> Option<&Attachment> {
        match self {
            Attribute::Attachment(attachment) => Some(attachment),
            _ => None,
        }
    }

    pub fn as_paragraph_style(&self) -> Option<&ParagraphStyle> {
        match self {
            Attribute::ParagraphStyle(style) => Some(style),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tab_stops() {
        let tabs = default_tab_stops();
        assert_eq!(tabs.len(), 25);
        assert_eq!(tabs[0].location, 40.0);
        assert_eq!(tabs[24].location, 1000.0);
        assert!(tabs.iter().all(|t| t.alignment == TextAlignment::Left));
    }

    #[test]
    fn test_font_toggle_preserves_other_traits() {
        let font = Font::new("Avenir", 14.0).with_traits(FontTraits::ITALIC);
        let bold = font.toggled(FontTraits::BOLD);
        assert!(bold.is_bold());
        assert!(bold.is_italic());
        assert!(!bold.toggled(FontTraits::BOLD).is_bold());
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#ff8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::from_hex("ff8000"), None);
        assert_eq!(Color::from_hex("#ff80"), None);
    }

    #[test]
    fn test_character_bound_keys() {
        assert!(AttributeKey::Todo.is_character_bound());
        assert!(AttributeKey::Attachment.is_character_bound());
        assert!(!AttributeKey::Font.is_character_bound());
        assert!(!AttributeKey::ParagraphStyle.is_character_bound());
    }
}
