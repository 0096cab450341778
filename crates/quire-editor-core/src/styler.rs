//! Paragraph styling.
//!
//! Re-derives paragraph layout (hanging indent, tab stops, line spacing)
//! from the lead of each paragraph, and keeps fonts and inline images in
//! line with the preferences.

use std::fmt;

use crate::attribute::{Attribute, AttributeKey, AttachmentKind, ImageSize, ParagraphStyle, TextAlignment};
use crate::markers::indent_lead;
use crate::metrics::FontMetrics;
use crate::prefs::Preferences;
use crate::text::TextStorage;
use crate::text_helpers::{paragraph_content, paragraphs_in};
use crate::types::TextRange;

/// Computes and writes paragraph styles.
pub struct ParagraphStyler<'a> {
    prefs: &'a Preferences,
    metrics: &'a dyn FontMetrics,
}

impl<'a> ParagraphStyler<'a> {
    pub fn new(prefs: &'a Preferences, metrics: &'a dyn FontMetrics) -> Self {
        Self { prefs, metrics }
    }

    /// Style the paragraph lead of `content` calls for.
    pub fn style_for(&self, content: &str) -> ParagraphStyle {
        let font = self.prefs.note_font();
        let tab_stops = self.prefs.tab_stops();
        let head_indent = indent_lead(content)
            .map(|lead| self.metrics.string_width(lead, &font, &tab_stops))
            .unwrap_or(0.0);
        ParagraphStyle {
            head_indent,
            line_spacing: self.prefs.line_spacing,
            alignment: TextAlignment::Left,
            tab_stops,
        }
    }

    /// Head indent of a paragraph holding a todo checkbox.
    pub fn todo_indent(&self) -> f32 {
        let font = self.prefs.note_font();
        let space = self
            .metrics
            .string_width(" ", &font, &self.prefs.tab_stops());
        font.size + font.size / 2.0 + space
    }

    /// Restyle every paragraph touched by `range`. Returns the number of
    /// paragraphs styled.
    pub fn restyle(&self, storage: &mut dyn TextStorage, range: TextRange) -> usize {
        if range.is_empty() {
            return 0;
        }
        let len = storage.len_chars();
        let Some(scan) = storage.paragraph_range(range.clamped(len)) else {
            return 0;
        };

        let paragraphs = paragraphs_in(&*storage, scan);
        for paragraph in &paragraphs {
            let content = paragraph_content(&*storage, *paragraph);
            let mut target = TextRange::at(paragraph.start, content.chars().count());
            // An empty line is styled through its own line break.
            if target.is_empty() && target.start > 0 && target.start < len {
                target = TextRange::at(target.start, 1);
            }
            let style = self.style_for(&content);
            if tracing::enabled!(target: "quire::style", tracing::Level::TRACE) {
                tracing::trace!(
                    target: "quire::style",
                    range = ?target,
                    head_indent = style.head_indent,
                    content = %content,
                    "paragraph"
                );
            }
            storage.add_attribute(target, Attribute::ParagraphStyle(style));
        }

        let todo_paragraphs: Vec<TextRange> = storage
            .attributes()
            .runs_in(AttributeKey::Todo, scan)
            .flat_map(|(run, _)| run.to_range())
            .filter_map(|offset| storage.paragraph_range(TextRange::caret(offset)))
            .collect();
        let mut last = None;
        for paragraph in todo_paragraphs {
            if last == Some(paragraph) {
                continue;
            }
            last = Some(paragraph);
            let mut style = self.style_for("");
            style.head_indent = self.todo_indent();
            storage.add_attribute(paragraph, Attribute::ParagraphStyle(style));
        }

        tracing::debug!(
            target: "quire::style",
            range = ?scan,
            paragraphs = paragraphs.len(),
            "restyled"
        );
        paragraphs.len()
    }

    /// Rebuild every font run at the configured size, keeping family and traits.
    pub fn update_font(&self, storage: &mut dyn TextStorage) {
        let size = self.prefs.font_size;
        let runs: Vec<(TextRange, Attribute)> = storage
            .attributes()
            .runs(AttributeKey::Font)
            .iter()
            .filter_map(|run| {
                let font = run.value.as_font()?;
                Some((run.range, Attribute::Font(font.with_size(size))))
            })
            .collect();
        for (range, font) in runs {
            storage.add_attribute(range, font);
        }
    }

    /// Bound every inline image to the configured width, keeping its aspect
    /// ratio. Checkbox attachments are left alone.
    pub fn resize_attachment_images(&self, storage: &mut dyn TextStorage) {
        let images: Vec<(TextRange, Attribute)> = storage
            .attributes()
            .runs(AttributeKey::Attachment)
            .iter()
            .filter(|run| storage.attribute_at(AttributeKey::Todo, run.range.start).is_none())
            .filter_map(|run| {
                let attachment = run.value.as_attachment()?;
                let AttachmentKind::Image { natural } = attachment.kind else {
                    return None;
                };
                let display = self.bounded_size(natural)?;
                let mut attachment = attachment.clone();
                attachment.display = Some(display);
                Some((run.range, Attribute::Attachment(attachment)))
            })
            .collect();
        for (range, attachment) in images {
            storage.add_attribute(range, attachment);
            storage.add_attribute(range, Attribute::Link("".into()));
        }
    }

    fn bounded_size(&self, natural: ImageSize) -> Option<ImageSize> {
        if natural.width == 0 {
            return None;
        }
        let max_width = self.prefs.image_width_limit(natural.width);
        let ratio = max_width as f32 / natural.width as f32;
        if ratio < 1.0 {
            Some(ImageSize::new(
                max_width,
                (natural.height as f32 * ratio) as u32,
            ))
        } else {
            Some(natural)
        }
    }
}

/// One paragraph as laid out: its range, hanging indent and text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphLayout {
    pub range: TextRange,
    pub head_indent: f32,
    pub text: String,
}

impl fmt::Display for ParagraphLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} indent={} {:?}", self.range, self.head_indent, self.text)
    }
}

/// The current layout of every paragraph in `storage`.
pub fn paragraph_layout(storage: &dyn TextStorage) -> Vec<ParagraphLayout> {
    let len = storage.len_chars();
    if len == 0 {
        return Vec::new();
    }
    paragraphs_in(storage, TextRange::new(0, len))
        .into_iter()
        .map(|range| ParagraphLayout {
            range,
            head_indent: storage
                .attribute_at(AttributeKey::ParagraphStyle, range.start)
                .and_then(Attribute::as_paragraph_style)
                .map(|style| style.head_indent)
                .unwrap_or(0.0),
            text: paragraph_content(storage, range),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{Attachment, Font, FontTraits};
    use crate::metrics::FixedAdvanceMetrics;
    use crate::text::AttributedRope;

    fn render(storage: &dyn TextStorage) -> String {
        paragraph_layout(storage)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn style_at(storage: &dyn TextStorage, offset: usize) -> Option<ParagraphStyle> {
        storage
            .attribute_at(AttributeKey::ParagraphStyle, offset)
            .and_then(Attribute::as_paragraph_style)
            .cloned()
    }

    #[test]
    fn test_restyle_layout() {
        let prefs = Preferences::default();
        let metrics = FixedAdvanceMetrics::default();
        let styler = ParagraphStyler::new(&prefs, &metrics);
        let mut text = AttributedRope::from_str(
            "- item\n1. first\n    - nested\n\t> quoted\n    code\nplain\n",
        );

        let len = text.len_chars();
        let styled = styler.restyle(&mut text, TextRange::new(0, len));
        assert_eq!(styled, 6);

        insta::assert_snapshot!(render(&text), @r#"
        0..7 indent=14 "- item"
        7..16 indent=21 "1. first"
        16..29 indent=42 "    - nested"
        29..39 indent=54 "\t> quoted"
        39..48 indent=0 "    code"
        48..54 indent=0 "plain"
        "#);
    }

    #[test]
    fn test_restyle_sets_common_fields() {
        let prefs = Preferences::default();
        let metrics = FixedAdvanceMetrics::default();
        let styler = ParagraphStyler::new(&prefs, &metrics);
        let mut text = AttributedRope::from_str("plain\n");

        styler.restyle(&mut text, TextRange::new(0, 1));
        let style = style_at(&text, 0).unwrap();
        assert_eq!(style.line_spacing, prefs.line_spacing);
        assert_eq!(style.alignment, TextAlignment::Left);
        assert_eq!(style.tab_stops.len(), 25);
    }

    #[test]
    fn test_restyle_empty_range_is_noop() {
        let prefs = Preferences::default();
        let metrics = FixedAdvanceMetrics::default();
        let styler = ParagraphStyler::new(&prefs, &metrics);
        let mut text = AttributedRope::from_str("- item\n");

        assert_eq!(styler.restyle(&mut text, TextRange::caret(2)), 0);
        assert!(text.attributes().is_empty());
    }

    #[test]
    fn test_single_char_paragraph_is_not_classified() {
        let prefs = Preferences::default();
        let metrics = FixedAdvanceMetrics::default();
        let styler = ParagraphStyler::new(&prefs, &metrics);
        let mut text = AttributedRope::from_str("-\n");

        styler.restyle(&mut text, TextRange::new(0, 2));
        assert_eq!(style_at(&text, 0).map(|s| s.head_indent), Some(0.0));
    }

    #[test]
    fn test_empty_line_styled_through_line_break() {
        let prefs = Preferences::default();
        let metrics = FixedAdvanceMetrics::default();
        let styler = ParagraphStyler::new(&prefs, &metrics);
        let mut text = AttributedRope::from_str("a\n\nb");

        styler.restyle(&mut text, TextRange::new(0, 4));
        assert!(style_at(&text, 2).is_some());
    }

    #[test]
    fn test_todo_paragraph_indent_overrides_lead() {
        let prefs = Preferences::default();
        let metrics = FixedAdvanceMetrics::default();
        let styler = ParagraphStyler::new(&prefs, &metrics);
        let mut text = AttributedRope::from_str("- \u{FFFC} task\nnext\n");
        text.add_attribute(TextRange::new(2, 3), Attribute::Todo(0));

        let len = text.len_chars();
        styler.restyle(&mut text, TextRange::new(0, len));

        // 1.5 * 14 + one 7-wide space.
        assert_eq!(style_at(&text, 0).map(|s| s.head_indent), Some(28.0));
        // The whole paragraph, line break included.
        assert_eq!(style_at(&text, 8).map(|s| s.head_indent), Some(28.0));
        assert_eq!(style_at(&text, 9).map(|s| s.head_indent), Some(0.0));
    }

    #[test]
    fn test_update_font_keeps_traits() {
        let prefs = Preferences {
            font_size: 18.0,
            ..Default::default()
        };
        let metrics = FixedAdvanceMetrics::default();
        let styler = ParagraphStyler::new(&prefs, &metrics);
        let mut text = AttributedRope::from_str("bold plain");
        let bold = Font::new("Avenir", 12.0).with_traits(FontTraits::BOLD);
        text.add_attribute(TextRange::new(0, 4), Attribute::Font(bold));
        text.add_attribute(TextRange::new(4, 10), Attribute::Font(Font::new("Avenir", 12.0)));

        styler.update_font(&mut text);

        let font = text.attribute_at(AttributeKey::Font, 0).and_then(Attribute::as_font).unwrap();
        assert_eq!(font.size, 18.0);
        assert!(font.is_bold());
        assert_eq!(font.family, "Avenir");
        let font = text.attribute_at(AttributeKey::Font, 6).and_then(Attribute::as_font).unwrap();
        assert_eq!(font.size, 18.0);
        assert!(!font.is_bold());
    }

    #[test]
    fn test_resize_attachment_images() {
        let prefs = Preferences {
            image_max_width: 400,
            ..Default::default()
        };
        let metrics = FixedAdvanceMetrics::default();
        let styler = ParagraphStyler::new(&prefs, &metrics);
        let mut text = AttributedRope::from_str("\u{FFFC}\u{FFFC}\u{FFFC}");
        let wide = Attachment::image("wide.png", ImageSize::new(800, 600));
        let small = Attachment::image("small.png", ImageSize::new(200, 100));
        text.add_attribute(TextRange::new(0, 1), Attribute::Attachment(wide));
        text.add_attribute(TextRange::new(1, 2), Attribute::Attachment(small));
        text.add_attribute(TextRange::new(2, 3), Attribute::Attachment(Attachment::checkbox(false)));
        text.add_attribute(TextRange::new(2, 3), Attribute::Todo(0));

        styler.resize_attachment_images(&mut text);

        let display = |offset| {
            text.attribute_at(AttributeKey::Attachment, offset)
                .and_then(Attribute::as_attachment)
                .and_then(|a| a.display)
        };
        assert_eq!(display(0), Some(ImageSize::new(400, 300)));
        assert_eq!(display(1), Some(ImageSize::new(200, 100)));
        assert_eq!(display(2), None);
        assert_eq!(
            text.attribute_at(AttributeKey::Link, 0),
            Some(&Attribute::Link("".into()))
        );
        assert_eq!(text.attribute_at(AttributeKey::Link, 2), None);
    }
}
