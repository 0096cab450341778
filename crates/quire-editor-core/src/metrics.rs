//! Text measurement.

use unicode_width::UnicodeWidthChar;

use crate::attribute::{Font, TabStop};

/// Measures rendered text.
pub trait FontMetrics {
    /// Horizontal advance of `ch` in `font`.
    fn advance(&self, ch: char, font: &Font) -> f32;

    /// Rendered width of `text`; a tab advances to the next stop after the
    /// current position, or by one interval past the last stop.
    fn string_width(&self, text: &str, font: &Font, tabs: &[TabStop]) -> f32 {
        text.chars().fold(0.0, |x, ch| {
            if ch == '\t' {
                next_tab_stop(x, tabs)
            } else {
                x + self.advance(ch, font)
            }
        })
    }
}

fn next_tab_stop(x: f32, tabs: &[TabStop]) -> f32 {
    match tabs.iter().find(|tab| tab.location > x) {
        Some(tab) => tab.location,
        None => {
            let interval = match tabs {
                [.., a, b] => b.location - a.location,
                [only] => only.location,
                [] => crate::attribute::TAB_INTERVAL,
            };
            x + interval
        }
    }
}

/// Every column is `ratio` of the point size wide; wide characters take two
/// columns, zero-width ones none.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvanceMetrics {
    pub ratio: f32,
}

impl Default for FixedAdvanceMetrics {
    fn default() -> Self {
        Self { ratio: 0.5 }
    }
}

impl FontMetrics for FixedAdvanceMetrics {
    fn advance(&self, ch: char, font: &Font) -> f32 {
        let columns = ch.width().unwrap_or(0) as f32;
        columns * font.size * self.ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::default_tab_stops;

    #[test]
    fn test_fixed_advance_width() {
        let metrics = FixedAdvanceMetrics::default();
        let font = Font::new("Mono", 16.0);
        assert_eq!(metrics.string_width("1. ", &font, &[]), 24.0);
        assert_eq!(metrics.advance('界', &font), 16.0);
    }

    #[test]
    fn test_tab_jumps_to_next_stop() {
        let metrics = FixedAdvanceMetrics::default();
        let font = Font::new("Mono", 16.0);
        let tabs = default_tab_stops();
        assert_eq!(metrics.string_width("\t- ", &font, &tabs), 56.0);
        assert_eq!(metrics.string_width("abcde\t", &font, &tabs), 80.0);
    }
}
