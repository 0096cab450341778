//! Editor preferences.
//!
//! Loaded from a TOML file; every field has a default so a partial file (or
//! none at all) is fine. `$VAR` references are replaced with environment
//! values before parsing.

use std::path::Path;
use std::{env, fs};

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::attribute::{Color, Font, FontTraits, TabStop, default_tab_stops};
use crate::error::EditorError;

/// Image width that means "use the image's natural width".
pub const IMAGE_WIDTH_UNBOUNDED: u32 = 1000;

/// Family name used when the configured body font is a system font.
pub const SYSTEM_FONT_FAMILY: &str = "system-ui";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    #[default]
    System,
    Light,
    Dark,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Preferences {
    /// Body font family; None or a name starting with `.` selects the system font.
    pub font_name: Option<String>,
    pub font_size: f32,
    pub code_font_name: String,
    pub code_font_size: f32,
    pub line_spacing: f32,
    /// Maximum display width for inline images, in pixels.
    pub image_max_width: u32,
    pub appearance: Appearance,
    /// Colour of interactive todo checkboxes, `#rrggbb`.
    pub syntax_color: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            font_name: None,
            font_size: 14.0,
            code_font_name: "Source Code Pro".into(),
            code_font_size: 14.0,
            line_spacing: 4.0,
            image_max_width: 450,
            appearance: Appearance::System,
            syntax_color: "#5f87af".into(),
        }
    }
}

impl Preferences {
    pub fn load(path: impl AsRef<Path>) -> Result<Preferences, EditorError> {
        let path = path.as_ref();
        let mut contents =
            fs::read_to_string(path).map_err(|e| EditorError::io(path, e))?;
        // substitute environment variables in preferences file
        for (k, v) in env::vars() {
            contents = contents.replace(&format!("${}", k), &v);
        }
        let prefs: Preferences = toml::from_str(&contents)?;
        tracing::debug!(
            target: "quire::prefs",
            path = %path.display(),
            font_size = prefs.font_size,
            "loaded preferences"
        );
        Ok(prefs)
    }

    /// The body font.
    pub fn note_font(&self) -> Font {
        match self.font_name.as_deref() {
            Some(name) if !name.starts_with('.') && !name.is_empty() => {
                Font::new(name, self.font_size)
            }
            _ => Font::new(SYSTEM_FONT_FAMILY, self.font_size),
        }
    }

    pub fn code_font(&self) -> Font {
        Font::new(SmolStr::new(&self.code_font_name), self.code_font_size)
            .with_traits(FontTraits::MONOSPACE)
    }

    pub fn main_text_color(&self) -> Color {
        match self.appearance {
            Appearance::Custom => Color::BLACK,
            Appearance::Dark => Color::rgb(0xdd, 0xdd, 0xdd),
            Appearance::Light | Appearance::System => Color::rgb(0x26, 0x26, 0x26),
        }
    }

    pub fn syntax_color(&self) -> Color {
        Color::from_hex(&self.syntax_color).unwrap_or(Color::rgb(0x5f, 0x87, 0xaf))
    }

    pub fn tab_stops(&self) -> Vec<TabStop> {
        default_tab_stops()
    }

    /// Maximum image width for an image of `natural_width` pixels.
    pub fn image_width_limit(&self, natural_width: u32) -> u32 {
        if self.image_max_width == IMAGE_WIDTH_UNBOUNDED {
            natural_width
        } else {
            self.image_max_width
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "font_size = 16.0\nappearance = \"dark\"").unwrap();

        let prefs = Preferences::load(file.path()).unwrap();
        assert_eq!(prefs.font_size, 16.0);
        assert_eq!(prefs.appearance, Appearance::Dark);
        assert_eq!(prefs.code_font_name, "Source Code Pro");
        assert_eq!(prefs.line_spacing, 4.0);
    }

    #[test]
    fn test_load_substitutes_environment() {
        // SAFETY: test-only variable with a unique name.
        unsafe { env::set_var("QUIRE_TEST_CODE_FONT", "Iosevka") };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "code_font_name = \"$QUIRE_TEST_CODE_FONT\"").unwrap();

        let prefs = Preferences::load(file.path()).unwrap();
        assert_eq!(prefs.code_font_name, "Iosevka");
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "font_size = \"big\"").unwrap();

        let err = Preferences::load(file.path()).unwrap_err();
        assert!(matches!(err, EditorError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Preferences::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, EditorError::Io { .. }));
    }

    #[test]
    fn test_dot_font_name_selects_system_font() {
        let prefs = Preferences {
            font_name: Some(".SFNS-Regular".into()),
            ..Default::default()
        };
        assert_eq!(prefs.note_font().family, SYSTEM_FONT_FAMILY);

        let prefs = Preferences {
            font_name: Some("Avenir".into()),
            ..Default::default()
        };
        assert_eq!(prefs.note_font().family, "Avenir");
    }

    #[test]
    fn test_image_width_limit_sentinel() {
        let prefs = Preferences {
            image_max_width: IMAGE_WIDTH_UNBOUNDED,
            ..Default::default()
        };
        assert_eq!(prefs.image_width_limit(1600), 1600);
        assert_eq!(Preferences::default().image_width_limit(1600), 450);
    }
}
