//! TrueType font embedded for the visitor's name.
//!
//! The fixed certificate texts use the standard PDF fonts. Names can contain
//! any script, so they are drawn with glyphs from a real font file.

use std::fmt;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};

use super::ExportError;

/// Fonts tried when no font is configured, in order.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub struct NameFont {
    data: Vec<u8>,
    font: Font,
    name: String,
}

impl NameFont {
    /// Parse a TrueType font. `name` becomes the PDF base font name.
    pub fn from_bytes(data: Vec<u8>, name: &str) -> Result<Self, ExportError> {
        let font = Font::from_bytes(data.as_slice(), FontSettings::default())
            .map_err(|e| ExportError::Font(format!("{}: {}", name, e)))?;
        let name: String = name.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        Ok(Self {
            data,
            font,
            name: if name.is_empty() {
                "NameFont".to_string()
            } else {
                name
            },
        })
    }

    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let data = std::fs::read(path)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(data, &stem)
    }

    /// First usable font among the usual system locations.
    pub fn discover() -> Option<Self> {
        SYSTEM_FONTS.iter().map(PathBuf::from).find_map(|path| {
            if !path.is_file() {
                return None;
            }
            match Self::load(&path) {
                Ok(font) => {
                    log::debug!("Name font: {}", path.display());
                    Some(font)
                }
                Err(e) => {
                    log::warn!("Skipping font {}: {}", path.display(), e);
                    None
                }
            }
        })
    }

    /// `configured` if given, otherwise a system font.
    pub fn load_or_discover(configured: Option<&Path>) -> Option<Self> {
        match configured {
            Some(path) => match Self::load(path) {
                Ok(font) => Some(font),
                Err(e) => {
                    log::warn!("Cannot use font {}: {}", path.display(), e);
                    Self::discover()
                }
            },
            None => Self::discover(),
        }
    }

    pub fn base_name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Glyph id for `c`; 0 (.notdef) when the font lacks it.
    pub fn glyph(&self, c: char) -> u16 {
        self.font.lookup_glyph_index(c)
    }

    pub fn has_glyph(&self, c: char) -> bool {
        self.glyph(c) != 0
    }

    /// Advance width of `glyph` in 1/1000 em.
    pub fn advance(&self, glyph: u16) -> f32 {
        self.font.metrics_indexed(glyph, 1000.0).advance_width
    }

    /// Width of `text` at `size` points.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars()
            .map(|c| self.advance(self.glyph(c)))
            .sum::<f32>()
            * size
            / 1000.0
    }

    /// (ascent, descent) in 1/1000 em; descent is negative.
    pub fn vertical_metrics(&self) -> (f32, f32) {
        self.font
            .horizontal_line_metrics(1000.0)
            .map(|m| (m.ascent, m.descent))
            .unwrap_or((800.0, -200.0))
    }
}

impl fmt::Debug for NameFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameFont")
            .field("name", &self.name)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_a_font_error() {
        let result = NameFont::from_bytes(vec![0u8; 16], "Broken");
        assert!(matches!(result, Err(ExportError::Font(_))));
    }

    #[test]
    fn test_missing_configured_font_falls_back() {
        // Never panics, whether or not the system has a font
        let font = NameFont::load_or_discover(Some(Path::new("/no/such/font.ttf")));
        assert_eq!(font.is_some(), NameFont::discover().is_some());
    }

    #[test]
    fn test_system_font_covers_names() {
        let Some(font) = NameFont::discover() else {
            eprintln!("no system font found; skipping");
            return;
        };
        assert!(font.has_glyph('A'));
        assert!(font.text_width("Aino", 20.0) > 0.0);
        assert!(!font.base_name().is_empty());
        let (ascent, descent) = font.vertical_metrics();
        assert!(ascent > 0.0 && descent <= 0.0);
    }
}
