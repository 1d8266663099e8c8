//! Font selection.
//!
//! The board uses four text sizes. [`FontBook`] maps each [`FontId`] to a
//! concrete `MonoFont` of the configured face:
//!
//! | FontId | `profont`  | `builtin` (ISO-8859-1) |
//! |--------|------------|------------------------|
//! | Tiny   | 10 pt      | 6x10                   |
//! | Small  | 14 pt      | 7x13                   |
//! | Medium | 18 pt      | 9x18                   |
//! | Large  | 24 pt      | 10x20                  |
//!
//! The builtin face ships with embedded-graphics and is always available,
//! so an unknown face name never prevents a frame from being drawn.

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::mono_font::iso_8859_1::{FONT_6X10, FONT_7X13, FONT_9X18, FONT_10X20};
use profont::{PROFONT_10_POINT, PROFONT_14_POINT, PROFONT_18_POINT, PROFONT_24_POINT};
use tracing::warn;

// =============================================================================
// Font Tables
// =============================================================================

/// ProFont sizes indexed by [`FontId`].
const PROFONT_FONTS: [&MonoFont<'static>; 4] =
    [&PROFONT_10_POINT, &PROFONT_14_POINT, &PROFONT_18_POINT, &PROFONT_24_POINT];

/// Builtin ISO-8859-1 sizes indexed by [`FontId`].
const BUILTIN_FONTS: [&MonoFont<'static>; 4] = [&FONT_6X10, &FONT_7X13, &FONT_9X18, &FONT_10X20];

/// Logical text size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontId {
    /// Staleness readout, badge captions, legend.
    Tiny,
    /// Title, clock, walking hint, direction labels.
    Small,
    /// Station names.
    Medium,
    /// Departure times.
    Large,
}

/// Available font faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFace {
    ProFont,
    Builtin,
}

impl FontFace {
    /// Look up a face by its configuration name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "profont" => Some(Self::ProFont),
            "builtin" | "default" => Some(Self::Builtin),
            _ => None,
        }
    }
}

/// Resolves [`FontId`]s to fonts of one face.
#[derive(Clone, Copy, Debug)]
pub struct FontBook {
    face: FontFace,
    fell_back: bool,
}

impl FontBook {
    /// Create a font book for a known face.
    pub const fn new(face: FontFace) -> Self { Self { face, fell_back: false } }

    /// Create a font book from a configured face name.
    ///
    /// Unknown names fall back to [`FontFace::Builtin`]; the fallback is
    /// logged once here and reported by [`fell_back`](Self::fell_back).
    pub fn from_name(name: &str) -> Self {
        match FontFace::from_name(name) {
            Some(face) => Self::new(face),
            None => {
                warn!(face = name, "font face unavailable, using builtin font");
                Self {
                    face: FontFace::Builtin,
                    fell_back: true,
                }
            }
        }
    }

    /// Face in use.
    #[inline]
    pub const fn face(&self) -> FontFace { self.face }

    /// True if the configured face was unavailable.
    #[inline]
    pub const fn fell_back(&self) -> bool { self.fell_back }

    /// Font for `id` in this book's face.
    pub const fn font(
        &self,
        id: FontId,
    ) -> &'static MonoFont<'static> {
        match self.face {
            FontFace::ProFont => PROFONT_FONTS[id as usize],
            FontFace::Builtin => BUILTIN_FONTS[id as usize],
        }
    }
}

impl Default for FontBook {
    fn default() -> Self { Self::new(FontFace::ProFont) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_names() {
        assert_eq!(FontFace::from_name("profont"), Some(FontFace::ProFont));
        assert_eq!(FontFace::from_name(" ProFont "), Some(FontFace::ProFont));
        assert_eq!(FontFace::from_name("builtin"), Some(FontFace::Builtin));
        assert_eq!(FontFace::from_name("Helvetica"), None);
    }

    #[test]
    fn test_unknown_face_falls_back_to_builtin() {
        let book = FontBook::from_name("Helvetica");
        assert!(book.fell_back());
        assert_eq!(book.face(), FontFace::Builtin);
        assert_eq!(book.font(FontId::Tiny).character_size.width, 6);
    }

    #[test]
    fn test_sizes_increase() {
        for book in [FontBook::new(FontFace::ProFont), FontBook::new(FontFace::Builtin)] {
            let heights: Vec<u32> = [FontId::Tiny, FontId::Small, FontId::Medium, FontId::Large]
                .iter()
                .map(|&id| book.font(id).character_size.height)
                .collect();
            assert!(heights.windows(2).all(|w| w[0] < w[1]), "Font sizes must grow: {heights:?}");
        }
    }
}
