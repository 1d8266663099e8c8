//! Memoized text rasterization.
//!
//! [`RenderCache`] maps `(text, font, color)` to an owned [`Raster`]. The
//! first request for a combination rasterizes it; every later request
//! borrows the stored raster. Color is part of the key because the same
//! text in two colors is two different images.
//!
//! The cache is unbounded. A fixed board draws a small vocabulary of labels
//! (minutes, delays, captions, station names), so it stops growing once
//! every label has been seen.

use std::collections::HashMap;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::fonts::{FontBook, FontId};
use crate::raster::Raster;

/// Rasterized text keyed by font, color and text.
#[derive(Default)]
pub struct RenderCache {
    entries: HashMap<(FontId, u16), HashMap<String, Raster>>,
    hits: u64,
    misses: u64,
}

impl RenderCache {
    /// Create an empty cache.
    pub fn new() -> Self { Self::default() }

    /// Raster for `text` in `font` and `color`, rasterizing it on first use.
    pub fn get(
        &mut self,
        fonts: &FontBook,
        text: &str,
        font: FontId,
        color: Rgb565,
    ) -> &Raster {
        let by_text = self.entries.entry((font, color.into_storage())).or_default();
        if by_text.contains_key(text) {
            self.hits += 1;
        } else {
            self.misses += 1;
            by_text.insert(String::from(text), Raster::from_text(text, fonts.font(font), color));
        }
        &by_text[text]
    }

    /// Draw `text` with its top-left corner at `top_left`. Returns the text size.
    pub fn blit<D>(
        &mut self,
        fonts: &FontBook,
        target: &mut D,
        text: &str,
        font: FontId,
        color: Rgb565,
        top_left: Point,
    ) -> Result<Size, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let raster = self.get(fonts, text, font, color);
        raster.draw(target, top_left)?;
        Ok(raster.size())
    }

    /// Draw `text` so that its right edge ends at `right_x`. Returns the text size.
    #[allow(clippy::too_many_arguments)]
    pub fn blit_right<D>(
        &mut self,
        fonts: &FontBook,
        target: &mut D,
        text: &str,
        font: FontId,
        color: Rgb565,
        right_x: i32,
        top: i32,
    ) -> Result<Size, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let raster = self.get(fonts, text, font, color);
        raster.draw(target, Point::new(right_x - raster.width() as i32, top))?;
        Ok(raster.size())
    }

    /// Draw `text` horizontally centered on `center_x`. Returns the text size.
    #[allow(clippy::too_many_arguments)]
    pub fn blit_centered<D>(
        &mut self,
        fonts: &FontBook,
        target: &mut D,
        text: &str,
        font: FontId,
        color: Rgb565,
        center_x: i32,
        top: i32,
    ) -> Result<Size, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let raster = self.get(fonts, text, font, color);
        raster.draw(target, Point::new(center_x - raster.width() as i32 / 2, top))?;
        Ok(raster.size())
    }

    /// Number of cached rasters.
    pub fn len(&self) -> usize { self.entries.values().map(HashMap::len).sum() }

    /// True if nothing has been cached yet.
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Lookups served from the cache.
    #[inline]
    pub const fn hits(&self) -> u64 { self.hits }

    /// Lookups that had to rasterize.
    #[inline]
    pub const fn misses(&self) -> u64 { self.misses }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{GRAY, RED};
    use crate::fonts::FontFace;

    #[test]
    fn test_same_key_returns_same_raster() {
        let fonts = FontBook::new(FontFace::Builtin);
        let mut cache = RenderCache::new();

        let first: *const Raster = cache.get(&fonts, "Abfahrt in:", FontId::Tiny, GRAY);
        let second: *const Raster = cache.get(&fonts, "Abfahrt in:", FontId::Tiny, GRAY);
        assert!(core::ptr::eq(first, second), "Second lookup must borrow the cached raster");
        assert_eq!(cache.len(), 1);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn test_color_is_part_of_key() {
        let fonts = FontBook::new(FontFace::Builtin);
        let mut cache = RenderCache::new();

        let gray = cache.get(&fonts, "5'", FontId::Large, GRAY).clone();
        let red = cache.get(&fonts, "5'", FontId::Large, RED).clone();
        assert_eq!(cache.len(), 2);
        assert_ne!(gray, red);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_font_is_part_of_key() {
        let fonts = FontBook::new(FontFace::Builtin);
        let mut cache = RenderCache::new();

        let small = cache.get(&fonts, "Bus", FontId::Small, GRAY).width();
        let large = cache.get(&fonts, "Bus", FontId::Large, GRAY).width();
        assert_eq!(cache.len(), 2);
        assert!(large > small);
    }

    #[test]
    fn test_blit_right_aligns_to_edge() {
        let fonts = FontBook::new(FontFace::Builtin);
        let mut cache = RenderCache::new();
        let mut target = Raster::new(Size::new(100, 20));

        let size = cache.blit_right(&fonts, &mut target, "MMMM", FontId::Tiny, RED, 90, 0).unwrap();
        assert_eq!(size.width, 24);
        let xs: Vec<i32> = (0..100).filter(|&x| (0..20).any(|y| target.pixel(Point::new(x, y)).is_some())).collect();
        assert!(xs.iter().all(|&x| (66..90).contains(&x)), "Glyphs must end left of x=90");
    }
}
