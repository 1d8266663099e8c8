//! Owned pixel buffers for pre-rendered text and icons.
//!
//! A [`Raster`] stores one `Option<Rgb565>` per pixel; `None` is transparent.
//! It implements `DrawTarget` itself, so anything embedded-graphics can draw
//! (mono text, primitives) can be rendered into it once and blitted many
//! times afterwards.
//!
//! # Reuse
//!
//! Departure rows repeat the same labels every frame ("5'", "(+2)", station
//! names). Each label is rendered once; every later frame blits the stored
//! pixels.

use core::convert::Infallible;

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};

/// Sparse RGB565 pixel buffer with transparency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    size: Size,
    pixels: Vec<Option<Rgb565>>,
}

impl Raster {
    /// Create a fully transparent raster.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![None; (size.width * size.height) as usize],
        }
    }

    /// Rasterize a single line of text with its top edge at y = 0.
    pub fn from_text(
        text: &str,
        font: &'static MonoFont<'static>,
        color: Rgb565,
    ) -> Self {
        let style = MonoTextStyle::new(font, color);
        let metrics = style.measure_string(text, Point::zero(), Baseline::Top);
        let mut raster = Self::new(metrics.bounding_box.size);
        Text::with_baseline(text, Point::zero(), style, Baseline::Top)
            .draw(&mut raster)
            .ok();
        raster
    }

    /// Build a raster from opaque pixels in row-major order.
    ///
    /// Returns `None` if `pixels` does not hold exactly `width * height` entries.
    pub fn from_pixels(
        width: u32,
        height: u32,
        pixels: Vec<Rgb565>,
    ) -> Option<Self> {
        if pixels.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            size: Size::new(width, height),
            pixels: pixels.into_iter().map(Some).collect(),
        })
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 { self.size.width }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 { self.size.height }

    /// Color at `point`, `None` if transparent or outside the raster.
    pub fn pixel(
        &self,
        point: Point,
    ) -> Option<Rgb565> {
        self.index(point).and_then(|idx| self.pixels[idx])
    }

    /// Number of opaque pixels.
    pub fn opaque_count(&self) -> usize { self.pixels.iter().filter(|p| p.is_some()).count() }

    /// Blit with the stored colors.
    pub fn draw<D>(
        &self,
        target: &mut D,
        top_left: Point,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        target.draw_iter(self.pixels_at(top_left, None))
    }

    /// Blit with every opaque pixel replaced by `tint`.
    ///
    /// Used for single-color text whose color changes between frames
    /// (blinking labels) without re-rasterizing.
    pub fn draw_tinted<D>(
        &self,
        target: &mut D,
        top_left: Point,
        tint: Rgb565,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        target.draw_iter(self.pixels_at(top_left, Some(tint)))
    }

    /// Copy with every channel multiplied by `factor / 255`.
    pub fn darkened(
        &self,
        factor: u8,
    ) -> Self {
        let scale = |channel: u8| (u16::from(channel) * u16::from(factor) / 255) as u8;
        Self {
            size: self.size,
            pixels: self
                .pixels
                .iter()
                .map(|px| px.map(|c| Rgb565::new(scale(c.r()), scale(c.g()), scale(c.b()))))
                .collect(),
        }
    }

    fn index(
        &self,
        point: Point,
    ) -> Option<usize> {
        let in_bounds =
            point.x >= 0 && point.y >= 0 && (point.x as u32) < self.size.width && (point.y as u32) < self.size.height;
        in_bounds.then(|| point.y as usize * self.size.width as usize + point.x as usize)
    }

    fn pixels_at(
        &self,
        top_left: Point,
        tint: Option<Rgb565>,
    ) -> impl Iterator<Item = Pixel<Rgb565>> + '_ {
        let width = self.size.width.max(1) as usize;
        self.pixels.iter().enumerate().filter_map(move |(i, px)| {
            px.map(|color| {
                let offset = Point::new((i % width) as i32, (i / width) as i32);
                Pixel(top_left + offset, tint.unwrap_or(color))
            })
        })
    }
}

impl OriginDimensions for Raster {
    fn size(&self) -> Size { self.size }
}

impl DrawTarget for Raster {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(idx) = self.index(point) {
                self.pixels[idx] = Some(color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::mono_font::ascii::FONT_6X10;

    use super::*;
    use crate::colors::{BLACK, RED, WHITE};

    #[test]
    fn test_from_text_measures_monospace_width() {
        let raster = Raster::from_text("abc", &FONT_6X10, WHITE);
        assert_eq!(raster.width(), 18, "3 glyphs x 6px");
        assert_eq!(raster.height(), 10);
        assert!(raster.opaque_count() > 0, "Glyphs should produce pixels");
    }

    #[test]
    fn test_from_text_empty() {
        let raster = Raster::from_text("", &FONT_6X10, WHITE);
        assert_eq!(raster.width(), 0);
        assert_eq!(raster.opaque_count(), 0);
    }

    #[test]
    fn test_draw_iter_ignores_out_of_bounds() {
        let mut raster = Raster::new(Size::new(4, 4));
        raster
            .draw_iter([
                Pixel(Point::new(1, 1), RED),
                Pixel(Point::new(-1, 0), RED),
                Pixel(Point::new(4, 0), RED),
            ])
            .ok();
        assert_eq!(raster.opaque_count(), 1);
        assert_eq!(raster.pixel(Point::new(1, 1)), Some(RED));
    }

    #[test]
    fn test_draw_offsets_pixels() {
        let mut source = Raster::new(Size::new(2, 2));
        source.draw_iter([Pixel(Point::new(1, 0), RED)]).ok();

        let mut target = Raster::new(Size::new(8, 8));
        source.draw(&mut target, Point::new(3, 4)).ok();
        assert_eq!(target.pixel(Point::new(4, 4)), Some(RED));
        assert_eq!(target.opaque_count(), 1);
    }

    #[test]
    fn test_draw_tinted_replaces_color() {
        let source = Raster::from_text("x", &FONT_6X10, WHITE);
        let mut target = Raster::new(source.size());
        source.draw_tinted(&mut target, Point::zero(), RED).ok();
        assert_eq!(target.opaque_count(), source.opaque_count());
        assert!(target.pixels.iter().flatten().all(|&c| c == RED));
    }

    #[test]
    fn test_darkened() {
        let source = Raster::from_pixels(1, 1, vec![WHITE]).unwrap();
        let dark = source.darkened(80);
        let c = dark.pixel(Point::zero()).unwrap();
        assert!(c.r() < WHITE.r() && c.g() < WHITE.g() && c.b() < WHITE.b());
        assert_eq!(source.darkened(0).pixel(Point::zero()), Some(BLACK));
    }

    #[test]
    fn test_from_pixels_rejects_wrong_length() {
        assert!(Raster::from_pixels(2, 2, vec![WHITE; 3]).is_none());
    }
}
