//! Headless in-memory surface.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PointsIter, Rectangle};

use crate::colors::BLACK;
use crate::error::SurfaceError;
use crate::surface::{InputPoll, Surface};

/// Dense RGB565 frame buffer.
///
/// Presents by counting frames. A quit can be queued with
/// [`request_quit`](Self::request_quit) and is reported by the next
/// [`poll_input`](Surface::poll_input).
pub struct FrameBuffer {
    size: Size,
    pixels: Vec<Rgb565>,
    quit_requested: bool,
    presented: u64,
}

impl FrameBuffer {
    /// Create a black frame buffer.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![BLACK; (size.width * size.height) as usize],
            quit_requested: false,
            presented: 0,
        }
    }

    /// Color at `point`, `None` outside the buffer.
    pub fn pixel(
        &self,
        point: Point,
    ) -> Option<Rgb565> {
        self.index(point).map(|idx| self.pixels[idx])
    }

    /// Count pixels of `color` inside `area`.
    pub fn count_in(
        &self,
        area: &Rectangle,
        color: Rgb565,
    ) -> usize {
        area.points().filter(|&p| self.pixel(p) == Some(color)).count()
    }

    /// Count pixels that are not `background` inside `area`.
    pub fn count_non(
        &self,
        area: &Rectangle,
        background: Rgb565,
    ) -> usize {
        area.points().filter(|&p| self.pixel(p).is_some_and(|c| c != background)).count()
    }

    /// Make the next input poll report [`InputPoll::Quit`].
    pub fn request_quit(&mut self) { self.quit_requested = true; }

    /// Frames presented so far.
    #[inline]
    pub const fn presented(&self) -> u64 { self.presented }

    fn index(
        &self,
        point: Point,
    ) -> Option<usize> {
        let in_bounds =
            point.x >= 0 && point.y >= 0 && (point.x as u32) < self.size.width && (point.y as u32) < self.size.height;
        in_bounds.then(|| point.y as usize * self.size.width as usize + point.x as usize)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size { self.size }
}

impl DrawTarget for FrameBuffer {
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
                self.pixels[idx] = color;
            }
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

impl Surface for FrameBuffer {
    fn poll_input(&mut self) -> InputPoll {
        if self.quit_requested { InputPoll::Quit } else { InputPoll::Continue }
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        self.presented += 1;
        Ok(())
    }
}
