//! Animated connectivity icon.
//!
//! While the data source is live the icon loops through its frames; when
//! offline a static, darkened copy of the last frame is shown instead.
//!
//! # Frame Sources
//!
//! - [`AnimatedIcon::from_rgb565_strip`]: a horizontal strip of square
//!   big-endian RGB565 frames. Pure black pixels are transparent.
//! - [`AnimatedIcon::wifi`]: a built-in Wi-Fi glyph (dot plus growing arcs).
//!
//! An icon without frames is valid and simply draws nothing. The frame
//! controller falls back to it when a strip is malformed.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};

use crate::colors::WHITE;
use crate::config::{ICON_ANIMATION_SPEED, ICON_SIZE};
use crate::error::AssetError;
use crate::raster::Raster;

/// Channel multiplier (out of 255) for the offline frame.
pub const OFFLINE_DIM: u8 = 80;

/// Number of frames in the built-in Wi-Fi animation.
const WIFI_FRAMES: usize = 4;

/// Looping image sequence with a dimmed offline variant.
pub struct AnimatedIcon {
    frames: Vec<Raster>,
    offline: Option<Raster>,
    frame_index: usize,
    frame_counter: u32,
    speed: u32,
}

impl AnimatedIcon {
    /// Create an icon from frames, stepping every [`ICON_ANIMATION_SPEED`] ticks.
    pub fn new(frames: Vec<Raster>) -> Self { Self::with_speed(frames, ICON_ANIMATION_SPEED) }

    /// Create an icon that steps to the next frame every `speed` ticks.
    pub fn with_speed(
        frames: Vec<Raster>,
        speed: u32,
    ) -> Self {
        let offline = frames.last().map(|frame| frame.darkened(OFFLINE_DIM));
        Self {
            frames,
            offline,
            frame_index: 0,
            frame_counter: 0,
            speed: speed.max(1),
        }
    }

    /// An icon that draws nothing.
    pub fn empty() -> Self { Self::new(Vec::new()) }

    /// Decode a horizontal strip of `frame_width` x `frame_width` RGB565 frames.
    pub fn from_rgb565_strip(
        bytes: &[u8],
        frame_width: u32,
    ) -> Result<Self, AssetError> {
        if frame_width == 0 {
            return Err(AssetError::ZeroFrameWidth);
        }
        if bytes.is_empty() {
            return Err(AssetError::Empty);
        }

        let frame_bytes = frame_width
            .checked_mul(frame_width)
            .and_then(|pixels| pixels.checked_mul(2))
            .ok_or(AssetError::TooLarge { frame_width })? as usize;
        if bytes.len() % frame_bytes != 0 {
            return Err(AssetError::Misaligned {
                len: bytes.len(),
                frame_width,
            });
        }

        let count = bytes.len() / frame_bytes;
        let strip_width = frame_width as usize * count;
        let fw = frame_width as usize;
        let pixel_at = |x: usize, y: usize| {
            let i = (y * strip_width + x) * 2;
            u16::from_be_bytes([bytes[i], bytes[i + 1]])
        };

        let frames = (0..count)
            .map(|n| {
                let mut frame = Raster::new(Size::new(frame_width, frame_width));
                let pixels = (0..fw * fw).filter_map(|i| {
                    let (x, y) = (i % fw, i / fw);
                    let raw = pixel_at(n * fw + x, y);
                    (raw != 0).then(|| Pixel(Point::new(x as i32, y as i32), Rgb565::from(RawU16::new(raw))))
                });
                frame.draw_iter(pixels).ok();
                frame
            })
            .collect();

        Ok(Self::new(frames))
    }

    /// Built-in Wi-Fi animation: a dot, then one to three arcs.
    pub fn wifi() -> Self {
        let size = ICON_SIZE;
        let center = Point::new(size as i32 / 2, size as i32 - 3);
        let arc_area = Rectangle::new(Point::zero(), Size::new(size, center.y as u32 - 1));

        let frames = (0..WIFI_FRAMES)
            .map(|n| {
                let mut frame = Raster::new(Size::new(size, size));
                Circle::with_center(center, 4)
                    .into_styled(PrimitiveStyle::with_fill(WHITE))
                    .draw(&mut frame)
                    .ok();
                for arc in 1..=n as u32 {
                    Circle::with_center(center, 2 + arc * 8)
                        .into_styled(PrimitiveStyle::with_stroke(WHITE, 2))
                        .draw(&mut frame.clipped(&arc_area))
                        .ok();
                }
                frame
            })
            .collect();

        Self::new(frames)
    }

    /// Number of animation frames.
    #[inline]
    pub fn frame_count(&self) -> usize { self.frames.len() }

    /// Index of the current animation frame.
    #[inline]
    pub const fn frame_index(&self) -> usize { self.frame_index }

    /// Count one tick; step to the next frame when the counter reaches the speed.
    pub fn advance(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        self.frame_counter += 1;
        if self.frame_counter >= self.speed {
            self.frame_counter = 0;
            self.frame_index = (self.frame_index + 1) % self.frames.len();
        }
    }

    /// Frame to draw: the animated frame when live, the offline frame otherwise.
    pub fn current_frame(
        &self,
        is_live: bool,
    ) -> Option<&Raster> {
        if is_live { self.frames.get(self.frame_index) } else { self.offline.as_ref() }
    }
}

impl Default for AnimatedIcon {
    fn default() -> Self { Self::wifi() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::RED;

    fn solid_frame(color: Rgb565) -> Raster { Raster::from_pixels(2, 2, vec![color; 4]).unwrap() }

    #[test]
    fn test_advance_loops_frames() {
        let mut icon = AnimatedIcon::new(vec![solid_frame(RED), solid_frame(WHITE), solid_frame(RED)]);
        assert_eq!(icon.frame_index(), 0);
        icon.advance();
        assert_eq!(icon.frame_index(), 1);
        icon.advance();
        icon.advance();
        assert_eq!(icon.frame_index(), 0, "Index wraps around");
    }

    #[test]
    fn test_speed_throttles_animation() {
        let mut icon = AnimatedIcon::with_speed(vec![solid_frame(RED), solid_frame(WHITE)], 3);
        icon.advance();
        icon.advance();
        assert_eq!(icon.frame_index(), 0);
        icon.advance();
        assert_eq!(icon.frame_index(), 1);
    }

    #[test]
    fn test_offline_frame_is_darkened_last_frame() {
        let icon = AnimatedIcon::new(vec![solid_frame(RED), solid_frame(WHITE)]);
        let offline = icon.current_frame(false).unwrap();
        assert_eq!(offline, &solid_frame(WHITE).darkened(OFFLINE_DIM));
        assert_eq!(icon.current_frame(true).unwrap(), &solid_frame(RED));
    }

    #[test]
    fn test_empty_icon_draws_nothing() {
        let mut icon = AnimatedIcon::empty();
        icon.advance();
        assert!(icon.current_frame(true).is_none());
        assert!(icon.current_frame(false).is_none());
    }

    #[test]
    fn test_strip_decoding() {
        // Two 1x1 frames: red, then transparent black.
        let red = RED.into_storage().to_be_bytes();
        let icon = AnimatedIcon::from_rgb565_strip(&[red[0], red[1], 0, 0], 1).unwrap();
        assert_eq!(icon.frame_count(), 2);
        assert_eq!(icon.current_frame(true).unwrap().pixel(Point::zero()), Some(RED));
    }

    #[test]
    fn test_strip_errors() {
        assert_eq!(AnimatedIcon::from_rgb565_strip(&[], 20).err(), Some(AssetError::Empty));
        assert_eq!(AnimatedIcon::from_rgb565_strip(&[1, 2], 0).err(), Some(AssetError::ZeroFrameWidth));
        assert_eq!(
            AnimatedIcon::from_rgb565_strip(&[0; 7], 1).err(),
            Some(AssetError::Misaligned { len: 7, frame_width: 1 })
        );
    }

    #[test]
    fn test_strip_rejects_oversized_frame_width() {
        assert_eq!(
            AnimatedIcon::from_rgb565_strip(&[0; 8], 65_536).err(),
            Some(AssetError::TooLarge { frame_width: 65_536 })
        );
        assert_eq!(
            AnimatedIcon::from_rgb565_strip(&[0; 8], u32::MAX).err(),
            Some(AssetError::TooLarge { frame_width: u32::MAX })
        );
    }

    #[test]
    fn test_wifi_frames_grow() {
        let icon = AnimatedIcon::wifi();
        let counts: Vec<usize> = icon.frames.iter().map(Raster::opaque_count).collect();
        assert!(counts.windows(2).all(|w| w[0] < w[1]), "Each frame adds an arc: {counts:?}");
        assert!(counts[0] > 0);
    }
}
