//! Presentation surface abstraction.
//!
//! The frame controller draws into anything implementing [`Surface`]: the
//! desktop simulator window, the headless [`FrameBuffer`](crate::framebuffer::FrameBuffer),
//! or a panel driver.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::error::SurfaceError;

/// Result of polling input at the start of a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputPoll {
    /// Keep running.
    Continue,
    /// Window closed or quit key pressed.
    Quit,
}

impl InputPoll {
    /// True if the host loop should keep calling the controller.
    #[inline]
    pub const fn should_continue(self) -> bool { matches!(self, Self::Continue) }
}

/// A display the board can render into.
///
/// Draw errors must be `Debug` so the controller can report them as
/// [`SurfaceError::Draw`].
pub trait Surface: DrawTarget<Color = Rgb565, Error: core::fmt::Debug> {
    /// Drain pending input events.
    fn poll_input(&mut self) -> InputPoll;

    /// Show the completed frame.
    fn present(&mut self) -> Result<(), SurfaceError>;
}
