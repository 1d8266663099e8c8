//! Desktop window surface.

use board_common::colors::BLACK;
use board_common::{InputPoll, Surface, SurfaceError};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};

/// Key names that stop the board.
const QUIT_KEYS: [&str; 2] = ["Escape", "Q"];

/// Simulator display plus the SDL window that shows it.
pub struct WindowSurface {
    display: SimulatorDisplay<Rgb565>,
    window: Window,
}

impl WindowSurface {
    /// Open a window of `size` display pixels, each shown as `scale` x `scale` window pixels.
    pub fn open(
        title: &str,
        size: Size,
        scale: u32,
    ) -> Self {
        let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(size);
        let output_settings = OutputSettingsBuilder::new().scale(scale.max(1)).build();
        let mut window = Window::new(title, &output_settings);

        // The window only exists after the first update; events() needs it.
        display.clear(BLACK).ok();
        window.update(&display);

        Self { display, window }
    }
}

impl OriginDimensions for WindowSurface {
    fn size(&self) -> Size { self.display.size() }
}

impl DrawTarget for WindowSurface {
    type Color = Rgb565;
    type Error = <SimulatorDisplay<Rgb565> as DrawTarget>::Error;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels)
    }

    fn fill_solid(
        &mut self,
        area: &embedded_graphics::primitives::Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.display.fill_solid(area, color)
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.display.clear(color)
    }
}

impl Surface for WindowSurface {
    fn poll_input(&mut self) -> InputPoll {
        for ev in self.window.events() {
            match ev {
                SimulatorEvent::Quit => return InputPoll::Quit,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if !repeat && QUIT_KEYS.contains(&keycode.name().as_str()) {
                        return InputPoll::Quit;
                    }
                }
                _ => {}
            }
        }
        InputPoll::Continue
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        self.window.update(&self.display);
        Ok(())
    }
}
