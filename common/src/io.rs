//! Hardware seams: CAN bus, button, clock and display panel.
//!
//! Firmware and the simulator implement these; the tick loop in
//! [`crate::system`] only ever talks to the hardware through them.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::frame::Frame;

/// Non-blocking CAN interface.
pub trait CanBus {
    /// Next received frame, if one is waiting.
    fn receive_frame(&mut self) -> Option<Frame>;

    /// Queue a frame for transmission. Failures are the driver's concern.
    fn send_frame(
        &mut self,
        frame: &Frame,
    );
}

/// The single front-panel button.
pub trait ButtonPin {
    fn is_pressed(&mut self) -> bool;
}

/// Millisecond clock, monotonic from boot.
pub trait MonotonicClock {
    fn now_millis(&self) -> u64;
}

/// Monochrome display with contrast and power control.
pub trait Panel: DrawTarget<Color = BinaryColor> {
    /// Called before a page is drawn; clears the frame buffer.
    fn begin_frame(&mut self) { self.clear(BinaryColor::Off).ok(); }

    /// Called after a page is drawn; pushes the frame buffer out.
    fn end_frame(&mut self) {}

    fn set_contrast(
        &mut self,
        level: u8,
    );

    fn set_power_save(
        &mut self,
        on: bool,
    );
}
