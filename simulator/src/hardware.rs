//! Desktop stand-ins for the panel, bus, button and clock.

use std::time::Instant;

use bms_dash_common::Frame;
use bms_dash_common::io::{ButtonPin, CanBus, MonotonicClock, Panel};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::SimulatorDisplay;
use heapless::Deque;

/// Depth of the simulated controller's receive FIFO.
pub const RX_FIFO_DEPTH: usize = 8;

// =============================================================================
// Panel
// =============================================================================

/// Simulator display with contrast and power-save state.
///
/// The simulator window is binary, so contrast changes are only reported on
/// the console; power save blanks the window.
pub struct SimPanel {
    display: SimulatorDisplay<BinaryColor>,
    power_save: bool,
}

impl SimPanel {
    pub fn new(size: Size) -> Self {
        Self {
            display: SimulatorDisplay::new(size),
            power_save: false,
        }
    }

    /// Frame to show in the window; blank while in power save.
    pub fn output(&mut self) -> &SimulatorDisplay<BinaryColor> {
        if self.power_save {
            self.display.clear(BinaryColor::Off).ok();
        }
        &self.display
    }
}

impl OriginDimensions for SimPanel {
    fn size(&self) -> Size { self.display.size() }
}

impl DrawTarget for SimPanel {
    type Color = BinaryColor;
    type Error = <SimulatorDisplay<BinaryColor> as DrawTarget>::Error;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels)
    }
}

impl Panel for SimPanel {
    fn set_contrast(
        &mut self,
        level: u8,
    ) {
        println!("panel: contrast {level}");
    }

    fn set_power_save(
        &mut self,
        on: bool,
    ) {
        println!("panel: power save {}", if on { "on" } else { "off" });
        self.power_save = on;
    }
}

// =============================================================================
// CAN Bus
// =============================================================================

/// Loopback bus: the fake BMS pushes into the RX FIFO, the display's
/// transmissions are collected for the BMS to read back.
#[derive(Default)]
pub struct SimBus {
    rx: Deque<Frame, RX_FIFO_DEPTH>,
    tx: Vec<Frame>,
    overruns: u32,
}

impl SimBus {
    pub fn new() -> Self { Self::default() }

    /// Deliver a frame to the display. A full FIFO drops the oldest frame.
    pub fn deliver(
        &mut self,
        frame: Frame,
    ) {
        if self.rx.is_full() {
            self.rx.pop_front();
            self.overruns += 1;
        }
        self.rx.push_back(frame).ok();
    }

    /// Frames the display transmitted since the last call.
    pub fn take_sent(&mut self) -> Vec<Frame> { std::mem::take(&mut self.tx) }

    #[inline]
    pub const fn overruns(&self) -> u32 { self.overruns }
}

impl CanBus for SimBus {
    fn receive_frame(&mut self) -> Option<Frame> { self.rx.pop_front() }

    fn send_frame(
        &mut self,
        frame: &Frame,
    ) {
        self.tx.push(*frame);
    }
}

// =============================================================================
// Button and Clock
// =============================================================================

/// Button driven by keyboard events.
#[derive(Default)]
pub struct KeyButton {
    pub down: bool,
}

impl ButtonPin for KeyButton {
    fn is_pressed(&mut self) -> bool { self.down }
}

/// Milliseconds since the simulator started.
pub struct SimClock {
    start: Instant,
}

impl SimClock {
    pub fn new() -> Self { Self { start: Instant::now() } }
}

impl MonotonicClock for SimClock {
    fn now_millis(&self) -> u64 { u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX) }
}
