//! Page renderers.
//!
//! Every renderer is generic over a monochrome [`DrawTarget`] and draws from
//! a [`PageView`] built once per tick. Draw errors are ignored per call.
//! Nothing here mutates telemetry; the only state touched is the fault
//! baseline, and only by the diagnostics page.

pub mod bars;
pub mod diagnostics;
pub mod gauge;
pub mod primitives;
pub mod status;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::derive::{FaultBaseline, StatusIcons};
use crate::input::GestureEvent;
use crate::pages::Page;
use crate::store::TelemetrySnapshot;
use crate::system::BusStats;

/// Everything a page needs for one render pass.
#[derive(Clone, Copy, Debug)]
pub struct PageView<'a> {
    pub snapshot: &'a TelemetrySnapshot,
    pub icons: StatusIcons,
    pub stats: &'a BusStats,
    /// Gesture a release right now would produce.
    pub pending: GestureEvent,
}

/// Draw `page` into `display`. Does nothing for [`Page::Off`].
///
/// Rendering the diagnostics page acknowledges the current fault sum.
pub fn render_page<D>(
    display: &mut D,
    page: Page,
    view: &PageView<'_>,
    baseline: &mut FaultBaseline,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    match page {
        Page::Off => return,
        Page::Gauge => gauge::draw_gauge_page(display, view),
        Page::Bars => bars::draw_bars_page(display, view),
        Page::Diagnostics => {
            diagnostics::draw_diagnostics_page(display, view);
            baseline.acknowledge(view.snapshot.diagnostics.fault_sum());
        }
    }
    status::draw_status_strip(display, page, &view.icons);
    status::draw_hold_marker(display, view.pending);
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use core::convert::Infallible;

    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::*;

    use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
    use crate::io::Panel;

    const W: usize = SCREEN_WIDTH as usize;
    const H: usize = SCREEN_HEIGHT as usize;

    /// 128x64 in-memory panel that records pixels and control calls.
    pub struct RecordingPanel {
        pixels: [[bool; W]; H],
        pub contrast_calls: std::vec::Vec<u8>,
        pub power_save_calls: std::vec::Vec<bool>,
        pub frames_begun: u32,
        pub frames_ended: u32,
    }

    impl RecordingPanel {
        pub fn new() -> Self {
            Self {
                pixels: [[false; W]; H],
                contrast_calls: std::vec::Vec::new(),
                power_save_calls: std::vec::Vec::new(),
                frames_begun: 0,
                frames_ended: 0,
            }
        }

        pub fn lit_count(&self) -> usize { self.pixels.iter().flatten().filter(|&&p| p).count() }

        /// Lit pixels on row `y` in `x0..x1`.
        pub fn lit_in_row(
            &self,
            y: usize,
            x0: usize,
            x1: usize,
        ) -> usize {
            self.pixels[y][x0..x1.min(W)].iter().filter(|&&p| p).count()
        }

        pub fn lit_in_rect(
            &self,
            top_left: Point,
            size: Size,
        ) -> usize {
            let x0 = top_left.x.max(0) as usize;
            let y0 = top_left.y.max(0) as usize;
            let x1 = (x0 + size.width as usize).min(W);
            let y1 = (y0 + size.height as usize).min(H);
            (y0..y1).map(|y| self.lit_in_row(y, x0, x1)).sum()
        }

        pub fn is_lit(
            &self,
            x: usize,
            y: usize,
        ) -> bool {
            self.pixels[y][x]
        }
    }

    impl OriginDimensions for RecordingPanel {
        fn size(&self) -> Size { Size::new(SCREEN_WIDTH, SCREEN_HEIGHT) }
    }

    impl DrawTarget for RecordingPanel {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(
            &mut self,
            pixels: I,
        ) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(p, color) in pixels {
                if (0..W as i32).contains(&p.x) && (0..H as i32).contains(&p.y) {
                    self.pixels[p.y as usize][p.x as usize] = color.is_on();
                }
            }
            Ok(())
        }
    }

    impl Panel for RecordingPanel {
        fn begin_frame(&mut self) {
            self.clear(BinaryColor::Off).ok();
            self.frames_begun += 1;
        }

        fn end_frame(&mut self) { self.frames_ended += 1; }

        fn set_contrast(
            &mut self,
            level: u8,
        ) {
            self.contrast_calls.push(level);
        }

        fn set_power_save(
            &mut self,
            on: bool,
        ) {
            self.power_save_calls.push(on);
        }
    }
}
