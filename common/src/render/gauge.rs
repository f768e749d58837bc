//! Gauge page: SOC arc with power and endurance readouts.
//!
//! ```text
//! GAUGE                 [icons]
//! --------------------------------
//!    .--.       400W
//!   / 50%\      40.0V
//!   \    /      10.0A
//!    `  '       TTE 05:00
//! ```

use core::fmt::Write;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Arc, Circle};
use embedded_graphics::text::Text;
use heapless::String;

use super::PageView;
use crate::config::layout::{
    GAUGE_CENTER_X,
    GAUGE_CENTER_Y,
    GAUGE_DIAMETER,
    GAUGE_START_DEG,
    GAUGE_X,
    GAUGE_Y,
    READOUT_ROWS,
    READOUT_X,
};
use crate::derive::{Endurance, FlowDirection, endurance, power_watts};
use crate::styles::{ARC_TRACK, ARC_VALUE, FILLED, READOUT_STYLE, TOP_CENTERED, TOP_LEFT, VALUE_STYLE};
use crate::telemetry::RecordKind;
use crate::thresholds::SOC_ARC;

/// Radius of the needle tip path, inside the thick value stroke.
const TIP_RADIUS: f32 = (GAUGE_DIAMETER / 2) as f32 - 2.0;

pub fn draw_gauge_page<D>(
    display: &mut D,
    view: &PageView<'_>,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    let pack = &view.snapshot.pack;
    let cold = view.snapshot.is_cold(RecordKind::PackElectrical);

    let sweep = if cold { 0 } else { SOC_ARC.fill(pack.soc_percent()) };
    draw_soc_arc(display, sweep);

    let mut soc: String<8> = String::new();
    if cold {
        let _ = write!(soc, "--");
    } else {
        let _ = write!(soc, "{:.0}%", pack.soc_percent());
    }
    Text::with_text_style(&soc, Point::new(GAUGE_CENTER_X, GAUGE_CENTER_Y - 7), VALUE_STYLE, TOP_CENTERED)
        .draw(display)
        .ok();

    let mut lines: [String<12>; 4] = Default::default();
    if cold {
        for line in &mut lines {
            let _ = write!(line, "--");
        }
    } else {
        let _ = write!(lines[0], "{:.0}W", power_watts(pack));
        let _ = write!(lines[1], "{:.1}V", pack.voltage());
        let _ = write!(lines[2], "{:.1}A", pack.current());
        let _ = write_endurance(&mut lines[3], endurance(pack));
    }
    for (line, y) in lines.iter().zip(READOUT_ROWS) {
        Text::with_text_style(line, Point::new(READOUT_X, y), READOUT_STYLE, TOP_LEFT)
            .draw(display)
            .ok();
    }
}

/// Track over the full sweep, thick value arc over `sweep` degrees, and a
/// dot at the value end.
fn draw_soc_arc<D>(
    display: &mut D,
    sweep: u32,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    let top_left = Point::new(GAUGE_X, GAUGE_Y);
    Arc::new(top_left, GAUGE_DIAMETER, GAUGE_START_DEG.deg(), (SOC_ARC.span as f32).deg())
        .into_styled(ARC_TRACK)
        .draw(display)
        .ok();

    if sweep == 0 {
        return;
    }
    Arc::new(top_left, GAUGE_DIAMETER, GAUGE_START_DEG.deg(), (sweep as f32).deg())
        .into_styled(ARC_VALUE)
        .draw(display)
        .ok();

    let end = (GAUGE_START_DEG + sweep as f32).to_radians();
    let tip = Point::new(
        GAUGE_CENTER_X + (TIP_RADIUS * micromath::F32(end).cos().0) as i32,
        GAUGE_CENTER_Y + (TIP_RADIUS * micromath::F32(end).sin().0) as i32,
    );
    Circle::with_center(tip, 5).into_styled(FILLED).draw(display).ok();
}

/// "TTE hh:mm" while discharging, "TTF hh:mm" while charging.
fn write_endurance<const N: usize>(
    out: &mut String<N>,
    estimate: Endurance,
) -> core::fmt::Result {
    match estimate {
        Endurance::Remaining {
            direction: FlowDirection::Charging,
            ..
        } => write!(out, "TTF {estimate}"),
        _ => write!(out, "TTE {estimate}"),
    }
}
