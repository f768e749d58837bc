//! Diagnostics page: temperatures, pack health, bus counters and faults.
//!
//! ```text
//! DIAG                  [icons]
//! --------------------------------
//! T 31/22C       SOH 98%
//! CYC 412        RX 1234 E0
//! CELL VOLTAGE LOW
//! RELAY FAILSAFE
//! ```

use core::fmt::Write;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use heapless::{String, Vec};

use super::PageView;
use crate::config::layout::{DIAG_LINE_HEIGHT, DIAG_RIGHT_X, DIAG_TOP};
use crate::derive::active_faults;
use crate::styles::{SMALL_STYLE, TOP_LEFT};
use crate::telemetry::RecordKind;
use crate::thresholds::MAX_FAULT_LINES;

const fn line_y(line: usize) -> i32 { DIAG_TOP + DIAG_LINE_HEIGHT * line as i32 }

pub fn draw_diagnostics_page<D>(
    display: &mut D,
    view: &PageView<'_>,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    let snapshot = view.snapshot;
    let diag = &snapshot.diagnostics;
    let cells = &snapshot.cells;
    let diag_cold = snapshot.is_cold(RecordKind::DiagnosticFlags);
    let cells_cold = snapshot.is_cold(RecordKind::CellExtremes);

    // Summary line 0: temperatures and state of health
    let mut s: String<16> = String::new();
    if diag_cold {
        let _ = write!(s, "T --");
    } else {
        let _ = write!(s, "T {}/{}C", diag.temp_high_c, diag.temp_low_c);
    }
    draw_line(display, &s, 0, line_y(0));

    let mut s: String<16> = String::new();
    if cells_cold {
        let _ = write!(s, "SOH --");
    } else {
        let _ = write!(s, "SOH {}%", cells.health_percent);
    }
    draw_line(display, &s, DIAG_RIGHT_X, line_y(0));

    // Summary line 1: cycle count and bus counters
    let mut s: String<16> = String::new();
    if cells_cold {
        let _ = write!(s, "CYC --");
    } else {
        let _ = write!(s, "CYC {}", cells.cycle_count);
    }
    draw_line(display, &s, 0, line_y(1));

    let mut s: String<16> = String::new();
    let _ = write!(s, "RX {} E{}", view.stats.decoded, view.stats.malformed);
    draw_line(display, &s, DIAG_RIGHT_X, line_y(1));

    // Fault list
    if diag_cold {
        draw_line(display, "FAULTS --", 0, line_y(2));
        return;
    }
    let labels: Vec<&str, MAX_FAULT_LINES> = active_faults(diag);
    if labels.is_empty() {
        draw_line(display, "NO FAULTS", 0, line_y(2));
    }
    for (i, label) in labels.iter().enumerate() {
        draw_line(display, label, 0, line_y(2 + i));
    }
}

fn draw_line<D>(
    display: &mut D,
    text: &str,
    x: i32,
    y: i32,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_text_style(text, Point::new(x, y), SMALL_STYLE, TOP_LEFT)
        .draw(display)
        .ok();
}
