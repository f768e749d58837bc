//! Bars page: one calibrated horizontal bar per reading.

use core::fmt::Write;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use heapless::String;

use super::PageView;
use super::primitives::draw_bar;
use crate::config::layout::{BAR_HEIGHT, BAR_ROW_HEIGHT, BAR_ROWS, BAR_TOP, BAR_VALUE_X, BAR_X};
use crate::derive::BarCalibration;
use crate::store::TelemetrySnapshot;
use crate::styles::{SMALL_STYLE, TOP_LEFT};
use crate::telemetry::RecordKind;
use crate::thresholds::{CELL_BAR, CURRENT_BAR, SOC_BAR, TEMP_BAR};

/// One row of the bars page.
struct BarRow {
    label: &'static str,
    /// Slot the value comes from; a cold slot shows an empty bar and `--`.
    source: RecordKind,
    calibration: BarCalibration,
    value: fn(&TelemetrySnapshot) -> f32,
    /// Bar shows the magnitude, text keeps the sign.
    magnitude: bool,
    unit: &'static str,
    decimals: usize,
}

const ROWS: [BarRow; BAR_ROWS] = [
    BarRow {
        label: "SOC",
        source: RecordKind::PackElectrical,
        calibration: SOC_BAR,
        value: |s| s.pack.soc_percent(),
        magnitude: false,
        unit: "%",
        decimals: 0,
    },
    BarRow {
        label: "AMP",
        source: RecordKind::PackElectrical,
        calibration: CURRENT_BAR,
        value: |s| s.pack.current(),
        magnitude: true,
        unit: "A",
        decimals: 1,
    },
    BarRow {
        label: "CLO",
        source: RecordKind::CellExtremes,
        calibration: CELL_BAR,
        value: |s| s.cells.low_cell_voltage(),
        magnitude: false,
        unit: "V",
        decimals: 3,
    },
    BarRow {
        label: "CHI",
        source: RecordKind::CellExtremes,
        calibration: CELL_BAR,
        value: |s| s.cells.high_cell_voltage(),
        magnitude: false,
        unit: "V",
        decimals: 3,
    },
    BarRow {
        label: "TMP",
        source: RecordKind::DiagnosticFlags,
        calibration: TEMP_BAR,
        value: |s| f32::from(s.diagnostics.temp_high_c),
        magnitude: false,
        unit: "C",
        decimals: 0,
    },
];

pub fn draw_bars_page<D>(
    display: &mut D,
    view: &PageView<'_>,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    let mut y = BAR_TOP;
    for row in &ROWS {
        draw_row(display, row, view.snapshot, y);
        y += BAR_ROW_HEIGHT;
    }
}

fn draw_row<D>(
    display: &mut D,
    row: &BarRow,
    snapshot: &TelemetrySnapshot,
    y: i32,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_text_style(row.label, Point::new(0, y), SMALL_STYLE, TOP_LEFT)
        .draw(display)
        .ok();

    let mut text: String<10> = String::new();
    let fill = if snapshot.is_cold(row.source) {
        let _ = write!(text, "--");
        0
    } else {
        let value = (row.value)(snapshot);
        let _ = write!(text, "{:.*}{}", row.decimals, value, row.unit);
        let bar_value = if row.magnitude { micromath::F32(value).abs().0 } else { value };
        row.calibration.fill(bar_value)
    };

    draw_bar(display, BAR_X, y, row.calibration.span, BAR_HEIGHT, fill);
    Text::with_text_style(&text, Point::new(BAR_VALUE_X, y), SMALL_STYLE, TOP_LEFT)
        .draw(display)
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::RecordingPanel;
    use crate::store::TelemetryStore;
    use crate::system::BusStats;
    use crate::telemetry::{CellExtremes, PackElectrical, TelemetryRecord};
    use crate::thresholds::BAR_SPAN;

    fn draw(snapshot: &TelemetrySnapshot) -> RecordingPanel {
        let stats = BusStats::default();
        let view = PageView {
            snapshot,
            icons: Default::default(),
            stats: &stats,
            pending: Default::default(),
        };
        let mut panel = RecordingPanel::new();
        draw_bars_page(&mut panel, &view);
        panel
    }

    /// Lit pixels inside bar `index`, on its middle row, frame excluded.
    fn fill_of(
        panel: &RecordingPanel,
        index: usize,
    ) -> usize {
        let y = (BAR_TOP + BAR_ROW_HEIGHT * index as i32) as usize + BAR_HEIGHT as usize / 2;
        let x0 = BAR_X as usize + 1;
        panel.lit_in_row(y, x0, x0 + BAR_SPAN as usize)
    }

    #[test]
    fn test_cold_store_shows_empty_bars() {
        let panel = draw(&TelemetrySnapshot::COLD);
        for i in 0..BAR_ROWS {
            assert_eq!(fill_of(&panel, i), 0);
        }
    }

    #[test]
    fn test_soc_and_current_fill() {
        let mut store = TelemetryStore::new();
        store.update(TelemetryRecord::PackElectrical(PackElectrical {
            voltage_decivolts: 400,
            current_deciamps: -2000,
            soc_half_percent: 100,
        }));
        let panel = draw(&store.snapshot());
        assert_eq!(fill_of(&panel, 0), 32);
        // 200 A charging: magnitude past the top of the scale
        assert_eq!(fill_of(&panel, 1), BAR_SPAN as usize);
        assert_eq!(fill_of(&panel, 2), 0);
    }

    #[test]
    fn test_out_of_range_cell_clamped() {
        let mut store = TelemetryStore::new();
        store.update(TelemetryRecord::CellExtremes(CellExtremes {
            low_cell_100uv: 10_000,
            high_cell_100uv: 50_000,
            ..CellExtremes::default()
        }));
        let panel = draw(&store.snapshot());
        assert_eq!(fill_of(&panel, 2), 0);
        assert_eq!(fill_of(&panel, 3), BAR_SPAN as usize);
    }
}
