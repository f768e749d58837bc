//! Panel and page layout constants.
//!
//! Everything is laid out for a 128x64 monochrome OLED. Positions are
//! pre-computed as `i32` so the renderers do no per-frame arithmetic or casts.

use crate::thresholds::{BAR_SPAN, MAX_FAULT_LINES};

// =============================================================================
// Panel
// =============================================================================

/// Panel width in pixels (SSD1306/SH1106 class OLED).
pub const SCREEN_WIDTH: u32 = 128;

/// Panel height in pixels.
pub const SCREEN_HEIGHT: u32 = 64;

pub const CENTER_X: i32 = (SCREEN_WIDTH / 2) as i32;

// =============================================================================
// Status Strip
// =============================================================================

/// Height of the top strip holding the page label and status icons.
pub const STATUS_HEIGHT: u32 = 10;

/// Icon cell size; icons are drawn right to left from the top-right corner.
pub const ICON_SIZE: u32 = 8;

/// Horizontal pitch between icon cells.
pub const ICON_PITCH: i32 = ICON_SIZE as i32 + 2;

/// Left edge of the rightmost icon cell.
pub const ICON_RIGHT_X: i32 = SCREEN_WIDTH as i32 - ICON_SIZE as i32 - 1;

/// Hold-progress marker square, bottom-right corner.
pub const HOLD_MARKER_SIZE: u32 = 6;

// =============================================================================
// Gauge Page
// =============================================================================

/// SOC arc bounding circle diameter.
pub const GAUGE_DIAMETER: u32 = 48;

/// SOC arc top-left corner.
pub const GAUGE_X: i32 = 4;
pub const GAUGE_Y: i32 = STATUS_HEIGHT as i32 + 3;

/// Arc centre, used for the needle tip.
pub const GAUGE_CENTER_X: i32 = GAUGE_X + (GAUGE_DIAMETER / 2) as i32;
pub const GAUGE_CENTER_Y: i32 = GAUGE_Y + (GAUGE_DIAMETER / 2) as i32;

/// Arc start angle, degrees; 0 is 3 o'clock, positive is clockwise.
pub const GAUGE_START_DEG: f32 = 135.0;

/// Left edge of the readout column to the right of the arc.
pub const READOUT_X: i32 = GAUGE_X + GAUGE_DIAMETER as i32 + 8;

/// Top edges of the readout lines (power, voltage, current, endurance).
pub const READOUT_ROWS: [i32; 4] = [13, 25, 37, 49];

// =============================================================================
// Bars Page
// =============================================================================

/// Number of bar rows.
pub const BAR_ROWS: usize = 5;

/// Row pitch; rows start right below the status strip.
pub const BAR_ROW_HEIGHT: i32 = 10;

pub const BAR_TOP: i32 = STATUS_HEIGHT as i32 + 2;

/// Bar height inside its row.
pub const BAR_HEIGHT: u32 = 7;

/// Left edge of the bar frame, after a 3-character label.
pub const BAR_X: i32 = 20;

/// Left edge of the value text, after the bar frame.
pub const BAR_VALUE_X: i32 = BAR_X + BAR_SPAN as i32 + 4;

const _: () = assert!(BAR_TOP + BAR_ROW_HEIGHT * BAR_ROWS as i32 <= SCREEN_HEIGHT as i32);
const _: () = assert!(BAR_VALUE_X < SCREEN_WIDTH as i32);

// =============================================================================
// Diagnostics Page
// =============================================================================

/// Line pitch for the small font.
pub const DIAG_LINE_HEIGHT: i32 = 9;

/// Top edge of the first diagnostics line.
pub const DIAG_TOP: i32 = STATUS_HEIGHT as i32 + 1;

/// Lines on the diagnostics page: two summary lines, then the fault list.
pub const DIAG_LINES: usize = 6;

/// Left edge of the right-hand column on summary lines.
pub const DIAG_RIGHT_X: i32 = CENTER_X + 4;

const _: () = assert!(DIAG_TOP + DIAG_LINE_HEIGHT * DIAG_LINES as i32 <= SCREEN_HEIGHT as i32 + 1);

const _: () = assert!(GAUGE_Y + GAUGE_DIAMETER as i32 <= SCREEN_HEIGHT as i32);
const _: () = assert!(READOUT_X < SCREEN_WIDTH as i32);
const _: () = assert!(2 + MAX_FAULT_LINES <= DIAG_LINES);
