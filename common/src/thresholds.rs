//! Centralized threshold and calibration configuration.
//!
//! All thresholds are compile-time constants with validation assertions, so a
//! mis-ordered edit (e.g. `MEDIUM_HOLD_MS < DEBOUNCE_FLOOR_MS`) fails the build
//! instead of producing a dead gesture.
//!
//! # Usage
//!
//! ```ignore
//! use bms_dash_common::thresholds::{LOW_SOC_HALF_PERCENT, SOC_BAR};
//! ```

use crate::derive::BarCalibration;

// =============================================================================
// Button Hold Thresholds
// =============================================================================

/// Releases shorter than this are contact bounce and produce no gesture.
pub const DEBOUNCE_FLOOR_MS: u64 = 200;

/// Hold time separating a short press (page advance) from a medium hold
/// (contrast cycle).
pub const MEDIUM_HOLD_MS: u64 = 500;

/// Long-hold threshold on builds with the fault-clear output.
pub const LONG_HOLD_FAULT_CLEAR_MS: u64 = 1500;

/// Long-hold threshold on builds where a long hold turns the display off.
pub const LONG_HOLD_PAGE_RESET_MS: u64 = 2000;

const _: () = assert!(DEBOUNCE_FLOOR_MS < MEDIUM_HOLD_MS);
const _: () = assert!(MEDIUM_HOLD_MS < LONG_HOLD_FAULT_CLEAR_MS);
const _: () = assert!(MEDIUM_HOLD_MS < LONG_HOLD_PAGE_RESET_MS);

// =============================================================================
// Display Contrast
// =============================================================================

/// Contrast levels cycled by a medium hold, lowest first.
pub const CONTRAST_LEVELS: [u8; 3] = [80, 160, 255];

const _: () = assert!(CONTRAST_LEVELS[0] < CONTRAST_LEVELS[1]);
const _: () = assert!(CONTRAST_LEVELS[1] < CONTRAST_LEVELS[2]);

// =============================================================================
// Derived-Value Limits
// =============================================================================

/// Below this magnitude (0.2 A) the endurance estimate is reported unknown.
pub const ENDURANCE_MIN_CURRENT_DECIAMPS: u16 = 2;

/// Endurance clock ceiling, in minutes (99:59).
pub const ENDURANCE_MAX_MINUTES: u32 = 99 * 60 + 59;

/// Low-SOC warning below 20 % (value in half-percent units).
pub const LOW_SOC_HALF_PERCENT: u8 = 40;

/// Full charge in half-percent units.
pub const FULL_SOC_HALF_PERCENT: u8 = 200;

const _: () = assert!(ENDURANCE_MIN_CURRENT_DECIAMPS > 0);
const _: () = assert!(LOW_SOC_HALF_PERCENT < FULL_SOC_HALF_PERCENT);

/// Maximum number of fault labels listed on the diagnostics page.
pub const MAX_FAULT_LINES: usize = 4;

// =============================================================================
// Bar Calibrations
// =============================================================================

/// Pixel width of every bar on the bars page.
pub const BAR_SPAN: u32 = 64;

/// State of charge, percent.
pub const SOC_BAR: BarCalibration = BarCalibration::new(0.0, 100.0, BAR_SPAN);

/// Pack current magnitude, amps.
pub const CURRENT_BAR: BarCalibration = BarCalibration::new(0.0, 150.0, BAR_SPAN);

/// Cell voltage (used for both extremes), volts.
pub const CELL_BAR: BarCalibration = BarCalibration::new(2.8, 4.2, BAR_SPAN);

/// Highest pack temperature, degrees C.
pub const TEMP_BAR: BarCalibration = BarCalibration::new(-20.0, 60.0, BAR_SPAN);

/// SOC gauge arc; span is the sweep in degrees.
pub const SOC_ARC: BarCalibration = BarCalibration::new(0.0, 100.0, 270);

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::assertions_on_constants)] // Intentional runtime mirror of the const checks
mod tests {
    use super::*;

    #[test]
    fn test_hold_threshold_ordering() {
        assert!(DEBOUNCE_FLOOR_MS < MEDIUM_HOLD_MS);
        assert!(MEDIUM_HOLD_MS < LONG_HOLD_FAULT_CLEAR_MS);
        assert!(LONG_HOLD_FAULT_CLEAR_MS <= LONG_HOLD_PAGE_RESET_MS);
    }

    #[test]
    fn test_contrast_levels_ascending() {
        assert!(CONTRAST_LEVELS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_endurance_ceiling_is_99_59() {
        assert_eq!(ENDURANCE_MAX_MINUTES / 60, 99);
        assert_eq!(ENDURANCE_MAX_MINUTES % 60, 59);
    }

    #[test]
    fn test_calibrations_are_not_degenerate() {
        for cal in [SOC_BAR, CURRENT_BAR, CELL_BAR, TEMP_BAR, SOC_ARC] {
            assert!(cal.max > cal.min);
            assert!(cal.span > 0);
        }
    }

    #[test]
    fn test_soc_arc_full_sweep() {
        assert_eq!(SOC_ARC.fill(100.0), 270);
        assert_eq!(SOC_ARC.fill(50.0), 135);
    }
}
