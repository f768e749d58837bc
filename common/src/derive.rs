//! Derived values computed from a telemetry snapshot.
//!
//! Everything here is a pure function of a [`TelemetrySnapshot`] (plus the
//! [`FaultBaseline`] for the wrench icon). Page renderers only ever draw the
//! values produced by this module.
//!
//! # Edge cases
//!
//! - Endurance at near-zero current is [`Endurance::Unknown`], never a
//!   division by zero. It is computed in integer minutes, so `inf`/`NaN`
//!   cannot occur at all.
//! - Bar fills are clamped to `[0, span]` for every input, including NaN and
//!   values outside the calibration range.
//! - Cold slots read as zeros; the low-SOC icon ignores a cold pack slot.

use core::fmt;

use heapless::Vec;

use crate::store::TelemetrySnapshot;
use crate::telemetry::{DiagnosticFlags, PackElectrical, RecordKind, Relay};
use crate::thresholds::{
    ENDURANCE_MAX_MINUTES,
    ENDURANCE_MIN_CURRENT_DECIAMPS,
    FULL_SOC_HALF_PERCENT,
    LOW_SOC_HALF_PERCENT,
};

// =============================================================================
// Power and Current Direction
// =============================================================================

/// Pack power in watts, always positive.
///
/// `|current_deciamps| / 10 * voltage_decivolts / 10`; the sign of the
/// current only picks the charge/discharge icon.
pub fn power_watts(pack: &PackElectrical) -> f32 {
    f32::from(pack.current_deciamps.unsigned_abs()) / 10.0 * f32::from(pack.voltage_decivolts) / 10.0
}

/// Direction of pack current.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowDirection {
    #[default]
    Idle,
    Charging,
    Discharging,
}

impl FlowDirection {
    pub const fn of(pack: &PackElectrical) -> Self {
        if pack.current_deciamps > 0 {
            Self::Discharging
        } else if pack.current_deciamps < 0 {
            Self::Charging
        } else {
            Self::Idle
        }
    }
}

// =============================================================================
// Endurance
// =============================================================================

/// Time until empty (discharging) or full (charging).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Endurance {
    /// Current too close to zero for a meaningful estimate.
    Unknown,
    Remaining { direction: FlowDirection, minutes: u32 },
}

impl Endurance {
    /// Estimate in hours, `None` when unknown.
    pub fn hours(&self) -> Option<f32> {
        match self {
            Self::Unknown => None,
            Self::Remaining { minutes, .. } => Some(*minutes as f32 / 60.0),
        }
    }

    /// `(hours, minutes)` for the clock readout, saturated at 99:59.
    pub fn clock(&self) -> Option<(u32, u32)> {
        match self {
            Self::Unknown => None,
            Self::Remaining { minutes, .. } => {
                let m = (*minutes).min(ENDURANCE_MAX_MINUTES);
                Some((m / 60, m % 60))
            }
        }
    }
}

impl fmt::Display for Endurance {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.clock() {
            Some((h, m)) => write!(f, "{h:02}:{m:02}"),
            None => f.write_str("--:--"),
        }
    }
}

/// Endurance estimate from SOC and instantaneous current.
///
/// Discharging: `soc_half_percent / amps` hours. Charging:
/// `(200 - soc_half_percent) / amps` hours. Below
/// [`ENDURANCE_MIN_CURRENT_DECIAMPS`] the result is [`Endurance::Unknown`].
pub fn endurance(pack: &PackElectrical) -> Endurance {
    let deciamps = pack.current_deciamps.unsigned_abs();
    if deciamps < ENDURANCE_MIN_CURRENT_DECIAMPS {
        return Endurance::Unknown;
    }

    let direction = FlowDirection::of(pack);
    let budget = match direction {
        FlowDirection::Discharging => u32::from(pack.soc_half_percent),
        _ => u32::from(FULL_SOC_HALF_PERCENT.saturating_sub(pack.soc_half_percent)),
    };

    // hours = budget / (deciamps / 10), so minutes = 600 * budget / deciamps
    Endurance::Remaining {
        direction,
        minutes: 600 * budget / u32::from(deciamps),
    }
}

// =============================================================================
// Bar Fill
// =============================================================================

/// Linear mapping from a physical range onto a pixel span.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BarCalibration {
    pub min: f32,
    pub max: f32,
    pub span: u32,
}

impl BarCalibration {
    pub const fn new(
        min: f32,
        max: f32,
        span: u32,
    ) -> Self {
        Self { min, max, span }
    }

    /// Pixels per unit; zero for a degenerate range.
    #[inline]
    pub fn scale(&self) -> f32 {
        if self.max > self.min {
            self.span as f32 / (self.max - self.min)
        } else {
            0.0
        }
    }

    /// Filled length for `value`, always within `[0, span]`.
    pub fn fill(
        &self,
        value: f32,
    ) -> u32 {
        let raw = (value - self.min) * self.scale();
        if raw.is_nan() || raw <= 0.0 {
            0
        } else if raw >= self.span as f32 {
            self.span
        } else {
            raw as u32
        }
    }
}

// =============================================================================
// Fault Flags
// =============================================================================

/// One named bit of a flag register.
#[derive(Clone, Copy, Debug)]
pub struct Flag<T> {
    pub mask: T,
    pub label: &'static str,
}

/// Fault code bits of [`DiagnosticFlags::fault_bits`], in display order.
pub const FAULT_FLAGS: [Flag<u16>; 16] = [
    Flag { mask: 0x0001, label: "DISCHARGE LIMIT" },
    Flag { mask: 0x0002, label: "CHARGER SAFETY" },
    Flag { mask: 0x0004, label: "INTERNAL HARDWARE" },
    Flag { mask: 0x0008, label: "HEATSINK THERMISTOR" },
    Flag { mask: 0x0010, label: "INTERNAL SOFTWARE" },
    Flag { mask: 0x0020, label: "CELL VOLTAGE HIGH" },
    Flag { mask: 0x0040, label: "CELL VOLTAGE LOW" },
    Flag { mask: 0x0080, label: "PACK TOO HOT" },
    Flag { mask: 0x0100, label: "INTERNAL COMMS" },
    Flag { mask: 0x0200, label: "BALANCING STUCK" },
    Flag { mask: 0x0400, label: "WEAK CELL" },
    Flag { mask: 0x0800, label: "LOW CELL VOLTAGE" },
    Flag { mask: 0x1000, label: "OPEN WIRING" },
    Flag { mask: 0x2000, label: "CURRENT SENSOR" },
    Flag { mask: 0x4000, label: "CELL OVER 5V" },
    Flag { mask: 0x8000, label: "CELL ASIC" },
];

/// Defined bits of [`DiagnosticFlags::bms_status_bits`].
pub const STATUS_FLAGS: [Flag<u8>; 4] = [
    Flag { mask: 0x01, label: "VOLTAGE FAILSAFE" },
    Flag { mask: 0x02, label: "CURRENT FAILSAFE" },
    Flag { mask: 0x04, label: "RELAY FAILSAFE" },
    Flag { mask: 0x08, label: "CHARGE INTERLOCK" },
];

const STATUS_MASK: u8 = 0x0F;

/// Labels of active flags, fault codes first, at most `N` of them.
///
/// Flags beyond `N` are dropped, not wrapped.
pub fn active_faults<const N: usize>(diag: &DiagnosticFlags) -> Vec<&'static str, N> {
    let faults = FAULT_FLAGS
        .iter()
        .filter(|f| diag.fault_bits & f.mask != 0)
        .map(|f| f.label);
    let status = STATUS_FLAGS
        .iter()
        .filter(|f| diag.bms_status_bits & f.mask != 0)
        .map(|f| f.label);

    let mut labels = Vec::new();
    for label in faults.chain(status) {
        if labels.push(label).is_err() {
            break;
        }
    }
    labels
}

/// Number of active defined flags, including those that do not fit on screen.
pub const fn active_fault_count(diag: &DiagnosticFlags) -> u32 {
    diag.fault_bits.count_ones() + (diag.bms_status_bits & STATUS_MASK).count_ones()
}

// =============================================================================
// Fault Acknowledgement and Status Icons
// =============================================================================

/// Fault signature last seen on the diagnostics page.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultBaseline {
    wrench_baseline: u32,
}

impl FaultBaseline {
    pub const fn new() -> Self { Self { wrench_baseline: 0 } }

    /// Record `fault_sum` as reviewed. Only the diagnostics page calls this.
    #[inline]
    pub fn acknowledge(
        &mut self,
        fault_sum: u32,
    ) {
        self.wrench_baseline = fault_sum;
    }

    #[inline]
    pub const fn is_unacknowledged(
        &self,
        fault_sum: u32,
    ) -> bool {
        fault_sum != self.wrench_baseline
    }

    #[inline]
    pub const fn value(&self) -> u32 { self.wrench_baseline }
}

/// Icons shown in the status strip.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusIcons {
    pub charging_bolt: bool,
    pub charging_sun: bool,
    pub low_soc: bool,
    pub fault_wrench: bool,
}

impl StatusIcons {
    pub fn evaluate(
        snapshot: &TelemetrySnapshot,
        baseline: &FaultBaseline,
    ) -> Self {
        let charging = snapshot.pack.is_charging();
        let solar = snapshot.relays.relay(Relay::SolarInput);
        Self {
            charging_bolt: charging && !solar,
            charging_sun: charging && solar,
            low_soc: !snapshot.is_cold(RecordKind::PackElectrical)
                && snapshot.pack.soc_half_percent < LOW_SOC_HALF_PERCENT,
            fault_wrench: baseline.is_unacknowledged(snapshot.diagnostics.fault_sum()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
