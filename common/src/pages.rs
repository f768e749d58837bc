//! Page navigation for the single-button display.
//!
//! A short press advances through the pages. `Off` is only left by a short
//! press and only entered through the long-hold policy.
//!
//! # Pages
//!
//! - [`Page::Off`]: panel in power save, nothing drawn
//! - [`Page::Gauge`]: SOC arc, power, endurance and status icons
//! - [`Page::Bars`]: horizontal bars for SOC, current, cell extremes, temperature
//! - [`Page::Diagnostics`]: temperatures, health, bus counters, active faults

/// Available pages.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Page {
    #[default]
    Off,
    Gauge,
    Bars,
    Diagnostics,
}

impl Page {
    /// Next page on a short press (Off → Gauge → Bars → Diagnostics → Gauge).
    #[inline]
    pub const fn next(self) -> Self {
        match self {
            Self::Off | Self::Diagnostics => Self::Gauge,
            Self::Gauge => Self::Bars,
            Self::Bars => Self::Diagnostics,
        }
    }

    #[inline]
    pub const fn is_off(self) -> bool { matches!(self, Self::Off) }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Gauge => "GAUGE",
            Self::Bars => "BARS",
            Self::Diagnostics => "DIAG",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
