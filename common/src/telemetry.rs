//! Typed telemetry records decoded from BMS frames.
//!
//! Records keep the fixed-point integers exactly as they travel on the bus
//! (cell voltages normalised to 100 µV). Accessors convert to physical units.
//!
//! Current sign convention: positive = discharging, negative = charging.

/// Pack voltage, current and state of charge (frame 0x03B).
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PackElectrical {
    pub voltage_decivolts: u16,
    pub current_deciamps: i16,
    pub soc_half_percent: u8,
}

impl PackElectrical {
    #[inline]
    pub fn voltage(&self) -> f32 { f32::from(self.voltage_decivolts) / 10.0 }

    #[inline]
    pub fn current(&self) -> f32 { f32::from(self.current_deciamps) / 10.0 }

    #[inline]
    pub fn soc_percent(&self) -> f32 { f32::from(self.soc_half_percent) / 2.0 }

    #[inline]
    pub const fn is_discharging(&self) -> bool { self.current_deciamps > 0 }

    #[inline]
    pub const fn is_charging(&self) -> bool { self.current_deciamps < 0 }
}

/// Lowest/highest cell voltage, pack health and cycle count (frame 0x3CB).
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CellExtremes {
    /// Lowest cell voltage in 100 µV steps.
    pub low_cell_100uv: u16,
    /// Highest cell voltage in 100 µV steps.
    pub high_cell_100uv: u16,
    pub health_percent: u8,
    pub cycle_count: u16,
}

impl CellExtremes {
    #[inline]
    pub fn low_cell_voltage(&self) -> f32 { f32::from(self.low_cell_100uv) / 10_000.0 }

    #[inline]
    pub fn high_cell_voltage(&self) -> f32 { f32::from(self.high_cell_100uv) / 10_000.0 }

    /// Spread between the highest and lowest cell, in volts.
    #[inline]
    pub fn cell_delta(&self) -> f32 { f32::from(self.high_cell_100uv.saturating_sub(self.low_cell_100uv)) / 10_000.0 }
}

/// Relay state bits reported in [`RelayLimits::relay_bits`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Relay {
    DischargeEnabled = 0x01,
    ChargeEnabled = 0x02,
    ChargerSafety = 0x04,
    MalfunctionIndicator = 0x08,
    /// Multi-purpose input; wired to the solar charge controller.
    SolarInput = 0x10,
    AlwaysOn = 0x20,
    Ready = 0x40,
    Charging = 0x80,
}

/// Relay states, current limits, capacity and average current (frame 0x6B2).
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelayLimits {
    pub relay_bits: u8,
    pub charge_limit_amps: u8,
    pub discharge_limit_amps: u8,
    pub pack_amp_hours_centi: u16,
    pub avg_current_deciamps: i16,
}

impl RelayLimits {
    #[inline]
    pub const fn relay(
        &self,
        relay: Relay,
    ) -> bool {
        self.relay_bits & relay as u8 != 0
    }

    #[inline]
    pub fn pack_amp_hours(&self) -> f32 { f32::from(self.pack_amp_hours_centi) / 100.0 }

    #[inline]
    pub fn avg_current(&self) -> f32 { f32::from(self.avg_current_deciamps) / 10.0 }
}

/// Fault codes, temperature extremes and status flags (frame 0x6B3).
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiagnosticFlags {
    pub fault_bits: u16,
    pub temp_high_c: i8,
    pub temp_low_c: i8,
    pub rolling_counter: u8,
    pub bms_status_bits: u8,
}

impl DiagnosticFlags {
    /// Sum of the fault and status bytes.
    ///
    /// This is the signature compared against the fault baseline to detect
    /// faults raised since the diagnostics page was last viewed.
    pub const fn fault_sum(&self) -> u32 {
        let [hi, lo] = self.fault_bits.to_be_bytes();
        hi as u32 + lo as u32 + self.bms_status_bits as u32
    }
}

/// Which record a frame carried; also names the store slots.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordKind {
    PackElectrical,
    CellExtremes,
    RelayLimits,
    DiagnosticFlags,
}

impl RecordKind {
    pub const ALL: [Self; 4] = [
        Self::PackElectrical,
        Self::CellExtremes,
        Self::RelayLimits,
        Self::DiagnosticFlags,
    ];

    /// Bit used for this kind in cold/populated masks.
    #[inline]
    pub const fn mask(self) -> u8 {
        match self {
            Self::PackElectrical => 0x01,
            Self::CellExtremes => 0x02,
            Self::RelayLimits => 0x04,
            Self::DiagnosticFlags => 0x08,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PackElectrical => "PACK",
            Self::CellExtremes => "CELLS",
            Self::RelayLimits => "RELAYS",
            Self::DiagnosticFlags => "DIAG",
        }
    }
}

/// One decoded telemetry frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryRecord {
    PackElectrical(PackElectrical),
    CellExtremes(CellExtremes),
    RelayLimits(RelayLimits),
    DiagnosticFlags(DiagnosticFlags),
}

impl TelemetryRecord {
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::PackElectrical(_) => RecordKind::PackElectrical,
            Self::CellExtremes(_) => RecordKind::CellExtremes,
            Self::RelayLimits(_) => RecordKind::RelayLimits,
            Self::DiagnosticFlags(_) => RecordKind::DiagnosticFlags,
        }
    }
}
