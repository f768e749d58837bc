//! Latest-value telemetry cache.
//!
//! One slot per record kind, overwritten whole on every decoded frame. No
//! history and no expiry: a slot keeps its last value until the next frame of
//! that kind arrives. Slots never written are "cold" and read as zeros.

use crate::telemetry::{CellExtremes, DiagnosticFlags, PackElectrical, RecordKind, RelayLimits, TelemetryRecord};

/// Last-sample-wins store for the four telemetry records.
#[derive(Clone, Debug, Default)]
pub struct TelemetryStore {
    snapshot: TelemetrySnapshot,
}

impl TelemetryStore {
    pub const fn new() -> Self {
        Self {
            snapshot: TelemetrySnapshot::COLD,
        }
    }

    /// Replace the slot matching `record`'s kind.
    pub fn update(
        &mut self,
        record: TelemetryRecord,
    ) {
        let s = &mut self.snapshot;
        match record {
            TelemetryRecord::PackElectrical(r) => s.pack = r,
            TelemetryRecord::CellExtremes(r) => s.cells = r,
            TelemetryRecord::RelayLimits(r) => s.relays = r,
            TelemetryRecord::DiagnosticFlags(r) => s.diagnostics = r,
        }
        s.populated |= record.kind().mask();
    }

    /// Copy of all four slots for one render pass.
    ///
    /// Taken by value, so later updates never show up half-way through a
    /// pass that already holds a snapshot.
    #[inline]
    pub const fn snapshot(&self) -> TelemetrySnapshot { self.snapshot }

    #[inline]
    pub const fn is_cold(
        &self,
        kind: RecordKind,
    ) -> bool {
        self.snapshot.is_cold(kind)
    }
}

/// Consistent view of every slot at one instant.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetrySnapshot {
    pub pack: PackElectrical,
    pub cells: CellExtremes,
    pub relays: RelayLimits,
    pub diagnostics: DiagnosticFlags,
    populated: u8,
}

impl TelemetrySnapshot {
    /// Snapshot before any frame has been received.
    pub const COLD: Self = Self {
        pack: PackElectrical {
            voltage_decivolts: 0,
            current_deciamps: 0,
            soc_half_percent: 0,
        },
        cells: CellExtremes {
            low_cell_100uv: 0,
            high_cell_100uv: 0,
            health_percent: 0,
            cycle_count: 0,
        },
        relays: RelayLimits {
            relay_bits: 0,
            charge_limit_amps: 0,
            discharge_limit_amps: 0,
            pack_amp_hours_centi: 0,
            avg_current_deciamps: 0,
        },
        diagnostics: DiagnosticFlags {
            fault_bits: 0,
            temp_high_c: 0,
            temp_low_c: 0,
            rolling_counter: 0,
            bms_status_bits: 0,
        },
        populated: 0,
    };

    /// Whether `kind` has never been received.
    #[inline]
    pub const fn is_cold(
        &self,
        kind: RecordKind,
    ) -> bool {
        self.populated & kind.mask() == 0
    }

    /// Whether every slot has been received at least once.
    #[inline]
    pub const fn is_fully_warm(&self) -> bool { self.populated == 0x0F }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(voltage: u16) -> TelemetryRecord {
        TelemetryRecord::PackElectrical(PackElectrical {
            voltage_decivolts: voltage,
            current_deciamps: 12,
            soc_half_percent: 180,
        })
    }

    #[test]
    fn test_new_store_is_cold() {
        let store = TelemetryStore::new();
        for kind in RecordKind::ALL {
            assert!(store.is_cold(kind));
        }
        assert_eq!(store.snapshot(), TelemetrySnapshot::COLD);
        assert_eq!(TelemetrySnapshot::COLD, TelemetrySnapshot::default());
    }

    #[test]
    fn test_update_warms_only_its_slot() {
        let mut store = TelemetryStore::new();
        store.update(pack(500));
        assert!(!store.is_cold(RecordKind::PackElectrical));
        assert!(store.is_cold(RecordKind::CellExtremes));
        assert!(store.is_cold(RecordKind::RelayLimits));
        assert!(store.is_cold(RecordKind::DiagnosticFlags));
        assert_eq!(store.snapshot().pack.voltage_decivolts, 500);
        assert_eq!(store.snapshot().cells, CellExtremes::default());
    }

    #[test]
    fn test_last_sample_wins() {
        let mut store = TelemetryStore::new();
        store.update(pack(500));
        store.update(pack(510));
        assert_eq!(store.snapshot().pack.voltage_decivolts, 510);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = TelemetryStore::new();
        store.update(pack(500));
        let before = store.snapshot();
        store.update(pack(600));
        assert_eq!(before.pack.voltage_decivolts, 500);
        assert_eq!(store.snapshot().pack.voltage_decivolts, 600);
    }

    #[test]
    fn test_fully_warm() {
        let mut store = TelemetryStore::new();
        store.update(pack(500));
        store.update(TelemetryRecord::CellExtremes(CellExtremes::default()));
        store.update(TelemetryRecord::RelayLimits(RelayLimits::default()));
        assert!(!store.snapshot().is_fully_warm());
        store.update(TelemetryRecord::DiagnosticFlags(DiagnosticFlags::default()));
        assert!(store.snapshot().is_fully_warm());
    }
}
