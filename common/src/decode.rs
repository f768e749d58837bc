//! Frame decoder and encoder.
//!
//! [`decode`] turns a raw frame into a typed [`TelemetryRecord`] using the
//! offset table of the selected [`SchemaVersion`]. It is pure and total:
//! unknown ids are `Ok(None)`, bad lengths are [`DecodeError::MalformedFrame`],
//! and no input can make it panic.
//!
//! [`TelemetryRecord::encode`] is the inverse and is what the simulated BMS
//! puts on the bus.

use crate::frame::{DecodeError, Frame, MAX_PAYLOAD};
use crate::schema::{
    ID_CELL_EXTREMES,
    ID_DIAGNOSTIC_FLAGS,
    ID_PACK_ELECTRICAL,
    ID_RELAY_LIMITS,
    SchemaLayout,
    SchemaVersion,
};
use crate::telemetry::{CellExtremes, DiagnosticFlags, PackElectrical, RecordKind, RelayLimits, TelemetryRecord};

/// Frame id that carries `kind`.
pub const fn frame_id(kind: RecordKind) -> u32 {
    match kind {
        RecordKind::PackElectrical => ID_PACK_ELECTRICAL,
        RecordKind::CellExtremes => ID_CELL_EXTREMES,
        RecordKind::RelayLimits => ID_RELAY_LIMITS,
        RecordKind::DiagnosticFlags => ID_DIAGNOSTIC_FLAGS,
    }
}

/// Record kind carried by frame `id`, if it is one of ours.
pub const fn record_kind(id: u32) -> Option<RecordKind> {
    match id {
        ID_PACK_ELECTRICAL => Some(RecordKind::PackElectrical),
        ID_CELL_EXTREMES => Some(RecordKind::CellExtremes),
        ID_RELAY_LIMITS => Some(RecordKind::RelayLimits),
        ID_DIAGNOSTIC_FLAGS => Some(RecordKind::DiagnosticFlags),
        _ => None,
    }
}

/// Minimum DLC a frame of `kind` needs under `schema`.
pub const fn required_len(
    kind: RecordKind,
    schema: SchemaVersion,
) -> u8 {
    let layout = schema.layout();
    match kind {
        RecordKind::PackElectrical => layout.pack.required_len(),
        RecordKind::CellExtremes => layout.cells.required_len(),
        RecordKind::RelayLimits => layout.relays.required_len(),
        RecordKind::DiagnosticFlags => layout.diagnostics.required_len(),
    }
}

/// Decode one frame.
///
/// Returns `Ok(None)` for ids this display does not use.
pub fn decode(
    frame: &Frame,
    schema: SchemaVersion,
) -> Result<Option<TelemetryRecord>, DecodeError> {
    let Some(kind) = record_kind(frame.id) else {
        return Ok(None);
    };

    let required = required_len(kind, schema);
    if usize::from(frame.dlc) > MAX_PAYLOAD || frame.dlc < required {
        return Err(DecodeError::MalformedFrame {
            id: frame.id,
            dlc: frame.dlc,
            required,
        });
    }

    let data = frame.data();
    let layout = schema.layout();
    let record = match kind {
        RecordKind::PackElectrical => TelemetryRecord::PackElectrical(decode_pack(layout, data)),
        RecordKind::CellExtremes => TelemetryRecord::CellExtremes(decode_cells(layout, data)),
        RecordKind::RelayLimits => TelemetryRecord::RelayLimits(decode_relays(layout, data)),
        RecordKind::DiagnosticFlags => TelemetryRecord::DiagnosticFlags(decode_diagnostics(layout, data)),
    };
    Ok(Some(record))
}

fn decode_pack(
    layout: &SchemaLayout,
    data: &[u8],
) -> PackElectrical {
    let l = &layout.pack;
    PackElectrical {
        voltage_decivolts: l.voltage.read_u16(data),
        current_deciamps: l.current.read_i16(data),
        soc_half_percent: l.soc.read_u16(data) as u8,
    }
}

fn decode_cells(
    layout: &SchemaLayout,
    data: &[u8],
) -> CellExtremes {
    let l = &layout.cells;
    CellExtremes {
        low_cell_100uv: l.unit.to_100uv(l.low_cell.read_u16(data)),
        high_cell_100uv: l.unit.to_100uv(l.high_cell.read_u16(data)),
        health_percent: l.health.read_u16(data) as u8,
        cycle_count: l.cycles.read_u16(data),
    }
}

fn decode_relays(
    layout: &SchemaLayout,
    data: &[u8],
) -> RelayLimits {
    let l = &layout.relays;
    RelayLimits {
        relay_bits: l.relays.read_u16(data) as u8,
        charge_limit_amps: l.charge_limit.read_u16(data) as u8,
        discharge_limit_amps: l.discharge_limit.read_u16(data) as u8,
        pack_amp_hours_centi: l.amp_hours.read_u16(data),
        avg_current_deciamps: l.avg_current.read_i16(data),
    }
}

fn decode_diagnostics(
    layout: &SchemaLayout,
    data: &[u8],
) -> DiagnosticFlags {
    let l = &layout.diagnostics;
    DiagnosticFlags {
        fault_bits: l.faults.read_u16(data),
        temp_high_c: l.temp_high.read_i16(data) as i8,
        temp_low_c: l.temp_low.read_i16(data) as i8,
        rolling_counter: l.counter.read_u16(data) as u8,
        bms_status_bits: l.status.read_u16(data) as u8,
    }
}

impl TelemetryRecord {
    /// Encode this record as a full 8-byte frame in `schema`'s layout.
    ///
    /// Legacy cell voltages are sent in millivolts, so decoding the result
    /// rounds them to the nearest 10 steps of 100 µV.
    pub fn encode(
        &self,
        schema: SchemaVersion,
    ) -> Frame {
        let layout = schema.layout();
        let mut payload = [0u8; MAX_PAYLOAD];
        match self {
            Self::PackElectrical(r) => {
                let l = &layout.pack;
                l.voltage.write_u16(&mut payload, r.voltage_decivolts);
                l.current.write_u16(&mut payload, r.current_deciamps as u16);
                l.soc.write_u16(&mut payload, u16::from(r.soc_half_percent));
            }
            Self::CellExtremes(r) => {
                let l = &layout.cells;
                l.low_cell.write_u16(&mut payload, l.unit.from_100uv(r.low_cell_100uv));
                l.high_cell.write_u16(&mut payload, l.unit.from_100uv(r.high_cell_100uv));
                l.health.write_u16(&mut payload, u16::from(r.health_percent));
                l.cycles.write_u16(&mut payload, r.cycle_count);
            }
            Self::RelayLimits(r) => {
                let l = &layout.relays;
                l.relays.write_u16(&mut payload, u16::from(r.relay_bits));
                l.charge_limit.write_u16(&mut payload, u16::from(r.charge_limit_amps));
                l.discharge_limit.write_u16(&mut payload, u16::from(r.discharge_limit_amps));
                l.amp_hours.write_u16(&mut payload, r.pack_amp_hours_centi);
                l.avg_current.write_u16(&mut payload, r.avg_current_deciamps as u16);
            }
            Self::DiagnosticFlags(r) => {
                let l = &layout.diagnostics;
                l.faults.write_u16(&mut payload, r.fault_bits);
                l.temp_high.write_u16(&mut payload, u16::from(r.temp_high_c as u8));
                l.temp_low.write_u16(&mut payload, u16::from(r.temp_low_c as u8));
                l.counter.write_u16(&mut payload, u16::from(r.rolling_counter));
                l.status.write_u16(&mut payload, u16::from(r.bms_status_bits));
            }
        }
        Frame::from_payload(frame_id(self.kind()), payload)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
