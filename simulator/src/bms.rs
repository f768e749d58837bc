//! Simulated BMS.
//!
//! Generates slowly varying telemetry from sine waves and puts it on the bus
//! as real frames through the common encoder, one record kind per interval.
//! Listens for the display's fault-clear request.

use bms_dash_common::decode::frame_id;
use bms_dash_common::derive::FAULT_FLAGS;
use bms_dash_common::system::FAULT_CLEAR_FRAME;
use bms_dash_common::telemetry::{
    CellExtremes,
    DiagnosticFlags,
    PackElectrical,
    RecordKind,
    Relay,
    RelayLimits,
    TelemetryRecord,
};
use bms_dash_common::{Frame, SchemaVersion};

use crate::timing::BMS_FRAME_INTERVAL_MS;

pub struct FakeBms {
    schema: SchemaVersion,
    next_kind: usize,
    last_emit_ms: Option<u64>,
    fault_bits: u16,
    next_fault: usize,
    rolling_counter: u8,
}

impl FakeBms {
    pub const fn new(schema: SchemaVersion) -> Self {
        Self {
            schema,
            next_kind: 0,
            last_emit_ms: None,
            fault_bits: 0,
            next_fault: 0,
            rolling_counter: 0,
        }
    }

    /// Next frame, if the emit interval has elapsed.
    pub fn poll(
        &mut self,
        now_ms: u64,
    ) -> Option<Frame> {
        if let Some(last) = self.last_emit_ms
            && now_ms.saturating_sub(last) < BMS_FRAME_INTERVAL_MS
        {
            return None;
        }
        self.last_emit_ms = Some(now_ms);

        let kind = RecordKind::ALL[self.next_kind];
        self.next_kind = (self.next_kind + 1) % RecordKind::ALL.len();
        if kind == RecordKind::DiagnosticFlags {
            self.rolling_counter = self.rolling_counter.wrapping_add(1);
        }
        Some(self.record(kind, now_ms as f32 / 1000.0).encode(self.schema))
    }

    /// Raise the next fault in table order.
    pub fn inject_fault(&mut self) -> &'static str {
        let flag = FAULT_FLAGS[self.next_fault];
        self.next_fault = (self.next_fault + 1) % FAULT_FLAGS.len();
        self.fault_bits |= flag.mask;
        flag.label
    }

    /// React to a frame sent by the display. Returns true if faults were cleared.
    pub fn handle_request(
        &mut self,
        frame: &Frame,
    ) -> bool {
        if *frame == FAULT_CLEAR_FRAME {
            self.fault_bits = 0;
            return true;
        }
        false
    }

    /// Pack frame cut short, as a flaky transceiver would deliver it.
    pub fn truncated_frame(&self) -> Frame { Frame::new(frame_id(RecordKind::PackElectrical), &[0x01, 0x90]) }

    fn record(
        &self,
        kind: RecordKind,
        t: f32,
    ) -> TelemetryRecord {
        let current = fake_signal(t, -40.0, 60.0, 0.05);
        match kind {
            RecordKind::PackElectrical => TelemetryRecord::PackElectrical(PackElectrical {
                voltage_decivolts: (fake_signal(t, 46.0, 54.0, 0.07) * 10.0) as u16,
                current_deciamps: (current * 10.0) as i16,
                soc_half_percent: (fake_signal(t, 10.0, 95.0, 0.02) * 2.0) as u8,
            }),
            RecordKind::CellExtremes => {
                let low = fake_signal(t, 3.20, 3.40, 0.06);
                let spread = fake_signal(t, 0.01, 0.08, 0.11);
                TelemetryRecord::CellExtremes(CellExtremes {
                    low_cell_100uv: (low * 10_000.0) as u16,
                    high_cell_100uv: ((low + spread) * 10_000.0) as u16,
                    health_percent: 97,
                    cycle_count: 412,
                })
            }
            RecordKind::RelayLimits => {
                let mut relay_bits = Relay::DischargeEnabled as u8 | Relay::ChargeEnabled as u8 | Relay::AlwaysOn as u8 | Relay::Ready as u8;
                if current < 0.0 {
                    relay_bits |= Relay::Charging as u8;
                }
                // Solar input on for half of every minute
                if t % 60.0 >= 30.0 {
                    relay_bits |= Relay::SolarInput as u8;
                }
                TelemetryRecord::RelayLimits(RelayLimits {
                    relay_bits,
                    charge_limit_amps: 50,
                    discharge_limit_amps: 150,
                    pack_amp_hours_centi: 10_000,
                    avg_current_deciamps: (current * 10.0) as i16,
                })
            }
            RecordKind::DiagnosticFlags => TelemetryRecord::DiagnosticFlags(DiagnosticFlags {
                fault_bits: self.fault_bits,
                temp_high_c: fake_signal(t, 18.0, 45.0, 0.03) as i8,
                temp_low_c: fake_signal(t, 12.0, 20.0, 0.03) as i8,
                rolling_counter: self.rolling_counter,
                bms_status_bits: 0,
            }),
        }
    }
}

fn fake_signal(
    t: f32,
    min: f32,
    max: f32,
    freq: f32,
) -> f32 {
    let normalized = (t * freq).sin().mul_add(0.5, 0.5);
    min + normalized * (max - min)
}
