//! Main loop state and the per-tick pipeline.
//!
//! One [`tick`] is one iteration of the cooperative loop:
//!
//! 1. read the clock
//! 2. poll at most one frame, decode it, store it or count it
//! 3. sample the button
//! 4. apply at most one gesture and push its effects to the panel and bus
//! 5. render the active page (skipped while the display is off)
//!
//! Decode always happens before render within a tick, so a page never shows
//! a value older than the last frame received.

use crate::decode::decode;
use crate::derive::{FaultBaseline, StatusIcons};
use crate::display_state::{DisplayEffects, DisplayState, LongHoldPolicy};
use crate::event_log::EventLog;
use crate::frame::{DecodeError, Frame};
use crate::input::{ButtonClassifier, GestureEvent, HoldThresholds};
use crate::io::{ButtonPin, CanBus, MonotonicClock, Panel};
use crate::pages::Page;
use crate::render::{PageView, render_page};
use crate::schema::SchemaVersion;
use crate::store::TelemetryStore;
use crate::telemetry::RecordKind;

/// Frame id of the BMS fault-clear request.
pub const FAULT_CLEAR_ID: u32 = 0x7E3;

/// Request sent on a long hold when the policy clears faults.
pub const FAULT_CLEAR_FRAME: Frame = Frame::from_payload(FAULT_CLEAR_ID, [0x01, 0x04, 0, 0, 0, 0, 0, 0]);

// =============================================================================
// Configuration
// =============================================================================

/// Build-time selection of schema, thresholds and long-hold behaviour.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemConfig {
    pub schema: SchemaVersion,
    pub thresholds: HoldThresholds,
    pub long_hold: LongHoldPolicy,
    pub start_page: Page,
}

impl SystemConfig {
    /// Long hold sends the fault-clear request; boots to the gauge.
    pub const FAULT_CLEAR_VARIANT: Self = Self {
        schema: SchemaVersion::Current,
        thresholds: HoldThresholds::FAULT_CLEAR,
        long_hold: LongHoldPolicy::ClearFault,
        start_page: Page::Gauge,
    };

    /// Long hold turns the display off; boots with the display off.
    pub const PAGE_RESET_VARIANT: Self = Self {
        schema: SchemaVersion::Current,
        thresholds: HoldThresholds::PAGE_RESET,
        long_hold: LongHoldPolicy::ResetToOff,
        start_page: Page::Off,
    };
}

impl Default for SystemConfig {
    fn default() -> Self { Self::FAULT_CLEAR_VARIANT }
}

// =============================================================================
// Bus Counters
// =============================================================================

/// Frame counters shown on the diagnostics page.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusStats {
    /// Frames decoded into the store.
    pub decoded: u32,
    /// Frames with ids this display does not use.
    pub unknown: u32,
    /// Recognised frames dropped for a bad length.
    pub malformed: u32,
    /// Fault-clear requests transmitted.
    pub fault_clears_sent: u32,
    pub last_error: Option<DecodeError>,
}

/// What happened to the frame polled this tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameOutcome {
    /// Nothing was waiting on the bus.
    Idle,
    Decoded(RecordKind),
    Ignored { id: u32 },
    Dropped(DecodeError),
}

/// Summary of one tick, for the caller's logging and for tests.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TickReport {
    pub now_ms: u64,
    pub frame: FrameOutcome,
    pub gesture: GestureEvent,
    pub effects: DisplayEffects,
    pub page: Page,
    pub icons: StatusIcons,
    pub rendered: bool,
}

// =============================================================================
// System State
// =============================================================================

/// Everything the loop owns. Passed by `&mut` into [`tick`].
#[derive(Clone, Debug)]
pub struct SystemState {
    config: SystemConfig,
    store: TelemetryStore,
    classifier: ButtonClassifier,
    display: DisplayState,
    baseline: FaultBaseline,
    stats: BusStats,
    log: EventLog,
    started: bool,
}

impl SystemState {
    pub const fn new(config: SystemConfig) -> Self {
        Self {
            config,
            store: TelemetryStore::new(),
            classifier: ButtonClassifier::new(config.thresholds),
            display: DisplayState::new(config.start_page, config.long_hold),
            baseline: FaultBaseline::new(),
            stats: BusStats {
                decoded: 0,
                unknown: 0,
                malformed: 0,
                fault_clears_sent: 0,
                last_error: None,
            },
            log: EventLog::new(),
            started: false,
        }
    }

    #[inline]
    pub const fn config(&self) -> &SystemConfig { &self.config }

    #[inline]
    pub const fn store(&self) -> &TelemetryStore { &self.store }

    #[inline]
    pub const fn display(&self) -> &DisplayState { &self.display }

    #[inline]
    pub const fn stats(&self) -> &BusStats { &self.stats }

    #[inline]
    pub const fn log(&self) -> &EventLog { &self.log }

    #[inline]
    pub const fn baseline(&self) -> &FaultBaseline { &self.baseline }

    /// Icons for the current snapshot and baseline.
    pub fn icons(&self) -> StatusIcons { StatusIcons::evaluate(&self.store.snapshot(), &self.baseline) }

    /// Take at most one frame off the bus and fold it into the store.
    fn poll_bus<B: CanBus>(
        &mut self,
        bus: &mut B,
        now_ms: u64,
    ) -> FrameOutcome {
        let Some(frame) = bus.receive_frame() else {
            return FrameOutcome::Idle;
        };

        match decode(&frame, self.config.schema) {
            Ok(Some(record)) => {
                trace!("frame {:#x} decoded", frame.id);
                self.store.update(record);
                self.stats.decoded = self.stats.decoded.wrapping_add(1);
                FrameOutcome::Decoded(record.kind())
            }
            Ok(None) => {
                self.stats.unknown = self.stats.unknown.wrapping_add(1);
                FrameOutcome::Ignored { id: frame.id }
            }
            Err(err) => {
                warn!("dropped frame: {}", err);
                self.stats.malformed = self.stats.malformed.wrapping_add(1);
                self.stats.last_error = Some(err);
                self.log.record(now_ms, format_args!("{err}"));
                FrameOutcome::Dropped(err)
            }
        }
    }

    /// Push one gesture's effects out to the panel and bus.
    fn push_effects<B: CanBus, D: Panel>(
        &mut self,
        effects: &DisplayEffects,
        bus: &mut B,
        panel: &mut D,
        now_ms: u64,
    ) {
        if let Some(level) = effects.contrast {
            panel.set_contrast(level);
            self.log.record(now_ms, format_args!("contrast {level}"));
        }
        if let Some(on) = effects.power_save {
            panel.set_power_save(on);
        }
        if effects.send_fault_clear {
            bus.send_frame(&FAULT_CLEAR_FRAME);
            self.stats.fault_clears_sent = self.stats.fault_clears_sent.wrapping_add(1);
            info!("fault clear sent");
            self.log.push(now_ms, "fault clear sent");
        }
    }
}

impl Default for SystemState {
    fn default() -> Self { Self::new(SystemConfig::default()) }
}

// =============================================================================
// Tick
// =============================================================================

/// Run one loop iteration.
pub fn tick<B, P, C, D>(
    state: &mut SystemState,
    bus: &mut B,
    button: &mut P,
    clock: &C,
    panel: &mut D,
) -> TickReport
where
    B: CanBus,
    P: ButtonPin,
    C: MonotonicClock,
    D: Panel,
{
    let now_ms = clock.now_millis();

    if !state.started {
        panel.set_contrast(state.display.contrast());
        panel.set_power_save(state.display.power_save());
        state.started = true;
        info!("display started on {}", state.display.page().label());
        state
            .log
            .record(now_ms, format_args!("start {} {}", state.config.schema.label(), state.display.page().label()));
    }

    let frame = state.poll_bus(bus, now_ms);

    let gesture = state.classifier.sample(button.is_pressed(), now_ms);
    let page_before = state.display.page();
    let effects = state.display.apply(gesture);
    state.push_effects(&effects, bus, panel, now_ms);

    let page = state.display.page();
    if page != page_before {
        debug!("page {} -> {}", page_before.label(), page.label());
        state
            .log
            .record(now_ms, format_args!("page {} -> {}", page_before.label(), page.label()));
    }

    let snapshot = state.store.snapshot();
    let icons = StatusIcons::evaluate(&snapshot, &state.baseline);
    let rendered = !page.is_off();
    if rendered {
        let view = PageView {
            snapshot: &snapshot,
            icons,
            stats: &state.stats,
            pending: state.classifier.pending(now_ms),
        };
        panel.begin_frame();
        render_page(panel, page, &view, &mut state.baseline);
        panel.end_frame();
    }

    TickReport {
        now_ms,
        frame,
        gesture,
        effects,
        page,
        icons,
        rendered,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::vec::Vec;

    use super::*;
    use crate::derive::{Endurance, FlowDirection, endurance, power_watts};
    use crate::render::test_support::RecordingPanel;
    use crate::schema::{ID_DIAGNOSTIC_FLAGS, ID_PACK_ELECTRICAL};
    use crate::telemetry::{DiagnosticFlags, TelemetryRecord};

    #[derive(Default)]
    struct FakeBus {
        inbox: VecDeque<Frame>,
        sent: Vec<Frame>,
    }

    impl CanBus for FakeBus {
        fn receive_frame(&mut self) -> Option<Frame> { self.inbox.pop_front() }

        fn send_frame(
            &mut self,
            frame: &Frame,
        ) {
            self.sent.push(*frame);
        }
    }

    struct FakeButton(bool);

    impl ButtonPin for FakeButton {
        fn is_pressed(&mut self) -> bool { self.0 }
    }

    struct FakeClock(Cell<u64>);

    impl MonotonicClock for FakeClock {
        fn now_millis(&self) -> u64 { self.0.get() }
    }

    /// Fakes wired together with a clock that advances 50 ms per tick.
    struct Rig {
        state: SystemState,
        bus: FakeBus,
        button: FakeButton,
        clock: FakeClock,
        panel: RecordingPanel,
    }

    impl Rig {
        fn new(config: SystemConfig) -> Self {
            Self {
                state: SystemState::new(config),
                bus: FakeBus::default(),
                button: FakeButton(false),
                clock: FakeClock(Cell::new(1_000)),
                panel: RecordingPanel::new(),
            }
        }

        fn step(&mut self) -> TickReport {
            let report = tick(
                &mut self.state,
                &mut self.bus,
                &mut self.button,
                &self.clock,
                &mut self.panel,
            );
            self.clock.0.set(self.clock.0.get() + 50);
            report
        }

        /// Hold the button for about `held_ms`, then release; returns the release tick.
        fn press(
            &mut self,
            held_ms: u64,
        ) -> TickReport {
            self.button.0 = true;
            let start = self.clock.0.get();
            self.step();
            self.clock.0.set(start + held_ms);
            self.button.0 = false;
            self.step()
        }

        fn send(
            &mut self,
            record: TelemetryRecord,
        ) {
            let frame = record.encode(self.state.config().schema);
            self.bus.inbox.push_back(frame);
        }
    }

    #[test]
    fn test_first_tick_pushes_panel_state() {
        let mut rig = Rig::new(SystemConfig::FAULT_CLEAR_VARIANT);
        let report = rig.step();
        assert_eq!(rig.panel.contrast_calls, [80]);
        assert_eq!(rig.panel.power_save_calls, [false]);
        assert!(report.rendered);
        assert_eq!(rig.panel.frames_begun, 1);
        assert_eq!(rig.panel.frames_ended, 1);

        rig.step();
        assert_eq!(rig.panel.contrast_calls.len(), 1);
        assert_eq!(rig.panel.power_save_calls.len(), 1);
    }

    #[test]
    fn test_page_reset_variant_boots_dark() {
        let mut rig = Rig::new(SystemConfig::PAGE_RESET_VARIANT);
        let report = rig.step();
        assert_eq!(report.page, Page::Off);
        assert!(!report.rendered);
        assert_eq!(rig.panel.power_save_calls, [true]);
        assert_eq!(rig.panel.frames_begun, 0);
        assert_eq!(rig.panel.lit_count(), 0);
    }

    #[test]
    fn test_reference_frame_end_to_end() {
        let mut rig = Rig::new(SystemConfig::FAULT_CLEAR_VARIANT);
        rig.bus
            .inbox
            .push_back(Frame::new(ID_PACK_ELECTRICAL, &[0x01, 0x90, 0x00, 0x64, 0x00, 0x32]));
        let report = rig.step();
        assert_eq!(report.frame, FrameOutcome::Decoded(RecordKind::PackElectrical));
        assert_eq!(rig.state.icons(), report.icons);

        let pack = rig.state.store().snapshot().pack;
        assert_eq!(pack.voltage(), 40.0);
        assert_eq!(pack.current(), 10.0);
        assert_eq!(pack.soc_percent(), 25.0);
        assert!(pack.is_discharging());
        assert!((power_watts(&pack) - 400.0).abs() < 0.01);
        assert_eq!(
            endurance(&pack),
            Endurance::Remaining {
                direction: FlowDirection::Discharging,
                minutes: 300,
            }
        );
        assert_eq!(rig.state.stats().decoded, 1);
    }

    #[test]
    fn test_one_frame_per_tick() {
        let mut rig = Rig::new(SystemConfig::FAULT_CLEAR_VARIANT);
        rig.send(TelemetryRecord::DiagnosticFlags(DiagnosticFlags::default()));
        rig.send(TelemetryRecord::DiagnosticFlags(DiagnosticFlags::default()));
        rig.step();
        assert_eq!(rig.bus.inbox.len(), 1);
        rig.step();
        assert!(rig.bus.inbox.is_empty());
        assert_eq!(rig.step().frame, FrameOutcome::Idle);
        assert_eq!(rig.state.stats().decoded, 2);
    }

    #[test]
    fn test_malformed_frame_counted_and_store_untouched() {
        let mut rig = Rig::new(SystemConfig::FAULT_CLEAR_VARIANT);
        rig.bus.inbox.push_back(Frame::new(ID_PACK_ELECTRICAL, &[0x01, 0x90]));
        let report = rig.step();
        assert!(matches!(report.frame, FrameOutcome::Dropped(DecodeError::MalformedFrame { dlc: 2, .. })));
        assert!(rig.state.store().is_cold(RecordKind::PackElectrical));
        assert_eq!(rig.state.stats().malformed, 1);
        assert_eq!(rig.state.stats().last_error.map(|e| e.id()), Some(ID_PACK_ELECTRICAL));
        let last = rig.state.log().latest().map(|e| e.text.as_str());
        assert_eq!(last, Some("malformed frame 0x03B: dlc 2, need 6"));
    }

    #[test]
    fn test_unknown_id_ignored() {
        let mut rig = Rig::new(SystemConfig::FAULT_CLEAR_VARIANT);
        rig.bus.inbox.push_back(Frame::new(0x123, &[0; 8]));
        let report = rig.step();
        assert_eq!(report.frame, FrameOutcome::Ignored { id: 0x123 });
        assert_eq!(rig.state.stats().unknown, 1);
        assert_eq!(rig.state.stats().malformed, 0);
        assert!(!rig.state.store().snapshot().is_fully_warm());
    }

    #[test]
    fn test_short_presses_cycle_pages() {
        let mut rig = Rig::new(SystemConfig::FAULT_CLEAR_VARIANT);
        rig.step();
        assert_eq!(rig.press(300).page, Page::Bars);
        assert_eq!(rig.press(300).page, Page::Diagnostics);
        assert_eq!(rig.press(300).page, Page::Gauge);
        // Bounce does nothing
        assert_eq!(rig.press(100).page, Page::Gauge);
    }

    #[test]
    fn test_medium_hold_cycles_contrast() {
        let mut rig = Rig::new(SystemConfig::FAULT_CLEAR_VARIANT);
        rig.step();
        let report = rig.press(700);
        assert_eq!(report.gesture, GestureEvent::ContrastCycle);
        assert_eq!(rig.panel.contrast_calls, [80, 160]);
    }

    #[test]
    fn test_long_hold_sends_fault_clear() {
        let mut rig = Rig::new(SystemConfig::FAULT_CLEAR_VARIANT);
        rig.step();
        let report = rig.press(2_000);
        assert_eq!(report.gesture, GestureEvent::ClearFault);
        assert_eq!(report.page, Page::Gauge);
        assert_eq!(rig.bus.sent, [FAULT_CLEAR_FRAME]);
        assert_eq!(rig.bus.sent[0].id, 0x7E3);
        assert_eq!(rig.bus.sent[0].data()[..2], [0x01, 0x04]);
        assert_eq!(rig.state.stats().fault_clears_sent, 1);
    }

    #[test]
    fn test_long_hold_page_reset_turns_off() {
        let mut rig = Rig::new(SystemConfig::PAGE_RESET_VARIANT);
        rig.step();
        assert_eq!(rig.press(300).page, Page::Gauge);
        assert_eq!(rig.panel.power_save_calls, [true, false]);

        let report = rig.press(2_000);
        assert_eq!(report.page, Page::Off);
        assert!(!report.rendered);
        assert!(rig.bus.sent.is_empty());
        assert_eq!(rig.panel.power_save_calls, [true, false, true]);
    }

    #[test]
    fn test_wrench_cleared_by_viewing_diagnostics() {
        let mut rig = Rig::new(SystemConfig::FAULT_CLEAR_VARIANT);
        let faulted = DiagnosticFlags {
            fault_bits: 0x0040,
            ..DiagnosticFlags::default()
        };
        rig.send(TelemetryRecord::DiagnosticFlags(faulted));
        assert!(rig.step().icons.fault_wrench);

        // Gauge -> Bars -> Diagnostics; rendering the page acknowledges
        rig.press(300);
        let report = rig.press(300);
        assert_eq!(report.page, Page::Diagnostics);
        assert!(!rig.step().icons.fault_wrench);

        // Unchanged fault sum keeps it clear, on any page
        rig.send(TelemetryRecord::DiagnosticFlags(faulted));
        rig.press(300);
        assert!(!rig.step().icons.fault_wrench);

        // New fault raises it again
        rig.bus.inbox.push_back(Frame::new(ID_DIAGNOSTIC_FLAGS, &[0x00, 0x41, 20, 18, 1, 0]));
        assert!(rig.step().icons.fault_wrench);
    }

    #[test]
    fn test_hold_marker_shown_while_held() {
        let mut rig = Rig::new(SystemConfig::FAULT_CLEAR_VARIANT);
        rig.step();
        rig.button.0 = true;
        rig.step();
        rig.clock.0.set(rig.clock.0.get() + 1_600);
        rig.step();
        let corner = embedded_graphics::prelude::Point::new(122, 58);
        let size = embedded_graphics::prelude::Size::new(6, 6);
        assert_eq!(rig.panel.lit_in_rect(corner, size), 36);
    }
}
