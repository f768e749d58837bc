//! BMS display simulator for desktop.
//!
//! Runs the shared tick loop against an SDL window, a loopback CAN bus and a
//! simulated BMS.
//!
//! # Controls
//!
//! - `Space`: the display button (hold for medium/long gestures)
//! - `F`: raise the next BMS fault
//! - `M`: deliver a truncated frame
//!
//! # Flags
//!
//! - `--page-reset`: long hold turns the display off instead of clearing faults
//! - `--legacy`: decode the legacy frame layout

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod bms;
mod hardware;
mod timing;

use std::thread;
use std::time::Instant;

use bms_dash_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use bms_dash_common::io::MonotonicClock;
use bms_dash_common::{SchemaVersion, SystemConfig, SystemState, tick};
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{BinaryColorTheme, OutputSettingsBuilder, SimulatorEvent, Window};

use crate::bms::FakeBms;
use crate::hardware::{KeyButton, SimBus, SimClock, SimPanel};
use crate::timing::FRAME_TIME;

fn main() {
    let config = config_from_args(std::env::args().skip(1));

    let mut panel = SimPanel::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new()
        .scale(4)
        .theme(BinaryColorTheme::OledBlue)
        .build();
    let mut window = Window::new("BMS Display Sim", &output_settings);

    let mut state = SystemState::new(config);
    let mut bus = SimBus::new();
    let mut button = KeyButton::default();
    let clock = SimClock::new();
    let mut bms = FakeBms::new(config.schema);

    println!(
        "schema {}, long hold {:?}, start page {}",
        config.schema.label(),
        config.long_hold,
        config.start_page.label()
    );

    let mut printed = 0u32;
    let mut reported_overruns = 0u32;
    loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::Space => button.down = true,
                        Keycode::F => println!("bms: fault {}", bms.inject_fault()),
                        Keycode::M => bus.deliver(bms.truncated_frame()),
                        _ => {}
                    }
                }
                SimulatorEvent::KeyUp {
                    keycode: Keycode::Space, ..
                } => button.down = false,
                _ => {}
            }
        }

        if let Some(frame) = bms.poll(clock.now_millis()) {
            bus.deliver(frame);
        }

        tick(&mut state, &mut bus, &mut button, &clock, &mut panel);

        for frame in bus.take_sent() {
            if bms.handle_request(&frame) {
                println!("bms: faults cleared");
            }
        }

        // Echo new event lines to the console
        let log = state.log();
        let fresh = log.total() - printed;
        let skip = log.len().saturating_sub(fresh as usize);
        for entry in log.iter().skip(skip) {
            println!("{:>8} {}", entry.at_ms, entry.text);
        }
        printed = log.total();

        window.update(panel.output());

        let elapsed = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(elapsed) {
            thread::sleep(remaining);
        }

        if bus.overruns() != reported_overruns {
            reported_overruns = bus.overruns();
            println!("bus: {reported_overruns} rx overruns");
        }
    }
}

/// Pick the variant and schema from command-line flags.
fn config_from_args(args: impl Iterator<Item = String>) -> SystemConfig {
    let mut config = SystemConfig::FAULT_CLEAR_VARIANT;
    for arg in args {
        match arg.as_str() {
            "--page-reset" => config = SystemConfig { schema: config.schema, ..SystemConfig::PAGE_RESET_VARIANT },
            "--legacy" => config.schema = SchemaVersion::Legacy,
            other => eprintln!("ignoring unknown flag {other}"),
        }
    }
    config
}
