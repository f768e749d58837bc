//! Timing constants for the simulator.
//!
//! These use `std::time::Duration`, which the `no_std` common crate does not
//! have, so they live here.

use std::time::Duration;

/// Loop period (~50 Hz). The loop sleeps if a tick completes early.
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// Interval between frames from the simulated BMS.
pub const BMS_FRAME_INTERVAL_MS: u64 = 100;
