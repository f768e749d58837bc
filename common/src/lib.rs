//! Core logic for the BMS telemetry display.
//!
//! This crate is platform-agnostic and shared between the desktop simulator
//! and the firmware. Hardware is reached only through the traits in [`io`].
//!
//! - [`frame`]: Raw CAN frames and decode errors
//! - [`schema`]: Byte-offset tables per firmware schema version
//! - [`telemetry`]: Physically-scaled telemetry records
//! - [`decode`]: Frame decoder and encoder
//! - [`store`]: Latest-value telemetry cache
//! - [`derive`]: Power, endurance, bar fills, fault labels and status icons
//! - [`input`]: Button gesture classification
//! - [`pages`]: Page navigation enum
//! - [`display_state`]: Page, contrast and power-save state machine
//! - [`render`]: Page renderers for a monochrome `DrawTarget`
//! - [`system`]: Loop state and the per-tick pipeline
//! - [`event_log`]: Event line ring buffer
//! - [`config`]: Panel layout constants
//! - [`styles`]: Pre-computed text and primitive styles
//! - [`thresholds`]: Hold thresholds and calibrations
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` outside of tests and never allocates. With the
//! `defmt` feature enabled, public types derive `defmt::Format` and the
//! internal logging macros forward to `defmt`.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

#[macro_use]
mod fmt;

pub mod config;
pub mod decode;
pub mod derive;
pub mod display_state;
pub mod event_log;
pub mod frame;
pub mod input;
pub mod io;
pub mod pages;
pub mod render;
pub mod schema;
pub mod store;
pub mod styles;
pub mod system;
pub mod telemetry;
pub mod thresholds;

// Re-export commonly used items
pub use decode::decode;
pub use frame::{DecodeError, Frame};
pub use pages::Page;
pub use schema::SchemaVersion;
pub use system::{SystemConfig, SystemState, TickReport, tick};
pub use telemetry::TelemetryRecord;
