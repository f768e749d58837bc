//! Display configuration.
//!
//! - `layout`: Panel dimensions and pre-computed page geometry

pub mod layout;

// Re-export layout constants at config level for convenience
pub use layout::{CENTER_X, SCREEN_HEIGHT, SCREEN_WIDTH, STATUS_HEIGHT};
