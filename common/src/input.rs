//! Single-button gesture classification.
//!
//! The button is sampled once per tick. A press is timed from its first
//! pressed sample, and the hold duration is classified only on the release
//! edge, so nothing is emitted while the button is still down.

use crate::thresholds::{DEBOUNCE_FLOOR_MS, LONG_HOLD_FAULT_CLEAR_MS, LONG_HOLD_PAGE_RESET_MS, MEDIUM_HOLD_MS};

/// Gesture produced by one press/release cycle.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureEvent {
    /// Bounce, or nothing happened this tick.
    #[default]
    None,
    PageAdvance,
    ContrastCycle,
    /// Long hold; what it does is decided by the display's long-hold policy.
    ClearFault,
}

impl GestureEvent {
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PageAdvance => "page",
            Self::ContrastCycle => "contrast",
            Self::ClearFault => "long hold",
        }
    }
}

// =============================================================================
// Threshold Sets
// =============================================================================

/// Hold-time boundaries, in milliseconds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HoldThresholds {
    pub debounce_floor_ms: u64,
    pub medium_ms: u64,
    pub long_ms: u64,
}

impl HoldThresholds {
    /// Builds where a long hold sends the fault-clear request.
    pub const FAULT_CLEAR: Self = Self {
        debounce_floor_ms: DEBOUNCE_FLOOR_MS,
        medium_ms: MEDIUM_HOLD_MS,
        long_ms: LONG_HOLD_FAULT_CLEAR_MS,
    };

    /// Builds where a long hold turns the display off.
    pub const PAGE_RESET: Self = Self {
        debounce_floor_ms: DEBOUNCE_FLOOR_MS,
        medium_ms: MEDIUM_HOLD_MS,
        long_ms: LONG_HOLD_PAGE_RESET_MS,
    };

    #[inline]
    pub const fn is_valid(&self) -> bool { self.debounce_floor_ms < self.medium_ms && self.medium_ms < self.long_ms }

    /// Lower bound of each gesture, longest first.
    const fn table(&self) -> [(u64, GestureEvent); 3] {
        [
            (self.long_ms, GestureEvent::ClearFault),
            (self.medium_ms, GestureEvent::ContrastCycle),
            (self.debounce_floor_ms, GestureEvent::PageAdvance),
        ]
    }

    /// Gesture for a completed hold of `held_ms`.
    pub fn classify(
        &self,
        held_ms: u64,
    ) -> GestureEvent {
        self.table()
            .into_iter()
            .find(|&(floor, _)| held_ms >= floor)
            .map_or(GestureEvent::None, |(_, event)| event)
    }
}

impl Default for HoldThresholds {
    fn default() -> Self { Self::FAULT_CLEAR }
}

const _: () = assert!(HoldThresholds::FAULT_CLEAR.is_valid());
const _: () = assert!(HoldThresholds::PAGE_RESET.is_valid());

// =============================================================================
// Classifier
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ButtonPhase {
    Released,
    Pressed { since_ms: u64 },
}

/// Press timer with release-edge classification.
#[derive(Clone, Copy, Debug)]
pub struct ButtonClassifier {
    thresholds: HoldThresholds,
    phase: ButtonPhase,
}

impl ButtonClassifier {
    pub const fn new(thresholds: HoldThresholds) -> Self {
        Self {
            thresholds,
            phase: ButtonPhase::Released,
        }
    }

    #[inline]
    pub const fn thresholds(&self) -> HoldThresholds { self.thresholds }

    #[inline]
    pub const fn is_held(&self) -> bool { matches!(self.phase, ButtonPhase::Pressed { .. }) }

    /// Feed one sample. Returns a gesture only on the release edge.
    ///
    /// A clock that moved backwards counts as zero elapsed time.
    pub fn sample(
        &mut self,
        pressed: bool,
        now_ms: u64,
    ) -> GestureEvent {
        match (self.phase, pressed) {
            (ButtonPhase::Released, true) => {
                self.phase = ButtonPhase::Pressed { since_ms: now_ms };
                GestureEvent::None
            }
            (ButtonPhase::Pressed { since_ms }, false) => {
                self.phase = ButtonPhase::Released;
                let held = now_ms.saturating_sub(since_ms);
                let event = self.thresholds.classify(held);
                debug!("button released after {} ms: {}", held, event.label());
                event
            }
            _ => GestureEvent::None,
        }
    }

    /// What a release at `now_ms` would produce, `None` when released.
    pub fn pending(
        &self,
        now_ms: u64,
    ) -> GestureEvent {
        match self.phase {
            ButtonPhase::Released => GestureEvent::None,
            ButtonPhase::Pressed { since_ms } => self.thresholds.classify(now_ms.saturating_sub(since_ms)),
        }
    }
}

impl Default for ButtonClassifier {
    fn default() -> Self { Self::new(HoldThresholds::default()) }
}

// =============================================================================
// Unit Tests
// =============================================================================
