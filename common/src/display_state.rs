//! Display state machine: page, contrast and power save.
//!
//! Gestures come in from the [`crate::input`] classifier; side effects for the
//! panel and bus go out as a [`DisplayEffects`] value so the caller decides
//! how to apply them.

use crate::input::GestureEvent;
use crate::pages::Page;
use crate::thresholds::CONTRAST_LEVELS;

/// What a long hold does.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LongHoldPolicy {
    /// Send the fault-clear request; page unchanged.
    #[default]
    ClearFault,
    /// Turn the display off.
    ResetToOff,
    /// Send the fault-clear request and turn the display off.
    ClearFaultAndReset,
}

impl LongHoldPolicy {
    #[inline]
    pub const fn sends_fault_clear(self) -> bool { matches!(self, Self::ClearFault | Self::ClearFaultAndReset) }

    #[inline]
    pub const fn resets_page(self) -> bool { matches!(self, Self::ResetToOff | Self::ClearFaultAndReset) }
}

/// Side effects requested by one gesture.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayEffects {
    /// New power-save state, when it changed.
    pub power_save: Option<bool>,
    /// New contrast level, when it changed.
    pub contrast: Option<u8>,
    pub send_fault_clear: bool,
}

impl DisplayEffects {
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.power_save.is_none() && self.contrast.is_none() && !self.send_fault_clear
    }
}

/// Current page and contrast selection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    page: Page,
    contrast_index: usize,
    policy: LongHoldPolicy,
}

impl DisplayState {
    /// Starts at `page` with the lowest contrast level.
    pub const fn new(
        page: Page,
        policy: LongHoldPolicy,
    ) -> Self {
        Self {
            page,
            contrast_index: 0,
            policy,
        }
    }

    #[inline]
    pub const fn page(&self) -> Page { self.page }

    #[inline]
    pub const fn contrast(&self) -> u8 { CONTRAST_LEVELS[self.contrast_index] }

    #[inline]
    pub const fn policy(&self) -> LongHoldPolicy { self.policy }

    #[inline]
    pub const fn power_save(&self) -> bool { self.page.is_off() }

    /// Apply one gesture and report what the panel and bus must do.
    pub fn apply(
        &mut self,
        event: GestureEvent,
    ) -> DisplayEffects {
        let mut effects = DisplayEffects::default();
        match event {
            GestureEvent::None => {}
            GestureEvent::PageAdvance => {
                effects.power_save = self.set_page(self.page.next());
            }
            GestureEvent::ContrastCycle => {
                self.contrast_index = (self.contrast_index + 1) % CONTRAST_LEVELS.len();
                effects.contrast = Some(self.contrast());
            }
            GestureEvent::ClearFault => {
                effects.send_fault_clear = self.policy.sends_fault_clear();
                if self.policy.resets_page() {
                    effects.power_save = self.set_page(Page::Off);
                }
            }
        }
        effects
    }

    /// Switch page; returns the new power-save state if Off was entered or left.
    fn set_page(
        &mut self,
        page: Page,
    ) -> Option<bool> {
        let was_off = self.page.is_off();
        self.page = page;
        (was_off != page.is_off()).then_some(page.is_off())
    }
}

impl Default for DisplayState {
    fn default() -> Self { Self::new(Page::default(), LongHoldPolicy::default()) }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_advance_from_off_wakes_panel() {
        let mut s = DisplayState::new(Page::Off, LongHoldPolicy::ClearFault);
        let fx = s.apply(GestureEvent::PageAdvance);
        assert_eq!(s.page(), Page::Gauge);
        assert_eq!(fx.power_save, Some(false));
        assert!(!fx.send_fault_clear);
    }

    #[test]
    fn test_page_cycle_has_no_power_effect() {
        let mut s = DisplayState::new(Page::Gauge, LongHoldPolicy::ClearFault);
        for expected in [Page::Bars, Page::Diagnostics, Page::Gauge] {
            let fx = s.apply(GestureEvent::PageAdvance);
            assert_eq!(s.page(), expected);
            assert!(fx.is_empty());
        }
    }

    #[test]
    fn test_contrast_cycles_and_wraps() {
        let mut s = DisplayState::default();
        assert_eq!(s.contrast(), 80);
        assert_eq!(s.apply(GestureEvent::ContrastCycle).contrast, Some(160));
        assert_eq!(s.apply(GestureEvent::ContrastCycle).contrast, Some(255));
        assert_eq!(s.apply(GestureEvent::ContrastCycle).contrast, Some(80));
    }

    #[test]
    fn test_long_hold_clear_fault_keeps_page() {
        let mut s = DisplayState::new(Page::Bars, LongHoldPolicy::ClearFault);
        let fx = s.apply(GestureEvent::ClearFault);
        assert!(fx.send_fault_clear);
        assert_eq!(fx.power_save, None);
        assert_eq!(s.page(), Page::Bars);
    }

    #[test]
    fn test_long_hold_reset_to_off() {
        let mut s = DisplayState::new(Page::Diagnostics, LongHoldPolicy::ResetToOff);
        let fx = s.apply(GestureEvent::ClearFault);
        assert!(!fx.send_fault_clear);
        assert_eq!(fx.power_save, Some(true));
        assert_eq!(s.page(), Page::Off);
        assert!(s.power_save());

        // Already off: no repeated power-save request
        let fx = s.apply(GestureEvent::ClearFault);
        assert!(fx.is_empty());
    }

    #[test]
    fn test_long_hold_clear_and_reset() {
        let mut s = DisplayState::new(Page::Gauge, LongHoldPolicy::ClearFaultAndReset);
        let fx = s.apply(GestureEvent::ClearFault);
        assert!(fx.send_fault_clear);
        assert_eq!(fx.power_save, Some(true));
        assert_eq!(s.page(), Page::Off);
    }

    #[test]
    fn test_none_is_inert() {
        let mut s = DisplayState::new(Page::Gauge, LongHoldPolicy::ClearFaultAndReset);
        let before = s;
        assert!(s.apply(GestureEvent::None).is_empty());
        assert_eq!(s, before);
    }
}
