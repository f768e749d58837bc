//! Pre-computed text styles.
//!
//! All styles are `const`, so renderers reference them directly instead of
//! building a `MonoTextStyle` per draw call. The panel is monochrome: "on"
//! pixels are lit, "inverse" styles draw dark text on a lit background.

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle, MonoTextStyleBuilder,
        ascii::{FONT_5X8, FONT_6X10},
    },
    pixelcolor::BinaryColor,
    primitives::PrimitiveStyle,
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::PROFONT_12_POINT;

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Left-aligned, positioned by the top edge. Used for every line of text.
pub const TOP_LEFT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .build();

/// Centered, positioned by the top edge. Used for the SOC value inside the arc.
pub const TOP_CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Top)
    .build();

// =============================================================================
// Fonts
// =============================================================================

/// Small font for dense pages (diagnostics, bar labels).
pub const SMALL_FONT: &MonoFont = &FONT_5X8;

/// Readout font on the gauge page.
pub const READOUT_FONT: &MonoFont = &FONT_6X10;

// =============================================================================
// Text Styles
// =============================================================================

pub const SMALL_STYLE: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(SMALL_FONT, BinaryColor::On);

pub const READOUT_STYLE: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(READOUT_FONT, BinaryColor::On);

/// Large SOC value in the middle of the gauge arc.
pub const VALUE_STYLE: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(&PROFONT_12_POINT, BinaryColor::On);

/// Page label in the status strip, drawn dark on a lit box.
pub const INVERSE_SMALL_STYLE: MonoTextStyle<'static, BinaryColor> = MonoTextStyleBuilder::new()
    .font(SMALL_FONT)
    .text_color(BinaryColor::Off)
    .background_color(BinaryColor::On)
    .build();

// =============================================================================
// Primitive Styles
// =============================================================================

pub const OUTLINE: PrimitiveStyle<BinaryColor> = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

pub const FILLED: PrimitiveStyle<BinaryColor> = PrimitiveStyle::with_fill(BinaryColor::On);

/// SOC arc track (thin) and value (thick).
pub const ARC_TRACK: PrimitiveStyle<BinaryColor> = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
pub const ARC_VALUE: PrimitiveStyle<BinaryColor> = PrimitiveStyle::with_stroke(BinaryColor::On, 4);
