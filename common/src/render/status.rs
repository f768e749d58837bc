//! Status strip and hold-progress marker.
//!
//! The strip sits on top of every visible page: page label on the left,
//! active icons packed from the right edge.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, Rectangle};
use embedded_graphics::text::Text;

use super::primitives::{draw_bolt_icon, draw_low_soc_icon, draw_sun_icon, draw_wrench_icon};
use crate::config::layout::{HOLD_MARKER_SIZE, ICON_PITCH, ICON_RIGHT_X, STATUS_HEIGHT};
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::derive::StatusIcons;
use crate::input::GestureEvent;
use crate::pages::Page;
use crate::styles::{FILLED, INVERSE_SMALL_STYLE, OUTLINE, TOP_LEFT};

/// Draw the page label, active icons and the strip separator.
pub fn draw_status_strip<D>(
    display: &mut D,
    page: Page,
    icons: &StatusIcons,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_text_style(page.label(), Point::new(0, 0), INVERSE_SMALL_STYLE, TOP_LEFT)
        .draw(display)
        .ok();

    let active = [
        (icons.fault_wrench, draw_wrench_icon::<D> as fn(&mut D, Point)),
        (icons.low_soc, draw_low_soc_icon::<D>),
        (icons.charging_sun, draw_sun_icon::<D>),
        (icons.charging_bolt, draw_bolt_icon::<D>),
    ];
    let mut x = ICON_RIGHT_X;
    for (_, draw) in active.iter().filter(|(on, _)| *on) {
        draw(display, Point::new(x, 0));
        x -= ICON_PITCH;
    }

    let y = STATUS_HEIGHT as i32 - 1;
    Line::new(Point::new(0, y), Point::new(SCREEN_WIDTH as i32 - 1, y))
        .into_styled(OUTLINE)
        .draw(display)
        .ok();
}

/// Draw the marker for the gesture a release would produce now.
///
/// Outline for a page advance, half-filled for a contrast cycle, solid for a
/// long hold. Nothing while released or still inside the bounce window.
pub fn draw_hold_marker<D>(
    display: &mut D,
    pending: GestureEvent,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    let s = HOLD_MARKER_SIZE;
    let origin = Point::new((SCREEN_WIDTH - s) as i32, (SCREEN_HEIGHT - s) as i32);
    let outline = Rectangle::new(origin, Size::new(s, s));

    match pending {
        GestureEvent::None => {}
        GestureEvent::PageAdvance => {
            outline.into_styled(OUTLINE).draw(display).ok();
        }
        GestureEvent::ContrastCycle => {
            outline.into_styled(OUTLINE).draw(display).ok();
            Rectangle::new(origin + Point::new(0, (s / 2) as i32), Size::new(s, s / 2))
                .into_styled(FILLED)
                .draw(display)
                .ok();
        }
        GestureEvent::ClearFault => {
            outline.into_styled(FILLED).draw(display).ok();
        }
    }
}
