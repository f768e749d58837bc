//! Low-level drawing primitives shared by the pages.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, Rectangle};

use crate::styles::{FILLED, OUTLINE};

/// Draw a horizontal bar: 1px frame of `span + 2` pixels, `fill` lit inside.
///
/// `fill` is clamped to `span`, so a bad calibration can never draw past
/// the frame.
pub fn draw_bar<D>(
    display: &mut D,
    x: i32,
    y: i32,
    span: u32,
    height: u32,
    fill: u32,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    if height < 3 {
        return;
    }
    Rectangle::new(Point::new(x, y), Size::new(span + 2, height))
        .into_styled(OUTLINE)
        .draw(display)
        .ok();

    let fill = fill.min(span);
    if fill > 0 {
        Rectangle::new(Point::new(x + 1, y + 1), Size::new(fill, height - 2))
            .into_styled(FILLED)
            .draw(display)
            .ok();
    }
}

/// Draw a polyline through `points` with a 1px stroke.
fn draw_polyline<D>(
    display: &mut D,
    points: &[Point],
) where
    D: DrawTarget<Color = BinaryColor>,
{
    for pair in points.windows(2) {
        Line::new(pair[0], pair[1]).into_styled(OUTLINE).draw(display).ok();
    }
}

// =============================================================================
// Status Icons (8x8, `origin` is the top-left corner)
// =============================================================================

/// Lightning bolt: charging from the mains charger.
pub fn draw_bolt_icon<D>(
    display: &mut D,
    origin: Point,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_polyline(
        display,
        &[
            origin + Point::new(5, 0),
            origin + Point::new(2, 4),
            origin + Point::new(5, 4),
            origin + Point::new(2, 7),
        ],
    );
}

/// Sun: charging from the solar input.
pub fn draw_sun_icon<D>(
    display: &mut D,
    origin: Point,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    Circle::new(origin + Point::new(2, 2), 4)
        .into_styled(FILLED)
        .draw(display)
        .ok();
    let c = origin + Point::new(3, 3);
    for (dx, dy) in [(0, -3), (0, 4), (-3, 0), (4, 0)] {
        Pixel(c + Point::new(dx, dy), BinaryColor::On).draw(display).ok();
    }
}

/// Battery with a single bar: state of charge low.
pub fn draw_low_soc_icon<D>(
    display: &mut D,
    origin: Point,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    Rectangle::new(origin + Point::new(0, 2), Size::new(7, 5))
        .into_styled(OUTLINE)
        .draw(display)
        .ok();
    // Terminal nub
    Line::new(origin + Point::new(7, 3), origin + Point::new(7, 5))
        .into_styled(OUTLINE)
        .draw(display)
        .ok();
    Line::new(origin + Point::new(1, 3), origin + Point::new(1, 5))
        .into_styled(OUTLINE)
        .draw(display)
        .ok();
}

/// Wrench: unacknowledged fault change.
pub fn draw_wrench_icon<D>(
    display: &mut D,
    origin: Point,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    Circle::new(origin + Point::new(4, 0), 4)
        .into_styled(OUTLINE)
        .draw(display)
        .ok();
    Line::new(origin + Point::new(4, 3), origin + Point::new(0, 7))
        .into_styled(OUTLINE)
        .draw(display)
        .ok();
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::RecordingPanel;

    #[test]
    fn test_bar_fill_length() {
        let mut panel = RecordingPanel::new();
        draw_bar(&mut panel, 10, 20, 64, 7, 32);
        // Middle row of the bar: two frame pixels plus the fill
        assert_eq!(panel.lit_in_row(23, 10, 10 + 66), 2 + 32);
    }

    #[test]
    fn test_bar_fill_never_exceeds_span() {
        let mut panel = RecordingPanel::new();
        draw_bar(&mut panel, 0, 0, 20, 7, 500);
        assert_eq!(panel.lit_in_row(3, 0, 128), 22);
    }

    #[test]
    fn test_empty_bar_draws_frame_only() {
        let mut panel = RecordingPanel::new();
        draw_bar(&mut panel, 0, 0, 20, 7, 0);
        assert_eq!(panel.lit_in_row(3, 0, 128), 2);
    }

    #[test]
    fn test_icons_stay_in_cell() {
        type IconFn = fn(&mut RecordingPanel, Point);
        let icons: [IconFn; 4] = [draw_bolt_icon, draw_sun_icon, draw_low_soc_icon, draw_wrench_icon];
        for icon in icons {
            let mut panel = RecordingPanel::new();
            icon(&mut panel, Point::new(40, 20));
            assert!(panel.lit_count() > 0);
            assert_eq!(panel.lit_in_rect(Point::new(40, 20), Size::new(8, 8)), panel.lit_count());
        }
    }
}
