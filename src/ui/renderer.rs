//! Clock face drawing
//!
//! Angles are in degrees, 0 pointing up and increasing clockwise.

use embedded_graphics::{prelude::*, primitives::Rectangle};

use super::{
    canvas::{Canvas, ColorMode, Stroke},
    clock_face::ClockViewState,
    layer::Layer,
};
use crate::{
    config::{ClockFaceConfig, FACE_COLOR, MONOCHROME_BACKGROUND, STROKE_COLOR},
    system::time::ClockReading,
};

const FULL_CIRCLE: f32 = 360.0;

/// Angles of the minute and hour hands for a reading.
///
/// While animating, hours are on the 0–60 scale of the sweep. The creep
/// between hour marks is added in both cases.
pub fn hand_angles(time: ClockReading, animating: bool) -> (f32, f32) {
    let minute_angle = FULL_CIRCLE * time.minutes as f32 / 60.0;
    let mut hour_angle = if animating {
        // Hours out of 60 for smoothness
        FULL_CIRCLE * time.hours as f32 / 60.0
    } else {
        FULL_CIRCLE * time.hours as f32 / 12.0
    };
    hour_angle += (minute_angle / FULL_CIRCLE) * (FULL_CIRCLE / 12.0);

    (minute_angle, hour_angle)
}

/// Point at `length` pixels from `center` in the direction of `angle`
pub fn hand_end(center: Point, angle: f32, length: i32) -> Point {
    let radians = angle.to_radians();
    Point::new(
        center.x + (libm::sinf(radians) * length as f32) as i32,
        center.y + (-libm::cosf(radians) * length as f32) as i32,
    )
}

/// Center of an area, rounded towards the bottom right
pub fn center_point(area: &Rectangle) -> Point {
    area.top_left + area.size / 2
}

/// Paint background, face and hands
pub fn render<C: Canvas>(
    state: &ClockViewState,
    layer: &Layer,
    config: &ClockFaceConfig,
    canvas: &mut C,
) -> Result<(), C::Error> {
    // Re-center on the viewable area every frame
    let center = center_point(&layer.unobstructed_bounds());

    let background = match canvas.color_mode() {
        ColorMode::Color => state.palette.color(),
        ColorMode::Monochrome => MONOCHROME_BACKGROUND,
    };
    canvas.fill_rect(layer.bounds(), background)?;

    let stroke = Stroke {
        color: STROKE_COLOR,
        width: config.stroke_width,
        antialiased: config.antialiased,
    };

    // White clockface with outline
    canvas.fill_circle(center, state.radius, FACE_COLOR)?;
    canvas.draw_circle(center, state.radius, stroke)?;

    let (minute_angle, hour_angle) = hand_angles(state.mode_time(), state.animating);

    let radius = state.radius as i32;
    let margin = config.hand_margin as i32;
    let minute_hand = hand_end(center, minute_angle, radius - margin);
    let hour_hand = hand_end(center, hour_angle, radius - 2 * margin);

    // Draw hands with positive length only
    if radius > 2 * margin {
        canvas.draw_line(center, hour_hand, stroke)?;
    }
    if radius > margin {
        canvas.draw_line(center, minute_hand, stroke)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{
        canvas::{
            tests::{Command, Pixels, Recorder},
            GraphicsCanvas,
        },
        clock_face::Palette,
    };
    use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
    use rstest::rstest;

    fn layer(width: u32, height: u32) -> Layer {
        Layer::new(Rectangle::new(Point::zero(), Size::new(width, height)))
    }

    fn state(hours: u8, minutes: u8, radius: u32) -> ClockViewState {
        ClockViewState {
            last: ClockReading { hours, minutes },
            palette: Palette([200, 100, 50]),
            radius,
            final_radius: 75,
            ..Default::default()
        }
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "{actual} is not {expected}"
        );
    }

    #[test]
    fn quarter_past_three() {
        let (minute_angle, hour_angle) = hand_angles(ClockReading { hours: 3, minutes: 15 }, false);
        assert_close(minute_angle, 90.0);
        assert_close(hour_angle, 97.5);
    }

    #[test]
    fn animating_hours_are_out_of_sixty() {
        // 3:15 at the end of the sweep: hours scaled to 15
        let (minute_angle, hour_angle) = hand_angles(ClockReading { hours: 15, minutes: 15 }, true);
        assert_close(minute_angle, 90.0);
        // The minute creep is added on top of the already scaled hour
        assert_close(hour_angle, 97.5);

        let (_, hour_angle) = hand_angles(ClockReading { hours: 30, minutes: 0 }, true);
        assert_close(hour_angle, 180.0);
    }

    #[test]
    fn noon_and_midnight_point_up() {
        let (_, midnight) = hand_angles(ClockReading { hours: 0, minutes: 0 }, false);
        let (_, noon) = hand_angles(ClockReading { hours: 12, minutes: 0 }, false);
        assert_close(midnight, 0.0);
        assert_close(noon, FULL_CIRCLE);
        assert_eq!(hand_end(Point::new(50, 50), noon, 20), Point::new(50, 30));
    }

    #[rstest]
    #[case(0.0, Point::new(100, 60))]
    #[case(90.0, Point::new(140, 100))]
    #[case(180.0, Point::new(100, 140))]
    #[case(270.0, Point::new(60, 100))]
    fn hand_points_clockwise_from_up(#[case] angle: f32, #[case] expected: Point) {
        let end = hand_end(Point::new(100, 100), angle, 40);
        assert!((end.x - expected.x).abs() <= 1 && (end.y - expected.y).abs() <= 1);
    }

    #[test]
    fn paints_background_face_outline_and_hands() {
        let mut canvas = Recorder::new(ColorMode::Color);
        let config = ClockFaceConfig::default();
        render(&state(3, 15, 75), &layer(180, 180), &config, &mut canvas).unwrap();

        let center = Point::new(90, 90);
        let stroke = Stroke {
            color: STROKE_COLOR,
            width: 4,
            antialiased: true,
        };
        assert_eq!(
            canvas.commands[..3],
            [
                Command::FillRect(
                    Rectangle::new(Point::zero(), Size::new(180, 180)),
                    Rgb888::new(200, 100, 50)
                ),
                Command::FillCircle(center, 75, FACE_COLOR),
                Command::DrawCircle(center, 75, stroke),
            ]
        );
        assert_eq!(canvas.commands.len(), 5);

        // Minute hand straight right, 65px long
        let lines = canvas.lines();
        assert_eq!(lines[1], (center, Point::new(155, 90)));
        assert_eq!(lines[0].0, center);
    }

    #[test]
    fn monochrome_uses_dark_gray() {
        let mut canvas = Recorder::new(ColorMode::Monochrome);
        render(&state(3, 15, 75), &layer(144, 168), &ClockFaceConfig::default(), &mut canvas)
            .unwrap();
        assert_eq!(
            canvas.commands[0],
            Command::FillRect(
                Rectangle::new(Point::zero(), Size::new(144, 168)),
                MONOCHROME_BACKGROUND
            )
        );
    }

    #[rstest]
    #[case(0, 0)]
    #[case(10, 0)]
    #[case(11, 1)]
    #[case(20, 1)]
    #[case(21, 2)]
    #[case(75, 2)]
    fn hands_need_room(#[case] radius: u32, #[case] hands: usize) {
        let mut canvas = Recorder::new(ColorMode::Color);
        render(&state(3, 15, radius), &layer(180, 180), &ClockFaceConfig::default(), &mut canvas)
            .unwrap();
        assert_eq!(canvas.lines().len(), hands);
    }

    #[test]
    fn hour_hand_is_skipped_before_minute_hand() {
        let mut canvas = Recorder::new(ColorMode::Color);
        render(&state(3, 0, 15), &layer(180, 180), &ClockFaceConfig::default(), &mut canvas)
            .unwrap();
        // Only the 5px minute hand, pointing up
        assert_eq!(canvas.lines(), [(Point::new(90, 90), Point::new(90, 85))]);
    }

    #[test]
    fn centers_on_unobstructed_area() {
        let mut layer = layer(180, 180);
        layer.set_unobstructed_bounds(Rectangle::new(Point::zero(), Size::new(180, 130)));

        let mut canvas = Recorder::new(ColorMode::Color);
        render(&state(3, 15, 40), &layer, &ClockFaceConfig::default(), &mut canvas).unwrap();

        // Background still covers the full layer
        assert_eq!(
            canvas.commands[0],
            Command::FillRect(
                Rectangle::new(Point::zero(), Size::new(180, 180)),
                Rgb888::new(200, 100, 50)
            )
        );
        assert_eq!(canvas.commands[1], Command::FillCircle(Point::new(90, 65), 40, FACE_COLOR));
    }

    #[test]
    fn animated_reading_is_drawn_while_animating() {
        let mut animating = state(3, 15, 75);
        animating.animating = true;
        animating.animated = ClockReading { hours: 0, minutes: 0 };

        let mut canvas = Recorder::new(ColorMode::Color);
        render(&animating, &layer(180, 180), &ClockFaceConfig::default(), &mut canvas).unwrap();

        // Both hands straight up
        assert_eq!(
            canvas.lines(),
            [
                (Point::new(90, 90), Point::new(90, 35)),
                (Point::new(90, 90), Point::new(90, 25)),
            ]
        );
    }

    #[test]
    fn rasterized_face() {
        let mut pixels = Pixels::new(180, 180);
        let mut canvas = GraphicsCanvas::new(&mut pixels, ColorMode::Color);
        render(&state(3, 15, 75), &layer(180, 180), &ClockFaceConfig::default(), &mut canvas)
            .unwrap();

        let background = Rgb565::from(Rgb888::new(200, 100, 50));
        assert_eq!(pixels.at(0, 0), background);
        assert_eq!(pixels.at(179, 179), background);
        // Face inside the hands
        assert_eq!(pixels.at(60, 60), Rgb565::WHITE);
        // Minute hand towards three o'clock
        assert_eq!(pixels.at(130, 90), Rgb565::BLACK);
        // Outline at the top of the face
        assert_eq!(pixels.at(90, 16), Rgb565::BLACK);
    }
}
