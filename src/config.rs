//! Clock face configuration

use embassy_time::Duration;
use embedded_graphics::pixelcolor::Rgb888;

/// Length of the radius grow-in, the hand sweep takes twice as long
pub const ANIMATION_DURATION: Duration = Duration::from_millis(500);
/// Pause between showing the face and starting the grow-in
pub const ANIMATION_DELAY: Duration = Duration::from_millis(600);
/// Distance between the minute hand tip and the face outline, doubled for the hour hand
pub const HAND_MARGIN: u32 = 10;
/// Horizontal space left around the fully grown face
pub const RADIUS_INSET: u32 = 30;
/// Outline and hand stroke width in pixels
pub const STROKE_WIDTH: u32 = 4;
/// Interval between animation frames
pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);

pub const FACE_COLOR: Rgb888 = Rgb888::new(0xff, 0xff, 0xff);
pub const STROKE_COLOR: Rgb888 = Rgb888::new(0x00, 0x00, 0x00);
/// Background on displays without color support
pub const MONOCHROME_BACKGROUND: Rgb888 = Rgb888::new(0x55, 0x55, 0x55);

/// Geometry and timing of the clock face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockFaceConfig {
    /// Radius animation length
    pub animation_duration: Duration,
    /// Delay before both animations start
    pub animation_delay: Duration,
    pub hand_margin: u32,
    pub radius_inset: u32,
    pub stroke_width: u32,
    pub antialiased: bool,
}

impl Default for ClockFaceConfig {
    fn default() -> Self {
        Self {
            animation_duration: ANIMATION_DURATION,
            animation_delay: ANIMATION_DELAY,
            hand_margin: HAND_MARGIN,
            radius_inset: RADIUS_INSET,
            stroke_width: STROKE_WIDTH,
            antialiased: true,
        }
    }
}

impl ClockFaceConfig {
    /// Radius of the fully grown face for a viewable area of the given width
    pub fn final_radius(&self, width: u32) -> u32 {
        width.saturating_sub(self.radius_inset) / 2
    }

    /// Duration of the coupled hour/minute sweep
    pub fn hands_duration(&self) -> Duration {
        self.animation_duration * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_radius_leaves_inset() {
        let config = ClockFaceConfig::default();
        assert_eq!(config.final_radius(180), 75);
        assert_eq!(config.final_radius(240), 105);
        assert_eq!(config.final_radius(144), 57);
    }

    #[test]
    fn final_radius_of_narrow_area_is_zero() {
        assert_eq!(ClockFaceConfig::default().final_radius(20), 0);
    }

    #[test]
    fn hands_take_twice_as_long() {
        let config = ClockFaceConfig::default();
        assert_eq!(config.hands_duration(), Duration::from_millis(1000));
    }
}
