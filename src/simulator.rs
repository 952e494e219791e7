//! Desktop stand-in for the PineTime display and watch OS

use std::convert::Infallible;

use clockface::{App, HostEvent};
use embassy_time::{Duration, Timer};
use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};
use fastrand::Rng;

use crate::{face_loop, OBSTRUCTION, POP_WINDOW};
use clockface::ui::canvas::ColorMode;

pub const SCREEN_W: u32 = 240;
pub const SCREEN_H: u32 = 240;

/// Height of the simulated notification banner
const BANNER_H: u32 = 60;

/// In-memory RGB565 panel
pub struct FrameBuffer {
    data: Vec<Rgb565>,
    /// Pixels written since the buffer was created
    writes: usize,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            data: vec![Rgb565::BLACK; (SCREEN_W * SCREEN_H) as usize],
            writes: 0,
        }
    }

    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        if self.bounding_box().contains(point) {
            Some(self.data[(point.y as u32 * SCREEN_W + point.x as u32) as usize])
        } else {
            None
        }
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(SCREEN_W, SCREEN_H)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let area = self.bounding_box();
        for Pixel(point, color) in pixels {
            if area.contains(point) {
                self.data[(point.y as u32 * SCREEN_W + point.x as u32) as usize] = color;
                self.writes += 1;
            }
        }
        Ok(())
    }
}

/// Slide a banner over the bottom of the screen and take it away again,
/// then close the window
#[embassy_executor::task]
pub async fn obstruct() {
    let full = Rectangle::new(Point::zero(), Size::new(SCREEN_W, SCREEN_H));
    let obstructed = Rectangle::new(Point::zero(), Size::new(SCREEN_W, SCREEN_H - BANNER_H));

    // Let the first grow-in finish
    Timer::after(Duration::from_secs(3)).await;

    info!("Banner appears");
    OBSTRUCTION.send(HostEvent::UnobstructedWillChange(obstructed)).await;
    Timer::after(Duration::from_millis(250)).await;
    OBSTRUCTION.send(HostEvent::UnobstructedDidChange).await;

    Timer::after(Duration::from_secs(3)).await;

    info!("Banner disappears");
    OBSTRUCTION.send(HostEvent::UnobstructedWillChange(full)).await;
    Timer::after(Duration::from_millis(250)).await;
    OBSTRUCTION.send(HostEvent::UnobstructedDidChange).await;

    Timer::after(Duration::from_secs(3)).await;
    POP_WINDOW.signal(());
}

/// Run the watch face on the simulated panel until the window is popped
#[embassy_executor::task]
pub async fn run_face(mut app: App<Rng>) {
    let mut screen = FrameBuffer::new();
    face_loop(&mut app, &mut screen, ColorMode::Color).await;

    let center = Point::new(SCREEN_W as i32 / 2, SCREEN_H as i32 / 2);
    info!(
        "Window closed after {} pixel writes, center pixel {:?}",
        screen.writes,
        screen.pixel(center)
    );

    drop(app);
    std::process::exit(0);
}

