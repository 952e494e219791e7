//! UI definitions module

pub mod animation;
pub mod canvas;
pub mod clock_face;
pub mod layer;
pub mod renderer;

use canvas::Canvas;

pub trait WatchFace {
    /// Paint the current state of the watchface
    fn draw<C: Canvas>(&self, canvas: &mut C) -> Result<(), C::Error>;
}
