//! Drawing surface the watch face paints onto

use embedded_graphics::{
    pixelcolor::{Rgb565, Rgb888},
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle},
};

/// Color capability of the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum ColorMode {
    Color,
    Monochrome,
}

/// Outline style for circles and lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    pub color: Rgb888,
    pub width: u32,
    pub antialiased: bool,
}

/// Drawing primitives of the host graphics context
pub trait Canvas {
    type Error;

    fn color_mode(&self) -> ColorMode;

    fn fill_rect(&mut self, area: Rectangle, color: Rgb888) -> Result<(), Self::Error>;

    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb888)
        -> Result<(), Self::Error>;

    fn draw_circle(&mut self, center: Point, radius: u32, stroke: Stroke)
        -> Result<(), Self::Error>;

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) -> Result<(), Self::Error>;
}

/// Canvas backed by an embedded-graphics draw target, e.g. the ST7789 panel.
///
/// embedded-graphics has no anti-aliasing, so `Stroke::antialiased` is ignored.
pub struct GraphicsCanvas<'a, D> {
    target: &'a mut D,
    mode: ColorMode,
}

impl<'a, D> GraphicsCanvas<'a, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: &'a mut D, mode: ColorMode) -> Self {
        Self { target, mode }
    }
}

impl<D> Canvas for GraphicsCanvas<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    type Error = D::Error;

    fn color_mode(&self) -> ColorMode {
        self.mode
    }

    fn fill_rect(&mut self, area: Rectangle, color: Rgb888) -> Result<(), Self::Error> {
        self.target.fill_solid(&area, color.into())
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: u32,
        color: Rgb888,
    ) -> Result<(), Self::Error> {
        Circle::with_center(center, radius * 2)
            .into_styled(PrimitiveStyle::with_fill(color.into()))
            .draw(&mut *self.target)
    }

    fn draw_circle(
        &mut self,
        center: Point,
        radius: u32,
        stroke: Stroke,
    ) -> Result<(), Self::Error> {
        let style = PrimitiveStyleBuilder::new()
            .stroke_color(stroke.color.into())
            .stroke_width(stroke.width)
            .build();

        Circle::with_center(center, radius * 2)
            .into_styled(style)
            .draw(&mut *self.target)
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) -> Result<(), Self::Error> {
        Line::new(from, to)
            .into_styled(PrimitiveStyle::with_stroke(stroke.color.into(), stroke.width))
            .draw(&mut *self.target)
    }
}
