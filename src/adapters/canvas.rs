//! embedded-graphics surface adapter.
//!
//! [`CanvasSurface`] implements [`Surface`] on any `DrawTarget<Color = Rgb888>`;
//! [`FrameBuffer`] is a heap-backed target for the simulator and tests.
//!
//! Text uses the ISO-8859-1 mono fonts (the degree sign is in range),
//! picked by the brush's text size. Mono fonts have no anti-aliasing, so
//! that brush flag only matters for backends that can honour it.

use core::convert::Infallible;

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, iso_8859_1};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use log::warn;

use crate::app::ports::Surface;
use crate::render::{Brush, Typeface};
use crate::weather::Icon;

/// Largest font whose glyph height fits the requested size.
fn font_for(brush: &Brush) -> &'static MonoFont<'static> {
    match (brush.typeface, brush.text_size) {
        (Typeface::BoldItalic, 30..) => &iso_8859_1::FONT_9X18_BOLD,
        (Typeface::BoldItalic, _) => &iso_8859_1::FONT_8X13_ITALIC,
        (Typeface::Normal, 35..) => &iso_8859_1::FONT_10X20,
        (Typeface::Normal, 25..) => &iso_8859_1::FONT_9X18,
        (Typeface::Normal, 13..) => &iso_8859_1::FONT_7X13,
        (Typeface::Normal, _) => &iso_8859_1::FONT_6X10,
    }
}

pub struct CanvasSurface<D> {
    target: D,
}

impl<D> CanvasSurface<D>
where
    D: DrawTarget<Color = Rgb888>,
    D::Error: core::fmt::Debug,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }

    fn report(result: Result<(), D::Error>, what: &str) {
        if let Err(e) = result {
            warn!("Canvas: {} failed: {:?}", what, e);
        }
    }
}

impl<D> Surface for CanvasSurface<D>
where
    D: DrawTarget<Color = Rgb888>,
    D::Error: core::fmt::Debug,
{
    fn fill(&mut self, color: Rgb888) {
        Self::report(self.target.clear(color), "fill");
    }

    fn draw_rect(&mut self, rect: Rectangle, brush: &Brush) {
        let result = rect
            .into_styled(PrimitiveStyle::with_fill(brush.color))
            .draw(&mut self.target);
        Self::report(result, "rect");
    }

    fn draw_text(&mut self, text: &str, origin: Point, brush: &Brush) {
        let style = MonoTextStyle::new(font_for(brush), brush.color);
        let result = Text::with_baseline(text, origin, style, Baseline::Alphabetic)
            .draw(&mut self.target)
            .map(|_| ());
        Self::report(result, "text");
    }

    fn draw_icon(&mut self, icon: &Icon, origin: Point, _brush: &Brush) {
        let area = Rectangle::new(origin, icon.size());
        let result = self
            .target
            .fill_contiguous(&area, icon.pixels().iter().copied());
        Self::report(result, "icon");
    }
}

// ───────────────────────────────────────────────────────────────
// FrameBuffer
// ───────────────────────────────────────────────────────────────

/// In-memory RGB framebuffer implementing `DrawTarget<Color = Rgb888>`.
///
/// Out-of-bounds pixels are clipped silently.
pub struct FrameBuffer {
    size: Size,
    pixels: Vec<Rgb888>,
}

impl FrameBuffer {
    /// Allocate a black framebuffer.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![Rgb888::BLACK; size.width as usize * size.height as usize],
        }
    }

    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), self.size)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.size.width as usize + x as usize)
            .copied()
    }

    /// Number of pixels currently set to `color`.
    pub fn count(&self, color: Rgb888) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (usize::try_from(point.x).ok()?, usize::try_from(point.y).ok()?);
        let (w, h) = (self.size.width as usize, self.size.height as usize);
        (x < w && y < h).then_some(y * w + x)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Some(idx) = self.index(coord) {
                self.pixels[idx] = color;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}
