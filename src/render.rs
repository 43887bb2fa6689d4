//! Frame painting.
//!
//! Pure translation of (weather, clock, mode, layout) into [`Surface`] draw
//! calls. Nothing here mutates face state; the engine owns the brushes and
//! layout and hands them in by reference.
//!
//! ```text
//!  ┌──────────────────────────────┐
//!  │                       [icon] │  icon: right edge, top inset
//!  │  HH:MM                       │  time:  (x, y_offset + round)
//!  │  Sun, Mar 03 2024            │  date:  (x, y_offset_date + round)
//!  │      75° | 58°               │  temps: (2x, y_offset_temperature + round)
//!  └──────────────────────────────┘
//! ```

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;

use crate::app::ports::Surface;
use crate::clock::ClockSnapshot;
use crate::config::{ColorScheme, ShapeLayout, rgb};
use crate::mode::{DisplayMode, FaceShape};
use crate::weather::WeatherState;

// ───────────────────────────────────────────────────────────────
// Brushes
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Typeface {
    #[default]
    Normal,
    BoldItalic,
}

/// Paint style for one kind of draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    pub color: Rgb888,
    /// Text size in pixels; ignored for fills.
    pub text_size: u32,
    pub anti_alias: bool,
    pub typeface: Typeface,
}

impl Brush {
    pub const fn solid(color: Rgb888) -> Self {
        Self {
            color,
            text_size: 0,
            anti_alias: false,
            typeface: Typeface::Normal,
        }
    }

    pub const fn text(color: Rgb888, typeface: Typeface) -> Self {
        Self {
            color,
            text_size: 0,
            anti_alias: true,
            typeface,
        }
    }
}

/// All brushes the face paints with. The temperature brush also draws
/// the icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brushes {
    pub background: Brush,
    pub time: Brush,
    pub date: Brush,
    pub temperature: Brush,
}

impl Brushes {
    pub fn new(colors: &ColorScheme, layout: &ShapeLayout) -> Self {
        let mut brushes = Self {
            background: Brush::solid(rgb(colors.background)),
            time: Brush::text(rgb(colors.time_text), Typeface::Normal),
            date: Brush::text(rgb(colors.date_text), Typeface::Normal),
            temperature: Brush::text(rgb(colors.temperature_text), Typeface::BoldItalic),
        };
        brushes.apply_layout(layout);
        brushes
    }

    /// Resize text for a face shape.
    pub fn apply_layout(&mut self, layout: &ShapeLayout) {
        self.time.text_size = layout.text_size;
        self.date.text_size = layout.text_size.saturating_sub(layout.date_size_cutoff);
        self.temperature.text_size = layout.temperature_text_size;
    }

    /// Toggle anti-aliasing on every text and image brush.
    pub fn set_anti_alias(&mut self, enabled: bool) {
        for brush in [&mut self.time, &mut self.date, &mut self.temperature] {
            brush.anti_alias = enabled;
        }
    }

    pub fn text_brushes(&self) -> [&Brush; 3] {
        [&self.time, &self.date, &self.temperature]
    }
}

// ───────────────────────────────────────────────────────────────
// Layout
// ───────────────────────────────────────────────────────────────

/// Resolved positions for one face shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub shape: FaceShape,
    x_offset: i32,
    round_offset: i32,
    time_y: i32,
    date_y: i32,
    temperature_y: i32,
}

impl Layout {
    pub fn new(shape: FaceShape, table: &ShapeLayout) -> Self {
        Self {
            shape,
            x_offset: table.x_offset,
            round_offset: table.round_offset,
            time_y: table.y_offset,
            date_y: table.y_offset_date,
            temperature_y: table.y_offset_temperature,
        }
    }

    pub fn time_origin(&self) -> Point {
        Point::new(self.x_offset, self.time_y + self.round_offset)
    }

    pub fn date_origin(&self) -> Point {
        Point::new(self.x_offset, self.date_y + self.round_offset)
    }

    pub fn temperature_origin(&self) -> Point {
        Point::new(self.x_offset * 2, self.temperature_y + self.round_offset)
    }

    /// Top-left of the icon, measured from the right edge of `bounds`.
    pub fn icon_origin(&self, bounds: &Rectangle) -> Point {
        let width = bounds.size.width as i32;
        Point::new(
            bounds.top_left.x + width - 3 * self.x_offset + 2 * self.round_offset,
            bounds.top_left.y + 4 * self.round_offset,
        )
    }
}

// ───────────────────────────────────────────────────────────────
// Painting
// ───────────────────────────────────────────────────────────────

/// Everything a frame depends on.
pub struct Frame<'a> {
    pub bounds: Rectangle,
    pub mode: DisplayMode,
    pub brushes: &'a Brushes,
    pub layout: &'a Layout,
    pub clock: &'a ClockSnapshot,
    pub weather: &'a WeatherState,
}

/// Paint one frame.
pub fn paint(surface: &mut impl Surface, frame: &Frame<'_>) {
    let brushes = frame.brushes;
    let layout = frame.layout;

    if frame.mode.is_ambient() {
        surface.fill(Rgb888::BLACK);
    } else {
        surface.draw_rect(frame.bounds, &brushes.background);
    }

    surface.draw_text(&frame.clock.time_label, layout.time_origin(), &brushes.time);
    surface.draw_text(&frame.clock.date_label, layout.date_origin(), &brushes.date);

    if let Some(line) = frame.weather.temperature_line() {
        surface.draw_text(&line, layout.temperature_origin(), &brushes.temperature);
    }

    if let Some(icon) = frame.weather.icon() {
        surface.draw_icon(&icon, layout.icon_origin(&frame.bounds), &brushes.temperature);
    }
}
