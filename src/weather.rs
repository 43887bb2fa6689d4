//! Weather state shown on the face.
//!
//! [`WeatherState`] is owned by one engine. Temperatures are written only by
//! the payload path; the icon is written only by the icon worker through the
//! shared [`IconSlot`], and read by the render path.
//!
//! ```text
//!   payload ──▶ merge(high, low) ──▶ WeatherState ◀── render
//!                                         │
//!   icon worker ──▶ IconSlot::complete ───┘ (atomic swap + repaint signal)
//! ```

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwapOption;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::Rgb888;
use log::debug;

/// Rendered in place of a temperature that has never been received.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Icons larger than this on either axis are rejected.
pub const MAX_ICON_DIM: u32 = 512;

// ───────────────────────────────────────────────────────────────
// Temperature
// ───────────────────────────────────────────────────────────────

/// A temperature string as sent by the phone (already unit-formatted).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Temperature {
    #[default]
    Unknown,
    Known(String),
}

impl Temperature {
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unknown => UNKNOWN_LABEL,
            Self::Known(s) => s,
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ───────────────────────────────────────────────────────────────
// Icon
// ───────────────────────────────────────────────────────────────

/// A decoded weather icon, row-major RGB.
#[derive(Debug, Clone, PartialEq)]
pub struct Icon {
    size: Size,
    pixels: Vec<Rgb888>,
}

impl Icon {
    /// Returns `None` if `pixels` does not match `size`.
    pub fn new(size: Size, pixels: Vec<Rgb888>) -> Option<Self> {
        let expected = size.width as usize * size.height as usize;
        (pixels.len() == expected).then_some(Self { size, pixels })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.size.width as usize + x as usize)
            .copied()
    }
}

// ───────────────────────────────────────────────────────────────
// IconSlot
// ───────────────────────────────────────────────────────────────

/// Single-slot handoff from the icon worker to the render path.
///
/// Last writer wins. Once [`retire`](Self::retire)d (engine teardown),
/// completions are discarded without touching the stored icon.
pub struct IconSlot {
    icon: ArcSwapOption<Icon>,
    alive: AtomicBool,
    repaint: Signal<CriticalSectionRawMutex, ()>,
}

impl Default for IconSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl IconSlot {
    pub fn new() -> Self {
        Self {
            icon: ArcSwapOption::const_empty(),
            alive: AtomicBool::new(true),
            repaint: Signal::new(),
        }
    }

    /// Current icon, if one has been resolved.
    pub fn load(&self) -> Option<Arc<Icon>> {
        self.icon.load_full()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Apply a worker result.
    ///
    /// `Some` replaces the icon and raises the repaint signal; `None` keeps
    /// the previous icon. Returns `true` only if the icon was replaced.
    pub fn complete(&self, icon: Option<Icon>) -> bool {
        if !self.is_alive() {
            debug!("IconSlot: engine gone, discarding completion");
            return false;
        }
        let Some(icon) = icon else {
            return false;
        };
        self.icon.store(Some(Arc::new(icon)));
        // A retire() racing the store above must still win.
        if !self.is_alive() {
            self.icon.store(None);
            return false;
        }
        self.repaint.signal(());
        true
    }

    /// Consume a pending repaint request raised by [`complete`](Self::complete).
    /// Always `false` once retired.
    pub fn take_repaint(&self) -> bool {
        self.repaint.try_take().is_some() && self.is_alive()
    }

    /// Wait for the next completed icon (simulator and tests).
    pub async fn wait_repaint(&self) {
        self.repaint.wait().await;
    }

    /// Stop accepting completions and drop the stored icon. Irreversible.
    pub fn retire(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.clear();
    }

    fn clear(&self) {
        self.icon.store(None);
        self.repaint.reset();
    }
}

// ───────────────────────────────────────────────────────────────
// WeatherState
// ───────────────────────────────────────────────────────────────

/// Latest known weather for one engine.
pub struct WeatherState {
    high: Temperature,
    low: Temperature,
    icon: Arc<IconSlot>,
}

impl Default for WeatherState {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherState {
    pub fn new() -> Self {
        Self {
            high: Temperature::Unknown,
            low: Temperature::Unknown,
            icon: Arc::new(IconSlot::new()),
        }
    }

    pub fn high(&self) -> &Temperature {
        &self.high
    }

    pub fn low(&self) -> &Temperature {
        &self.low
    }

    pub fn icon(&self) -> Option<Arc<Icon>> {
        self.icon.load()
    }

    /// Shared handle given to the icon worker.
    pub fn icon_slot(&self) -> &Arc<IconSlot> {
        &self.icon
    }

    /// Replace present fields, keep absent ones. Empty strings count as
    /// absent. Returns `true` if anything changed.
    pub fn merge(&mut self, high: Option<&str>, low: Option<&str>) -> bool {
        let mut changed = false;
        for (slot, value) in [(&mut self.high, high), (&mut self.low, low)] {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                if slot.as_str() != v || !slot.is_known() {
                    *slot = Temperature::Known(v.to_owned());
                    changed = true;
                }
            }
        }
        changed
    }

    /// True once either temperature has been received.
    pub fn has_temperature(&self) -> bool {
        self.high.is_known() || self.low.is_known()
    }

    /// `"<high> | <low>"`, or `None` before the first payload.
    pub fn temperature_line(&self) -> Option<String> {
        self.has_temperature()
            .then(|| format!("{} | {}", self.high, self.low))
    }

    /// Back to the initial unknown state (fresh activation).
    pub fn reset(&mut self) {
        self.high = Temperature::Unknown;
        self.low = Temperature::Unknown;
        self.icon.clear();
    }
}
