//! Port traits: the hexagonal boundary between face logic and the platform.
//!
//! ```text
//!   Host runtime ──▶ WatchFaceEngine ──▶ HostPort / Surface / EventSink
//!                          │
//!                          └──▶ IconIngestor ──▶ AssetChannel + IconDecoder
//! ```
//!
//! Driven adapters (host timers, drawing surfaces, the data-sync client,
//! image decoders) implement these traits. The
//! [`WatchFaceEngine`](super::engine::WatchFaceEngine) consumes them via
//! generics, so the face core never touches a platform API directly.

use std::io::Read;
use std::sync::Arc;

use chrono::FixedOffset;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;

use crate::app::commands::FaceStyle;
use crate::error::IngestError;
use crate::payload::AssetRef;
use crate::render::Brush;
use crate::weather::{Icon, IconSlot};

// ───────────────────────────────────────────────────────────────
// Wake timer (driven adapter: scheduler → host timer)
// ───────────────────────────────────────────────────────────────

/// The single host timer the refresh scheduler arms.
///
/// The host calls back into
/// [`WatchFaceEngine::on_timer_fired`](super::engine::WatchFaceEngine::on_timer_fired)
/// when a scheduled wake elapses.
pub trait WakeTimer {
    /// Schedule one wake-up `delay_ms` from now, replacing any pending one.
    fn schedule_wake(&mut self, delay_ms: u64);

    /// Drop the pending wake-up, if any.
    fn cancel_wake(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Host port (driven adapter: engine → host runtime)
// ───────────────────────────────────────────────────────────────

/// Everything the engine asks of the host runtime.
///
/// Passed by reference into every lifecycle call, the way the host hands
/// its callbacks a context.
pub trait HostPort: WakeTimer {
    /// Request a repaint; the host will call `render` soon after.
    fn invalidate(&mut self);

    /// Wall-clock time, Unix epoch milliseconds.
    fn now_millis(&self) -> i64;

    /// The device's current UTC offset.
    fn local_offset(&self) -> FixedOffset;

    /// Subscribe to timezone-change notifications.
    fn register_time_zone_receiver(&mut self);

    /// Unsubscribe from timezone-change notifications.
    fn unregister_time_zone_receiver(&mut self);

    /// Open (or reconnect) the cross-device data channel.
    fn connect_data_channel(&mut self);

    /// Close the cross-device data channel.
    fn disconnect_data_channel(&mut self);

    /// Publish how the system UI should treat the face.
    fn set_style(&mut self, style: &FaceStyle);
}

// ───────────────────────────────────────────────────────────────
// Surface (driven adapter: engine → drawing backend)
// ───────────────────────────────────────────────────────────────

/// Drawing calls issued once per frame.
///
/// Text origins are baseline-left, as with a platform canvas.
pub trait Surface {
    /// Flood the whole surface with one colour.
    fn fill(&mut self, color: Rgb888);

    /// Fill a rectangle with the brush colour.
    fn draw_rect(&mut self, rect: Rectangle, brush: &Brush);

    fn draw_text(&mut self, text: &str, origin: Point, brush: &Brush);

    /// Draw an icon with its top-left corner at `origin`.
    fn draw_icon(&mut self, icon: &Icon, origin: Point, brush: &Brush);
}

// ───────────────────────────────────────────────────────────────
// Event sink (driven adapter: engine → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The engine emits structured [`FaceEvent`](super::events::FaceEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::FaceEvent);
}

// ───────────────────────────────────────────────────────────────
// Icon ingestion ports
// ───────────────────────────────────────────────────────────────

/// Accepts icon resolution requests from the engine.
///
/// Implementations resolve off the render path and report through
/// [`IconSlot::complete`]. A newer request may supersede one that has not
/// started yet; at most one resolution is in flight.
pub trait IconIngestor {
    fn submit(&mut self, asset: AssetRef, slot: Arc<IconSlot>);
}

/// Worker-side view of the cross-device data channel.
#[allow(async_fn_in_trait)]
pub trait AssetChannel {
    type Stream: Read;

    /// Establish the channel. Resolves to `false` if the connection failed;
    /// may stay pending, in which case the caller's timeout applies.
    async fn connect(&mut self) -> bool;

    /// Open a readable stream for `asset`, or `None` if it cannot be opened.
    async fn open(&mut self, asset: &AssetRef) -> Option<Self::Stream>;
}

/// Turns raw asset bytes into an icon.
pub trait IconDecoder {
    /// Fails with [`IngestError::Decode`] on corrupt or unsupported input.
    fn decode(&self, bytes: &[u8]) -> Result<Icon, IngestError>;
}
