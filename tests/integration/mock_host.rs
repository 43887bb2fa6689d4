//! Recording mock adapters for integration tests.
//!
//! Every host, surface and sink call is captured so tests can assert on
//! the full history without a real watch runtime.

use std::sync::Arc;

use chrono::FixedOffset;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;
use weatherface::app::commands::FaceStyle;
use weatherface::app::events::FaceEvent;
use weatherface::app::ports::{EventSink, HostPort, IconIngestor, Surface, WakeTimer};
use weatherface::payload::AssetRef;
use weatherface::render::Brush;
use weatherface::weather::{Icon, IconSlot};

// ── Host call record ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    ScheduleWake(u64),
    CancelWake,
    Invalidate,
    RegisterTimeZone,
    UnregisterTimeZone,
    Connect,
    Disconnect,
    SetStyle(FaceStyle),
}

// ── MockHost ──────────────────────────────────────────────────

pub struct MockHost {
    pub calls: Vec<HostCall>,
    pub now_ms: i64,
    pub offset: FixedOffset,
    pub pending_wake: Option<u64>,
}

#[allow(dead_code)]
impl MockHost {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            now_ms: 0,
            offset: FixedOffset::east_opt(0).unwrap(),
            pending_wake: None,
        }
    }

    pub fn at(now_ms: i64) -> Self {
        Self {
            now_ms,
            ..Self::new()
        }
    }

    pub fn count(&self, call: &HostCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn invalidations(&self) -> usize {
        self.count(&HostCall::Invalidate)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeTimer for MockHost {
    fn schedule_wake(&mut self, delay_ms: u64) {
        self.calls.push(HostCall::ScheduleWake(delay_ms));
        self.pending_wake = Some(delay_ms);
    }

    fn cancel_wake(&mut self) {
        self.calls.push(HostCall::CancelWake);
        self.pending_wake = None;
    }
}

impl HostPort for MockHost {
    fn invalidate(&mut self) {
        self.calls.push(HostCall::Invalidate);
    }

    fn now_millis(&self) -> i64 {
        self.now_ms
    }

    fn local_offset(&self) -> FixedOffset {
        self.offset
    }

    fn register_time_zone_receiver(&mut self) {
        self.calls.push(HostCall::RegisterTimeZone);
    }

    fn unregister_time_zone_receiver(&mut self) {
        self.calls.push(HostCall::UnregisterTimeZone);
    }

    fn connect_data_channel(&mut self) {
        self.calls.push(HostCall::Connect);
    }

    fn disconnect_data_channel(&mut self) {
        self.calls.push(HostCall::Disconnect);
    }

    fn set_style(&mut self, style: &FaceStyle) {
        self.calls.push(HostCall::SetStyle(*style));
    }
}

// ── Surface ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Fill(Rgb888),
    Rect(Rectangle, Brush),
    Text(String, Point, Brush),
    Icon(Point),
}

#[derive(Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

#[allow(dead_code)]
impl RecordingSurface {
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text(t, ..) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn drew_icon(&self) -> bool {
        self.calls.iter().any(|c| matches!(c, DrawCall::Icon(_)))
    }
}

impl Surface for RecordingSurface {
    fn fill(&mut self, color: Rgb888) {
        self.calls.push(DrawCall::Fill(color));
    }

    fn draw_rect(&mut self, rect: Rectangle, brush: &Brush) {
        self.calls.push(DrawCall::Rect(rect, *brush));
    }

    fn draw_text(&mut self, text: &str, origin: Point, brush: &Brush) {
        self.calls.push(DrawCall::Text(text.to_owned(), origin, *brush));
    }

    fn draw_icon(&mut self, _icon: &Icon, origin: Point, _brush: &Brush) {
        self.calls.push(DrawCall::Icon(origin));
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<FaceEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &FaceEvent) {
        self.events.push(event.clone());
    }
}

// ── Ingestor ──────────────────────────────────────────────────

/// Queues requests so the test decides when (and how) each completes.
#[derive(Default)]
pub struct QueueIngestor {
    pub requests: Vec<(AssetRef, Arc<IconSlot>)>,
}

impl IconIngestor for QueueIngestor {
    fn submit(&mut self, asset: AssetRef, slot: Arc<IconSlot>) {
        self.requests.push((asset, slot));
    }
}
