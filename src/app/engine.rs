//! Watch face engine: the hexagonal core.
//!
//! [`WatchFaceEngine`] owns the weather state, display clock, refresh
//! scheduler, layout and brushes for one activation. It reacts to host
//! lifecycle callbacks and inbound weather payloads. All platform I/O flows
//! through port traits passed in at call sites, so the whole engine is
//! testable with mock adapters.
//!
//! ```text
//!  HostEvent ──▶ ┌──────────────────────────────┐ ──▶ HostPort (invalidate, timer, …)
//!                │        WatchFaceEngine        │
//!  DataEvent ──▶ │ Weather · Clock · Scheduler   │ ──▶ EventSink
//!                └──────────────────────────────┘
//!                        │            ▲
//!                 submit │            │ IconSlot (poll_icon)
//!                        ▼            │
//!                      IconIngestor ──┘
//! ```

use std::sync::Arc;

use embedded_graphics::primitives::Rectangle;
use log::{debug, info, warn};

use crate::clock::DisplayClock;
use crate::config::FaceConfig;
use crate::mode::{DisplayMode, FaceShape, Visibility};
use crate::payload::{DataEvent, WeatherPayload, extract_weather};
use crate::render::{Brushes, Frame, Layout, paint};
use crate::scheduler::RefreshScheduler;
use crate::weather::WeatherState;

use super::commands::{FaceStyle, HostEvent, HostProperties, TapCommand, WindowInsets};
use super::events::FaceEvent;
use super::ports::{EventSink, HostPort, IconIngestor, Surface};

/// Where the engine is in its one-shot lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Active,
    /// Torn down; every further callback is ignored.
    Destroyed,
}

pub struct WatchFaceEngine<I: IconIngestor, S: EventSink> {
    config: FaceConfig,
    weather: WeatherState,
    clock: DisplayClock,
    scheduler: RefreshScheduler,
    mode: DisplayMode,
    visibility: Visibility,
    low_bit_ambient: bool,
    /// Fixed by the first window insets; square layout until then.
    shape: Option<FaceShape>,
    layout: Layout,
    brushes: Brushes,
    time_zone_registered: bool,
    channel_connected: bool,
    lifecycle: Lifecycle,
    ingestor: I,
    sink: S,
}

impl<I: IconIngestor, S: EventSink> WatchFaceEngine<I, S> {
    pub fn new(config: FaceConfig, ingestor: I, sink: S) -> Self {
        let shape = FaceShape::default();
        let table = *config.layout_for(shape);
        Self {
            scheduler: RefreshScheduler::new(u64::from(config.update_interval_ms)),
            brushes: Brushes::new(&config.colors, &table),
            layout: Layout::new(shape, &table),
            weather: WeatherState::new(),
            clock: DisplayClock::utc(),
            mode: DisplayMode::Interactive,
            visibility: Visibility::Hidden,
            low_bit_ambient: false,
            shape: None,
            time_zone_registered: false,
            channel_connected: false,
            lifecycle: Lifecycle::Created,
            config,
            ingestor,
            sink,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Begin an activation: publish the face style, forget any previous
    /// weather, open the data channel and lay out for the current shape.
    pub fn on_activate(&mut self, host: &mut impl HostPort) {
        if !self.accepting("activate") {
            return;
        }
        host.set_style(&FaceStyle::default());
        self.weather.reset();
        self.clock.set_offset(host.local_offset());
        self.connect_channel(host);
        self.apply_shape(self.shape.unwrap_or_default());
        self.lifecycle = Lifecycle::Active;
        self.sink.emit(&FaceEvent::Activated);
        info!("Engine activated ({:?})", self.layout.shape);
    }

    pub fn on_visibility_changed(&mut self, visible: bool, host: &mut impl HostPort) {
        if !self.accepting("visibility") {
            return;
        }
        self.visibility = Visibility::from_visible(visible);
        if visible {
            self.connect_channel(host);
            self.register_time_zone(host);
            // The zone may have changed while we were hidden.
            self.clock.set_offset(host.local_offset());
            host.invalidate();
        } else {
            self.disconnect_channel(host);
            self.unregister_time_zone(host);
        }
        self.sink.emit(&FaceEvent::VisibilityChanged(self.visibility));
        self.rearm(host);
    }

    pub fn on_ambient_mode_changed(&mut self, ambient: bool, host: &mut impl HostPort) {
        if !self.accepting("ambient") {
            return;
        }
        let mode = DisplayMode::from_ambient(ambient);
        if mode != self.mode {
            let from = self.mode;
            self.mode = mode;
            if self.low_bit_ambient {
                self.brushes.set_anti_alias(!ambient);
            }
            host.invalidate();
            self.sink.emit(&FaceEvent::ModeChanged { from, to: mode });
            info!("Mode {:?} -> {:?}", from, mode);
        }
        self.rearm(host);
    }

    pub fn on_properties_changed(&mut self, props: HostProperties) {
        if !self.accepting("properties") {
            return;
        }
        self.low_bit_ambient = props.low_bit_ambient;
        debug!("Properties: low_bit_ambient={}", props.low_bit_ambient);
    }

    /// The first insets fix the face shape for the rest of the activation.
    pub fn on_apply_window_insets(&mut self, insets: WindowInsets) {
        if !self.accepting("insets") {
            return;
        }
        let shape = FaceShape::from_round(insets.is_round);
        match self.shape {
            None => {
                self.shape = Some(shape);
                self.apply_shape(shape);
                self.sink.emit(&FaceEvent::ShapeApplied(shape));
                info!("Shape fixed: {:?}", shape);
            }
            Some(current) if current == shape => debug!("Insets repeated ({:?})", shape),
            Some(current) => warn!("Ignoring shape change {:?} -> {:?}", current, shape),
        }
    }

    /// Minute tick. Also picks up a delivered icon.
    pub fn on_time_tick(&mut self, host: &mut impl HostPort) {
        if self.accepting("time tick") {
            self.take_icon();
            host.invalidate();
        }
    }

    /// The scheduler's wake-up elapsed. Repaints on a live tick or a
    /// freshly delivered icon, once either way.
    pub fn on_timer_fired(&mut self, host: &mut impl HostPort) {
        if !self.accepting("timer") {
            return;
        }
        let now = host.now_millis();
        let ticked = self.scheduler.on_tick(self.mode, self.visibility, now, host);
        let icon = self.take_icon();
        if ticked || icon {
            host.invalidate();
        }
    }

    pub fn on_tap_command(&mut self, tap: TapCommand, host: &mut impl HostPort) {
        if !self.accepting("tap") {
            return;
        }
        debug!("Tap {:?} at ({}, {})", tap.kind, tap.x, tap.y);
        host.invalidate();
    }

    pub fn on_time_zone_changed(&mut self, host: &mut impl HostPort) {
        if !self.accepting("time zone") {
            return;
        }
        self.clock.set_offset(host.local_offset());
        host.invalidate();
    }

    /// Tear down: cancel the timer, drop subscriptions and stop accepting
    /// icon completions.
    pub fn on_destroy(&mut self, host: &mut impl HostPort) {
        if !self.accepting("destroy") {
            return;
        }
        self.scheduler.cancel(host);
        self.disconnect_channel(host);
        self.unregister_time_zone(host);
        self.weather.icon_slot().retire();
        self.lifecycle = Lifecycle::Destroyed;
        self.sink.emit(&FaceEvent::Destroyed);
        info!("Engine destroyed");
    }

    // ── Weather ingestion ─────────────────────────────────────

    /// Merge a payload and repaint.
    pub fn on_payload_received(&mut self, payload: WeatherPayload, host: &mut impl HostPort) {
        if !self.accepting("payload") {
            return;
        }
        self.apply_payload(payload);
        host.invalidate();
    }

    /// Apply every weather item in a data-sync batch, repainting once.
    pub fn on_data_changed(&mut self, events: &[DataEvent], host: &mut impl HostPort) {
        if !self.accepting("data") {
            return;
        }
        for event in events {
            if let Some(payload) = extract_weather(event, &self.config.sync) {
                self.apply_payload(payload);
            }
        }
        host.invalidate();
    }

    /// Decode one wire-encoded data item and apply it.
    pub fn on_data_item_bytes(
        &mut self,
        bytes: &[u8],
        host: &mut impl HostPort,
    ) -> crate::Result<()> {
        let event = DataEvent::decode(bytes)?;
        self.on_data_changed(core::slice::from_ref(&event), host);
        Ok(())
    }

    /// Pick up an icon delivered by the worker. Returns `true` (and
    /// invalidates) if a new icon arrived since the last poll.
    pub fn poll_icon(&mut self, host: &mut impl HostPort) -> bool {
        if self.lifecycle == Lifecycle::Destroyed || !self.take_icon() {
            return false;
        }
        host.invalidate();
        true
    }

    // ── Rendering ─────────────────────────────────────────────

    /// Paint one frame for `now_ms`. Reads state only.
    pub fn render(&self, surface: &mut impl Surface, bounds: Rectangle, now_ms: i64) {
        if self.lifecycle == Lifecycle::Destroyed {
            debug!("Render after destroy skipped");
            return;
        }
        let snapshot = self.clock.snapshot(now_ms);
        paint(
            surface,
            &Frame {
                bounds,
                mode: self.mode,
                brushes: &self.brushes,
                layout: &self.layout,
                clock: &snapshot,
                weather: &self.weather,
            },
        );
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Route a host event to its handler. Wire-level errors are logged.
    pub fn handle(&mut self, event: HostEvent, host: &mut impl HostPort) {
        match event {
            HostEvent::Activate => self.on_activate(host),
            HostEvent::VisibilityChanged(v) => self.on_visibility_changed(v, host),
            HostEvent::AmbientModeChanged(a) => self.on_ambient_mode_changed(a, host),
            HostEvent::PropertiesChanged(p) => self.on_properties_changed(p),
            HostEvent::ApplyWindowInsets(i) => self.on_apply_window_insets(i),
            HostEvent::TimeTick => self.on_time_tick(host),
            HostEvent::TimerFired => self.on_timer_fired(host),
            HostEvent::TapCommand(t) => self.on_tap_command(t, host),
            HostEvent::TimeZoneChanged => self.on_time_zone_changed(host),
            HostEvent::DataChanged(events) => self.on_data_changed(&events, host),
            HostEvent::Payload(p) => self.on_payload_received(p, host),
            HostEvent::Destroy => self.on_destroy(host),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn weather(&self) -> &WeatherState {
        &self.weather
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// `None` until window insets arrive.
    pub fn shape(&self) -> Option<FaceShape> {
        self.shape
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn brushes(&self) -> &Brushes {
        &self.brushes
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn clock(&self) -> &DisplayClock {
        &self.clock
    }

    pub fn config(&self) -> &FaceConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_alive(&self) -> bool {
        self.lifecycle != Lifecycle::Destroyed
    }

    pub fn is_time_zone_registered(&self) -> bool {
        self.time_zone_registered
    }

    pub fn is_channel_connected(&self) -> bool {
        self.channel_connected
    }

    pub fn ingestor(&self) -> &I {
        &self.ingestor
    }

    pub fn ingestor_mut(&mut self) -> &mut I {
        &mut self.ingestor
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give back the adapters, e.g. to join the icon worker.
    pub fn into_parts(self) -> (I, S) {
        (self.ingestor, self.sink)
    }

    // ── Internals ─────────────────────────────────────────────

    fn accepting(&self, what: &str) -> bool {
        if self.lifecycle == Lifecycle::Destroyed {
            debug!("Ignoring {} after destroy", what);
            return false;
        }
        true
    }

    /// Consume the slot's repaint request, reporting the new icon.
    fn take_icon(&mut self) -> bool {
        if !self.weather.icon_slot().take_repaint() {
            return false;
        }
        self.sink.emit(&FaceEvent::IconUpdated);
        true
    }

    fn rearm(&mut self, host: &mut impl HostPort) {
        let now = host.now_millis();
        self.scheduler.arm(self.mode, self.visibility, now, host);
    }

    fn apply_shape(&mut self, shape: FaceShape) {
        let table = *self.config.layout_for(shape);
        self.layout = Layout::new(shape, &table);
        self.brushes.apply_layout(&table);
    }

    fn apply_payload(&mut self, payload: WeatherPayload) {
        let changed = self
            .weather
            .merge(payload.high.as_deref(), payload.low.as_deref());
        let icon_requested = match payload.icon {
            Some(asset) => {
                self.ingestor
                    .submit(asset, Arc::clone(self.weather.icon_slot()));
                true
            }
            None => false,
        };
        if changed || icon_requested {
            self.sink.emit(&FaceEvent::WeatherUpdated {
                high: self.weather.high().to_string(),
                low: self.weather.low().to_string(),
                icon_requested,
            });
        }
    }

    fn connect_channel(&mut self, host: &mut impl HostPort) {
        if !self.channel_connected {
            host.connect_data_channel();
            self.channel_connected = true;
        }
    }

    fn disconnect_channel(&mut self, host: &mut impl HostPort) {
        if self.channel_connected {
            host.disconnect_data_channel();
            self.channel_connected = false;
        }
    }

    fn register_time_zone(&mut self, host: &mut impl HostPort) {
        if !self.time_zone_registered {
            host.register_time_zone_receiver();
            self.time_zone_registered = true;
        }
    }

    fn unregister_time_zone(&mut self, host: &mut impl HostPort) {
        if self.time_zone_registered {
            host.unregister_time_zone_receiver();
            self.time_zone_registered = false;
        }
    }
}
