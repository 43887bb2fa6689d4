//! Weather face host simulator.
//!
//! Drives one full engine lifecycle against the in-process adapters on a
//! virtual clock:
//!
//! ```text
//! activate → properties → insets → visible → payload ─┐
//!                                                     ▼
//! destroy ← hidden ← interactive ← ambient ← 3 s of 1 Hz ticks
//! ```
//!
//! Usage: `weatherface-sim [config.json]`. Set `RUST_LOG=debug` for
//! per-frame detail.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::FixedOffset;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use log::info;

use weatherface::adapters::bmp::{BmpDecoder, encode_bmp24};
use weatherface::adapters::canvas::{CanvasSurface, FrameBuffer};
use weatherface::adapters::log_sink::LogEventSink;
use weatherface::adapters::memory_channel::MemoryAssetChannel;
use weatherface::adapters::time::SystemClock;
use weatherface::app::commands::{FaceStyle, HostEvent, HostProperties, WindowInsets};
use weatherface::app::engine::WatchFaceEngine;
use weatherface::app::ports::{EventSink, HostPort, IconIngestor, WakeTimer};
use weatherface::config::FaceConfig;
use weatherface::ingest::IconResolver;
use weatherface::ingest::worker::IconWorker;
use weatherface::payload::{AssetRef, DataEvent, WeatherPayload};
use weatherface::weather::Icon;

const SCREEN: Size = Size::new(320, 320);
const ICON_WAIT: Duration = Duration::from_secs(2);

// ── Simulated host ────────────────────────────────────────────

/// Host runtime on a virtual clock. Timer wake-ups are delivered by
/// [`run_for`], not by real time.
struct SimHost {
    now_ms: i64,
    offset: FixedOffset,
    pending_wake: Option<i64>,
    dirty: bool,
}

impl SimHost {
    fn new(clock: SystemClock) -> Self {
        Self {
            now_ms: clock.now_millis(),
            offset: clock.local_offset(),
            pending_wake: None,
            dirty: false,
        }
    }

    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl WakeTimer for SimHost {
    fn schedule_wake(&mut self, delay_ms: u64) {
        self.pending_wake = Some(self.now_ms + delay_ms as i64);
    }

    fn cancel_wake(&mut self) {
        self.pending_wake = None;
    }
}

impl HostPort for SimHost {
    fn invalidate(&mut self) {
        self.dirty = true;
    }

    fn now_millis(&self) -> i64 {
        self.now_ms
    }

    fn local_offset(&self) -> FixedOffset {
        self.offset
    }

    fn register_time_zone_receiver(&mut self) {
        info!("HOST | time zone receiver registered");
    }

    fn unregister_time_zone_receiver(&mut self) {
        info!("HOST | time zone receiver unregistered");
    }

    fn connect_data_channel(&mut self) {
        info!("HOST | data channel connected");
    }

    fn disconnect_data_channel(&mut self) {
        info!("HOST | data channel disconnected");
    }

    fn set_style(&mut self, style: &FaceStyle) {
        info!("HOST | style {:?}", style);
    }
}

// ── Frame loop ────────────────────────────────────────────────

type Canvas = CanvasSurface<FrameBuffer>;

fn present<I: IconIngestor, S: EventSink>(
    engine: &WatchFaceEngine<I, S>,
    host: &mut SimHost,
    canvas: &mut Canvas,
) {
    if !host.take_dirty() {
        return;
    }
    let bounds = canvas.target().bounds();
    engine.render(canvas, bounds, host.now_ms);

    let snapshot = engine.clock().snapshot(host.now_ms);
    info!(
        "FRAME | {} | {} | {} | icon={} | {:?}",
        snapshot.time_label,
        snapshot.date_label,
        engine.weather().temperature_line().unwrap_or_default(),
        engine.weather().icon().is_some(),
        engine.mode(),
    );
}

/// Advance virtual time by `duration_ms`, delivering every wake-up that
/// falls inside the window.
fn run_for<I: IconIngestor, S: EventSink>(
    engine: &mut WatchFaceEngine<I, S>,
    host: &mut SimHost,
    canvas: &mut Canvas,
    duration_ms: i64,
) {
    let end = host.now_ms + duration_ms;
    while let Some(wake) = host.pending_wake.filter(|&w| w <= end) {
        host.now_ms = wake;
        host.pending_wake = None;
        engine.on_timer_fired(host);
        engine.poll_icon(host);
        present(engine, host, canvas);
    }
    host.now_ms = end;
}

/// Block (in real time) until the worker delivers an icon.
fn wait_for_icon<I: IconIngestor, S: EventSink>(
    engine: &mut WatchFaceEngine<I, S>,
    host: &mut SimHost,
) -> bool {
    let step = Duration::from_millis(20);
    let mut waited = Duration::ZERO;
    while waited < ICON_WAIT {
        if engine.poll_icon(host) {
            return true;
        }
        std::thread::sleep(step);
        waited += step;
    }
    false
}

fn sun_icon() -> Option<Icon> {
    const SIDE: i32 = 24;
    let centre = Point::new(SIDE / 2, SIDE / 2);
    let pixels = (0..SIDE * SIDE)
        .map(|i| {
            let d = Point::new(i % SIDE, i / SIDE) - centre;
            if d.x * d.x + d.y * d.y <= 64 {
                Rgb888::new(0xFF, 0xC1, 0x07)
            } else {
                Rgb888::new(0x03, 0xA9, 0xF4)
            }
        })
        .collect();
    Icon::new(Size::new(SIDE as u32, SIDE as u32), pixels)
}

fn load_config() -> Result<FaceConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            let config = FaceConfig::from_json(&json).with_context(|| format!("config {}", path))?;
            info!("Loaded config from {}", path);
            Ok(config)
        }
        None => Ok(FaceConfig::default()),
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("weatherface simulator v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    let channel = MemoryAssetChannel::new().with_latency(Duration::from_millis(150));
    let icon_ref = AssetRef::new("sha1:sun-24");
    let icon = sun_icon().context("building demo icon")?;
    channel.publish(icon_ref.clone(), encode_bmp24(&icon));

    let resolver =
        IconResolver::new(channel, BmpDecoder).with_connect_timeout(config.connect_timeout());
    let worker = IconWorker::spawn(resolver).context("spawning icon worker")?;

    let sync = config.sync.clone();
    let mut engine = WatchFaceEngine::new(config, worker, LogEventSink::new());
    let mut host = SimHost::new(SystemClock::new());
    let mut canvas = CanvasSurface::new(FrameBuffer::new(SCREEN));

    for event in [
        HostEvent::Activate,
        HostEvent::PropertiesChanged(HostProperties {
            low_bit_ambient: true,
        }),
        HostEvent::ApplyWindowInsets(WindowInsets { is_round: true }),
        HostEvent::VisibilityChanged(true),
    ] {
        engine.handle(event, &mut host);
    }
    present(&engine, &mut host, &mut canvas);

    // Phone pushes the forecast.
    let payload = WeatherPayload {
        high: Some("75°".into()),
        low: Some("58°".into()),
        icon: Some(icon_ref),
    };
    let item = DataEvent::changed(sync.path.clone(), payload.to_map(&sync)).encode()?;
    engine.on_data_item_bytes(&item, &mut host)?;
    present(&engine, &mut host, &mut canvas);

    if !wait_for_icon(&mut engine, &mut host) {
        log::warn!("Icon did not arrive within {:?}", ICON_WAIT);
    }
    run_for(&mut engine, &mut host, &mut canvas, 3_000);

    // A later update carries only the high.
    let update = WeatherPayload {
        high: Some("70°".into()),
        ..WeatherPayload::default()
    };
    engine.handle(HostEvent::Payload(update), &mut host);
    present(&engine, &mut host, &mut canvas);

    engine.handle(HostEvent::AmbientModeChanged(true), &mut host);
    present(&engine, &mut host, &mut canvas);
    run_for(&mut engine, &mut host, &mut canvas, 60_000);
    engine.handle(HostEvent::TimeTick, &mut host);
    present(&engine, &mut host, &mut canvas);

    engine.handle(HostEvent::AmbientModeChanged(false), &mut host);
    present(&engine, &mut host, &mut canvas);
    run_for(&mut engine, &mut host, &mut canvas, 1_000);

    engine.handle(HostEvent::VisibilityChanged(false), &mut host);
    engine.handle(HostEvent::Destroy, &mut host);

    let (worker, sink) = engine.into_parts();
    worker.shutdown();
    info!("Simulation finished ({} face events)", sink.emitted());
    Ok(())
}
