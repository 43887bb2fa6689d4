//! Engine lifecycle, scheduling and rendering against mock adapters.

use chrono::FixedOffset;
use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;
use weatherface::app::commands::{
    FaceStyle, HostEvent, HostProperties, TapCommand, TapKind, WindowInsets,
};
use weatherface::app::engine::{Lifecycle, WatchFaceEngine};
use weatherface::app::events::FaceEvent;
use weatherface::config::FaceConfig;
use weatherface::error::{Error, PayloadError};
use weatherface::mode::{DisplayMode, FaceShape};
use weatherface::payload::{AssetRef, DataEvent, DataEventKind, DataMap, DataValue, WeatherPayload};
use weatherface::weather::{Icon, Temperature};

use crate::mock_host::{
    DrawCall, HostCall, MockHost, QueueIngestor, RecordingSink, RecordingSurface,
};

type Engine = WatchFaceEngine<QueueIngestor, RecordingSink>;

fn engine() -> Engine {
    WatchFaceEngine::new(
        FaceConfig::default(),
        QueueIngestor::default(),
        RecordingSink::default(),
    )
}

fn bounds() -> Rectangle {
    Rectangle::new(Point::zero(), Size::new(320, 320))
}

fn icon() -> Icon {
    Icon::new(Size::new(4, 4), vec![Rgb888::YELLOW; 16]).unwrap()
}

fn payload(high: Option<&str>, low: Option<&str>, icon: Option<&str>) -> WeatherPayload {
    WeatherPayload {
        high: high.map(Into::into),
        low: low.map(Into::into),
        icon: icon.map(AssetRef::from),
    }
}

fn render(engine: &Engine, now_ms: i64) -> RecordingSurface {
    let mut surface = RecordingSurface::default();
    engine.render(&mut surface, bounds(), now_ms);
    surface
}

/// Activated, visible, interactive engine.
fn running(host: &mut MockHost) -> Engine {
    let mut e = engine();
    e.on_activate(host);
    e.on_visibility_changed(true, host);
    e
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn activate_publishes_style_and_opens_channel() {
    let mut host = MockHost::new();
    let mut e = engine();
    e.on_activate(&mut host);

    assert_eq!(host.count(&HostCall::SetStyle(FaceStyle::default())), 1);
    assert_eq!(host.count(&HostCall::Connect), 1);
    assert_eq!(e.lifecycle(), Lifecycle::Active);
    assert!(!e.weather().has_temperature());
    assert_eq!(e.layout().shape, FaceShape::Square);
    assert_eq!(e.sink().events, vec![FaceEvent::Activated]);
}

#[test]
fn reactivation_forgets_previous_weather() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    e.on_payload_received(payload(Some("75°"), Some("58°"), None), &mut host);
    e.on_activate(&mut host);
    assert_eq!(e.weather().high(), &Temperature::Unknown);
    assert!(e.weather().temperature_line().is_none());
}

#[test]
fn visibility_toggles_subscriptions_once() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    e.on_visibility_changed(true, &mut host);
    assert_eq!(host.count(&HostCall::Connect), 1);
    assert_eq!(host.count(&HostCall::RegisterTimeZone), 1);
    assert!(e.is_time_zone_registered());

    e.on_visibility_changed(false, &mut host);
    e.on_visibility_changed(false, &mut host);
    assert_eq!(host.count(&HostCall::Disconnect), 1);
    assert_eq!(host.count(&HostCall::UnregisterTimeZone), 1);
    assert!(!e.is_channel_connected());

    e.on_visibility_changed(true, &mut host);
    assert_eq!(host.count(&HostCall::Connect), 2);
}

#[test]
fn becoming_visible_picks_up_timezone_and_repaints() {
    let mut host = MockHost::new();
    let mut e = engine();
    e.on_activate(&mut host);
    host.offset = FixedOffset::east_opt(3 * 3600).unwrap();
    host.clear();

    e.on_visibility_changed(true, &mut host);
    assert_eq!(e.clock().offset(), host.offset);
    assert_eq!(host.invalidations(), 1);
}

// ── Scheduling ────────────────────────────────────────────────

#[test]
fn timer_armed_only_while_visible_and_interactive() {
    let mut host = MockHost::at(12_345);
    let mut e = running(&mut host);
    assert!(e.scheduler().is_armed());
    assert_eq!(host.pending_wake, Some(655));

    e.on_ambient_mode_changed(true, &mut host);
    assert!(!e.scheduler().is_armed());
    assert_eq!(host.pending_wake, None, "going ambient cancels at once");

    e.on_ambient_mode_changed(false, &mut host);
    assert!(e.scheduler().is_armed());

    e.on_visibility_changed(false, &mut host);
    assert!(!e.scheduler().is_armed());
    assert_eq!(host.pending_wake, None, "hiding cancels at once");
}

#[test]
fn timer_fire_repaints_and_reschedules() {
    let mut host = MockHost::at(900);
    let mut e = running(&mut host);
    assert_eq!(host.pending_wake, Some(100));

    host.now_ms = 1_000;
    host.clear();
    e.on_timer_fired(&mut host);
    assert_eq!(host.calls, vec![HostCall::ScheduleWake(1_000), HostCall::Invalidate]);
}

#[test]
fn stale_timer_fire_is_ignored() {
    let mut host = MockHost::new();
    let mut e = engine();
    e.on_activate(&mut host);
    host.clear();
    e.on_timer_fired(&mut host);
    assert!(host.calls.is_empty());
}

#[test]
fn unchanged_ambient_flag_only_rearms() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    host.clear();
    let events_before = e.sink().events.len();

    e.on_ambient_mode_changed(false, &mut host);
    assert_eq!(host.invalidations(), 0);
    assert_eq!(e.sink().events.len(), events_before);
    assert_eq!(host.count(&HostCall::CancelWake), 1);
    assert!(e.scheduler().is_armed());
}

#[test]
fn ticks_taps_and_zone_changes_repaint() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    host.clear();

    e.on_time_tick(&mut host);
    e.handle(
        HostEvent::TapCommand(TapCommand {
            kind: TapKind::Tap,
            x: 10,
            y: 20,
            event_time_ms: 5,
        }),
        &mut host,
    );
    host.offset = FixedOffset::west_opt(10 * 3600).unwrap();
    e.handle(HostEvent::TimeZoneChanged, &mut host);

    assert_eq!(host.invalidations(), 3);
    assert_eq!(e.clock().offset(), host.offset);
}

// ── Shape and ambient styling ─────────────────────────────────

#[test]
fn first_insets_fix_the_shape() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    e.on_apply_window_insets(WindowInsets { is_round: true });
    e.on_apply_window_insets(WindowInsets { is_round: false });

    assert_eq!(e.shape(), Some(FaceShape::Round));
    assert_eq!(e.layout().time_origin(), Point::new(25, 110));
    assert_eq!(e.brushes().time.text_size, 45);
    let applied = e
        .sink()
        .events
        .iter()
        .filter(|ev| matches!(ev, FaceEvent::ShapeApplied(_)))
        .count();
    assert_eq!(applied, 1);
}

#[test]
fn low_bit_ambient_disables_anti_aliasing() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    e.on_properties_changed(HostProperties {
        low_bit_ambient: true,
    });

    e.on_ambient_mode_changed(true, &mut host);
    assert!(e.brushes().text_brushes().iter().all(|b| !b.anti_alias));
    assert_eq!(e.mode(), DisplayMode::Ambient);

    e.on_ambient_mode_changed(false, &mut host);
    assert!(e.brushes().text_brushes().iter().all(|b| b.anti_alias));
}

#[test]
fn full_colour_ambient_keeps_anti_aliasing() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    e.on_ambient_mode_changed(true, &mut host);
    assert!(e.brushes().text_brushes().iter().all(|b| b.anti_alias));
}

// ── Rendering ─────────────────────────────────────────────────

#[test]
fn first_frame_shows_clock_without_weather() {
    let mut host = MockHost::new();
    let e = running(&mut host);
    let surface = render(&e, 0);

    assert!(matches!(surface.calls[0], DrawCall::Rect(r, _) if r == bounds()));
    assert_eq!(surface.texts(), vec!["00:00", "Thu, Jan 01 1970"]);
    assert!(!surface.drew_icon());
}

#[test]
fn ambient_frame_has_black_background() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    e.on_ambient_mode_changed(true, &mut host);
    let surface = render(&e, 0);
    assert_eq!(surface.calls[0], DrawCall::Fill(Rgb888::BLACK));
}

#[test]
fn clock_labels_follow_host_timezone() {
    let mut host = MockHost::new();
    host.offset = FixedOffset::west_opt(10 * 3600).unwrap();
    let e = running(&mut host);
    // 2024-03-03T09:05Z
    let surface = render(&e, 1_709_456_700_000);
    assert_eq!(surface.texts(), vec!["23:05", "Sat, Mar 02 2024"]);
}

// ── Weather payloads ──────────────────────────────────────────

#[test]
fn partial_payload_keeps_icon_and_missing_temperature() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);

    e.on_payload_received(payload(Some("75°"), Some("58°"), Some("i1")), &mut host);
    let (asset, slot) = &e.ingestor().requests[0];
    assert_eq!(asset.as_str(), "i1");
    assert!(slot.complete(Some(icon())));
    assert!(e.poll_icon(&mut host));

    let first = render(&e, 0);
    assert_eq!(first.texts()[2], "75° | 58°");
    assert!(first.drew_icon());

    e.on_payload_received(payload(Some("70°"), None, None), &mut host);
    let second = render(&e, 0);
    assert_eq!(second.texts()[2], "70° | 58°");
    assert!(second.drew_icon(), "icon kept when the payload has none");
    assert_eq!(e.ingestor().requests.len(), 1);
}

#[test]
fn icon_is_drawn_at_top_right() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    e.on_payload_received(payload(None, None, Some("i1")), &mut host);
    e.ingestor().requests[0].1.complete(Some(icon()));

    let surface = render(&e, 0);
    assert!(surface.calls.contains(&DrawCall::Icon(Point::new(275, 0))));
}

#[test]
fn every_payload_repaints() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    host.clear();
    e.on_payload_received(WeatherPayload::default(), &mut host);
    assert_eq!(host.invalidations(), 1);
    assert!(
        !e.sink()
            .events
            .iter()
            .any(|ev| matches!(ev, FaceEvent::WeatherUpdated { .. }))
    );
}

#[test]
fn poll_icon_reports_each_delivery_once() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    e.on_payload_received(payload(None, None, Some("i1")), &mut host);
    e.ingestor().requests[0].1.complete(Some(icon()));
    host.clear();

    assert!(e.poll_icon(&mut host));
    assert!(!e.poll_icon(&mut host));
    assert_eq!(host.invalidations(), 1);
    assert_eq!(e.sink().events.last(), Some(&FaceEvent::IconUpdated));
}

#[test]
fn minute_tick_picks_up_a_delivered_icon() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    e.on_ambient_mode_changed(true, &mut host);
    e.on_payload_received(payload(None, None, Some("i1")), &mut host);
    e.ingestor().requests[0].1.complete(Some(icon()));
    host.clear();

    e.on_time_tick(&mut host);
    assert_eq!(host.invalidations(), 1);
    assert_eq!(e.sink().events.last(), Some(&FaceEvent::IconUpdated));
    assert!(!e.poll_icon(&mut host), "already picked up");
}

#[test]
fn timer_fire_picks_up_icon_with_a_single_repaint() {
    let mut host = MockHost::at(900);
    let mut e = running(&mut host);
    e.on_payload_received(payload(None, None, Some("i1")), &mut host);
    e.ingestor().requests[0].1.complete(Some(icon()));

    host.now_ms = 1_000;
    host.clear();
    e.on_timer_fired(&mut host);
    assert_eq!(host.calls, vec![HostCall::ScheduleWake(1_000), HostCall::Invalidate]);
    assert_eq!(e.sink().events.last(), Some(&FaceEvent::IconUpdated));
}

#[test]
fn stale_timer_fire_still_repaints_for_a_new_icon() {
    let mut host = MockHost::new();
    let mut e = engine();
    e.on_activate(&mut host);
    e.on_payload_received(payload(None, None, Some("i1")), &mut host);
    e.ingestor().requests[0].1.complete(Some(icon()));
    host.clear();

    e.on_timer_fired(&mut host);
    assert_eq!(host.calls, vec![HostCall::Invalidate]);
    assert!(!e.scheduler().is_armed());
}

#[test]
fn data_batch_applies_weather_items_and_repaints_once() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    let sync = e.config().sync.clone();

    let mut high_only = DataMap::new();
    high_only.insert("high".into(), DataValue::String("80°".into()));
    let mut deleted = DataEvent::changed("/weather", payload(None, Some("1°"), None).to_map(&sync));
    deleted.kind = DataEventKind::Deleted;
    let batch = vec![
        DataEvent::changed("/steps", high_only.clone()),
        deleted,
        DataEvent::changed("/weather", high_only),
    ];

    host.clear();
    e.handle(HostEvent::DataChanged(batch), &mut host);
    assert_eq!(host.invalidations(), 1);
    assert_eq!(e.weather().temperature_line().as_deref(), Some("80° | unknown"));
}

#[test]
fn wire_items_are_decoded_and_rejected_when_malformed() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    let sync = e.config().sync.clone();
    let bytes = DataEvent::changed("/weather", payload(Some("75°"), Some("58°"), None).to_map(&sync))
        .encode()
        .unwrap();

    e.on_data_item_bytes(&bytes, &mut host).unwrap();
    assert_eq!(e.weather().temperature_line().as_deref(), Some("75° | 58°"));

    assert_eq!(
        e.on_data_item_bytes(&[0xFF, 0xFF, 0xFF], &mut host),
        Err(Error::Payload(PayloadError::Malformed))
    );
}

// ── Teardown ──────────────────────────────────────────────────

#[test]
fn destroy_cancels_timer_and_subscriptions() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    e.on_destroy(&mut host);

    assert_eq!(host.pending_wake, None);
    assert_eq!(host.count(&HostCall::Disconnect), 1);
    assert_eq!(host.count(&HostCall::UnregisterTimeZone), 1);
    assert!(!e.is_alive());
    assert_eq!(e.sink().events.last(), Some(&FaceEvent::Destroyed));
}

#[test]
fn completion_after_destroy_is_discarded() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    e.on_payload_received(payload(None, None, Some("late")), &mut host);
    e.on_destroy(&mut host);

    let slot = &e.ingestor().requests[0].1;
    assert!(!slot.complete(Some(icon())));
    assert!(e.weather().icon().is_none());
    assert!(!e.poll_icon(&mut host));
}

#[test]
fn events_after_destroy_are_ignored() {
    let mut host = MockHost::new();
    let mut e = running(&mut host);
    e.on_destroy(&mut host);
    host.clear();

    e.handle(HostEvent::VisibilityChanged(true), &mut host);
    e.handle(HostEvent::Payload(payload(Some("1"), None, Some("x"))), &mut host);
    e.handle(HostEvent::TimeTick, &mut host);

    assert!(host.calls.is_empty());
    assert!(e.ingestor().requests.is_empty());
    assert!(render(&e, 0).calls.is_empty());
}
