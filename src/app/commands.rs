//! Inbound host events.
//!
//! The host runtime translates its lifecycle callbacks into [`HostEvent`]s
//! and hands them to [`WatchFaceEngine::handle`](super::engine::WatchFaceEngine::handle).
//! Each variant also has a dedicated engine method for hosts that prefer
//! direct calls.

use crate::payload::{DataEvent, WeatherPayload};

/// Lifecycle callbacks the host delivers to the face.
#[derive(Debug, Clone)]
pub enum HostEvent {
    Activate,
    VisibilityChanged(bool),
    AmbientModeChanged(bool),
    PropertiesChanged(HostProperties),
    ApplyWindowInsets(WindowInsets),
    /// Once-a-minute system tick (delivered in ambient mode too).
    TimeTick,
    /// The scheduler's wake-up elapsed.
    TimerFired,
    TapCommand(TapCommand),
    TimeZoneChanged,
    /// A batch of data-sync changes.
    DataChanged(Vec<DataEvent>),
    /// Weather fields already extracted by the host.
    Payload(WeatherPayload),
    Destroy,
}

/// Display capabilities reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostProperties {
    /// Ambient mode can only show a few colours and no anti-aliasing.
    pub low_bit_ambient: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowInsets {
    pub is_round: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapKind {
    Touch,
    TouchCancel,
    Tap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapCommand {
    pub kind: TapKind,
    pub x: i32,
    pub y: i32,
    pub event_time_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeekMode {
    #[default]
    Variable,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundVisibility {
    #[default]
    Interruptive,
    Persistent,
}

/// How the system UI should treat the face; published once on activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceStyle {
    pub peek_mode: PeekMode,
    pub background_visibility: BackgroundVisibility,
    pub show_system_ui_time: bool,
}

impl Default for FaceStyle {
    fn default() -> Self {
        Self {
            peek_mode: PeekMode::Variable,
            background_visibility: BackgroundVisibility::Interruptive,
            show_system_ui_time: false,
        }
    }
}
