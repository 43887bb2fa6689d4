//! Outbound face events.
//!
//! The [`WatchFaceEngine`](super::engine::WatchFaceEngine) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters decide
//! what to do with them; the stock one logs them.

use crate::mode::{DisplayMode, FaceShape, Visibility};

/// Structured events emitted by the face core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaceEvent {
    /// A fresh activation began; weather is back to unknown.
    Activated,

    VisibilityChanged(Visibility),

    ModeChanged { from: DisplayMode, to: DisplayMode },

    /// Window insets fixed the face shape.
    ShapeApplied(FaceShape),

    /// Temperatures were merged from a payload.
    WeatherUpdated {
        high: String,
        low: String,
        icon_requested: bool,
    },

    /// The icon worker delivered a new icon.
    IconUpdated,

    Destroyed,
}
