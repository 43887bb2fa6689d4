//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured face events to the `log`
//! facade. A telemetry adapter would implement the same trait.

use log::info;

use crate::app::events::FaceEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`FaceEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: usize,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events written so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &FaceEvent) {
        self.emitted += 1;
        match event {
            FaceEvent::Activated => info!("FACE | activated"),
            FaceEvent::VisibilityChanged(v) => info!("FACE | visibility={:?}", v),
            FaceEvent::ModeChanged { from, to } => info!("MODE | {:?} -> {:?}", from, to),
            FaceEvent::ShapeApplied(shape) => info!("FACE | shape={:?}", shape),
            FaceEvent::WeatherUpdated {
                high,
                low,
                icon_requested,
            } => {
                info!(
                    "WEATHER | high={} low={} | icon={}",
                    high,
                    low,
                    if *icon_requested { "requested" } else { "kept" },
                );
            }
            FaceEvent::IconUpdated => info!("WEATHER | icon updated"),
            FaceEvent::Destroyed => info!("FACE | destroyed"),
        }
    }
}
