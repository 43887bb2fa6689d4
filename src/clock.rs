//! Wall-clock formatting for the face.
//!
//! [`DisplayClock`] is a pure function of (instant, timezone): it keeps no
//! state besides the active UTC offset, which the engine refreshes when the
//! face becomes visible or the host reports a timezone change.

use core::fmt::Write;

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use heapless::String;

/// `HH:MM`
pub const TIME_LABEL_CAP: usize = 5;
/// `Sun, Mar 03 2024`, with headroom for signed five-digit years.
pub const DATE_LABEL_CAP: usize = 24;

/// Derived per-frame view of "now". Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockSnapshot {
    /// Hour of day, 0–23.
    pub hour: u8,
    /// Minute, 0–59.
    pub minute: u8,
    /// 24-hour, zero-padded `HH:MM`.
    pub time_label: String<TIME_LABEL_CAP>,
    /// Abbreviated weekday, abbreviated month, zero-padded day, year.
    pub date_label: String<DATE_LABEL_CAP>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayClock {
    offset: FixedOffset,
}

impl Default for DisplayClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl DisplayClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Switch to the host's current timezone.
    pub fn set_offset(&mut self, offset: FixedOffset) {
        if offset != self.offset {
            log::info!("Clock: timezone {} -> {}", self.offset, offset);
            self.offset = offset;
        }
    }

    /// Snapshot the wall clock at `now_ms` (Unix epoch milliseconds).
    ///
    /// Instants outside chrono's representable range clamp to the epoch.
    pub fn snapshot(&self, now_ms: i64) -> ClockSnapshot {
        let utc = DateTime::from_timestamp_millis(now_ms).unwrap_or_default();
        let local = utc.with_timezone(&self.offset);

        let hour = local.hour() as u8;
        let minute = local.minute() as u8;

        let mut time_label = String::new();
        // Both fields are < 100, so five bytes always fit.
        let _ = write!(time_label, "{:02}:{:02}", hour, minute);

        let mut date_label = String::new();
        if write!(date_label, "{}", local.format("%a, %b %d %Y")).is_err() {
            log::warn!("Clock: date label truncated for {}", now_ms);
        }

        ClockSnapshot {
            hour,
            minute,
            time_label,
            date_label,
        }
    }
}
