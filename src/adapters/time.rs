//! Host wall-clock adapter.
//!
//! Reads the system clock and the local UTC offset through `chrono`.
//! Host adapters delegate [`HostPort::now_millis`](crate::app::ports::HostPort::now_millis)
//! and [`HostPort::local_offset`](crate::app::ports::HostPort::local_offset) here.

use chrono::{FixedOffset, Local, Utc};

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }

    /// Unix epoch milliseconds.
    pub fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    /// The zone the device is currently set to.
    pub fn local_offset(&self) -> FixedOffset {
        *Local::now().offset()
    }
}
