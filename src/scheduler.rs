//! Interactive refresh scheduler.
//!
//! A single-timer state machine that keeps the face repainting on whole
//! second boundaries while it is visible and interactive. Ambient mode gets
//! its own low-frequency refresh from the host, so no wake-ups are armed
//! there.
//!
//! ```text
//!            arm() [visible ∧ interactive]
//!   ┌──────┐ ─────────────────────────────▶ ┌───────┐
//!   │ Idle │                                │ Armed │ ──┐ on_tick()
//!   └──────┘ ◀───────────────────────────── └───────┘ ◀─┘ (reschedule)
//!        arm() [otherwise] · cancel()
//! ```
//!
//! The scheduler knows nothing about the host; it drives a [`WakeTimer`]
//! and leaves repainting to the engine.

use log::debug;

use crate::app::ports::WakeTimer;
use crate::mode::{DisplayMode, Visibility};

/// Default interactive cadence.
pub const DEFAULT_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    /// A wake-up is pending at `deadline_ms` (Unix epoch milliseconds).
    Armed { deadline_ms: i64 },
}

pub struct RefreshScheduler {
    state: SchedulerState,
    interval_ms: u64,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_MS)
    }
}

impl RefreshScheduler {
    /// `interval_ms` of zero is treated as one millisecond.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            state: SchedulerState::Idle,
            interval_ms: interval_ms.max(1),
        }
    }

    /// The timer runs iff the face is visible and interactive.
    pub fn should_run(mode: DisplayMode, visibility: Visibility) -> bool {
        visibility.is_visible() && !mode.is_ambient()
    }

    /// Milliseconds from `now_ms` to the next interval boundary,
    /// in `1..=interval_ms`.
    pub fn delay_to_next_tick(&self, now_ms: i64) -> u64 {
        self.interval_ms - now_ms.rem_euclid(self.interval_ms as i64) as u64
    }

    /// Re-evaluate whether the timer should run.
    ///
    /// Always cancels the pending wake-up first, so at most one is ever
    /// outstanding.
    pub fn arm(
        &mut self,
        mode: DisplayMode,
        visibility: Visibility,
        now_ms: i64,
        timer: &mut dyn WakeTimer,
    ) -> SchedulerState {
        timer.cancel_wake();
        self.state = SchedulerState::Idle;

        if Self::should_run(mode, visibility) {
            self.schedule(now_ms, timer);
        } else {
            debug!("Scheduler: idle ({:?}, {:?})", mode, visibility);
        }
        self.state
    }

    /// Handle an elapsed wake-up.
    ///
    /// Returns `true` if the tick was live and the caller should repaint;
    /// a tick arriving while idle is stale and ignored. The next wake-up is
    /// scheduled only if the run condition still holds.
    pub fn on_tick(
        &mut self,
        mode: DisplayMode,
        visibility: Visibility,
        now_ms: i64,
        timer: &mut dyn WakeTimer,
    ) -> bool {
        if self.state == SchedulerState::Idle {
            debug!("Scheduler: stale tick ignored");
            return false;
        }

        self.state = SchedulerState::Idle;
        if Self::should_run(mode, visibility) {
            self.schedule(now_ms, timer);
        }
        true
    }

    /// Drop any pending wake-up (teardown).
    pub fn cancel(&mut self, timer: &mut dyn WakeTimer) {
        if self.is_armed() {
            debug!("Scheduler: cancelled");
        }
        timer.cancel_wake();
        self.state = SchedulerState::Idle;
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, SchedulerState::Armed { .. })
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    fn schedule(&mut self, now_ms: i64, timer: &mut dyn WakeTimer) {
        let delay = self.delay_to_next_tick(now_ms);
        timer.schedule_wake(delay);
        self.state = SchedulerState::Armed {
            deadline_ms: now_ms.saturating_add(delay as i64),
        };
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
