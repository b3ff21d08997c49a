//! Drift-corrected tick bookkeeping.
//!
//! The scheduler never counts delivered ticks. Each tick asks the clock how
//! much real time passed since the previous one and hands over exactly that,
//! so late, coalesced, or suspended ticks catch up in one step.

use std::time::{Duration, Instant};

use crate::util::period_ms;

#[derive(Debug, Clone)]
pub struct TickScheduler {
    period: Duration,
    last_tick: Option<Instant>,
}

impl TickScheduler {
    pub fn new(tick_hz: u32) -> Self {
        Self {
            period: Duration::from_millis(period_ms(tick_hz)),
            last_tick: None,
        }
    }

    /// Nominal interval between ticks. Informational only.
    pub fn nominal_period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.last_tick.is_some()
    }

    /// Begin measuring from `now`. Returns false (and keeps the old baseline)
    /// when already active.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.last_tick.is_some() {
            return false;
        }
        self.last_tick = Some(now);
        true
    }

    /// Stop measuring. Idempotent; safe to call while a tick is being processed.
    pub fn stop(&mut self) -> bool {
        self.last_tick.take().is_some()
    }

    /// Whole milliseconds of real time since the previous tick, or None when
    /// stopped. The baseline advances by exactly the returned amount so
    /// sub-millisecond remainders carry into the next tick.
    pub fn take_delta(&mut self, now: Instant) -> Option<u64> {
        let last = self.last_tick?;
        let elapsed = now.saturating_duration_since(last);
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.last_tick = Some(last + Duration::from_millis(ms));
        Some(ms)
    }
}
