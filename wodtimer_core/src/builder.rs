//! Builder for `TimerEngine`.

use std::sync::Arc;

use wodtimer_traits::clock::{Clock, MonotonicClock};

use crate::config::EngineCfg;
use crate::engine::TimerEngine;
use crate::error::{BuildError, Result};
use crate::events::{Subscriber, TimerEvent};
use crate::state::{MAX_DURATION_SECS, MIN_DURATION_SECS, Mode, clamp_repetitions};

impl TimerEngine {
    /// Start building an engine with default settings (60 s countdown, 10 Hz).
    pub fn builder() -> TimerEngineBuilder {
        TimerEngineBuilder::default()
    }
}

#[derive(Default)]
pub struct TimerEngineBuilder {
    cfg: EngineCfg,
    repetitions: Option<i64>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    subscribers: Vec<Subscriber>,
}

impl core::fmt::Debug for TimerEngineBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimerEngineBuilder")
            .field("cfg", &self.cfg)
            .field("repetitions", &self.repetitions)
            .field("custom_clock", &self.clock.is_some())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl TimerEngineBuilder {
    pub fn with_config(mut self, cfg: EngineCfg) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.cfg.mode = mode;
        self
    }

    pub fn with_duration_secs(mut self, secs: u32) -> Self {
        self.cfg.duration_secs = secs;
        self
    }

    pub fn with_tick_hz(mut self, hz: u32) -> Self {
        self.cfg.tick_hz = hz;
        self
    }

    /// Initial repetition count; clamped like `Intent::SetRepetitions`.
    pub fn with_repetitions(mut self, n: i64) -> Self {
        self.repetitions = Some(n);
        self
    }

    /// Provide a custom clock; defaults to `MonotonicClock` when not provided.
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Register a subscriber before the engine exists, so it also sees the
    /// events of the very first intent.
    pub fn with_subscriber<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TimerEvent) + 'static,
    {
        self.subscribers.push(Box::new(f));
        self
    }

    /// Validate and construct. Unlike intents, which clamp, the builder
    /// rejects out-of-range construction values.
    pub fn try_build(self) -> Result<TimerEngine> {
        if self.cfg.tick_hz == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "tick_hz must be > 0",
            )));
        }
        if self.cfg.tick_hz > 1000 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "tick_hz must be <= 1000",
            )));
        }
        if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&self.cfg.duration_secs) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "duration_secs must be in 1..=3599",
            )));
        }

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()));
        let mut engine = TimerEngine::from_parts(&self.cfg, clock);
        if let Some(n) = self.repetitions {
            engine.state.repetitions = clamp_repetitions(n);
        }
        for sub in self.subscribers {
            engine.subscribe_boxed(sub);
        }
        tracing::debug!(
            mode = self.cfg.mode.as_str(),
            duration_secs = self.cfg.duration_secs,
            tick_hz = self.cfg.tick_hz,
            "timer engine built"
        );
        Ok(engine)
    }
}
