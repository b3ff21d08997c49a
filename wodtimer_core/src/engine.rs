//! The timer state machine (`TimerEngine`).
//!
//! Owns the canonical `TimerState`, the drift-corrected `TickScheduler`, the
//! milestone emitter, and the subscription list. Every intent is total: it
//! either applies or is ignored, and nothing here returns an error.
//!
//! ```text
//! Idle -> Running -> (Paused | Completed)
//! Paused -> Running
//! Running | Paused | Completed -> Idle   (reset)
//! ```

use std::sync::Arc;

use wodtimer_traits::clock::Clock;

use crate::config::EngineCfg;
use crate::events::{Subscriber, SubscriptionId, Subscribers, TimerEvent};
use crate::milestone::{Milestone, MilestoneEmitter};
use crate::scheduler::TickScheduler;
use crate::state::{
    Intent, MAX_REPETITIONS, Mode, Phase, TickStatus, TimerSnapshot, TimerState,
    clamp_duration, clamp_repetitions,
};
use crate::util::MILLIS_PER_SEC;

pub struct TimerEngine {
    pub(crate) state: TimerState,
    pub(crate) scheduler: TickScheduler,
    pub(crate) emitter: MilestoneEmitter,
    pub(crate) subscribers: Subscribers,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    // Milliseconds accrued toward the next voice-count step.
    pub(crate) voice_accum_ms: u64,
}

impl core::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("mode", &self.state.mode)
            .field("phase", &self.state.phase)
            .field("remaining_ms", &self.state.remaining_ms)
            .field("elapsed_ms", &self.state.elapsed_ms)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl TimerEngine {
    pub(crate) fn from_parts(cfg: &EngineCfg, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            state: TimerState::new(cfg.mode, cfg.duration_secs),
            scheduler: TickScheduler::new(cfg.tick_hz),
            emitter: MilestoneEmitter::new(),
            subscribers: Subscribers::default(),
            clock,
            voice_accum_ms: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.state.snapshot()
    }

    pub fn clock(&self) -> &Arc<dyn Clock + Send + Sync> {
        &self.clock
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn last_fired_threshold_second(&self) -> Option<u32> {
        self.emitter.last_fired_threshold_second()
    }

    // ── Subscriptions ────────────────────────────────────────────────────────

    pub fn subscribe<F>(&mut self, f: F) -> SubscriptionId
    where
        F: FnMut(&TimerEvent) + 'static,
    {
        self.subscribers.add(Box::new(f))
    }

    pub(crate) fn subscribe_boxed(&mut self, f: Subscriber) -> SubscriptionId {
        self.subscribers.add(f)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    // ── Intents ──────────────────────────────────────────────────────────────

    /// Apply any intent. Returns whether it changed anything.
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Start => self.start(),
            Intent::Pause => self.pause(),
            Intent::Toggle => match self.state.phase {
                Phase::Running => self.pause(),
                _ => self.start(),
            },
            Intent::Reset => {
                self.reset();
                true
            }
            Intent::SetMode(m) => self.set_mode(m),
            Intent::SetDuration(s) => self.set_duration(s),
            Intent::SetRepetitions(n) => {
                self.set_repetitions(n);
                true
            }
            Intent::IncrementRepetitions => {
                self.increment_repetitions();
                true
            }
            Intent::DecrementRepetitions => {
                self.decrement_repetitions();
                true
            }
            Intent::ResetRepetitions => {
                self.reset_repetitions();
                true
            }
            Intent::ToggleVoiceCount => {
                self.toggle_voice_count();
                true
            }
            Intent::ResetVoiceCount => {
                self.reset_voice_count();
                true
            }
        }
    }

    /// Switch between countdown and stopwatch. Only from Idle; clears the
    /// value for the new mode.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if self.state.phase != Phase::Idle {
            tracing::debug!(phase = self.state.phase.as_str(), %mode, "set_mode ignored");
            return false;
        }
        self.state.mode = mode;
        self.state.remaining_ms = None;
        self.state.elapsed_ms = 0;
        self.emitter.rearm();
        self.publish_snapshot();
        true
    }

    /// Set the countdown length, clamped into `[1, 3599]`. Only from Idle in
    /// countdown mode.
    pub fn set_duration(&mut self, seconds: i64) -> bool {
        if self.state.phase != Phase::Idle || self.state.mode != Mode::Countdown {
            tracing::debug!(
                phase = self.state.phase.as_str(),
                mode = self.state.mode.as_str(),
                seconds,
                "set_duration ignored"
            );
            return false;
        }
        let clamped = clamp_duration(seconds);
        if i64::from(clamped) != seconds {
            tracing::debug!(requested = seconds, clamped, "duration clamped");
        }
        self.state.duration_secs = clamped;
        self.state.remaining_ms = None;
        self.emitter.rearm();
        self.publish_snapshot();
        true
    }

    /// Idle/Paused -> Running.
    pub fn start(&mut self) -> bool {
        match self.state.phase {
            Phase::Running => false,
            Phase::Completed => {
                tracing::debug!("start ignored: completed, reset first");
                false
            }
            Phase::Idle | Phase::Paused => {
                if self.state.mode == Mode::Countdown && self.state.remaining_ms.is_none() {
                    self.state.remaining_ms = Some(self.state.duration_ms());
                }
                let resumed = self.state.phase == Phase::Paused;
                self.state.phase = Phase::Running;
                // Fresh baseline on every start so paused time never decays.
                self.scheduler.start(self.clock.now());
                tracing::info!(
                    mode = self.state.mode.as_str(),
                    value_ms = self.snapshot().remaining_or_elapsed_ms,
                    resumed,
                    "timer start"
                );
                self.publish(TimerEvent::RunStateChanged { running: true });
                self.publish_snapshot();
                true
            }
        }
    }

    /// Running -> Paused. Time measured up to this instant is applied first.
    pub fn pause(&mut self) -> bool {
        if self.state.phase != Phase::Running {
            return false;
        }
        if self.on_scheduler_tick() == TickStatus::Completed {
            // The flushed time finished the countdown; nothing left to pause.
            return false;
        }
        self.scheduler.stop();
        self.state.phase = Phase::Paused;
        tracing::info!(value_ms = self.snapshot().remaining_or_elapsed_ms, "timer paused");
        self.publish(TimerEvent::RunStateChanged { running: false });
        self.publish_snapshot();
        true
    }

    /// Any state -> Idle. Repetitions and voice count survive.
    pub fn reset(&mut self) {
        let was_running = self.state.phase == Phase::Running;
        self.scheduler.stop();
        self.state.phase = Phase::Idle;
        self.state.remaining_ms = None;
        self.state.elapsed_ms = 0;
        self.emitter.rearm();
        self.voice_accum_ms = 0;
        tracing::info!(mode = self.state.mode.as_str(), "timer reset");
        if was_running {
            self.publish(TimerEvent::RunStateChanged { running: false });
        }
        self.publish_snapshot();
    }

    pub fn set_repetitions(&mut self, n: i64) {
        self.state.repetitions = clamp_repetitions(n);
        self.publish_snapshot();
    }

    pub fn increment_repetitions(&mut self) {
        self.state.repetitions = (self.state.repetitions + 1).min(MAX_REPETITIONS);
        self.publish_snapshot();
    }

    pub fn decrement_repetitions(&mut self) {
        self.state.repetitions = self.state.repetitions.saturating_sub(1);
        self.publish_snapshot();
    }

    pub fn reset_repetitions(&mut self) {
        self.state.repetitions = 0;
        self.publish_snapshot();
    }

    /// Flip the voice-count overlay. Turning it on does not advance the
    /// number; the next step comes one full running second later.
    pub fn toggle_voice_count(&mut self) {
        self.state.voice_count_active = !self.state.voice_count_active;
        self.voice_accum_ms = 0;
        tracing::debug!(
            active = self.state.voice_count_active,
            number = self.state.voice_count_number,
            "voice count toggled"
        );
        self.publish_snapshot();
    }

    pub fn reset_voice_count(&mut self) {
        self.state.voice_count_number = 0;
        self.voice_accum_ms = 0;
        self.publish_snapshot();
    }

    // ── Ticks ────────────────────────────────────────────────────────────────

    /// Measure real time since the previous tick and apply it.
    pub fn on_scheduler_tick(&mut self) -> TickStatus {
        let now = self.clock.now();
        match self.scheduler.take_delta(now) {
            Some(delta_ms) => self.tick(delta_ms),
            None => TickStatus::Idle,
        }
    }

    /// Apply `delta_ms` of running time. Ignored unless Running.
    pub fn tick(&mut self, delta_ms: u64) -> TickStatus {
        if self.state.phase != Phase::Running {
            tracing::trace!(phase = self.state.phase.as_str(), delta_ms, "tick ignored");
            return TickStatus::Idle;
        }
        tracing::trace!(delta_ms, "tick");

        match self.state.mode {
            Mode::Countdown => {
                let prev = self.state.remaining_ms();
                let next = prev.saturating_sub(delta_ms);
                self.state.remaining_ms = Some(next);
                // Time past zero was never on a running clock.
                self.advance_voice_count(prev - next);

                match self.emitter.observe(prev, next) {
                    Some(Milestone::Complete) => {
                        self.state.phase = Phase::Completed;
                        self.scheduler.stop();
                        self.voice_accum_ms = 0;
                        tracing::info!(duration_secs = self.state.duration_secs, "countdown complete");
                        self.publish(TimerEvent::Complete);
                        self.publish(TimerEvent::RunStateChanged { running: false });
                        self.publish_snapshot();
                        return TickStatus::Completed;
                    }
                    Some(Milestone::Threshold(secs)) => {
                        tracing::debug!(seconds_remaining = secs, "countdown threshold");
                        self.publish(TimerEvent::CountdownTick {
                            seconds_remaining: secs,
                        });
                    }
                    None => {}
                }
            }
            Mode::Stopwatch => {
                self.state.elapsed_ms = self.state.elapsed_ms.saturating_add(delta_ms);
                self.advance_voice_count(delta_ms);
            }
        }

        self.publish_snapshot();
        TickStatus::Running
    }

    // ── Private ──────────────────────────────────────────────────────────────

    /// Whole running seconds advance the overlay. A long corrected tick jumps
    /// straight to the final number with a single event.
    fn advance_voice_count(&mut self, delta_ms: u64) {
        if !self.state.voice_count_active {
            return;
        }
        self.voice_accum_ms = self.voice_accum_ms.saturating_add(delta_ms);
        let whole = self.voice_accum_ms / MILLIS_PER_SEC;
        if whole == 0 {
            return;
        }
        self.voice_accum_ms %= MILLIS_PER_SEC;
        let step = u32::try_from(whole).unwrap_or(u32::MAX);
        self.state.voice_count_number = self.state.voice_count_number.saturating_add(step);
        self.publish(TimerEvent::VoiceCount {
            number: self.state.voice_count_number,
        });
    }

    fn publish_snapshot(&mut self) {
        let snap = self.state.snapshot();
        self.publish(TimerEvent::Snapshot(snap));
    }

    fn publish(&mut self, event: TimerEvent) {
        self.subscribers.publish(&event);
    }
}
