use crossbeam_channel as xch;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use wodtimer_traits::clock::MonotonicClock;

use crate::engine::TimerEngine;
use crate::error::{Report, Result as CoreResult, TimerError};
use crate::pulse::Pulse;
use crate::state::{Intent, Mode, Phase, TickStatus, TimerSnapshot};

/// How ticks should be delivered to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingMode {
    /// Sleep the nominal period on the engine's own clock between ticks.
    /// With a `ManualClock` this runs as fast as the CPU allows.
    #[default]
    Direct,
    /// Wait on a background pulse thread at the given Hz
    Paced(u32),
}

/// Why `run` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Countdown reached zero.
    Completed,
    /// The shutdown flag was raised (Ctrl-C).
    Shutdown,
    /// `max_run_ms` of wall time elapsed.
    MaxRuntime,
    /// The intent sender hung up.
    IntentsClosed,
    /// Nothing is running and nothing can start it.
    Idle,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::Completed => "completed",
            StopReason::Shutdown => "shutdown",
            StopReason::MaxRuntime => "max_runtime",
            StopReason::IntentsClosed => "intents_closed",
            StopReason::Idle => "idle",
        }
    }
}

pub struct RunParams {
    pub mode: SamplingMode,
    /// Hard cap on the session's wall time, measured on the engine clock.
    pub max_run_ms: Option<u64>,
    pub shutdown: Option<Arc<AtomicBool>>,
    /// UI intents dispatched between ticks.
    pub intents: Option<xch::Receiver<Intent>>,
    /// Dispatch `Intent::Start` before the first tick.
    pub auto_start: bool,
    /// Return as soon as the countdown completes.
    pub stop_on_complete: bool,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            mode: SamplingMode::Direct,
            max_run_ms: None,
            shutdown: None,
            intents: None,
            auto_start: true,
            stop_on_complete: true,
        }
    }
}

impl core::fmt::Debug for RunParams {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RunParams")
            .field("mode", &self.mode)
            .field("max_run_ms", &self.max_run_ms)
            .field("has_shutdown", &self.shutdown.is_some())
            .field("has_intents", &self.intents.is_some())
            .field("auto_start", &self.auto_start)
            .field("stop_on_complete", &self.stop_on_complete)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub snapshot: TimerSnapshot,
    pub stopped_by: StopReason,
    pub wall_ms: u64,
}

impl RunOutcome {
    pub fn completed(&self) -> bool {
        self.stopped_by == StopReason::Completed
    }

    /// Turn an interrupted session into an error. A stopwatch hitting its cap
    /// is a normal end; a countdown that did not reach zero is not.
    pub fn require_finished(&self, max_run_ms: Option<u64>) -> CoreResult<()> {
        match self.stopped_by {
            StopReason::Shutdown => Err(Report::new(TimerError::Shutdown)),
            StopReason::MaxRuntime if self.snapshot.mode == Mode::Countdown => {
                Err(Report::new(TimerError::MaxRuntime {
                    max_run_ms: max_run_ms.unwrap_or(self.wall_ms),
                }))
            }
            _ => Ok(()),
        }
    }
}

/// Drive `engine` until it completes, the shutdown flag is raised, the
/// runtime cap elapses, or its intent source goes away.
pub fn run(engine: &mut TimerEngine, params: RunParams) -> CoreResult<RunOutcome> {
    let started = engine.clock().now();
    if params.auto_start {
        engine.start();
    }
    tracing::info!(
        mode = engine.mode().as_str(),
        sampling = ?params.mode,
        max_run_ms = ?params.max_run_ms,
        "session start"
    );

    let reason = match params.mode {
        SamplingMode::Direct => run_direct(engine, &params, started),
        SamplingMode::Paced(hz) => run_paced(engine, &params, started, hz)?,
    };

    // A run that ends early leaves the timer paused, not silently ticking.
    if reason != StopReason::Completed && engine.phase() == Phase::Running {
        engine.pause();
    }

    let outcome = RunOutcome {
        snapshot: engine.snapshot(),
        stopped_by: reason,
        wall_ms: engine.clock().ms_since(started),
    };
    tracing::info!(
        stopped_by = reason.as_str(),
        wall_ms = outcome.wall_ms,
        value_ms = outcome.snapshot.remaining_or_elapsed_ms,
        "session end"
    );
    Ok(outcome)
}

fn run_direct(engine: &mut TimerEngine, params: &RunParams, started: Instant) -> StopReason {
    let period = engine.scheduler().nominal_period();
    loop {
        if let Some(reason) = check_stop(engine, params, started) {
            return reason;
        }
        if let Some(rx) = &params.intents {
            loop {
                match rx.try_recv() {
                    Ok(intent) => apply(engine, intent),
                    Err(xch::TryRecvError::Empty) => break,
                    Err(xch::TryRecvError::Disconnected) => return StopReason::IntentsClosed,
                }
            }
        }
        if let Some(reason) = after_tick(engine, params) {
            return reason;
        }
        engine.clock().sleep(period);
    }
}

fn run_paced(
    engine: &mut TimerEngine,
    params: &RunParams,
    started: Instant,
    hz: u32,
) -> CoreResult<StopReason> {
    let pulse = Pulse::spawn(hz, MonotonicClock::new())?;
    let never = xch::never();
    let intents = params.intents.as_ref().unwrap_or(&never);

    loop {
        if let Some(reason) = check_stop(engine, params, started) {
            return Ok(reason);
        }
        if let Some(reason) = after_tick(engine, params) {
            return Ok(reason);
        }
        xch::select! {
            recv(pulse.receiver()) -> _ => {}
            recv(intents) -> msg => match msg {
                Ok(intent) => apply(engine, intent),
                Err(_) => return Ok(StopReason::IntentsClosed),
            },
        }
    }
}

/// Feed one tick, then decide whether the loop has anything left to do.
fn after_tick(engine: &mut TimerEngine, params: &RunParams) -> Option<StopReason> {
    if engine.on_scheduler_tick() == TickStatus::Completed && params.stop_on_complete {
        return Some(StopReason::Completed);
    }
    if params.intents.is_none() && engine.phase() != Phase::Running {
        return Some(if engine.phase() == Phase::Completed {
            StopReason::Completed
        } else {
            StopReason::Idle
        });
    }
    None
}

fn check_stop(engine: &TimerEngine, params: &RunParams, started: Instant) -> Option<StopReason> {
    if let Some(flag) = &params.shutdown
        && flag.load(Ordering::Relaxed)
    {
        tracing::info!("shutdown requested");
        return Some(StopReason::Shutdown);
    }
    if let Some(max) = params.max_run_ms
        && engine.clock().ms_since(started) >= max
    {
        tracing::info!(max_run_ms = max, "max runtime reached");
        return Some(StopReason::MaxRuntime);
    }
    None
}

fn apply(engine: &mut TimerEngine, intent: Intent) {
    let applied = engine.dispatch(intent);
    tracing::debug!(?intent, applied, phase = engine.phase().as_str(), "intent");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wodtimer_traits::clock::manual::ManualClock;

    #[test]
    fn direct_countdown_completes_on_manual_clock() {
        let clock = ManualClock::new();
        let mut e = TimerEngine::builder()
            .with_duration_secs(5)
            .with_clock(Arc::new(clock.clone()))
            .try_build()
            .unwrap();
        let out = run(&mut e, RunParams::default()).unwrap();
        assert!(out.completed());
        assert_eq!(out.snapshot.remaining_or_elapsed_ms, 0);
        assert_eq!(out.wall_ms, 5_000);
    }

    #[test]
    fn paced_zero_hz_falls_back_to_one_hz() {
        let mut e = TimerEngine::builder().try_build().unwrap();
        let out = run(
            &mut e,
            RunParams {
                mode: SamplingMode::Paced(0),
                shutdown: Some(Arc::new(AtomicBool::new(true))),
                ..RunParams::default()
            },
        )
        .unwrap();
        assert_eq!(out.stopped_by, StopReason::Shutdown);
    }

    #[test]
    fn paced_runner_honours_shutdown() {
        let mut e = TimerEngine::builder()
            .with_duration_secs(60)
            .with_tick_hz(100)
            .try_build()
            .unwrap();
        let flag = Arc::new(AtomicBool::new(false));
        let f2 = flag.clone();
        let t = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            f2.store(true, Ordering::Relaxed);
        });
        let out = run(
            &mut e,
            RunParams {
                mode: SamplingMode::Paced(100),
                shutdown: Some(flag),
                ..RunParams::default()
            },
        )
        .unwrap();
        t.join().unwrap();
        assert_eq!(out.stopped_by, StopReason::Shutdown);
        assert!(out.snapshot.is_paused);
        assert!(out.snapshot.remaining_or_elapsed_ms < 60_000);
    }
}
