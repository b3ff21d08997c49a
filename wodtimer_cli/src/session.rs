//! Session assembly: config mapping, collaborators, output, and the run itself.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{SystemTime, UNIX_EPOCH};

use crossbeam_channel as xch;
use eyre::WrapErr;
use serde_json::json;
use wodtimer_config::Config;
use wodtimer_core::error::{Result as CoreResult, TimerError};
use wodtimer_core::runner::{self, RunOutcome, RunParams, SamplingMode};
use wodtimer_core::{
    EngineCfg, Intent, Mode, NotificationCoordinator, NotifySettings, TimerEngine, TimerEvent,
};
use wodtimer_notify::{LogHaptics, SimulatedWakeLock, TerminalBell};
use wodtimer_traits::clock::{Clock, MonotonicClock};

/// Env var that swaps the real clock for a `ManualClock`, so whole sessions
/// finish instantly (integration tests).
pub const FAST_ENV: &str = "WODTIMER_TEST_FAST";

pub fn fast_mode() -> bool {
    std::env::var(FAST_ENV).is_ok_and(|v| v == "1")
}

/// What one CLI invocation wants to run.
#[derive(Debug)]
pub struct SessionSpec {
    pub mode: Mode,
    /// Countdown length; None keeps the configured duration.
    pub duration_secs: Option<i64>,
    pub repetitions: Option<i64>,
    pub voice_count: bool,
    pub max_run_ms: Option<u64>,
    /// Present for interactive sessions.
    pub intents: Option<xch::Receiver<Intent>>,
}

pub struct SessionEnv {
    pub json: bool,
    pub fast: bool,
    pub shutdown: Arc<AtomicBool>,
}

/// Resolve `--secs` / `--template` against the config.
pub fn resolve_duration(
    cfg: &Config,
    secs: Option<i64>,
    template: Option<&str>,
) -> CoreResult<Option<i64>> {
    if let Some(name) = template {
        let t = cfg.template(name).ok_or_else(|| {
            let known: Vec<&str> = cfg.templates.iter().map(|t| t.name.as_str()).collect();
            eyre::Report::new(TimerError::Config(format!(
                "unknown template {name:?} (known: {})",
                known.join(", ")
            )))
        })?;
        tracing::info!(template = %t.name, duration_secs = t.duration_secs, "template selected");
        return Ok(Some(i64::from(t.duration_secs)));
    }
    Ok(secs)
}

fn make_clock(fast: bool) -> Arc<dyn Clock + Send + Sync> {
    if fast {
        Arc::new(wodtimer_traits::ManualClock::new())
    } else {
        Arc::new(MonotonicClock::new())
    }
}

/// Terminal collaborators wired to the user's notification settings.
pub fn coordinator(cfg: &Config) -> NotificationCoordinator {
    let settings: NotifySettings = (&cfg.notify).into();
    NotificationCoordinator::new(
        Box::new(TerminalBell::stderr()),
        Box::new(LogHaptics::new()),
        Box::new(SimulatedWakeLock::new()),
        settings,
    )
}

fn event_printer(json: bool) -> impl FnMut(&TimerEvent) + 'static {
    move |e| {
        let line = if json {
            match *e {
                TimerEvent::CountdownTick { seconds_remaining } => {
                    json!({ "event": e.name(), "seconds_remaining": seconds_remaining })
                        .to_string()
                }
                TimerEvent::Complete => json!({ "event": e.name() }).to_string(),
                TimerEvent::RunStateChanged { running } => {
                    json!({ "event": e.name(), "running": running }).to_string()
                }
                TimerEvent::VoiceCount { number } => {
                    json!({ "event": e.name(), "number": number }).to_string()
                }
                TimerEvent::Snapshot(_) => return,
            }
        } else {
            match *e {
                TimerEvent::CountdownTick { seconds_remaining } => format!("{seconds_remaining}..."),
                TimerEvent::Complete => "time!".to_string(),
                TimerEvent::VoiceCount { number } => format!("[{number}]"),
                TimerEvent::RunStateChanged { .. } | TimerEvent::Snapshot(_) => return,
            }
        };
        println!("{line}");
    }
}

pub fn run_session(cfg: &Config, spec: SessionSpec, env: &SessionEnv) -> CoreResult<RunOutcome> {
    let mut engine_cfg: EngineCfg = (&cfg.timer).into();
    engine_cfg.mode = spec.mode;

    let mut builder = TimerEngine::builder()
        .with_config(engine_cfg.clone())
        .with_clock(make_clock(env.fast))
        .with_subscriber(coordinator(cfg).into_subscriber())
        .with_subscriber(event_printer(env.json));
    if let Some(n) = spec.repetitions {
        builder = builder.with_repetitions(n);
    }
    let mut engine = builder.try_build().wrap_err("building timer engine")?;

    if let Some(secs) = spec.duration_secs {
        engine.set_duration(secs);
    }
    if spec.voice_count {
        engine.toggle_voice_count();
    }

    let interactive = spec.intents.is_some();
    let sampling = if env.fast {
        SamplingMode::Direct
    } else {
        SamplingMode::Paced(engine_cfg.tick_hz)
    };
    let params = RunParams {
        mode: sampling,
        max_run_ms: spec.max_run_ms,
        shutdown: Some(env.shutdown.clone()),
        intents: spec.intents,
        auto_start: !interactive,
        stop_on_complete: !interactive,
    };
    runner::run(&mut engine, params)
}

fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Final line for a session; printed before any error is reported.
pub fn print_summary(outcome: &RunOutcome, json: bool) {
    let s = &outcome.snapshot;
    if json {
        let line = json!({
            "timestamp": unix_timestamp(),
            "mode": s.mode.as_str(),
            "phase": s.phase.as_str(),
            "stopped_by": outcome.stopped_by.as_str(),
            "completed": outcome.completed(),
            "duration_secs": s.duration_secs,
            "value_ms": s.remaining_or_elapsed_ms,
            "clock": s.clock_text(),
            "repetitions": s.repetitions,
            "voice_count": s.voice_count_number,
            "wall_ms": outcome.wall_ms,
        });
        println!("{line}");
    } else {
        println!(
            "{} {} at {} (reps {}, {} ms)",
            s.mode,
            outcome.stopped_by.as_str(),
            s.clock_text(),
            s.repetitions,
            outcome.wall_ms
        );
    }
}

/// Availability report for `self-check`.
pub fn self_check(cfg: &Config, json: bool) {
    let c = coordinator(cfg);
    let settings = c.settings();
    let report = c.availability();
    if json {
        let collaborators: serde_json::Map<String, serde_json::Value> = report
            .iter()
            .map(|(name, ok)| ((*name).to_string(), json!(ok)))
            .collect();
        println!(
            "{}",
            json!({
                "ok": true,
                "collaborators": collaborators,
                "settings": {
                    "sound": settings.sound_enabled,
                    "vibration": settings.vibration_enabled,
                    "keep_screen_on": settings.keep_screen_on,
                },
            })
        );
    } else {
        for (name, ok) in report {
            println!("{name}: {}", if ok { "available" } else { "unavailable" });
        }
        println!("OK");
    }
}

pub fn list_templates(cfg: &Config, json: bool) {
    for t in &cfg.templates {
        if json {
            println!(
                "{}",
                json!({ "name": t.name, "duration_secs": t.duration_secs })
            );
        } else {
            println!(
                "{:<16} {}",
                t.name,
                wodtimer_core::util::format_countdown(u64::from(t.duration_secs) * 1_000)
            );
        }
    }
}
