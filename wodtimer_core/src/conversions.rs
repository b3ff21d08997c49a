//! `From` implementations bridging `wodtimer_config` types to `wodtimer_core` types.

use crate::config::{EngineCfg, NotifySettings};
use crate::state::Mode;

// ── Mode ─────────────────────────────────────────────────────────────────────

impl From<wodtimer_config::ModeCfg> for Mode {
    fn from(m: wodtimer_config::ModeCfg) -> Self {
        match m {
            wodtimer_config::ModeCfg::Countdown => Mode::Countdown,
            wodtimer_config::ModeCfg::Stopwatch => Mode::Stopwatch,
        }
    }
}

// ── EngineCfg ────────────────────────────────────────────────────────────────

impl From<&wodtimer_config::TimerCfg> for EngineCfg {
    fn from(c: &wodtimer_config::TimerCfg) -> Self {
        Self {
            mode: c.mode.into(),
            duration_secs: c.duration_secs,
            tick_hz: c.tick_hz,
        }
    }
}

// ── NotifySettings ───────────────────────────────────────────────────────────

impl From<&wodtimer_config::NotifyCfg> for NotifySettings {
    fn from(c: &wodtimer_config::NotifyCfg) -> Self {
        Self {
            sound_enabled: c.sound,
            vibration_enabled: c.vibration,
            keep_screen_on: c.keep_screen_on,
        }
    }
}
