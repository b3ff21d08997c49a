//! Runtime configuration types for the timer engine.
//!
//! These are the structs consumed by `TimerEngine` and the coordinator.
//! They are separate from the TOML-deserialized config in `wodtimer_config`.

use crate::state::Mode;

/// Engine construction parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCfg {
    /// Initial mode.
    pub mode: Mode,
    /// Initial countdown length in seconds (1..=3599).
    pub duration_secs: u32,
    /// Nominal scheduler cadence in Hz. Default: 10.
    pub tick_hz: u32,
}

impl Default for EngineCfg {
    fn default() -> Self {
        Self {
            mode: Mode::Countdown,
            duration_secs: 60,
            tick_hz: 10,
        }
    }
}

/// Which collaborators the coordinator asks to act. Never read by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifySettings {
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    pub keep_screen_on: bool,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            vibration_enabled: true,
            keep_screen_on: true,
        }
    }
}
