//! Canonical timer state, the read-only snapshot handed to collaborators,
//! and the intents the UI can dispatch.

use std::fmt;
use std::str::FromStr;

use crate::bands::TimeBand;
use crate::util::{self, MILLIS_PER_SEC};

/// Longest countdown accepted (59:59).
pub const MAX_DURATION_SECS: u32 = 3599;
/// Shortest countdown accepted.
pub const MIN_DURATION_SECS: u32 = 1;
/// Upper bound for the repetition counter.
pub const MAX_REPETITIONS: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Countdown,
    Stopwatch,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Countdown => "countdown",
            Mode::Stopwatch => "stopwatch",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "countdown" | "cd" => Ok(Mode::Countdown),
            "stopwatch" | "sw" => Ok(Mode::Stopwatch),
            other => Err(format!("unknown mode {other:?}")),
        }
    }
}

/// Lifecycle phase. `Completed` is terminal until `reset()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::Completed => "completed",
        }
    }
}

/// The single mutable timer record. Only `TimerEngine` mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub(crate) mode: Mode,
    pub(crate) phase: Phase,
    pub(crate) duration_secs: u32,
    // None until the first start after a reset; reads as the full duration.
    pub(crate) remaining_ms: Option<u64>,
    pub(crate) elapsed_ms: u64,
    pub(crate) repetitions: u32,
    pub(crate) voice_count_active: bool,
    pub(crate) voice_count_number: u32,
}

impl TimerState {
    pub(crate) fn new(mode: Mode, duration_secs: u32) -> Self {
        Self {
            mode,
            phase: Phase::Idle,
            duration_secs: clamp_duration(i64::from(duration_secs)),
            remaining_ms: None,
            elapsed_ms: 0,
            repetitions: 0,
            voice_count_active: false,
            voice_count_number: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.duration_secs) * MILLIS_PER_SEC
    }
    /// Remaining countdown time; the full duration while unset.
    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms.unwrap_or_else(|| self.duration_ms())
    }
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }
    pub fn voice_count_active(&self) -> bool {
        self.voice_count_active
    }
    pub fn voice_count_number(&self) -> u32 {
        self.voice_count_number
    }

    pub(crate) fn snapshot(&self) -> TimerSnapshot {
        let value_ms = match self.mode {
            Mode::Countdown => self.remaining_ms(),
            Mode::Stopwatch => self.elapsed_ms,
        };
        TimerSnapshot {
            mode: self.mode,
            phase: self.phase,
            duration_secs: self.duration_secs,
            remaining_or_elapsed_ms: value_ms,
            repetitions: self.repetitions,
            is_running: self.is_running(),
            is_paused: self.is_paused(),
            voice_count_active: self.voice_count_active,
            voice_count_number: self.voice_count_number,
        }
    }
}

/// Read-only copy of the timer published on every tick and accepted intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub phase: Phase,
    pub duration_secs: u32,
    pub remaining_or_elapsed_ms: u64,
    pub repetitions: u32,
    pub is_running: bool,
    pub is_paused: bool,
    pub voice_count_active: bool,
    pub voice_count_number: u32,
}

impl TimerSnapshot {
    /// Seconds as shown to the user: ceil for countdown, floor for stopwatch.
    pub fn display_seconds(&self) -> u64 {
        match self.mode {
            Mode::Countdown => util::display_seconds(self.remaining_or_elapsed_ms),
            Mode::Stopwatch => self.remaining_or_elapsed_ms / MILLIS_PER_SEC,
        }
    }

    /// Colour band; stopwatch has none.
    pub fn band(&self) -> Option<TimeBand> {
        match self.mode {
            Mode::Countdown => Some(TimeBand::for_seconds(self.display_seconds())),
            Mode::Stopwatch => None,
        }
    }

    /// `MM:SS` text for the current value.
    pub fn clock_text(&self) -> String {
        match self.mode {
            Mode::Countdown => util::format_countdown(self.remaining_or_elapsed_ms),
            Mode::Stopwatch => util::format_elapsed(self.remaining_or_elapsed_ms),
        }
    }

    /// Fraction of the countdown already consumed, `0.0..=1.0`.
    pub fn progress(&self) -> Option<f64> {
        match self.mode {
            Mode::Countdown => {
                let total = u64::from(self.duration_secs) * MILLIS_PER_SEC;
                if total == 0 {
                    return Some(0.0);
                }
                let left = self.remaining_or_elapsed_ms.min(total);
                Some(1.0 - (left as f64 / total as f64))
            }
            Mode::Stopwatch => None,
        }
    }
}

/// Everything the UI can ask the timer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    Pause,
    /// Start when idle/paused, pause when running.
    Toggle,
    Reset,
    SetMode(Mode),
    SetDuration(i64),
    SetRepetitions(i64),
    IncrementRepetitions,
    DecrementRepetitions,
    ResetRepetitions,
    ToggleVoiceCount,
    ResetVoiceCount,
}

/// Result of feeding one scheduler tick into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Not running; the tick was ignored.
    Idle,
    /// Time advanced; keep ticking.
    Running,
    /// This tick finished the countdown; the scheduler is already stopped.
    Completed,
}

#[inline]
pub(crate) fn clamp_duration(secs: i64) -> u32 {
    secs.clamp(i64::from(MIN_DURATION_SECS), i64::from(MAX_DURATION_SECS)) as u32
}

#[inline]
pub(crate) fn clamp_repetitions(n: i64) -> u32 {
    n.clamp(0, i64::from(MAX_REPETITIONS)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps() {
        assert_eq!(clamp_duration(-5), 1);
        assert_eq!(clamp_duration(0), 1);
        assert_eq!(clamp_duration(90), 90);
        assert_eq!(clamp_duration(10_000), 3599);
        assert_eq!(clamp_repetitions(-1), 0);
        assert_eq!(clamp_repetitions(1_000), 999);
    }

    #[test]
    fn unset_remaining_reads_as_duration() {
        let s = TimerState::new(Mode::Countdown, 45);
        assert_eq!(s.remaining_ms(), 45_000);
        let snap = s.snapshot();
        assert_eq!(snap.remaining_or_elapsed_ms, 45_000);
        assert_eq!(snap.clock_text(), "00:45");
        assert_eq!(snap.progress(), Some(0.0));
        assert!(!snap.is_running && !snap.is_paused);
    }

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("Stopwatch".parse::<Mode>(), Ok(Mode::Stopwatch));
        assert_eq!("cd".parse::<Mode>(), Ok(Mode::Countdown));
        assert!("lap".parse::<Mode>().is_err());
    }
}
