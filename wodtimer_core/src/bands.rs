//! Whole-second time bands used for countdown cues and display colouring.
//!
//! All predicates take display seconds (`util::display_seconds`), never raw
//! milliseconds.

/// Seconds at which per-second countdown cues fire (`1..=3`).
pub const COUNTDOWN_THRESHOLD_SECS: u64 = 3;
/// Upper inclusive bound of the danger band.
pub const DANGER_THRESHOLD_SECS: u64 = 10;
/// Upper inclusive bound of the warning band.
pub const WARNING_THRESHOLD_SECS: u64 = 30;

#[inline]
pub fn is_countdown_time(secs: u64) -> bool {
    (1..=COUNTDOWN_THRESHOLD_SECS).contains(&secs)
}

#[inline]
pub fn is_danger_time(secs: u64) -> bool {
    secs <= DANGER_THRESHOLD_SECS
}

#[inline]
pub fn is_warning_time(secs: u64) -> bool {
    secs > DANGER_THRESHOLD_SECS && secs <= WARNING_THRESHOLD_SECS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBand {
    Normal,
    Warning,
    Danger,
}

impl TimeBand {
    pub fn for_seconds(secs: u64) -> Self {
        if is_danger_time(secs) {
            TimeBand::Danger
        } else if is_warning_time(secs) {
            TimeBand::Warning
        } else {
            TimeBand::Normal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeBand::Normal => "normal",
            TimeBand::Warning => "warning",
            TimeBand::Danger => "danger",
        }
    }
}
