//! Common time helpers for wodtimer_core.

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Compute the nominal tick period in milliseconds for a cadence in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero.
/// - Ensures result is at least 1 millisecond.
#[inline]
pub fn period_ms(hz: u32) -> u64 {
    (MILLIS_PER_SEC / u64::from(hz.max(1))).max(1)
}

/// Whole-second representation of a countdown value: `ceil(ms / 1000)`.
///
/// 2_001 ms reads as 3 seconds; 2_000 ms reads as 2.
#[inline]
pub fn display_seconds(ms: u64) -> u64 {
    ms.div_ceil(MILLIS_PER_SEC)
}

/// Render a countdown value as `MM:SS` using display seconds.
pub fn format_countdown(ms: u64) -> String {
    format_secs(display_seconds(ms))
}

/// Render a stopwatch value as `MM:SS`; elapsed time floors.
pub fn format_elapsed(ms: u64) -> String {
    format_secs(ms / MILLIS_PER_SEC)
}

fn format_secs(total: u64) -> String {
    format!("{:02}:{:02}", total / 60, total % 60)
}
