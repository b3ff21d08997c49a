//! What each milestone sounds and feels like.

/// Vibration pattern (on/off milliseconds) for a countdown second.
pub const COUNTDOWN_VIBRATION_MS: &[u64] = &[120];
/// Vibration pattern for completion: long-short-long.
pub const COMPLETION_VIBRATION_MS: &[u64] = &[400, 100, 200, 100, 400];
/// Bells rung on completion.
pub const COMPLETION_BELLS: usize = 3;

/// Bells for a countdown second: one per second, except the final second,
/// which rings twice so it is distinguishable without looking.
#[inline]
pub fn countdown_bells(seconds_remaining: u32) -> usize {
    if seconds_remaining <= 1 { 2 } else { 1 }
}
