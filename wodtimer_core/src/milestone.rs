//! Discrete milestones derived from the continuous countdown.
//!
//! Thresholds are judged on display seconds. Each threshold second fires at
//! most once per countdown window, and a corrected tick that jumps over
//! several seconds fires only the second it lands in (or completion).

use crate::bands::is_countdown_time;
use crate::util::display_seconds;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    /// Remaining time entered this whole second of the countdown window.
    Threshold(u32),
    /// Remaining time reached zero.
    Complete,
}

#[derive(Debug, Default, Clone)]
pub struct MilestoneEmitter {
    last_fired_threshold_second: Option<u32>,
    completed: bool,
}

impl MilestoneEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything fired so far. Call when a new countdown window begins.
    pub fn rearm(&mut self) {
        self.last_fired_threshold_second = None;
        self.completed = false;
    }

    pub fn last_fired_threshold_second(&self) -> Option<u32> {
        self.last_fired_threshold_second
    }

    /// Inspect a downward move of remaining time from `prev_ms` to `next_ms`.
    pub fn observe(&mut self, prev_ms: u64, next_ms: u64) -> Option<Milestone> {
        if next_ms >= prev_ms {
            return None;
        }
        if next_ms == 0 {
            if self.completed {
                return None;
            }
            self.completed = true;
            return Some(Milestone::Complete);
        }
        let secs = display_seconds(next_ms);
        if !is_countdown_time(secs) {
            return None;
        }
        let secs = u32::try_from(secs).ok()?;
        if self.last_fired_threshold_second == Some(secs) {
            return None;
        }
        self.last_fired_threshold_second = Some(secs);
        Some(Milestone::Threshold(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_second_fires_once() {
        let mut m = MilestoneEmitter::new();
        assert_eq!(m.observe(3500, 2900), Some(Milestone::Threshold(3)));
        assert_eq!(m.observe(2900, 2400), None);
        assert_eq!(m.observe(2400, 1999), Some(Milestone::Threshold(2)));
    }

    #[test]
    fn above_window_is_silent() {
        let mut m = MilestoneEmitter::new();
        assert_eq!(m.observe(10_000, 9_000), None);
        assert_eq!(m.observe(4_100, 3_001), None);
        assert_eq!(m.last_fired_threshold_second(), None);
    }

    #[test]
    fn jump_fires_only_landing_second() {
        let mut m = MilestoneEmitter::new();
        assert_eq!(m.observe(9_000, 1_500), Some(Milestone::Threshold(2)));
        assert_eq!(m.observe(1_500, 900), Some(Milestone::Threshold(1)));
    }

    #[test]
    fn jump_to_zero_fires_completion_only_once() {
        let mut m = MilestoneEmitter::new();
        assert_eq!(m.observe(5_000, 0), Some(Milestone::Complete));
        assert_eq!(m.observe(5_000, 0), None);
        m.rearm();
        assert_eq!(m.observe(5_000, 0), Some(Milestone::Complete));
    }

    #[test]
    fn no_progress_no_event() {
        let mut m = MilestoneEmitter::new();
        assert_eq!(m.observe(2_500, 2_500), None);
    }
}
