use std::sync::Arc;

use proptest::prelude::*;
use wodtimer_core::mocks::EventLog;
use wodtimer_core::{Phase, TickStatus, TimerEngine};
use wodtimer_traits::ManualClock;

// Split `total` ms into chunks whose sizes cycle through `steps`.
fn partition(total: u64, steps: &[u64]) -> Vec<u64> {
    let mut out = Vec::new();
    let mut left = total;
    let mut i = 0;
    while left > 0 {
        let step = steps[i % steps.len()].min(left);
        out.push(step);
        left -= step;
        i += 1;
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_partition_completes_exactly_once(
        d in 1u32..=3599,
        steps in proptest::collection::vec(250u64..=7_000, 1..8),
    ) {
        let log = EventLog::new();
        let mut e = TimerEngine::builder()
            .with_clock(Arc::new(ManualClock::new()))
            .with_subscriber(log.recorder())
            .try_build()
            .unwrap();
        prop_assert!(e.set_duration(i64::from(d)));
        prop_assert!(e.start());

        let mut completions = 0;
        for delta in partition(u64::from(d) * 1_000, &steps) {
            if e.tick(delta) == TickStatus::Completed {
                completions += 1;
            }
        }
        // Extra ticks after completion are ignored.
        prop_assert_eq!(e.tick(1_000), TickStatus::Idle);

        prop_assert_eq!(completions, 1);
        prop_assert_eq!(log.count("complete"), 1);
        prop_assert_eq!(e.phase(), Phase::Completed);
        prop_assert_eq!(e.state().remaining_ms(), 0);
    }

    #[test]
    fn thresholds_are_distinct_and_descending(
        d in 1u32..=20,
        steps in proptest::collection::vec(50u64..=2_500, 1..6),
    ) {
        let log = EventLog::new();
        let mut e = TimerEngine::builder()
            .with_duration_secs(d)
            .with_clock(Arc::new(ManualClock::new()))
            .with_subscriber(log.recorder())
            .try_build()
            .unwrap();
        e.start();
        for delta in partition(u64::from(d) * 1_000, &steps) {
            e.tick(delta);
        }
        let fired: Vec<u32> = log
            .events()
            .iter()
            .filter_map(|ev| match ev {
                wodtimer_core::TimerEvent::CountdownTick { seconds_remaining } => Some(*seconds_remaining),
                _ => None,
            })
            .collect();
        prop_assert!(fired.windows(2).all(|w| w[0] > w[1]));
        prop_assert!(fired.iter().all(|s| (1..=3).contains(s)));
    }

    #[test]
    fn clock_driven_ticks_track_real_time(
        gaps in proptest::collection::vec(0u64..=4_000, 1..30),
    ) {
        let clock = ManualClock::new();
        let mut e = TimerEngine::builder()
            .with_duration_secs(3_599)
            .with_clock(Arc::new(clock.clone()))
            .try_build()
            .unwrap();
        e.start();
        let mut total = 0;
        for gap in gaps {
            clock.advance_ms(gap);
            total += gap;
            e.on_scheduler_tick();
        }
        prop_assert_eq!(e.state().remaining_ms(), 3_599_000 - total);
    }
}
