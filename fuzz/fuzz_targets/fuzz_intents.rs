#![no_main]
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use wodtimer_core::{Intent, Mode, Phase, TimerEngine, TimerEvent};
use wodtimer_traits::ManualClock;

#[derive(Debug, Arbitrary)]
enum Op {
    Start,
    Pause,
    Toggle,
    Reset,
    Stopwatch(bool),
    Duration(i64),
    Reps(i64),
    Inc,
    Dec,
    Voice,
    Tick(u16),
    Advance(u16),
}

fuzz_target!(|ops: Vec<Op>| {
    let clock = ManualClock::new();
    let completes = Rc::new(Cell::new(0u32));
    let seen = completes.clone();
    let mut e = TimerEngine::builder()
        .with_clock(Arc::new(clock.clone()))
        .with_subscriber(move |ev| {
            if matches!(ev, TimerEvent::Complete) {
                seen.set(seen.get() + 1);
            }
        })
        .try_build()
        .unwrap();

    for op in ops {
        match op {
            Op::Start => {
                e.dispatch(Intent::Start);
            }
            Op::Pause => {
                e.dispatch(Intent::Pause);
            }
            Op::Toggle => {
                e.dispatch(Intent::Toggle);
            }
            Op::Reset => {
                e.dispatch(Intent::Reset);
                completes.set(0);
            }
            Op::Stopwatch(sw) => {
                let m = if sw { Mode::Stopwatch } else { Mode::Countdown };
                e.dispatch(Intent::SetMode(m));
            }
            Op::Duration(s) => {
                e.dispatch(Intent::SetDuration(s));
            }
            Op::Reps(n) => {
                e.dispatch(Intent::SetRepetitions(n));
            }
            Op::Inc => {
                e.dispatch(Intent::IncrementRepetitions);
            }
            Op::Dec => {
                e.dispatch(Intent::DecrementRepetitions);
            }
            Op::Voice => {
                e.dispatch(Intent::ToggleVoiceCount);
            }
            Op::Tick(ms) => {
                e.tick(u64::from(ms));
            }
            Op::Advance(ms) => {
                clock.advance_ms(u64::from(ms));
                e.on_scheduler_tick();
            }
        }

        let s = e.state();
        assert!((1..=3599).contains(&s.duration_secs()));
        assert!(s.repetitions() <= 999);
        assert!(s.remaining_ms() <= s.duration_ms());
        assert!(completes.get() <= 1);
        assert_eq!(e.phase() == Phase::Running, e.scheduler().is_active());
    }
});
