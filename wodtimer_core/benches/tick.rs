use std::sync::Arc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use wodtimer_core::mocks::EventLog;
use wodtimer_core::{NotificationCoordinator, NotifySettings, TimerEngine};
use wodtimer_traits::ManualClock;

fn engine(subscribed: bool) -> TimerEngine {
    let mut b = TimerEngine::builder()
        .with_duration_secs(3_599)
        .with_clock(Arc::new(ManualClock::new()));
    if subscribed {
        let log = EventLog::new();
        b = b
            .with_subscriber(log.recorder())
            .with_subscriber(
                NotificationCoordinator::headless(NotifySettings::default()).into_subscriber(),
            );
    }
    b.try_build().unwrap_or_else(|e| panic!("bench engine: {e}"))
}

pub fn bench_tick(c: &mut Criterion) {
    let mut g = c.benchmark_group("tick");
    // Quick runs without CLI flags:
    //   BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p wodtimer_core --bench tick
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE")
        && let Ok(n) = ss.parse::<usize>()
    {
        g.sample_size(n.max(10));
    } else {
        g.sample_size(50);
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }

    for &subscribed in &[false, true] {
        g.bench_function(format!("countdown_1000_ticks_subscribed_{subscribed}"), |b| {
            b.iter_batched(
                || {
                    let mut e = engine(subscribed);
                    e.start();
                    e
                },
                |mut e| {
                    for _ in 0..1_000 {
                        black_box(e.tick(black_box(100)));
                    }
                    black_box(e.snapshot());
                },
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

criterion_group!(tick, bench_tick);
criterion_main!(tick);
