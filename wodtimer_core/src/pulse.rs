//! Background tick delivery.
//!
//! Spawns a thread that emits a unit pulse every nominal period through a
//! bounded channel. Pulses carry no time: the consumer measures real elapsed
//! time from its own clock, so a slow consumer that misses or coalesces
//! pulses loses nothing.
//!
//! Each `Pulse` owns exactly one thread, which is shut down and joined when
//! the `Pulse` is dropped.
use crossbeam_channel as xch;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use wodtimer_traits::clock::Clock;

use crate::error::{Result, TimerError};

pub struct Pulse {
    rx: xch::Receiver<()>,
    delivered: Arc<AtomicU64>,
    /// Shutdown flag for immediate response (atomic for lock-free check)
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Pulse {
    pub fn spawn<C: Clock + Send + 'static>(hz: u32, clock: C) -> Result<Self> {
        let (tx, rx) = xch::bounded(1);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let delivered = Arc::new(AtomicU64::new(0));
        let delivered_clone = delivered.clone();
        let period = Duration::from_millis(crate::util::period_ms(hz));

        let join_handle = std::thread::Builder::new()
            .name("wodtimer-pulse".into())
            .spawn(move || {
                loop {
                    if shutdown_clone.load(Ordering::Relaxed) {
                        tracing::debug!("pulse thread received shutdown signal");
                        break;
                    }
                    clock.sleep(period);
                    if shutdown_clone.load(Ordering::Relaxed) {
                        break;
                    }
                    match tx.try_send(()) {
                        Ok(()) => {
                            delivered_clone.fetch_add(1, Ordering::Relaxed);
                        }
                        // Consumer hasn't taken the previous pulse yet; coalesce.
                        Err(xch::TrySendError::Full(())) => {}
                        Err(xch::TrySendError::Disconnected(())) => {
                            tracing::debug!("pulse consumer disconnected, exiting thread");
                            break;
                        }
                    }
                }
                tracing::trace!("pulse thread exiting cleanly");
            })
            .map_err(|e| eyre::Report::new(TimerError::Scheduler(e.to_string())))?;

        Ok(Self {
            rx,
            delivered,
            shutdown,
            join_handle: Some(join_handle),
        })
    }

    /// Channel to wait on (e.g. inside `crossbeam_channel::select!`).
    pub fn receiver(&self) -> &xch::Receiver<()> {
        &self.rx
    }

    /// Block until the next pulse or `timeout`. Returns false on timeout.
    pub fn wait(&self, timeout: Duration) -> bool {
        self.rx.recv_timeout(timeout).is_ok()
    }

    /// Pulses actually handed to the channel (coalesced ones are not counted).
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }
}

impl Drop for Pulse {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // The thread notices the flag after at most one period of sleep.
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("pulse thread joined successfully");
                }
                Err(e) => {
                    tracing::warn!(?e, "pulse thread panicked during shutdown");
                }
            }
        }
    }
}
