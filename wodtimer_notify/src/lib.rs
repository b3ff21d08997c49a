//! Terminal and simulated collaborators for milestone notifications.
//!
//! These are the device-facing ends of the notification contract: the timer
//! engine only emits typed milestones, and the types here decide what a
//! milestone sounds or feels like on a plain terminal.
pub mod error;
pub mod patterns;

use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;

use wodtimer_traits::{Haptics, ScreenWake, SoundCue};

use crate::error::NotifyError;

/// Sound cue that rings the terminal bell (BEL, 0x07).
pub struct TerminalBell<W: Write> {
    out: W,
    muted: bool,
}

impl TerminalBell<std::io::Stderr> {
    /// Bell on stderr so it never interleaves with JSON on stdout.
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out, muted: false }
    }

    /// A muted bell reports itself unavailable.
    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Access the underlying writer (used by tests).
    pub fn into_inner(self) -> W {
        self.out
    }

    fn ring(&mut self, count: usize) -> error::Result<()> {
        if self.muted {
            return Err(NotifyError::Unavailable("terminal bell"));
        }
        let bells = vec![0x07u8; count];
        self.out
            .write_all(&bells)
            .and_then(|()| self.out.flush())
            .map_err(|e| NotifyError::Audio(e.to_string()))
    }
}

impl<W: Write> SoundCue for TerminalBell<W> {
    fn is_available(&self) -> bool {
        !self.muted
    }

    fn countdown_beep(
        &mut self,
        seconds_remaining: u32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::trace!(seconds_remaining, "bell: countdown");
        self.ring(patterns::countdown_bells(seconds_remaining))?;
        Ok(())
    }

    fn completion_chime(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::trace!("bell: completion");
        self.ring(patterns::COMPLETION_BELLS)?;
        Ok(())
    }
}

/// Haptics for hosts without a vibration motor: logs the pattern it would play.
#[derive(Debug, Default)]
pub struct LogHaptics {
    available: bool,
    pulses: usize,
}

impl LogHaptics {
    /// A terminal has no motor, so this starts unavailable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend a motor exists (useful for dry runs and tests).
    pub fn simulated() -> Self {
        Self {
            available: true,
            pulses: 0,
        }
    }

    pub fn pulses(&self) -> usize {
        self.pulses
    }

    fn play(&mut self, pattern: &[u64]) -> error::Result<()> {
        if !self.available {
            return Err(NotifyError::Unavailable("vibration"));
        }
        self.pulses += 1;
        tracing::debug!(?pattern, "vibrate (simulated)");
        Ok(())
    }
}

impl Haptics for LogHaptics {
    fn is_available(&self) -> bool {
        self.available
    }

    fn pulse_countdown(
        &mut self,
        _seconds_remaining: u32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.play(patterns::COUNTDOWN_VIBRATION_MS)?;
        Ok(())
    }

    fn pulse_complete(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.play(patterns::COMPLETION_VIBRATION_MS)?;
        Ok(())
    }
}

/// Simulated keep-screen-on lock.
pub struct SimulatedWakeLock {
    held: Rc<Cell<bool>>,
}

impl SimulatedWakeLock {
    pub fn new() -> Self {
        SimulatedWakeLock {
            held: Rc::new(Cell::new(false)),
        }
    }

    /// Shared view of whether the lock is currently held.
    pub fn held_handle(&self) -> Rc<Cell<bool>> {
        self.held.clone()
    }
}

impl Default for SimulatedWakeLock {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenWake for SimulatedWakeLock {
    fn acquire(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.held.get() {
            return Ok(());
        }
        self.held.set(true);
        tracing::debug!("wake lock acquired (simulated)");
        Ok(())
    }

    fn release(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.held.get() {
            return Ok(());
        }
        self.held.set(false);
        tracing::debug!("wake lock released (simulated)");
        Ok(())
    }
}
