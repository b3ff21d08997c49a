pub mod clock;

pub use clock::{Clock, MonotonicClock};

#[cfg(feature = "manual-clock")]
pub use clock::manual::ManualClock;

/// Audio cue collaborator. Decides on its own what to actually play.
pub trait SoundCue {
    /// Capability query; `false` means the device has no usable audio output.
    fn is_available(&self) -> bool {
        true
    }
    fn countdown_beep(
        &mut self,
        seconds_remaining: u32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn completion_chime(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Vibration collaborator.
pub trait Haptics {
    fn is_available(&self) -> bool {
        true
    }
    fn pulse_countdown(
        &mut self,
        seconds_remaining: u32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn pulse_complete(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Keep-screen-on collaborator. The engine never learns whether the lock held.
pub trait ScreenWake {
    fn is_available(&self) -> bool {
        true
    }
    fn acquire(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn release(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
