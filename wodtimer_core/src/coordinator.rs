//! Forwards engine milestones to sound, vibration and screen-wake collaborators.
//!
//! The coordinator is an ordinary engine subscriber. It consults the user's
//! notification settings and each collaborator's capability query, and it
//! swallows every collaborator failure after logging it. Nothing flows back
//! into the engine's tick path.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wodtimer_traits::{Haptics, ScreenWake, SoundCue};

use crate::collab_error::map_collaborator_error;
use crate::config::NotifySettings;
use crate::error::TimerError;
use crate::events::TimerEvent;
use crate::mocks::NoopCollaborator;

/// Shared view of contained collaborator failures.
#[derive(Debug, Default, Clone)]
pub struct FailureLog {
    count: Rc<Cell<u64>>,
    last: Rc<RefCell<Option<TimerError>>>,
}

impl FailureLog {
    pub fn count(&self) -> u64 {
        self.count.get()
    }

    pub fn last(&self) -> Option<TimerError> {
        self.last.borrow().clone()
    }

    fn record(&self, err: TimerError) {
        self.count.set(self.count.get().saturating_add(1));
        *self.last.borrow_mut() = Some(err);
    }
}

pub struct NotificationCoordinator {
    sound: Box<dyn SoundCue>,
    haptics: Box<dyn Haptics>,
    wake: Box<dyn ScreenWake>,
    settings: NotifySettings,
    wake_held: bool,
    failures: FailureLog,
}

impl core::fmt::Debug for NotificationCoordinator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NotificationCoordinator")
            .field("settings", &self.settings)
            .field("wake_held", &self.wake_held)
            .field("failures", &self.failures.count())
            .finish()
    }
}

impl NotificationCoordinator {
    pub fn new(
        sound: Box<dyn SoundCue>,
        haptics: Box<dyn Haptics>,
        wake: Box<dyn ScreenWake>,
        settings: NotifySettings,
    ) -> Self {
        Self {
            sound,
            haptics,
            wake,
            settings,
            wake_held: false,
            failures: FailureLog::default(),
        }
    }

    /// Coordinator whose collaborators all do nothing.
    pub fn headless(settings: NotifySettings) -> Self {
        Self::new(
            Box::new(NoopCollaborator),
            Box::new(NoopCollaborator),
            Box::new(NoopCollaborator),
            settings,
        )
    }

    pub fn settings(&self) -> NotifySettings {
        self.settings
    }

    pub fn failure_log(&self) -> FailureLog {
        self.failures.clone()
    }

    /// Which collaborators report themselves usable, as `(name, available)`.
    pub fn availability(&self) -> [(&'static str, bool); 3] {
        [
            ("sound", self.sound.is_available()),
            ("haptics", self.haptics.is_available()),
            ("screen_wake", self.wake.is_available()),
        ]
    }

    pub fn handle(&mut self, event: &TimerEvent) {
        match *event {
            TimerEvent::CountdownTick { seconds_remaining } => {
                if self.settings.sound_enabled && self.sound.is_available() {
                    let r = self.sound.countdown_beep(seconds_remaining);
                    self.contain("sound", r);
                }
                if self.settings.vibration_enabled && self.haptics.is_available() {
                    let r = self.haptics.pulse_countdown(seconds_remaining);
                    self.contain("haptics", r);
                }
            }
            TimerEvent::Complete => {
                if self.settings.sound_enabled && self.sound.is_available() {
                    let r = self.sound.completion_chime();
                    self.contain("sound", r);
                }
                if self.settings.vibration_enabled && self.haptics.is_available() {
                    let r = self.haptics.pulse_complete();
                    self.contain("haptics", r);
                }
            }
            TimerEvent::RunStateChanged { running } => self.on_run_state_change(running),
            TimerEvent::Snapshot(_) | TimerEvent::VoiceCount { .. } => {}
        }
    }

    /// Turn into an engine subscription.
    pub fn into_subscriber(mut self) -> impl FnMut(&TimerEvent) + 'static {
        move |e| self.handle(e)
    }

    fn on_run_state_change(&mut self, running: bool) {
        if !self.settings.keep_screen_on || !self.wake.is_available() {
            return;
        }
        if running && !self.wake_held {
            let r = self.wake.acquire();
            // Held or not, the next release request still goes out.
            self.wake_held = true;
            self.contain("screen_wake", r);
        } else if !running && self.wake_held {
            let r = self.wake.release();
            self.wake_held = false;
            self.contain("screen_wake", r);
        }
    }

    fn contain(
        &self,
        collaborator: &'static str,
        result: Result<(), Box<dyn std::error::Error + Send + Sync>>,
    ) {
        if let Err(e) = result {
            let err = map_collaborator_error(collaborator, e.as_ref());
            tracing::warn!(collaborator, error = %err, "notification failed; timer unaffected");
            self.failures.record(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_absorbs_everything() {
        let mut c = NotificationCoordinator::headless(NotifySettings::default());
        c.handle(&TimerEvent::RunStateChanged { running: true });
        c.handle(&TimerEvent::CountdownTick {
            seconds_remaining: 3,
        });
        c.handle(&TimerEvent::Complete);
        c.handle(&TimerEvent::RunStateChanged { running: false });
        assert_eq!(c.failure_log().count(), 0);
        assert!(c.availability().iter().all(|(_, ok)| *ok));
    }
}
