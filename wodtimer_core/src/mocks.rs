//! Test and helper mocks for wodtimer_core

use std::cell::RefCell;
use std::rc::Rc;

use wodtimer_traits::{Haptics, ScreenWake, SoundCue};

use crate::events::TimerEvent;

type CollabResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// A collaborator that accepts every request and does nothing. Stands in for
/// whichever device surface a host does not provide.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCollaborator;

impl SoundCue for NoopCollaborator {
    fn countdown_beep(&mut self, _seconds_remaining: u32) -> CollabResult {
        Ok(())
    }
    fn completion_chime(&mut self) -> CollabResult {
        Ok(())
    }
}

impl Haptics for NoopCollaborator {
    fn pulse_countdown(&mut self, _seconds_remaining: u32) -> CollabResult {
        Ok(())
    }
    fn pulse_complete(&mut self) -> CollabResult {
        Ok(())
    }
}

impl ScreenWake for NoopCollaborator {
    fn acquire(&mut self) -> CollabResult {
        Ok(())
    }
    fn release(&mut self) -> CollabResult {
        Ok(())
    }
}

/// Records every published event. Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Rc<RefCell<Vec<TimerEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A subscriber closure that appends into this log.
    pub fn recorder(&self) -> impl FnMut(&TimerEvent) + 'static {
        let events = self.events.clone();
        move |e| events.borrow_mut().push(*e)
    }

    pub fn events(&self) -> Vec<TimerEvent> {
        self.events.borrow().clone()
    }

    /// Events other than snapshots, in order.
    pub fn milestones(&self) -> Vec<TimerEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| !matches!(e, TimerEvent::Snapshot(_)))
            .copied()
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events.borrow().iter().filter(|e| e.name() == name).count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
