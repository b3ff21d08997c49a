//! Events published by the engine and the per-engine subscription list.

use crate::state::TimerSnapshot;

/// Every accepted intent and every tick produces at least a `Snapshot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Snapshot(TimerSnapshot),
    /// Countdown entered one of the final whole seconds.
    CountdownTick { seconds_remaining: u32 },
    /// Countdown reached zero. Fires once per countdown window.
    Complete,
    /// The running flag flipped. Keep-screen-on collaborators key off this.
    RunStateChanged { running: bool },
    /// Voice-count overlay advanced to `number`.
    VoiceCount { number: u32 },
}

impl TimerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::Snapshot(_) => "snapshot",
            TimerEvent::CountdownTick { .. } => "countdown_tick",
            TimerEvent::Complete => "complete",
            TimerEvent::RunStateChanged { .. } => "run_state_changed",
            TimerEvent::VoiceCount { .. } => "voice_count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type Subscriber = Box<dyn FnMut(&TimerEvent)>;

/// Subscribers owned by one engine instance. No process-wide registry.
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Subscriber)>,
}

impl core::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl Subscribers {
    pub fn add(&mut self, f: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, f));
        id
    }

    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(sid, _)| *sid != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deliver in subscription order.
    pub fn publish(&mut self, event: &TimerEvent) {
        for (_, f) in &mut self.entries {
            f(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn remove_stops_delivery() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut subs = Subscribers::default();
        let a = {
            let seen = seen.clone();
            subs.add(Box::new(move |e| seen.borrow_mut().push(("a", e.name()))))
        };
        {
            let seen = seen.clone();
            subs.add(Box::new(move |e| seen.borrow_mut().push(("b", e.name()))));
        }
        subs.publish(&TimerEvent::Complete);
        assert!(subs.remove(a));
        assert!(!subs.remove(a));
        subs.publish(&TimerEvent::Complete);
        assert_eq!(
            *seen.borrow(),
            vec![("a", "complete"), ("b", "complete"), ("b", "complete")]
        );
        assert_eq!(subs.len(), 1);
    }
}
