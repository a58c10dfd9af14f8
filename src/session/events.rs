//! Session events and listeners.
//!
//! The session never draws anything. It announces state changes to any
//! registered `SessionListener`, and renderers or sound players react. Every
//! notification is also a `SessionEvent` value so listeners can log or
//! forward them wholesale.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::cards::PairId;
use crate::rules::Round;

/// Something that happened in a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Score moved by `delta`, landing on `score`.
    ScoreChanged { delta: i64, score: i64 },

    /// Both faces of an entry were matched.
    Matched(PairId),

    /// Every pair in the round is matched.
    RoundComplete { round: Round },

    /// Focus mode began.
    RestrictionStarted,

    /// Focus mode ended.
    RestrictionEnded,
}

/// Receives session notifications.
///
/// Override the callbacks you care about; the rest are no-ops. Listeners that
/// want the raw event can override `on_event` instead.
pub trait SessionListener {
    fn on_score_change(&mut self, _delta: i64) {}

    fn on_match(&mut self, _pair: PairId) {}

    fn on_round_complete(&mut self) {}

    fn on_restriction_start(&mut self) {}

    fn on_restriction_end(&mut self) {}

    /// Dispatch an event to the matching callback.
    fn on_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::ScoreChanged { delta, .. } => self.on_score_change(*delta),
            SessionEvent::Matched(pair) => self.on_match(*pair),
            SessionEvent::RoundComplete { .. } => self.on_round_complete(),
            SessionEvent::RestrictionStarted => self.on_restriction_start(),
            SessionEvent::RestrictionEnded => self.on_restriction_end(),
        }
    }
}

/// Listener that records every event.
///
/// Clones share one log, so keep a clone to inspect what a session emitted
/// after handing the other to it.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<SessionEvent>>>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.borrow().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<SessionEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Check if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl SessionListener for EventLog {
    fn on_event(&mut self, event: &SessionEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
