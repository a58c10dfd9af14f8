//! Deferred tasks on a logical clock.
//!
//! The session delays two things: evaluating a revealed pair (so the player
//! sees both faces) and turning a missed pair back over (so the miss flash is
//! visible). Both are queued here with the session generation current at the
//! time. The clock only moves when the host calls `advance`, which keeps
//! sessions deterministic and testable without real timers.
//!
//! ## Staleness
//!
//! Each task remembers the generation it was scheduled under. The session
//! bumps its generation when a round starts, when it ends and when focus mode
//! is left, and refuses to apply a task whose generation no longer matches.

use serde::{Deserialize, Serialize};

/// What a deferred task does when it comes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    /// Evaluate the two face-up cards.
    Evaluate,
    /// Turn these two cards face-down again after a miss.
    Revert([usize; 2]),
}

/// A queued task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredTask {
    /// Clock time at which the task runs.
    pub due_at_ms: u64,

    /// Session generation the task belongs to.
    pub generation: u64,

    /// Work to do.
    pub kind: TaskKind,

    /// Scheduling order, breaks ties between equal due times.
    seq: u64,
}

/// Queue of deferred tasks plus the logical clock.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    pending: Vec<DeferredTask>,
    next_seq: u64,
}

impl Scheduler {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue a task to run `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, generation: u64, kind: TaskKind) {
        let task = DeferredTask {
            due_at_ms: self.now_ms.saturating_add(delay_ms),
            generation,
            kind,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.push(task);
    }

    /// Due time of the earliest queued task.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.earliest().map(|i| self.pending[i].due_at_ms)
    }

    /// Remove and return the earliest task due at or before `until_ms`.
    ///
    /// The clock moves forward to the task's due time, so anything the task
    /// schedules is timed from the moment it ran.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<DeferredTask> {
        let index = self.earliest()?;
        if self.pending[index].due_at_ms > until_ms {
            return None;
        }
        let task = self.pending.remove(index);
        self.now_ms = self.now_ms.max(task.due_at_ms);
        Some(task)
    }

    /// Move the clock forward. Never moves it backward.
    pub fn advance_to(&mut self, time_ms: u64) {
        self.now_ms = self.now_ms.max(time_ms);
    }

    /// Drop queued tasks matching a predicate. Returns how many were dropped.
    pub fn cancel(&mut self, mut predicate: impl FnMut(&DeferredTask) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|task| !predicate(task));
        before - self.pending.len()
    }

    /// Drop every task not belonging to `generation`.
    pub fn cancel_stale(&mut self, generation: u64) -> usize {
        self.cancel(|task| task.generation != generation)
    }

    /// Iterate over queued tasks in scheduling order.
    pub fn iter(&self) -> impl Iterator<Item = &DeferredTask> {
        self.pending.iter()
    }

    fn earliest(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by_key(|(_, task)| (task.due_at_ms, task.seq))
            .map(|(i, _)| i)
    }
}
