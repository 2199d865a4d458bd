//! Update Scheduler - throttled batching of instance re-renders.
//!
//! Holds the FIFO of instances waiting for a flush and a small virtual timer
//! list. Nothing here sleeps: time moves only when the owner calls
//! [`Scheduler::pop_due`] with a later instant, which keeps every flush
//! deterministic under test.
//!
//! ```text
//! push_update ──► queue ──(flush timer, now + interval)──► flush batch
//!                   ▲                                          │
//!                   └──── requeue timer (zero delay) ◄── dynamic instances
//! ```
//!
//! The runtime owns the other half: marking instances dirty and running the
//! reconciler for each batch entry (see [`Runtime::advance_to`](crate::Runtime::advance_to)).

use std::collections::VecDeque;
use std::time::Duration;

use crate::types::InstanceId;

// =============================================================================
// Timers
// =============================================================================

/// Work a timer performs when it fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Task {
    /// Drain the queue as one batch.
    Flush,
    /// Put dynamic instances back on the queue.
    Requeue(Vec<InstanceId>),
}

#[derive(Debug)]
struct Timer {
    due: Duration,
    seq: u64,
    task: Task,
}

// =============================================================================
// Scheduler
// =============================================================================

#[derive(Debug)]
pub struct Scheduler {
    interval: Duration,
    now: Duration,
    queue: VecDeque<InstanceId>,
    timers: Vec<Timer>,
    next_seq: u64,
    flush_pending: bool,
    flushes: u64,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            now: Duration::ZERO,
            queue: VecDeque::new(),
            timers: Vec::new(),
            next_seq: 0,
            flush_pending: false,
            flushes: 0,
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Append an instance and arm a flush unless one is already pending.
    pub fn enqueue(&mut self, id: InstanceId) {
        self.queue.push_back(id);
        if !self.flush_pending {
            self.flush_pending = true;
            self.arm(self.now + self.interval, Task::Flush);
        }
    }

    /// Re-enqueue `ids` on the next turn (zero-delay timer).
    pub fn defer(&mut self, ids: Vec<InstanceId>) {
        if !ids.is_empty() {
            self.arm(self.now, Task::Requeue(ids));
        }
    }

    fn arm(&mut self, due: Duration, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        // Sorted by (due, seq); equal deadlines fire in arming order.
        let at = self
            .timers
            .partition_point(|t| (t.due, t.seq) <= (due, seq));
        self.timers.insert(at, Timer { due, seq, task });
    }

    /// Pop the earliest timer due at or before `until`, moving time to it.
    pub fn pop_due(&mut self, until: Duration) -> Option<Task> {
        let first = self.timers.first()?;
        if first.due > until {
            return None;
        }
        let timer = self.timers.remove(0);
        self.now = self.now.max(timer.due);
        Some(timer.task)
    }

    /// Move time forward to `t` once every due timer has fired.
    pub fn settle(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }

    /// Take the whole queue as one flush batch.
    ///
    /// Instances enqueued while the batch runs land in a fresh queue and arm
    /// the next flush, so a flush never nests.
    pub fn take_batch(&mut self) -> Vec<InstanceId> {
        self.flush_pending = false;
        self.flushes += 1;
        self.queue.drain(..).collect()
    }

    /// Instances waiting for the next flush (duplicates included).
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_flush_pending(&self) -> bool {
        self.flush_pending
    }

    /// Number of flush batches taken so far.
    pub fn flush_count(&self) -> u64 {
        self.flushes
    }

    /// Deadline of the next timer, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.first().map(|t| t.due)
    }
}

// =============================================================================
// Tests
// =============================================================================
