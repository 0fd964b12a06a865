//! Timeline: a single-threaded scheduler of delayed actions.
//!
//! Nothing here reads a real clock. Callers pass the current time in
//! milliseconds (a test counter, or `performance.now()` in the browser) and
//! take whatever has come due. Entries with the same due time come out in
//! the order they were scheduled.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry<A> {
    due: u64,
    seq: u64,
    action: A,
}

impl<A> PartialEq for Entry<A> {
    fn eq(&self, other: &Self) -> bool {
        (self.due, self.seq) == (other.due, other.seq)
    }
}

impl<A> Eq for Entry<A> {}

impl<A> PartialOrd for Entry<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Entry<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

#[derive(Debug)]
pub struct Timeline<A> {
    now: u64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Entry<A>>>,
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Timeline<A> {
    pub fn new() -> Self {
        Timeline {
            now: 0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current time: the latest of the last fired entry and the last
    /// `advance_to`.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule `action` to fire `delay_ms` after the current time.
    pub fn schedule(&mut self, delay_ms: u64, action: A) {
        let entry = Entry {
            due: self.now.saturating_add(delay_ms),
            seq: self.next_seq,
            action,
        };
        self.next_seq += 1;
        self.queue.push(Reverse(entry));
    }

    /// Pop the next entry due at or before `until`, moving `now` to its due
    /// time.
    pub fn pop_due(&mut self, until: u64) -> Option<(u64, A)> {
        let due = self.queue.peek()?.0.due;
        if due > until {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        self.now = self.now.max(entry.due);
        Some((entry.due, entry.action))
    }

    /// Move the clock forward without firing anything. Never moves backwards.
    pub fn advance_to(&mut self, until: u64) {
        self.now = self.now.max(until);
    }

    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|e| e.0.due)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
