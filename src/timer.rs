//! Single-shot timers owned by a session and drained by the event loop.
//!
//! Nothing runs in the background: the loop asks for `next_deadline()`,
//! sleeps on input until then, and calls `fire_due()`. Each timer fires at
//! most once and can be cancelled at any point before that.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<E> {
    id: TimerId,
    deadline: Instant,
    event: E,
}

#[derive(Debug)]
pub struct Timers<E> {
    next_id: u64,
    entries: Vec<Entry<E>>,
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<E> Timers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            deadline: now + delay,
            event,
        });
        id
    }

    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Remove and return every event whose deadline has passed, earliest
    /// first; equal deadlines keep scheduling order.
    pub fn fire_due(&mut self, now: Instant) -> Vec<E> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.deadline <= now);
        self.entries = pending;
        due.sort_by_key(|e| (e.deadline, e.id));
        due.into_iter().map(|e| e.event).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_fires_once_in_deadline_order() {
        let t0 = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(t0, 20 * MS, "late");
        timers.schedule(t0, 10 * MS, "early");
        timers.schedule(t0, 10 * MS, "early-2");

        assert!(timers.fire_due(t0 + 5 * MS).is_empty());
        assert_eq!(timers.next_deadline(), Some(t0 + 10 * MS));

        assert_eq!(timers.fire_due(t0 + 15 * MS), vec!["early", "early-2"]);
        assert_eq!(timers.fire_due(t0 + 15 * MS), Vec::<&str>::new());
        assert_eq!(timers.fire_due(t0 + 30 * MS), vec!["late"]);
        assert_eq!(timers.pending(), 0);
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut timers = Timers::new();
        let a = timers.schedule(t0, 10 * MS, 1);
        let b = timers.schedule(t0, 10 * MS, 2);

        assert!(timers.cancel(a));
        assert!(!timers.cancel(a));
        assert!(timers.is_pending(b));
        assert_eq!(timers.fire_due(t0 + 10 * MS), vec![2]);
        assert!(!timers.cancel(b));
    }

    #[test]
    fn test_cancel_all() {
        let t0 = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(t0, MS, ());
        timers.schedule(t0, 2 * MS, ());
        assert_eq!(timers.cancel_all(), 2);
        assert!(timers.fire_due(t0 + 10 * MS).is_empty());
    }
}
