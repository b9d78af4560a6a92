//! Deferred callbacks on the scene clock.
//!
//! The scene runs on a single thread, so a timer is just a deadline in scene
//! milliseconds plus a payload. Handles are never reused, which makes
//! cancelling a stale handle a harmless no-op.

use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Clone, Debug)]
struct PendingTimer<T> {
    deadline_ms: u64,
    payload: T,
}

#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    next_handle: u64,
    pending: BTreeMap<TimerHandle, PendingTimer<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_handle: 0,
            pending: BTreeMap::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline_ms: u64, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.pending.insert(
            handle,
            PendingTimer {
                deadline_ms,
                payload,
            },
        );
        handle
    }

    /// Returns the payload if the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        self.pending.remove(&handle).map(|timer| timer.payload)
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    #[cfg(test)]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    #[cfg(test)]
    pub fn deadline(&self, handle: TimerHandle) -> Option<u64> {
        self.pending.get(&handle).map(|timer| timer.deadline_ms)
    }

    /// Removes and returns every timer whose deadline is at or before
    /// `now_ms`, earliest first. Equal deadlines fire in scheduling order.
    pub fn pop_due(&mut self, now_ms: u64) -> Vec<(TimerHandle, T)> {
        let mut due: Vec<(u64, TimerHandle)> = self
            .pending
            .iter()
            .filter(|(_, timer)| timer.deadline_ms <= now_ms)
            .map(|(handle, timer)| (timer.deadline_ms, *handle))
            .collect();
        due.sort();
        due.into_iter()
            .filter_map(|(_, handle)| {
                self.pending
                    .remove(&handle)
                    .map(|timer| (handle, timer.payload))
            })
            .collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
