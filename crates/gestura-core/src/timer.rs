//! Cooperative timers on a virtual millisecond clock.
//!
//! Nothing here runs on its own: the owner advances the clock and receives the
//! timers that came due, in due order. Handles are never reused, so a handle
//! kept by a recognizer doubles as a freshness token.

/// Handle returned when a timer is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// What a timer is for, used to route it back to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Long-press hold delay
    LongPress,
    /// Window in which a second tap completes a double-tap
    DoubleTapWindow,
    /// Held tap release awaiting suppression checks
    TapRelease,
}

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expired {
    /// Handle given out at schedule time
    pub handle: TimerHandle,
    /// Timer purpose
    pub kind: TimerKind,
    /// Virtual time the timer was due
    pub due: f64,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    handle: TimerHandle,
    kind: TimerKind,
    due: f64,
}

/// Queue of pending one-shot timers.
#[derive(Debug, Default)]
pub struct TimerQueue {
    /// Current virtual time in milliseconds
    now: f64,
    next_id: u64,
    pending: Vec<Scheduled>,
}

impl TimerQueue {
    /// Create an empty queue at time 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> f64 {
        self.now
    }

    /// Schedule a timer `delay_ms` after the current time.
    pub fn schedule(&mut self, kind: TimerKind, delay_ms: u64) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.push(Scheduled {
            handle,
            kind,
            due: self.now + delay_ms as f64,
        });
        handle
    }

    /// Cancel a timer. Returns whether it was still pending.
    ///
    /// Cancelling an expired or already-cancelled timer does nothing.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.handle != handle);
        self.pending.len() != before
    }

    /// Whether a timer is still pending.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|s| s.handle == handle)
    }

    /// Due time of the earliest pending timer.
    #[must_use]
    pub fn next_due(&self) -> Option<f64> {
        self.earliest().map(|i| self.pending[i].due)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pop the earliest timer due at or before `until`.
    ///
    /// The clock moves to the popped timer's due time so that timers scheduled
    /// while handling it are relative to when it fired.
    pub fn pop_due(&mut self, until: f64) -> Option<Expired> {
        let index = self.earliest()?;
        if self.pending[index].due > until {
            return None;
        }
        let scheduled = self.pending.remove(index);
        if scheduled.due > self.now {
            self.now = scheduled.due;
        }
        Some(Expired {
            handle: scheduled.handle,
            kind: scheduled.kind,
            due: scheduled.due,
        })
    }

    /// Move the clock forward. The clock never runs backwards.
    pub fn set_now(&mut self, now: f64) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Pop every timer due at or before `now` and move the clock to `now`.
    pub fn advance_to(&mut self, now: f64) -> Vec<Expired> {
        let mut expired = Vec::new();
        while let Some(timer) = self.pop_due(now) {
            expired.push(timer);
        }
        self.set_now(now);
        expired
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Index of the earliest pending timer; ties go to the first scheduled.
    fn earliest(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.handle.cmp(&b.handle)))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_queue_new() {
        let queue = TimerQueue::new();
        assert_eq!(queue.now(), 0.0);
        assert!(queue.is_empty());
        assert_eq!(queue.next_due(), None);
    }

    #[test]
    fn test_schedule_relative_to_now() {
        let mut queue = TimerQueue::new();
        queue.set_now(100.0);
        queue.schedule(TimerKind::LongPress, 600);
        assert_eq!(queue.next_due(), Some(700.0));
    }

    #[test]
    fn test_advance_fires_in_due_order() {
        let mut queue = TimerQueue::new();
        let late = queue.schedule(TimerKind::LongPress, 600);
        let early = queue.schedule(TimerKind::TapRelease, 250);

        assert!(queue.advance_to(249.0).is_empty());

        let fired = queue.advance_to(1000.0);
        let handles: Vec<_> = fired.iter().map(|e| e.handle).collect();
        assert_eq!(handles, vec![early, late]);
        assert_eq!(fired[0].kind, TimerKind::TapRelease);
        assert_eq!(queue.now(), 1000.0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut queue = TimerQueue::new();
        let first = queue.schedule(TimerKind::DoubleTapWindow, 250);
        let second = queue.schedule(TimerKind::TapRelease, 250);

        let fired = queue.advance_to(250.0);
        assert_eq!(fired[0].handle, first);
        assert_eq!(fired[1].handle, second);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule(TimerKind::LongPress, 10);

        assert!(queue.cancel(handle));
        assert!(!queue.cancel(handle));
        assert!(!queue.is_pending(handle));
        assert!(queue.advance_to(100.0).is_empty());
    }

    #[test]
    fn test_pop_due_moves_clock_to_due_time() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerKind::TapRelease, 250);

        let expired = queue.pop_due(1000.0).expect("timer due");
        assert_eq!(expired.due, 250.0);
        assert_eq!(queue.now(), 250.0);

        // Scheduled while handling the expiry: relative to the fire time.
        queue.schedule(TimerKind::DoubleTapWindow, 100);
        assert_eq!(queue.next_due(), Some(350.0));
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut queue = TimerQueue::new();
        queue.set_now(500.0);
        queue.set_now(100.0);
        assert_eq!(queue.now(), 500.0);
    }

    #[test]
    fn test_handles_are_unique() {
        let mut queue = TimerQueue::new();
        let a = queue.schedule(TimerKind::LongPress, 1);
        queue.advance_to(10.0);
        let b = queue.schedule(TimerKind::LongPress, 1);
        assert_ne!(a, b);
    }
}
