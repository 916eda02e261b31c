use std::collections::BTreeMap;
use std::time::Duration;

use crate::host::{Event, Host, RenderTarget, TimerId, Timeout, Timers};

/// Virtual clock for tests and offline runs.
///
/// Nothing fires on its own: the caller advances time and dispatches each
/// fired timer before the next one is looked at, so timers armed while
/// handling an event are honoured within the same advance. Timers due at the
/// same instant fire in the order they were scheduled.
#[derive(Debug)]
pub struct ManualTimers {
    now: Duration,
    frame_interval: Duration,
    next_id: u64,
    /// Keyed by (deadline, id); ids grow monotonically so ties keep
    /// scheduling order.
    queue: BTreeMap<(Duration, TimerId), Timeout>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::with_frame_interval(Duration::from_millis(16))
    }

    pub fn with_frame_interval(frame_interval: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            frame_interval,
            next_id: 0,
            queue: BTreeMap::new(),
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.queue.keys().any(|(_, pending)| *pending == id)
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Move the clock forward without firing anything. Never moves backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline.
    pub fn fire_next(&mut self, until: Duration) -> Option<Event> {
        let (&(deadline, id), _) = self.queue.iter().next()?;
        if deadline > until {
            return None;
        }
        let timeout = self.queue.remove(&(deadline, id))?;
        self.set_now(deadline);
        Some(Event::TimerFired { id, timeout })
    }

    /// Advance by `by`, handing every timer that comes due to `handle`
    /// together with the host it should act on.
    pub fn advance<F>(&mut self, by: Duration, render: &mut dyn RenderTarget, mut handle: F)
    where
        F: FnMut(Event, &mut Host<'_>),
    {
        let until = self.now + by;
        while let Some(event) = self.fire_next(until) {
            let mut host = Host::new(&mut *render, self);
            handle(event, &mut host);
        }
        self.set_now(until);
    }
}

impl Default for ManualTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl Timers for ManualTimers {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, delay: Duration, timeout: Timeout) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.insert((self.now.saturating_add(delay), id), timeout);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.queue.keys().find(|(_, pending)| *pending == id).copied();
        match key {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    fn frame_interval(&self) -> Duration {
        self.frame_interval
    }
}
