//! Wall-clock [`Timers`] on a calloop event loop.
//!
//! Every scheduled timeout becomes a one-shot calloop [`Timer`] source. When
//! it fires, the source pushes an [`Event::TimerFired`] into the loop's
//! shared data and is dropped; [`LoopDriver::dispatch`] hands those events
//! back in deadline order.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, LoopHandle, RegistrationToken};

use crate::error::Result;
use crate::host::{Event, Host, RenderTarget, TimerId, Timeout, Timers};

type Fired = Vec<Event>;

pub struct LoopTimers {
    handle: LoopHandle<'static, Fired>,
    started: Instant,
    next_id: u64,
    frame_interval: Duration,
    pending: HashMap<TimerId, (Duration, RegistrationToken)>,
}

impl LoopTimers {
    fn new(handle: LoopHandle<'static, Fired>, frame_interval: Duration) -> Self {
        Self {
            handle,
            started: Instant::now(),
            next_id: 0,
            frame_interval,
            pending: HashMap::new(),
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn deadline(&self, id: TimerId) -> Duration {
        self.pending
            .get(&id)
            .map(|&(deadline, _)| deadline)
            .unwrap_or(Duration::MAX)
    }
}

impl Timers for LoopTimers {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn schedule(&mut self, delay: Duration, timeout: Timeout) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now().saturating_add(delay);

        let source = Timer::from_duration(delay);
        let inserted = self
            .handle
            .insert_source(source, move |_, _, fired: &mut Fired| {
                fired.push(Event::TimerFired { id, timeout });
                TimeoutAction::Drop
            });
        match inserted {
            Ok(token) => {
                self.pending.insert(id, (deadline, token));
            }
            Err(err) => log::error!("failed to arm timer {:?}: {}", id, err.error),
        }
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.pending.remove(&id) {
            Some((_, token)) => {
                self.handle.remove(token);
                true
            }
            None => false,
        }
    }

    fn frame_interval(&self) -> Duration {
        self.frame_interval
    }
}

/// Owns the event loop and its timers.
pub struct LoopDriver {
    event_loop: EventLoop<'static, Fired>,
    timers: LoopTimers,
}

impl LoopDriver {
    pub fn new(frame_interval: Duration) -> Result<Self> {
        let event_loop: EventLoop<'static, Fired> = EventLoop::try_new()?;
        let timers = LoopTimers::new(event_loop.handle(), frame_interval);
        Ok(Self { event_loop, timers })
    }

    pub fn timers(&mut self) -> &mut LoopTimers {
        &mut self.timers
    }

    /// Wait up to `timeout` (forever if `None`) and return the timers that
    /// fired, earliest deadline first.
    pub fn dispatch(&mut self, timeout: Option<Duration>) -> Result<Vec<Event>> {
        let mut fired = Fired::new();
        self.event_loop.dispatch(timeout, &mut fired)?;
        fired.sort_by_key(|event| match event {
            Event::TimerFired { id, .. } => (self.timers.deadline(*id), *id),
            _ => (Duration::MAX, TimerId(u64::MAX)),
        });
        for event in &fired {
            if let Event::TimerFired { id, .. } = event {
                self.timers.pending.remove(id);
            }
        }
        Ok(fired)
    }

    /// Dispatch until no timer is pending or `limit` has elapsed, handing
    /// every fired timer to `handle`.
    pub fn run<F>(
        &mut self,
        render: &mut dyn RenderTarget,
        limit: Duration,
        mut handle: F,
    ) -> Result<()>
    where
        F: FnMut(Event, &mut Host<'_>),
    {
        let until = self.timers.now() + limit;
        while self.timers.pending() > 0 {
            let now = self.timers.now();
            if now >= until {
                log::debug!(
                    "run limit reached with {} timers pending",
                    self.timers.pending()
                );
                break;
            }
            for event in self.dispatch(Some(until - now))? {
                let mut host = Host::new(&mut *render, &mut self.timers);
                handle(event, &mut host);
            }
        }
        Ok(())
    }
}
