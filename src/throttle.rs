//! Rate limiting for scroll and resize input.
//!
//! [`Throttle`] has standard throttle (not debounce) semantics:
//!
//! - The first sample after a quiet period is delivered immediately and
//!   opens a window of `interval`.
//! - Samples arriving while the window is open are coalesced: only the most
//!   recent one is kept, the rest are discarded.
//! - When the window closes, the kept sample (if any) is delivered and a new
//!   window opens from that moment. With nothing kept, the throttle goes idle.
//!
//! Under sustained input the consumer therefore runs exactly once per
//! interval, always with the freshest sample, and the last sample of a burst
//! is never lost.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::host::{RenderTarget, TimerId, Timeout, Timers};

/// Which viewport input stream a sample belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleChannel {
    Scroll,
    Resize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleValue {
    /// Vertical scroll offset in px
    Scroll(f32),
    /// Viewport size in px
    Resize { width: f32, height: f32 },
}

/// A timestamped viewport reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportSample {
    pub at: Duration,
    pub value: SampleValue,
}

impl ViewportSample {
    pub fn scroll(at: Duration, offset: f32) -> Self {
        Self {
            at,
            value: SampleValue::Scroll(offset),
        }
    }

    pub fn resize(at: Duration, width: f32, height: f32) -> Self {
        Self {
            at,
            value: SampleValue::Resize { width, height },
        }
    }

    pub fn channel(&self) -> SampleChannel {
        match self.value {
            SampleValue::Scroll(_) => SampleChannel::Scroll,
            SampleValue::Resize { .. } => SampleChannel::Resize,
        }
    }

    pub fn scroll_offset(&self) -> Option<f32> {
        match self.value {
            SampleValue::Scroll(offset) => Some(offset),
            SampleValue::Resize { .. } => None,
        }
    }

    pub fn viewport(&self) -> Option<(f32, f32)> {
        match self.value {
            SampleValue::Resize { width, height } => Some((width, height)),
            SampleValue::Scroll(_) => None,
        }
    }
}

/// Receives throttled samples for one channel.
pub trait ViewportConsumer {
    fn on_sample(&mut self, sample: &ViewportSample, render: &mut dyn RenderTarget);
}

impl<F> ViewportConsumer for F
where
    F: FnMut(&ViewportSample, &mut dyn RenderTarget),
{
    fn on_sample(&mut self, sample: &ViewportSample, render: &mut dyn RenderTarget) {
        self(sample, render)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Window {
    Idle,
    Open(TimerId),
}

#[derive(Debug)]
pub struct Throttle<T> {
    channel: SampleChannel,
    interval: Duration,
    window: Window,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(channel: SampleChannel, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::config(format!(
                "{:?} throttle interval must be non-zero",
                channel
            )));
        }
        Ok(Self {
            channel,
            interval,
            window: Window::Idle,
            pending: None,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_idle(&self) -> bool {
        self.window == Window::Idle
    }

    /// Offer a raw sample. Returns it back when it should be delivered now.
    pub fn push(&mut self, sample: T, timers: &mut dyn Timers) -> Option<T> {
        match self.window {
            Window::Idle => {
                self.open_window(timers);
                Some(sample)
            }
            Window::Open(_) => {
                self.pending = Some(sample);
                None
            }
        }
    }

    /// The window timer fired. Returns the coalesced sample to deliver, if any.
    pub fn on_timer(&mut self, id: TimerId, timers: &mut dyn Timers) -> Option<T> {
        if self.window != Window::Open(id) {
            return None;
        }
        match self.pending.take() {
            Some(sample) => {
                self.open_window(timers);
                Some(sample)
            }
            None => {
                self.window = Window::Idle;
                None
            }
        }
    }

    fn open_window(&mut self, timers: &mut dyn Timers) {
        let id = timers.schedule(self.interval, Timeout::Throttle(self.channel));
        self.window = Window::Open(id);
    }
}
