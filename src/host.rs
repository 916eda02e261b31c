//! Capabilities the host environment hands to the reveal core.
//!
//! ## Capabilities
//!
//! - [`RenderTarget`]: toggles visual classes and inline styles on elements,
//!   spawns and removes transient nodes, scrolls the page.
//! - [`Timers`]: one-shot timers and "next frame" callbacks. Fired timers come
//!   back to the core as [`Event::TimerFired`].
//! - [`MediaHandle`]: a playable audio/video element.
//!
//! Viewport intersection is the fourth capability; the host computes ratios
//! itself and feeds them in as [`IntersectionEntry`] batches.
//!
//! Everything is single-threaded: a host dispatches one event at a time and
//! the core never blocks.

use std::time::Duration;

use thiserror::Error;

use crate::element::{ElementId, ElementKind, Insert, VisualClass};
use crate::page::PageTimer;
use crate::style::{Keyframes, Style};
use crate::throttle::{SampleChannel, ViewportSample};

pub trait RenderTarget {
    /// Whether the element is still part of the document.
    fn contains(&self, element: ElementId) -> bool;

    fn has_class(&self, element: ElementId, class: VisualClass) -> bool;

    fn add_class(&mut self, element: ElementId, class: VisualClass);

    fn remove_class(&mut self, element: ElementId, class: VisualClass);

    /// Flip `class` and return whether it is now present.
    fn toggle_class(&mut self, element: ElementId, class: VisualClass) -> bool {
        if self.has_class(element, class) {
            self.remove_class(element, class);
            false
        } else {
            self.add_class(element, class);
            true
        }
    }

    /// Merge `style` into the element's inline style.
    fn set_style(&mut self, element: ElementId, style: &Style);

    /// Run a self-contained two-keyframe animation.
    fn animate(&mut self, element: ElementId, keyframes: &Keyframes);

    fn set_text(&mut self, element: ElementId, text: &str);

    /// Value of a range input (seek bar, volume slider).
    fn set_value(&mut self, element: ElementId, value: f32);

    /// Returns `None` when `parent` is gone.
    fn create_element(
        &mut self,
        parent: ElementId,
        kind: ElementKind,
        insert: Insert,
    ) -> Option<ElementId>;

    fn remove_element(&mut self, element: ElementId);

    fn scroll_to(&mut self, offset: f32, smooth: bool);

    fn set_scroll_locked(&mut self, locked: bool);
}

/// Handle of a pending timer, unique for the lifetime of a [`Timers`] instance.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// What a timer was armed for. Routed back to its owner when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timeout {
    Reveal(ElementId),
    Throttle(SampleChannel),
    Page(PageTimer),
}

pub trait Timers {
    /// Time since the session started.
    fn now(&self) -> Duration;

    fn schedule(&mut self, delay: Duration, timeout: Timeout) -> TimerId;

    /// Returns whether a pending timer was actually removed.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Interval between two painted frames.
    fn frame_interval(&self) -> Duration {
        Duration::from_millis(16)
    }

    /// Fire once the host has painted at least one more frame.
    fn next_frame(&mut self, timeout: Timeout) -> TimerId {
        let delay = self.frame_interval();
        self.schedule(delay, timeout)
    }
}

/// Mutable access to the host capabilities for the duration of one dispatch.
pub struct Host<'a> {
    pub render: &'a mut dyn RenderTarget,
    pub timers: &'a mut dyn Timers,
}

impl<'a> Host<'a> {
    pub fn new(render: &'a mut dyn RenderTarget, timers: &'a mut dyn Timers) -> Self {
        Self { render, timers }
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }
}

/// Raw intersection computed by the host for one watched element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub element: ElementId,
    /// Visible fraction of the element's area, in [0, 1].
    pub ratio: f32,
}

impl IntersectionEntry {
    pub fn new(element: ElementId, ratio: f32) -> Self {
        Self { element, ratio }
    }
}

/// Events that drive the reveal core.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    VisibilityChanged { element: ElementId, visible: bool },
    RawSample(ViewportSample),
    TimerFired { id: TimerId, timeout: Timeout },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// The host refuses to start audible playback without a user gesture.
    #[error("Playback blocked until user interaction")]
    Blocked,
    #[error("Media unavailable: {0}")]
    Unavailable(String),
}

pub trait MediaHandle {
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    /// Seconds
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    /// Seconds; NaN until the media's metadata is known.
    fn duration(&self) -> f64;
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
    fn is_muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);
}
