//! The context object tying the reveal core together.
//!
//! A [`Stage`] owns the visibility observer, the reveal sequencer and the
//! scroll/resize throttles. Hosts push everything through it:
//!
//! ```ignore
//! let mut stage = Stage::with_config(StageConfig::default())?;
//! stage.register(card)?;
//! stage.subscribe(SampleChannel::Scroll, Box::new(navbar));
//!
//! // intersection capability
//! stage.handle_intersections(entries, &mut host);
//! // scroll listener
//! stage.dispatch(Event::RawSample(ViewportSample::scroll(now, y)), &mut host);
//! // timer capability
//! stage.dispatch(Event::TimerFired { id, timeout }, &mut host);
//! ```

use std::time::Duration;

use crate::element::ElementId;
use crate::error::Result;
use crate::host::{Event, Host, IntersectionEntry, TimerId, Timeout};
use crate::observer::{validate_threshold, VisibilityObserver};
use crate::sequencer::{RevealConfig, RevealSequencer, TaskOutcome, WatchState};
use crate::throttle::{SampleChannel, Throttle, ViewportConsumer, ViewportSample};

/// Called with each element whose reveal completed.
pub type RevealCallback = Box<dyn FnMut(ElementId)>;

#[derive(Clone, Debug, PartialEq)]
pub struct StageConfig {
    /// Default visibility threshold for [`Stage::register`]
    pub threshold: f32,
    pub scroll_interval: Duration,
    pub resize_interval: Duration,
    /// Default reveal for [`Stage::register`]
    pub reveal: RevealConfig,
    /// Seed for stagger randomness; `None` draws from the OS
    pub seed: Option<u64>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            scroll_interval: Duration::from_millis(16),
            resize_interval: Duration::from_millis(16),
            reveal: RevealConfig::default(),
            seed: None,
        }
    }
}

impl StageConfig {
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn scroll_interval(mut self, interval: Duration) -> Self {
        self.scroll_interval = interval;
        self
    }

    pub fn resize_interval(mut self, interval: Duration) -> Self {
        self.resize_interval = interval;
        self
    }

    pub fn reveal(mut self, reveal: RevealConfig) -> Self {
        self.reveal = reveal;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

pub struct Stage {
    config: StageConfig,
    observer: VisibilityObserver,
    sequencer: RevealSequencer,
    scroll: Throttle<ViewportSample>,
    resize: Throttle<ViewportSample>,
    consumers: Vec<(SampleChannel, Box<dyn ViewportConsumer>)>,
    on_revealed: Option<RevealCallback>,
}

impl Stage {
    pub fn new() -> Result<Self> {
        Self::with_config(StageConfig::default())
    }

    /// Validates the whole configuration up front.
    pub fn with_config(config: StageConfig) -> Result<Self> {
        validate_threshold(config.threshold)?;
        config.reveal.validate()?;
        let scroll = Throttle::new(SampleChannel::Scroll, config.scroll_interval)?;
        let resize = Throttle::new(SampleChannel::Resize, config.resize_interval)?;
        let sequencer = match config.seed {
            Some(seed) => RevealSequencer::seeded(seed),
            None => RevealSequencer::new(),
        };
        Ok(Self {
            config,
            observer: VisibilityObserver::new(),
            sequencer,
            scroll,
            resize,
            consumers: Vec::new(),
            on_revealed: None,
        })
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Watch `element` with the default threshold and reveal.
    pub fn register(&mut self, element: ElementId) -> Result<()> {
        let reveal = self.config.reveal.clone();
        self.register_with(element, self.config.threshold, reveal)
    }

    /// Watch `element`. Registering again re-arms an already revealed element.
    pub fn register_with(
        &mut self,
        element: ElementId,
        threshold: f32,
        reveal: RevealConfig,
    ) -> Result<()> {
        reveal.validate()?;
        self.observer.register(element, threshold)?;
        self.sequencer.track(element, reveal);
        Ok(())
    }

    pub fn unregister(&mut self, element: ElementId) -> bool {
        let watched = self.observer.unregister(element);
        let tracked = self.sequencer.untrack(element);
        watched || tracked
    }

    /// Reveal an element right away, without waiting for the observer.
    /// Used for content that appears on load or on user action.
    pub fn reveal(
        &mut self,
        element: ElementId,
        reveal: RevealConfig,
        host: &mut Host<'_>,
    ) -> Result<()> {
        reveal.validate()?;
        self.sequencer.track(element, reveal);
        self.sequencer.begin_batch();
        let outcome = self.sequencer.on_visibility_changed(element, true, host);
        self.settle(outcome);
        Ok(())
    }

    pub fn subscribe(&mut self, channel: SampleChannel, consumer: Box<dyn ViewportConsumer>) {
        self.consumers.push((channel, consumer));
    }

    pub fn on_revealed<F: FnMut(ElementId) + 'static>(&mut self, callback: F) {
        self.on_revealed = Some(Box::new(callback));
    }

    pub fn watch_state(&self, element: ElementId) -> Option<WatchState> {
        self.sequencer.state(element)
    }

    pub fn is_watched(&self, element: ElementId) -> bool {
        self.observer.is_registered(element)
    }

    pub fn sequencer(&self) -> &RevealSequencer {
        &self.sequencer
    }

    /// Feed one batch from the intersection capability. Elements becoming
    /// visible together are staggered by their order in the batch.
    pub fn handle_intersections<I>(&mut self, entries: I, host: &mut Host<'_>)
    where
        I: IntoIterator<Item = IntersectionEntry>,
    {
        let changes = self.observer.observe_all(entries);
        self.sequencer.begin_batch();
        for change in changes {
            let outcome = self
                .sequencer
                .on_visibility_changed(change.element, change.visible, host);
            self.settle(outcome);
        }
    }

    /// Route one event. Consecutive `VisibilityChanged` events form a single
    /// stagger batch, closed by the next sample or timer.
    pub fn dispatch(&mut self, event: Event, host: &mut Host<'_>) {
        match event {
            Event::VisibilityChanged { element, visible } => {
                let outcome = self.sequencer.on_visibility_changed(element, visible, host);
                self.settle(outcome);
            }
            Event::RawSample(sample) => {
                self.sequencer.begin_batch();
                self.on_raw_sample(sample, host);
            }
            Event::TimerFired { id, timeout } => {
                self.sequencer.begin_batch();
                self.on_timer(id, timeout, host);
            }
        }
    }

    fn on_raw_sample(&mut self, sample: ViewportSample, host: &mut Host<'_>) {
        let channel = sample.channel();
        let throttle = match channel {
            SampleChannel::Scroll => &mut self.scroll,
            SampleChannel::Resize => &mut self.resize,
        };
        if let Some(sample) = throttle.push(sample, host.timers) {
            self.deliver(channel, &sample, host);
        }
    }

    fn on_timer(&mut self, id: TimerId, timeout: Timeout, host: &mut Host<'_>) {
        match timeout {
            Timeout::Reveal(element) => {
                let outcome = self.sequencer.on_timer(element, id, host);
                self.settle(outcome);
            }
            Timeout::Throttle(channel) => {
                let throttle = match channel {
                    SampleChannel::Scroll => &mut self.scroll,
                    SampleChannel::Resize => &mut self.resize,
                };
                if let Some(sample) = throttle.on_timer(id, host.timers) {
                    self.deliver(channel, &sample, host);
                }
            }
            Timeout::Page(_) => log::trace!("page timer {:?} reached the stage", id),
        }
    }

    fn deliver(&mut self, channel: SampleChannel, sample: &ViewportSample, host: &mut Host<'_>) {
        log::trace!("{:?} sample delivered: {:?}", channel, sample.value);
        for (_, consumer) in self.consumers.iter_mut().filter(|(c, _)| *c == channel) {
            consumer.on_sample(sample, &mut *host.render);
        }
    }

    fn settle(&mut self, outcome: Option<TaskOutcome>) {
        match outcome {
            Some(TaskOutcome::Completed(element)) => {
                if let Some(callback) = self.on_revealed.as_mut() {
                    callback(element);
                }
            }
            Some(TaskOutcome::Dropped(element)) => {
                self.observer.unregister(element);
            }
            None => {}
        }
    }
}
