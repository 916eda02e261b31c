//! Staged reveal of watched elements.
//!
//! ## State machine
//!
//! Each tracked element moves through
//!
//! ```text
//! Unseen --(visible)--> Entering --(task completes)--> Visible
//! ```
//!
//! and never leaves `Visible`. Re-entering the viewport does not retrigger;
//! the only way back to `Unseen` is tracking the element again.
//!
//! ## Reveal tasks
//!
//! Entering creates one [`TaskPhase::Scheduled`] task, started after the
//! element's stagger delay. Starting is phase 1: the baseline style (zero
//! opacity, offset position) is applied synchronously and the task becomes
//! `Running`, yielding at least one frame so the render target paints the
//! baseline. Phase 2 then applies the target style with its transition and
//! waits out the transition before completing.
//!
//! An element has at most one task at any time. A task whose element has
//! disappeared from the render target is dropped without complaint.
//!
//! ## Batches
//!
//! `Stagger::Indexed` counts only the tasks created since the last
//! [`RevealSequencer::begin_batch`]. Edges that spawn nothing do not take a
//! slot.
//!
//! ## Re-arming mid-flight
//!
//! An element tracked again while its previous task is still running cannot
//! start a second one. The refused edge is remembered instead, and the new
//! reveal starts as soon as the old task completes, unless the element was
//! reported hidden in between.

use std::collections::HashMap;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::{TimingFunction, Transform, Transition};
use crate::element::{ElementId, VisualClass};
use crate::error::{Error, Result};
use crate::host::{Host, TimerId, Timeout};
use crate::style::Style;

/// Start-time offset for elements revealed together.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stagger {
    None,
    /// Uniform in `[0, max)`
    Random { max: Duration },
    /// `base + index * step`, index being the position within one batch
    Indexed { base: Duration, step: Duration },
}

impl Stagger {
    pub fn delay<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Duration {
        match *self {
            Stagger::None => Duration::ZERO,
            Stagger::Random { max } => {
                let nanos = max.as_nanos() as u64;
                if nanos == 0 {
                    Duration::ZERO
                } else {
                    Duration::from_nanos(rng.random_range(0..nanos))
                }
            }
            Stagger::Indexed { base, step } => {
                let steps = step.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX));
                base.saturating_add(steps)
            }
        }
    }
}

/// How one element is revealed.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealConfig {
    /// Baseline translation in px the element animates away from
    pub offset: (f32, f32),
    pub duration: Duration,
    pub timing: TimingFunction,
    pub stagger: Stagger,
    /// Pause between baseline and target. `None` waits exactly one frame;
    /// anything shorter than a frame is stretched to one.
    pub settle: Option<Duration>,
    /// Classes added together with the target style
    pub classes: VisualClass,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            offset: (0.0, 30.0),
            duration: Duration::from_millis(600),
            timing: TimingFunction::Ease,
            stagger: Stagger::None,
            settle: None,
            classes: VisualClass::ANIMATED | VisualClass::APPEAR,
        }
    }
}

impl RevealConfig {
    pub fn offset(mut self, x: f32, y: f32) -> Self {
        self.offset = (x, y);
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }

    pub fn stagger(mut self, stagger: Stagger) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn settle(mut self, settle: Duration) -> Self {
        self.settle = Some(settle);
        self
    }

    pub fn classes(mut self, classes: VisualClass) -> Self {
        self.classes = classes;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.offset.0.is_finite() || !self.offset.1.is_finite() {
            return Err(Error::config(format!(
                "reveal offset must be finite, got {:?}",
                self.offset
            )));
        }
        self.timing.validate()
    }

    fn baseline(&self) -> Style {
        Style::new()
            .opacity(0.0)
            .transform(Transform::translate(self.offset.0, self.offset.1))
    }

    fn target(&self) -> Style {
        Style::new()
            .opacity(1.0)
            .transform(Transform::IDENTITY)
            .transition(Transition::new(self.duration, self.timing))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchState {
    Unseen,
    Entering,
    Visible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStep {
    /// Baseline applied, waiting for it to be painted
    AwaitingFrame,
    /// Target applied, waiting for the transition to finish
    Transitioning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskPhase {
    Scheduled,
    Running(RunStep),
}

/// How a task left the sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed(ElementId),
    /// The element vanished from the render target mid-reveal.
    Dropped(ElementId),
}

#[derive(Debug)]
struct Watch {
    state: WatchState,
    registration: u64,
    config: RevealConfig,
    /// A visible edge arrived while an older task still owned the element
    deferred: bool,
}

#[derive(Debug)]
struct RevealTask {
    /// Registration the task was created for
    registration: u64,
    phase: TaskPhase,
    timer: Option<TimerId>,
    config: RevealConfig,
}

pub struct RevealSequencer {
    watches: HashMap<ElementId, Watch>,
    tasks: HashMap<ElementId, RevealTask>,
    next_registration: u64,
    tasks_created: u64,
    batch_index: usize,
    rng: StdRng,
}

impl RevealSequencer {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            watches: HashMap::new(),
            tasks: HashMap::new(),
            next_registration: 0,
            tasks_created: 0,
            batch_index: 0,
            rng,
        }
    }

    /// Track `element` as `Unseen`. Tracking an element again re-arms it,
    /// whatever state it was in.
    pub fn track(&mut self, element: ElementId, config: RevealConfig) {
        let registration = self.next_registration;
        self.next_registration += 1;
        self.watches.insert(
            element,
            Watch {
                state: WatchState::Unseen,
                registration,
                config,
                deferred: false,
            },
        );
    }

    /// Stop tracking. An in-flight task is not cancelled; it runs to the end
    /// but no longer marks the element.
    pub fn untrack(&mut self, element: ElementId) -> bool {
        self.watches.remove(&element).is_some()
    }

    pub fn state(&self, element: ElementId) -> Option<WatchState> {
        self.watches.get(&element).map(|w| w.state)
    }

    pub fn phase(&self, element: ElementId) -> Option<TaskPhase> {
        self.tasks.get(&element).map(|t| t.phase)
    }

    pub fn active_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Tasks created since construction.
    pub fn tasks_created(&self) -> u64 {
        self.tasks_created
    }

    /// Start a new batch: the next task created takes stagger index 0.
    pub fn begin_batch(&mut self) {
        self.batch_index = 0;
    }

    /// React to an observer edge. Returns an outcome only when the reveal
    /// finished or was dropped right away.
    pub fn on_visibility_changed(
        &mut self,
        element: ElementId,
        visible: bool,
        host: &mut Host<'_>,
    ) -> Option<TaskOutcome> {
        let Some(watch) = self.watches.get_mut(&element) else {
            log::trace!("{:?} is not tracked, ignoring visibility", element);
            return None;
        };
        if !visible {
            watch.deferred = false;
            return None;
        }
        if watch.state != WatchState::Unseen {
            return None;
        }
        if self.tasks.contains_key(&element) {
            log::debug!(
                "{:?} still has a reveal in flight from an earlier registration, deferring",
                element
            );
            watch.deferred = true;
            return None;
        }
        self.spawn(element, host)
    }

    /// Create the task for an `Unseen` element and start it if undelayed.
    fn spawn(&mut self, element: ElementId, host: &mut Host<'_>) -> Option<TaskOutcome> {
        let watch = self.watches.get_mut(&element)?;
        watch.state = WatchState::Entering;
        watch.deferred = false;
        let registration = watch.registration;
        let config = watch.config.clone();
        let delay = config.stagger.delay(self.batch_index, &mut self.rng);
        self.batch_index += 1;
        self.tasks_created += 1;
        log::debug!("reveal of {:?} scheduled in {:?}", element, delay);

        let timer = if delay.is_zero() {
            None
        } else {
            Some(host.timers.schedule(delay, Timeout::Reveal(element)))
        };
        self.tasks.insert(
            element,
            RevealTask {
                registration,
                phase: TaskPhase::Scheduled,
                timer,
                config,
            },
        );
        if timer.is_none() {
            return self.begin(element, host);
        }
        None
    }

    /// A `Timeout::Reveal(element)` timer fired.
    pub fn on_timer(
        &mut self,
        element: ElementId,
        id: TimerId,
        host: &mut Host<'_>,
    ) -> Option<TaskOutcome> {
        let task = self.tasks.get(&element)?;
        if task.timer != Some(id) {
            return None;
        }
        match task.phase {
            TaskPhase::Scheduled => self.begin(element, host),
            TaskPhase::Running(RunStep::AwaitingFrame) => self.transition(element, host),
            TaskPhase::Running(RunStep::Transitioning) => self.complete(element, host),
        }
    }

    /// Phase 1: baseline now, target after the settle pause.
    fn begin(&mut self, element: ElementId, host: &mut Host<'_>) -> Option<TaskOutcome> {
        if !host.render.contains(element) {
            return self.drop_task(element);
        }
        let task = self.tasks.get_mut(&element)?;
        host.render.set_style(element, &task.config.baseline());

        let timeout = Timeout::Reveal(element);
        let timer = match task.config.settle {
            Some(settle) => {
                let pause = settle.max(host.timers.frame_interval());
                host.timers.schedule(pause, timeout)
            }
            None => host.timers.next_frame(timeout),
        };
        task.timer = Some(timer);
        task.phase = TaskPhase::Running(RunStep::AwaitingFrame);
        None
    }

    /// Phase 2: target style plus reveal classes.
    fn transition(&mut self, element: ElementId, host: &mut Host<'_>) -> Option<TaskOutcome> {
        if !host.render.contains(element) {
            return self.drop_task(element);
        }
        let task = self.tasks.get_mut(&element)?;
        host.render.set_style(element, &task.config.target());
        if !task.config.classes.is_empty() {
            host.render.add_class(element, task.config.classes);
        }
        task.timer = Some(
            host.timers
                .schedule(task.config.duration, Timeout::Reveal(element)),
        );
        task.phase = TaskPhase::Running(RunStep::Transitioning);
        None
    }

    fn complete(&mut self, element: ElementId, host: &mut Host<'_>) -> Option<TaskOutcome> {
        let task = self.tasks.remove(&element)?;
        log::debug!("reveal of {:?} complete", element);
        let Some(watch) = self.watches.get_mut(&element) else {
            return Some(TaskOutcome::Completed(element));
        };
        if watch.registration == task.registration {
            watch.state = WatchState::Visible;
        } else if watch.deferred {
            // The element was re-tracked and seen while the old task ran.
            self.begin_batch();
            if let Some(TaskOutcome::Dropped(element)) = self.spawn(element, host) {
                return Some(TaskOutcome::Dropped(element));
            }
        }
        Some(TaskOutcome::Completed(element))
    }

    fn drop_task(&mut self, element: ElementId) -> Option<TaskOutcome> {
        self.tasks.remove(&element)?;
        self.watches.remove(&element);
        log::debug!("{:?} left the document mid-reveal, dropping its task", element);
        Some(TaskOutcome::Dropped(element))
    }
}

impl Default for RevealSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, Insert};
    use crate::headless::{HeadlessRenderer, ManualTimers, RenderOp};
    use crate::host::{Event, RenderTarget};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    struct Rig {
        render: HeadlessRenderer,
        timers: ManualTimers,
        seq: RevealSequencer,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                render: HeadlessRenderer::new(),
                timers: ManualTimers::new(),
                seq: RevealSequencer::seeded(7),
            }
        }

        fn card(&mut self) -> ElementId {
            let body = self.render.body();
            self.render
                .create_element(body, ElementKind::Card, Insert::Last)
                .unwrap()
        }

        fn visible(&mut self, element: ElementId) -> Option<TaskOutcome> {
            self.edge(element, true)
        }

        fn edge(&mut self, element: ElementId, visible: bool) -> Option<TaskOutcome> {
            let mut host = Host::new(&mut self.render, &mut self.timers);
            self.seq.on_visibility_changed(element, visible, &mut host)
        }

        fn advance(&mut self, by: Duration) -> Vec<TaskOutcome> {
            let mut outcomes = Vec::new();
            let seq = &mut self.seq;
            self.timers.advance(by, &mut self.render, |event, host| {
                if let Event::TimerFired {
                    id,
                    timeout: Timeout::Reveal(element),
                } = event
                {
                    outcomes.extend(seq.on_timer(element, id, host));
                }
            });
            outcomes
        }
    }

    #[test]
    fn test_full_cycle() {
        let mut rig = Rig::new();
        let card = rig.card();
        rig.seq.track(card, RevealConfig::default());
        assert_eq!(rig.seq.state(card), Some(WatchState::Unseen));

        rig.visible(card);
        assert_eq!(rig.seq.state(card), Some(WatchState::Entering));
        assert_eq!(
            rig.seq.phase(card),
            Some(TaskPhase::Running(RunStep::AwaitingFrame))
        );
        assert_eq!(rig.render.style(card).unwrap().opacity, Some(0.0));

        rig.advance(ms(16));
        assert_eq!(
            rig.seq.phase(card),
            Some(TaskPhase::Running(RunStep::Transitioning))
        );
        assert_eq!(rig.render.style(card).unwrap().opacity, Some(1.0));
        assert!(rig.render.has_class(card, VisualClass::ANIMATED | VisualClass::APPEAR));

        let outcomes = rig.advance(ms(600));
        assert_eq!(outcomes, vec![TaskOutcome::Completed(card)]);
        assert_eq!(rig.seq.state(card), Some(WatchState::Visible));
        assert_eq!(rig.seq.active_tasks(), 0);
    }

    #[test]
    fn test_baseline_painted_before_target() {
        let mut rig = Rig::new();
        let card = rig.card();
        rig.seq.track(card, RevealConfig::default());
        rig.visible(card);
        rig.advance(ms(16));

        let styles: Vec<_> = rig
            .render
            .take_ops()
            .into_iter()
            .filter_map(|op| match op {
                RenderOp::SetStyle(_, style) => Some(style),
                _ => None,
            })
            .collect();
        assert_eq!(styles.len(), 2);
        assert_eq!(styles[0].opacity, Some(0.0));
        assert_eq!(styles[0].transform, Some(Transform::translate_y(30.0)));
        assert!(styles[0].transition.is_none());
        assert_eq!(styles[1].opacity, Some(1.0));
        assert!(styles[1].transition.is_some());
    }

    #[test]
    fn test_second_visible_mid_animation_spawns_nothing() {
        let mut rig = Rig::new();
        let card = rig.card();
        rig.seq.track(card, RevealConfig::default());
        rig.visible(card);
        rig.advance(ms(100));
        rig.visible(card);
        assert_eq!(rig.seq.tasks_created(), 1);
        assert_eq!(rig.seq.active_tasks(), 1);
    }

    #[test]
    fn test_hidden_edge_is_ignored() {
        let mut rig = Rig::new();
        let card = rig.card();
        rig.seq.track(card, RevealConfig::default());
        rig.edge(card, false);
        assert_eq!(rig.seq.tasks_created(), 0);
        assert_eq!(rig.seq.state(card), Some(WatchState::Unseen));
    }

    #[test]
    fn test_visible_is_terminal() {
        let mut rig = Rig::new();
        let card = rig.card();
        rig.seq.track(card, RevealConfig::default());
        rig.visible(card);
        rig.advance(ms(1000));
        rig.visible(card);
        assert_eq!(rig.seq.tasks_created(), 1);
        assert_eq!(rig.seq.state(card), Some(WatchState::Visible));
    }

    #[test]
    fn test_missing_target_dropped_silently() {
        let mut rig = Rig::new();
        let card = rig.card();
        rig.seq.track(
            card,
            RevealConfig::default().stagger(Stagger::Indexed {
                base: ms(50),
                step: ms(0),
            }),
        );
        rig.visible(card);
        assert_eq!(rig.seq.phase(card), Some(TaskPhase::Scheduled));
        rig.render.remove_element(card);

        let outcomes = rig.advance(ms(100));
        assert_eq!(outcomes, vec![TaskOutcome::Dropped(card)]);
        assert_eq!(rig.seq.state(card), None);
        assert_eq!(rig.seq.active_tasks(), 0);
    }

    #[test]
    fn test_settle_pause_is_at_least_one_frame() {
        let mut rig = Rig::new();
        let card = rig.card();
        rig.seq
            .track(card, RevealConfig::default().settle(ms(10)));
        rig.visible(card);
        rig.advance(ms(15));
        assert_eq!(
            rig.seq.phase(card),
            Some(TaskPhase::Running(RunStep::AwaitingFrame))
        );
        rig.advance(ms(1));
        assert_eq!(
            rig.seq.phase(card),
            Some(TaskPhase::Running(RunStep::Transitioning))
        );
    }

    #[test]
    fn test_untracked_task_finishes_without_marking_new_registration() {
        let mut rig = Rig::new();
        let card = rig.card();
        rig.seq.track(card, RevealConfig::default());
        rig.visible(card);
        assert!(rig.seq.untrack(card));
        rig.seq.track(card, RevealConfig::default());

        rig.advance(ms(1000));
        assert_eq!(rig.seq.active_tasks(), 0);
        assert_eq!(rig.seq.state(card), Some(WatchState::Unseen));

        rig.visible(card);
        assert_eq!(rig.seq.tasks_created(), 2);
    }

    #[test]
    fn test_edge_refused_mid_flight_starts_reveal_after_old_task() {
        let mut rig = Rig::new();
        let card = rig.card();
        rig.seq.track(card, RevealConfig::default());
        rig.visible(card);
        rig.seq.untrack(card);
        rig.seq.track(card, RevealConfig::default());

        // Old task still owns the element: no second task yet
        rig.visible(card);
        assert_eq!(rig.seq.tasks_created(), 1);

        rig.advance(ms(616));
        assert_eq!(rig.seq.tasks_created(), 2);
        assert_eq!(rig.seq.state(card), Some(WatchState::Entering));

        rig.advance(ms(1000));
        assert_eq!(rig.seq.state(card), Some(WatchState::Visible));
        assert_eq!(rig.seq.active_tasks(), 0);
    }

    #[test]
    fn test_hidden_edge_cancels_deferred_reveal() {
        let mut rig = Rig::new();
        let card = rig.card();
        rig.seq.track(card, RevealConfig::default());
        rig.visible(card);
        rig.seq.untrack(card);
        rig.seq.track(card, RevealConfig::default());
        rig.visible(card);
        rig.edge(card, false);

        rig.advance(ms(1000));
        assert_eq!(rig.seq.tasks_created(), 1);
        assert_eq!(rig.seq.state(card), Some(WatchState::Unseen));
    }

    #[test]
    fn test_batch_index_counts_only_spawned_tasks() {
        let mut rig = Rig::new();
        let stagger = Stagger::Indexed {
            base: Duration::ZERO,
            step: ms(100),
        };
        let seen = rig.card();
        let fresh = rig.card();
        rig.seq.track(seen, RevealConfig::default().stagger(stagger));
        rig.seq.track(fresh, RevealConfig::default().stagger(stagger));
        rig.visible(seen);
        rig.advance(ms(1000));

        rig.seq.begin_batch();
        rig.visible(seen);
        rig.visible(fresh);
        assert_eq!(
            rig.seq.phase(fresh),
            Some(TaskPhase::Running(RunStep::AwaitingFrame))
        );
    }

    #[test]
    fn test_indexed_stagger_saturates() {
        let mut rng = StdRng::seed_from_u64(1);
        let huge = Stagger::Indexed {
            base: Duration::MAX,
            step: ms(100),
        };
        assert_eq!(huge.delay(3, &mut rng), Duration::MAX);
    }

    #[test]
    fn test_stagger_delays() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Stagger::None.delay(3, &mut rng), Duration::ZERO);
        let indexed = Stagger::Indexed {
            base: ms(300),
            step: ms(100),
        };
        assert_eq!(indexed.delay(0, &mut rng), ms(300));
        assert_eq!(indexed.delay(4, &mut rng), ms(700));
        let random = Stagger::Random { max: ms(500) };
        for _ in 0..100 {
            assert!(random.delay(0, &mut rng) < ms(500));
        }
        assert_eq!(
            Stagger::Random { max: Duration::ZERO }.delay(0, &mut rng),
            Duration::ZERO
        );
    }

    #[test]
    fn test_non_finite_offset_rejected() {
        let config = RevealConfig::default().offset(f32::INFINITY, 0.0);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
