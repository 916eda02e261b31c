use std::time::Duration;

use festoon::headless::{HeadlessRenderer, ManualTimers, RenderOp};
use festoon::prelude::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

struct Rig {
    render: HeadlessRenderer,
    timers: ManualTimers,
    stage: Stage,
}

impl Rig {
    fn new(config: StageConfig) -> Self {
        Self {
            render: HeadlessRenderer::new(),
            timers: ManualTimers::new(),
            stage: Stage::with_config(config.seed(42)).unwrap(),
        }
    }

    fn cards(&mut self, n: usize) -> Vec<ElementId> {
        let body = self.render.body();
        (0..n)
            .map(|_| {
                let card = self
                    .render
                    .create_element(body, ElementKind::Card, Insert::Last)
                    .unwrap();
                self.stage.register(card).unwrap();
                card
            })
            .collect()
    }

    fn intersect(&mut self, entries: &[(ElementId, f32)]) {
        self.stage.handle_intersections(
            entries.iter().map(|&(el, ratio)| IntersectionEntry::new(el, ratio)),
            &mut Host::new(&mut self.render, &mut self.timers),
        );
    }

    /// Fire every timer due before `until`, returning the style changes in
    /// the order they happened, stamped with the virtual time.
    fn run_until(&mut self, until: Duration) -> Vec<(Duration, ElementId, Style)> {
        let mut log = self.styles_now();
        while let Some(event) = self.timers.fire_next(until) {
            self.stage
                .dispatch(event, &mut Host::new(&mut self.render, &mut self.timers));
            log.extend(self.styles_now());
        }
        self.timers.set_now(until);
        log
    }

    fn styles_now(&mut self) -> Vec<(Duration, ElementId, Style)> {
        let now = self.timers.now();
        self.render
            .take_ops()
            .into_iter()
            .filter_map(|op| match op {
                RenderOp::SetStyle(el, style) => Some((now, el, style)),
                _ => None,
            })
            .collect()
    }
}

fn baselines(log: &[(Duration, ElementId, Style)]) -> Vec<(Duration, ElementId)> {
    log.iter()
        .filter(|(_, _, style)| style.opacity == Some(0.0))
        .map(|&(at, el, _)| (at, el))
        .collect()
}

#[test]
fn test_batch_reveals_in_stagger_order() {
    let reveal = RevealConfig::default().stagger(Stagger::Indexed {
        base: Duration::ZERO,
        step: ms(100),
    });
    let mut rig = Rig::new(StageConfig::default().threshold(0.5).reveal(reveal));
    let cards = rig.cards(5);

    let entries: Vec<_> = cards.iter().map(|&c| (c, 0.6)).collect();
    rig.intersect(&entries);
    let log = rig.run_until(ms(2000));

    let expected: Vec<_> = cards
        .iter()
        .enumerate()
        .map(|(i, &c)| (ms(100 * i as u64), c))
        .collect();
    assert_eq!(baselines(&log), expected);
    assert!(cards
        .iter()
        .all(|&c| rig.stage.watch_state(c) == Some(WatchState::Visible)));
}

#[test]
fn test_target_applied_at_least_one_frame_after_baseline() {
    let mut rig = Rig::new(StageConfig::default());
    let cards = rig.cards(1);
    rig.intersect(&[(cards[0], 1.0)]);
    let log = rig.run_until(ms(1000));

    let baseline = log.iter().find(|(_, _, s)| s.opacity == Some(0.0)).unwrap();
    let target = log.iter().find(|(_, _, s)| s.opacity == Some(1.0)).unwrap();
    assert!(target.0 >= baseline.0 + ms(16));
    assert!(target.2.transition.is_some());
    assert_eq!(target.2.transform, Some(Transform::IDENTITY));
}

#[test]
fn test_below_threshold_never_revealed() {
    let mut rig = Rig::new(StageConfig::default().threshold(0.5));
    let cards = rig.cards(2);
    rig.intersect(&[(cards[0], 0.49), (cards[1], 0.0)]);
    rig.run_until(ms(2000));

    assert_eq!(rig.stage.sequencer().tasks_created(), 0);
    assert_eq!(rig.stage.watch_state(cards[0]), Some(WatchState::Unseen));
    assert!(rig
        .render
        .style(cards[0])
        .map_or(true, |s| s.opacity.is_none()));
}

#[test]
fn test_staying_visible_reveals_once() {
    let mut rig = Rig::new(StageConfig::default());
    let cards = rig.cards(1);
    for _ in 0..5 {
        rig.intersect(&[(cards[0], 0.8)]);
    }
    rig.run_until(ms(1000));
    rig.intersect(&[(cards[0], 0.0)]);
    rig.intersect(&[(cards[0], 0.8)]);
    rig.run_until(ms(2000));

    assert_eq!(rig.stage.sequencer().tasks_created(), 1);
    assert_eq!(rig.stage.watch_state(cards[0]), Some(WatchState::Visible));
}

#[test]
fn test_reregistration_rearms() {
    let mut rig = Rig::new(StageConfig::default());
    let cards = rig.cards(1);
    rig.intersect(&[(cards[0], 0.8)]);
    rig.run_until(ms(1000));
    assert_eq!(rig.stage.watch_state(cards[0]), Some(WatchState::Visible));

    assert!(rig.stage.unregister(cards[0]));
    assert!(!rig.stage.is_watched(cards[0]));
    rig.stage.register(cards[0]).unwrap();
    assert_eq!(rig.stage.watch_state(cards[0]), Some(WatchState::Unseen));

    rig.intersect(&[(cards[0], 0.8)]);
    rig.run_until(ms(2000));
    assert_eq!(rig.stage.sequencer().tasks_created(), 2);
    assert_eq!(rig.stage.watch_state(cards[0]), Some(WatchState::Visible));
}

#[test]
fn test_unregistered_element_ignored() {
    let mut rig = Rig::new(StageConfig::default());
    let cards = rig.cards(1);
    rig.stage.unregister(cards[0]);
    rig.intersect(&[(cards[0], 1.0)]);
    rig.run_until(ms(1000));
    assert_eq!(rig.stage.sequencer().tasks_created(), 0);
    assert_eq!(rig.stage.watch_state(cards[0]), None);
}

#[test]
fn test_removed_element_dropped_mid_reveal() {
    let reveal = RevealConfig::default().stagger(Stagger::Indexed {
        base: ms(200),
        step: ms(0),
    });
    let mut rig = Rig::new(StageConfig::default().reveal(reveal));
    let cards = rig.cards(2);
    rig.intersect(&[(cards[0], 1.0), (cards[1], 1.0)]);
    rig.render.remove_element(cards[0]);
    rig.run_until(ms(2000));

    assert_eq!(rig.stage.watch_state(cards[0]), None);
    assert!(!rig.stage.is_watched(cards[0]));
    assert_eq!(rig.stage.watch_state(cards[1]), Some(WatchState::Visible));
    assert_eq!(rig.stage.sequencer().active_tasks(), 0);
}

#[test]
fn test_hidden_edges_spawn_nothing() {
    let mut rig = Rig::new(StageConfig::default());
    let cards = rig.cards(3);
    rig.intersect(&[(cards[0], 0.0), (cards[1], 0.0), (cards[2], 0.0)]);
    assert_eq!(rig.stage.sequencer().tasks_created(), 0);
    assert_eq!(rig.timers.pending(), 0);
}

#[test]
fn test_reentering_element_takes_no_stagger_slot() {
    let reveal = RevealConfig::default().stagger(Stagger::Indexed {
        base: Duration::ZERO,
        step: ms(100),
    });
    let mut rig = Rig::new(StageConfig::default().reveal(reveal));
    let cards = rig.cards(2);
    let (seen, fresh) = (cards[0], cards[1]);

    rig.intersect(&[(seen, 1.0)]);
    rig.run_until(ms(1000));
    rig.intersect(&[(seen, 0.0)]);
    rig.run_until(ms(2000));

    rig.intersect(&[(seen, 1.0), (fresh, 1.0)]);
    let log = rig.run_until(ms(3000));
    assert_eq!(baselines(&log), vec![(ms(2000), fresh)]);
    assert_eq!(rig.stage.watch_state(fresh), Some(WatchState::Visible));
}

#[test]
fn test_reregistered_mid_flight_reveals_while_staying_in_view() {
    let mut rig = Rig::new(StageConfig::default());
    let cards = rig.cards(1);
    let card = cards[0];
    rig.intersect(&[(card, 1.0)]);
    rig.run_until(ms(100));

    rig.stage.unregister(card);
    rig.stage.register(card).unwrap();
    for step in 2..=50 {
        rig.intersect(&[(card, 1.0)]);
        rig.run_until(ms(100 * step));
    }

    assert_eq!(rig.stage.sequencer().tasks_created(), 2);
    assert_eq!(rig.stage.watch_state(card), Some(WatchState::Visible));
}
