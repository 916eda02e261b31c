//! Short-lived decorations: confetti, fireworks, click ripples and the
//! balloon heartbeat.
//!
//! Every spawned node schedules its own removal, so the document never
//! accumulates particles.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::{TimingFunction, Transform, Transition};
use crate::element::{ElementId, ElementKind, Insert, VisualClass};
use crate::error::{Error, Result};
use crate::host::{Host, RenderTarget, Timeout};
use crate::style::{Color, Keyframes, Length, Placement, Style};

use super::PageTimer;

pub const CONFETTI_PALETTE: [u32; 5] = [0xff6b6b, 0xffd166, 0x06d6a0, 0x118ab2, 0x073b4c];

pub const FIREWORK_PALETTE: [u32; 7] = [
    0xff6b6b, 0xffd166, 0x06d6a0, 0x118ab2, 0x073b4c, 0xff9a9e, 0xfad0c4,
];

fn pick<R: Rng + ?Sized>(palette: &[u32], rng: &mut R) -> Color {
    Color::from_hex(palette[rng.random_range(0..palette.len())])
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleConfig {
    pub confetti_count: usize,
    pub confetti_size: f32,
    /// Fall time is drawn from `[fall_min, fall_min + fall_spread)`
    pub confetti_fall_min: Duration,
    pub confetti_fall_spread: Duration,
    pub confetti_lifetime: Duration,
    pub firework_count: u8,
    pub firework_stagger: Duration,
    pub firework_size: f32,
    pub firework_scale: f32,
    pub firework_duration: Duration,
    /// Fraction of the viewport height fireworks may burst in, from the top
    pub firework_band: f32,
    pub ripple_lifetime: Duration,
    pub heartbeat_length: Duration,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            confetti_count: 50,
            confetti_size: 10.0,
            confetti_fall_min: Duration::from_millis(3000),
            confetti_fall_spread: Duration::from_millis(3000),
            confetti_lifetime: Duration::from_millis(6000),
            firework_count: 15,
            firework_stagger: Duration::from_millis(200),
            firework_size: 5.0,
            firework_scale: 30.0,
            firework_duration: Duration::from_millis(1500),
            firework_band: 0.6,
            ripple_lifetime: Duration::from_millis(600),
            heartbeat_length: Duration::from_millis(1500),
        }
    }
}

impl ParticleConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.firework_band) {
            return Err(Error::config(format!(
                "firework band must be within [0, 1], got {}",
                self.firework_band
            )));
        }
        let positive = |size: f32| size.is_finite() && size > 0.0;
        if !positive(self.confetti_size) || !positive(self.firework_size) {
            return Err(Error::config("particle sizes must be positive"));
        }
        Ok(())
    }
}

/// Bounding box of a clicked element, in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

pub struct Particles {
    config: ParticleConfig,
    rng: StdRng,
    live: usize,
}

impl Particles {
    pub fn new(config: ParticleConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            rng,
            live: 0,
        }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Particles spawned and not yet expired.
    pub fn live(&self) -> usize {
        self.live
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Weighted coin; `chance` must be within [0, 1].
    pub fn roll(&mut self, chance: f64) -> bool {
        self.rng.random_bool(chance)
    }

    /// Rain confetti over `container`, falling past the bottom of the viewport.
    pub fn confetti(&mut self, container: ElementId, viewport_height: f32, host: &mut Host<'_>) {
        let spread = self.config.confetti_fall_spread.as_secs_f32();
        let size = self.config.confetti_size;
        for _ in 0..self.config.confetti_count {
            let Some(piece) =
                host.render
                    .create_element(container, ElementKind::ConfettiPiece, Insert::Last)
            else {
                log::warn!("confetti container is gone");
                return;
            };
            let color = pick(&CONFETTI_PALETTE, &mut self.rng);
            let left = self.rng.random_range(0.0..100.0);
            let fall = self.config.confetti_fall_min
                + Duration::from_secs_f32(self.rng.random_range(0.0..1.0) * spread);
            let spin = self.rng.random_range(0.0..360.0);

            host.render.set_style(
                piece,
                &Style::new()
                    .placement(Placement {
                        left: Length::Vw(left),
                        top: Length::Px(-20.0),
                        fixed: false,
                    })
                    .size(size, size)
                    .background(color)
                    .opacity(0.8),
            );
            host.render.animate(
                piece,
                &Keyframes {
                    from: Style::new().opacity(0.8).transform(Transform::IDENTITY),
                    to: Style::new().opacity(0.0).transform(
                        Transform::translate_y(viewport_height + 20.0).with_rotation(spin),
                    ),
                    transition: Transition::new(
                        fall,
                        TimingFunction::CubicBezier(0.0, 0.0, 0.2, 1.0),
                    ),
                },
            );
            self.expire_after(piece, self.config.confetti_lifetime, host);
        }
        log::debug!("confetti burst of {}", self.config.confetti_count);
    }

    /// Arm one timer per firework, `firework_stagger` apart.
    pub fn schedule_fireworks(&mut self, host: &mut Host<'_>) {
        for i in 0..self.config.firework_count {
            let delay = self.config.firework_stagger * u32::from(i);
            host.timers
                .schedule(delay, Timeout::Page(PageTimer::FireworkLaunch(i)));
        }
    }

    /// A single burst somewhere in the upper band of the viewport.
    pub fn launch_firework(
        &mut self,
        parent: ElementId,
        viewport: (f32, f32),
        host: &mut Host<'_>,
    ) {
        let Some(spark) = host
            .render
            .create_element(parent, ElementKind::Firework, Insert::Last)
        else {
            return;
        };
        let color = pick(&FIREWORK_PALETTE, &mut self.rng);
        let x = self.rng.random_range(0.0..1.0) * viewport.0;
        let y = self.rng.random_range(0.0..1.0) * viewport.1 * self.config.firework_band;
        let size = self.config.firework_size;

        host.render.set_style(
            spark,
            &Style::new()
                .placement(Placement {
                    left: Length::Px(x),
                    top: Length::Px(y),
                    fixed: true,
                })
                .size(size, size)
                .background(color),
        );
        host.render.animate(
            spark,
            &Keyframes {
                from: Style::new().opacity(1.0).transform(Transform::scale(1.0)),
                to: Style::new()
                    .opacity(0.0)
                    .transform(Transform::scale(self.config.firework_scale)),
                transition: Transition::new(
                    self.config.firework_duration,
                    TimingFunction::CubicBezier(0.0, 0.2, 0.8, 1.0),
                ),
            },
        );
        self.expire_after(spark, self.config.firework_duration, host);
    }

    /// Circle centred on the click, sized to cover the button.
    pub fn ripple(
        &mut self,
        button: ElementId,
        x: f32,
        y: f32,
        bounds: Rect,
        host: &mut Host<'_>,
    ) -> Option<ElementId> {
        let ripple = host
            .render
            .create_element(button, ElementKind::Ripple, Insert::Last)?;
        let size = bounds.width.max(bounds.height);
        host.render.set_style(
            ripple,
            &Style::new()
                .placement(Placement {
                    left: Length::Px(x - bounds.left - size / 2.0),
                    top: Length::Px(y - bounds.top - size / 2.0),
                    fixed: false,
                })
                .size(size, size),
        );
        host.render.add_class(ripple, VisualClass::RIPPLE);
        self.expire_after(ripple, self.config.ripple_lifetime, host);
        Some(ripple)
    }

    /// Pulse one random balloon. Returns its index.
    pub fn heartbeat(&mut self, balloons: &[ElementId], host: &mut Host<'_>) -> Option<usize> {
        if balloons.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..balloons.len());
        host.render.add_class(balloons[index], VisualClass::HEARTBEAT);
        host.timers.schedule(
            self.config.heartbeat_length,
            Timeout::Page(PageTimer::HeartbeatEnd(index)),
        );
        Some(index)
    }

    pub fn expire(&mut self, element: ElementId, render: &mut dyn RenderTarget) {
        if render.contains(element) {
            render.remove_element(element);
        }
        self.live = self.live.saturating_sub(1);
    }

    fn expire_after(&mut self, element: ElementId, after: Duration, host: &mut Host<'_>) {
        self.live += 1;
        host.timers
            .schedule(after, Timeout::Page(PageTimer::ParticleExpire(element)));
    }
}
