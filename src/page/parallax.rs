use std::time::Duration;

use crate::animation::Transform;
use crate::element::ElementId;
use crate::host::RenderTarget;
use crate::style::{Motion, Style};
use crate::throttle::{ViewportConsumer, ViewportSample};

/// Floating hero decorations drift at `(index + 1) * step` times the scroll speed.
pub struct Parallax {
    elements: Vec<ElementId>,
    step: f32,
}

impl Parallax {
    pub fn new(elements: Vec<ElementId>, step: f32) -> Self {
        Self { elements, step }
    }
}

impl ViewportConsumer for Parallax {
    fn on_sample(&mut self, sample: &ViewportSample, render: &mut dyn RenderTarget) {
        let Some(offset) = sample.scroll_offset() else {
            return;
        };
        for (index, &element) in self.elements.iter().enumerate() {
            let speed = (index + 1) as f32 * self.step;
            render.set_style(
                element,
                &Style::new().transform(Transform::translate_y(offset * speed)),
            );
        }
    }
}

/// Cheaper decorative motion on narrow viewports.
pub struct LayoutMode {
    floating: Vec<ElementId>,
    particles: Vec<ElementId>,
    balloons: Vec<ElementId>,
    breakpoint: f32,
    mobile: Option<bool>,
}

const MOBILE_BALLOON_CYCLE: Duration = Duration::from_secs(8);
const DESKTOP_BALLOON_CYCLE: Duration = Duration::from_secs(6);

impl LayoutMode {
    pub fn new(
        floating: Vec<ElementId>,
        particles: Vec<ElementId>,
        balloons: Vec<ElementId>,
        breakpoint: f32,
    ) -> Self {
        Self {
            floating,
            particles,
            balloons,
            breakpoint,
            mobile: None,
        }
    }

    fn apply(&self, mobile: bool, render: &mut dyn RenderTarget) {
        let (floating, particles, cycle) = if mobile {
            (Motion::Off, Motion::Paused, MOBILE_BALLOON_CYCLE)
        } else {
            (Motion::Default, Motion::Running, DESKTOP_BALLOON_CYCLE)
        };
        for &el in &self.floating {
            render.set_style(el, &Style::new().motion(floating));
        }
        for &el in &self.particles {
            render.set_style(el, &Style::new().motion(particles));
        }
        for &el in &self.balloons {
            render.set_style(el, &Style::new().motion(Motion::Cycle(cycle)));
        }
    }
}

impl ViewportConsumer for LayoutMode {
    fn on_sample(&mut self, sample: &ViewportSample, render: &mut dyn RenderTarget) {
        let Some((width, _)) = sample.viewport() else {
            return;
        };
        let mobile = width <= self.breakpoint;
        if self.mobile == Some(mobile) {
            return;
        }
        log::debug!(
            "switching decorations to {} mode at width {}",
            if mobile { "mobile" } else { "desktop" },
            width
        );
        self.mobile = Some(mobile);
        self.apply(mobile, render);
    }
}
