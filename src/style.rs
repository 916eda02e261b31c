//! Inline style patches.
//!
//! A [`Style`] is a sparse set of properties: `None` leaves the property as
//! it is on the element, `Some` overwrites it. Render targets merge patches
//! with [`Style::merge`].

use std::time::Duration;

use crate::animation::{Animatable, Transform, Transition};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

/// A CSS length the page uses for placing spawned particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f32),
    /// Percent of the viewport width
    Vw(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left: Length,
    pub top: Length,
    /// `position: fixed` instead of `absolute`
    pub fixed: bool,
}

/// Control over an element's stylesheet-driven looping animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// `animation: none`
    Off,
    /// Back to whatever the stylesheet says.
    Default,
    Paused,
    Running,
    /// Running with an explicit cycle length.
    Cycle(Duration),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub opacity: Option<f32>,
    pub transform: Option<Transform>,
    pub transition: Option<Transition>,
    pub motion: Option<Motion>,
    pub placement: Option<Placement>,
    pub size: Option<(f32, f32)>,
    pub background: Option<Color>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    pub fn motion(mut self, motion: Motion) -> Self {
        self.motion = Some(motion);
        self
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.size = Some((width, height));
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Overwrite every property `patch` sets.
    pub fn merge(&mut self, patch: &Style) {
        if patch.opacity.is_some() {
            self.opacity = patch.opacity;
        }
        if patch.transform.is_some() {
            self.transform = patch.transform;
        }
        if patch.transition.is_some() {
            self.transition = patch.transition;
        }
        if patch.motion.is_some() {
            self.motion = patch.motion;
        }
        if patch.placement.is_some() {
            self.placement = patch.placement;
        }
        if patch.size.is_some() {
            self.size = patch.size;
        }
        if patch.background.is_some() {
            self.background = patch.background;
        }
    }
}

/// Only opacity and transform interpolate; everything else snaps to `to`.
impl Animatable for Style {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Style {
            opacity: Option::lerp(&from.opacity, &to.opacity, t),
            transform: Option::lerp(&from.transform, &to.transform, t),
            ..to.clone()
        }
    }
}

/// A two-keyframe animation run by the render target on its own,
/// without a frame yield in between.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    pub from: Style,
    pub to: Style,
    pub transition: Transition,
}
