mod animatable;
mod timing;
mod transform;

use std::fmt;
use std::time::Duration;

pub use animatable::Animatable;
pub use timing::TimingFunction;
pub use transform::Transform;

use crate::error::Result;

/// How a style change should animate once applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub timing: TimingFunction,
    pub delay: Duration,
}

impl Transition {
    pub fn new(duration: Duration, timing: TimingFunction) -> Self {
        Self {
            duration,
            timing,
            delay: Duration::ZERO,
        }
    }

    pub fn ease(duration: Duration) -> Self {
        Self::new(duration, TimingFunction::Ease)
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
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

    /// Delay plus duration: when the element has reached its target.
    pub fn total(&self) -> Duration {
        self.delay + self.duration
    }

    pub fn validate(&self) -> Result<()> {
        self.timing.validate()
    }

    /// Eased progress `elapsed` after the transition was applied.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        let Some(active) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = active.as_secs_f32() / self.duration.as_secs_f32();
        self.timing.evaluate(t)
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::ease(Duration::from_millis(300))
    }
}

/// CSS shorthand for the properties the reveal core animates.
impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.duration.as_secs_f32();
        write!(f, "opacity {secs}s {t}, transform {secs}s {t}", t = self.timing)?;
        if !self.delay.is_zero() {
            write!(f, " {}s", self.delay.as_secs_f32())?;
        }
        Ok(())
    }
}
