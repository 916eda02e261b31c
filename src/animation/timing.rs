//! CSS easing curves.
//!
//! Every keyword is expressed as the cubic bezier CSS defines for it, so a
//! headless host and a browser agree on where an element is at any point of
//! a transition.
//!
//! | keyword       | control points            |
//! |---------------|---------------------------|
//! | `ease`        | (0.25, 0.1, 0.25, 1.0)    |
//! | `ease-in`     | (0.42, 0.0, 1.0, 1.0)     |
//! | `ease-out`    | (0.0, 0.0, 0.58, 1.0)     |
//! | `ease-in-out` | (0.42, 0.0, 0.58, 1.0)    |

use std::fmt;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum TimingFunction {
    Linear,
    #[default]
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// `cubic-bezier(x1, y1, x2, y2)`
    CubicBezier(f32, f32, f32, f32),
}

impl TimingFunction {
    /// Control points of the curve, `None` for linear.
    fn control_points(&self) -> Option<(f32, f32, f32, f32)> {
        match *self {
            TimingFunction::Linear => None,
            TimingFunction::Ease => Some((0.25, 0.1, 0.25, 1.0)),
            TimingFunction::EaseIn => Some((0.42, 0.0, 1.0, 1.0)),
            TimingFunction::EaseOut => Some((0.0, 0.0, 0.58, 1.0)),
            TimingFunction::EaseInOut => Some((0.42, 0.0, 0.58, 1.0)),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => Some((x1, y1, x2, y2)),
        }
    }

    /// x control points must stay within [0, 1] for the curve to be a function of time.
    pub fn validate(&self) -> Result<()> {
        if let Some((x1, _, x2, _)) = self.control_points() {
            if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
                return Err(Error::config(format!(
                    "cubic-bezier x control points must be within [0, 1], got {} and {}",
                    x1, x2
                )));
            }
        }
        Ok(())
    }

    /// Eased progress for linear progress `t` (clamped to [0, 1]).
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self.control_points() {
            None => t,
            Some((x1, y1, x2, y2)) => {
                let s = solve_curve_x(t, x1, x2);
                bezier(s, y1, y2)
            }
        }
    }
}

impl fmt::Display for TimingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingFunction::Linear => write!(f, "linear"),
            TimingFunction::Ease => write!(f, "ease"),
            TimingFunction::EaseIn => write!(f, "ease-in"),
            TimingFunction::EaseOut => write!(f, "ease-out"),
            TimingFunction::EaseInOut => write!(f, "ease-in-out"),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
        }
    }
}

/// One coordinate of a bezier with endpoints pinned at 0 and 1.
fn bezier(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x equals `x`.
/// Newton steps first, bisection when the slope flattens out.
fn solve_curve_x(x: f32, x1: f32, x2: f32) -> f32 {
    let mut s = x;
    for _ in 0..8 {
        let err = bezier(s, x1, x2) - x;
        if err.abs() < 1e-5 {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = x;
    for _ in 0..32 {
        let cur = bezier(s, x1, x2);
        if (cur - x).abs() < 1e-5 {
            break;
        }
        if cur < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_fixed() {
        for timing in [
            TimingFunction::Linear,
            TimingFunction::Ease,
            TimingFunction::EaseIn,
            TimingFunction::EaseOut,
            TimingFunction::EaseInOut,
            TimingFunction::CubicBezier(0.0, 0.0, 0.2, 1.0),
        ] {
            assert!(timing.evaluate(0.0).abs() < 1e-3, "{timing} at 0");
            assert!((timing.evaluate(1.0) - 1.0).abs() < 1e-3, "{timing} at 1");
        }
    }

    #[test]
    fn test_ease_in_lags_and_ease_out_leads() {
        assert!(TimingFunction::EaseIn.evaluate(0.5) < 0.5);
        assert!(TimingFunction::EaseOut.evaluate(0.5) > 0.5);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(TimingFunction::Linear.evaluate(1.7), 1.0);
        assert_eq!(TimingFunction::Linear.evaluate(-0.2), 0.0);
    }

    #[test]
    fn test_css_names() {
        assert_eq!(TimingFunction::Ease.to_string(), "ease");
        assert_eq!(
            TimingFunction::CubicBezier(0.0, 0.2, 0.8, 1.0).to_string(),
            "cubic-bezier(0, 0.2, 0.8, 1)"
        );
    }

    #[test]
    fn test_out_of_range_control_point_rejected() {
        assert!(TimingFunction::CubicBezier(1.5, 0.0, 0.5, 1.0)
            .validate()
            .is_err());
        assert!(TimingFunction::CubicBezier(0.0, -2.0, 0.5, 3.0)
            .validate()
            .is_ok());
    }
}
