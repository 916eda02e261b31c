use std::fmt;

use super::Animatable;

/// 2D transform applied on top of an element's laid-out position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation in px
    pub translate: (f32, f32),
    /// Scale in x and y (1.0 = no scale)
    pub scale: (f32, f32),
    /// Rotation in degrees (clockwise)
    pub rotate: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translate: (0.0, 0.0),
        scale: (1.0, 1.0),
        rotate: 0.0,
    };

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            translate: (x, y),
            ..Self::IDENTITY
        }
    }

    pub fn translate_x(x: f32) -> Self {
        Self::translate(x, 0.0)
    }

    pub fn translate_y(y: f32) -> Self {
        Self::translate(0.0, y)
    }

    pub fn scale(factor: f32) -> Self {
        Self {
            scale: (factor, factor),
            ..Self::IDENTITY
        }
    }

    pub fn rotate(degrees: f32) -> Self {
        Self {
            rotate: degrees,
            ..Self::IDENTITY
        }
    }

    pub fn with_scale(mut self, factor: f32) -> Self {
        self.scale = (factor, factor);
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotate = degrees;
        self
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// CSS `transform` value.
impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return write!(f, "none");
        }
        let mut parts = Vec::new();
        if self.translate != (0.0, 0.0) {
            parts.push(format!(
                "translate({}px, {}px)",
                self.translate.0, self.translate.1
            ));
        }
        if self.scale != (1.0, 1.0) {
            if self.scale.0 == self.scale.1 {
                parts.push(format!("scale({})", self.scale.0));
            } else {
                parts.push(format!("scale({}, {})", self.scale.0, self.scale.1));
            }
        }
        if self.rotate != 0.0 {
            parts.push(format!("rotate({}deg)", self.rotate));
        }
        write!(f, "{}", parts.join(" "))
    }
}

impl Animatable for Transform {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Transform {
            translate: (
                f32::lerp(&from.translate.0, &to.translate.0, t),
                f32::lerp(&from.translate.1, &to.translate.1, t),
            ),
            scale: (
                f32::lerp(&from.scale.0, &to.scale.0, t),
                f32::lerp(&from.scale.1, &to.scale.1, t),
            ),
            rotate: f32::lerp(&from.rotate, &to.rotate, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_renders_none() {
        assert_eq!(Transform::IDENTITY.to_string(), "none");
    }

    #[test]
    fn test_css_output() {
        assert_eq!(
            Transform::translate_y(30.0).to_string(),
            "translate(0px, 30px)"
        );
        assert_eq!(
            Transform::translate_y(-10.0).with_scale(1.03).to_string(),
            "translate(0px, -10px) scale(1.03)"
        );
        assert_eq!(Transform::rotate(90.0).to_string(), "rotate(90deg)");
    }

    #[test]
    fn test_lerp_midpoint() {
        let mid = Transform::lerp(&Transform::translate_y(30.0), &Transform::IDENTITY, 0.5);
        assert_eq!(mid.translate, (0.0, 15.0));
        assert_eq!(mid.scale, (1.0, 1.0));
    }
}
