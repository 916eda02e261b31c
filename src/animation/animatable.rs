/// Values a headless host can interpolate while a transition is in flight.
pub trait Animatable: Clone + PartialEq {
    /// t = 0.0 returns `from`, t = 1.0 returns `to`
    fn lerp(from: &Self, to: &Self, t: f32) -> Self;
}

impl Animatable for f32 {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

/// Absent on either side means "not animated": the destination wins.
impl<T: Animatable> Animatable for Option<T> {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        match (from, to) {
            (Some(a), Some(b)) => Some(T::lerp(a, b, t)),
            _ => to.clone(),
        }
    }
}
