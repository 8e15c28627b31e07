//! Time-bounded eases between property values.
//!
//! [`Tween`] is a single ease from one value to another. [`Animated`] wraps a
//! property and owns at most one in-flight tween: starting a new ease
//! supersedes the old one, beginning from wherever the property currently is.
//! Everything is advanced explicitly with a delta time, so there are no hidden
//! timers and replays are deterministic.

use foundation::math::Lerp;
use serde::{Deserialize, Serialize};

/// Easing curve mapping linear progress `t ∈ [0, 1]` to eased progress.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Quadratic ease-out, fast start with a soft landing.
    #[default]
    QuadOut,
    CubicInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 };
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

fn sanitize_duration(duration_s: f32) -> f32 {
    if duration_s.is_finite() {
        duration_s.max(0.0)
    } else {
        0.0
    }
}

/// One ease from `from` to `to` over `duration_s`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    duration_s: f32,
    elapsed_s: f32,
    easing: Easing,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration_s: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_s: sanitize_duration(duration_s),
            elapsed_s: 0.0,
            easing,
        }
    }

    pub fn from(&self) -> T {
        self.from
    }

    pub fn to(&self) -> T {
        self.to
    }

    pub fn duration_s(&self) -> f32 {
        self.duration_s
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration_s <= 0.0 {
            1.0
        } else {
            (self.elapsed_s / self.duration_s).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_s >= self.duration_s
    }

    /// Current value. Exactly `to` once finished, never a rounding neighbour.
    pub fn value(&self) -> T {
        if self.is_finished() {
            self.to
        } else {
            self.from.lerp_to(self.to, self.easing.apply(self.progress()))
        }
    }

    /// Step forward by `dt_s` (negative or NaN steps are ignored).
    pub fn advance(&mut self, dt_s: f32) -> T {
        if dt_s.is_finite() && dt_s > 0.0 {
            self.elapsed_s = (self.elapsed_s + dt_s).min(self.duration_s);
        }
        self.value()
    }

    pub fn restart(&mut self) {
        self.elapsed_s = 0.0;
    }

    /// Lazy sequence of the values this tween passes through when stepped by
    /// `step_s`, from the start and ending with exactly `to`.
    ///
    /// Each call starts from the beginning, so the sequence can be replayed.
    pub fn samples(&self, step_s: f32) -> TweenSamples<T> {
        let mut tween = *self;
        tween.restart();
        TweenSamples {
            tween,
            step_s,
            done: false,
        }
    }
}

/// Iterator returned by [`Tween::samples`].
#[derive(Debug, Clone)]
pub struct TweenSamples<T> {
    tween: Tween<T>,
    step_s: f32,
    done: bool,
}

impl<T: Lerp> Iterator for TweenSamples<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.done {
            return None;
        }
        if !(self.step_s.is_finite() && self.step_s > 0.0) {
            self.done = true;
            return Some(self.tween.to());
        }
        let value = self.tween.value();
        if self.tween.is_finished() {
            self.done = true;
        } else {
            self.tween.advance(self.step_s);
        }
        Some(value)
    }
}

/// A property value plus at most one in-flight ease toward a target.
#[derive(Debug, Clone, PartialEq)]
pub struct Animated<T> {
    current: T,
    tween: Option<Tween<T>>,
}

impl<T: Lerp + PartialEq> Animated<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            tween: None,
        }
    }

    pub fn value(&self) -> T {
        self.current
    }

    /// Where the property is heading: the tween's end, or the current value.
    pub fn target(&self) -> T {
        self.tween.map(|t| t.to()).unwrap_or(self.current)
    }

    pub fn is_settled(&self) -> bool {
        self.tween.is_none()
    }

    /// Ease toward `target`, superseding any in-flight ease.
    ///
    /// Re-issuing the target that is already being eased toward keeps the
    /// running tween, so repeated identical events converge on schedule
    /// instead of restarting forever.
    pub fn ease_to(&mut self, target: T, duration_s: f32, easing: Easing) {
        if self.target() == target {
            return;
        }
        let duration_s = sanitize_duration(duration_s);
        if duration_s <= 0.0 {
            self.set(target);
            return;
        }
        self.tween = Some(Tween::new(self.current, target, duration_s, easing));
    }

    /// Jump straight to `value`, cancelling any in-flight ease.
    pub fn set(&mut self, value: T) {
        self.current = value;
        self.tween = None;
    }

    pub fn advance(&mut self, dt_s: f32) -> T {
        if let Some(tween) = self.tween.as_mut() {
            self.current = tween.advance(dt_s);
            if tween.is_finished() {
                self.tween = None;
            }
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::{Animated, Easing, Tween};
    use glam::Vec2;

    #[test]
    fn easing_curves_fix_endpoints() {
        for easing in [Easing::Linear, Easing::QuadOut, Easing::CubicInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
        assert!(Easing::QuadOut.apply(0.5) > 0.5);
    }

    #[test]
    fn tween_lands_exactly_on_target() {
        let mut t = Tween::new(0.0f32, 1.0, 1.0, Easing::QuadOut);
        for _ in 0..7 {
            t.advance(0.1);
        }
        assert!(!t.is_finished());
        assert!(t.value() > 0.0 && t.value() < 1.0);
        t.advance(10.0);
        assert!(t.is_finished());
        assert_eq!(t.value(), 1.0);
    }

    #[test]
    fn zero_duration_tween_is_already_finished() {
        let t = Tween::new(3.0f32, 5.0, 0.0, Easing::Linear);
        assert!(t.is_finished());
        assert_eq!(t.value(), 5.0);
        let t = Tween::new(3.0f32, 5.0, f32::NAN, Easing::Linear);
        assert_eq!(t.value(), 5.0);
    }

    #[test]
    fn samples_are_lazy_and_replayable() {
        let t = Tween::new(0.0f32, 1.0, 1.0, Easing::Linear);
        let first: Vec<f32> = t.samples(0.25).collect();
        assert_eq!(first.len(), 5);
        assert_eq!(first[0], 0.0);
        assert_eq!(*first.last().unwrap(), 1.0);
        let again: Vec<f32> = t.samples(0.25).collect();
        assert_eq!(first, again);
        assert_eq!(t.samples(0.0).collect::<Vec<_>>(), vec![1.0]);
    }

    #[test]
    fn new_ease_supersedes_from_current_value() {
        let mut a = Animated::new(0.0f32);
        a.ease_to(1.0, 1.0, Easing::Linear);
        a.advance(0.5);
        assert!((a.value() - 0.5).abs() < 1e-6);

        a.ease_to(-1.0, 1.0, Easing::Linear);
        assert_eq!(a.target(), -1.0);
        a.advance(0.5);
        assert!((a.value() - -0.25).abs() < 1e-6);
        a.advance(0.5);
        assert_eq!(a.value(), -1.0);
        assert!(a.is_settled());
    }

    #[test]
    fn same_target_does_not_restart() {
        let mut a = Animated::new(0.0f32);
        a.ease_to(1.0, 1.0, Easing::Linear);
        a.advance(0.6);
        a.ease_to(1.0, 1.0, Easing::Linear);
        a.advance(0.4);
        assert_eq!(a.value(), 1.0);
        assert!(a.is_settled());
    }

    #[test]
    fn set_cancels_in_flight_ease() {
        let mut a = Animated::new(0.0f32);
        a.ease_to(1.0, 1.0, Easing::Linear);
        a.set(0.3);
        assert!(a.is_settled());
        assert_eq!(a.advance(1.0), 0.3);
    }

    #[test]
    fn vectors_ease_componentwise() {
        let mut a = Animated::new(Vec2::ZERO);
        a.ease_to(Vec2::new(2.0, -4.0), 1.0, Easing::Linear);
        assert_eq!(a.advance(0.5), Vec2::new(1.0, -2.0));
    }

    #[test]
    fn easing_names_are_snake_case() {
        let e: Easing = serde_json::from_str("\"cubic_in_out\"").unwrap();
        assert_eq!(e, Easing::CubicInOut);
        assert_eq!(serde_json::to_string(&Easing::QuadOut).unwrap(), "\"quad_out\"");
    }
}
