use glam::{Vec2, Vec3};

/// Linear interpolation between two values of the same type.
///
/// `t` is not clamped; easing curves are expected to stay inside `[0, 1]`.
pub trait Lerp: Copy {
    fn lerp_to(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

impl Lerp for Vec3 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

#[cfg(test)]
mod tests {
    use super::Lerp;
    use glam::Vec2;

    #[test]
    fn scalar_endpoints() {
        assert_eq!(2.0f32.lerp_to(6.0, 0.0), 2.0);
        assert_eq!(2.0f32.lerp_to(6.0, 1.0), 6.0);
        assert_eq!(2.0f32.lerp_to(6.0, 0.5), 4.0);
    }

    #[test]
    fn vec2_midpoint() {
        let v = Vec2::new(0.0, 2.0).lerp_to(Vec2::new(2.0, 0.0), 0.5);
        assert_eq!(v, Vec2::new(1.0, 1.0));
    }
}
