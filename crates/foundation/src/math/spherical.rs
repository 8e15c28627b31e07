use glam::Vec3;

const EPS: f32 = 1e-6;

/// Spherical coordinates with a +Y pole.
///
/// `phi` is the polar angle measured from +Y, `theta` the azimuth around Y
/// measured from +Z toward +X.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Default for Spherical {
    fn default() -> Self {
        Self {
            radius: 1.0,
            phi: 0.0,
            theta: 0.0,
        }
    }
}

impl Spherical {
    pub fn new(radius: f32, phi: f32, theta: f32) -> Self {
        Self { radius, phi, theta }
    }

    pub fn from_vec3(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_vec3(self) -> Vec3 {
        let sin_phi_r = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_r * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_r * self.theta.cos(),
        )
    }

    /// Keep `phi` off the poles so the look-at basis never degenerates.
    pub fn make_safe(&mut self) {
        self.phi = self.phi.clamp(EPS, std::f32::consts::PI - EPS);
    }
}

#[cfg(test)]
mod tests {
    use super::Spherical;
    use glam::Vec3;

    #[test]
    fn round_trips_through_cartesian() {
        let v = Vec3::new(3.0, -2.0, 5.0);
        let back = Spherical::from_vec3(v).to_vec3();
        assert!((back - v).length() < 1e-4);
    }

    #[test]
    fn plus_z_has_zero_azimuth() {
        let s = Spherical::from_vec3(Vec3::new(0.0, 0.0, 15.0));
        assert!((s.radius - 15.0).abs() < 1e-6);
        assert!(s.theta.abs() < 1e-6);
        assert!((s.phi - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn make_safe_moves_off_poles() {
        let mut s = Spherical::new(1.0, 0.0, 0.0);
        s.make_safe();
        assert!(s.phi > 0.0);
        let mut s = Spherical::new(1.0, std::f32::consts::PI, 0.0);
        s.make_safe();
        assert!(s.phi < std::f32::consts::PI);
    }
}
