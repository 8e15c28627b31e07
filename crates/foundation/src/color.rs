use serde::{Deserialize, Serialize};

use crate::math::{Lerp, sanitize_unit};

/// Linear RGB color with components in `[0, 1]`.
///
/// Serialized as a plain `[r, g, b]` array so config files stay terse.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Every component clamped to `[0, 1]`, NaN mapped to 0.
    pub fn clamped(self) -> Self {
        Self::new(
            sanitize_unit(self.r),
            sanitize_unit(self.g),
            sanitize_unit(self.b),
        )
    }

    pub fn is_normalized(self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// `[r, g, b, a]` for a `vec4<f32>` uniform slot.
    pub fn to_vec4(self, a: f32) -> [f32; 4] {
        [self.r, self.g, self.b, a]
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(c: Rgb) -> Self {
        c.to_array()
    }
}

impl Lerp for Rgb {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        Self::new(
            self.r.lerp_to(to.r, t),
            self.g.lerp_to(to.g, t),
            self.b.lerp_to(to.b, t),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Rgb;
    use crate::math::Lerp;

    #[test]
    fn clamped_stays_in_unit_range() {
        let c = Rgb::new(1.5, -0.2, f32::NAN).clamped();
        assert_eq!(c, Rgb::new(1.0, 0.0, 0.0));
        assert!(c.is_normalized());
        assert!(!Rgb::new(1.2, 0.0, 0.0).is_normalized());
    }

    #[test]
    fn lerp_hits_endpoints() {
        let a = Rgb::BLACK;
        let b = Rgb::WHITE;
        assert_eq!(a.lerp_to(b, 0.0), a);
        assert_eq!(a.lerp_to(b, 1.0), b);
    }

    #[test]
    fn serializes_as_array() {
        let json = serde_json::to_string(&Rgb::new(1.0, 0.5, 0.0)).unwrap();
        assert_eq!(json, "[1.0,0.5,0.0]");
        let back: Rgb = serde_json::from_str("[0.25,0.5,1.0]").unwrap();
        assert_eq!(back, Rgb::new(0.25, 0.5, 1.0));
    }
}
