use foundation::color::Rgb;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::ParticleSettings;

/// One point of the starfield. Layout matches the instance buffer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParticlePoint {
    pub position: [f32; 3],
    pub scale: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParticleUniforms {
    pub color: Rgb,
    /// Seconds since construction. Drives the drift in the vertex stage.
    ///
    /// Kept in `f64` so a frame step still registers after days of uptime.
    pub time: f64,
}

/// A fixed set of glowing points scattered in a cube around the globe.
///
/// Positions never change on the CPU; drift is computed from `time` on the GPU.
#[derive(Debug, Clone)]
pub struct ParticleField {
    points: Box<[ParticlePoint]>,
    uniforms: ParticleUniforms,
}

impl ParticleField {
    pub fn new(settings: &ParticleSettings, color: Rgb) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
        let half = settings.extent * 0.5;
        let span = settings.max_scale - settings.min_scale;
        let points = (0..settings.count)
            .map(|_| {
                let mut coord = || (rng.random::<f32>() - 0.5) * settings.extent;
                let position = [coord(), coord(), coord()];
                let scale = settings.min_scale + rng.random::<f32>() * span;
                debug_assert!(position.iter().all(|c| c.abs() <= half));
                ParticlePoint { position, scale }
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        log::debug!("particle field: {} points, seed {:#x}", points.len(), settings.seed);

        Self {
            points,
            uniforms: ParticleUniforms {
                color: color.clamped(),
                time: 0.0,
            },
        }
    }

    pub fn points(&self) -> &[ParticlePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Negative or non-finite steps add nothing.
    pub fn advance_time(&mut self, dt_s: f32) {
        if dt_s.is_finite() && dt_s > 0.0 {
            self.uniforms.time += f64::from(dt_s);
        }
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.uniforms.color = color.clamped();
    }

    pub fn uniforms(&self) -> ParticleUniforms {
        self.uniforms
    }
}

#[cfg(test)]
mod tests {
    use super::ParticleField;
    use crate::config::ParticleSettings;
    use foundation::color::Rgb;

    #[test]
    fn same_seed_same_field() {
        let settings = ParticleSettings::default();
        let a = ParticleField::new(&settings, Rgb::WHITE);
        let b = ParticleField::new(&settings, Rgb::WHITE);
        assert_eq!(a.points(), b.points());

        let other = ParticleField::new(
            &ParticleSettings {
                seed: 7,
                ..settings
            },
            Rgb::WHITE,
        );
        assert_ne!(a.points(), other.points());
    }

    #[test]
    fn points_stay_inside_bounds() {
        let settings = ParticleSettings::default();
        let field = ParticleField::new(&settings, Rgb::WHITE);
        assert_eq!(field.len(), 2000);
        for p in field.points() {
            assert!(p.position.iter().all(|c| c.abs() <= 30.0));
            assert!(p.scale >= 0.2 && p.scale < 1.0);
        }
    }

    #[test]
    fn time_is_monotonic() {
        let mut field = ParticleField::new(&ParticleSettings::default(), Rgb::WHITE);
        field.advance_time(0.5);
        field.advance_time(-1.0);
        field.advance_time(f32::NAN);
        assert_eq!(field.uniforms().time, 0.5);
    }

    #[test]
    fn time_keeps_advancing_after_long_uptime() {
        let mut field = ParticleField::new(&ParticleSettings::default(), Rgb::WHITE);
        field.advance_time(530_000.0);
        let before = field.uniforms().time;
        for _ in 0..600 {
            field.advance_time(1.0 / 60.0);
        }
        let elapsed = field.uniforms().time - before;
        assert!((elapsed - 10.0).abs() < 1e-3, "elapsed {elapsed}");
    }

    #[test]
    fn color_is_clamped() {
        let mut field = ParticleField::new(&ParticleSettings::default(), Rgb::WHITE);
        field.set_color(Rgb::new(2.0, -1.0, 0.5));
        assert_eq!(field.uniforms().color, Rgb::new(1.0, 0.0, 0.5));
    }
}
