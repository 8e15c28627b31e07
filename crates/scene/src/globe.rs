//! The textured globe and its atmosphere shell.
//!
//! The globe itself is a unit sphere scaled by the model matrix. Pointer and
//! scroll bias arrive as targets and are eased into the rotation; scroll depth
//! is eased into the day/night mix.

use foundation::math::sanitize_unit;
use glam::{EulerRot, Mat4, Vec2, Vec3};
use runtime::animator::{Animated, Easing};

use crate::config::GlobeConfig;

/// Load state of one globe texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TextureSlot {
    #[default]
    Pending,
    Ready {
        width: u32,
        height: u32,
    },
    Failed,
}

impl TextureSlot {
    pub fn is_ready(self) -> bool {
        matches!(self, TextureSlot::Ready { .. })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureRole {
    Day,
    Night,
}

impl TextureRole {
    pub fn label(self) -> &'static str {
        match self {
            TextureRole::Day => "day",
            TextureRole::Night => "night",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeUniforms {
    pub day_texture: TextureSlot,
    pub night_texture: TextureSlot,
    /// 0 = full day, 1 = full night.
    pub mix_amount: f32,
}

#[derive(Debug, Clone)]
pub struct Globe {
    radius: f32,
    atmosphere_scale: f32,
    /// `(x, y)` Euler angles in radians.
    rotation: Animated<Vec2>,
    mix: Animated<f32>,
    day_texture: TextureSlot,
    night_texture: TextureSlot,
    rotation_ease_s: f32,
    mix_ease_s: f32,
    easing: Easing,
    pitch_factor: f32,
    yaw_factor: f32,
}

impl Globe {
    pub fn new(config: &GlobeConfig) -> Self {
        Self {
            radius: config.globe.radius,
            atmosphere_scale: config.atmosphere.scale,
            rotation: Animated::new(Vec2::ZERO),
            mix: Animated::new(0.0),
            day_texture: TextureSlot::Pending,
            night_texture: TextureSlot::Pending,
            rotation_ease_s: config.globe.rotation_ease_ms / 1000.0,
            mix_ease_s: config.globe.mix_ease_ms / 1000.0,
            easing: config.interaction.easing,
            pitch_factor: config.interaction.pitch_factor,
            yaw_factor: config.interaction.yaw_factor,
        }
    }

    /// Ease the rotation toward `(-pitch * pitch_factor, yaw * yaw_factor + scroll_yaw)`.
    pub fn set_bias(&mut self, pitch: f32, yaw: f32, scroll_yaw: f32) {
        let target = Vec2::new(-pitch * self.pitch_factor, yaw * self.yaw_factor + scroll_yaw);
        if !target.is_finite() {
            log::warn!("ignoring non-finite globe bias {target:?}");
            return;
        }
        self.rotation.ease_to(target, self.rotation_ease_s, self.easing);
    }

    pub fn set_mix_target(&mut self, mix: f32) {
        self.mix.ease_to(sanitize_unit(mix), self.mix_ease_s, self.easing);
    }

    pub fn advance(&mut self, dt_s: f32) {
        self.rotation.advance(dt_s);
        self.mix.advance(dt_s);
    }

    pub fn rotation(&self) -> Vec2 {
        self.rotation.value()
    }

    pub fn model_matrix(&self) -> Mat4 {
        let r = self.rotation.value();
        Mat4::from_euler(EulerRot::XYZ, r.x, r.y, 0.0) * Mat4::from_scale(Vec3::splat(self.radius))
    }

    /// The shell does not follow the globe's rotation; its shading only
    /// depends on the view-space normal.
    pub fn atmosphere_matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(self.radius * self.atmosphere_scale))
    }

    pub fn set_texture_state(&mut self, role: TextureRole, slot: TextureSlot) {
        log::debug!("{} texture -> {slot:?}", role.label());
        match role {
            TextureRole::Day => self.day_texture = slot,
            TextureRole::Night => self.night_texture = slot,
        }
    }

    pub fn uniforms(&self) -> GlobeUniforms {
        GlobeUniforms {
            day_texture: self.day_texture,
            night_texture: self.night_texture,
            mix_amount: sanitize_unit(self.mix.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Globe, TextureRole, TextureSlot};
    use crate::config::GlobeConfig;
    use glam::{Vec3, Vec4Swizzles};

    fn settle(globe: &mut Globe) {
        for _ in 0..200 {
            globe.advance(1.0 / 60.0);
        }
    }

    #[test]
    fn mix_target_is_clamped() {
        let mut globe = Globe::new(&GlobeConfig::default());
        globe.set_mix_target(3.0);
        settle(&mut globe);
        assert_eq!(globe.uniforms().mix_amount, 1.0);
        globe.set_mix_target(f32::NAN);
        settle(&mut globe);
        assert_eq!(globe.uniforms().mix_amount, 0.0);
    }

    #[test]
    fn bias_maps_to_rotation() {
        let mut globe = Globe::new(&GlobeConfig::default());
        globe.set_bias(0.2, 0.4, 0.5);
        settle(&mut globe);
        let r = globe.rotation();
        assert!((r.x - -0.1).abs() < 1e-6);
        assert!((r.y - 0.7).abs() < 1e-6);
    }

    #[test]
    fn model_matrix_scales_by_radius() {
        let globe = Globe::new(&GlobeConfig::default());
        let p = globe.model_matrix() * Vec3::X.extend(1.0);
        assert!((p.xyz() - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
        let a = globe.atmosphere_matrix() * Vec3::Y.extend(1.0);
        assert!((a.y - 5.25).abs() < 1e-5);
    }

    #[test]
    fn texture_slots_start_pending() {
        let mut globe = Globe::new(&GlobeConfig::default());
        assert_eq!(globe.uniforms().day_texture, TextureSlot::Pending);
        globe.set_texture_state(TextureRole::Night, TextureSlot::Failed);
        globe.set_texture_state(
            TextureRole::Day,
            TextureSlot::Ready {
                width: 2,
                height: 1,
            },
        );
        let u = globe.uniforms();
        assert!(u.day_texture.is_ready());
        assert_eq!(u.night_texture, TextureSlot::Failed);
    }
}
