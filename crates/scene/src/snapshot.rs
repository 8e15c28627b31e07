use foundation::color::Rgb;
use glam::{Mat4, Vec3};
use runtime::frame::Frame;

use crate::globe::TextureSlot;

/// Everything a renderer needs to draw one frame, copied out of the scene.
///
/// Plain data: renderers never reach back into scene objects.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub frame: Frame,
    /// Backing-store size in physical pixels.
    pub viewport: (u32, u32),
    pub view: Mat4,
    pub projection: Mat4,
    pub view_proj: Mat4,
    pub camera_position: Vec3,
    pub globe_model: Mat4,
    pub atmosphere_model: Mat4,
    pub mix_amount: f32,
    pub day_texture: TextureSlot,
    pub night_texture: TextureSlot,
    pub particle_color: Rgb,
    pub particle_time: f64,
    pub particle_count: u32,
}

impl FrameSnapshot {
    /// Drift phase as seen by the vertex stage, wrapped to keep `sin`
    /// precise over long sessions.
    pub fn particle_phase(&self) -> f32 {
        // sin(t * 0.5) repeats every 4π seconds.
        self.particle_time.rem_euclid(4.0 * std::f64::consts::PI) as f32
    }
}
