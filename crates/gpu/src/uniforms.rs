//! Uniform blocks, laid out for WGSL `var<uniform>` (16-byte aligned).
//!
//! Every block is built from a [`FrameSnapshot`] and sanitized on the way:
//! a single NaN in a uniform blacks out the whole draw with no error.

use bytemuck::{Pod, Zeroable};
use foundation::color::Rgb;
use foundation::math::{finite_or, sanitize_unit};
use glam::Mat4;
use scene::config::ShadingConfig;
use scene::snapshot::FrameSnapshot;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GlobeUniformBlock {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub tint: [f32; 4],
    /// mix amount, intensity bias, scatter exponent, scatter weight
    pub params: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct AtmosphereUniformBlock {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub tint: [f32; 4],
    /// rim bias, rim exponent, unused, unused
    pub params: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ParticleUniformBlock {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// time, billboard half-size, drift amplitude, unused
    pub params: [f32; 4],
}

fn mat(m: Mat4) -> [[f32; 4]; 4] {
    if m.is_finite() {
        m.to_cols_array_2d()
    } else {
        log::warn!("non-finite matrix replaced by identity");
        Mat4::IDENTITY.to_cols_array_2d()
    }
}

fn color(c: Rgb) -> [f32; 4] {
    c.clamped().to_vec4(1.0)
}

impl GlobeUniformBlock {
    pub fn from_snapshot(s: &FrameSnapshot, shading: &ShadingConfig) -> Self {
        Self {
            model: mat(s.globe_model),
            view: mat(s.view),
            view_proj: mat(s.view_proj),
            tint: color(shading.globe_tint),
            params: [
                sanitize_unit(s.mix_amount),
                finite_or(shading.intensity_bias, 1.05),
                finite_or(shading.scatter_exponent, 1.5).max(0.0),
                finite_or(shading.scatter_weight, 0.3).max(0.0),
            ],
        }
    }
}

impl AtmosphereUniformBlock {
    pub fn from_snapshot(s: &FrameSnapshot, shading: &ShadingConfig) -> Self {
        Self {
            model: mat(s.atmosphere_model),
            view: mat(s.view),
            view_proj: mat(s.view_proj),
            tint: color(shading.rim_tint),
            params: [
                finite_or(shading.rim_bias, 0.7),
                finite_or(shading.rim_exponent, 2.0).max(0.0),
                0.0,
                0.0,
            ],
        }
    }
}

impl ParticleUniformBlock {
    pub fn from_snapshot(s: &FrameSnapshot, shading: &ShadingConfig) -> Self {
        Self {
            view: mat(s.view),
            projection: mat(s.projection),
            color: color(s.particle_color),
            params: [
                finite_or(s.particle_phase(), 0.0),
                finite_or(shading.particle_size, 0.35).max(0.0),
                finite_or(shading.drift_amplitude, 0.0),
                0.0,
            ],
        }
    }
}
