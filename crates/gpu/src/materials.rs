//! Fixed-function state for each material, and its wgpu translation.

use crate::shaders;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    DayNightGlobe,
    AtmosphereRim,
    ParticleGlow,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlendMode {
    Opaque,
    /// `src + dst` on color and alpha.
    Additive,
}

/// Which faces are rasterized.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    Double,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MaterialDescriptor {
    pub kind: MaterialKind,
    pub label: &'static str,
    pub source: &'static str,
    pub blend: BlendMode,
    pub side: Side,
    pub depth_write: bool,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 3] = [
        MaterialKind::DayNightGlobe,
        MaterialKind::AtmosphereRim,
        MaterialKind::ParticleGlow,
    ];

    pub fn descriptor(self) -> MaterialDescriptor {
        match self {
            MaterialKind::DayNightGlobe => MaterialDescriptor {
                kind: self,
                label: "globe-day-night",
                source: shaders::DAY_NIGHT_GLOBE,
                blend: BlendMode::Opaque,
                side: Side::Front,
                depth_write: true,
            },
            MaterialKind::AtmosphereRim => MaterialDescriptor {
                kind: self,
                label: "globe-atmosphere",
                source: shaders::ATMOSPHERE_RIM,
                blend: BlendMode::Additive,
                side: Side::Back,
                depth_write: false,
            },
            MaterialKind::ParticleGlow => MaterialDescriptor {
                kind: self,
                label: "globe-particles",
                source: shaders::PARTICLE_GLOW,
                blend: BlendMode::Additive,
                side: Side::Double,
                depth_write: false,
            },
        }
    }

    /// Whether the program samples the globe textures at bindings 1..=3.
    pub fn uses_textures(self) -> bool {
        matches!(self, MaterialKind::DayNightGlobe)
    }

    /// Bind group 0: the uniform block, then day/night textures and a sampler
    /// for textured programs.
    pub fn layout_entries(self) -> Vec<wgpu::BindGroupLayoutEntry> {
        let mut entries = vec![wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }];
        if self.uses_textures() {
            for binding in [1, 2] {
                entries.push(wgpu::BindGroupLayoutEntry {
                    binding,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                });
            }
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            });
        }
        entries
    }
}

impl MaterialDescriptor {
    pub fn blend_state(&self) -> wgpu::BlendState {
        match self.blend {
            BlendMode::Opaque => wgpu::BlendState::REPLACE,
            BlendMode::Additive => {
                let add = wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                };
                wgpu::BlendState {
                    color: add,
                    alpha: add,
                }
            }
        }
    }

    /// Faces are counter-clockwise when seen from outside the mesh.
    pub fn cull_mode(&self) -> Option<wgpu::Face> {
        match self.side {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Double => None,
        }
    }

    pub fn primitive_state(&self) -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: self.cull_mode(),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        }
    }

    /// Every material is depth tested; only opaque ones write depth.
    pub fn depth_stencil(&self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format,
            depth_write_enabled: self.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }

    pub fn color_target(&self, format: wgpu::TextureFormat) -> wgpu::ColorTargetState {
        wgpu::ColorTargetState {
            format,
            blend: Some(self.blend_state()),
            write_mask: wgpu::ColorWrites::ALL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BlendMode, MaterialKind};

    #[test]
    fn globe_is_opaque_and_writes_depth() {
        let d = MaterialKind::DayNightGlobe.descriptor();
        assert_eq!(d.blend, BlendMode::Opaque);
        assert_eq!(d.blend_state(), wgpu::BlendState::REPLACE);
        assert_eq!(d.cull_mode(), Some(wgpu::Face::Back));
        assert!(d.depth_stencil(wgpu::TextureFormat::Depth24Plus).depth_write_enabled);
    }

    #[test]
    fn atmosphere_renders_back_faces_additively() {
        let d = MaterialKind::AtmosphereRim.descriptor();
        assert_eq!(d.cull_mode(), Some(wgpu::Face::Front));
        let blend = d.blend_state();
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::One);
        assert!(!d.depth_stencil(wgpu::TextureFormat::Depth24Plus).depth_write_enabled);
    }

    #[test]
    fn only_the_globe_samples_textures() {
        let textured: Vec<_> = MaterialKind::ALL
            .into_iter()
            .filter(|k| k.uses_textures())
            .collect();
        assert_eq!(textured, vec![MaterialKind::DayNightGlobe]);
        assert_eq!(MaterialKind::ParticleGlow.descriptor().cull_mode(), None);
    }

    #[test]
    fn layouts_follow_texture_use() {
        let bindings = |kind: MaterialKind| -> Vec<u32> {
            kind.layout_entries().iter().map(|e| e.binding).collect()
        };
        assert_eq!(bindings(MaterialKind::DayNightGlobe), vec![0, 1, 2, 3]);
        assert_eq!(bindings(MaterialKind::AtmosphereRim), vec![0]);
        assert_eq!(bindings(MaterialKind::ParticleGlow), vec![0]);
        let sampler = &MaterialKind::DayNightGlobe.layout_entries()[3];
        assert!(matches!(sampler.ty, wgpu::BindingType::Sampler(_)));
    }
}
