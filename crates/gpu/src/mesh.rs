use bytemuck::{Pod, Zeroable};
use scene::particles::ParticlePoint;

/// Vertices drawn per particle instance (two triangles).
pub const QUAD_VERTEX_COUNT: u32 = 6;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl SphereVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SphereVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 1,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 24,
                shader_location: 2,
            },
        ],
    };
}

/// Per-instance particle data.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub scale: f32,
}

impl ParticleInstance {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ParticleInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32,
                offset: 12,
                shader_location: 1,
            },
        ],
    };

    pub fn from_points(points: &[ParticlePoint]) -> Vec<ParticleInstance> {
        points
            .iter()
            .map(|p| ParticleInstance {
                position: p.position,
                scale: p.scale,
            })
            .collect()
    }
}

/// Unit UV sphere with a +Y pole. `u` runs with longitude, `v` from the
/// north pole (0) to the south pole (1), matching row 0 of an equirectangular image.
#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u16>,
}

impl SphereMesh {
    pub fn generate(width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut vertices =
            Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let theta = v * std::f32::consts::PI;
            let (sin_t, cos_t) = theta.sin_cos();

            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let phi = u * std::f32::consts::TAU;
                let (sin_p, cos_p) = phi.sin_cos();

                let p = [-cos_p * sin_t, cos_t, sin_p * sin_t];
                vertices.push(SphereVertex {
                    position: p,
                    normal: p,
                    uv: [u, v],
                });
            }
        }

        let stride = width_segments + 1;
        let mut indices = Vec::with_capacity((width_segments * (height_segments - 1) * 6) as usize);
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * stride + ix + 1;
                let b = iy * stride + ix;
                let c = (iy + 1) * stride + ix;
                let d = (iy + 1) * stride + ix + 1;

                // The first and last rows collapse to a point; skip their degenerate halves.
                if iy != 0 {
                    indices.extend([a as u16, b as u16, d as u16]);
                }
                if iy != height_segments - 1 {
                    indices.extend([b as u16, c as u16, d as u16]);
                }
            }
        }

        Self { vertices, indices }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::{ParticleInstance, SphereMesh, SphereVertex};
    use glam::Vec3;

    fn pos(mesh: &SphereMesh, i: u16) -> Vec3 {
        Vec3::from(mesh.vertices[i as usize].position)
    }

    #[test]
    fn topology_counts() {
        let mesh = SphereMesh::generate(64, 64);
        assert_eq!(mesh.vertices.len(), 65 * 65);
        assert_eq!(mesh.indices.len(), 64 * 63 * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn vertices_are_on_the_unit_sphere() {
        let mesh = SphereMesh::generate(16, 8);
        for v in &mesh.vertices {
            assert!((Vec3::from(v.position).length() - 1.0).abs() < 1e-5);
            assert_eq!(v.position, v.normal);
            assert!((0.0..=1.0).contains(&v.uv[0]) && (0.0..=1.0).contains(&v.uv[1]));
        }
        assert_eq!(mesh.vertices[0].position[1], 1.0);
    }

    #[test]
    fn triangles_face_outward() {
        let mesh = SphereMesh::generate(24, 12);
        for tri in mesh.indices.chunks_exact(3) {
            let (a, b, c) = (pos(&mesh, tri[0]), pos(&mesh, tri[1]), pos(&mesh, tri[2]));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn layouts_match_struct_sizes() {
        assert_eq!(SphereVertex::LAYOUT.array_stride, 32);
        assert_eq!(ParticleInstance::LAYOUT.array_stride, 16);
        assert_eq!(ParticleInstance::LAYOUT.step_mode, wgpu::VertexStepMode::Instance);
    }
}
