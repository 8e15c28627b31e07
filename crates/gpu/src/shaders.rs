//! WGSL sources for the three scene materials.
//!
//! Uniform blocks use `var<uniform>` so the programs also run on WebGL2.
//! Their layouts mirror the `#[repr(C)]` structs in [`crate::uniforms`].

/// Textured globe with a day/night crossfade and edge scattering.
pub const DAY_NIGHT_GLOBE: &str = r#"
struct Globe {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    view_proj: mat4x4<f32>,
    tint: vec4<f32>,
    // x: mix amount, y: intensity bias, z: scatter exponent, w: scatter weight
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> u: Globe;
@group(0) @binding(1) var day_tex: texture_2d<f32>;
@group(0) @binding(2) var night_tex: texture_2d<f32>;
@group(0) @binding(3) var tex_sampler: sampler;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) view_normal: vec3<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
) -> VsOut {
    var out: VsOut;
    out.pos = u.view_proj * u.model * vec4<f32>(position, 1.0);
    out.uv = uv;
    // Model is rotation * uniform scale and view is rigid, so no inverse-transpose.
    out.view_normal = (u.view * u.model * vec4<f32>(normal, 0.0)).xyz;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(in.view_normal);
    let intensity = u.params.y - dot(n, vec3<f32>(0.0, 0.0, 1.0));

    let day = textureSample(day_tex, tex_sampler, in.uv).rgb;
    let night = textureSample(night_tex, tex_sampler, in.uv).rgb;
    let day_mix = clamp(1.0 - intensity - u.params.x, 0.0, 1.0);
    let base = mix(night, day, day_mix);

    let scatter = pow(max(intensity, 0.0), u.params.z) * u.params.w;
    return vec4<f32>(base + u.tint.rgb * scatter, 1.0);
}
"#;

/// Glowing shell drawn from its back faces around the globe.
pub const ATMOSPHERE_RIM: &str = r#"
struct Atmosphere {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    view_proj: mat4x4<f32>,
    tint: vec4<f32>,
    // x: rim bias, y: rim exponent
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> u: Atmosphere;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) view_normal: vec3<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
) -> VsOut {
    var out: VsOut;
    out.pos = u.view_proj * u.model * vec4<f32>(position, 1.0);
    out.view_normal = (u.view * u.model * vec4<f32>(normal, 0.0)).xyz;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(in.view_normal);
    let intensity = pow(max(u.params.x - dot(n, vec3<f32>(0.0, 0.0, 1.0)), 0.0), u.params.y);
    return vec4<f32>(u.tint.rgb * intensity, 1.0);
}
"#;

/// Instanced billboard quads with a soft radial glow and time-based drift.
pub const PARTICLE_GLOW: &str = r#"
struct Particles {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    color: vec4<f32>,
    // x: time, y: billboard half-size, z: drift amplitude
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> u: Particles;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) scale: f32,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vid: u32,
    @location(0) center: vec3<f32>,
    @location(1) scale: f32,
) -> VsOut {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vid % 6u];

    let time = u.params.x;
    let drift = u.params.z * sin(vec3<f32>(time * 0.5) + center.yzx * 0.3);
    let view_pos = u.view * vec4<f32>(center + drift, 1.0);
    let offset = corner * u.params.y * scale;

    var out: VsOut;
    out.pos = u.projection * vec4<f32>(view_pos.xy + offset, view_pos.z, 1.0);
    out.uv = corner * 0.5 + vec2<f32>(0.5, 0.5);
    out.scale = scale;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let d = distance(in.uv, vec2<f32>(0.5, 0.5));
    if (d > 0.5) {
        discard;
    }
    // Smaller points fade out closer to their center.
    let strength = max(0.05 * in.scale / max(d, 1e-4) - 0.1, 0.0);
    return vec4<f32>(u.color.rgb * strength, strength);
}
"#;

#[cfg(test)]
mod tests {
    use super::{ATMOSPHERE_RIM, DAY_NIGHT_GLOBE, PARTICLE_GLOW};

    #[test]
    fn every_program_has_both_stages() {
        for src in [DAY_NIGHT_GLOBE, ATMOSPHERE_RIM, PARTICLE_GLOW] {
            assert!(src.contains("fn vs_main"));
            assert!(src.contains("fn fs_main"));
            assert!(src.contains("var<uniform>"));
            assert!(!src.contains("var<storage"));
        }
    }

    #[test]
    fn globe_binds_both_textures() {
        assert!(DAY_NIGHT_GLOBE.contains("@binding(1) var day_tex"));
        assert!(DAY_NIGHT_GLOBE.contains("@binding(2) var night_tex"));
        assert!(DAY_NIGHT_GLOBE.contains("@binding(3) var tex_sampler"));
    }

    #[test]
    fn particle_scale_reaches_the_glow() {
        assert!(PARTICLE_GLOW.contains("@location(1) scale: f32,\n};"));
        assert!(PARTICLE_GLOW.contains("out.scale = scale;"));
        assert!(PARTICLE_GLOW.contains("0.05 * in.scale"));
    }
}
