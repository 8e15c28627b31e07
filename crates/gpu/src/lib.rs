//! Device-independent rendering pieces: shader sources, material state,
//! uniform blocks, the sphere mesh and texture decoding.
//!
//! Nothing here touches a `wgpu::Device`; the browser host owns that.

pub mod materials;
pub mod mesh;
pub mod shaders;
pub mod texture;
pub mod uniforms;

pub use materials::*;
pub use mesh::*;
pub use texture::*;
pub use uniforms::*;
