pub mod orbit;
pub mod perspective;

pub use orbit::*;
pub use perspective::*;

use crate::config::GlobeConfig;

/// The scene camera plus the controls that move it.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
}

impl CameraRig {
    pub fn new(config: &GlobeConfig, width: u32, height: u32) -> Self {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let camera = PerspectiveCamera::new(&config.camera, aspect);
        let mut controls = OrbitControls::new(config.orbit.clone(), &camera);
        controls.set_viewport(width as f32, height as f32);
        Self { camera, controls }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.set_aspect(width as f32 / height as f32);
        self.controls.set_viewport(width as f32, height as f32);
    }

    pub fn handle_input(&mut self, input: &ControlInput) -> bool {
        self.controls.handle_input(input, &self.camera)
    }

    pub fn update(&mut self, dt_s: f32) -> bool {
        self.controls.update(&mut self.camera, dt_s)
    }

    pub fn reset(&mut self) {
        self.controls.reset(&mut self.camera);
    }
}
