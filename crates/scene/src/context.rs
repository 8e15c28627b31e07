//! The scene root and its per-frame tick.

use runtime::frame::{Frame, FrameClock};

use crate::camera::{CameraRig, ControlInput};
use crate::config::{ConfigError, GlobeConfig, ShadingConfig};
use crate::director::InteractionDirector;
use crate::globe::{Globe, TextureRole, TextureSlot};
use crate::particles::{ParticleField, ParticlePoint};
use crate::snapshot::FrameSnapshot;
use crate::state::PageEvent;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("surface unavailable: {0}")]
    Surface(String),
    #[error("renderer initialization failed: {0}")]
    Init(String),
    #[error("graphics device lost")]
    Lost,
}

/// Something that can draw a [`FrameSnapshot`].
///
/// The browser host implements this over wgpu; tests record snapshots.
pub trait FrameRenderer {
    fn render(&mut self, snapshot: &FrameSnapshot, shading: &ShadingConfig) -> Result<(), RenderError>;
    /// New backing-store size in physical pixels.
    fn resize(&mut self, width: u32, height: u32);
    /// Called once with the fixed particle set before the first frame.
    fn upload_particles(&mut self, _points: &[ParticlePoint]) {}
}

/// Owns every scene object plus the renderer, and advances them together.
pub struct SceneContext<R> {
    config: GlobeConfig,
    globe: Globe,
    particles: ParticleField,
    rig: CameraRig,
    director: InteractionDirector,
    clock: FrameClock,
    viewport: (u32, u32),
    renderer: R,
}

impl<R: FrameRenderer> SceneContext<R> {
    pub fn new(config: GlobeConfig, mut renderer: R, width: u32, height: u32) -> Self {
        let globe = Globe::new(&config);
        let director = InteractionDirector::new(&config);
        let particles = ParticleField::new(&config.particles, director.output().tint);
        let rig = CameraRig::new(&config, width, height);
        renderer.upload_particles(particles.points());
        log::info!(
            "scene ready: {} particles, viewport {width}x{height}",
            particles.len()
        );
        Self {
            config,
            globe,
            particles,
            rig,
            director,
            clock: FrameClock::default(),
            viewport: (width.max(1), height.max(1)),
            renderer,
        }
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn globe(&self) -> &Globe {
        &self.globe
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn director(&self) -> &InteractionDirector {
        &self.director
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }

    pub fn handle_event(&mut self, event: &PageEvent) -> bool {
        self.director.handle(event, &mut self.globe)
    }

    pub fn handle_control_input(&mut self, input: &ControlInput) -> bool {
        self.rig.handle_input(input)
    }

    /// Applies immediately: the next snapshot already uses the new aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("ignoring collapsed viewport {width}x{height}");
            return;
        }
        self.viewport = (width, height);
        self.rig.resize(width, height);
        self.renderer.resize(width, height);
    }

    pub fn set_texture_state(&mut self, role: TextureRole, slot: TextureSlot) {
        self.globe.set_texture_state(role, slot);
    }

    /// Runtime tweak of one orbit knob; see [`OrbitConfig::apply_setting`].
    ///
    /// [`OrbitConfig::apply_setting`]: crate::config::OrbitConfig::apply_setting
    pub fn apply_control_setting(&mut self, key: &str, value: f64) -> Result<(), ConfigError> {
        self.rig.controls.config_mut().apply_setting(key, value)?;
        if key == "auto_rotate_speed" {
            let speed = self.rig.controls.config().auto_rotate_speed;
            self.director.set_default_rotate_speed(speed);
        }
        log::debug!("control setting {key} = {value}");
        Ok(())
    }

    /// Restore the configured orbit settings and the initial camera pose.
    pub fn reset_controls(&mut self) {
        let orbit = self.config.orbit.clone();
        self.director.set_default_rotate_speed(orbit.auto_rotate_speed);
        self.rig.controls.set_config(orbit);
        self.rig.reset();
    }

    /// Advance everything by one animation frame and draw it.
    ///
    /// Render failures are logged and dropped; the next tick tries again.
    pub fn tick(&mut self, timestamp_ms: f64) -> Frame {
        let frame = self.clock.tick(timestamp_ms);
        let dt = frame.dt_s as f32;

        self.particles.advance_time(dt);

        let eased = self.director.advance(dt);
        self.globe.advance(dt);
        self.particles.set_color(eased.tint);
        self.rig.controls.set_auto_rotate_speed(eased.auto_rotate_speed);

        self.rig.update(dt);

        let snapshot = self.snapshot(frame);
        if let Err(err) = self.renderer.render(&snapshot, &self.config.shading) {
            log::warn!("frame {} not rendered: {err}", frame.index);
        }
        frame
    }

    /// The snapshot the renderer would receive for `frame` right now.
    pub fn snapshot(&self, frame: Frame) -> FrameSnapshot {
        let camera = &self.rig.camera;
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        let globe = self.globe.uniforms();
        let particles = self.particles.uniforms();
        FrameSnapshot {
            frame,
            viewport: self.viewport,
            view,
            projection,
            view_proj: projection * view,
            camera_position: camera.position,
            globe_model: self.globe.model_matrix(),
            atmosphere_model: self.globe.atmosphere_matrix(),
            mix_amount: globe.mix_amount,
            day_texture: globe.day_texture,
            night_texture: globe.night_texture,
            particle_color: particles.color,
            particle_time: particles.time,
            particle_count: self.particles.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameRenderer, RenderError, SceneContext};
    use crate::config::{GlobeConfig, ShadingConfig};
    use crate::snapshot::FrameSnapshot;

    #[derive(Default)]
    struct FailingRenderer {
        attempts: usize,
    }

    impl FrameRenderer for FailingRenderer {
        fn render(&mut self, _: &FrameSnapshot, _: &ShadingConfig) -> Result<(), RenderError> {
            self.attempts += 1;
            Err(RenderError::Surface("outdated".into()))
        }

        fn resize(&mut self, _: u32, _: u32) {}
    }

    #[test]
    fn render_errors_do_not_stop_the_loop() {
        let mut ctx = SceneContext::new(GlobeConfig::default(), FailingRenderer::default(), 800, 600);
        for i in 0..5 {
            ctx.tick(i as f64 * 16.0);
        }
        assert_eq!(ctx.renderer().attempts, 5);
        assert_eq!(ctx.frame_count(), 5);
    }

    #[test]
    fn unknown_setting_is_reported() {
        let mut ctx = SceneContext::new(GlobeConfig::default(), FailingRenderer::default(), 800, 600);
        assert!(ctx.apply_control_setting("warp", 1.0).is_err());
        ctx.apply_control_setting("auto_rotate_speed", 2.0).unwrap();
        assert_eq!(ctx.director().output().auto_rotate_speed, 2.0);
        ctx.reset_controls();
        assert_eq!(ctx.rig().controls.config().auto_rotate_speed, 0.5);
        assert_eq!(ctx.director().output().auto_rotate_speed, 0.5);
    }
}
