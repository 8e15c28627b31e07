//! Orbit controls: rotate, dolly and pan a camera around a target.
//!
//! Input is turned into pending deltas (azimuth, polar, dolly scale, pan
//! offset). [`OrbitControls::update`] integrates a damped fraction of those
//! deltas each frame, so motion keeps gliding after the pointer is released.
//! Which gesture an input starts is decided by the pure
//! [`ControlState::transition`].

use std::f32::consts::{PI, TAU};

use foundation::math::Spherical;
use glam::{Vec2, Vec3};

use super::perspective::PerspectiveCamera;
use crate::config::{OneFingerGesture, OrbitConfig, TwoFingerGesture};

const MOVE_EPS: f32 = 1e-6;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

impl PointerKind {
    /// Maps a DOM `pointerType` string. Unknown types behave like a mouse.
    pub fn from_dom(pointer_type: &str) -> Self {
        match pointer_type {
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Mouse,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Auxiliary,
    Secondary,
    Other,
}

impl MouseButton {
    /// Maps a DOM `MouseEvent.button` code.
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => MouseButton::Primary,
            1 => MouseButton::Auxiliary,
            2 => MouseButton::Secondary,
            _ => MouseButton::Other,
        }
    }
}

/// Raw pointer input in canvas pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlInput {
    PointerDown {
        pointer_id: i32,
        kind: PointerKind,
        button: MouseButton,
        position: Vec2,
    },
    PointerMove {
        pointer_id: i32,
        position: Vec2,
    },
    /// Also used for `pointercancel`.
    PointerUp { pointer_id: i32 },
    Wheel { delta_y: f32 },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Idle,
    Rotating,
    Panning,
    Dollying,
    TouchRotating,
    TouchPanning,
    TouchDollyPanning,
    TouchDollyRotating,
}

impl ControlState {
    pub fn is_touch(self) -> bool {
        matches!(
            self,
            ControlState::TouchRotating
                | ControlState::TouchPanning
                | ControlState::TouchDollyPanning
                | ControlState::TouchDollyRotating
        )
    }

    /// Next state after `input`, given the number of pointers still held
    /// down once the input is applied.
    pub fn transition(self, input: &ControlInput, active_pointers: usize, cfg: &OrbitConfig) -> Self {
        if !cfg.enabled {
            return ControlState::Idle;
        }
        match *input {
            ControlInput::PointerDown {
                kind: PointerKind::Touch,
                ..
            } => Self::touch_gesture(active_pointers, cfg),
            ControlInput::PointerDown { button, .. } => match button {
                MouseButton::Primary if cfg.enable_rotate => ControlState::Rotating,
                MouseButton::Auxiliary if cfg.enable_zoom => ControlState::Dollying,
                MouseButton::Secondary if cfg.enable_pan => ControlState::Panning,
                _ => ControlState::Idle,
            },
            ControlInput::PointerUp { .. } => {
                if self.is_touch() && active_pointers > 0 {
                    Self::touch_gesture(active_pointers, cfg)
                } else {
                    ControlState::Idle
                }
            }
            ControlInput::PointerMove { .. } | ControlInput::Wheel { .. } => self,
        }
    }

    fn touch_gesture(touches: usize, cfg: &OrbitConfig) -> Self {
        match touches {
            1 => match cfg.one_finger {
                OneFingerGesture::Rotate if cfg.enable_rotate => ControlState::TouchRotating,
                OneFingerGesture::Pan if cfg.enable_pan => ControlState::TouchPanning,
                _ => ControlState::Idle,
            },
            2 => match cfg.two_finger {
                TwoFingerGesture::DollyPan if cfg.enable_zoom || cfg.enable_pan => {
                    ControlState::TouchDollyPanning
                }
                TwoFingerGesture::DollyRotate if cfg.enable_zoom || cfg.enable_rotate => {
                    ControlState::TouchDollyRotating
                }
                _ => ControlState::Idle,
            },
            _ => ControlState::Idle,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct TrackedPointer {
    id: i32,
    position: Vec2,
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    config: OrbitConfig,
    state: ControlState,
    pointers: Vec<TrackedPointer>,
    target: Vec3,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
    rotate_start: Vec2,
    pan_start: Vec2,
    dolly_start: Vec2,
    pinch_start: f32,
    viewport: Vec2,
    last_azimuth_step: f32,
    saved_position: Vec3,
    saved_target: Vec3,
}

impl OrbitControls {
    pub fn new(config: OrbitConfig, camera: &PerspectiveCamera) -> Self {
        Self {
            config,
            state: ControlState::Idle,
            pointers: Vec::with_capacity(2),
            target: camera.target,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            rotate_start: Vec2::ZERO,
            pan_start: Vec2::ZERO,
            dolly_start: Vec2::ZERO,
            pinch_start: 0.0,
            viewport: Vec2::ONE,
            last_azimuth_step: 0.0,
            saved_position: camera.position,
            saved_target: camera.target,
        }
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    /// Replace the whole configuration. Disabling the controls ends any gesture.
    pub fn set_config(&mut self, config: OrbitConfig) {
        self.config = config;
        if !self.config.enabled {
            self.cancel_gesture();
        }
    }

    pub fn config_mut(&mut self) -> &mut OrbitConfig {
        &mut self.config
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_auto_rotate_speed(&mut self, speed: f32) {
        if speed.is_finite() {
            self.config.auto_rotate_speed = speed;
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
    }

    /// Azimuth change applied by the last [`update`](Self::update), in
    /// radians. Auto-rotation turns the camera toward negative azimuth.
    pub fn azimuth_step(&self) -> f32 {
        self.last_azimuth_step
    }

    /// Restore the camera pose captured at construction and drop all motion.
    pub fn reset(&mut self, camera: &mut PerspectiveCamera) {
        camera.position = self.saved_position;
        camera.target = self.saved_target;
        self.target = self.saved_target;
        self.cancel_gesture();
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.pan_offset = Vec3::ZERO;
    }

    fn cancel_gesture(&mut self) {
        self.state = ControlState::Idle;
        self.pointers.clear();
    }

    /// Feed one input. Returns `true` when the input was used and the host
    /// should suppress the browser's default handling.
    pub fn handle_input(&mut self, input: &ControlInput, camera: &PerspectiveCamera) -> bool {
        if !self.config.enabled {
            return false;
        }
        match *input {
            ControlInput::PointerDown {
                pointer_id,
                position,
                ..
            } => {
                if self.pointers.iter().all(|p| p.id != pointer_id) {
                    self.pointers.push(TrackedPointer {
                        id: pointer_id,
                        position,
                    });
                }
                let next = self.state.transition(input, self.pointers.len(), &self.config);
                self.enter(next, position);
                next != ControlState::Idle
            }
            ControlInput::PointerMove {
                pointer_id,
                position,
            } => {
                let Some(tracked) = self.pointers.iter_mut().find(|p| p.id == pointer_id) else {
                    return false;
                };
                tracked.position = position;
                self.drag(position, camera)
            }
            ControlInput::PointerUp { pointer_id } => {
                let before = self.pointers.len();
                self.pointers.retain(|p| p.id != pointer_id);
                if self.pointers.len() == before {
                    return false;
                }
                let next = self.state.transition(input, self.pointers.len(), &self.config);
                let anchor = self.pointers.first().map(|p| p.position).unwrap_or(Vec2::ZERO);
                self.enter(next, anchor);
                true
            }
            ControlInput::Wheel { delta_y } => {
                if !self.config.enable_zoom || self.state != ControlState::Idle || !delta_y.is_finite() {
                    return false;
                }
                if delta_y < 0.0 {
                    self.zoom_in(self.zoom_scale());
                } else if delta_y > 0.0 {
                    self.zoom_out(self.zoom_scale());
                }
                true
            }
        }
    }

    fn enter(&mut self, state: ControlState, position: Vec2) {
        if state != self.state {
            log::debug!("orbit controls: {:?} -> {:?}", self.state, state);
        }
        self.state = state;
        match state {
            ControlState::Idle => {}
            ControlState::Rotating | ControlState::TouchRotating => self.rotate_start = position,
            ControlState::Panning | ControlState::TouchPanning => self.pan_start = position,
            ControlState::Dollying => self.dolly_start = position,
            ControlState::TouchDollyPanning | ControlState::TouchDollyRotating => {
                let mid = self.touch_midpoint();
                self.pinch_start = self.touch_spread();
                self.rotate_start = mid;
                self.pan_start = mid;
            }
        }
    }

    fn drag(&mut self, position: Vec2, camera: &PerspectiveCamera) -> bool {
        match self.state {
            ControlState::Idle => false,
            ControlState::Rotating | ControlState::TouchRotating => {
                self.drag_rotate(position);
                true
            }
            ControlState::Panning | ControlState::TouchPanning => {
                self.drag_pan(position, camera);
                true
            }
            ControlState::Dollying => {
                let dy = position.y - self.dolly_start.y;
                if dy > 0.0 {
                    self.zoom_out(self.zoom_scale());
                } else if dy < 0.0 {
                    self.zoom_in(self.zoom_scale());
                }
                self.dolly_start = position;
                true
            }
            ControlState::TouchDollyPanning | ControlState::TouchDollyRotating => {
                if self.config.enable_zoom {
                    self.drag_pinch();
                }
                let mid = self.touch_midpoint();
                if self.state == ControlState::TouchDollyPanning {
                    if self.config.enable_pan {
                        self.drag_pan(mid, camera);
                    }
                } else if self.config.enable_rotate {
                    self.drag_rotate(mid);
                }
                true
            }
        }
    }

    fn drag_rotate(&mut self, position: Vec2) {
        let delta = (position - self.rotate_start) * self.config.rotate_speed;
        let h = self.viewport.y;
        self.rotate_left(TAU * delta.x / h);
        self.rotate_up(TAU * delta.y / h);
        self.rotate_start = position;
    }

    fn drag_pan(&mut self, position: Vec2, camera: &PerspectiveCamera) {
        let delta = (position - self.pan_start) * self.config.pan_speed;
        self.pan(delta, camera);
        self.pan_start = position;
    }

    fn drag_pinch(&mut self) {
        let spread = self.touch_spread();
        if self.pinch_start > MOVE_EPS && spread > MOVE_EPS {
            let ratio = (spread / self.pinch_start).powf(self.config.zoom_speed);
            self.zoom_out(ratio);
        }
        self.pinch_start = spread;
    }

    fn touch_midpoint(&self) -> Vec2 {
        match self.pointers.as_slice() {
            [a, b, ..] => (a.position + b.position) * 0.5,
            [a] => a.position,
            [] => Vec2::ZERO,
        }
    }

    fn touch_spread(&self) -> f32 {
        match self.pointers.as_slice() {
            [a, b, ..] => a.position.distance(b.position),
            _ => 0.0,
        }
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.config.zoom_speed)
    }

    fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// `factor < 1` moves the camera closer.
    fn zoom_in(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.scale *= factor;
        }
    }

    fn zoom_out(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.scale /= factor;
        }
    }

    /// Screen-space pan: one viewport height of drag moves the target by the
    /// visible height at the target's distance.
    fn pan(&mut self, delta_px: Vec2, camera: &PerspectiveCamera) {
        let offset = camera.position - self.target;
        let visible = offset.length() * (camera.fov_y_deg.to_radians() * 0.5).tan();
        let h = self.viewport.y;
        let forward = (self.target - camera.position).normalize_or_zero();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward);
        self.pan_offset += right * (-2.0 * delta_px.x * visible / h);
        self.pan_offset += up * (2.0 * delta_px.y * visible / h);
    }

    fn clamp_azimuth(&self, theta: f32) -> f32 {
        let Some([mut min, mut max]) = self.config.azimuth_limits else {
            return theta;
        };
        if min < -PI {
            min += TAU;
        } else if min > PI {
            min -= TAU;
        }
        if max < -PI {
            max += TAU;
        } else if max > PI {
            max -= TAU;
        }
        if min <= max {
            theta.clamp(min, max)
        } else if theta > (min + max) * 0.5 {
            theta.max(min)
        } else {
            theta.min(max)
        }
    }

    /// Integrate pending motion into `camera`. Returns `true` if it moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera, dt_s: f32) -> bool {
        let before_position = camera.position;
        let before_target = self.target;

        let mut spherical = Spherical::from_vec3(camera.position - self.target);

        if self.config.auto_rotate && self.state == ControlState::Idle && dt_s.is_finite() && dt_s > 0.0 {
            self.rotate_left(TAU / 60.0 * self.config.auto_rotate_speed * dt_s);
        }

        let factor = if self.config.enable_damping {
            self.config.damping_factor
        } else {
            1.0
        };
        let step_theta = self.delta_theta * factor;
        spherical.theta += step_theta;
        spherical.phi += self.delta_phi * factor;
        self.last_azimuth_step = step_theta;

        spherical.theta = self.clamp_azimuth(spherical.theta);
        spherical.phi = spherical
            .phi
            .clamp(self.config.min_polar_angle, self.config.max_polar_angle);
        spherical.make_safe();

        self.target += self.pan_offset * factor;

        spherical.radius = (spherical.radius * self.scale)
            .clamp(self.config.min_distance, self.config.max_distance);

        camera.target = self.target;
        camera.position = self.target + spherical.to_vec3();

        if self.config.enable_damping {
            let keep = 1.0 - self.config.damping_factor;
            self.delta_theta *= keep;
            self.delta_phi *= keep;
            self.pan_offset *= keep;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.position.distance_squared(before_position) > MOVE_EPS
            || self.target.distance_squared(before_target) > MOVE_EPS
    }
}

#[cfg(test)]
mod tests {
    use super::{ControlInput, ControlState, MouseButton, OrbitControls, PointerKind};
    use crate::camera::PerspectiveCamera;
    use crate::config::{CameraSettings, OrbitConfig};
    use glam::Vec2;
    use std::f32::consts::TAU;

    fn down(id: i32, kind: PointerKind, button: MouseButton, x: f32, y: f32) -> ControlInput {
        ControlInput::PointerDown {
            pointer_id: id,
            kind,
            button,
            position: Vec2::new(x, y),
        }
    }

    fn rig(config: OrbitConfig) -> (PerspectiveCamera, OrbitControls) {
        let camera = PerspectiveCamera::new(&CameraSettings::default(), 1.0);
        let mut controls = OrbitControls::new(config, &camera);
        controls.set_viewport(800.0, 600.0);
        (camera, controls)
    }

    #[test]
    fn mouse_buttons_map_to_gestures() {
        let all = OrbitConfig {
            enable_zoom: true,
            enable_pan: true,
            ..OrbitConfig::default()
        };
        let s = ControlState::Idle;
        let left = down(1, PointerKind::Mouse, MouseButton::Primary, 0.0, 0.0);
        let middle = down(1, PointerKind::Mouse, MouseButton::Auxiliary, 0.0, 0.0);
        let right = down(1, PointerKind::Mouse, MouseButton::Secondary, 0.0, 0.0);
        assert_eq!(s.transition(&left, 1, &all), ControlState::Rotating);
        assert_eq!(s.transition(&middle, 1, &all), ControlState::Dollying);
        assert_eq!(s.transition(&right, 1, &all), ControlState::Panning);

        let defaults = OrbitConfig::default();
        assert_eq!(s.transition(&middle, 1, &defaults), ControlState::Idle);
        assert_eq!(s.transition(&right, 1, &defaults), ControlState::Idle);
    }

    #[test]
    fn touch_count_selects_gesture() {
        let cfg = OrbitConfig {
            enable_zoom: true,
            ..OrbitConfig::default()
        };
        let touch = down(1, PointerKind::Touch, MouseButton::Primary, 0.0, 0.0);
        assert_eq!(
            ControlState::Idle.transition(&touch, 1, &cfg),
            ControlState::TouchRotating
        );
        assert_eq!(
            ControlState::TouchRotating.transition(&touch, 2, &cfg),
            ControlState::TouchDollyPanning
        );
        let up = ControlInput::PointerUp { pointer_id: 2 };
        assert_eq!(
            ControlState::TouchDollyPanning.transition(&up, 1, &cfg),
            ControlState::TouchRotating
        );
        assert_eq!(
            ControlState::TouchRotating.transition(&up, 0, &cfg),
            ControlState::Idle
        );
        // Two fingers with zoom and pan both disabled do nothing.
        assert_eq!(
            ControlState::TouchRotating.transition(&touch, 2, &OrbitConfig::default()),
            ControlState::Idle
        );
    }

    #[test]
    fn disabled_controls_stay_idle() {
        let cfg = OrbitConfig {
            enabled: false,
            ..OrbitConfig::default()
        };
        let left = down(1, PointerKind::Mouse, MouseButton::Primary, 0.0, 0.0);
        assert_eq!(ControlState::Idle.transition(&left, 1, &cfg), ControlState::Idle);
    }

    #[test]
    fn wheel_ignored_when_zoom_disabled() {
        let (mut camera, mut controls) = rig(OrbitConfig {
            auto_rotate: false,
            ..OrbitConfig::default()
        });
        assert!(!controls.handle_input(&ControlInput::Wheel { delta_y: -100.0 }, &camera));
        controls.update(&mut camera, 1.0 / 60.0);
        assert!((camera.target_distance() - 15.0).abs() < 1e-4);
    }

    #[test]
    fn wheel_dollies_when_zoom_enabled() {
        let (mut camera, mut controls) = rig(OrbitConfig {
            auto_rotate: false,
            enable_zoom: true,
            ..OrbitConfig::default()
        });
        assert!(controls.handle_input(&ControlInput::Wheel { delta_y: -100.0 }, &camera));
        controls.update(&mut camera, 1.0 / 60.0);
        assert!((camera.target_distance() - 15.0 * 0.95).abs() < 1e-3);
    }

    #[test]
    fn right_drag_does_not_pan_by_default() {
        let (mut camera, mut controls) = rig(OrbitConfig {
            auto_rotate: false,
            ..OrbitConfig::default()
        });
        controls.handle_input(&down(1, PointerKind::Mouse, MouseButton::Secondary, 100.0, 100.0), &camera);
        assert_eq!(controls.state(), ControlState::Idle);
        controls.handle_input(
            &ControlInput::PointerMove {
                pointer_id: 1,
                position: Vec2::new(300.0, 100.0),
            },
            &camera,
        );
        for _ in 0..120 {
            controls.update(&mut camera, 1.0 / 60.0);
        }
        assert_eq!(controls.target(), glam::Vec3::ZERO);
    }

    #[test]
    fn drag_rotates_then_glides() {
        let (mut camera, mut controls) = rig(OrbitConfig {
            auto_rotate: false,
            ..OrbitConfig::default()
        });
        controls.handle_input(&down(1, PointerKind::Mouse, MouseButton::Primary, 100.0, 300.0), &camera);
        assert_eq!(controls.state(), ControlState::Rotating);
        controls.handle_input(
            &ControlInput::PointerMove {
                pointer_id: 1,
                position: Vec2::new(160.0, 300.0),
            },
            &camera,
        );
        controls.handle_input(&ControlInput::PointerUp { pointer_id: 1 }, &camera);
        assert_eq!(controls.state(), ControlState::Idle);

        assert!(controls.update(&mut camera, 1.0 / 60.0));
        let first = controls.azimuth_step();
        controls.update(&mut camera, 1.0 / 60.0);
        let second = controls.azimuth_step();
        assert!(first < 0.0);
        assert!(second.abs() < first.abs());
        // Radius is preserved by rotation.
        assert!((camera.target_distance() - 15.0).abs() < 1e-3);
    }

    #[test]
    fn auto_rotate_rate_converges() {
        let speed = 1.5;
        let (mut camera, mut controls) = rig(OrbitConfig {
            auto_rotate_speed: speed,
            ..OrbitConfig::default()
        });
        let dt = 1.0 / 60.0;
        for _ in 0..1200 {
            controls.update(&mut camera, dt);
        }
        let rate = -controls.azimuth_step() / dt;
        let expected = TAU / 60.0 * speed;
        assert!((rate - expected).abs() < 1e-4, "{rate} vs {expected}");
    }

    #[test]
    fn polar_angle_is_clamped() {
        let (mut camera, mut controls) = rig(OrbitConfig {
            auto_rotate: false,
            enable_damping: false,
            min_polar_angle: 1.0,
            max_polar_angle: 2.0,
            ..OrbitConfig::default()
        });
        controls.handle_input(&down(1, PointerKind::Mouse, MouseButton::Primary, 0.0, 0.0), &camera);
        controls.handle_input(
            &ControlInput::PointerMove {
                pointer_id: 1,
                position: Vec2::new(0.0, 2000.0),
            },
            &camera,
        );
        controls.update(&mut camera, 1.0 / 60.0);
        let phi = foundation::math::Spherical::from_vec3(camera.position).phi;
        assert!((phi - 1.0).abs() < 1e-4);
    }

    #[test]
    fn reset_restores_pose() {
        let (mut camera, mut controls) = rig(OrbitConfig::default());
        for _ in 0..30 {
            controls.update(&mut camera, 1.0 / 60.0);
        }
        assert!(camera.position.x.abs() > 0.0);
        controls.reset(&mut camera);
        assert_eq!(camera.position, glam::Vec3::new(0.0, 0.0, 15.0));
    }
}
