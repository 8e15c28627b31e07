use glam::{Mat4, Vec3};

use crate::config::CameraSettings;

/// Right-handed perspective camera with a 0..1 depth range.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl PerspectiveCamera {
    pub fn new(settings: &CameraSettings, aspect: f32) -> Self {
        let mut camera = Self {
            fov_y_deg: settings.fov_y_deg,
            aspect: 1.0,
            near: settings.near,
            far: settings.far,
            position: Vec3::new(0.0, 0.0, settings.distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
        };
        camera.set_aspect(aspect);
        camera
    }

    /// Ignores zero, negative or non-finite ratios (a collapsed viewport).
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Distance from the camera to its target.
    pub fn target_distance(&self) -> f32 {
        (self.position - self.target).length()
    }
}

#[cfg(test)]
mod tests {
    use super::PerspectiveCamera;
    use crate::config::CameraSettings;
    use glam::Vec3;

    #[test]
    fn starts_on_positive_z() {
        let cam = PerspectiveCamera::new(&CameraSettings::default(), 16.0 / 9.0);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 15.0));
        assert!((cam.target_distance() - 15.0).abs() < 1e-6);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = PerspectiveCamera::new(&CameraSettings::default(), 2.0);
        let clip = cam.view_proj() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn degenerate_aspect_is_ignored() {
        let mut cam = PerspectiveCamera::new(&CameraSettings::default(), 1.5);
        cam.set_aspect(0.0);
        cam.set_aspect(f32::NAN);
        assert_eq!(cam.aspect, 1.5);
    }
}
