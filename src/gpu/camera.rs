use glam::{Mat4, Vec3};

use crate::config::{
    CAMERA_ROTATE_SPEED, CAMERA_ZOOM_SPEED, DEFAULT_CAMERA_AZIMUTH, DEFAULT_CAMERA_DISTANCE,
    DEFAULT_CAMERA_ELEVATION,
};

/// Keeps the camera off the poles, where look_at loses its up vector
const MAX_ELEVATION: f32 = 1.5;

/// Orbit camera around the membrane centre. Right-handed, z up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub azimuth: f32,
    pub elevation: f32,
    pub distance: f32,
    pub fov_y: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            azimuth: DEFAULT_CAMERA_AZIMUTH,
            elevation: DEFAULT_CAMERA_ELEVATION,
            distance: DEFAULT_CAMERA_DISTANCE,
            fov_y: 45f32.to_radians(),
        }
    }
}

impl OrbitCamera {
    pub fn position(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        self.distance * Vec3::new(cos_el * cos_az, cos_el * sin_az, sin_el)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Z);
        let projection = Mat4::perspective_rh(self.fov_y, aspect.max(1e-6), 0.01, 100.0);
        projection * view
    }

    /// Rotate by whole key steps around the vertical and horizontal axes
    pub fn orbit(&mut self, azimuth_steps: f32, elevation_steps: f32) {
        self.azimuth += azimuth_steps * CAMERA_ROTATE_SPEED;
        self.elevation = (self.elevation + elevation_steps * CAMERA_ROTATE_SPEED)
            .clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    pub fn zoom_in(&mut self) {
        self.distance = (self.distance / CAMERA_ZOOM_SPEED).max(0.5);
    }

    pub fn zoom_out(&mut self) {
        self.distance = (self.distance * CAMERA_ZOOM_SPEED).min(20.0);
    }
}
