//! Perspective camera looking into the snow volume.

use glam::{Mat4, Vec3};

/// Vertical field of view in degrees.
pub const DEFAULT_FOV: f32 = 50.0;
pub const DEFAULT_NEAR: f32 = 0.5;
pub const DEFAULT_FAR: f32 = 100.0;
/// Camera position; it looks down the negative Z axis.
pub const DEFAULT_POSITION: Vec3 = Vec3::new(-0.25, 0.0, -2.0);

/// Fixed perspective camera. Only the aspect ratio changes at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Width over height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    /// Viewing direction (not necessarily normalized).
    pub direction: Vec3,
    projection: Mat4,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            fov: DEFAULT_FOV,
            aspect,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            position: DEFAULT_POSITION,
            direction: Vec3::NEG_Z,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    /// Set the aspect ratio and rebuild the projection matrix.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection();
    }

    /// Recompute the projection after changing `fov`, `aspect` or clip planes.
    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.direction, Vec3::Y)
    }

    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_aspect_updates_projection() {
        let mut camera = Camera::new(800.0 / 600.0);
        let before = camera.projection_matrix();
        camera.set_aspect(1600.0 / 900.0);
        assert_eq!(camera.aspect, 1600.0 / 900.0);
        assert_ne!(camera.projection_matrix(), before);
        assert_eq!(
            camera.projection_matrix(),
            Mat4::perspective_rh(50f32.to_radians(), 1600.0 / 900.0, 0.5, 100.0)
        );
    }

    #[test]
    fn test_points_ahead_have_negative_view_depth() {
        let camera = Camera::default();
        let ahead = camera.view_matrix() * Vec3::new(-0.25, 0.0, -7.0).extend(1.0);
        assert!((ahead.z + 5.0).abs() < 1e-5);
    }
}
