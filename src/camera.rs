//! Camera placement.
//!
//! The camera stores its own world transform (translation composed with
//! per-axis rotations); the pipeline consumes the *inverse* of that transform
//! each frame to move the world into view space.

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    position: Vec3,
    /// Euler angles in radians: x = pitch, y = yaw, z = roll.
    rotation: Vec3,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    /// The camera's world transform: `translation * rot_x * rot_y * rot_z`.
    pub fn transform(&self) -> Mat4 {
        Mat4::translation(self.position)
            * Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_z(self.rotation.z)
    }

    /// World-to-view transform, the inverse of [`Camera::transform`].
    ///
    /// `None` if the transform is singular; the frame driver reports that as
    /// a render error rather than drawing garbage.
    pub fn view_matrix(&self) -> Option<Mat4> {
        self.transform().inverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec4::Vec4;
    use approx::assert_relative_eq;

    #[test]
    fn view_matrix_undoes_camera_translation() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0));
        let view = camera.view_matrix().unwrap();
        let origin = view * Vec4::point(0.0, 0.0, 5.0);
        assert_relative_eq!(origin.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(origin.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(origin.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn rotated_camera_view_is_invertible() {
        let mut camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        camera.set_rotation(Vec3::new(0.2, -0.7, 0.1));
        assert!(camera.view_matrix().is_some());
    }
}
