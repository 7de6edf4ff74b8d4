//! Directional lighting.

use crate::math::vec4::Vec4;

/// Direction vectors shorter than this are treated as having no usable
/// lighting information.
const MIN_NORMAL_LENGTH: f32 = 1e-6;

/// A directional light shared by a group of objects.
///
/// Only the direction matters; there is no falloff. Scenes may carry several
/// of these so distinct object groups can be lit independently, and a light
/// may be re-aimed between frames to animate the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Direction toward the light, `w = 0`.
    pub direction: Vec4,
}

impl DirectionalLight {
    pub fn new(direction: Vec4) -> Self {
        Self {
            direction: Vec4::direction(direction.x, direction.y, direction.z),
        }
    }

    /// Diffuse intensity for a surface normal, clamped to [0, 1].
    ///
    /// Returns `None` for a degenerate (near zero-length) normal so the caller
    /// can fall back to the unlit base color instead of propagating a NaN.
    pub fn intensity(&self, normal: Vec4) -> Option<f32> {
        if normal.magnitude() < MIN_NORMAL_LENGTH {
            return None;
        }
        let value = self.direction.normalize().dot(normal.normalize());
        Some(value.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normal_facing_light_is_fully_lit() {
        let light = DirectionalLight::new(Vec4::direction(0.0, 1.0, 0.0));
        let intensity = light.intensity(Vec4::direction(0.0, 2.0, 0.0)).unwrap();
        assert_relative_eq!(intensity, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn normal_facing_away_clamps_to_zero() {
        let light = DirectionalLight::new(Vec4::direction(0.0, 1.0, 0.0));
        let intensity = light.intensity(Vec4::direction(0.0, -1.0, 0.0)).unwrap();
        assert_eq!(intensity, 0.0);
    }

    #[test]
    fn angled_normal_gets_partial_intensity() {
        let light = DirectionalLight::new(Vec4::direction(0.0, 1.0, 0.0));
        let intensity = light.intensity(Vec4::direction(0.0, 1.0, 1.0)).unwrap();
        // cos(45 degrees)
        assert_relative_eq!(intensity, 0.7071, epsilon = 1e-3);
    }

    #[test]
    fn zero_length_normal_yields_no_intensity() {
        let light = DirectionalLight::new(Vec4::direction(1.0, 0.0, 0.0));
        assert!(light.intensity(Vec4::ZERO).is_none());
    }

    #[test]
    fn direction_w_is_forced_to_zero() {
        let light = DirectionalLight::new(Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(light.direction.w, 0.0);
    }
}
