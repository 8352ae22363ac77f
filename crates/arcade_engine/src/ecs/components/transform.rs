//! Transform component for the ECS system
//!
//! Pure data component: world-space position, rotation and scale.

use crate::foundation::math::{Transform as MathTransform, Vec3, Mat4, Quat};
use crate::ecs::Component;

/// ECS Transform component
///
/// Y-up, right-handed; an entity's forward is local +Z.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    /// World space position
    pub position: Vec3,

    /// World space rotation quaternion
    pub rotation: Quat,

    /// World space scale factors
    pub scale: Vec3,
}

impl Component for TransformComponent {}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl TransformComponent {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to foundation math Transform for calculations
    pub fn to_math_transform(&self) -> MathTransform {
        MathTransform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    /// Create from foundation math Transform
    pub fn from_math_transform(transform: &MathTransform) -> Self {
        Self {
            position: transform.position,
            rotation: transform.rotation,
            scale: transform.scale,
        }
    }

    /// Convert to transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        self.to_math_transform().to_matrix()
    }

    /// World-space forward (+Z rotated)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::z()
    }

    /// Builder pattern: Set rotation from quaternion
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set scale (uniform)
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_identity() {
        let transform = TransformComponent::identity();
        assert_eq!(transform.position, Vec3::zeros());
        assert_eq!(transform.scale, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(transform.to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_math_transform_roundtrip() {
        let original = TransformComponent::from_position(Vec3::new(1.0, -2.0, 3.0)).with_uniform_scale(2.0);
        let back = TransformComponent::from_math_transform(&original.to_math_transform());
        assert_eq!(original, back);
    }

    #[test]
    fn test_forward_follows_rotation() {
        let turned = TransformComponent::identity()
            .with_rotation(Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2));
        assert_relative_eq!(turned.forward(), Vec3::x(), epsilon = 1e-5);
    }
}
