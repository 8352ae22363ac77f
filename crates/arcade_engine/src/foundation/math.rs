//! Math utilities and types
//!
//! Provides fundamental math types for 3D graphics and game development.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform from position, yaw/pitch/roll degrees and scale
    ///
    /// This is the layout every placement and spawn config stores on disk.
    pub fn from_degrees(position: Vec3, rotation_deg: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation: utils::quat_from_yaw_pitch_roll_deg(rotation_deg),
            scale,
        }
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Mat4, Point3, Quat, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Rotation from (yaw, pitch, roll) in degrees
    ///
    /// Yaw turns about +Y, pitch about +X, roll about +Z, applied in that order.
    pub fn quat_from_yaw_pitch_roll_deg(rotation_deg: Vec3) -> Quat {
        let yaw = Quat::from_axis_angle(&Vec3::y_axis(), deg_to_rad(rotation_deg.x));
        let pitch = Quat::from_axis_angle(&Vec3::x_axis(), deg_to_rad(rotation_deg.y));
        let roll = Quat::from_axis_angle(&Vec3::z_axis(), deg_to_rad(rotation_deg.z));
        yaw * pitch * roll
    }

    /// Transform a point by a homogeneous matrix
    pub fn transform_point(matrix: &Mat4, point: Vec3) -> Vec3 {
        matrix.transform_point(&Point3::from(point)).coords
    }

    /// Transform a direction by a homogeneous matrix and renormalize it
    ///
    /// Returns `fallback` when the matrix collapses the direction.
    pub fn transform_direction(matrix: &Mat4, direction: Vec3, fallback: Vec3) -> Vec3 {
        matrix
            .transform_vector(&direction)
            .try_normalize(f32::EPSILON)
            .unwrap_or(fallback)
    }

    /// Angle in radians between two directions (0 if either is degenerate)
    pub fn angle_between(a: &Vec3, b: &Vec3) -> f32 {
        match (a.try_normalize(f32::EPSILON), b.try_normalize(f32::EPSILON)) {
            (Some(a), Some(b)) => a.dot(&b).clamp(-1.0, 1.0).acos(),
            _ => 0.0,
        }
    }

    /// Rotate `from` toward `to` by at most `max_radians`
    ///
    /// Both inputs are treated as directions; the result is normalized.
    pub fn rotate_toward(from: &Vec3, to: &Vec3, max_radians: f32) -> Vec3 {
        let (Some(from_n), Some(to_n)) = (from.try_normalize(f32::EPSILON), to.try_normalize(f32::EPSILON)) else {
            return *from;
        };
        let angle = angle_between(&from_n, &to_n);
        if angle <= max_radians {
            return to_n;
        }
        match Quat::rotation_between(&from_n, &to_n) {
            Some(full) => {
                let t = max_radians / angle;
                Quat::identity().slerp(&full, t) * from_n
            }
            // Opposite directions: any perpendicular axis works
            None => {
                let axis = from_n.cross(&Vec3::y()).try_normalize(f32::EPSILON).unwrap_or_else(Vec3::x);
                Quat::from_axis_angle(&nalgebra::Unit::new_normalize(axis), max_radians) * from_n
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_matrix_translates() {
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let moved = utils::transform_point(&transform.to_matrix(), Vec3::zeros());
        assert_relative_eq!(moved, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_yaw_rotates_forward_about_up() {
        let rotation = utils::quat_from_yaw_pitch_roll_deg(Vec3::new(90.0, 0.0, 0.0));
        let forward = rotation * Vec3::z();
        assert_relative_eq!(forward, Vec3::x(), epsilon = 1e-5);
    }

    #[test]
    fn test_rotate_toward_is_clamped() {
        let from = Vec3::z();
        let to = Vec3::x();
        let step = utils::rotate_toward(&from, &to, utils::deg_to_rad(30.0));
        assert_relative_eq!(utils::angle_between(&from, &step), utils::deg_to_rad(30.0), epsilon = 1e-4);

        let snapped = utils::rotate_toward(&from, &to, utils::deg_to_rad(120.0));
        assert_relative_eq!(snapped, Vec3::x(), epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_direction_falls_back() {
        let collapse = Mat4::new_nonuniform_scaling(&Vec3::zeros());
        let dir = utils::transform_direction(&collapse, Vec3::z(), Vec3::y());
        assert_eq!(dir, Vec3::y());
    }
}
