use cgmath::{Deg, One, Quaternion, Rotation, Rotation3, Vector3, vec3};

use crate::math::{FORWARD, RIGHT, UP};

/// World-space position and orientation.
///
/// Poses are plain values: copying one out of a waypoint snapshots it, so later edits
/// to the waypoint never leak into a travel already in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

impl Pose {
    pub fn new(position: Vector3<f32>, rotation: Quaternion<f32>) -> Pose {
        Pose { position, rotation }
    }

    pub fn at(position: Vector3<f32>) -> Pose {
        Pose::new(position, Quaternion::one())
    }

    pub fn identity() -> Pose {
        Pose::at(vec3(0.0, 0.0, 0.0))
    }

    /// Pose from authored angles. Positive `pitch` looks up.
    pub fn from_yaw_pitch(position: Vector3<f32>, yaw: Deg<f32>, pitch: Deg<f32>) -> Pose {
        let rotation = Quaternion::from_angle_y(yaw) * Quaternion::from_angle_x(-pitch);
        Pose::new(position, rotation)
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(FORWARD)
    }

    pub fn right(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(RIGHT)
    }

    pub fn up(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(UP)
    }

    /// Local offset expressed in this pose's frame, returned in world space.
    pub fn transform_point(&self, local: Vector3<f32>) -> Vector3<f32> {
        self.position + self.rotation.rotate_vector(local)
    }

    pub fn transform_direction(&self, local: Vector3<f32>) -> Vector3<f32> {
        self.rotation.rotate_vector(local)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn test_yaw_pitch_forward() {
        let pose = Pose::from_yaw_pitch(vec3(0.0, 0.0, 0.0), Deg(90.0), Deg(0.0));
        assert!((pose.forward() - RIGHT).magnitude() < 1e-5);

        let looking_up = Pose::from_yaw_pitch(vec3(0.0, 0.0, 0.0), Deg(0.0), Deg(30.0));
        assert!(looking_up.forward().y > 0.49);
    }

    #[test]
    fn test_transform_point_uses_rotation() {
        let pose = Pose::from_yaw_pitch(vec3(1.0, 2.0, 3.0), Deg(90.0), Deg(0.0));
        let world = pose.transform_point(vec3(0.0, 0.0, 2.0));
        assert!((world - vec3(3.0, 2.0, 3.0)).magnitude() < 1e-5);
    }
}
