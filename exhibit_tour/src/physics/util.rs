use cgmath::{InnerSpace, Vector3};
use rapier3d::prelude::*;

pub fn nvec_to_cgmath(vec: Vector<Real>) -> Vector3<f32> {
    Vector3 {
        x: vec.x,
        y: vec.y,
        z: vec.z,
    }
}

pub fn vec_to_nvec(vec: Vector3<f32>) -> Vector<Real> {
    vector![vec.x, vec.y, vec.z]
}

pub fn translation_isometry(position: Vector3<f32>) -> Isometry<Real> {
    Isometry::translation(position.x, position.y, position.z)
}

/// Upright capsule shape and its pose, from two sphere centres.
pub fn capsule_between(
    top: Vector3<f32>,
    bottom: Vector3<f32>,
    radius: f32,
) -> (SharedShape, Isometry<Real>) {
    let center = (top + bottom) * 0.5;
    let half_height = (top - bottom).magnitude() * 0.5;
    (
        SharedShape::capsule_y(half_height, radius),
        translation_isometry(center),
    )
}
