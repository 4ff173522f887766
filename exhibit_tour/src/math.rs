use cgmath::{Deg, InnerSpace, Quaternion, Rad, Rotation3, Vector3, vec3};

/// World up. The tour space is Y-up.
pub const UP: Vector3<f32> = vec3(0.0, 1.0, 0.0);
/// Local forward of every pose (+Z). A positive yaw turns +Z towards +X.
pub const FORWARD: Vector3<f32> = vec3(0.0, 0.0, 1.0);
pub const RIGHT: Vector3<f32> = vec3(1.0, 0.0, 0.0);

/// Squared length under which a direction is treated as degenerate.
pub const DEGENERATE_EPSILON: f32 = 1e-6;

pub fn project_on_plane(v: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    let normal_sq = normal.magnitude2();
    if normal_sq < DEGENERATE_EPSILON {
        return v;
    }
    v - normal * (v.dot(normal) / normal_sq)
}

/// Unit horizontal component of `v`, or `None` when `v` is (nearly) vertical.
pub fn horizontal_direction(v: Vector3<f32>) -> Option<Vector3<f32>> {
    let flat = project_on_plane(v, UP);
    if flat.magnitude2() < DEGENERATE_EPSILON {
        None
    } else {
        Some(flat.normalize())
    }
}

/// Unsigned angle between two vectors, 0 when either is zero-length.
pub fn angle_between(a: Vector3<f32>, b: Vector3<f32>) -> Deg<f32> {
    let denominator = (a.magnitude2() * b.magnitude2()).sqrt();
    if denominator < 1e-15 {
        return Deg(0.0);
    }
    let cos = (a.dot(b) / denominator).clamp(-1.0, 1.0);
    Rad(cos.acos()).into()
}

/// Angle from `from` to `to`, signed by the handedness of the turn about `axis`.
pub fn signed_angle(from: Vector3<f32>, to: Vector3<f32>, axis: Vector3<f32>) -> Deg<f32> {
    let unsigned = angle_between(from, to);
    if axis.dot(from.cross(to)) < 0.0 {
        -unsigned
    } else {
        unsigned
    }
}

pub fn yaw_rotation(yaw: Deg<f32>) -> Quaternion<f32> {
    Quaternion::from_angle_y(yaw)
}

/// Heading of a direction about world up, measured from +Z.
pub fn yaw_of(direction: Vector3<f32>) -> Option<Deg<f32>> {
    horizontal_direction(direction).map(|flat| Rad(flat.x.atan2(flat.z)).into())
}

/// Rotation whose forward points along `forward` with no roll. Pitch follows the vertical
/// component of `forward`; returns `None` for a zero vector.
pub fn look_rotation(forward: Vector3<f32>) -> Option<Quaternion<f32>> {
    if forward.magnitude2() < DEGENERATE_EPSILON {
        return None;
    }
    let forward = forward.normalize();
    let yaw = Rad(forward.x.atan2(forward.z));
    let pitch = Rad(-forward.y.clamp(-1.0, 1.0).asin());
    Some(Quaternion::from_angle_y(yaw) * Quaternion::from_angle_x(pitch))
}

/// Yaw-only facing along the horizontal part of `forward`.
pub fn yaw_only_rotation(forward: Vector3<f32>) -> Option<Quaternion<f32>> {
    yaw_of(forward).map(yaw_rotation)
}

/// Wrap an angle into (-180, 180].
pub fn normalize_angle(angle: Deg<f32>) -> Deg<f32> {
    let mut value = angle.0 % 360.0;
    if value > 180.0 {
        value -= 360.0;
    } else if value <= -180.0 {
        value += 360.0;
    }
    Deg(value)
}

/// Clamp an index into `[0, len - 1]`; `None` when there is nothing to index.
pub fn clamp_index(index: usize, len: usize) -> Option<usize> {
    if len == 0 { None } else { Some(index.min(len - 1)) }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

pub fn lerp_vec(a: Vector3<f32>, b: Vector3<f32>, t: f32) -> Vector3<f32> {
    a + (b - a) * t.clamp(0.0, 1.0)
}
