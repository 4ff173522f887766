use cgmath::{Rotation, Vector3, vec3};
use serde::{Deserialize, Serialize};

use crate::{
    error::FrameIssue,
    math::{UP, lerp, lerp_vec, yaw_rotation},
    rig::PlayerRig,
};

use super::{Capsule, PenetrationQuery};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsuleDriverConfig {
    pub min_height: f32,
    pub max_height: f32,
    pub radius: f32,
    pub skin_width: f32,
    pub center_on_head_xz: bool,
    pub center_offset_y: f32,
    /// Keep the capsule under the body even when the player leans far out.
    pub center_max_distance: f32,
    pub smooth: bool,
    pub lerp_speed: f32,
    pub resolve_overlaps: bool,
    pub max_resolve_iterations: usize,
}

impl Default for CapsuleDriverConfig {
    fn default() -> Self {
        CapsuleDriverConfig {
            min_height: 1.0,
            max_height: 2.2,
            radius: 0.25,
            skin_width: 0.1,
            center_on_head_xz: true,
            center_offset_y: -0.05,
            center_max_distance: 0.25,
            smooth: true,
            lerp_speed: 20.0,
            resolve_overlaps: true,
            max_resolve_iterations: 8,
        }
    }
}

/// Character capsule in rig space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapsuleShape {
    pub height: f32,
    pub radius: f32,
    pub center: Vector3<f32>,
    pub skin_width: f32,
}

impl CapsuleShape {
    /// Distance from the capsule centre to either sphere centre.
    pub fn half_segment(&self) -> f32 {
        (self.height * 0.5 - self.radius).max(0.0)
    }
}

/// Fits the character capsule to the tracked head every tick and pushes the rig out
/// of anything it ended up inside.
#[derive(Clone, Debug)]
pub struct CapsuleDriver {
    pub config: CapsuleDriverConfig,
    shape: CapsuleShape,
}

impl CapsuleDriver {
    pub fn new(config: CapsuleDriverConfig) -> CapsuleDriver {
        let height = config.min_height;
        let shape = CapsuleShape {
            height,
            radius: config.radius,
            center: vec3(0.0, height * 0.5 + config.center_offset_y, 0.0),
            skin_width: config.skin_width,
        };
        CapsuleDriver { config, shape }
    }

    pub fn shape(&self) -> CapsuleShape {
        self.shape
    }

    /// Capsule in world space for the rig's current origin and yaw.
    pub fn world_capsule(&self, rig: &dyn PlayerRig) -> Capsule {
        let center = rig.origin_position()
            + yaw_rotation(rig.origin_yaw()).rotate_vector(self.shape.center);
        let half = self.shape.half_segment();
        Capsule {
            top: center + UP * half,
            bottom: center - UP * half,
            radius: self.shape.radius,
        }
    }

    fn query_capsule(&self, rig: &dyn PlayerRig) -> Capsule {
        let mut capsule = self.world_capsule(rig);
        capsule.radius = (capsule.radius - self.shape.skin_width - 0.02).max(0.01);
        capsule
    }

    /// Late-update: fit the capsule, then resolve overlaps through `query`.
    pub fn update(
        &mut self,
        rig: &mut dyn PlayerRig,
        dt: f32,
        query: Option<&dyn PenetrationQuery>,
    ) -> CapsuleShape {
        let Some(head) = rig.head_local_pose() else {
            engine::physics_log!(
                DEBUG,
                "capsule fit skipped: {}",
                FrameIssue::MissingReference("rig head")
            );
            return self.shape;
        };

        let config = &self.config;
        let target_height = head.position.y.clamp(config.min_height, config.max_height);
        let mut target_center = self.shape.center;
        if config.center_on_head_xz {
            let reach = config.center_max_distance.max(0.0);
            target_center.x = head.position.x.clamp(-reach, reach);
            target_center.z = head.position.z.clamp(-reach, reach);
        }
        target_center.y = target_height * 0.5 + config.center_offset_y;

        if config.smooth {
            let t = dt * config.lerp_speed;
            self.shape.height = lerp(self.shape.height, target_height, t);
            self.shape.center = lerp_vec(self.shape.center, target_center, t);
        } else {
            self.shape.height = target_height;
            self.shape.center = target_center;
        }
        self.shape.radius = config.radius;
        self.shape.skin_width = config.skin_width;

        if config.resolve_overlaps {
            if let Some(query) = query {
                self.resolve_overlaps(rig, query);
            }
        }
        self.shape
    }

    fn resolve_overlaps(&self, rig: &mut dyn PlayerRig, query: &dyn PenetrationQuery) {
        for iteration in 0..self.config.max_resolve_iterations {
            let penetrations = query.penetrations(&self.query_capsule(rig));
            if penetrations.is_empty() {
                return;
            }

            let push = penetrations
                .iter()
                .fold(vec3(0.0, 0.0, 0.0), |total, p| total + p.direction * (p.distance + 0.001));
            engine::physics_log!(
                DEBUG,
                "depenetration pass {}: {} overlaps, push {:?}",
                iteration,
                penetrations.len(),
                push
            );
            rig.set_origin_position(rig.origin_position() + push);
        }
    }
}

impl Default for CapsuleDriver {
    fn default() -> Self {
        CapsuleDriver::new(CapsuleDriverConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{locomotion::Penetration, pose::Pose, rig::SimulatedRig};
    use cgmath::InnerSpace;

    /// Solid wall filling x >= 1.
    struct WallAtX;

    impl PenetrationQuery for WallAtX {
        fn penetrations(&self, capsule: &Capsule) -> Vec<Penetration> {
            let reach = capsule.top.x + capsule.radius;
            if reach > 1.0 {
                vec![Penetration {
                    direction: vec3(-1.0, 0.0, 0.0),
                    distance: reach - 1.0,
                }]
            } else {
                Vec::new()
            }
        }
    }

    fn unsmoothed() -> CapsuleDriver {
        CapsuleDriver::new(CapsuleDriverConfig {
            smooth: false,
            ..CapsuleDriverConfig::default()
        })
    }

    #[test]
    fn test_height_follows_head_within_limits() {
        let mut driver = unsmoothed();
        let mut rig = SimulatedRig::standing(1.7);
        assert_eq!(driver.update(&mut rig, 0.1, None).height, 1.7);

        rig.set_head_local_pose(Some(Pose::at(vec3(0.0, 0.4, 0.0))));
        assert_eq!(driver.update(&mut rig, 0.1, None).height, 1.0);

        rig.set_head_local_pose(Some(Pose::at(vec3(0.0, 3.0, 0.0))));
        let shape = driver.update(&mut rig, 0.1, None);
        assert_eq!(shape.height, 2.2);
        assert!((shape.center.y - 1.05).abs() < 1e-5);
    }

    #[test]
    fn test_center_clamped_under_body() {
        let mut driver = unsmoothed();
        let mut rig = SimulatedRig::new(vec3(0.0, 0.0, 0.0), Some(Pose::at(vec3(0.9, 1.6, -0.1))));
        let shape = driver.update(&mut rig, 0.1, None);
        assert_eq!(shape.center.x, 0.25);
        assert_eq!(shape.center.z, -0.1);
    }

    #[test]
    fn test_negative_center_reach_pins_center() {
        let mut driver = CapsuleDriver::new(CapsuleDriverConfig {
            smooth: false,
            center_max_distance: -0.25,
            ..CapsuleDriverConfig::default()
        });
        let mut rig = SimulatedRig::new(vec3(0.0, 0.0, 0.0), Some(Pose::at(vec3(0.9, 1.6, -0.1))));
        let shape = driver.update(&mut rig, 0.1, None);
        assert_eq!(shape.center.x, 0.0);
        assert_eq!(shape.center.z, 0.0);
    }

    #[test]
    fn test_smoothing_moves_part_way() {
        let mut driver = CapsuleDriver::default();
        let mut rig = SimulatedRig::standing(2.0);
        let shape = driver.update(&mut rig, 0.025, None);
        assert!((shape.height - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_resolves_wall_overlap() {
        let mut driver = unsmoothed();
        let mut rig = SimulatedRig::standing(1.6);
        rig.set_origin_position(vec3(0.9, 0.0, 0.0));

        driver.update(&mut rig, 0.1, Some(&WallAtX));
        let capsule = driver.query_capsule(&rig);
        assert!(capsule.top.x + capsule.radius <= 1.0);
        assert!((rig.origin_position() - vec3(0.9, 0.0, 0.0)).magnitude() < 0.2);
    }

    #[test]
    fn test_missing_head_keeps_shape() {
        let mut driver = unsmoothed();
        let before = driver.shape();
        let mut rig = SimulatedRig::new(vec3(0.0, 0.0, 0.0), None);
        assert_eq!(driver.update(&mut rig, 0.1, None), before);
    }
}
