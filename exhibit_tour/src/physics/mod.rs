//! rapier3d backend for the locomotion seams: collision-aware character moves,
//! capsule depenetration, free-roam walls and bounds sensors.

pub mod util;

use std::collections::HashMap;

use cgmath::{Deg, Rotation, Vector3};
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;

use crate::{
    bounds::RegionCollider,
    locomotion::{Capsule, CapsuleShape, CharacterMotor, MoveOutcome, Penetration, PenetrationQuery},
    math::{UP, yaw_rotation},
    tour::WallSet,
};

use self::util::{capsule_between, nvec_to_cgmath, translation_isometry, vec_to_nvec};

fn is_enabled(_handle: ColliderHandle, collider: &Collider) -> bool {
    collider.is_enabled()
}

pub struct PhysicsWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    query_pipeline: QueryPipeline,
    controller: KinematicCharacterController,
    character: CapsuleShape,
    character_offset: Vector3<f32>,
    walls: HashMap<String, Vec<ColliderHandle>>,
    regions: Vec<ColliderHandle>,
}

impl PhysicsWorld {
    pub fn new() -> PhysicsWorld {
        let controller = KinematicCharacterController {
            offset: CharacterLength::Absolute(0.01),
            autostep: Some(CharacterAutostep {
                max_height: CharacterLength::Absolute(0.3),
                min_width: CharacterLength::Absolute(0.2),
                include_dynamic_bodies: false,
            }),
            max_slope_climb_angle: 45.0_f32.to_radians(),
            min_slope_slide_angle: 30.0_f32.to_radians(),
            snap_to_ground: Some(CharacterLength::Absolute(0.2)),
            ..KinematicCharacterController::default()
        };

        let character = CapsuleShape {
            height: 1.6,
            radius: 0.25,
            center: Vector3::new(0.0, 0.75, 0.0),
            skin_width: 0.1,
        };

        PhysicsWorld {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            controller,
            character,
            character_offset: character.center,
            walls: HashMap::new(),
            regions: Vec::new(),
        }
    }

    fn refresh(&mut self) {
        self.query_pipeline.update(&self.bodies, &self.colliders);
    }

    fn insert_box(
        &mut self,
        center: Vector3<f32>,
        half_extents: Vector3<f32>,
        sensor: bool,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vec_to_nvec(center))
            .sensor(sensor)
            .build();
        let handle = self.colliders.insert(collider);
        self.refresh();
        handle
    }

    /// Static level geometry (floors, plinths, exhibit cases).
    pub fn add_static_box(
        &mut self,
        center: Vector3<f32>,
        half_extents: Vector3<f32>,
    ) -> ColliderHandle {
        self.insert_box(center, half_extents, false)
    }

    /// Solid wall belonging to a named free-roam wall set. Walls start disabled.
    pub fn add_wall(
        &mut self,
        set_name: &str,
        center: Vector3<f32>,
        half_extents: Vector3<f32>,
    ) -> ColliderHandle {
        let handle = self.insert_box(center, half_extents, false);
        if let Some(collider) = self.colliders.get_mut(handle) {
            collider.set_enabled(false);
        }
        self.refresh();
        self.walls.entry(set_name.to_owned()).or_default().push(handle);
        handle
    }

    /// Bounds area volume. Trigger regions become sensors and never block movement.
    pub fn add_region(&mut self, region: &RegionCollider) -> ColliderHandle {
        let handle = self.insert_box(region.center, region.half_extents, region.is_trigger);
        self.regions.push(handle);
        handle
    }

    /// Keep region colliders' sensor flag in step with the bounds region.
    pub fn sync_regions<'a>(&mut self, regions: impl IntoIterator<Item = &'a RegionCollider>) {
        let mut changed = false;
        for (handle, region) in self.regions.iter().zip(regions) {
            if let Some(collider) = self.colliders.get_mut(*handle) {
                if collider.is_sensor() != region.is_trigger {
                    collider.set_sensor(region.is_trigger);
                    changed = true;
                }
            }
        }
        if changed {
            self.refresh();
        }
    }

    /// Mirror the controller's wall state onto the colliders.
    pub fn sync_walls<'a>(&mut self, wall_sets: impl IntoIterator<Item = &'a WallSet>) {
        let mut changed = false;
        for wall_set in wall_sets {
            let Some(handles) = self.walls.get(&wall_set.name) else {
                engine::physics_log!(DEBUG, "no colliders for wall set {}", wall_set.name);
                continue;
            };
            for handle in handles {
                if let Some(collider) = self.colliders.get_mut(*handle) {
                    if collider.is_enabled() != wall_set.is_active() {
                        collider.set_enabled(wall_set.is_active());
                        changed = true;
                    }
                }
            }
        }
        if changed {
            engine::physics_log!(DEBUG, "wall colliders resynchronised");
            self.refresh();
        }
    }

    pub fn is_wall_set_enabled(&self, set_name: &str) -> bool {
        self.walls.get(set_name).is_some_and(|handles| {
            handles
                .iter()
                .filter_map(|handle| self.colliders.get(*handle))
                .all(|collider| collider.is_enabled())
        })
    }

    /// Capsule used by [`CharacterMotor::move_character`], in rig space.
    pub fn set_character(&mut self, shape: CapsuleShape, rig_yaw: Deg<f32>) {
        self.character = shape;
        self.character_offset = yaw_rotation(rig_yaw).rotate_vector(shape.center);
    }

    /// First solid hit straight down from `from`, within `max_distance`.
    pub fn ground_height(&self, from: Vector3<f32>, max_distance: f32) -> Option<f32> {
        let ray = Ray::new(point![from.x, from.y, from.z], vec_to_nvec(-UP));
        let filter = QueryFilter::default().exclude_sensors().predicate(&is_enabled);
        self.query_pipeline
            .cast_ray(&self.bodies, &self.colliders, &ray, max_distance, true, filter)
            .map(|(_, toi)| from.y - toi)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        PhysicsWorld::new()
    }
}

impl CharacterMotor for PhysicsWorld {
    fn move_character(
        &mut self,
        origin: Vector3<f32>,
        desired: Vector3<f32>,
        dt: f32,
    ) -> MoveOutcome {
        let half_height = self.character.half_segment();
        let shape = SharedShape::capsule_y(half_height, self.character.radius);
        let position = translation_isometry(origin + self.character_offset);
        let filter = QueryFilter::default().exclude_sensors().predicate(&is_enabled);

        let movement = self.controller.move_shape(
            dt,
            &self.bodies,
            &self.colliders,
            &self.query_pipeline,
            shape.as_ref(),
            &position,
            vec_to_nvec(desired),
            filter,
            |_| {},
        );

        MoveOutcome {
            translation: nvec_to_cgmath(movement.translation),
            grounded: movement.grounded,
        }
    }
}

impl PenetrationQuery for PhysicsWorld {
    fn penetrations(&self, capsule: &Capsule) -> Vec<Penetration> {
        let (shape, position) = capsule_between(capsule.top, capsule.bottom, capsule.radius);
        let filter = QueryFilter::default().exclude_sensors().predicate(&is_enabled);

        let mut overlapping = Vec::new();
        self.query_pipeline.intersections_with_shape(
            &self.bodies,
            &self.colliders,
            &position,
            shape.as_ref(),
            filter,
            |handle| {
                overlapping.push(handle);
                true
            },
        );

        overlapping
            .into_iter()
            .filter_map(|handle| {
                let collider = self.colliders.get(handle)?;
                let contact = rapier3d::parry::query::contact(
                    &position,
                    shape.as_ref(),
                    collider.position(),
                    collider.shape(),
                    0.0,
                )
                .ok()??;
                if contact.dist >= 0.0 {
                    return None;
                }
                Some(Penetration {
                    direction: -nvec_to_cgmath(contact.normal1.into_inner()),
                    distance: -contact.dist,
                })
            })
            .collect()
    }
}
