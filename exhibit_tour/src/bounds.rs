//! Free-roam boundary: keeps the rig origin inside one of several pre-placed regions.

use cgmath::{InnerSpace, Vector3, vec3};
use serde::{Deserialize, Serialize};

use crate::{error::FrameIssue, math::clamp_index, rig::PlayerRig};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundShape {
    #[default]
    Box,
    Sphere,
}

/// Axis-aligned region volume. `is_trigger` mirrors the physics collider's mode: regions
/// constrain through [`BoundsRegion::clamp`], never through collision response.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionCollider {
    pub name: String,
    pub center: Vector3<f32>,
    pub half_extents: Vector3<f32>,
    pub is_trigger: bool,
}

impl RegionCollider {
    pub fn new(name: impl Into<String>, center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        RegionCollider {
            name: name.into(),
            center,
            half_extents: vec3(half_extents.x.abs(), half_extents.y.abs(), half_extents.z.abs()),
            is_trigger: false,
        }
    }

    pub fn min(&self) -> Vector3<f32> {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vector3<f32> {
        self.center + self.half_extents
    }

    pub fn max_extent(&self) -> f32 {
        self.half_extents
            .x
            .max(self.half_extents.y)
            .max(self.half_extents.z)
    }
}

#[derive(Clone, Debug)]
pub struct BoundsRegion {
    pub shape: BoundShape,
    colliders: Vec<Option<RegionCollider>>,
    active_area_index: usize,
    pub force_trigger_on_enable: bool,
    pub lock_y_to_bounds: bool,
    enabled: bool,
}

impl BoundsRegion {
    pub fn new(shape: BoundShape, colliders: Vec<Option<RegionCollider>>) -> BoundsRegion {
        BoundsRegion {
            shape,
            colliders,
            active_area_index: 0,
            force_trigger_on_enable: true,
            lock_y_to_bounds: true,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enabling forces every region collider into trigger mode (when configured).
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled && self.force_trigger_on_enable {
            for collider in self.colliders.iter_mut().flatten() {
                collider.is_trigger = true;
            }
        }
        self.enabled = enabled;
    }

    /// Store the area to constrain to. Out-of-range values are clamped when used.
    pub fn set_active_area(&mut self, index: usize) {
        self.active_area_index = index;
    }

    pub fn active_area_index(&self) -> usize {
        self.active_area_index
    }

    pub fn colliders(&self) -> &[Option<RegionCollider>] {
        &self.colliders
    }

    pub fn active_collider(&self) -> Option<&RegionCollider> {
        let index = clamp_index(self.active_area_index, self.colliders.len())?;
        if index != self.active_area_index {
            engine::tour_log!(
                DEBUG,
                "{}",
                FrameIssue::OutOfRangeIndex {
                    what: "bounds area",
                    index: self.active_area_index,
                    len: self.colliders.len(),
                }
            );
        }
        self.colliders[index].as_ref()
    }

    /// Clamp `position` into the active region. Returns it unchanged when there is no
    /// usable region.
    pub fn clamp(&self, position: Vector3<f32>) -> Vector3<f32> {
        let Some(collider) = self.active_collider() else {
            return position;
        };

        let min = collider.min();
        let max = collider.max();
        let mut clamped = position;

        match self.shape {
            BoundShape::Box => {
                clamped.x = clamped.x.clamp(min.x, max.x);
                clamped.z = clamped.z.clamp(min.z, max.z);
                if self.lock_y_to_bounds {
                    clamped.y = clamped.y.clamp(min.y, max.y);
                }
            }
            BoundShape::Sphere => {
                let radius = collider.max_extent();
                let offset = clamped - collider.center;
                if offset.magnitude2() > radius * radius {
                    clamped = collider.center + offset.normalize() * radius;
                }
                if self.lock_y_to_bounds {
                    clamped.y = clamped.y.clamp(min.y, max.y);
                }
            }
        }

        clamped
    }

    /// Late-update step: pull the rig origin back inside while enabled.
    pub fn tick(&self, rig: &mut dyn PlayerRig) {
        if !self.enabled {
            return;
        }
        let origin = rig.origin_position();
        let clamped = self.clamp(origin);
        if clamped != origin {
            engine::locomotion_log!(TRACE, "bounds clamp {:?} -> {:?}", origin, clamped);
            rig.set_origin_position(clamped);
        }
    }
}
