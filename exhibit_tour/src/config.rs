//! Tour setup document: exhibit groups, scene geometry and behaviour tuning, read from
//! JSON. Every section has defaults, so a file only needs the parts it changes.

use std::{fs, path::Path};

use cgmath::{Deg, Vector3, vec3};
use serde::{Deserialize, Serialize};

use crate::{
    bounds::{BoundShape, BoundsRegion, RegionCollider},
    error::TourError,
    gadget::{
        ChargeConfig, SwingConfig, SwingVfxConfig, SwingVfxSpawner, SwingVfxTrigger,
        SwingVfxTriggerConfig, Sword, VfxPrefab,
    },
    gaze_return::GazeReturnConfig,
    head_return_ui::{HeadReturnUi, HeadReturnUiConfig},
    locomotion::{
        CapsuleDriverConfig, CharacterMover, CharacterMoverConfig, SnapTurnConfig,
        SnapTurnProvider, VerticalMover, VerticalMoverConfig,
    },
    pose::Pose,
    tour::{ExhibitGroup, TourModeController, WaypointKind},
    view_switcher::ViewSwitcher,
};

/// A waypoint as authored: position plus yaw/pitch in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaypointConfig {
    pub position: [f32; 3],
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

impl WaypointConfig {
    pub fn new(position: [f32; 3], yaw: f32, pitch: f32) -> WaypointConfig {
        WaypointConfig {
            position,
            yaw,
            pitch,
        }
    }

    pub fn to_pose(&self) -> Pose {
        Pose::from_yaw_pitch(to_vec(self.position), Deg(self.yaw), Deg(self.pitch))
    }

    fn is_finite(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
            && self.yaw.is_finite()
            && self.pitch.is_finite()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxConfig {
    #[serde(default)]
    pub name: String,
    pub center: [f32; 3],
    pub half_extents: [f32; 3],
}

impl BoxConfig {
    pub fn new(name: &str, center: [f32; 3], half_extents: [f32; 3]) -> BoxConfig {
        BoxConfig {
            name: name.to_string(),
            center,
            half_extents,
        }
    }

    pub fn center(&self) -> Vector3<f32> {
        to_vec(self.center)
    }

    pub fn half_extents(&self) -> Vector3<f32> {
        to_vec(self.half_extents)
    }

    fn is_valid(&self) -> bool {
        self.center.iter().all(|v| v.is_finite())
            && self.half_extents.iter().all(|v| v.is_finite() && *v >= 0.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallConfig {
    pub name: String,
    #[serde(default)]
    pub boxes: Vec<BoxConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    pub name: String,
    pub main: Option<WaypointConfig>,
    pub detail: Option<WaypointConfig>,
    pub wide: Option<WaypointConfig>,
    pub free_roam_start: Option<WaypointConfig>,
    pub walls: Option<WallConfig>,
}

impl GroupConfig {
    fn waypoints(&self) -> [(WaypointKind, &Option<WaypointConfig>); 4] {
        [
            (WaypointKind::Main, &self.main),
            (WaypointKind::Detail, &self.detail),
            (WaypointKind::Wide, &self.wide),
            (WaypointKind::FreeRoamStart, &self.free_roam_start),
        ]
    }

    pub fn to_group(&self) -> ExhibitGroup {
        let mut group = ExhibitGroup::new(self.name.clone());
        for (kind, waypoint) in self.waypoints() {
            group.set_waypoint(kind, waypoint.as_ref().map(WaypointConfig::to_pose));
        }
        if let Some(walls) = &self.walls {
            group = group.with_walls(walls.name.clone());
        }
        group
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsConfig {
    pub shape: BoundShape,
    /// One area per exhibit group, by index. `null` leaves that group unconstrained.
    pub areas: Vec<Option<BoxConfig>>,
    pub lock_y: bool,
    pub force_trigger: bool,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        BoundsConfig {
            shape: BoundShape::Box,
            areas: Vec::new(),
            lock_y: true,
            force_trigger: true,
        }
    }
}

impl BoundsConfig {
    pub fn region_colliders(&self) -> Vec<Option<RegionCollider>> {
        self.areas
            .iter()
            .enumerate()
            .map(|(index, area)| {
                area.as_ref().map(|area| {
                    let name = if area.name.is_empty() {
                        format!("area_{}", index)
                    } else {
                        area.name.clone()
                    };
                    RegionCollider::new(name, area.center(), area.half_extents())
                })
            })
            .collect()
    }

    pub fn to_region(&self) -> BoundsRegion {
        let mut region = BoundsRegion::new(self.shape, self.region_colliders());
        region.lock_y_to_bounds = self.lock_y;
        region.force_trigger_on_enable = self.force_trigger;
        region
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwordConfig {
    pub charge: ChargeConfig,
    pub swing: SwingConfig,
    pub vfx: SwingVfxConfig,
    pub normal_vfx: Option<VfxPrefab>,
    pub charged_vfx: Option<VfxPrefab>,
    pub trigger: SwingVfxTriggerConfig,
    pub particle: Option<String>,
    pub sound: Option<String>,
}

impl SwordConfig {
    pub fn build(&self) -> Sword {
        let mut sword = Sword::new(self.charge.clone(), self.swing.clone());
        sword.subscribe_swing(Box::new(SwingVfxSpawner::new(
            self.vfx.clone(),
            self.normal_vfx.clone(),
            self.charged_vfx.clone(),
        )));
        sword.subscribe_swing(Box::new(SwingVfxTrigger::new(
            self.trigger.clone(),
            self.particle.clone(),
            self.sound.clone(),
        )));
        sword
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    pub groups: Vec<GroupConfig>,
    pub start_group: usize,
    pub snap_to_start_main_point: bool,
    /// Solid scene geometry (floors, plinths) for the physics world.
    pub static_boxes: Vec<BoxConfig>,
    pub bounds: BoundsConfig,
    pub gaze: GazeReturnConfig,
    pub mover: CharacterMoverConfig,
    pub vertical: VerticalMoverConfig,
    pub capsule: CapsuleDriverConfig,
    pub head_ui: HeadReturnUiConfig,
    /// Comfort turn provider; `null` disables it.
    pub snap_turn: Option<SnapTurnConfig>,
    pub sword: SwordConfig,
}

impl Default for TourConfig {
    fn default() -> Self {
        TourConfig {
            groups: Vec::new(),
            start_group: 0,
            snap_to_start_main_point: true,
            static_boxes: Vec::new(),
            bounds: BoundsConfig::default(),
            gaze: GazeReturnConfig::default(),
            mover: CharacterMoverConfig::default(),
            vertical: VerticalMoverConfig::default(),
            capsule: CapsuleDriverConfig::default(),
            head_ui: HeadReturnUiConfig::default(),
            snap_turn: Some(SnapTurnConfig::default()),
            sword: SwordConfig::default(),
        }
    }
}

impl TourConfig {
    pub fn from_json_str(json: &str, context: &str) -> Result<TourConfig, TourError> {
        serde_json::from_str(json).map_err(|source| TourError::Config {
            context: context.to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<TourConfig, TourError> {
        let json = fs::read_to_string(path).map_err(|source| TourError::Io {
            operation: format!("read {}", path.display()),
            source,
        })?;
        let config = TourConfig::from_json_str(&json, &path.display().to_string())?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, TourError> {
        serde_json::to_string_pretty(self).map_err(|source| TourError::Config {
            context: "serialize tour config".to_string(),
            source,
        })
    }

    /// Reject configurations that cannot drive a tour. Recoverable oddities (a start
    /// group past the end, missing waypoints) only warn; they are handled at runtime.
    pub fn validate(&self) -> Result<(), TourError> {
        if self.groups.is_empty() {
            return Err(TourError::validation(
                "groups",
                "at least one exhibit group is required",
            ));
        }

        for (index, group) in self.groups.iter().enumerate() {
            for (kind, waypoint) in group.waypoints() {
                if waypoint.as_ref().is_some_and(|w| !w.is_finite()) {
                    return Err(TourError::validation(
                        format!("groups[{}].{:?}", index, kind),
                        "waypoint must be finite",
                    ));
                }
            }
            if group.main.is_none() {
                engine::tour_log!(WARN, "group '{}' has no main point", group.name);
            }
            let mut boxes = group.walls.iter().flat_map(|walls| walls.boxes.iter());
            if boxes.any(|b| !b.is_valid()) {
                return Err(TourError::validation(
                    format!("groups[{}].walls", index),
                    "wall boxes need finite centres and non-negative extents",
                ));
            }
        }

        if self.start_group >= self.groups.len() {
            engine::tour_log!(
                WARN,
                "start_group {} out of range, clamping to {}",
                self.start_group,
                self.groups.len() - 1
            );
        }

        let positive = [
            ("gaze.hold_seconds", self.gaze.hold_seconds),
            ("gaze.angle_threshold_degrees", self.gaze.angle_threshold_degrees),
            ("mover.move_speed", self.mover.move_speed),
            ("vertical.speed", self.vertical.speed),
            ("capsule.radius", self.capsule.radius),
            ("sword.charge.hold_seconds", self.sword.charge.hold_seconds),
        ];
        for (item, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TourError::validation(item, "must be positive"));
            }
        }
        let capsule = &self.capsule;
        let non_negative = [
            ("capsule.min_height", capsule.min_height),
            ("capsule.max_height", capsule.max_height),
            ("capsule.center_max_distance", capsule.center_max_distance),
            ("capsule.lerp_speed", capsule.lerp_speed),
        ];
        for (item, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TourError::validation(item, "must be finite and non-negative"));
            }
        }
        if self.capsule.min_height > self.capsule.max_height {
            return Err(TourError::validation(
                "capsule",
                "min_height is larger than max_height",
            ));
        }

        let areas = self.bounds.areas.iter().flatten();
        if areas.chain(self.static_boxes.iter()).any(|b| !b.is_valid()) {
            return Err(TourError::validation(
                "bounds/static_boxes",
                "boxes need finite centres and non-negative extents",
            ));
        }
        Ok(())
    }

    /// Wire up a controller with every behaviour this config describes. Call
    /// [`TourModeController::start`] on it before the first tick.
    pub fn build_controller(&self) -> Result<TourModeController, TourError> {
        self.validate()?;

        let groups = self.groups.iter().map(GroupConfig::to_group).collect();
        let mut controller = TourModeController::new(groups, ViewSwitcher::new(self.gaze.clone()))
            .with_start(self.start_group, self.snap_to_start_main_point)
            .with_mover(CharacterMover::new(self.mover.clone()))
            .with_vertical_mover(VerticalMover::new(self.vertical.clone()))
            .with_return_ui(HeadReturnUi::new(self.head_ui.clone()));

        if !self.bounds.areas.is_empty() {
            controller = controller.with_bounds(self.bounds.to_region());
        }
        if let Some(snap_turn) = &self.snap_turn {
            let provider = SnapTurnProvider::new(snap_turn.clone());
            controller = controller.with_provider(Box::new(provider));
        }
        Ok(controller)
    }

    /// Two-station sample tour used when no config file is given.
    pub fn demo() -> TourConfig {
        let atrium = GroupConfig {
            name: "atrium".to_string(),
            main: Some(WaypointConfig::new([0.0, 0.0, 0.0], 0.0, 0.0)),
            detail: Some(WaypointConfig::new([0.0, 0.0, 3.0], 0.0, -10.0)),
            wide: Some(WaypointConfig::new([0.0, 3.0, -4.0], 0.0, -20.0)),
            free_roam_start: Some(WaypointConfig::new([0.0, 0.0, 1.0], 0.0, 0.0)),
            walls: Some(WallConfig {
                name: "atrium_walls".to_string(),
                boxes: vec![BoxConfig::new("atrium_north", [0.0, 1.5, 4.5], [5.0, 1.5, 0.2])],
            }),
        };
        let gallery = GroupConfig {
            name: "gallery".to_string(),
            main: Some(WaypointConfig::new([20.0, 0.0, 0.0], 90.0, 0.0)),
            detail: Some(WaypointConfig::new([23.0, 0.0, 0.0], 90.0, -15.0)),
            wide: None,
            free_roam_start: Some(WaypointConfig::new([20.0, 0.0, 2.0], 0.0, 0.0)),
            walls: None,
        };

        TourConfig {
            groups: vec![atrium, gallery],
            static_boxes: vec![BoxConfig::new("floor", [10.0, -0.5, 0.0], [20.0, 0.5, 10.0])],
            bounds: BoundsConfig {
                areas: vec![
                    Some(BoxConfig::new("atrium_area", [0.0, 2.0, 0.0], [6.0, 2.0, 6.0])),
                    Some(BoxConfig::new("gallery_area", [20.0, 2.0, 0.0], [6.0, 2.0, 6.0])),
                ],
                ..BoundsConfig::default()
            },
            sword: SwordConfig {
                normal_vfx: Some(VfxPrefab::new("slash", Vec::new())),
                charged_vfx: Some(VfxPrefab::new("force_wave", Vec::new())),
                particle: Some("blade_sparks".to_string()),
                sound: Some("swing_whoosh".to_string()),
                ..SwordConfig::default()
            },
            ..TourConfig::default()
        }
    }
}

fn to_vec(v: [f32; 3]) -> Vector3<f32> {
    vec3(v[0], v[1], v[2])
}
