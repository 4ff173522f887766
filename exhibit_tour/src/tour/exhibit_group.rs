use crate::pose::Pose;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaypointKind {
    Main,
    Detail,
    Wide,
    FreeRoamStart,
}

/// Free-roam-only wall colliders of one group, addressed by name in the physics world.
#[derive(Clone, Debug, PartialEq)]
pub struct WallSet {
    pub name: String,
    active: bool,
}

impl WallSet {
    pub fn new(name: impl Into<String>) -> WallSet {
        WallSet {
            name: name.into(),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

/// One exhibit station: its waypoints and optional free-roam walls.
#[derive(Clone, Debug, PartialEq)]
pub struct ExhibitGroup {
    pub name: String,
    pub main: Option<Pose>,
    pub detail: Option<Pose>,
    pub wide: Option<Pose>,
    pub free_roam_start: Option<Pose>,
    pub walls: Option<WallSet>,
}

impl ExhibitGroup {
    pub fn new(name: impl Into<String>) -> ExhibitGroup {
        ExhibitGroup {
            name: name.into(),
            main: None,
            detail: None,
            wide: None,
            free_roam_start: None,
            walls: None,
        }
    }

    pub fn waypoint(&self, kind: WaypointKind) -> Option<Pose> {
        match kind {
            WaypointKind::Main => self.main,
            WaypointKind::Detail => self.detail,
            WaypointKind::Wide => self.wide,
            WaypointKind::FreeRoamStart => self.free_roam_start,
        }
    }

    pub fn set_waypoint(&mut self, kind: WaypointKind, pose: Option<Pose>) {
        let slot = match kind {
            WaypointKind::Main => &mut self.main,
            WaypointKind::Detail => &mut self.detail,
            WaypointKind::Wide => &mut self.wide,
            WaypointKind::FreeRoamStart => &mut self.free_roam_start,
        };
        *slot = pose;
    }

    pub fn with_waypoint(mut self, kind: WaypointKind, pose: Pose) -> ExhibitGroup {
        self.set_waypoint(kind, Some(pose));
        self
    }

    pub fn with_walls(mut self, name: impl Into<String>) -> ExhibitGroup {
        self.walls = Some(WallSet::new(name));
        self
    }
}
