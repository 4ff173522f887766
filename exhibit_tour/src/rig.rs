//! The player rig: a movable tracking-space origin with the tracked head as a child.
//!
//! The host owns the real rig; the tour only talks to it through [`PlayerRig`].
//! [`RigTeleporter`] is the single pose-application primitive every waypoint travel goes
//! through.

use cgmath::{Deg, Rotation, Vector3, vec3};

use crate::{
    error::FrameIssue,
    math::{UP, horizontal_direction, normalize_angle, signed_angle, yaw_rotation},
    pose::Pose,
};

pub trait PlayerRig {
    /// World pose of the tracked head, `None` while no head/camera is attached.
    fn head_pose(&self) -> Option<Pose>;

    /// Head pose relative to the rig origin (the raw tracking value).
    fn head_local_pose(&self) -> Option<Pose>;

    fn origin_position(&self) -> Vector3<f32>;

    fn set_origin_position(&mut self, position: Vector3<f32>);

    /// Heading of the rig origin about world up.
    fn origin_yaw(&self) -> Deg<f32>;

    /// Displace the origin so the head lands exactly on `position`, keeping the user's
    /// real-world offset inside the play space.
    fn move_head_to_world_position(&mut self, position: Vector3<f32>);

    /// Rotate the whole rig about world up through the head position.
    fn rotate_rig_around_head(&mut self, delta_yaw: Deg<f32>);
}

/// In-process rig: origin position + yaw, with a tracked head pose in origin space.
/// Used by the headless runtime and by tests.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedRig {
    origin: Vector3<f32>,
    yaw: Deg<f32>,
    head_local: Option<Pose>,
}

impl SimulatedRig {
    pub fn new(origin: Vector3<f32>, head_local: Option<Pose>) -> SimulatedRig {
        SimulatedRig {
            origin,
            yaw: Deg(0.0),
            head_local,
        }
    }

    /// Rig at the world origin with the head `height` metres above the floor, looking ahead.
    pub fn standing(height: f32) -> SimulatedRig {
        SimulatedRig::new(
            vec3(0.0, 0.0, 0.0),
            Some(Pose::at(vec3(0.0, height, 0.0))),
        )
    }

    /// Feed a new tracking sample, as the headset would every frame.
    pub fn set_head_local_pose(&mut self, head_local: Option<Pose>) {
        self.head_local = head_local;
    }

    pub fn set_origin_yaw(&mut self, yaw: Deg<f32>) {
        self.yaw = normalize_angle(yaw);
    }
}

impl PlayerRig for SimulatedRig {
    fn head_pose(&self) -> Option<Pose> {
        let local = self.head_local?;
        let rig_rotation = yaw_rotation(self.yaw);
        Some(Pose::new(
            self.origin + rig_rotation.rotate_vector(local.position),
            rig_rotation * local.rotation,
        ))
    }

    fn head_local_pose(&self) -> Option<Pose> {
        self.head_local
    }

    fn origin_position(&self) -> Vector3<f32> {
        self.origin
    }

    fn set_origin_position(&mut self, position: Vector3<f32>) {
        self.origin = position;
    }

    fn origin_yaw(&self) -> Deg<f32> {
        self.yaw
    }

    fn move_head_to_world_position(&mut self, position: Vector3<f32>) {
        match self.head_pose() {
            Some(head) => self.origin += position - head.position,
            None => self.origin = position,
        }
    }

    fn rotate_rig_around_head(&mut self, delta_yaw: Deg<f32>) {
        let Some(local) = self.head_local else {
            self.yaw = normalize_angle(self.yaw + delta_yaw);
            return;
        };
        let pivot = self.origin + yaw_rotation(self.yaw).rotate_vector(local.position);
        self.yaw = normalize_angle(self.yaw + delta_yaw);
        self.origin = pivot - yaw_rotation(self.yaw).rotate_vector(local.position);
    }
}

/// What a teleport actually did.
#[derive(Clone, Debug, PartialEq)]
pub enum TeleportOutcome {
    /// Nothing moved.
    Skipped(FrameIssue),
    /// Head placed, facing left alone because a forward was (nearly) vertical.
    PositionOnly,
    /// Head placed and the rig yawed by the given delta.
    PositionAndYaw(Deg<f32>),
}

impl TeleportOutcome {
    pub fn moved(&self) -> bool {
        !matches!(self, TeleportOutcome::Skipped(_))
    }
}

pub struct RigTeleporter;

impl RigTeleporter {
    /// Put the head exactly on `target.position` and match the target's horizontal facing.
    /// Pitch and roll of the target are ignored: the user's head is never tilted for them.
    pub fn teleport(rig: &mut dyn PlayerRig, target: &Pose) -> TeleportOutcome {
        if rig.head_pose().is_none() {
            let issue = FrameIssue::MissingReference("rig head");
            engine::tour_log!(DEBUG, "teleport skipped: {}", issue);
            return TeleportOutcome::Skipped(issue);
        }

        rig.move_head_to_world_position(target.position);

        let Some(head) = rig.head_pose() else {
            return TeleportOutcome::PositionOnly;
        };

        let current = horizontal_direction(head.forward());
        let desired = horizontal_direction(target.forward());
        match (current, desired) {
            (Some(current), Some(desired)) => {
                let delta = signed_angle(current, desired, UP);
                rig.rotate_rig_around_head(delta);
                TeleportOutcome::PositionAndYaw(delta)
            }
            _ => {
                engine::tour_log!(
                    DEBUG,
                    "teleport yaw skipped: {}",
                    FrameIssue::DegenerateGeometry("vertical forward")
                );
                TeleportOutcome::PositionOnly
            }
        }
    }
}
