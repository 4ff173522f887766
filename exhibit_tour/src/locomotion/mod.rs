//! Player-driven movement. Every mover is a [`LocomotionProvider`] that the tour
//! controller enables, disables and reconfigures per mode.

mod capsule_driver;
mod character_mover;
mod snap_turn;
mod vertical_mover;

pub use capsule_driver::*;
pub use character_mover::*;
pub use snap_turn::*;
pub use vertical_mover::*;

use cgmath::Vector3;

use crate::{input::InputContext, rig::PlayerRig, time::Time};

/// Result of a collision-aware move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveOutcome {
    /// Translation actually achieved after collision response.
    pub translation: Vector3<f32>,
    pub grounded: bool,
}

/// Collision-aware "move with response" primitive (steps, slopes, walls).
pub trait CharacterMotor {
    /// Attempt to displace a character standing at `origin` by `desired`.
    fn move_character(
        &mut self,
        origin: Vector3<f32>,
        desired: Vector3<f32>,
        dt: f32,
    ) -> MoveOutcome;
}

/// World-space capsule between two sphere centres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capsule {
    pub top: Vector3<f32>,
    pub bottom: Vector3<f32>,
    pub radius: f32,
}

/// Minimum translation that pushes a capsule out of one solid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Penetration {
    pub direction: Vector3<f32>,
    pub distance: f32,
}

pub trait PenetrationQuery {
    /// One entry per solid (non-sensor, enabled) collider overlapping `capsule`.
    fn penetrations(&self, capsule: &Capsule) -> Vec<Penetration>;
}

/// Everything a provider may read or touch during one tick.
pub struct LocomotionContext<'a> {
    pub time: &'a Time,
    pub input: &'a InputContext,
    pub rig: &'a mut dyn PlayerRig,
    pub motor: Option<&'a mut dyn CharacterMotor>,
}

impl<'a> LocomotionContext<'a> {
    pub fn new(
        time: &'a Time,
        input: &'a InputContext,
        rig: &'a mut dyn PlayerRig,
        motor: Option<&'a mut dyn CharacterMotor>,
    ) -> LocomotionContext<'a> {
        LocomotionContext {
            time,
            input,
            rig,
            motor,
        }
    }

    pub fn has_motor(&self) -> bool {
        self.motor.is_some()
    }

    /// Move the rig origin through the motor when there is one, otherwise directly.
    /// Returns the motor's grounded flag, or `None` for a direct move.
    pub fn move_rig(&mut self, delta: Vector3<f32>, dt: f32) -> Option<bool> {
        let origin = self.rig.origin_position();
        match self.motor.as_deref_mut() {
            Some(motor) => {
                let outcome = motor.move_character(origin, delta, dt);
                self.rig.set_origin_position(origin + outcome.translation);
                Some(outcome.grounded)
            }
            None => {
                self.rig.set_origin_position(origin + delta);
                None
            }
        }
    }
}

/// A movement behaviour that can be switched on and off by the tour.
///
/// Disabling takes effect on the very next tick: a disabled provider must not touch
/// the rig.
pub trait LocomotionProvider {
    fn name(&self) -> &str;
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
    fn tick(&mut self, ctx: &mut LocomotionContext<'_>);
}
