use cgmath::{Deg, InnerSpace, Rotation, Vector3, vec2, vec3};
use serde::{Deserialize, Serialize};

use crate::{
    error::FrameIssue,
    input::{Axis1Binding, AxisBinding, resolve_planar_input},
    math::{FORWARD, UP, horizontal_direction, yaw_rotation},
};

use super::{LocomotionContext, LocomotionProvider};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterMoverConfig {
    /// m/s
    pub move_speed: f32,
    pub dead_zone: f32,
    pub move_binding: AxisBinding,
    /// Also read WASD and keep whichever source is stronger.
    pub keyboard_fallback: bool,
    pub turn_binding: Axis1Binding,
    pub turn_speed_degrees: f32,
    pub turn_dead_zone: f32,
    /// m/s^2, negative is down
    pub gravity: f32,
    /// Vertical velocity held while grounded so the character stays on the floor.
    pub grounded_stick: f32,
    pub terminal_velocity: f32,
}

impl Default for CharacterMoverConfig {
    fn default() -> Self {
        CharacterMoverConfig {
            move_speed: 2.0,
            dead_zone: 0.15,
            move_binding: AxisBinding::LeftThumbstick,
            keyboard_fallback: true,
            turn_binding: Axis1Binding::RightThumbstickX,
            turn_speed_degrees: 90.0,
            turn_dead_zone: 0.15,
            gravity: -9.81,
            grounded_stick: -1.0,
            terminal_velocity: -25.0,
        }
    }
}

/// The tour's single horizontal mover: head-relative walking with optional gravity,
/// a fly variant that follows the full head direction, and smooth turn assist.
#[derive(Clone, Debug)]
pub struct CharacterMover {
    pub config: CharacterMoverConfig,
    enabled: bool,
    pub use_gravity: bool,
    pub enable_fly: bool,
    pub turn_assist: bool,
    y_velocity: f32,
    grounded: bool,
}

impl CharacterMover {
    pub fn new(config: CharacterMoverConfig) -> CharacterMover {
        CharacterMover {
            config,
            enabled: true,
            use_gravity: true,
            enable_fly: false,
            turn_assist: true,
            y_velocity: 0.0,
            grounded: false,
        }
    }

    pub fn y_velocity(&self) -> f32 {
        self.y_velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn read_planar(&self, ctx: &LocomotionContext<'_>) -> cgmath::Vector2<f32> {
        let stick = self.config.move_binding.read(ctx.input);
        let value = if self.config.keyboard_fallback {
            resolve_planar_input(stick, ctx.input.keyboard.wasd())
        } else {
            stick
        };
        if value.magnitude() < self.config.dead_zone {
            vec2(0.0, 0.0)
        } else {
            value
        }
    }

    fn integrate_gravity(&mut self, dt: f32) {
        if !self.use_gravity || self.enable_fly {
            self.y_velocity = 0.0;
            return;
        }
        if self.grounded && self.y_velocity < 0.0 {
            self.y_velocity = self.config.grounded_stick;
        } else {
            self.y_velocity =
                (self.y_velocity + self.config.gravity * dt).max(self.config.terminal_velocity);
        }
    }
}

impl Default for CharacterMover {
    fn default() -> Self {
        CharacterMover::new(CharacterMoverConfig::default())
    }
}

impl LocomotionProvider for CharacterMover {
    fn name(&self) -> &str {
        "character_mover"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.y_velocity = 0.0;
        }
        self.enabled = enabled;
    }

    fn tick(&mut self, ctx: &mut LocomotionContext<'_>) {
        if !self.enabled {
            return;
        }
        let Some(head) = ctx.rig.head_pose() else {
            engine::locomotion_log!(
                DEBUG,
                "mover idle: {}",
                FrameIssue::MissingReference("rig head")
            );
            return;
        };
        let dt = ctx.time.delta;

        let input = self.read_planar(ctx);
        let mut direction = vec3(0.0, 0.0, 0.0);
        if input.magnitude2() > 0.0 {
            let (forward, right) = if self.enable_fly {
                (head.forward(), head.right())
            } else {
                let forward = horizontal_direction(head.forward())
                    .unwrap_or_else(|| yaw_rotation(ctx.rig.origin_yaw()).rotate_vector(FORWARD));
                (forward, UP.cross(forward).normalize())
            };
            direction = forward * input.y + right * input.x;
        }

        self.integrate_gravity(dt);

        let planar: Vector3<f32> = direction * self.config.move_speed * dt;
        if ctx.has_motor() {
            let delta = planar + UP * (self.y_velocity * dt);
            if delta.magnitude2() > 0.0 {
                if let Some(grounded) = ctx.move_rig(delta, dt) {
                    self.grounded = grounded;
                }
            }
        } else {
            // Without collision response there is no floor to land on.
            self.y_velocity = 0.0;
            if planar.magnitude2() > 0.0 {
                ctx.move_rig(planar, dt);
            }
        }

        if self.turn_assist {
            let yaw = self.config.turn_binding.read(ctx.input);
            if yaw.abs() > self.config.turn_dead_zone {
                ctx.rig
                    .rotate_rig_around_head(Deg(yaw * self.config.turn_speed_degrees * dt));
            }
        }
    }
}
