use serde::{Deserialize, Serialize};

use crate::{
    input::{Axis1Binding, ButtonBinding, Handedness, InputContext, Key},
    math::UP,
};

use super::{LocomotionContext, LocomotionProvider};

/// How a vertical mover turns input into an up/down value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum VerticalInput {
    /// Digital up/down from two analog buttons.
    Buttons {
        up: ButtonBinding,
        down: ButtonBinding,
        threshold: f32,
    },
    /// Signed axis, up positive.
    Axis { binding: Axis1Binding, dead_zone: f32 },
}

impl VerticalInput {
    pub fn read(&self, input: &InputContext) -> f32 {
        match self {
            VerticalInput::Buttons {
                up,
                down,
                threshold,
            } => {
                let up = if up.read(input) > *threshold { 1.0 } else { 0.0 };
                let down = if down.read(input) > *threshold { 1.0 } else { 0.0 };
                up - down
            }
            VerticalInput::Axis { binding, dead_zone } => {
                let value = binding.read(input).clamp(-1.0, 1.0);
                if value.abs() < *dead_zone { 0.0 } else { value }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticalMoverConfig {
    pub speed: f32,
    pub input: VerticalInput,
    /// X raises and Y lowers on the keyboard as well.
    pub keyboard_fallback: bool,
    pub use_unscaled_time: bool,
}

impl Default for VerticalMoverConfig {
    fn default() -> Self {
        VerticalMoverConfig {
            speed: 1.5,
            input: VerticalInput::Buttons {
                up: ButtonBinding::Primary(Handedness::Left),
                down: ButtonBinding::Secondary(Handedness::Left),
                threshold: 0.5,
            },
            keyboard_fallback: true,
            use_unscaled_time: false,
        }
    }
}

/// Straight up/down movement for free roam.
#[derive(Clone, Debug)]
pub struct VerticalMover {
    pub config: VerticalMoverConfig,
    enabled: bool,
}

impl VerticalMover {
    pub fn new(config: VerticalMoverConfig) -> VerticalMover {
        VerticalMover {
            config,
            enabled: false,
        }
    }

    pub fn read(&self, input: &InputContext) -> f32 {
        let value = self.config.input.read(input);
        if !self.config.keyboard_fallback {
            return value;
        }
        let keys = input.keyboard.axis(Key::Y, Key::X);
        if keys.abs() > value.abs() { keys } else { value }
    }
}

impl Default for VerticalMover {
    fn default() -> Self {
        VerticalMover::new(VerticalMoverConfig::default())
    }
}

impl LocomotionProvider for VerticalMover {
    fn name(&self) -> &str {
        "vertical_mover"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn tick(&mut self, ctx: &mut LocomotionContext<'_>) {
        if !self.enabled {
            return;
        }
        let value = self.read(ctx.input);
        if value.abs() < 0.01 {
            return;
        }
        let dt = if self.config.use_unscaled_time {
            ctx.time.unscaled_delta
        } else {
            ctx.time.delta
        };
        ctx.move_rig(UP * (value * self.config.speed * dt), dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        rig::{PlayerRig, SimulatedRig},
        time::Time,
    };
    use cgmath::vec3;

    fn run(mover: &mut VerticalMover, input: &InputContext, time: Time) -> SimulatedRig {
        let mut rig = SimulatedRig::standing(1.6);
        let mut ctx = LocomotionContext::new(&time, input, &mut rig, None);
        mover.tick(&mut ctx);
        rig
    }

    fn enabled(config: VerticalMoverConfig) -> VerticalMover {
        let mut mover = VerticalMover::new(config);
        mover.set_enabled(true);
        mover
    }

    #[test]
    fn test_buttons_need_threshold() {
        let mut mover = enabled(VerticalMoverConfig::default());
        let mut input = InputContext::default();
        input.left_hand.primary_value = 0.4;
        let rig = run(&mut mover, &input, Time::fixed(1.0));
        assert_eq!(rig.origin_position(), vec3(0.0, 0.0, 0.0));

        input.left_hand.primary_value = 0.9;
        let rig = run(&mut mover, &input, Time::fixed(1.0));
        assert_eq!(rig.origin_position(), vec3(0.0, 1.5, 0.0));

        input.left_hand.secondary_value = 1.0;
        let rig = run(&mut mover, &input, Time::fixed(1.0));
        assert_eq!(rig.origin_position(), vec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_axis_dead_zone() {
        let mut mover = enabled(VerticalMoverConfig {
            speed: 2.0,
            input: VerticalInput::Axis {
                binding: Axis1Binding::RightThumbstickY,
                dead_zone: 0.15,
            },
            keyboard_fallback: false,
            use_unscaled_time: false,
        });
        let mut input = InputContext::default();
        input.right_hand.thumbstick.y = 0.1;
        assert_eq!(run(&mut mover, &input, Time::fixed(1.0)).origin_position().y, 0.0);

        input.right_hand.thumbstick.y = -0.5;
        assert_eq!(run(&mut mover, &input, Time::fixed(1.0)).origin_position().y, -1.0);
    }

    #[test]
    fn test_keyboard_and_unscaled_time() {
        let mut mover = enabled(VerticalMoverConfig {
            use_unscaled_time: true,
            ..VerticalMoverConfig::default()
        });
        let mut input = InputContext::default();
        input.keyboard.press(Key::X);
        let paused = Time::new(1.0, 0.0);
        assert_eq!(run(&mut mover, &input, paused).origin_position().y, 1.5);
    }

    #[test]
    fn test_stronger_source_wins() {
        let mut mover = enabled(VerticalMoverConfig {
            speed: 2.0,
            input: VerticalInput::Axis {
                binding: Axis1Binding::LeftThumbstickY,
                dead_zone: 0.15,
            },
            keyboard_fallback: true,
            use_unscaled_time: false,
        });
        let mut input = InputContext::default();
        input.left_hand.thumbstick.y = 0.3;
        assert_eq!(mover.read(&input), 0.3);

        input.keyboard.press(Key::X);
        assert_eq!(mover.read(&input), 1.0);
        assert_eq!(run(&mut mover, &input, Time::fixed(1.0)).origin_position().y, 2.0);

        input.left_hand.thumbstick.y = -1.0;
        assert_eq!(mover.read(&input), -1.0);
    }

    #[test]
    fn test_disabled_by_default() {
        let mut mover = VerticalMover::default();
        let mut input = InputContext::default();
        input.left_hand.primary_value = 1.0;
        assert_eq!(run(&mut mover, &input, Time::fixed(1.0)).origin_position().y, 0.0);
    }
}
