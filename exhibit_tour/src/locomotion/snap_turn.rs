use cgmath::Deg;
use serde::{Deserialize, Serialize};

use crate::input::Axis1Binding;

use super::{LocomotionContext, LocomotionProvider};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapTurnConfig {
    pub binding: Axis1Binding,
    pub turn_amount_degrees: f32,
    /// Deflection that triggers a turn.
    pub activate_threshold: f32,
    /// Deflection the input must fall under before the next turn.
    pub release_threshold: f32,
}

impl Default for SnapTurnConfig {
    fn default() -> Self {
        SnapTurnConfig {
            binding: Axis1Binding::KeyboardQe,
            turn_amount_degrees: 45.0,
            activate_threshold: 0.7,
            release_threshold: 0.3,
        }
    }
}

/// Discrete comfort turn: one fixed yaw step per press.
#[derive(Clone, Debug)]
pub struct SnapTurnProvider {
    pub config: SnapTurnConfig,
    enabled: bool,
    was_pressed: bool,
}

impl SnapTurnProvider {
    pub fn new(config: SnapTurnConfig) -> SnapTurnProvider {
        SnapTurnProvider {
            config,
            enabled: true,
            was_pressed: false,
        }
    }
}

impl Default for SnapTurnProvider {
    fn default() -> Self {
        SnapTurnProvider::new(SnapTurnConfig::default())
    }
}

impl LocomotionProvider for SnapTurnProvider {
    fn name(&self) -> &str {
        "snap_turn"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.was_pressed = false;
    }

    fn tick(&mut self, ctx: &mut LocomotionContext<'_>) {
        if !self.enabled {
            return;
        }
        let value = self.config.binding.read(ctx.input);

        if self.was_pressed {
            if value.abs() < self.config.release_threshold {
                self.was_pressed = false;
            }
            return;
        }

        if value.abs() >= self.config.activate_threshold {
            self.was_pressed = true;
            let amount = self.config.turn_amount_degrees * value.signum();
            engine::locomotion_log!(DEBUG, "snap turn {}", amount);
            ctx.rig.rotate_rig_around_head(Deg(amount));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        input::{InputContext, Key},
        rig::{PlayerRig, SimulatedRig},
        time::Time,
    };

    #[test]
    fn test_one_turn_per_press() {
        let mut provider = SnapTurnProvider::default();
        let mut rig = SimulatedRig::standing(1.6);
        let time = Time::fixed(0.1);

        let mut held = InputContext::default();
        held.keyboard.press(Key::E);
        let released = InputContext::default();

        for input in [&held, &held, &held, &released, &held] {
            let mut ctx = LocomotionContext::new(&time, input, &mut rig, None);
            provider.tick(&mut ctx);
        }
        assert_eq!(rig.origin_yaw(), Deg(90.0));
    }

    #[test]
    fn test_negative_direction() {
        let mut provider = SnapTurnProvider::default();
        let mut rig = SimulatedRig::standing(1.6);
        let time = Time::fixed(0.1);
        let mut input = InputContext::default();
        input.keyboard.press(Key::Q);
        let mut ctx = LocomotionContext::new(&time, &input, &mut rig, None);
        provider.tick(&mut ctx);
        assert_eq!(rig.origin_yaw(), Deg(-45.0));
    }
}
