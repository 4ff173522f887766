use serde::{Deserialize, Serialize};

use crate::{effect::Effect, input::{Handedness, InputContext}};

use super::{GrabState, SelectListener};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeConfig {
    pub hold_seconds: f32,
    pub press_threshold: f32,
}

impl Default for ChargeConfig {
    fn default() -> Self {
        ChargeConfig {
            hold_seconds: 3.0,
            press_threshold: 0.6,
        }
    }
}

/// Hold the trigger of the grabbing hand long enough and the gadget charges. Releasing
/// the trigger drops the charge straight away.
#[derive(Clone, Debug)]
pub struct ChargeController {
    pub config: ChargeConfig,
    holding_hand: Option<Handedness>,
    hold_timer: f32,
    charged: bool,
}

impl ChargeController {
    pub fn new(config: ChargeConfig) -> ChargeController {
        ChargeController {
            config,
            holding_hand: None,
            hold_timer: 0.0,
            charged: false,
        }
    }

    pub fn is_charged(&self) -> bool {
        self.charged
    }

    pub fn hold_timer(&self) -> f32 {
        self.hold_timer
    }

    pub fn holding_hand(&self) -> Option<Handedness> {
        self.holding_hand
    }

    fn clear(&mut self) -> Effect {
        self.hold_timer = 0.0;
        self.charged = false;
        Effect::SetGlow { on: false }
    }

    pub fn update(&mut self, dt: f32, input: &InputContext, grab: &GrabState) -> Effect {
        if !grab.is_selected() {
            return Effect::NoEffect;
        }
        let Some(hand) = self.holding_hand else {
            return Effect::NoEffect;
        };

        let trigger = input.hand(hand).trigger_value;
        let pressed = trigger.is_finite() && trigger >= self.config.press_threshold;

        if self.charged {
            return if pressed { Effect::NoEffect } else { self.clear() };
        }

        if !pressed {
            self.hold_timer = 0.0;
            return Effect::NoEffect;
        }
        self.hold_timer += dt;
        if self.hold_timer >= self.config.hold_seconds {
            self.charged = true;
            engine::gadget_log!(DEBUG, "charged with {:?} hand", hand);
            return Effect::SetGlow { on: true };
        }
        Effect::NoEffect
    }
}

impl Default for ChargeController {
    fn default() -> Self {
        ChargeController::new(ChargeConfig::default())
    }
}

impl SelectListener for ChargeController {
    fn on_select_begin(&mut self, hand: Option<Handedness>) -> Effect {
        self.holding_hand = hand;
        self.clear()
    }

    fn on_select_end(&mut self) -> Effect {
        self.holding_hand = None;
        self.clear()
    }
}
