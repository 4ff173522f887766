use std::collections::HashSet;

use cgmath::{InnerSpace, One, Quaternion, Vector2, Vector3, vec2, vec3};
use serde::{Deserialize, Serialize};

use crate::pose::Pose;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

/// Tracked controller state for one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub thumbstick: Vector2<f32>,
    pub trigger_value: f32,
    pub squeeze_value: f32,
    /// X on the left controller, A on the right
    pub primary_value: f32,
    /// Y on the left controller, B on the right
    pub secondary_value: f32,
}

impl Default for Hand {
    fn default() -> Self {
        Hand {
            position: vec3(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            thumbstick: vec2(0.0, 0.0),
            trigger_value: 0.0,
            squeeze_value: 0.0,
            primary_value: 0.0,
            secondary_value: 0.0,
        }
    }
}

impl Hand {
    pub fn is_well_formed(&self) -> bool {
        vec3_finite(self.position)
            && quat_finite(self.rotation)
            && self.thumbstick.x.is_finite()
            && self.thumbstick.y.is_finite()
            && self.trigger_value.is_finite()
            && self.squeeze_value.is_finite()
            && self.primary_value.is_finite()
            && self.secondary_value.is_finite()
    }

    /// Copy with every unreadable control replaced by its neutral value.
    pub fn sanitized(&self) -> Hand {
        Hand {
            position: if vec3_finite(self.position) {
                self.position
            } else {
                vec3(0.0, 0.0, 0.0)
            },
            rotation: if quat_finite(self.rotation) {
                self.rotation
            } else {
                Quaternion::one()
            },
            thumbstick: vec2(finite_or_zero(self.thumbstick.x), finite_or_zero(self.thumbstick.y)),
            trigger_value: finite_or_zero(self.trigger_value),
            squeeze_value: finite_or_zero(self.squeeze_value),
            primary_value: finite_or_zero(self.primary_value),
            secondary_value: finite_or_zero(self.secondary_value),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    X,
    Y,
    Space,
}

/// Desktop fallback controls.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyboardState {
    pressed: HashSet<Key>,
}

impl KeyboardState {
    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn any_down(&self) -> bool {
        !self.pressed.is_empty()
    }

    /// -1 / 0 / +1 from a pair of keys.
    pub fn axis(&self, negative: Key, positive: Key) -> f32 {
        let mut value = 0.0;
        if self.is_down(positive) {
            value += 1.0;
        }
        if self.is_down(negative) {
            value -= 1.0;
        }
        value
    }

    pub fn wasd(&self) -> Vector2<f32> {
        vec2(self.axis(Key::A, Key::D), self.axis(Key::S, Key::W))
    }
}

/// Everything the tour reads from the player in one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct InputContext {
    pub head: Pose,
    pub left_hand: Hand,
    pub right_hand: Hand,
    pub keyboard: KeyboardState,
    /// Desktop drag (mouse button held) and its per-tick delta, for orbit cameras.
    pub pointer_down: bool,
    pub pointer_delta: Vector2<f32>,
}

impl Default for InputContext {
    fn default() -> Self {
        InputContext {
            head: Pose::identity(),
            left_hand: Hand::default(),
            right_hand: Hand::default(),
            keyboard: KeyboardState::default(),
            pointer_down: false,
            pointer_delta: vec2(0.0, 0.0),
        }
    }
}

impl InputContext {
    pub fn hand(&self, handedness: Handedness) -> &Hand {
        match handedness {
            Handedness::Left => &self.left_hand,
            Handedness::Right => &self.right_hand,
        }
    }

    pub fn hand_mut(&mut self, handedness: Handedness) -> &mut Hand {
        match handedness {
            Handedness::Left => &mut self.left_hand,
            Handedness::Right => &mut self.right_hand,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.left_hand.is_well_formed()
            && self.right_hand.is_well_formed()
            && self.pointer_delta.x.is_finite()
            && self.pointer_delta.y.is_finite()
    }

    pub fn sanitized(&self) -> InputContext {
        InputContext {
            head: self.head,
            left_hand: self.left_hand.sanitized(),
            right_hand: self.right_hand.sanitized(),
            keyboard: self.keyboard.clone(),
            pointer_down: self.pointer_down,
            pointer_delta: vec2(
                finite_or_zero(self.pointer_delta.x),
                finite_or_zero(self.pointer_delta.y),
            ),
        }
    }

    /// True when the player is actively steering with a stick or key this tick.
    pub fn has_manual_input(&self, deadzone: f32) -> bool {
        self.left_hand.thumbstick.magnitude() > deadzone
            || self.right_hand.thumbstick.magnitude() > deadzone
            || self.keyboard.any_down()
            || self.pointer_down
    }
}

/// Source of a 2D movement vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisBinding {
    LeftThumbstick,
    RightThumbstick,
    KeyboardWasd,
    Unbound,
}

impl AxisBinding {
    pub fn read(&self, input: &InputContext) -> Vector2<f32> {
        match self {
            AxisBinding::LeftThumbstick => input.left_hand.thumbstick,
            AxisBinding::RightThumbstick => input.right_hand.thumbstick,
            AxisBinding::KeyboardWasd => input.keyboard.wasd(),
            AxisBinding::Unbound => vec2(0.0, 0.0),
        }
    }
}

/// Source of a signed 1D value in [-1, 1].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis1Binding {
    LeftThumbstickY,
    RightThumbstickX,
    RightThumbstickY,
    /// Q down, E up
    KeyboardQe,
    Unbound,
}

impl Axis1Binding {
    pub fn read(&self, input: &InputContext) -> f32 {
        match self {
            Axis1Binding::LeftThumbstickY => input.left_hand.thumbstick.y,
            Axis1Binding::RightThumbstickX => input.right_hand.thumbstick.x,
            Axis1Binding::RightThumbstickY => input.right_hand.thumbstick.y,
            Axis1Binding::KeyboardQe => input.keyboard.axis(Key::Q, Key::E),
            Axis1Binding::Unbound => 0.0,
        }
    }
}

/// Source of an analog button value in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonBinding {
    Trigger(Handedness),
    Squeeze(Handedness),
    Primary(Handedness),
    Secondary(Handedness),
    Key(Key),
}

impl ButtonBinding {
    pub fn read(&self, input: &InputContext) -> f32 {
        match *self {
            ButtonBinding::Trigger(hand) => input.hand(hand).trigger_value,
            ButtonBinding::Squeeze(hand) => input.hand(hand).squeeze_value,
            ButtonBinding::Primary(hand) => input.hand(hand).primary_value,
            ButtonBinding::Secondary(hand) => input.hand(hand).secondary_value,
            ButtonBinding::Key(key) => {
                if input.keyboard.is_down(key) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Pick whichever of two simultaneous planar inputs is stronger this tick.
/// Ties go to the stick.
pub fn resolve_planar_input(stick: Vector2<f32>, keyboard: Vector2<f32>) -> Vector2<f32> {
    if stick.magnitude2() >= keyboard.magnitude2() {
        stick
    } else {
        keyboard
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

fn vec3_finite(v: Vector3<f32>) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

fn quat_finite(q: Quaternion<f32>) -> bool {
    q.s.is_finite() && vec3_finite(q.v)
}
