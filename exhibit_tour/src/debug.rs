//! Development monitors. They only log; nothing in the tour depends on them.

use cgmath::{Deg, InnerSpace, Rotation, Vector3};

use crate::{
    effect::Effect,
    gadget::SelectListener,
    input::{AxisBinding, Hand, Handedness, InputContext},
    math::{FORWARD, yaw_of},
};

/// Periodically logs both controllers and the move stick.
pub struct InputMonitor {
    pub interval: f32,
    pub move_binding: AxisBinding,
    timer: f32,
}

impl InputMonitor {
    pub fn new(interval: f32) -> InputMonitor {
        InputMonitor {
            interval,
            move_binding: AxisBinding::LeftThumbstick,
            timer: 0.0,
        }
    }

    /// Returns the logged line on the frames a snapshot is taken.
    pub fn update(&mut self, dt: f32, input: &InputContext) -> Option<String> {
        self.timer += dt;
        if self.timer < self.interval {
            return None;
        }
        self.timer = 0.0;

        let line = snapshot(input, self.move_binding);
        engine::input_log!(INFO, "{}", line);
        Some(line)
    }
}

impl Default for InputMonitor {
    fn default() -> Self {
        InputMonitor::new(1.0)
    }
}

fn hand_yaw(hand: &Hand) -> f32 {
    yaw_of(hand.rotation.rotate_vector(FORWARD))
        .map(|Deg(yaw)| yaw)
        .unwrap_or(0.0)
}

fn snapshot(input: &InputContext, move_binding: AxisBinding) -> String {
    let l = &input.left_hand;
    let r = &input.right_hand;
    let mv = move_binding.read(input);
    format!(
        "L pos ({:.2}, {:.2}, {:.2}) yaw {:.1} | R pos ({:.2}, {:.2}, {:.2}) yaw {:.1} | move ({:.2}, {:.2}) | L sel {:.2} act {:.2} | R sel {:.2} act {:.2}",
        l.position.x,
        l.position.y,
        l.position.z,
        hand_yaw(l),
        r.position.x,
        r.position.y,
        r.position.z,
        hand_yaw(r),
        mv.x,
        mv.y,
        l.squeeze_value,
        l.trigger_value,
        r.squeeze_value,
        r.trigger_value,
    )
}

/// Logs whenever a watched object moves between ticks.
pub struct PositionWatchdog {
    pub name: String,
    last: Vector3<f32>,
}

impl PositionWatchdog {
    const MIN_MOVE: f32 = 1e-4;

    pub fn new(name: &str, position: Vector3<f32>) -> PositionWatchdog {
        PositionWatchdog {
            name: name.to_string(),
            last: position,
        }
    }

    /// True when `position` differs from the previous observation.
    pub fn observe(&mut self, position: Vector3<f32>) -> bool {
        let moved = (position - self.last).magnitude2() > Self::MIN_MOVE * Self::MIN_MOVE;
        if moved {
            engine::locomotion_log!(
                INFO,
                "{} moved -> ({:.3}, {:.3}, {:.3})",
                self.name,
                position.x,
                position.y,
                position.z
            );
        }
        self.last = position;
        moved
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionEvent {
    HoverEnter,
    HoverExit,
    SelectEnter,
    SelectExit,
}

impl InteractionEvent {
    fn label(self) -> &'static str {
        match self {
            InteractionEvent::HoverEnter => "hover enter",
            InteractionEvent::HoverExit => "hover exit",
            InteractionEvent::SelectEnter => "select enter",
            InteractionEvent::SelectExit => "select exit",
        }
    }
}

/// Logs interaction events. Subscribed to a gadget it reports that gadget's grabs.
pub struct InteractorDebug {
    pub interactable: String,
    holder: Option<Handedness>,
}

impl InteractorDebug {
    pub fn new(interactable: &str) -> InteractorDebug {
        InteractorDebug {
            interactable: interactable.to_string(),
            holder: None,
        }
    }

    pub fn record(&self, event: InteractionEvent, interactor: &str, interactable: &str) -> String {
        let line = format!("{}: {} -> {}", interactor, event.label(), interactable);
        engine::input_log!(INFO, "{}", line);
        line
    }

    fn holder_name(&self) -> &'static str {
        match self.holder {
            Some(Handedness::Left) => "left hand",
            Some(Handedness::Right) => "right hand",
            None => "unknown interactor",
        }
    }
}

impl SelectListener for InteractorDebug {
    fn on_select_begin(&mut self, hand: Option<Handedness>) -> Effect {
        self.holder = hand;
        self.record(InteractionEvent::SelectEnter, self.holder_name(), &self.interactable);
        Effect::NoEffect
    }

    fn on_select_end(&mut self) -> Effect {
        self.record(InteractionEvent::SelectExit, self.holder_name(), &self.interactable);
        self.holder = None;
        Effect::NoEffect
    }
}
