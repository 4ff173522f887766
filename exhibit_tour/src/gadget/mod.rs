//! The exhibit sword: grab, charge by holding the trigger, swing to spawn effects.

mod charge;
mod grab;
mod swing_detector;
mod swing_vfx;

pub use charge::*;
pub use grab::*;
pub use swing_detector::*;
pub use swing_vfx::*;

use crate::{effect::Effect, input::InputContext, pose::Pose, time::Time};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Subscriber list with explicit subscribe/unsubscribe.
pub struct Observers<L: ?Sized> {
    next_id: u64,
    listeners: Vec<(ListenerId, Box<L>)>,
}

impl<L: ?Sized> Observers<L> {
    pub fn new() -> Observers<L> {
        Observers {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<L>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Hands the listener back, or `None` if `id` was never subscribed or already removed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> Option<Box<L>> {
        let index = self.listeners.iter().position(|(other, _)| *other == id)?;
        Some(self.listeners.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut L> + '_ {
        self.listeners.iter_mut().map(|(_, listener)| listener.as_mut())
    }
}

impl<L: ?Sized> Default for Observers<L> {
    fn default() -> Self {
        Observers::new()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwingEvent {
    /// Tip speed in m/s
    pub speed: f32,
    pub charged: bool,
    pub tip_pose: Pose,
    /// Where the player is looking from, when known.
    pub player_pose: Option<Pose>,
}

pub trait SwingListener {
    fn on_swing(&mut self, event: &SwingEvent) -> Effect;
}

/// The grabbable sword with its charge and swing behaviours.
pub struct Sword {
    grab: GrabState,
    pub charge: ChargeController,
    pub swing: SwingDetector,
    swing_listeners: Observers<dyn SwingListener>,
    select_listeners: Observers<dyn SelectListener>,
}

impl Sword {
    pub fn new(charge: ChargeConfig, swing: SwingConfig) -> Sword {
        Sword {
            grab: GrabState::default(),
            charge: ChargeController::new(charge),
            swing: SwingDetector::new(swing),
            swing_listeners: Observers::new(),
            select_listeners: Observers::new(),
        }
    }

    pub fn grab(&self) -> &GrabState {
        &self.grab
    }

    pub fn is_charged(&self) -> bool {
        self.charge.is_charged()
    }

    pub fn subscribe_swing(&mut self, listener: Box<dyn SwingListener>) -> ListenerId {
        self.swing_listeners.subscribe(listener)
    }

    pub fn unsubscribe_swing(&mut self, id: ListenerId) -> Option<Box<dyn SwingListener>> {
        self.swing_listeners.unsubscribe(id)
    }

    pub fn subscribe_select(&mut self, listener: Box<dyn SelectListener>) -> ListenerId {
        self.select_listeners.subscribe(listener)
    }

    pub fn unsubscribe_select(&mut self, id: ListenerId) -> Option<Box<dyn SelectListener>> {
        self.select_listeners.unsubscribe(id)
    }

    /// Grab by the interactor whose object chain (self first, then parents) is
    /// `interactor_names`.
    pub fn select_begin(&mut self, interactor_names: &[&str]) -> Effect {
        let hand = detect_hand(interactor_names);
        engine::gadget_log!(DEBUG, "sword grabbed by {:?}", hand);
        self.grab.begin(hand);
        self.swing.reset();

        let mut effects = vec![self.charge.on_select_begin(hand)];
        effects.extend(self.select_listeners.iter_mut().map(|l| l.on_select_begin(hand)));
        Effect::combine(effects)
    }

    pub fn select_end(&mut self) -> Effect {
        engine::gadget_log!(DEBUG, "sword released");
        self.grab.end();
        self.swing.reset();

        let mut effects = vec![self.charge.on_select_end()];
        effects.extend(self.select_listeners.iter_mut().map(|l| l.on_select_end()));
        Effect::combine(effects)
    }

    pub fn update(
        &mut self,
        time: &Time,
        input: &InputContext,
        motion: &BodyMotion,
        player_pose: Option<Pose>,
    ) -> Effect {
        let mut effects = vec![self.charge.update(time.delta, input, &self.grab)];

        if let Some(speed) = self.swing.update(time.delta, self.grab.is_selected(), motion) {
            let event = SwingEvent {
                speed,
                charged: self.charge.is_charged(),
                tip_pose: motion.tip_pose(),
                player_pose,
            };
            engine::gadget_log!(DEBUG, "swing {:.2} m/s charged={}", speed, event.charged);
            effects.extend(self.swing_listeners.iter_mut().map(|l| l.on_swing(&event)));
        }

        Effect::combine(effects)
    }
}

impl Default for Sword {
    fn default() -> Self {
        Sword::new(ChargeConfig::default(), SwingConfig::default())
    }
}
