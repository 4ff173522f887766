use crate::{effect::Effect, input::Handedness};

/// Which hand, if any, currently holds the gadget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrabState {
    selected: bool,
    holding_hand: Option<Handedness>,
}

impl GrabState {
    pub fn begin(&mut self, hand: Option<Handedness>) {
        self.selected = true;
        self.holding_hand = hand;
    }

    pub fn end(&mut self) {
        self.selected = false;
        self.holding_hand = None;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn holding_hand(&self) -> Option<Handedness> {
        self.holding_hand
    }
}

/// Hover/select notifications from a grabbable.
pub trait SelectListener {
    fn on_select_begin(&mut self, hand: Option<Handedness>) -> Effect;
    fn on_select_end(&mut self) -> Effect;
}

/// Guess the hand from an interactor's object names, own name first then each parent.
pub fn detect_hand(names: &[&str]) -> Option<Handedness> {
    names.iter().find_map(|name| {
        let name = name.to_lowercase();
        if name.contains("left") {
            Some(Handedness::Left)
        } else if name.contains("right") {
            Some(Handedness::Right)
        } else {
            None
        }
    })
}
