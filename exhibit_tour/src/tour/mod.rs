mod exhibit_group;
mod mode;
mod tour_mode_controller;

pub use exhibit_group::*;
pub use mode::*;
pub use tour_mode_controller::*;
