//! Locomotion and mode logic for a VR exhibition tour: guided viewing stations, free
//! roam inside bounded areas, gaze-to-return, and the exhibit sword gadget.
//!
//! Everything here is host-agnostic. A runtime supplies a [`rig::PlayerRig`], per-frame
//! [`input::InputContext`] and [`time::Time`], optionally a physics-backed
//! [`locomotion::CharacterMotor`], and applies the [`effect::Effect`]s handed back.

pub mod bounds;
pub mod camera;
pub mod config;
pub mod debug;
pub mod effect;
pub mod error;
pub mod gadget;
pub mod gaze_return;
pub mod head_return_ui;
pub mod input;
pub mod locomotion;
pub mod math;
pub mod physics;
pub mod pose;
pub mod rig;
pub mod time;
pub mod tour;
pub mod view_switcher;

pub use config::TourConfig;
pub use error::{FrameIssue, TourError};
pub use tour::{TickReport, TourMode, TourModeController};
