use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TourMode {
    /// Walking around the main floor with gravity.
    #[default]
    Normal,
    /// Parked at a station's close-up point.
    DetailView,
    /// Parked at a station's overview point.
    WideView,
    /// Flying inside the station's bounds.
    FreeRoam,
}

impl TourMode {
    pub fn is_view_mode(&self) -> bool {
        matches!(self, TourMode::DetailView | TourMode::WideView)
    }
}

impl fmt::Display for TourMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TourMode::Normal => "normal",
            TourMode::DetailView => "detail",
            TourMode::WideView => "wide",
            TourMode::FreeRoam => "free-roam",
        };
        write!(f, "{}", name)
    }
}

bitflags! {
    /// Snapshot of every behaviour a mode switch reconfigures.
    pub struct ModeFlags: u32 {
        const MOVER = 1 << 0;
        const GRAVITY = 1 << 1;
        const FLY = 1 << 2;
        const TURN_ASSIST = 1 << 3;
        const EXTRA_PROVIDERS = 1 << 4;
        const BOUNDS = 1 << 5;
        const WALLS = 1 << 6;
        const GAZE_RETURN = 1 << 7;
        const VERTICAL_MOVER = 1 << 8;
        const RETURN_UI = 1 << 9;
    }
}

impl ModeFlags {
    /// The configuration `mode` requires.
    pub fn for_mode(mode: TourMode) -> ModeFlags {
        match mode {
            TourMode::Normal => {
                ModeFlags::MOVER
                    | ModeFlags::GRAVITY
                    | ModeFlags::TURN_ASSIST
                    | ModeFlags::EXTRA_PROVIDERS
            }
            TourMode::DetailView | TourMode::WideView => {
                ModeFlags::GAZE_RETURN | ModeFlags::RETURN_UI
            }
            TourMode::FreeRoam => {
                ModeFlags::MOVER
                    | ModeFlags::FLY
                    | ModeFlags::TURN_ASSIST
                    | ModeFlags::EXTRA_PROVIDERS
                    | ModeFlags::BOUNDS
                    | ModeFlags::WALLS
                    | ModeFlags::VERTICAL_MOVER
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_modes_disable_all_movement() {
        for mode in [TourMode::DetailView, TourMode::WideView] {
            let flags = ModeFlags::for_mode(mode);
            assert!(mode.is_view_mode());
            assert!(!flags.intersects(
                ModeFlags::MOVER
                    | ModeFlags::GRAVITY
                    | ModeFlags::FLY
                    | ModeFlags::VERTICAL_MOVER
                    | ModeFlags::EXTRA_PROVIDERS
            ));
        }
    }

    #[test]
    fn test_gravity_and_fly_never_together() {
        for mode in [
            TourMode::Normal,
            TourMode::DetailView,
            TourMode::WideView,
            TourMode::FreeRoam,
        ] {
            let flags = ModeFlags::for_mode(mode);
            assert!(!flags.contains(ModeFlags::GRAVITY | ModeFlags::FLY));
            assert_eq!(flags.contains(ModeFlags::BOUNDS), mode == TourMode::FreeRoam);
            assert_eq!(flags.contains(ModeFlags::GAZE_RETURN), mode.is_view_mode());
        }
    }
}
