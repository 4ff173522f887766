use cgmath::{Deg, InnerSpace, Vector3};
use serde::{Deserialize, Serialize};

use crate::math::{DEGENERATE_EPSILON, UP, angle_between};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeReturnConfig {
    /// Maximum angle between the view direction and world up that counts as "looking up".
    pub angle_threshold_degrees: f32,
    /// How long the look must be held before the return fires.
    pub hold_seconds: f32,
    /// Only count while the player is not steering manually.
    pub require_no_input: bool,
}

impl Default for GazeReturnConfig {
    fn default() -> Self {
        GazeReturnConfig {
            angle_threshold_degrees: 25.0,
            hold_seconds: 0.8,
            require_no_input: false,
        }
    }
}

/// "Look up to go back" gesture.
///
/// Binary per tick: either the view is within the threshold and unscaled time accumulates,
/// or the timer drops straight back to zero. Fires once per completed hold.
#[derive(Clone, Debug)]
pub struct GazeReturnTimer {
    config: GazeReturnConfig,
    timer: f32,
}

impl GazeReturnTimer {
    pub fn new(config: GazeReturnConfig) -> GazeReturnTimer {
        GazeReturnTimer { config, timer: 0.0 }
    }

    pub fn config(&self) -> &GazeReturnConfig {
        &self.config
    }

    pub fn elapsed(&self) -> f32 {
        self.timer
    }

    pub fn reset(&mut self) {
        self.timer = 0.0;
    }

    pub fn is_looking_up(&self, forward: Vector3<f32>) -> bool {
        angle_between(forward, UP) <= Deg(self.config.angle_threshold_degrees)
    }

    /// Advance by one tick. Returns true on the tick the hold completes.
    ///
    /// A degenerate `forward` leaves the timer untouched for this tick.
    pub fn update(
        &mut self,
        forward: Vector3<f32>,
        unscaled_delta: f32,
        manual_input: bool,
    ) -> bool {
        if forward.magnitude2() < DEGENERATE_EPSILON {
            return false;
        }

        let blocked_by_input = self.config.require_no_input && manual_input;
        if self.is_looking_up(forward) && !blocked_by_input {
            self.timer += unscaled_delta;
            if self.timer >= self.config.hold_seconds {
                self.timer = 0.0;
                return true;
            }
        } else {
            self.timer = 0.0;
        }
        false
    }
}

impl Default for GazeReturnTimer {
    fn default() -> Self {
        GazeReturnTimer::new(GazeReturnConfig::default())
    }
}
