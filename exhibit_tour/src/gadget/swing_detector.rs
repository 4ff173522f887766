use cgmath::{InnerSpace, Vector3, Zero};
use serde::{Deserialize, Serialize};

use crate::pose::Pose;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingConfig {
    /// Tip speed (m/s) that counts as a swing
    pub speed_threshold: f32,
    /// Speed must stay above the threshold this long
    pub min_hold_time: f32,
    pub cooldown: f32,
}

impl Default for SwingConfig {
    fn default() -> Self {
        SwingConfig {
            speed_threshold: 3.0,
            min_hold_time: 0.05,
            cooldown: 0.15,
        }
    }
}

/// Rigid body state of the gadget for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyMotion {
    pub center_of_mass: Vector3<f32>,
    pub linear_velocity: Vector3<f32>,
    /// Radians per second, world space
    pub angular_velocity: Vector3<f32>,
    /// Blade tip; the body's centre of mass is used when absent.
    pub tip: Option<Pose>,
}

impl BodyMotion {
    pub fn at_rest(center_of_mass: Vector3<f32>) -> BodyMotion {
        BodyMotion {
            center_of_mass,
            linear_velocity: Vector3::zero(),
            angular_velocity: Vector3::zero(),
            tip: None,
        }
    }

    pub fn tip_pose(&self) -> Pose {
        self.tip.unwrap_or_else(|| Pose::at(self.center_of_mass))
    }

    /// Velocity of a world point rigidly attached to the body.
    pub fn point_velocity(&self, point: Vector3<f32>) -> Vector3<f32> {
        self.linear_velocity + self.angular_velocity.cross(point - self.center_of_mass)
    }

    pub fn tip_speed(&self) -> f32 {
        let speed = self.point_velocity(self.tip_pose().position).magnitude();
        if speed.is_finite() { speed } else { 0.0 }
    }
}

impl Default for BodyMotion {
    fn default() -> Self {
        BodyMotion::at_rest(Vector3::zero())
    }
}

#[derive(Clone, Debug)]
pub struct SwingDetector {
    pub config: SwingConfig,
    hold_timer: f32,
    cooldown_timer: f32,
}

impl SwingDetector {
    pub fn new(config: SwingConfig) -> SwingDetector {
        SwingDetector {
            config,
            hold_timer: 0.0,
            cooldown_timer: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.hold_timer = 0.0;
        self.cooldown_timer = 0.0;
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_timer > 0.0
    }

    /// Returns the tip speed when a swing fires this frame.
    pub fn update(&mut self, dt: f32, grabbed: bool, motion: &BodyMotion) -> Option<f32> {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
        }
        if !grabbed {
            self.hold_timer = 0.0;
            return None;
        }

        let speed = motion.tip_speed();
        if speed < self.config.speed_threshold {
            self.hold_timer = 0.0;
            return None;
        }

        self.hold_timer += dt;
        if self.hold_timer >= self.config.min_hold_time && self.cooldown_timer <= 0.0 {
            self.hold_timer = 0.0;
            self.cooldown_timer = self.config.cooldown;
            return Some(speed);
        }
        None
    }
}

impl Default for SwingDetector {
    fn default() -> Self {
        SwingDetector::new(SwingConfig::default())
    }
}
