use cgmath::{Deg, Vector3, vec3};
use serde::{Deserialize, Serialize};

use crate::{
    gaze_return::{GazeReturnConfig, GazeReturnTimer},
    input::InputContext,
    pose::Pose,
    time::Time,
};

use super::CameraSwitcher;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitCameraConfig {
    /// Degrees per second per unit of pointer delta.
    pub sensitivity: f32,
    pub distance: f32,
    /// Elevation above the target; positive looks down at it.
    pub min_elevation: f32,
    pub max_elevation: f32,
    pub look_up_return: bool,
    pub gaze: GazeReturnConfig,
}

impl Default for OrbitCameraConfig {
    fn default() -> Self {
        OrbitCameraConfig {
            sensitivity: 120.0,
            distance: 10.0,
            min_elevation: 10.0,
            max_elevation: 80.0,
            look_up_return: true,
            gaze: GazeReturnConfig {
                require_no_input: true,
                ..GazeReturnConfig::default()
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrbitEvent {
    ReturnToMain,
}

/// Drag-to-orbit camera around an exhibit. Drives one camera of a [`CameraSwitcher`]
/// and only runs while that camera is the live one.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub config: OrbitCameraConfig,
    pub target: Vector3<f32>,
    camera_index: usize,
    yaw: f32,
    elevation: f32,
    gaze: GazeReturnTimer,
    was_active: bool,
}

impl OrbitCamera {
    pub fn new(
        config: OrbitCameraConfig,
        target: Vector3<f32>,
        camera_index: usize,
    ) -> OrbitCamera {
        let gaze = GazeReturnTimer::new(config.gaze.clone());
        let elevation = config.min_elevation;
        OrbitCamera {
            config,
            target,
            camera_index,
            yaw: 0.0,
            elevation,
            gaze,
            was_active: false,
        }
    }

    pub fn with_angles(mut self, yaw: f32, elevation: f32) -> OrbitCamera {
        self.yaw = yaw;
        self.elevation = elevation.clamp(self.config.min_elevation, self.config.max_elevation);
        self
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pose(&self) -> Pose {
        let rotation =
            Pose::from_yaw_pitch(vec3(0.0, 0.0, 0.0), Deg(self.yaw), Deg(-self.elevation));
        let position =
            rotation.transform_point(vec3(0.0, 0.0, -self.config.distance)) + self.target;
        Pose::new(position, rotation.rotation)
    }

    /// Late-update. Uses unscaled time so orbiting keeps working while paused.
    pub fn update(
        &mut self,
        time: &Time,
        input: &InputContext,
        switcher: &mut CameraSwitcher,
    ) -> Option<OrbitEvent> {
        if switcher.active_index() != Some(self.camera_index) {
            self.was_active = false;
            return None;
        }
        if !self.was_active {
            self.gaze.reset();
            self.was_active = true;
        }

        let dt = time.unscaled_delta;
        let interacting = input.pointer_down;
        if interacting {
            self.yaw += input.pointer_delta.x * self.config.sensitivity * dt;
            self.elevation = (self.elevation - input.pointer_delta.y * self.config.sensitivity * dt)
                .clamp(self.config.min_elevation, self.config.max_elevation);
        }

        let pose = self.pose();
        if let Some(camera) = switcher.camera_mut(self.camera_index) {
            camera.pose = pose;
        }

        if !self.config.look_up_return {
            return None;
        }
        if self.gaze.update(pose.forward(), dt, interacting) {
            engine::camera_log!(INFO, "orbit look-up return");
            switcher.return_to_main();
            return Some(OrbitEvent::ReturnToMain);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{camera::SceneCamera, math::UP};
    use cgmath::InnerSpace;

    fn setup(config: OrbitCameraConfig) -> (OrbitCamera, CameraSwitcher) {
        let mut switcher = CameraSwitcher::new(
            vec![
                SceneCamera::new("main", Pose::at(vec3(0.0, 1.6, -4.0))),
                SceneCamera::new("orbit", Pose::identity()),
            ],
            0,
        );
        switcher.switch_camera(1);
        (OrbitCamera::new(config, vec3(0.0, 1.0, 0.0), 1), switcher)
    }

    #[test]
    fn test_orbit_looks_at_target_from_distance() {
        let (mut orbit, mut switcher) = setup(OrbitCameraConfig::default());
        orbit = orbit.with_angles(90.0, 45.0);
        orbit.update(&Time::fixed(0.016), &InputContext::default(), &mut switcher);

        let pose = switcher.cameras()[1].pose;
        assert!(((pose.position - orbit.target).magnitude() - 10.0).abs() < 1e-3);
        let to_target = (orbit.target - pose.position).normalize();
        assert!((pose.forward() - to_target).magnitude() < 1e-4);
        assert!(pose.position.y > orbit.target.y);
    }

    #[test]
    fn test_drag_respects_elevation_limits() {
        let (mut orbit, mut switcher) = setup(OrbitCameraConfig::default());
        let mut input = InputContext::default();
        input.pointer_down = true;
        input.pointer_delta = cgmath::vec2(1.0, -100.0);
        orbit.update(&Time::fixed(0.5), &input, &mut switcher);
        assert_eq!(orbit.elevation(), 80.0);
        assert_eq!(orbit.yaw(), 60.0);

        input.pointer_delta = cgmath::vec2(0.0, 100.0);
        orbit.update(&Time::fixed(0.5), &input, &mut switcher);
        assert_eq!(orbit.elevation(), 10.0);
    }

    #[test]
    fn test_inactive_camera_is_left_alone() {
        let (mut orbit, mut switcher) = setup(OrbitCameraConfig::default());
        switcher.switch_camera(0);
        assert!(orbit.update(&Time::fixed(1.0), &InputContext::default(), &mut switcher).is_none());
        assert_eq!(switcher.cameras()[1].pose, Pose::identity());
    }

    #[test]
    fn test_look_up_returns_to_main_once() {
        let config = OrbitCameraConfig {
            min_elevation: -85.0,
            ..OrbitCameraConfig::default()
        };
        let (orbit, mut switcher) = setup(config);
        let mut orbit = orbit.with_angles(0.0, -80.0);
        assert!(orbit.pose().forward().angle(UP) < cgmath::Rad(0.2));

        let time = Time::fixed(0.5);
        let idle = InputContext::default();
        assert!(orbit.update(&time, &idle, &mut switcher).is_none());
        assert_eq!(orbit.update(&time, &idle, &mut switcher), Some(OrbitEvent::ReturnToMain));
        assert_eq!(switcher.active_index(), Some(0));
        assert!(orbit.update(&time, &idle, &mut switcher).is_none());
    }

    #[test]
    fn test_dragging_blocks_look_up_return() {
        let config = OrbitCameraConfig {
            min_elevation: -85.0,
            ..OrbitCameraConfig::default()
        };
        let (orbit, mut switcher) = setup(config);
        let mut orbit = orbit.with_angles(0.0, -80.0);
        let mut dragging = InputContext::default();
        dragging.pointer_down = true;
        for _ in 0..5 {
            assert!(orbit.update(&Time::fixed(0.5), &dragging, &mut switcher).is_none());
        }
    }
}
