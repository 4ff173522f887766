use crate::{math::clamp_index, pose::Pose};

#[derive(Clone, Debug, PartialEq)]
pub struct SceneCamera {
    pub name: String,
    pub pose: Pose,
    active: bool,
}

impl SceneCamera {
    pub fn new(name: impl Into<String>, pose: Pose) -> SceneCamera {
        SceneCamera {
            name: name.into(),
            pose,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Keeps exactly one of several cameras live and can put any of them back where it
/// started.
#[derive(Clone, Debug)]
pub struct CameraSwitcher {
    cameras: Vec<SceneCamera>,
    initial_poses: Vec<Pose>,
    pub main_index: usize,
    pub reset_on_switch: bool,
}

impl CameraSwitcher {
    /// Captures every camera's current pose as its reset pose.
    pub fn new(cameras: Vec<SceneCamera>, main_index: usize) -> CameraSwitcher {
        let initial_poses = cameras.iter().map(|camera| camera.pose).collect();
        CameraSwitcher {
            cameras,
            initial_poses,
            main_index,
            reset_on_switch: false,
        }
    }

    pub fn cameras(&self) -> &[SceneCamera] {
        &self.cameras
    }

    pub fn camera_mut(&mut self, index: usize) -> Option<&mut SceneCamera> {
        self.cameras.get_mut(index)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.cameras.iter().position(|camera| camera.active)
    }

    pub fn start(&mut self) {
        self.switch_camera(self.main_index);
    }

    pub fn switch_camera(&mut self, index: usize) {
        let Some(index) = clamp_index(index, self.cameras.len()) else {
            return;
        };
        for i in 0..self.cameras.len() {
            let on = i == index;
            self.cameras[i].active = on;
            if on && self.reset_on_switch {
                self.reset_camera_pose(i);
            }
        }
        engine::camera_log!(DEBUG, "camera {} ({})", index, self.cameras[index].name);
    }

    /// Switch to the main camera and always restore its pose.
    pub fn return_to_main(&mut self) {
        self.switch_camera(self.main_index);
        self.reset_camera_pose(self.main_index);
    }

    pub fn reset_camera_pose(&mut self, index: usize) {
        if let (Some(camera), Some(pose)) =
            (self.cameras.get_mut(index), self.initial_poses.get(index))
        {
            camera.pose = *pose;
        }
    }
}
