use cgmath::{InnerSpace, Quaternion, Vector3, vec3};
use serde::{Deserialize, Serialize};

use crate::{
    math::{DEGENERATE_EPSILON, UP, look_rotation, project_on_plane},
    pose::Pose,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadReturnUiConfig {
    /// Offset in head space: a little above and in front of the eyes.
    pub local_offset: [f32; 3],
    pub face_head: bool,
    pub yaw_only: bool,
}

impl Default for HeadReturnUiConfig {
    fn default() -> Self {
        HeadReturnUiConfig {
            local_offset: [0.0, 0.25, 0.5],
            face_head: true,
            yaw_only: true,
        }
    }
}

/// The floating "return to main" panel shown while viewing.
#[derive(Clone, Debug)]
pub struct HeadReturnUi {
    pub config: HeadReturnUiConfig,
    visible: bool,
    pose: Pose,
}

impl HeadReturnUi {
    pub fn new(config: HeadReturnUiConfig) -> HeadReturnUi {
        HeadReturnUi {
            config,
            visible: false,
            pose: Pose::identity(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    fn local_offset(&self) -> Vector3<f32> {
        let [x, y, z] = self.config.local_offset;
        vec3(x, y, z)
    }

    /// Late-update follow. Hidden panels stay where they were.
    pub fn follow(&mut self, head: &Pose) {
        if !self.visible {
            return;
        }

        self.pose.position = head.transform_point(self.local_offset());
        if !self.config.face_head {
            return;
        }

        let mut to_head = head.position - self.pose.position;
        if self.config.yaw_only {
            to_head = project_on_plane(to_head, UP);
        }
        if to_head.magnitude2() < DEGENERATE_EPSILON {
            return;
        }
        if let Some(rotation) = look_rotation(to_head.normalize()) {
            self.pose.rotation = rotation;
        }
    }

    pub fn rotation(&self) -> Quaternion<f32> {
        self.pose.rotation
    }
}

impl Default for HeadReturnUi {
    fn default() -> Self {
        HeadReturnUi::new(HeadReturnUiConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Deg;

    #[test]
    fn test_hidden_panel_does_not_move() {
        let mut ui = HeadReturnUi::default();
        ui.follow(&Pose::at(vec3(3.0, 1.6, 0.0)));
        assert_eq!(ui.pose(), Pose::identity());
    }

    #[test]
    fn test_panel_sits_in_front_and_faces_head() {
        let mut ui = HeadReturnUi::default();
        ui.set_visible(true);
        let head = Pose::from_yaw_pitch(vec3(1.0, 1.6, 1.0), Deg(90.0), Deg(0.0));
        ui.follow(&head);

        let expected = vec3(1.5, 1.85, 1.0);
        assert!((ui.pose().position - expected).magnitude() < 1e-4);
        // Facing back at the head means looking along -X.
        assert!((ui.pose().forward() - vec3(-1.0, 0.0, 0.0)).magnitude() < 1e-4);
    }

    #[test]
    fn test_yaw_only_keeps_panel_upright() {
        let mut ui = HeadReturnUi::default();
        ui.set_visible(true);
        ui.follow(&Pose::from_yaw_pitch(vec3(0.0, 1.6, 0.0), Deg(0.0), Deg(-30.0)));
        assert!(ui.pose().forward().y.abs() < 1e-4);
    }
}
