use crate::{
    error::FrameIssue,
    gaze_return::{GazeReturnConfig, GazeReturnTimer},
    pose::Pose,
    rig::{PlayerRig, RigTeleporter, TeleportOutcome},
    time::Time,
};

/// Raised by [`ViewSwitcher::update`] when the look-up gesture completed. The rig has
/// already been moved back to `main_point` when this is returned.
#[derive(Clone, Debug, PartialEq)]
pub struct GazeReturn {
    pub main_point: Pose,
    pub outcome: TeleportOutcome,
}

/// Moves the rig between a station's vantage points and its main point, and owns the
/// "is viewing" state that arms the look-up return gesture.
#[derive(Clone, Debug)]
pub struct ViewSwitcher {
    look_up_return_enabled: bool,
    is_viewing: bool,
    current_main_point: Option<Pose>,
    gaze: GazeReturnTimer,
}

impl ViewSwitcher {
    pub fn new(gaze: GazeReturnConfig) -> ViewSwitcher {
        ViewSwitcher {
            look_up_return_enabled: true,
            is_viewing: false,
            current_main_point: None,
            gaze: GazeReturnTimer::new(gaze),
        }
    }

    pub fn is_viewing(&self) -> bool {
        self.is_viewing
    }

    pub fn current_main_point(&self) -> Option<Pose> {
        self.current_main_point
    }

    pub fn look_up_return_enabled(&self) -> bool {
        self.look_up_return_enabled
    }

    pub fn set_look_up_return_enabled(&mut self, enabled: bool) {
        self.look_up_return_enabled = enabled;
    }

    pub fn gaze_timer(&self) -> &GazeReturnTimer {
        &self.gaze
    }

    /// Travel to a vantage point, remembering where the look-up return should go.
    ///
    /// The view state is updated even when `target` is missing so that it always agrees
    /// with the caller's mode; only the teleport is skipped. Viewing without a main point
    /// to return to is refused.
    pub fn move_to_point(
        &mut self,
        rig: &mut dyn PlayerRig,
        target: Option<Pose>,
        main_for_return: Option<Pose>,
        viewing_state: bool,
    ) -> TeleportOutcome {
        self.current_main_point = main_for_return;
        self.is_viewing = viewing_state && main_for_return.is_some();
        if viewing_state && !self.is_viewing {
            engine::tour_log!(
                WARN,
                "viewing requested without a main point: {}",
                FrameIssue::MissingReference("main waypoint")
            );
        }
        self.gaze.reset();

        match target {
            Some(target) => RigTeleporter::teleport(rig, &target),
            None => {
                let issue = FrameIssue::MissingReference("view waypoint");
                engine::tour_log!(DEBUG, "travel skipped: {}", issue);
                TeleportOutcome::Skipped(issue)
            }
        }
    }

    /// Leave viewing and travel to `main`.
    pub fn return_to_main(
        &mut self,
        rig: &mut dyn PlayerRig,
        main: Option<Pose>,
    ) -> TeleportOutcome {
        self.is_viewing = false;
        self.gaze.reset();

        let Some(main) = main else {
            let issue = FrameIssue::MissingReference("main waypoint");
            engine::tour_log!(DEBUG, "return skipped: {}", issue);
            return TeleportOutcome::Skipped(issue);
        };
        self.current_main_point = Some(main);
        RigTeleporter::teleport(rig, &main)
    }

    /// Per-tick look-up evaluation. Only runs while the gesture is enabled and the
    /// player is viewing.
    pub fn update(
        &mut self,
        time: &Time,
        rig: &mut dyn PlayerRig,
        manual_input: bool,
    ) -> Option<GazeReturn> {
        if !self.look_up_return_enabled || !self.is_viewing {
            return None;
        }
        let main_point = self.current_main_point?;
        let Some(head) = rig.head_pose() else {
            engine::tour_log!(DEBUG, "gaze skipped: {}", FrameIssue::MissingReference("rig head"));
            return None;
        };

        if !self.gaze.update(head.forward(), time.unscaled_delta, manual_input) {
            return None;
        }

        engine::tour_log!(INFO, "look-up return fired");
        let outcome = self.return_to_main(rig, Some(main_point));
        Some(GazeReturn {
            main_point,
            outcome,
        })
    }
}

impl Default for ViewSwitcher {
    fn default() -> Self {
        ViewSwitcher::new(GazeReturnConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::SimulatedRig;
    use cgmath::{Deg, InnerSpace, vec3};

    fn main_point() -> Pose {
        Pose::from_yaw_pitch(vec3(0.0, 1.6, 0.0), Deg(0.0), Deg(0.0))
    }

    fn detail_point() -> Pose {
        Pose::from_yaw_pitch(vec3(4.0, 2.5, 6.0), Deg(90.0), Deg(0.0))
    }

    fn look_up(rig: &mut SimulatedRig) {
        rig.set_head_local_pose(Some(Pose::from_yaw_pitch(
            vec3(0.0, 1.6, 0.0),
            Deg(0.0),
            Deg(80.0),
        )));
    }

    #[test]
    fn test_move_to_point_sets_state_and_teleports() {
        let mut rig = SimulatedRig::standing(1.6);
        let mut switcher = ViewSwitcher::default();

        let outcome =
            switcher.move_to_point(&mut rig, Some(detail_point()), Some(main_point()), true);
        assert!(outcome.moved());
        assert!(switcher.is_viewing());
        assert_eq!(switcher.current_main_point(), Some(main_point()));

        let head = rig.head_pose().unwrap();
        assert!((head.position - detail_point().position).magnitude() < 1e-4);
    }

    #[test]
    fn test_missing_target_still_updates_state() {
        let mut rig = SimulatedRig::standing(1.6);
        let mut switcher = ViewSwitcher::default();
        let outcome = switcher.move_to_point(&mut rig, None, Some(main_point()), true);
        assert!(!outcome.moved());
        assert!(switcher.is_viewing());
        assert_eq!(rig, SimulatedRig::standing(1.6));
    }

    #[test]
    fn test_viewing_requires_main_point() {
        let mut rig = SimulatedRig::standing(1.6);
        let mut switcher = ViewSwitcher::default();
        switcher.move_to_point(&mut rig, Some(detail_point()), None, true);
        assert!(!switcher.is_viewing());
    }

    #[test]
    fn test_gaze_return_fires_once_and_leaves_viewing() {
        let mut rig = SimulatedRig::standing(1.6);
        let mut switcher = ViewSwitcher::new(GazeReturnConfig {
            hold_seconds: 1.0,
            ..GazeReturnConfig::default()
        });
        switcher.move_to_point(&mut rig, Some(detail_point()), Some(main_point()), true);
        look_up(&mut rig);

        let time = Time::fixed(0.25);
        let events: Vec<_> = (0..8)
            .filter_map(|_| switcher.update(&time, &mut rig, false))
            .collect();
        assert_eq!(events.len(), 1);
        assert!(!switcher.is_viewing());

        let head = rig.head_pose().unwrap();
        assert!((head.position - main_point().position).magnitude() < 1e-4);
    }

    #[test]
    fn test_gaze_uses_unscaled_time() {
        let mut rig = SimulatedRig::standing(1.6);
        let mut switcher = ViewSwitcher::new(GazeReturnConfig {
            hold_seconds: 0.5,
            ..GazeReturnConfig::default()
        });
        switcher.move_to_point(&mut rig, Some(detail_point()), Some(main_point()), true);
        look_up(&mut rig);

        let paused = Time::new(0.5, 0.0);
        assert!(switcher.update(&paused, &mut rig, false).is_some());
    }

    #[test]
    fn test_disabled_gesture_never_fires() {
        let mut rig = SimulatedRig::standing(1.6);
        let mut switcher = ViewSwitcher::default();
        switcher.set_look_up_return_enabled(false);
        switcher.move_to_point(&mut rig, Some(detail_point()), Some(main_point()), true);
        look_up(&mut rig);

        let time = Time::fixed(1.0);
        for _ in 0..5 {
            assert!(switcher.update(&time, &mut rig, false).is_none());
        }
        assert!(switcher.is_viewing());
    }
}
