use crate::{
    bounds::BoundsRegion,
    error::FrameIssue,
    head_return_ui::HeadReturnUi,
    input::InputContext,
    locomotion::{
        CharacterMotor, CharacterMover, LocomotionContext, LocomotionProvider, VerticalMover,
    },
    math::clamp_index,
    rig::{PlayerRig, TeleportOutcome},
    time::Time,
    view_switcher::ViewSwitcher,
};

use super::{ExhibitGroup, ModeFlags, TourMode, WaypointKind};

/// Dead zone used to decide whether the player is steering this tick.
const MANUAL_INPUT_DEAD_ZONE: f32 = 0.15;

/// What happened during one [`TourModeController::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub mode: TourMode,
    pub group_index: usize,
    pub gaze_returned: bool,
}

/// Top-level tour state machine.
///
/// Owns every behaviour a mode switch touches and reconfigures all of them in
/// [`set_mode`](Self::set_mode) on every transition, so the whole configuration is a
/// function of `(current_mode, active_group_index)`.
pub struct TourModeController {
    groups: Vec<ExhibitGroup>,
    start_group_index: usize,
    snap_to_start_main_point: bool,

    active_group_index: usize,
    current_mode: TourMode,

    view_switcher: ViewSwitcher,
    bounds: Option<BoundsRegion>,
    mover: Option<CharacterMover>,
    vertical_mover: Option<VerticalMover>,
    providers: Vec<Box<dyn LocomotionProvider>>,
    return_ui: Option<HeadReturnUi>,
}

impl TourModeController {
    pub fn new(groups: Vec<ExhibitGroup>, view_switcher: ViewSwitcher) -> TourModeController {
        TourModeController {
            groups,
            start_group_index: 0,
            snap_to_start_main_point: true,
            active_group_index: 0,
            current_mode: TourMode::Normal,
            view_switcher,
            bounds: None,
            mover: None,
            vertical_mover: None,
            providers: Vec::new(),
            return_ui: None,
        }
    }

    pub fn with_bounds(mut self, bounds: BoundsRegion) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_mover(mut self, mover: CharacterMover) -> Self {
        self.mover = Some(mover);
        self
    }

    pub fn with_vertical_mover(mut self, vertical_mover: VerticalMover) -> Self {
        self.vertical_mover = Some(vertical_mover);
        self
    }

    /// Extra provider switched off while viewing (snap turn, teleport, ...).
    pub fn with_provider(mut self, provider: Box<dyn LocomotionProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_return_ui(mut self, return_ui: HeadReturnUi) -> Self {
        self.return_ui = Some(return_ui);
        self
    }

    pub fn with_start(mut self, start_group_index: usize, snap_to_main_point: bool) -> Self {
        self.start_group_index = start_group_index;
        self.snap_to_start_main_point = snap_to_main_point;
        self
    }

    pub fn current_mode(&self) -> TourMode {
        self.current_mode
    }

    pub fn active_group_index(&self) -> usize {
        self.active_group_index
    }

    pub fn groups(&self) -> &[ExhibitGroup] {
        &self.groups
    }

    pub fn active_group(&self) -> Option<&ExhibitGroup> {
        self.groups.get(self.active_group_index)
    }

    pub fn view_switcher(&self) -> &ViewSwitcher {
        &self.view_switcher
    }

    pub fn bounds(&self) -> Option<&BoundsRegion> {
        self.bounds.as_ref()
    }

    pub fn bounds_mut(&mut self) -> Option<&mut BoundsRegion> {
        self.bounds.as_mut()
    }

    pub fn mover(&self) -> Option<&CharacterMover> {
        self.mover.as_ref()
    }

    pub fn mover_mut(&mut self) -> Option<&mut CharacterMover> {
        self.mover.as_mut()
    }

    pub fn vertical_mover(&self) -> Option<&VerticalMover> {
        self.vertical_mover.as_ref()
    }

    pub fn providers(&self) -> &[Box<dyn LocomotionProvider>] {
        &self.providers
    }

    pub fn providers_mut(&mut self) -> &mut [Box<dyn LocomotionProvider>] {
        &mut self.providers
    }

    pub fn return_ui(&self) -> Option<&HeadReturnUi> {
        self.return_ui.as_ref()
    }

    /// Indices of groups whose free-roam walls are currently up.
    pub fn active_wall_groups(&self) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, group)| group.walls.as_ref().is_some_and(|walls| walls.is_active()))
            .map(|(index, _)| index)
            .collect()
    }

    /// Bring the tour into a known state: walls and bounds down, `Normal` mode, and
    /// optionally the rig on the start group's main point. Returns the snap's outcome.
    pub fn start(&mut self, rig: &mut dyn PlayerRig) -> Option<TeleportOutcome> {
        self.active_group_index =
            clamp_index(self.start_group_index, self.groups.len()).unwrap_or(0);

        self.disable_all_walls();
        if let Some(bounds) = &mut self.bounds {
            bounds.set_enabled(false);
            bounds.set_active_area(self.active_group_index);
        }

        self.set_mode(TourMode::Normal);

        if !self.snap_to_start_main_point {
            return None;
        }
        let main = self.active_group().and_then(|group| group.main);
        Some(self.view_switcher.return_to_main(rig, main))
    }

    pub fn enter_detail(&mut self, rig: &mut dyn PlayerRig, group_index: usize) -> TeleportOutcome {
        self.enter(rig, group_index, TourMode::DetailView, WaypointKind::Detail)
    }

    pub fn enter_wide(&mut self, rig: &mut dyn PlayerRig, group_index: usize) -> TeleportOutcome {
        self.enter(rig, group_index, TourMode::WideView, WaypointKind::Wide)
    }

    pub fn enter_free_roam(
        &mut self,
        rig: &mut dyn PlayerRig,
        group_index: usize,
    ) -> TeleportOutcome {
        self.enter(rig, group_index, TourMode::FreeRoam, WaypointKind::FreeRoamStart)
    }

    /// Back to `Normal` at the active group's main point.
    pub fn return_to_main(&mut self, rig: &mut dyn PlayerRig) -> TeleportOutcome {
        self.set_mode(TourMode::Normal);
        let main = self.active_group().and_then(|group| group.main);
        self.view_switcher.return_to_main(rig, main)
    }

    fn enter(
        &mut self,
        rig: &mut dyn PlayerRig,
        group_index: usize,
        mode: TourMode,
        kind: WaypointKind,
    ) -> TeleportOutcome {
        self.activate_group(group_index);
        self.set_mode(mode);

        let Some(group) = self.groups.get(self.active_group_index) else {
            let issue = FrameIssue::MissingReference("exhibit group");
            engine::tour_log!(WARN, "cannot enter {}: {}", mode, issue);
            return TeleportOutcome::Skipped(issue);
        };
        let target = group.waypoint(kind);
        let main = group.main;
        self.view_switcher
            .move_to_point(rig, target, main, mode != TourMode::FreeRoam)
    }

    fn activate_group(&mut self, group_index: usize) {
        let clamped = clamp_index(group_index, self.groups.len()).unwrap_or(0);
        if clamped != group_index {
            engine::tour_log!(
                DEBUG,
                "{}",
                FrameIssue::OutOfRangeIndex {
                    what: "exhibit group",
                    index: group_index,
                    len: self.groups.len(),
                }
            );
        }
        self.active_group_index = clamped;

        if let Some(bounds) = &mut self.bounds {
            bounds.set_active_area(clamped);
        }
        self.disable_all_walls();
    }

    /// Single choke point for mode changes. Runs the full reconfiguration every time,
    /// even when `mode` is already current.
    fn set_mode(&mut self, mode: TourMode) {
        self.current_mode = mode;
        let flags = ModeFlags::for_mode(mode);

        for provider in &mut self.providers {
            provider.set_enabled(flags.contains(ModeFlags::EXTRA_PROVIDERS));
        }

        if let Some(bounds) = &mut self.bounds {
            bounds.set_enabled(flags.contains(ModeFlags::BOUNDS));
        }

        let active = self.active_group_index;
        for (index, group) in self.groups.iter_mut().enumerate() {
            if let Some(walls) = &mut group.walls {
                walls.set_active(index == active && flags.contains(ModeFlags::WALLS));
            }
        }

        if let Some(mover) = &mut self.mover {
            mover.set_enabled(flags.contains(ModeFlags::MOVER));
            mover.use_gravity = flags.contains(ModeFlags::GRAVITY);
            mover.enable_fly = flags.contains(ModeFlags::FLY);
            mover.turn_assist = flags.contains(ModeFlags::TURN_ASSIST);
        }

        self.view_switcher
            .set_look_up_return_enabled(flags.contains(ModeFlags::GAZE_RETURN));

        if let Some(vertical_mover) = &mut self.vertical_mover {
            vertical_mover.set_enabled(flags.contains(ModeFlags::VERTICAL_MOVER));
        }

        if let Some(return_ui) = &mut self.return_ui {
            return_ui.set_visible(flags.contains(ModeFlags::RETURN_UI));
        }

        engine::tour_log!(INFO, "mode {} (group {})", mode, self.active_group_index);
    }

    fn disable_all_walls(&mut self) {
        for walls in self.groups.iter_mut().filter_map(|group| group.walls.as_mut()) {
            walls.set_active(false);
        }
    }

    /// Flags for the behaviours actually wired into this controller.
    pub fn wired_mask(&self) -> ModeFlags {
        let mut mask = ModeFlags::GAZE_RETURN;
        if self.mover.is_some() {
            mask |= ModeFlags::MOVER | ModeFlags::GRAVITY | ModeFlags::FLY | ModeFlags::TURN_ASSIST;
        }
        if !self.providers.is_empty() {
            mask |= ModeFlags::EXTRA_PROVIDERS;
        }
        if self.bounds.is_some() {
            mask |= ModeFlags::BOUNDS;
        }
        if self.active_group().is_some_and(|group| group.walls.is_some()) {
            mask |= ModeFlags::WALLS;
        }
        if self.vertical_mover.is_some() {
            mask |= ModeFlags::VERTICAL_MOVER;
        }
        if self.return_ui.is_some() {
            mask |= ModeFlags::RETURN_UI;
        }
        mask
    }

    /// What the wired behaviours should look like for the current mode.
    pub fn expected_flags(&self) -> ModeFlags {
        ModeFlags::for_mode(self.current_mode) & self.wired_mask()
    }

    /// Read the live configuration back out of every behaviour.
    pub fn derived_flags(&self) -> ModeFlags {
        let mut flags = ModeFlags::empty();
        if let Some(mover) = &self.mover {
            flags.set(ModeFlags::MOVER, mover.is_enabled());
            flags.set(ModeFlags::GRAVITY, mover.use_gravity);
            flags.set(ModeFlags::FLY, mover.enable_fly);
            flags.set(ModeFlags::TURN_ASSIST, mover.turn_assist);
        }
        flags.set(
            ModeFlags::EXTRA_PROVIDERS,
            !self.providers.is_empty() && self.providers.iter().all(|p| p.is_enabled()),
        );
        flags.set(
            ModeFlags::BOUNDS,
            self.bounds.as_ref().is_some_and(|bounds| bounds.is_enabled()),
        );
        flags.set(
            ModeFlags::WALLS,
            self.active_group()
                .and_then(|group| group.walls.as_ref())
                .is_some_and(|walls| walls.is_active()),
        );
        flags.set(
            ModeFlags::GAZE_RETURN,
            self.view_switcher.look_up_return_enabled(),
        );
        flags.set(
            ModeFlags::VERTICAL_MOVER,
            self.vertical_mover.as_ref().is_some_and(|v| v.is_enabled()),
        );
        flags.set(
            ModeFlags::RETURN_UI,
            self.return_ui.as_ref().is_some_and(|ui| ui.is_visible()),
        );
        flags
    }

    /// One frame: movers, bounds clamp, look-up return, then the return panel.
    pub fn tick(
        &mut self,
        time: &Time,
        input: &InputContext,
        rig: &mut dyn PlayerRig,
        motor: Option<&mut dyn CharacterMotor>,
    ) -> TickReport {
        let sanitized;
        let input = if input.is_well_formed() {
            input
        } else {
            engine::input_log!(
                DEBUG,
                "{}",
                FrameIssue::InputReadFailure("non-finite controller values")
            );
            sanitized = input.sanitized();
            &sanitized
        };

        {
            // Shorten the motor's trait-object lifetime to this block.
            let motor = motor.map(|motor| motor as &mut dyn CharacterMotor);
            let mut ctx = LocomotionContext::new(time, input, &mut *rig, motor);
            if let Some(vertical_mover) = &mut self.vertical_mover {
                vertical_mover.tick(&mut ctx);
            }
            if let Some(mover) = &mut self.mover {
                mover.tick(&mut ctx);
            }
            for provider in &mut self.providers {
                provider.tick(&mut ctx);
            }
        }

        if let Some(bounds) = &self.bounds {
            bounds.tick(rig);
        }

        let manual_input = input.has_manual_input(MANUAL_INPUT_DEAD_ZONE);
        let gaze_returned = match self.view_switcher.update(time, rig, manual_input) {
            Some(gaze_return) => {
                engine::tour_log!(DEBUG, "gaze return outcome {:?}", gaze_return.outcome);
                // The switcher already travelled; only the mode needs normalising.
                self.set_mode(TourMode::Normal);
                true
            }
            None => false,
        };

        if let (Some(return_ui), Some(head)) = (&mut self.return_ui, rig.head_pose()) {
            return_ui.follow(&head);
        }

        TickReport {
            mode: self.current_mode,
            group_index: self.active_group_index,
            gaze_returned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bounds::{BoundShape, RegionCollider},
        gaze_return::GazeReturnConfig,
        locomotion::SnapTurnProvider,
        math::{UP, horizontal_direction, yaw_of},
        pose::Pose,
        rig::SimulatedRig,
    };
    use cgmath::{Deg, InnerSpace, vec3};

    fn group(name: &str, x: f32) -> ExhibitGroup {
        ExhibitGroup::new(name)
            .with_waypoint(
                WaypointKind::Main,
                Pose::from_yaw_pitch(vec3(x, 1.6, 0.0), Deg(30.0), Deg(0.0)),
            )
            .with_waypoint(
                WaypointKind::Detail,
                Pose::from_yaw_pitch(vec3(x + 1.0, 2.0, 3.0), Deg(180.0), Deg(-20.0)),
            )
            .with_waypoint(
                WaypointKind::Wide,
                Pose::from_yaw_pitch(vec3(x, 4.0, -6.0), Deg(0.0), Deg(-35.0)),
            )
            .with_waypoint(
                WaypointKind::FreeRoamStart,
                Pose::from_yaw_pitch(vec3(x, 1.6, 2.0), Deg(-90.0), Deg(0.0)),
            )
            .with_walls(format!("{}Walls", name))
    }

    fn controller() -> TourModeController {
        let bounds = BoundsRegion::new(
            BoundShape::Box,
            vec![
                Some(RegionCollider::new("AreaA", vec3(0.0, 2.0, 0.0), vec3(5.0, 2.0, 5.0))),
                Some(RegionCollider::new("AreaB", vec3(20.0, 2.0, 0.0), vec3(5.0, 2.0, 5.0))),
            ],
        );
        TourModeController::new(
            vec![group("A", 0.0), group("B", 20.0)],
            ViewSwitcher::new(GazeReturnConfig {
                hold_seconds: 1.0,
                ..GazeReturnConfig::default()
            }),
        )
        .with_bounds(bounds)
        .with_mover(CharacterMover::default())
        .with_vertical_mover(VerticalMover::default())
        .with_provider(Box::new(SnapTurnProvider::default()))
        .with_return_ui(HeadReturnUi::default())
    }

    fn started() -> (TourModeController, SimulatedRig) {
        let mut tour = controller();
        let mut rig = SimulatedRig::standing(1.6);
        tour.start(&mut rig);
        (tour, rig)
    }

    fn assert_settled(tour: &TourModeController) {
        assert_eq!(tour.wired_mask(), ModeFlags::all());
        assert_eq!(
            tour.derived_flags(),
            tour.expected_flags(),
            "mode {}",
            tour.current_mode()
        );
        let walls = tour.active_wall_groups();
        if tour.current_mode() == TourMode::FreeRoam {
            assert_eq!(walls, vec![tour.active_group_index()]);
        } else {
            assert!(walls.is_empty());
        }
        assert_eq!(tour.view_switcher().is_viewing(), tour.current_mode().is_view_mode());
    }

    #[derive(Clone, Copy, Debug)]
    enum Step {
        Detail(usize),
        Wide(usize),
        FreeRoam(usize),
        Return,
    }

    fn head_near(rig: &SimulatedRig, pose: &Pose) -> bool {
        let head = rig.head_pose().unwrap();
        let same_position = (head.position - pose.position).magnitude() < 1e-3;
        let head_yaw = yaw_of(head.forward()).unwrap();
        let pose_yaw = yaw_of(pose.forward()).unwrap();
        let yaw_error = crate::math::normalize_angle(head_yaw - pose_yaw);
        same_position && yaw_error.0.abs() < 1e-2
    }

    #[test]
    fn test_start_snaps_to_main_in_normal_mode() {
        let (tour, rig) = started();
        assert_eq!(tour.current_mode(), TourMode::Normal);
        assert_settled(&tour);
        assert!(head_near(&rig, &tour.groups()[0].main.unwrap()));
    }

    #[test]
    fn test_start_clamps_start_group() {
        let mut tour = controller().with_start(9, false);
        let mut rig = SimulatedRig::standing(1.6);
        assert!(tour.start(&mut rig).is_none());
        assert_eq!(tour.active_group_index(), 1);
        assert_eq!(tour.bounds().unwrap().active_area_index(), 1);
        assert_eq!(rig, SimulatedRig::standing(1.6));
    }

    #[test]
    fn test_mode_table_holds_after_every_transition() {
        let (mut tour, mut rig) = started();
        let steps = [
            Step::Detail(0),
            Step::FreeRoam(1),
            Step::Wide(1),
            Step::Return,
            Step::FreeRoam(0),
            Step::FreeRoam(1),
            Step::Return,
            Step::Wide(5),
            Step::Detail(0),
            Step::Return,
        ];
        for step in steps {
            match step {
                Step::Detail(index) => tour.enter_detail(&mut rig, index),
                Step::Wide(index) => tour.enter_wide(&mut rig, index),
                Step::FreeRoam(index) => tour.enter_free_roam(&mut rig, index),
                Step::Return => tour.return_to_main(&mut rig),
            };
            assert_settled(&tour);
        }
    }

    #[test]
    fn test_enter_free_roam_is_idempotent() {
        let (mut once, mut once_rig) = started();
        once.enter_free_roam(&mut once_rig, 1);

        let (mut twice, mut twice_rig) = started();
        twice.enter_free_roam(&mut twice_rig, 1);
        twice.enter_free_roam(&mut twice_rig, 1);

        assert_eq!(once.current_mode(), twice.current_mode());
        assert_eq!(once.active_group_index(), twice.active_group_index());
        assert_eq!(once.derived_flags(), twice.derived_flags());
        assert_eq!(once.active_wall_groups(), twice.active_wall_groups());
        assert!((once_rig.origin_position() - twice_rig.origin_position()).magnitude() < 1e-4);
        let drift = crate::math::normalize_angle(once_rig.origin_yaw() - twice_rig.origin_yaw());
        assert!(drift.0.abs() < 1e-3);
    }

    #[test]
    fn test_reentering_repairs_drifted_state() {
        let (mut tour, mut rig) = started();
        tour.enter_free_roam(&mut rig, 0);
        tour.mover_mut().unwrap().use_gravity = true;
        tour.mover_mut().unwrap().set_enabled(false);
        tour.bounds_mut().unwrap().set_enabled(false);
        assert_ne!(tour.derived_flags(), tour.expected_flags());

        tour.enter_free_roam(&mut rig, 0);
        assert_settled(&tour);
    }

    #[test]
    fn test_walls_follow_active_group_only() {
        let (mut tour, mut rig) = started();
        tour.enter_free_roam(&mut rig, 0);
        assert_eq!(tour.active_wall_groups(), vec![0]);
        tour.enter_free_roam(&mut rig, 1);
        assert_eq!(tour.active_wall_groups(), vec![1]);
        tour.enter_detail(&mut rig, 0);
        assert!(tour.active_wall_groups().is_empty());
    }

    #[test]
    fn test_detail_teleport_is_yaw_only() {
        let (mut tour, mut rig) = started();
        let pitch_before = rig.head_pose().unwrap().forward().y;
        tour.enter_detail(&mut rig, 0);

        let detail = tour.groups()[0].detail.unwrap();
        let head = rig.head_pose().unwrap();
        assert!(head_near(&rig, &detail));
        assert!((head.forward().y - pitch_before).abs() < 1e-5);
        assert!(head.up().dot(UP) > 0.999);
        assert!(horizontal_direction(head.forward()).is_some());
    }

    #[test]
    fn test_gaze_return_through_tick() {
        let (mut tour, mut rig) = started();
        tour.enter_detail(&mut rig, 1);
        let head = Pose::from_yaw_pitch(vec3(0.0, 1.6, 0.0), Deg(0.0), Deg(85.0));
        rig.set_head_local_pose(Some(head));

        let time = Time::fixed(0.25);
        let input = InputContext::default();
        let mut fired = 0;
        for _ in 0..3 {
            fired += tour.tick(&time, &input, &mut rig, None).gaze_returned as i32;
        }
        assert_eq!(fired, 0);
        assert_eq!(tour.current_mode(), TourMode::DetailView);

        let report = tour.tick(&time, &input, &mut rig, None);
        assert!(report.gaze_returned);
        assert_eq!(report.mode, TourMode::Normal);
        assert_settled(&tour);

        let main = tour.groups()[1].main.unwrap();
        assert!((rig.head_pose().unwrap().position - main.position).magnitude() < 1e-3);

        for _ in 0..8 {
            assert!(!tour.tick(&time, &input, &mut rig, None).gaze_returned);
        }
    }

    #[test]
    fn test_scenario_detail_then_return() {
        let (mut tour, mut rig) = started();
        tour.enter_detail(&mut rig, 0);
        assert!(tour.view_switcher().is_viewing());
        assert!(!tour.mover().unwrap().is_enabled());
        assert!(!tour.bounds().unwrap().is_enabled());
        assert!(tour.return_ui().unwrap().is_visible());

        tour.return_to_main(&mut rig);
        let mover = tour.mover().unwrap();
        assert_eq!(tour.current_mode(), TourMode::Normal);
        assert!(mover.is_enabled());
        assert!(mover.use_gravity);
        assert!(!mover.enable_fly);
        assert!(!tour.view_switcher().is_viewing());
        assert!(head_near(&rig, &tour.groups()[0].main.unwrap()));
    }

    #[test]
    fn test_scenario_free_roam_then_detail() {
        let (mut tour, mut rig) = started();
        tour.enter_free_roam(&mut rig, 1);
        assert!(tour.bounds().unwrap().is_enabled());
        assert!(tour.mover().unwrap().enable_fly);

        tour.enter_detail(&mut rig, 1);
        assert!(tour.active_wall_groups().is_empty());
        assert!(!tour.bounds().unwrap().is_enabled());
        let mover = tour.mover().unwrap();
        assert!(!mover.is_enabled());
        assert!(!mover.enable_fly);
        assert!(!mover.use_gravity);
        assert!(!tour.vertical_mover().unwrap().is_enabled());
        assert!(tour.view_switcher().look_up_return_enabled());
        assert!(tour.view_switcher().is_viewing());
        assert_settled(&tour);
    }

    #[test]
    fn test_missing_waypoint_still_switches_mode() {
        let mut groups = controller().groups().to_vec();
        groups[0].wide = None;
        let mut tour = TourModeController::new(groups, ViewSwitcher::default())
            .with_mover(CharacterMover::default());
        let mut rig = SimulatedRig::standing(1.6);
        tour.start(&mut rig);
        let snapped = rig.clone();

        assert!(!tour.enter_wide(&mut rig, 0).moved());
        assert_eq!(tour.current_mode(), TourMode::WideView);
        assert!(!tour.mover().unwrap().is_enabled());
        assert_eq!(rig, snapped);
    }

    #[test]
    fn test_no_groups_is_harmless() {
        let mut tour = TourModeController::new(Vec::new(), ViewSwitcher::default())
            .with_mover(CharacterMover::default());
        let mut rig = SimulatedRig::standing(1.6);
        assert!(!tour.start(&mut rig).is_some_and(|outcome| outcome.moved()));
        assert!(!tour.enter_free_roam(&mut rig, 3).moved());
        assert_eq!(tour.current_mode(), TourMode::FreeRoam);
        assert_eq!(tour.active_group_index(), 0);
        assert_eq!(rig, SimulatedRig::standing(1.6));
    }

    #[test]
    fn test_view_mode_blocks_movement_in_tick() {
        let (mut tour, mut rig) = started();
        tour.enter_wide(&mut rig, 0);
        let parked = rig.clone();

        let mut input = InputContext::default();
        input.left_hand.thumbstick = cgmath::vec2(0.0, 1.0);
        input.right_hand.thumbstick = cgmath::vec2(1.0, 0.0);
        input.left_hand.primary_value = 1.0;
        tour.tick(&Time::fixed(0.5), &input, &mut rig, None);
        assert_eq!(rig, parked);
    }

    #[test]
    fn test_free_roam_tick_is_clamped_by_bounds() {
        let (mut tour, mut rig) = started();
        tour.enter_free_roam(&mut rig, 0);

        let mut input = InputContext::default();
        input.left_hand.thumbstick = cgmath::vec2(0.0, 1.0);
        for _ in 0..20 {
            tour.tick(&Time::fixed(0.5), &input, &mut rig, None);
        }
        let origin = rig.origin_position();
        assert!(origin.x.abs() <= 5.0 + 1e-4 && origin.z.abs() <= 5.0 + 1e-4);
    }

    #[test]
    fn test_non_finite_input_is_neutral() {
        let (mut tour, mut rig) = started();
        let before = rig.clone();
        let mut input = InputContext::default();
        input.left_hand.thumbstick = cgmath::vec2(f32::NAN, f32::INFINITY);
        tour.tick(&Time::fixed(0.5), &input, &mut rig, None);
        assert_eq!(rig, before);
    }
}
