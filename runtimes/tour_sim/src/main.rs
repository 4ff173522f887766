// Tour Sim - headless runtime for the exhibition tour
//
// Runs the tour controller against a simulated rig and a rapier physics world,
// driven by a small command script instead of a headset.

mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use cgmath::{Deg, Vector3, vec3};
use clap::Parser;
use tracing::info;

use exhibit_tour::{
    TourConfig, TourModeController,
    debug::{InputMonitor, InteractorDebug, PositionWatchdog},
    effect::Effect,
    gadget::{BodyMotion, Sword},
    input::{Handedness, InputContext, Key},
    locomotion::{CapsuleDriver, CharacterMotor, PenetrationQuery},
    physics::PhysicsWorld,
    pose::Pose,
    rig::{PlayerRig, SimulatedRig},
    time::Time,
};
use script::{Command, parse_script};

const DEFAULT_SCRIPT: &str = "detail 0; look 80 1.0; look 0 0.2; free 0; move 0 1 2.0; up 0.5; \
     turn; status; grab right; charge 3.2; swing 6; release; wide 0; return; status";

#[derive(Parser)]
#[command(name = "tour_sim")]
#[command(about = "Headless exhibition tour simulator")]
struct Args {
    /// Tour config (JSON). The built-in two-station demo is used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Commands separated by ';'
    #[arg(short, long, default_value = DEFAULT_SCRIPT)]
    script: String,

    /// Simulation rate
    #[arg(long, default_value = "72")]
    fps: u32,

    /// Standing head height in metres
    #[arg(long, default_value = "1.6")]
    height: f32,

    /// Log scopes, e.g. "info,physics=debug" (overrides TOUR_LOG)
    #[arg(long)]
    log: Option<String>,

    /// Log every scope at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_spec = if args.verbose {
        Some("debug".to_string())
    } else {
        args.log.clone()
    };
    engine::logging::init_logging_with_spec(log_spec.as_deref(), "TOUR_LOG");

    let config = match &args.config {
        Some(path) => TourConfig::load(path)
            .with_context(|| format!("Failed to load tour config {}", path.display()))?,
        None => TourConfig::demo(),
    };

    if args.dump_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let commands = parse_script(&args.script)?;
    let mut sim = Simulation::new(config, args.fps, args.height)?;
    info!("Running {} script command(s) at {} fps", commands.len(), args.fps);

    sim.start();
    for command in &commands {
        sim.run(command);
    }
    sim.print_status();
    Ok(())
}

struct Simulation {
    controller: TourModeController,
    rig: SimulatedRig,
    physics: PhysicsWorld,
    capsule: CapsuleDriver,
    sword: Sword,
    input: InputContext,
    time: Time,
    dt: f32,
    height: f32,
    frame: u64,
    watchdog: PositionWatchdog,
    monitor: InputMonitor,
    motion: BodyMotion,
    effects_applied: usize,
}

impl Simulation {
    fn new(config: TourConfig, fps: u32, height: f32) -> Result<Simulation> {
        let controller = config.build_controller()?;

        let mut physics = PhysicsWorld::new();
        for b in &config.static_boxes {
            physics.add_static_box(b.center(), b.half_extents());
        }
        for walls in config.groups.iter().filter_map(|group| group.walls.as_ref()) {
            for b in &walls.boxes {
                physics.add_wall(&walls.name, b.center(), b.half_extents());
            }
        }
        if let Some(bounds) = controller.bounds() {
            for region in bounds.colliders().iter().flatten() {
                physics.add_region(region);
            }
        }

        let mut sword = config.sword.build();
        sword.subscribe_select(Box::new(InteractorDebug::new("Sword")));

        let rig = SimulatedRig::standing(height);
        let watchdog = PositionWatchdog::new("rig origin", rig.origin_position());

        Ok(Simulation {
            controller,
            rig,
            physics,
            capsule: CapsuleDriver::new(config.capsule.clone()),
            sword,
            input: InputContext::default(),
            time: Time::default(),
            dt: 1.0 / fps.max(1) as f32,
            height,
            frame: 0,
            watchdog,
            monitor: InputMonitor::default(),
            motion: BodyMotion::default(),
            effects_applied: 0,
        })
    }

    fn start(&mut self) {
        if let Some(outcome) = self.controller.start(&mut self.rig) {
            info!("Start: {:?}", outcome);
        }
        self.sync_physics();
    }

    fn sync_physics(&mut self) {
        let wall_sets = self
            .controller
            .groups()
            .iter()
            .filter_map(|group| group.walls.as_ref());
        self.physics.sync_walls(wall_sets);
        if let Some(bounds) = self.controller.bounds() {
            self.physics.sync_regions(bounds.colliders().iter().flatten());
        }
    }

    fn step(&mut self) {
        self.time = self.time.next(self.dt);
        self.frame += 1;

        self.sync_physics();
        self.physics
            .set_character(self.capsule.shape(), self.rig.origin_yaw());
        let report = self.controller.tick(
            &self.time,
            &self.input,
            &mut self.rig,
            Some(&mut self.physics as &mut dyn CharacterMotor),
        );
        if report.gaze_returned {
            info!("Frame {}: gaze return to main", self.frame);
        }

        self.capsule
            .update(
                &mut self.rig,
                self.time.delta,
                Some(&self.physics as &dyn PenetrationQuery),
            );
        self.watchdog.observe(self.rig.origin_position());
        self.monitor.update(self.time.delta, &self.input);

        let effect = self
            .sword
            .update(&self.time, &self.input, &self.motion, self.rig.head_pose());
        self.apply(effect);
    }

    fn apply(&mut self, effect: Effect) {
        for effect in effect.flatten() {
            info!("Frame {}: effect {:?}", self.frame, effect);
            self.effects_applied += 1;
        }
    }

    fn run_for(&mut self, seconds: f32) {
        let frames = (seconds.max(0.0) / self.dt).ceil() as u64;
        for _ in 0..frames.max(1) {
            self.step();
        }
    }

    fn set_head_pitch(&mut self, pitch: f32) {
        let head = Pose::from_yaw_pitch(vec3(0.0, self.height, 0.0), Deg(0.0), Deg(pitch));
        self.rig.set_head_local_pose(Some(head));
    }

    fn holding_hand(&self) -> Handedness {
        self.sword
            .grab()
            .holding_hand()
            .unwrap_or(Handedness::Right)
    }

    fn run(&mut self, command: &Command) {
        info!("> {:?}", command);
        match command {
            Command::Start => self.start(),
            Command::Detail(group) => {
                let outcome = self.controller.enter_detail(&mut self.rig, *group);
                info!("Detail view: {:?}", outcome);
            }
            Command::Wide(group) => {
                let outcome = self.controller.enter_wide(&mut self.rig, *group);
                info!("Wide view: {:?}", outcome);
            }
            Command::FreeRoam(group) => {
                let outcome = self.controller.enter_free_roam(&mut self.rig, *group);
                info!("Free roam: {:?}", outcome);
            }
            Command::ReturnToMain => {
                let outcome = self.controller.return_to_main(&mut self.rig);
                info!("Return: {:?}", outcome);
            }
            Command::Tick(seconds) => self.run_for(*seconds),
            Command::Look { pitch, seconds } => {
                self.set_head_pitch(*pitch);
                self.run_for(*seconds);
            }
            Command::Move { x, y, seconds } => {
                self.input.left_hand.thumbstick = cgmath::vec2(*x, *y);
                self.run_for(*seconds);
                self.input.left_hand.thumbstick = cgmath::vec2(0.0, 0.0);
            }
            Command::Vertical { up, seconds } => {
                let hand = &mut self.input.left_hand;
                if *up {
                    hand.primary_value = 1.0;
                } else {
                    hand.secondary_value = 1.0;
                }
                self.run_for(*seconds);
                self.input.left_hand.primary_value = 0.0;
                self.input.left_hand.secondary_value = 0.0;
            }
            Command::SnapTurn => {
                self.input.keyboard.press(Key::E);
                self.step();
                self.input.keyboard.release(Key::E);
                self.step();
            }
            Command::Grab(hand) => {
                let name = match hand {
                    Handedness::Left => "LeftHand Controller",
                    Handedness::Right => "RightHand Controller",
                };
                let effect = self.sword.select_begin(&["Direct Interactor", name]);
                self.apply(effect);
            }
            Command::Charge(seconds) => {
                let hand = self.holding_hand();
                self.input.hand_mut(hand).trigger_value = 1.0;
                self.run_for(*seconds);
            }
            Command::Swing(speed) => {
                self.motion = self.sword_motion(*speed);
                self.run_for(0.1);
                self.motion = self.sword_motion(0.0);
            }
            Command::Release => {
                let hand = self.holding_hand();
                self.input.hand_mut(hand).trigger_value = 0.0;
                let effect = self.sword.select_end();
                self.apply(effect);
            }
            Command::Status => self.print_status(),
        }
    }

    /// Sword held in the holding hand, blade moving sideways at `speed`.
    fn sword_motion(&self, speed: f32) -> BodyMotion {
        let hand = self.input.hand(self.holding_hand()).position;
        let hand_world = self.rig.origin_position() + hand;
        let tip = Pose::at(hand_world + vec3(0.0, 0.0, 0.9));
        BodyMotion {
            linear_velocity: Vector3::new(speed, 0.0, 0.0),
            tip: Some(tip),
            ..BodyMotion::at_rest(hand_world + vec3(0.0, 0.0, 0.3))
        }
    }

    fn print_status(&self) {
        let origin = self.rig.origin_position();
        let group = self
            .controller
            .active_group()
            .map(|group| group.name.as_str())
            .unwrap_or("-");
        println!(
            "frame {:>5}  t={:>6.2}s  mode={:<9} group={} ({})  origin=({:.2}, {:.2}, {:.2}) yaw={:.1}  walls={:?}  charged={}  effects={}",
            self.frame,
            self.time.total,
            self.controller.current_mode().to_string(),
            self.controller.active_group_index(),
            group,
            origin.x,
            origin.y,
            origin.z,
            self.rig.origin_yaw().0,
            self.controller.active_wall_groups(),
            self.sword.is_charged(),
            self.effects_applied,
        );
    }
}
