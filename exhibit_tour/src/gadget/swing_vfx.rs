use cgmath::vec3;
use serde::{Deserialize, Serialize};

use crate::{
    effect::Effect,
    math::{FORWARD, lerp, yaw_only_rotation},
    pose::Pose,
};

use super::{SwingEvent, SwingListener};

/// Timing of one particle system inside a VFX prefab.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleTiming {
    pub duration: f32,
    /// Longest start lifetime a particle can be given.
    pub start_lifetime_max: f32,
    #[serde(default)]
    pub looping: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VfxPrefab {
    pub name: String,
    #[serde(default)]
    pub systems: Vec<ParticleTiming>,
}

impl VfxPrefab {
    pub fn new(name: &str, systems: Vec<ParticleTiming>) -> VfxPrefab {
        VfxPrefab {
            name: name.to_string(),
            systems,
        }
    }

    /// How long the spawned instance should live. Looping or empty prefabs use `fallback`.
    pub fn estimate_lifetime(&self, fallback: f32) -> f32 {
        if self.systems.is_empty() || self.systems.iter().any(|s| s.looping) {
            return fallback;
        }
        let longest = self
            .systems
            .iter()
            .map(|s| s.duration + s.start_lifetime_max)
            .fold(0.0, f32::max);
        (longest + 0.1).max(0.1)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingVfxConfig {
    pub charged_follow_player: bool,
    pub charged_yaw_only: bool,
    pub charged_offset: [f32; 3],
    pub fallback_lifetime: f32,
}

impl Default for SwingVfxConfig {
    fn default() -> Self {
        SwingVfxConfig {
            charged_follow_player: false,
            charged_yaw_only: true,
            charged_offset: [0.0, 0.0, 0.6],
            fallback_lifetime: 2.0,
        }
    }
}

/// Spawns a slash at the blade tip, or a big one in front of the player when charged.
pub struct SwingVfxSpawner {
    pub config: SwingVfxConfig,
    pub normal: Option<VfxPrefab>,
    pub charged: Option<VfxPrefab>,
}

impl SwingVfxSpawner {
    pub fn new(
        config: SwingVfxConfig,
        normal: Option<VfxPrefab>,
        charged: Option<VfxPrefab>,
    ) -> SwingVfxSpawner {
        SwingVfxSpawner {
            config,
            normal,
            charged,
        }
    }

    fn spawn(&self, prefab: &VfxPrefab, pose: Pose, follow_player: bool) -> Effect {
        Effect::SpawnVfx {
            prefab: prefab.name.clone(),
            pose,
            lifetime: prefab.estimate_lifetime(self.config.fallback_lifetime),
            follow_player,
        }
    }

    fn charged_pose(&self, player: &Pose) -> Pose {
        let [x, y, z] = self.config.charged_offset;
        let position = player.transform_point(vec3(x, y, z));
        let rotation = if self.config.charged_yaw_only {
            yaw_only_rotation(player.forward())
                .or_else(|| yaw_only_rotation(FORWARD))
                .unwrap_or(player.rotation)
        } else {
            player.rotation
        };
        Pose::new(position, rotation)
    }
}

impl SwingListener for SwingVfxSpawner {
    fn on_swing(&mut self, event: &SwingEvent) -> Effect {
        if !event.charged {
            return match &self.normal {
                Some(prefab) => self.spawn(prefab, event.tip_pose, false),
                None => Effect::NoEffect,
            };
        }

        let Some(prefab) = &self.charged else {
            return Effect::NoEffect;
        };
        let Some(player) = &event.player_pose else {
            engine::gadget_log!(WARN, "charged swing without a player pose, skipping vfx");
            return Effect::NoEffect;
        };
        self.spawn(
            prefab,
            self.charged_pose(player),
            self.config.charged_follow_player,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingVfxTriggerConfig {
    pub scale_with_speed: bool,
    pub max_speed_for_scale: f32,
    pub min_particle_scale: f32,
    pub max_particle_scale: f32,
}

impl Default for SwingVfxTriggerConfig {
    fn default() -> Self {
        SwingVfxTriggerConfig {
            scale_with_speed: false,
            max_speed_for_scale: 8.0,
            min_particle_scale: 0.8,
            max_particle_scale: 1.5,
        }
    }
}

/// Plays an attached particle burst and a one-shot sound on every swing.
pub struct SwingVfxTrigger {
    pub config: SwingVfxTriggerConfig,
    pub particle: Option<String>,
    pub sound: Option<String>,
}

impl SwingVfxTrigger {
    pub fn new(
        config: SwingVfxTriggerConfig,
        particle: Option<String>,
        sound: Option<String>,
    ) -> SwingVfxTrigger {
        SwingVfxTrigger {
            config,
            particle,
            sound,
        }
    }

    pub fn particle_scale(&self, speed: f32) -> f32 {
        if !self.config.scale_with_speed {
            return 1.0;
        }
        let t = speed / self.config.max_speed_for_scale.max(0.001);
        lerp(
            self.config.min_particle_scale,
            self.config.max_particle_scale,
            t,
        )
    }
}

impl SwingListener for SwingVfxTrigger {
    fn on_swing(&mut self, event: &SwingEvent) -> Effect {
        let particles = self.particle.as_ref().map(|name| Effect::PlayParticles {
            name: name.clone(),
            scale: self.particle_scale(event.speed),
        });
        let sound = self
            .sound
            .as_ref()
            .map(|clip| Effect::PlaySound { clip: clip.clone() });
        Effect::combine(particles.into_iter().chain(sound).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, InnerSpace};

    fn burst(duration: f32, lifetime: f32) -> ParticleTiming {
        ParticleTiming {
            duration,
            start_lifetime_max: lifetime,
            looping: false,
        }
    }

    fn event(charged: bool, player_pose: Option<Pose>) -> SwingEvent {
        SwingEvent {
            speed: 4.0,
            charged,
            tip_pose: Pose::at(vec3(0.0, 1.2, 0.8)),
            player_pose,
        }
    }

    #[test]
    fn test_lifetime_estimate() {
        let prefab = VfxPrefab::new("slash", vec![burst(0.5, 0.3), burst(1.0, 0.4)]);
        assert!((prefab.estimate_lifetime(2.0) - 1.5).abs() < 1e-5);

        let mut looping = prefab.clone();
        looping.systems[0].looping = true;
        assert_eq!(looping.estimate_lifetime(2.0), 2.0);
        assert_eq!(VfxPrefab::new("empty", vec![]).estimate_lifetime(2.0), 2.0);
        assert_eq!(
            VfxPrefab::new("instant", vec![burst(0.0, 0.0)]).estimate_lifetime(2.0),
            0.1
        );
    }

    #[test]
    fn test_uncharged_spawns_at_tip() {
        let mut spawner = SwingVfxSpawner::new(
            SwingVfxConfig::default(),
            Some(VfxPrefab::new("slash", vec![burst(0.5, 0.5)])),
            None,
        );
        match spawner.on_swing(&event(false, None)) {
            Effect::SpawnVfx {
                prefab,
                pose,
                follow_player,
                ..
            } => {
                assert_eq!(prefab, "slash");
                assert_eq!(pose, Pose::at(vec3(0.0, 1.2, 0.8)));
                assert!(!follow_player);
            }
            other => panic!("unexpected {:?}", other),
        }
        // no charged prefab configured
        assert_eq!(spawner.on_swing(&event(true, Some(Pose::identity()))), Effect::NoEffect);
    }

    #[test]
    fn test_charged_spawns_in_front_of_player_flat() {
        let config = SwingVfxConfig {
            charged_follow_player: true,
            ..SwingVfxConfig::default()
        };
        let mut spawner = SwingVfxSpawner::new(config, None, Some(VfxPrefab::new("wave", vec![])));
        let player = Pose::from_yaw_pitch(vec3(0.0, 1.6, 0.0), Deg(90.0), Deg(-30.0));

        match spawner.on_swing(&event(true, Some(player))) {
            Effect::SpawnVfx {
                prefab,
                pose,
                lifetime,
                follow_player,
            } => {
                assert_eq!(prefab, "wave");
                assert_eq!(lifetime, 2.0);
                assert!(follow_player);
                let expected = player.transform_point(vec3(0.0, 0.0, 0.6));
                assert!((pose.position - expected).magnitude() < 1e-5);
                let forward = pose.forward();
                assert!(forward.y.abs() < 1e-5);
                assert!((forward.x - 1.0).abs() < 1e-4);
            }
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(spawner.on_swing(&event(true, None)), Effect::NoEffect);
    }

    #[test]
    fn test_trigger_scales_with_speed() {
        let config = SwingVfxTriggerConfig {
            scale_with_speed: true,
            ..SwingVfxTriggerConfig::default()
        };
        let mut trigger = SwingVfxTrigger::new(
            config,
            Some("sparks".to_string()),
            Some("whoosh".to_string()),
        );
        assert!((trigger.particle_scale(0.0) - 0.8).abs() < 1e-6);
        assert!((trigger.particle_scale(4.0) - 1.15).abs() < 1e-5);
        assert!((trigger.particle_scale(20.0) - 1.5).abs() < 1e-6);

        let effects = trigger.on_swing(&event(false, None)).flatten();
        assert_eq!(effects.len(), 2);
        assert_eq!(
            effects[1],
            Effect::PlaySound {
                clip: "whoosh".to_string()
            }
        );
    }

    #[test]
    fn test_trigger_without_assets_is_silent() {
        let mut trigger = SwingVfxTrigger::new(SwingVfxTriggerConfig::default(), None, None);
        assert_eq!(trigger.on_swing(&event(false, None)), Effect::NoEffect);
        assert_eq!(trigger.particle_scale(8.0), 1.0);
    }
}
