use crate::pose::Pose;

/// Side effects requested by gameplay code and applied by the host (particles, audio,
/// lights). Returning them as values keeps the gameplay logic free of engine handles.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    NoEffect,
    Multiple(Vec<Effect>),
    /// Toggle the gadget's tip light and glow particles.
    SetGlow { on: bool },
    /// Instantiate a VFX prefab and destroy it after `lifetime` seconds.
    SpawnVfx {
        prefab: String,
        pose: Pose,
        lifetime: f32,
        follow_player: bool,
    },
    /// Play an attached particle system, optionally rescaled.
    PlayParticles { name: String, scale: f32 },
    PlaySound { clip: String },
}

impl Effect {
    pub fn combine(effects: Vec<Effect>) -> Effect {
        let mut effects: Vec<Effect> = effects
            .into_iter()
            .filter(|effect| !matches!(effect, Effect::NoEffect))
            .collect();
        match effects.len() {
            0 => Effect::NoEffect,
            1 => effects.remove(0),
            _ => Effect::Multiple(effects),
        }
    }

    /// Depth-first list of the concrete effects, without `NoEffect` or nesting.
    pub fn flatten(self) -> Vec<Effect> {
        match self {
            Effect::NoEffect => Vec::new(),
            Effect::Multiple(effects) => effects.into_iter().flat_map(Effect::flatten).collect(),
            effect => vec![effect],
        }
    }
}
