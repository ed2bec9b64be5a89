//! Cursed Clash simulation core
//!
//! Headless two-fighter ECS simulation on Bevy 0.16.
//! One `App::update()` = one display frame.
//!
//! Frame pipeline (see `frame::SimSet`):
//! - Clock → mode selection (cutscene / timing freeze / normal)
//! - Input → skill + domain triggers
//! - mode-specific sets (cutscene stage machine, freeze countdown, or the normal pipeline)
//!
//! Renderer and UI are external: they read `render::RenderFrame` and `hud::HudSnapshot`.

use bevy::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod characters;
pub mod combat;
pub mod components;
pub mod config;
pub mod domain;
pub mod effects;
pub mod error;
pub mod frame;
pub mod hud;
pub mod logger;
pub mod map;
pub mod physics;
pub mod render;
pub mod session;
pub mod shared;

// Re-export базовых типов для удобства
pub use ai::{AIConfig, AIPlugin, AIState};
pub use characters::CharacterKind;
pub use combat::{
    CombatPlugin, DamageDealt, DamageKind, FighterDied, SkillInput, SkillOutcome, SkillResolved,
};
pub use components::*;
pub use config::{BlackFlashTuning, CameraTuning, MatchConfig, Viewport};
pub use domain::{CutsceneStage, CutsceneState, DomainPlugin, DomainState};
pub use effects::{EffectKind, EffectRegistry};
pub use error::{ConfigError, HudError};
pub use frame::{FrameMode, SimClock, SimSet};
pub use hud::{HudSnapshot, MatchOutcome};
pub use render::RenderFrame;
pub use session::{FighterView, Match, MatchSnapshot};
pub use shared::camera::{CameraRig, ScreenPoint};

/// Главный plugin симуляции (объединяет все подсистемы и порядок кадра)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MatchConfig>()
            .init_resource::<DeterministicRng>()
            .init_resource::<CameraRig>()
            .init_resource::<frame::FrameMode>()
            .init_resource::<frame::SimClock>()
            .init_resource::<components::Roster>()
            .init_resource::<components::Arena>()
            .init_resource::<map::MapSource>()
            .init_resource::<EffectRegistry>()
            .init_resource::<hud::Banner>()
            .init_resource::<hud::HudSnapshot>()
            .init_resource::<hud::HudBridge>()
            .init_resource::<hud::MatchOutcome>();

        frame::configure_frame_sets(app);

        app.add_plugins((CombatPlugin, DomainPlugin, AIPlugin))
            .add_systems(Update, frame::select_frame_mode.in_set(SimSet::Clock))
            .add_systems(Update, shared::camera::update_camera.in_set(SimSet::Camera))
            .add_systems(
                Update,
                (effects::age_effects, effects::prune_effects)
                    .chain()
                    .in_set(SimSet::Effects),
            )
            .add_systems(
                Update,
                (
                    hud::tick_banner,
                    hud::track_outcome,
                    hud::refresh_hud,
                )
                    .chain()
                    .in_set(SimSet::Hud),
            );
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Every random decision in a match (trigger rolls, shake jitter, map layout,
/// particle scatter, AI choices) draws from this stream.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Uniform roll in [0, 100).
    pub fn percent(&mut self) -> f32 {
        self.rng.gen::<f32>() * 100.0
    }

    /// Uniform value in [-0.5, 0.5) scaled by `magnitude`.
    pub fn jitter(&mut self, magnitude: f32) -> f32 {
        (self.rng.gen::<f32>() - 0.5) * magnitude
    }

    /// Bernoulli trial with probability `p` in [0, 1].
    pub fn chance(&mut self, p: f32) -> bool {
        self.rng.gen::<f32>() < p
    }
}

impl FromWorld for DeterministicRng {
    fn from_world(world: &mut World) -> Self {
        let seed = world
            .get_resource::<MatchConfig>()
            .map(|config| config.seed)
            .unwrap_or_default();
        Self::new(seed)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed));

    app
}
