//! Render surface: per-frame, depth-ordered list of drawables.
//!
//! Ядро не рисует. `build_render_frame` собирает всё, что нужно внешнему
//! рендереру: backdrop, спроецированные drawables (back-to-front по z),
//! overlay окна Black Flash, flash и banner.

use bevy::prelude::*;

use crate::characters::{CharacterKind, Glow};
use crate::combat::{WindowBounds, WindowJudgement};
use crate::components::{
    Arena, ComboChain, CursedEnergy, Fighter, FighterState, ObstacleKind, PhysicsBody, Side,
};
use crate::config::MatchConfig;
use crate::domain::{CutsceneStage, CutsceneState, DomainState};
use crate::effects::{EffectKind, EffectRegistry, ProjectileKind};
use crate::hud::Banner;
use crate::shared::camera::{CameraRig, ScreenPoint};

/// Фон кадра
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backdrop {
    Arena,
    /// Cutscene backdrop fading in, progress in [0, 1].
    CutsceneFade(f32),
    Void,
    Signature,
    Domain(CharacterKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawableKind {
    Fighter {
        character: CharacterKind,
        side: Side,
        state: FighterState,
        pose: u8,
        facing: f32,
        /// Dead fighters stay in the list with a distinct look.
        fallen: bool,
        glow: Option<Glow>,
    },
    Obstacle {
        kind: ObstacleKind,
        width: f32,
        height: f32,
        depth: f32,
    },
    Projectile(ProjectileKind),
    Particle {
        kind: EffectKind,
        color: &'static str,
        text: Option<String>,
        life: i32,
    },
    Lightning {
        color: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub world: Vec3,
    pub screen: ScreenPoint,
    pub kind: DrawableKind,
}

/// Индикатор окна Black Flash (countdown + success interval)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingOverlay {
    pub fighter: Entity,
    pub timer: u32,
    pub chain: u8,
    pub window: WindowBounds,
    pub in_window: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub backdrop: Backdrop,
    /// Back-to-front (z descending).
    pub drawables: Vec<Drawable>,
    pub timing: Option<TimingOverlay>,
    pub flash: bool,
    pub banner: Option<(String, &'static str)>,
    pub camera: CameraRig,
}

impl RenderFrame {
    pub fn fighters(&self) -> impl Iterator<Item = &Drawable> {
        self.drawables
            .iter()
            .filter(|drawable| matches!(drawable.kind, DrawableKind::Fighter { .. }))
    }
}

type FighterView<'w> = (
    Entity,
    &'w Fighter,
    &'w PhysicsBody,
    &'w CursedEnergy,
    &'w ComboChain,
);

pub fn build_render_frame(world: &mut World) -> RenderFrame {
    let camera = world.resource::<CameraRig>().clone();
    let config = world.resource::<MatchConfig>();
    let viewport = config.viewport;
    let tuning = config.black_flash.clone();
    let cutscene = world.resource::<CutsceneState>().clone();
    let domain = world.resource::<DomainState>().clone();

    let mut fighters = world.query::<FighterView>();
    let fighter_rows: Vec<_> = fighters
        .iter(world)
        .map(|(entity, fighter, body, ce, combo)| (entity, fighter.clone(), body.position, ce.current, *combo))
        .collect();

    let mut drawables = Vec::new();
    let mut push = |world_pos: Vec3, kind: DrawableKind| {
        if let Some(screen) = camera.project(world_pos, viewport) {
            drawables.push(Drawable {
                world: world_pos,
                screen,
                kind,
            });
        }
    };

    for (entity, fighter, position, ce, _) in &fighter_rows {
        if cutscene.active && cutscene.owner != Some(*entity) {
            continue;
        }
        push(
            *position,
            DrawableKind::Fighter {
                character: fighter.character,
                side: fighter.side,
                state: fighter.state,
                pose: fighter.pose,
                facing: fighter.facing,
                fallen: fighter.state.is_dead(),
                glow: fighter.character.draw_profile().glow(fighter.state, *ce),
            },
        );
    }

    let effects = world.resource::<EffectRegistry>();
    for particle in &effects.particles {
        push(
            particle.position,
            DrawableKind::Particle {
                kind: particle.kind,
                color: particle.color,
                text: particle.text.clone(),
                life: particle.life,
            },
        );
    }

    if !cutscene.active {
        for obstacle in &world.resource::<Arena>().obstacles {
            push(
                obstacle.position,
                DrawableKind::Obstacle {
                    kind: obstacle.kind,
                    width: obstacle.width,
                    height: obstacle.height,
                    depth: obstacle.depth,
                },
            );
        }
        for projectile in &effects.projectiles {
            push(projectile.position, DrawableKind::Projectile(projectile.kind));
        }
        for lightning in &effects.lightnings {
            push(
                lightning.position,
                DrawableKind::Lightning {
                    color: lightning.color,
                },
            );
        }
    }

    drawables.sort_by(|a, b| b.world.z.total_cmp(&a.world.z));

    let backdrop = if cutscene.active {
        match cutscene.stage {
            CutsceneStage::Gathering => Backdrop::Arena,
            CutsceneStage::Backdrop => Backdrop::CutsceneFade(cutscene.fade_progress()),
            CutsceneStage::Void => Backdrop::Void,
            CutsceneStage::Signature => Backdrop::Signature,
        }
    } else if let (true, Some(character)) = (domain.active, domain.character) {
        Backdrop::Domain(character)
    } else {
        Backdrop::Arena
    };

    let timing = fighter_rows
        .iter()
        .filter(|(_, fighter, ..)| fighter.state == FighterState::TimingWindow)
        .min_by_key(|(entity, ..)| *entity)
        .map(|(entity, _, _, _, combo)| {
            let window = WindowBounds::for_chain(combo.chain, &tuning);
            TimingOverlay {
                fighter: *entity,
                timer: combo.window_timer,
                chain: combo.chain,
                window,
                in_window: window.judge(combo.window_timer) == WindowJudgement::Hit,
            }
        });

    let banner = world.resource::<Banner>();
    let banner = banner.text.clone().map(|text| (text, banner.color));

    RenderFrame {
        backdrop,
        drawables,
        timing,
        flash: camera.flash_frames > 0,
        banner,
        camera,
    }
}
