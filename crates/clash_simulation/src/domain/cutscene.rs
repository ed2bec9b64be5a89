//! Staged cinematic that precedes the Cinematic-style domain (Gojo).
//!
//! Stage по таймеру:
//! - 0..30 Gathering (камера на владельце)
//! - 30..60 Backdrop (фон затемняется)
//! - 60..90 Void (бесконечная пустота)
//! - 90..100 Signature (full-screen sequence)
//!
//! На кадре 100 катсцена выключается и стартует обычный домен владельца.

use bevy::prelude::*;

use super::{begin_domain, DomainCtx};
use crate::combat::{CombatCtx, FighterData};
use crate::logger;

pub const BACKDROP_FRAME: u32 = 30;
pub const VOID_FRAME: u32 = 60;
pub const SIGNATURE_FRAME: u32 = 90;
pub const HANDOFF_FRAME: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutsceneStage {
    #[default]
    Gathering,
    Backdrop,
    Void,
    Signature,
}

impl CutsceneStage {
    pub fn for_timer(timer: u32) -> Self {
        match timer {
            t if t < BACKDROP_FRAME => CutsceneStage::Gathering,
            t if t < VOID_FRAME => CutsceneStage::Backdrop,
            t if t < SIGNATURE_FRAME => CutsceneStage::Void,
            _ => CutsceneStage::Signature,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            CutsceneStage::Gathering => 0,
            CutsceneStage::Backdrop => 1,
            CutsceneStage::Void => 2,
            CutsceneStage::Signature => 3,
        }
    }
}

/// Singleton катсцены (never active together with `DomainState`)
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct CutsceneState {
    pub active: bool,
    pub owner: Option<Entity>,
    pub stage: CutsceneStage,
    pub timer: u32,
}

impl CutsceneState {
    pub fn start(&mut self, owner: Entity) {
        self.active = true;
        self.owner = Some(owner);
        self.stage = CutsceneStage::Gathering;
        self.timer = 0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Backdrop fade progress in [0, 1] during the Backdrop stage.
    pub fn fade_progress(&self) -> f32 {
        let into = self.timer.saturating_sub(BACKDROP_FRAME) as f32;
        (into / (VOID_FRAME - BACKDROP_FRAME) as f32).clamp(0.0, 1.0)
    }
}

/// System: stage machine катсцены (только Cutscene кадры)
pub fn run_cutscene(fighters: Query<FighterData>, mut ctx: CombatCtx, mut dctx: DomainCtx) {
    if !dctx.cutscene.active {
        return;
    }
    let Some(owner) = dctx.cutscene.owner else {
        dctx.cutscene.reset();
        return;
    };
    let owner_state = fighters
        .get(owner)
        .ok()
        .filter(|item| item.fighter.is_alive())
        .map(|item| (item.body.position, item.fighter.character));
    let Some((position, character)) = owner_state else {
        logger::log_warning("cutscene owner lost, aborting expansion");
        dctx.cutscene.reset();
        return;
    };

    dctx.cutscene.timer += 1;
    let timer = dctx.cutscene.timer;
    let previous = dctx.cutscene.stage;
    dctx.cutscene.stage = CutsceneStage::for_timer(timer);

    let cinematic_fov = ctx.config.camera.cinematic_fov;
    ctx.camera.lock_on(position);
    ctx.camera.ease_fov(cinematic_fov, 0.05);

    if dctx.cutscene.stage != previous {
        match dctx.cutscene.stage {
            CutsceneStage::Void => ctx.camera.flash(4),
            CutsceneStage::Signature => {
                let name = character.domain().name.to_uppercase();
                ctx.text(position + Vec3::new(0.0, -200.0, 0.0), name, "#ffffff");
                ctx.camera.kick(15.0);
            }
            _ => {}
        }
    }

    if timer >= HANDOFF_FRAME {
        // катсцена выключается ДО старта домена
        dctx.cutscene.reset();
        begin_domain(&mut ctx, &mut dctx, owner, character);
    }
}
