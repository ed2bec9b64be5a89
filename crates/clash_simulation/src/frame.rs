//! Frame loop: mode arbitration + system set ordering.
//!
//! Каждый кадр ровно один режим владеет симуляцией:
//! 1. `Cutscene`: stage machine катсцены, эффекты стареют, физика стоит
//! 2. `TimingFreeze`: отсчёт окна Black Flash, всё остальное заморожено
//! 3. `Normal`: камера, deferred actions, домен, AI, бойцы, снаряды, эффекты, HUD
//!
//! Mode is chosen once in `SimSet::Clock`; mid-frame transitions take effect next frame.

use bevy::prelude::*;

use crate::components::{Fighter, FighterState};
use crate::domain::CutsceneState;

/// Режим текущего кадра
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameMode {
    #[default]
    Normal,
    Cutscene,
    /// Fighter whose timing window owns the frame.
    TimingFreeze(Entity),
}

/// Frame counters.
///
/// `tick` counts every frame. `active_tick` counts only `Normal` frames and is the
/// clock deferred actions are keyed on, so follow-ups pause during freezes and cutscenes.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimClock {
    pub tick: u64,
    pub active_tick: u64,
}

/// Порядок систем внутри кадра (chained)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Clock,
    Input,
    Cutscene,
    Freeze,
    Camera,
    Deferred,
    Domain,
    Ai,
    Fighters,
    Projectiles,
    Effects,
    Hud,
}

pub fn configure_frame_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            SimSet::Clock,
            SimSet::Input,
            SimSet::Cutscene.run_if(in_cutscene),
            SimSet::Freeze.run_if(in_timing_freeze),
            SimSet::Camera.run_if(in_normal_play),
            SimSet::Deferred.run_if(in_normal_play),
            SimSet::Domain.run_if(in_normal_play),
            SimSet::Ai.run_if(in_normal_play),
            SimSet::Fighters.run_if(in_normal_play),
            SimSet::Projectiles.run_if(in_normal_play),
            SimSet::Effects.run_if(not(in_timing_freeze)),
            SimSet::Hud,
        )
            .chain(),
    );
}

pub fn in_cutscene(mode: Res<FrameMode>) -> bool {
    *mode == FrameMode::Cutscene
}

pub fn in_timing_freeze(mode: Res<FrameMode>) -> bool {
    matches!(*mode, FrameMode::TimingFreeze(_))
}

pub fn in_normal_play(mode: Res<FrameMode>) -> bool {
    *mode == FrameMode::Normal
}

/// Выбор режима кадра (priority: cutscene > timing freeze > normal)
pub fn select_frame_mode(
    cutscene: Res<CutsceneState>,
    fighters: Query<(Entity, &Fighter)>,
    mut mode: ResMut<FrameMode>,
    mut clock: ResMut<SimClock>,
) {
    let next = if cutscene.active {
        FrameMode::Cutscene
    } else if let Some((entity, _)) = fighters
        .iter()
        .filter(|(_, fighter)| fighter.state == FighterState::TimingWindow)
        .min_by_key(|(entity, _)| *entity)
    {
        FrameMode::TimingFreeze(entity)
    } else {
        FrameMode::Normal
    };

    *mode = next;
    clock.tick += 1;
    if next == FrameMode::Normal {
        clock.active_tick += 1;
    }
}
