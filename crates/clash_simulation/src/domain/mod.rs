//! Domain expansion orchestrator
//!
//! Один домен на матч за раз. Вход: gauge = 100, ни домена, ни катсцены.
//! - ReshapeArena (Yuji): snapshot арены → новые препятствия → restore при выходе
//! - Cinematic (Gojo): сначала катсцена (см. `cutscene`), затем обычный домен
//! - Standard (Sukuna): сразу домен
//!
//! Periodic tick (frame-counted, каждые `domain_tick_interval` активных кадров) бьёт
//! оппонента пока `active`. Выход (request / duration / owner down) сразу делает cleanup;
//! после выхода tick не срабатывает.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::characters::{ArenaStyle, CharacterKind, DomainTick};
use crate::combat::{apply_damage, force_stun, with_fighters, CombatCtx, DamageKind, FighterData};
use crate::components::{Arena, FighterState};
use crate::effects::EffectKind;
use crate::frame::{FrameMode, SimSet};
use crate::hud::Banner;
use crate::logger;
use crate::map::MapSource;

pub mod cutscene;

pub use cutscene::{CutsceneStage, CutsceneState};

/// Banner duration on expansion.
pub const BANNER_FRAMES: u32 = 150;

/// Singleton домена
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct DomainState {
    pub active: bool,
    /// Weak reference; may point at a despawned entity.
    pub owner: Option<Entity>,
    /// Character of the owner, kept for cleanup after the owner is gone.
    pub character: Option<CharacterKind>,
    /// Active frames since the domain began.
    pub timer: u32,
}

/// Event: "expand domain" trigger
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainExpandInput {
    pub fighter: Entity,
}

/// Event: manual end of the active domain (or abort of a running cutscene).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EndDomainRequest;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainStarted {
    pub owner: Entity,
    pub character: CharacterKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainEndReason {
    Requested,
    Expired,
    OwnerDown,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainEnded {
    pub owner: Option<Entity>,
    pub reason: DomainEndReason,
}

/// Domain-side resources (disjoint from `CombatCtx`).
#[derive(SystemParam)]
pub struct DomainCtx<'w> {
    pub domain: ResMut<'w, DomainState>,
    pub cutscene: ResMut<'w, CutsceneState>,
    pub arena: ResMut<'w, Arena>,
    pub map: Res<'w, MapSource>,
    pub banner: ResMut<'w, Banner>,
    pub started: EventWriter<'w, DomainStarted>,
    pub ended: EventWriter<'w, DomainEnded>,
}

/// Domain Plugin
///
/// - Input: process_domain_inputs (после skill inputs)
/// - Cutscene: run_cutscene
/// - Domain: domain_tick
pub struct DomainPlugin;

impl Plugin for DomainPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DomainExpandInput>()
            .add_event::<EndDomainRequest>()
            .add_event::<DomainStarted>()
            .add_event::<DomainEnded>()
            .init_resource::<DomainState>()
            .init_resource::<CutsceneState>();

        app.add_systems(
            Update,
            process_domain_inputs
                .in_set(SimSet::Input)
                .after(crate::combat::skills::process_skill_inputs),
        )
        .add_systems(Update, cutscene::run_cutscene.in_set(SimSet::Cutscene))
        .add_systems(Update, domain_tick.in_set(SimSet::Domain));
    }
}

/// System: expand / end triggers
pub fn process_domain_inputs(
    mut expand: EventReader<DomainExpandInput>,
    mut end: EventReader<EndDomainRequest>,
    mode: Res<FrameMode>,
    mut fighters: Query<FighterData>,
    mut ctx: CombatCtx,
    mut dctx: DomainCtx,
) {
    if end.read().count() > 0 {
        if dctx.domain.active {
            end_domain(&mut fighters, &mut ctx, &mut dctx, DomainEndReason::Requested);
        } else if dctx.cutscene.active {
            logger::log_info("cutscene aborted by request");
            dctx.cutscene.reset();
        }
    }

    for input in expand.read() {
        if *mode != FrameMode::Normal {
            continue;
        }
        if dctx.domain.active || dctx.cutscene.active {
            continue;
        }
        let Ok(mut caster) = fighters.get_mut(input.fighter) else {
            continue;
        };
        if !caster.is_alive() || !caster.gauge.is_saturated() {
            continue;
        }

        caster.gauge.drain();
        let character = caster.fighter.character;
        let head = caster.head();
        let aura = character.draw_profile().aura;
        ctx.text(head, "DOMAIN EXPANSION", aura);

        if character.domain().style == ArenaStyle::Cinematic {
            dctx.cutscene.start(input.fighter);
            logger::log_info(&format!("{} begins a cinematic expansion", character.display_name()));
        } else {
            begin_domain(&mut ctx, &mut dctx, input.fighter, character);
        }
    }
}

/// Activate the domain for `owner`. Caller guarantees no domain/cutscene is active.
pub fn begin_domain(ctx: &mut CombatCtx, dctx: &mut DomainCtx, owner: Entity, character: CharacterKind) {
    let profile = character.domain();
    dctx.domain.active = true;
    dctx.domain.owner = Some(owner);
    dctx.domain.character = Some(character);
    dctx.domain.timer = 0;

    dctx.banner.show(profile.name.to_uppercase(), profile.color, BANNER_FRAMES);
    ctx.camera.kick(20.0);

    if profile.style == ArenaStyle::ReshapeArena {
        let DomainCtx { arena, map, .. } = &mut *dctx;
        if let Some(layout) = map.0.domain_layout(character, &arena.obstacles, &mut ctx.rng) {
            arena.replace(layout);
        }
    }

    dctx.started.write(DomainStarted { owner, character });
    logger::log_info(&format!("{} expands: {}", character.display_name(), profile.name));
}

/// Deactivate and clean up immediately (restore arena, release held stun).
pub fn end_domain(
    fighters: &mut Query<FighterData>,
    ctx: &mut CombatCtx,
    dctx: &mut DomainCtx,
    reason: DomainEndReason,
) {
    if !dctx.domain.active {
        return;
    }
    let owner = dctx.domain.owner;
    let character = dctx.domain.character;
    *dctx.domain = DomainState::default();

    dctx.arena.restore();

    let holds_opponent = character
        .map(|kind| matches!(kind.domain().tick, DomainTick::Incapacitate { .. }))
        .unwrap_or(false);
    if holds_opponent {
        if let Some(opponent) = owner.and_then(|owner| ctx.roster.opponent_of(owner)) {
            if let Ok(mut victim) = fighters.get_mut(opponent) {
                if victim.fighter.state == FighterState::Stun {
                    victim.fighter.state = FighterState::Idle;
                    victim.timers.stun = 0;
                }
            }
        }
    }

    dctx.ended.write(DomainEnded { owner, reason });
    logger::log_info(&format!("domain ended: {:?}", reason));
}

/// System: domain lifetime + periodic tick (normal frames only)
pub fn domain_tick(mut fighters: Query<FighterData>, mut ctx: CombatCtx, mut dctx: DomainCtx) {
    if !dctx.domain.active {
        return;
    }
    let owner = dctx.domain.owner;
    let owner_alive = owner
        .and_then(|owner| fighters.get(owner).ok())
        .is_some_and(|item| item.fighter.is_alive());
    let (Some(owner), Some(character), true) = (owner, dctx.domain.character, owner_alive) else {
        end_domain(&mut fighters, &mut ctx, &mut dctx, DomainEndReason::OwnerDown);
        return;
    };

    dctx.domain.timer += 1;
    if let Some(duration) = ctx.config.domain_duration {
        if dctx.domain.timer >= duration {
            end_domain(&mut fighters, &mut ctx, &mut dctx, DomainEndReason::Expired);
            return;
        }
    }

    let interval = ctx.config.domain_tick_interval.max(1);
    if dctx.domain.timer % interval != 0 {
        return;
    }

    let Some(opponent) = ctx.roster.opponent_of(owner) else {
        return;
    };
    let profile = character.domain();
    with_fighters(&mut fighters, opponent, Some(owner), |victim, source| {
        if !victim.is_alive() {
            return;
        }
        let at = victim.body.position;
        match profile.tick {
            DomainTick::SlashChip { damage } => {
                for _ in 0..2 {
                    let scatter = Vec3::new(ctx.rng.jitter(100.0), ctx.rng.jitter(100.0) - 80.0, 0.0);
                    let CombatCtx { effects, rng, .. } = &mut ctx;
                    effects.spawn_particle(rng, at + scatter, EffectKind::SlashBw, "#ffffff");
                }
                apply_damage(&mut ctx, victim, source, damage, DamageKind::Domain);
                ctx.camera.kick(2.0);
            }
            DomainTick::Incapacitate { damage, info_chance } => {
                apply_damage(&mut ctx, victim, source, damage, DamageKind::Domain);
                force_stun(victim, interval + 1);
                if ctx.rng.chance(info_chance) {
                    ctx.text(at + Vec3::new(0.0, -100.0, 0.0), "...INFO...", "#ffffff");
                }
            }
            DomainTick::Burst { damage } => {
                apply_damage(&mut ctx, victim, source, damage, DamageKind::Domain);
                ctx.burst(at + Vec3::new(0.0, -80.0, 0.0), profile.color, 5);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_state_default_inactive() {
        let state = DomainState::default();
        assert!(!state.active);
        assert_eq!(state.owner, None);
        assert_eq!(state.timer, 0);
    }
}
