//! Combat module: skill dispatch, Black Flash, damage, deferred follow-ups, projectiles.
//!
//! ECS ответственность:
//! - Fighter state machine (timers, charges, stances, stun)
//! - Skill resolution по capability table (`characters`)
//! - Deferred actions (impacts, residue, sparks) с re-validation на момент срабатывания
//! - Events: SkillResolved, DamageDealt, FighterDied
//!
//! Systems read/write fighters through the `FighterData` query and world-level
//! resources through `CombatCtx`.

use bevy::ecs::query::QueryData;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::components::{
    ComboChain, Cooldowns, CursedEnergy, DomainGauge, Fighter, Health, MoveIntent, PhysicsBody,
    Roster, StateTimers,
};
use crate::config::MatchConfig;
use crate::effects::EffectRegistry;
use crate::frame::{SimClock, SimSet};
use crate::shared::camera::CameraRig;
use crate::DeterministicRng;

pub mod damage;
pub mod deferred;
pub mod projectile;
pub mod skills;
pub mod state_machine;
pub mod timing_window;


// Re-export основных типов
pub use damage::{apply_damage, force_stun, DamageDealt, DamageKind, DamageOutcome, FighterDied};
pub use deferred::{DeferredAction, DeferredQueue};
pub use skills::{RejectReason, SkillInput, SkillOutcome, SkillResolved};
pub use timing_window::{ChainFailure, WindowBounds, WindowJudgement};

/// Combat Plugin
///
/// Порядок внутри кадра задаёт `SimSet`:
/// 1. Input: process_skill_inputs (все режимы, фильтр по FrameMode)
/// 2. Freeze: run_timing_freeze (только TimingFreeze кадры)
/// 3. Deferred: fire_deferred_actions
/// 4. Fighters: update_fighters (таймеры, ce regen, движение, физика)
/// 5. Projectiles: update_projectiles
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SkillInput>()
            .add_event::<SkillResolved>()
            .add_event::<DamageDealt>()
            .add_event::<FighterDied>()
            .init_resource::<DeferredQueue>();

        app.add_systems(Update, skills::process_skill_inputs.in_set(SimSet::Input))
            .add_systems(Update, timing_window::run_timing_freeze.in_set(SimSet::Freeze))
            .add_systems(Update, deferred::fire_deferred_actions.in_set(SimSet::Deferred))
            .add_systems(Update, state_machine::update_fighters.in_set(SimSet::Fighters))
            .add_systems(Update, projectile::update_projectiles.in_set(SimSet::Projectiles));
    }
}

/// Всё мутируемое состояние бойца одним query
#[derive(QueryData)]
#[query_data(mutable)]
pub struct FighterData {
    pub entity: Entity,
    pub fighter: &'static mut Fighter,
    pub health: &'static mut Health,
    pub energy: &'static mut CursedEnergy,
    pub gauge: &'static mut DomainGauge,
    pub cooldowns: &'static mut Cooldowns,
    pub combo: &'static mut ComboChain,
    pub timers: &'static mut StateTimers,
    pub body: &'static mut PhysicsBody,
    pub intent: &'static MoveIntent,
}

impl FighterDataItem<'_> {
    pub fn is_alive(&self) -> bool {
        self.fighter.is_alive()
    }

    /// Point in front of the fighter's fists.
    pub fn strike_origin(&self) -> Vec3 {
        self.body.position + Vec3::new(self.fighter.facing * 40.0, -50.0, 0.0)
    }

    pub fn head(&self) -> Vec3 {
        self.body.position + Vec3::new(0.0, -150.0, 0.0)
    }

    pub fn distance_to(&self, other: &FighterDataItem) -> f32 {
        self.body.position.distance(other.body.position)
    }
}

/// Match-wide resources every combat resolution touches.
#[derive(SystemParam)]
pub struct CombatCtx<'w> {
    pub effects: ResMut<'w, EffectRegistry>,
    pub deferred: ResMut<'w, DeferredQueue>,
    pub camera: ResMut<'w, CameraRig>,
    pub rng: ResMut<'w, DeterministicRng>,
    pub clock: Res<'w, SimClock>,
    pub config: Res<'w, MatchConfig>,
    pub roster: Res<'w, Roster>,
    pub damage_events: EventWriter<'w, DamageDealt>,
    pub death_events: EventWriter<'w, FighterDied>,
}

impl CombatCtx<'_> {
    /// Queue a follow-up `delay` active frames from now.
    pub fn schedule(&mut self, delay: u32, action: DeferredAction) {
        let now = self.clock.active_tick;
        self.deferred.schedule(now, delay, action);
    }

    pub fn text(&mut self, at: Vec3, text: impl Into<String>, color: &'static str) {
        self.effects.spawn_text(at, text, color);
    }

    pub fn burst(&mut self, at: Vec3, color: &'static str, count: u32) {
        let CombatCtx { effects, rng, .. } = self;
        effects.spawn_burst(rng, at, color, count);
    }
}

/// Resolve `caster` and (optionally) `other` together.
///
/// `other` is `None` in the callback when it is missing, equal to `caster`, or not
/// a fighter. Returns `None` when `caster` itself does not resolve.
pub fn with_fighters<R>(
    fighters: &mut Query<FighterData>,
    caster: Entity,
    other: Option<Entity>,
    f: impl FnOnce(&mut FighterDataItem<'_>, Option<&mut FighterDataItem<'_>>) -> R,
) -> Option<R> {
    match other.filter(|other| *other != caster && fighters.contains(*other)) {
        Some(other) => {
            let [mut a, mut b] = fighters.get_many_mut([caster, other]).ok()?;
            Some(f(&mut a, Some(&mut b)))
        }
        None => {
            let mut a = fighters.get_mut(caster).ok()?;
            Some(f(&mut a, None))
        }
    }
}
