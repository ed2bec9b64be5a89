//! Fighter components: identity, state, resources, cooldowns, combo chain.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::characters::CharacterKind;

/// Сторона бойца (ровно два на матч)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    P1,
    P2,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::P1 => 0,
            Side::P2 => 1,
        }
    }
}

/// Дискретное состояние бойца
///
/// `Dead` терминальное: из него нет переходов.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FighterState {
    #[default]
    Idle,
    Run,
    Attack,
    /// Timed wind-up before a projectile release.
    Charging,
    CounterStance,
    Stun,
    /// Black Flash preparation; freezes the rest of the world.
    TimingWindow,
    Dead,
}

impl FighterState {
    /// Skill/movement input is only taken from neutral states.
    pub fn accepts_input(self) -> bool {
        matches!(self, FighterState::Idle | FighterState::Run)
    }

    pub fn is_dead(self) -> bool {
        self == FighterState::Dead
    }
}

/// Боец
#[derive(Component, Debug, Clone)]
pub struct Fighter {
    pub character: CharacterKind,
    pub side: Side,
    pub is_player: bool,
    pub state: FighterState,
    /// +1 смотрит вправо, -1 влево
    pub facing: f32,
    /// Render-only pose index (chain position for Yuji); never read by transitions.
    pub pose: u8,
}

impl Fighter {
    pub fn new(character: CharacterKind, side: Side, is_player: bool) -> Self {
        Self {
            character,
            side,
            is_player,
            state: FighterState::Idle,
            facing: if side == Side::P1 { 1.0 } else { -1.0 },
            pose: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.state.is_dead()
    }
}

/// Здоровье бойца
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.max);
    }
}

/// Cursed energy (ce) для техник
///
/// Инвариант: 0.0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CursedEnergy {
    pub current: f32,
    pub max: f32,
    /// Units per frame.
    pub regen_rate: f32,
}

impl Default for CursedEnergy {
    fn default() -> Self {
        Self::new(1000.0, 0.5)
    }
}

impl CursedEnergy {
    pub fn new(max: f32, regen_rate: f32) -> Self {
        Self {
            current: max,
            max,
            regen_rate,
        }
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    /// Списывает cost (returns false и ничего не меняет если не хватает)
    pub fn consume(&mut self, cost: f32) -> bool {
        if self.can_afford(cost) {
            self.current -= cost;
            true
        } else {
            false
        }
    }

    pub fn regenerate(&mut self) {
        self.current = (self.current + self.regen_rate).min(self.max);
    }
}

/// Domain gauge, fills from dealt damage; saturated at 100.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct DomainGauge {
    pub value: f32,
}

impl DomainGauge {
    pub const MAX: f32 = 100.0;

    pub fn gain(&mut self, amount: f32) {
        self.value = (self.value + amount.max(0.0)).min(Self::MAX);
    }

    pub fn is_saturated(&self) -> bool {
        self.value >= Self::MAX
    }

    pub fn drain(&mut self) {
        self.value = 0.0;
    }
}

/// Слот техники (клавиши 1-4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillSlot {
    Primary,
    Secondary,
    Ultimate,
    Stance,
}

impl SkillSlot {
    pub const ALL: [SkillSlot; 4] = [
        SkillSlot::Primary,
        SkillSlot::Secondary,
        SkillSlot::Ultimate,
        SkillSlot::Stance,
    ];

    /// 1-based slot number from input; anything else is not a slot.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(SkillSlot::Primary),
            2 => Some(SkillSlot::Secondary),
            3 => Some(SkillSlot::Ultimate),
            4 => Some(SkillSlot::Stance),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            SkillSlot::Primary => 0,
            SkillSlot::Secondary => 1,
            SkillSlot::Ultimate => 2,
            SkillSlot::Stance => 3,
        }
    }
}

/// Per-slot cooldowns in frames.
///
/// Invariant: only `set` raises a value; `tick` never goes below zero.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cooldowns {
    pub slots: [u32; 4],
}

impl Cooldowns {
    pub fn tick(&mut self) {
        for remaining in &mut self.slots {
            *remaining = remaining.saturating_sub(1);
        }
    }

    pub fn is_ready(&self, slot: SkillSlot) -> bool {
        self.slots[slot.index()] == 0
    }

    pub fn remaining(&self, slot: SkillSlot) -> u32 {
        self.slots[slot.index()]
    }

    pub fn set(&mut self, slot: SkillSlot, frames: u32) {
        self.slots[slot.index()] = frames;
    }
}

/// Black Flash combo state
///
/// Инварианты: 0 ≤ chain ≤ 4, 0 ≤ trigger_chance ≤ 100
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct ComboChain {
    pub chain: u8,
    /// Trigger probability, percent.
    pub trigger_chance: f32,
    /// Countdown inside the timing window.
    pub window_timer: u32,
}

impl ComboChain {
    pub const FINISHER: u8 = 4;

    /// Chain already running: the next trigger skips the roll.
    pub fn in_progress(&self) -> bool {
        (1..Self::FINISHER).contains(&self.chain)
    }

    pub fn advance(&mut self) -> u8 {
        self.chain = (self.chain + 1).min(Self::FINISHER);
        self.chain
    }

    pub fn build_momentum(&mut self, step: f32, cap: f32) {
        self.trigger_chance = (self.trigger_chance + step).min(cap);
    }

    pub fn reset(&mut self) {
        self.chain = 0;
        self.trigger_chance = 0.0;
        self.window_timer = 0;
    }
}

/// Internal per-state timers.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct StateTimers {
    pub attack: u32,
    /// Counts up while `Charging`.
    pub charge: u32,
    pub stance: u32,
    pub stun: u32,
    pub charging_slot: Option<SkillSlot>,
    pub stance_slot: Option<SkillSlot>,
}

impl StateTimers {
    pub fn clear_techniques(&mut self) {
        self.charge = 0;
        self.stance = 0;
        self.charging_slot = None;
        self.stance_slot = None;
    }
}

/// Entity ids бойцов матча (weak refs, never owning)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roster {
    pub p1: Entity,
    pub p2: Entity,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            p1: Entity::PLACEHOLDER,
            p2: Entity::PLACEHOLDER,
        }
    }
}

impl Roster {
    pub fn get(&self, side: Side) -> Entity {
        match side {
            Side::P1 => self.p1,
            Side::P2 => self.p2,
        }
    }

    pub fn opponent_of(&self, entity: Entity) -> Option<Entity> {
        if entity == self.p1 {
            Some(self.p2)
        } else if entity == self.p2 {
            Some(self.p1)
        } else {
            None
        }
    }
}
