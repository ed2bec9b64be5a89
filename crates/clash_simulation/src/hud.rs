//! HUD bridge: per-frame snapshot for the UI collaborator.
//!
//! UI читает `HudSnapshot` (ресурсы бойцов, mode flags, banner) и/или получает
//! записи через `HudSink`. Отсутствующий элемент UI → запись пропускается,
//! симуляция продолжается.

use bevy::prelude::*;

use crate::characters::{CharacterKind, SkillEffect};
use crate::combat::FighterDied;
use crate::components::{
    ComboChain, Cooldowns, CursedEnergy, DomainGauge, Fighter, FighterState, Health, Side, SkillSlot,
};
use crate::domain::{CutsceneState, DomainState};
use crate::error::HudError;
use crate::frame::{FrameMode, SimClock};
use crate::logger;

/// Announcement banner (domain name in the owner's aura colour).
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Banner {
    pub text: Option<String>,
    pub color: &'static str,
    pub frames_left: u32,
}

impl Banner {
    pub fn show(&mut self, text: impl Into<String>, color: &'static str, frames: u32) {
        self.text = Some(text.into());
        self.color = color;
        self.frames_left = frames;
    }

    pub fn is_visible(&self) -> bool {
        self.text.is_some()
    }
}

/// Addressable UI indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HudElement {
    HealthBar(Side),
    CeBar(Side),
    Cooldown(Side, SkillSlot),
    DomainGauge(Side),
    TriggerChance(Side),
    Banner,
}

/// External UI collaborator.
pub trait HudSink: Send + Sync {
    fn write(&mut self, element: HudElement, value: &str) -> Result<(), HudError>;
}

#[derive(Resource, Default)]
pub struct HudBridge {
    pub sink: Option<Box<dyn HudSink>>,
    /// Writes skipped because the element was missing.
    pub skipped: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FighterHud {
    pub side: Side,
    pub name: &'static str,
    pub health: u32,
    pub max_health: u32,
    pub ce: f32,
    pub max_ce: f32,
    pub cooldowns: [u32; 4],
    pub domain_gauge: f32,
    /// Only for characters with the timing-chain slot.
    pub trigger_chance: Option<f32>,
    pub chain: u8,
    pub state: FighterState,
}

/// Snapshot, обновляется раз в normal-кадр
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct HudSnapshot {
    pub fighters: Vec<FighterHud>,
    pub domain_active: bool,
    pub cutscene_active: bool,
    pub timing_freeze: bool,
    pub banner: Option<String>,
    pub winner: Option<Side>,
}

impl HudSnapshot {
    pub fn fighter(&self, side: Side) -> Option<&FighterHud> {
        self.fighters.iter().find(|f| f.side == side)
    }
}

/// Match result once a fighter is down.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    pub winner: Option<Side>,
    pub finished_at: Option<u64>,
}

impl MatchOutcome {
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

pub fn tick_banner(mut banner: ResMut<Banner>) {
    if banner.text.is_none() {
        return;
    }
    banner.frames_left = banner.frames_left.saturating_sub(1);
    if banner.frames_left == 0 {
        banner.text = None;
    }
}

pub fn track_outcome(
    mut died: EventReader<FighterDied>,
    fighters: Query<&Fighter>,
    clock: Res<SimClock>,
    mut outcome: ResMut<MatchOutcome>,
) {
    for event in died.read() {
        if outcome.is_finished() {
            continue;
        }
        let Ok(loser) = fighters.get(event.fighter) else {
            continue;
        };
        outcome.winner = Some(loser.side.opposite());
        outcome.finished_at = Some(clock.tick);
        logger::log_info(&format!("match over at frame {}: {:?} wins", clock.tick, loser.side.opposite()));
    }
}

type HudQuery<'w> = (
    &'w Fighter,
    &'w Health,
    &'w CursedEnergy,
    &'w Cooldowns,
    &'w DomainGauge,
    &'w ComboChain,
);

/// Runs in every frame mode: freeze and cutscene flags stay current.
#[allow(clippy::too_many_arguments)]
pub fn refresh_hud(
    fighters: Query<HudQuery>,
    domain: Res<DomainState>,
    cutscene: Res<CutsceneState>,
    mode: Res<FrameMode>,
    banner: Res<Banner>,
    outcome: Res<MatchOutcome>,
    mut snapshot: ResMut<HudSnapshot>,
    mut bridge: ResMut<HudBridge>,
) {
    let mut rows: Vec<FighterHud> = fighters
        .iter()
        .map(|(fighter, health, ce, cooldowns, gauge, combo)| FighterHud {
            side: fighter.side,
            name: fighter.character.display_name(),
            health: health.current,
            max_health: health.max,
            ce: ce.current,
            max_ce: ce.max,
            cooldowns: cooldowns.slots,
            domain_gauge: gauge.value,
            trigger_chance: has_timing_chain(fighter.character).then_some(combo.trigger_chance),
            chain: combo.chain,
            state: fighter.state,
        })
        .collect();
    rows.sort_by_key(|row| row.side.index());

    *snapshot = HudSnapshot {
        fighters: rows,
        domain_active: domain.active,
        cutscene_active: cutscene.active,
        timing_freeze: matches!(*mode, FrameMode::TimingFreeze(_)),
        banner: banner.text.clone(),
        winner: outcome.winner,
    };

    push_to_sink(&snapshot, &mut bridge);
}

fn has_timing_chain(character: CharacterKind) -> bool {
    character
        .kit()
        .iter()
        .any(|spec| spec.effect == SkillEffect::TimingChain)
}

fn push_to_sink(snapshot: &HudSnapshot, bridge: &mut HudBridge) {
    let HudBridge { sink, skipped } = bridge;
    let Some(sink) = sink.as_mut() else {
        return;
    };

    let mut writes: Vec<(HudElement, String)> = Vec::new();
    for row in &snapshot.fighters {
        writes.push((HudElement::HealthBar(row.side), format!("{}/{}", row.health, row.max_health)));
        writes.push((HudElement::CeBar(row.side), format!("{:.0}", row.ce)));
        for slot in SkillSlot::ALL {
            let frames = row.cooldowns[slot.index()];
            let label = if frames == 0 {
                String::new()
            } else {
                format!("{:.1}", frames as f32 / 60.0)
            };
            writes.push((HudElement::Cooldown(row.side, slot), label));
        }
        writes.push((HudElement::DomainGauge(row.side), format!("{:.0}%", row.domain_gauge)));
        if let Some(chance) = row.trigger_chance {
            writes.push((HudElement::TriggerChance(row.side), format!("{:.0}%", chance)));
        }
    }
    writes.push((HudElement::Banner, snapshot.banner.clone().unwrap_or_default()));

    for (element, value) in writes {
        if let Err(err) = sink.write(element, &value) {
            *skipped += 1;
            logger::log(&format!("hud write skipped: {}", err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Sink без баннера и без cooldown-иконок P2.
    struct PartialSink {
        written: Arc<Mutex<Vec<HudElement>>>,
    }

    impl HudSink for PartialSink {
        fn write(&mut self, element: HudElement, _value: &str) -> Result<(), HudError> {
            match element {
                HudElement::Banner | HudElement::Cooldown(Side::P2, _) => Err(HudError::MissingElement(element)),
                _ => {
                    self.written.lock().unwrap().push(element);
                    Ok(())
                }
            }
        }
    }

    fn snapshot_with_two() -> HudSnapshot {
        let row = |side| FighterHud {
            side,
            name: "x",
            health: 10,
            max_health: 10,
            ce: 5.0,
            max_ce: 10.0,
            cooldowns: [0; 4],
            domain_gauge: 0.0,
            trigger_chance: None,
            chain: 0,
            state: FighterState::Idle,
        };
        HudSnapshot {
            fighters: vec![row(Side::P1), row(Side::P2)],
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_elements_are_skipped() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let mut bridge = HudBridge {
            sink: Some(Box::new(PartialSink {
                written: written.clone(),
            })),
            skipped: 0,
        };

        push_to_sink(&snapshot_with_two(), &mut bridge);

        // 4 P2 cooldowns + banner
        assert_eq!(bridge.skipped, 5);
        let written = written.lock().unwrap();
        assert!(written.contains(&HudElement::HealthBar(Side::P2)));
        assert!(written.contains(&HudElement::Cooldown(Side::P1, SkillSlot::Stance)));
    }

    #[test]
    fn test_banner_expires() {
        let mut world = World::new();
        let mut banner = Banner::default();
        banner.show("UNLIMITED VOID", "#fff", 2);
        world.insert_resource(banner);

        let mut schedule = Schedule::default();
        schedule.add_systems(tick_banner);
        schedule.run(&mut world);
        assert!(world.resource::<Banner>().is_visible());
        schedule.run(&mut world);
        assert!(!world.resource::<Banner>().is_visible());
    }

    #[test]
    fn test_trigger_chance_only_for_chain_characters() {
        assert!(has_timing_chain(CharacterKind::Yuji));
        assert!(!has_timing_chain(CharacterKind::Gojo));
    }
}
