//! Match session: owns the headless App, spawns the two fighters, exposes the
//! input surface (slot presses, domain triggers, movement) and read-only views.
//!
//! Один `advance()` = один кадр (`App::update`).

use bevy::ecs::event::EventCursor;
use bevy::prelude::*;

use crate::ai::{AIConfig, AIState};
use crate::characters::CharacterKind;
use crate::combat::{SkillInput, SkillResolved};
use crate::components::{
    Arena, ComboChain, Cooldowns, CursedEnergy, DomainGauge, Fighter, FighterState, Health, MoveIntent,
    Obstacle, PhysicsBody, Roster, Side, StateTimers,
};
use crate::config::MatchConfig;
use crate::domain::{CutsceneState, DomainExpandInput, DomainState, EndDomainRequest};
use crate::effects::EffectRegistry;
use crate::error::ConfigError;
use crate::frame::{FrameMode, SimClock};
use crate::hud::{HudBridge, HudSink, HudSnapshot, MatchOutcome};
use crate::logger;
use crate::map::{MapGenerator, MapSource, ProceduralMap};
use crate::render::{self, RenderFrame};
use crate::shared::camera::{CameraRig, ScreenPoint};
use crate::{create_headless_app, DeterministicRng, SimulationPlugin};

/// Spawn x for each side.
pub const SPAWN_OFFSET: f32 = 200.0;

/// Read-only copy of one fighter's state.
#[derive(Debug, Clone, PartialEq)]
pub struct FighterView {
    pub entity: Entity,
    pub character: CharacterKind,
    pub side: Side,
    pub state: FighterState,
    pub pose: u8,
    pub facing: f32,
    pub health: Health,
    pub energy: CursedEnergy,
    pub gauge: DomainGauge,
    pub cooldowns: Cooldowns,
    pub combo: ComboChain,
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Compact state used to compare runs.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSnapshot {
    pub tick: u64,
    pub active_tick: u64,
    pub fighters: Vec<FighterView>,
    pub domain: DomainState,
    pub obstacles: Vec<Obstacle>,
    pub outcome: MatchOutcome,
}

pub struct Match {
    app: App,
    roster: Roster,
    skill_results: EventCursor<SkillResolved>,
}

impl Match {
    pub fn new(config: MatchConfig, p1: CharacterKind, p2: CharacterKind) -> Self {
        Self::with_map_generator(config, p1, p2, Box::new(ProceduralMap::default()))
    }

    /// Parse + validate a JSON config, then build the match.
    pub fn from_json(json: &str, p1: CharacterKind, p2: CharacterKind) -> Result<Self, ConfigError> {
        let config = MatchConfig::from_json_str(json)?;
        Ok(Self::new(config, p1, p2))
    }

    pub fn with_map_generator(
        config: MatchConfig,
        p1: CharacterKind,
        p2: CharacterKind,
        map: Box<dyn MapGenerator>,
    ) -> Self {
        let mut app = create_headless_app(config.seed);
        app.insert_resource(CameraRig::new(config.camera.clone()))
            .insert_resource(MapSource(map))
            .insert_resource(config.clone());
        app.add_plugins(SimulationPlugin);

        let world = app.world_mut();
        let p1 = spawn_fighter(world, p1, Side::P1, false);
        let p2 = spawn_fighter(world, p2, Side::P2, config.ai_opponent);
        let roster = Roster { p1, p2 };
        world.insert_resource(roster);

        let layout = world.resource_scope(|world, map: Mut<MapSource>| {
            let mut rng = world.resource_mut::<DeterministicRng>();
            map.0.initial_layout(&mut rng)
        });
        world.resource_mut::<Arena>().obstacles = layout;

        logger::log_info(&format!(
            "match ready: {:?} vs {:?} (seed {}, ai {})",
            world.get::<Fighter>(p1).map(|f| f.character),
            world.get::<Fighter>(p2).map(|f| f.character),
            config.seed,
            config.ai_opponent
        ));

        Self {
            app,
            roster,
            skill_results: EventCursor::default(),
        }
    }

    /// Run one frame.
    pub fn advance(&mut self) {
        self.app.update();
    }

    pub fn advance_frames(&mut self, frames: u32) {
        for _ in 0..frames {
            self.app.update();
        }
    }

    // --- input ---

    /// Slot press (1-4), consumed on the next `advance`.
    pub fn press_skill(&mut self, side: Side, slot: u8, repeat: bool) {
        let fighter = self.entity(side);
        self.app.world_mut().send_event(SkillInput {
            fighter,
            slot,
            repeat,
        });
    }

    pub fn request_domain_expansion(&mut self, side: Side) {
        let fighter = self.entity(side);
        self.app.world_mut().send_event(DomainExpandInput { fighter });
    }

    pub fn end_domain(&mut self) {
        self.app.world_mut().send_event(EndDomainRequest);
    }

    pub fn set_move_intent(&mut self, side: Side, direction: Vec2) {
        let entity = self.entity(side);
        if let Some(mut intent) = self.app.world_mut().get_mut::<MoveIntent>(entity) {
            intent.direction = direction;
        }
    }

    /// Put `side` under AI control; the fighter stops being a player fighter.
    pub fn hand_to_ai(&mut self, side: Side, config: AIConfig) {
        let entity = self.entity(side);
        let mut fighter = self.app.world_mut().entity_mut(entity);
        if let Some(mut data) = fighter.get_mut::<Fighter>() {
            data.is_player = false;
        }
        fighter.insert((AIState::default(), config));
        logger::log(&format!("{:?} handed to AI", side));
    }

    /// Skill results produced since the last call.
    pub fn drain_skill_results(&mut self) -> Vec<SkillResolved> {
        let events = self.app.world().resource::<Events<SkillResolved>>();
        self.skill_results.read(events).copied().collect()
    }

    pub fn set_hud_sink(&mut self, sink: Box<dyn HudSink>) {
        self.app.world_mut().resource_mut::<HudBridge>().sink = Some(sink);
    }

    // --- views ---

    pub fn entity(&self, side: Side) -> Entity {
        self.roster.get(side)
    }

    pub fn fighter(&self, side: Side) -> Option<FighterView> {
        fighter_view(self.app.world(), self.entity(side))
    }

    pub fn clock(&self) -> SimClock {
        *self.app.world().resource::<SimClock>()
    }

    pub fn frame_mode(&self) -> FrameMode {
        *self.app.world().resource::<FrameMode>()
    }

    pub fn domain(&self) -> &DomainState {
        self.app.world().resource::<DomainState>()
    }

    pub fn cutscene(&self) -> &CutsceneState {
        self.app.world().resource::<CutsceneState>()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.app.world().resource::<Arena>().obstacles
    }

    pub fn effects(&self) -> &EffectRegistry {
        self.app.world().resource::<EffectRegistry>()
    }

    pub fn camera(&self) -> &CameraRig {
        self.app.world().resource::<CameraRig>()
    }

    pub fn hud(&self) -> &HudSnapshot {
        self.app.world().resource::<HudSnapshot>()
    }

    pub fn outcome(&self) -> MatchOutcome {
        *self.app.world().resource::<MatchOutcome>()
    }

    pub fn render_frame(&mut self) -> RenderFrame {
        render::build_render_frame(self.app.world_mut())
    }

    /// World → screen with the current camera.
    pub fn project(&self, point: Vec3) -> Option<ScreenPoint> {
        let viewport = self.app.world().resource::<MatchConfig>().viewport;
        self.camera().project(point, viewport)
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        let clock = self.clock();
        MatchSnapshot {
            tick: clock.tick,
            active_tick: clock.active_tick,
            fighters: [Side::P1, Side::P2]
                .into_iter()
                .filter_map(|side| self.fighter(side))
                .collect(),
            domain: self.domain().clone(),
            obstacles: self.obstacles().to_vec(),
            outcome: self.outcome(),
        }
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}

fn spawn_fighter(world: &mut World, character: CharacterKind, side: Side, ai: bool) -> Entity {
    let stats = character.stats();
    let x = match side {
        Side::P1 => -SPAWN_OFFSET,
        Side::P2 => SPAWN_OFFSET,
    };
    let mut entity = world.spawn((
        Fighter::new(character, side, !ai),
        Health::new(stats.max_health),
        CursedEnergy::new(stats.max_ce, stats.ce_regen),
        DomainGauge::default(),
        Cooldowns::default(),
        ComboChain::default(),
        StateTimers::default(),
        PhysicsBody::at(Vec3::new(x, 0.0, 0.0)),
        MoveIntent::default(),
    ));
    if ai {
        entity.insert((AIState::default(), AIConfig::default()));
    }
    entity.id()
}

fn fighter_view(world: &World, entity: Entity) -> Option<FighterView> {
    let fighter = world.get::<Fighter>(entity)?;
    let body = world.get::<PhysicsBody>(entity)?;
    Some(FighterView {
        entity,
        character: fighter.character,
        side: fighter.side,
        state: fighter.state,
        pose: fighter.pose,
        facing: fighter.facing,
        health: *world.get::<Health>(entity)?,
        energy: *world.get::<CursedEnergy>(entity)?,
        gauge: *world.get::<DomainGauge>(entity)?,
        cooldowns: *world.get::<Cooldowns>(entity)?,
        combo: *world.get::<ComboChain>(entity)?,
        position: body.position,
        velocity: body.velocity,
    })
}
