//! Match configuration (tuning constants, seed, viewport).
//!
//! All timings are in frames (60 Hz), distances in world units.
//! Defaults reproduce the arcade tuning; JSON overrides are partial (`serde(default)`).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level per-match configuration.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seed для DeterministicRng
    pub seed: u64,
    pub viewport: Viewport,
    /// Second fighter is driven by the built-in AI.
    pub ai_opponent: bool,
    /// Frames between two domain ticks (200 ms at 60 Hz).
    pub domain_tick_interval: u32,
    /// Domain auto-ends after this many active frames; `None` = manual end only.
    pub domain_duration: Option<u32>,
    /// Domain gauge gained per point of non-domain damage dealt.
    pub gauge_per_damage: f32,
    pub black_flash: BlackFlashTuning,
    pub camera: CameraTuning,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            viewport: Viewport::default(),
            ai_opponent: true,
            domain_tick_interval: 12,
            domain_duration: Some(600),
            gauge_per_damage: 0.05,
            black_flash: BlackFlashTuning::default(),
            camera: CameraTuning::default(),
        }
    }
}

impl MatchConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain_tick_interval == 0 {
            return Err(invalid("domain_tick_interval", "must be at least one frame"));
        }
        if self.domain_duration == Some(0) {
            return Err(invalid("domain_duration", "must be positive when set"));
        }
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(invalid("viewport", "dimensions must be positive"));
        }
        if self.gauge_per_damage < 0.0 {
            return Err(invalid("gauge_per_damage", "must not be negative"));
        }
        self.black_flash.validate()?;
        self.camera.validate()?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

/// Screen size used by the projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Black Flash (timing-window chain) tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlackFlashTuning {
    /// Opponent closer than this is pinned in place when the zone opens.
    pub zone_entry_range: f32,
    /// Impact reach (wider than entry).
    pub impact_range: f32,
    pub window_timer: u32,
    pub window_start: u32,
    pub window_end: u32,
    /// Per chain step the start moves up by this, the end down by half of it.
    pub difficulty_step: u32,
    pub base_damage: u32,
    pub damage_step: u32,
    pub finisher_damage: u32,
    pub normal_hit_cost: f32,
    pub normal_hit_cooldown: u32,
    pub zone_cost: f32,
    pub chance_step: f32,
    pub chance_cap: f32,
    pub impact_delay: u32,
    pub failure_cooldown: u32,
    pub finisher_cooldown: u32,
    pub miss_cooldown: u32,
    pub gauge_gain: f32,
    pub stun_frames: u32,
    pub residue_bursts: u8,
    pub residue_interval: u32,
}

impl Default for BlackFlashTuning {
    fn default() -> Self {
        Self {
            zone_entry_range: 300.0,
            impact_range: 350.0,
            window_timer: 60,
            window_start: 10,
            window_end: 25,
            difficulty_step: 3,
            base_damage: 120,
            damage_step: 30,
            finisher_damage: 300,
            normal_hit_cost: 20.0,
            normal_hit_cooldown: 20,
            zone_cost: 10.0,
            chance_step: 5.0,
            chance_cap: 90.0,
            impact_delay: 6,
            failure_cooldown: 30,
            finisher_cooldown: 90,
            miss_cooldown: 30,
            gauge_gain: 20.0,
            stun_frames: 60,
            residue_bursts: 11,
            residue_interval: 6,
        }
    }
}

impl BlackFlashTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.window_start >= self.window_end {
            return Err(invalid("black_flash.window_start", "must be below window_end"));
        }
        if self.window_timer <= self.window_end {
            return Err(invalid("black_flash.window_timer", "must exceed window_end"));
        }
        if !(0.0..=100.0).contains(&self.chance_cap) {
            return Err(invalid("black_flash.chance_cap", "must be within [0, 100]"));
        }
        if self.impact_range < self.zone_entry_range {
            return Err(invalid("black_flash.impact_range", "must not be below zone_entry_range"));
        }
        Ok(())
    }
}

/// Camera follow / shake / zoom tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub home: [f32; 3],
    pub default_fov: f32,
    pub freeze_fov: f32,
    pub cinematic_fov: f32,
    pub follow_rate: f32,
    pub fov_return_rate: f32,
    pub freeze_zoom_rate: f32,
    pub shake_decay: f32,
    /// Vertical offset of the hard lock above the locked fighter.
    pub lock_lift: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            home: [0.0, -200.0, -600.0],
            default_fov: 400.0,
            freeze_fov: 250.0,
            cinematic_fov: 300.0,
            follow_rate: 0.1,
            fov_return_rate: 0.1,
            freeze_zoom_rate: 0.02,
            shake_decay: 0.9,
            lock_lift: 80.0,
        }
    }
}

impl CameraTuning {
    pub fn home_position(&self) -> Vec3 {
        Vec3::from_array(self.home)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_fov <= 0.0 || self.freeze_fov <= 0.0 || self.cinematic_fov <= 0.0 {
            return Err(invalid("camera.fov", "must be positive"));
        }
        if !(0.0..1.0).contains(&self.shake_decay) {
            return Err(invalid("camera.shake_decay", "must be within [0, 1)"));
        }
        Ok(())
    }
}
