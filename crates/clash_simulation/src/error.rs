//! Typed errors for the fallible API surface.
//!
//! The frame loop itself never fails: skill rejections are `SkillOutcome`s,
//! stale deferred targets resolve as misses, and `HudError`s are absorbed.

use thiserror::Error;

use crate::hud::HudElement;

/// Match configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse match config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid match config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// UI collaborator could not accept a write.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HudError {
    #[error("hud element {0:?} is not present")]
    MissingElement(HudElement),
}
