//! AI decision-making module
//!
//! Simple FSM для оппонента-бота. AI не трогает state бойца напрямую:
//! он пишет `MoveIntent` и шлёт те же input события, что и игрок.

use bevy::prelude::*;

use crate::frame::SimSet;

pub mod simple_fsm;

// Re-export основных типов
pub use simple_fsm::{AIConfig, AIState};

/// AI Plugin
///
/// `ai_decide` в `SimSet::Ai` (только normal кадры). Input события, отправленные
/// здесь, обрабатываются в `SimSet::Input` следующего кадра.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, simple_fsm::ai_decide.in_set(SimSet::Ai));
    }
}
