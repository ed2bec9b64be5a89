//! ECS Components для бойцов и арены
//!
//! Организация по доменам:
//! - fighter: идентичность, состояние, ресурсы (health, ce, domain gauge), cooldowns, combo
//! - movement: позиция/скорость, movement intent
//! - world: препятствия арены (Arena resource)

pub mod fighter;
pub mod movement;
pub mod world;

// Re-exports для удобного импорта
pub use fighter::*;
pub use movement::*;
pub use world::*;
