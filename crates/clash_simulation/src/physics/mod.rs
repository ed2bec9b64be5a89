//! Physics simulation module
//!
//! Proximity-only мир: интеграция скорости, гравитация, трение, границы арены.
//! Коллизий между телами нет (hit tests в combat по дистанции).

pub mod movement;

// Re-export основных типов
pub use movement::{apply_intent, integrate, ArenaBounds, FRICTION, GRAVITY};
