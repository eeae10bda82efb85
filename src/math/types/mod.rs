// src/math/types/mod.rs
pub mod bounds;
pub mod cardinal;

pub use bounds::*;
pub use cardinal::*;

// Re-export häufig verwendete externe Typen
pub use bevy::math::Vec2;

// Einheitlicher Punkttyp für das gesamte Modul
pub type Point2D = Vec2;
