// src/math/types/cardinal.rs

use crate::math::types::Point2D;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Eine der vier achsenparallelen Richtungen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinal {
    Up,
    Down,
    Left,
    Right,
}

impl Cardinal {
    pub const ALL: [Cardinal; 4] = [Cardinal::Up, Cardinal::Right, Cardinal::Down, Cardinal::Left];

    /// Einheitsvektor der Richtung
    pub fn to_vec2(self) -> Point2D {
        match self {
            Cardinal::Up => Point2D::Y,
            Cardinal::Down => Point2D::NEG_Y,
            Cardinal::Left => Point2D::NEG_X,
            Cardinal::Right => Point2D::X,
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            Cardinal::Up => Cardinal::Down,
            Cardinal::Down => Cardinal::Up,
            Cardinal::Left => Cardinal::Right,
            Cardinal::Right => Cardinal::Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Cardinal::Up | Cardinal::Down)
    }

    /// Rundet jede Komponente auf die nächste ganze Zahl (Halbe auf gerade)
    /// und liefert die passende Richtung. Diagonalen und der Nullvektor
    /// ergeben `None`.
    pub fn from_vec2_rounded(v: Point2D) -> Option<Self> {
        let x = v.x.round_ties_even();
        let y = v.y.round_ties_even();
        match (x as i32, y as i32) {
            (0, 1) => Some(Cardinal::Up),
            (0, -1) => Some(Cardinal::Down),
            (-1, 0) => Some(Cardinal::Left),
            (1, 0) => Some(Cardinal::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cardinal::Up => "up",
            Cardinal::Down => "down",
            Cardinal::Left => "left",
            Cardinal::Right => "right",
        };
        f.write_str(name)
    }
}
