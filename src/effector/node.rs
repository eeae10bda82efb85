// src/effector/node.rs

use crate::math::types::Point2D;

/// Handle auf einen Eckpunkt in der `NodeArena`.
///
/// Boxen, die sich eine Ecke teilen, halten denselben Handle. Eine Änderung
/// der Position wirkt damit auf alle beteiligten Boxen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Speicher für alle Eckpunkte einer Kette.
///
/// Knoten werden nie einzeln entfernt. Nach dem Löschen einer Box bleiben
/// nicht mehr referenzierte Knoten einfach liegen.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    points: Vec<Point2D>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, point: Point2D) -> NodeId {
        self.points.push(point);
        NodeId(self.points.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> Point2D {
        self.points[id.0]
    }

    pub fn set(&mut self, id: NodeId, point: Point2D) {
        self.points[id.0] = point;
    }

    pub fn translate(&mut self, id: NodeId, delta: Point2D) {
        self.points[id.0] += delta;
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.points.len()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
