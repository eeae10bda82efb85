// src/math/types/bounds.rs

use crate::math::types::Point2D;
use std::fmt;

/// 2D Bounding Box (Axis-Aligned Bounding Box)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    pub min: Point2D,
    pub max: Point2D,
}

impl Bounds2D {
    /// Erstellt eine Bounding Box die alle Punkte umschließt.
    /// `None` bei leerer Eingabe.
    pub fn from_points_iter<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2D>,
    {
        let mut points_iter = points.into_iter();
        let first_point = points_iter.next()?;

        let mut min = first_point;
        let mut max = first_point;

        for point in points_iter {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        Some(Self { min, max })
    }

    /// Zentrum der Bounding Box
    pub fn center(&self) -> Point2D {
        (self.min + self.max) * 0.5
    }

    /// Prüft ob ein Punkt echt innerhalb liegt; Punkte auf dem Rand zählen
    /// als außerhalb. Das ist der schnelle Vorfilter vor dem exakten Polygontest.
    pub fn contains_point_exclusive(&self, point: Point2D) -> bool {
        point.x < self.max.x && point.x > self.min.x && point.y < self.max.y && point.y > self.min.y
    }

    /// Vereinigt zwei Bounding Boxes
    pub fn union(&self, other: &Bounds2D) -> Self {
        Self {
            min: Point2D::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2D::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

impl fmt::Display for Bounds2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bounds2D({:?} to {:?})", self.min, self.max)
    }
}
