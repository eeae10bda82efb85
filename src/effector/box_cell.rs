// src/effector/box_cell.rs

use super::node::{NodeArena, NodeId};
use crate::math::{
    types::{Bounds2D, Cardinal, Point2D},
    utils::simple_geometry::{midpoint, point_in_polygon, polygon_area},
};
use std::fmt;

/// Stabiler Handle auf eine Box innerhalb einer `BoxChain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(pub(crate) usize);

impl BoxId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "box#{}", self.0)
    }
}

/// Eine Viereckszelle der Kette.
///
/// Die Ecken sind im Uhrzeigersinn ab oben links angeordnet:
///
/// ```text
/// 0 ---- 1
/// |      |
/// 3 ---- 2
/// ```
///
/// Geometrie-Abfragen lesen den Schnappschuss aus `bake()`, nie die
/// Live-Positionen der Knoten. Ausnahmen: `origin()` und `points()`.
#[derive(Debug, Clone)]
pub struct FlowBox {
    id: BoxId,
    pub(crate) nodes: [NodeId; 4],
    /// Richtung, in die der Fluss die Box verlässt. `None` bei einer frisch
    /// angelegten Wurzelbox.
    pub(crate) direction: Option<Cardinal>,
    /// Seite, über die die Box an ihren Parent gehängt ist.
    pub(crate) connection_direction: Option<Cardinal>,
    pub(crate) parent: Option<BoxId>,
    baked_points: [Point2D; 4],
    bounding_box: Bounds2D,
    center: Point2D,
}

impl FlowBox {
    pub(crate) fn new(id: BoxId, nodes: [NodeId; 4], arena: &NodeArena) -> Self {
        let mut flow_box = Self {
            id,
            nodes,
            direction: None,
            connection_direction: None,
            parent: None,
            baked_points: [Point2D::ZERO; 4],
            bounding_box: Bounds2D {
                min: Point2D::ZERO,
                max: Point2D::ZERO,
            },
            center: Point2D::ZERO,
        };
        flow_box.bake(arena);
        flow_box
    }

    /// Ecken eines achsenparallelen Quadrats mit Seitenlänge `size` um `origin`.
    pub fn default_corners(origin: Point2D, size: f32) -> [Point2D; 4] {
        let half = size / 2.0;
        [
            origin + Point2D::new(-half, half),
            origin + Point2D::new(half, half),
            origin + Point2D::new(half, -half),
            origin + Point2D::new(-half, -half),
        ]
    }

    pub fn id(&self) -> BoxId {
        self.id
    }

    pub fn nodes(&self) -> [NodeId; 4] {
        self.nodes
    }

    pub fn direction(&self) -> Option<Cardinal> {
        self.direction
    }

    pub fn connection_direction(&self) -> Option<Cardinal> {
        self.connection_direction
    }

    pub fn parent(&self) -> Option<BoxId> {
        self.parent
    }

    pub fn baked_points(&self) -> &[Point2D; 4] {
        &self.baked_points
    }

    pub fn bounding_box(&self) -> Bounds2D {
        self.bounding_box
    }

    /// Zentrum beim letzten `bake()` bzw. nach dem letzten `translate_points()`.
    pub fn center(&self) -> Point2D {
        self.center
    }

    pub fn is_direction_vertical(&self) -> bool {
        self.direction.is_some_and(Cardinal::is_vertical)
    }

    /// Schnappschuss der aktuellen Knotenpositionen samt Bounding Box.
    pub fn bake(&mut self, arena: &NodeArena) {
        self.baked_points = self.points(arena);
        self.center = self.origin(arena);
        // Vier Punkte, daher nie leer
        self.bounding_box = Bounds2D::from_points_iter(self.baked_points).unwrap_or(Bounds2D {
            min: self.center,
            max: self.center,
        });
    }

    /// Live-Positionen der vier Ecken.
    pub fn points(&self, arena: &NodeArena) -> [Point2D; 4] {
        self.nodes.map(|id| arena.get(id))
    }

    /// Mittelpunkt der beiden Diagonalenmitten, live gelesen.
    pub fn origin(&self, arena: &NodeArena) -> Point2D {
        let [p0, p1, p2, p3] = self.points(arena);
        midpoint(midpoint(p0, p2), midpoint(p1, p3))
    }

    /// Flussrichtung für einen Punkt innerhalb der Box.
    ///
    /// Ziel ist die Mitte der Austrittskante, am gespeicherten Zentrum auf die
    /// Gegenseite gespiegelt. Das Ergebnis ist normiert, oder null wenn `from`
    /// genau auf dem Ziel liegt.
    pub fn relative_direction(&self, from: Point2D) -> Point2D {
        let p = &self.baked_points;
        let mut to = if self.is_direction_vertical() {
            if self.direction == Some(Cardinal::Up) {
                midpoint(p[0], p[1])
            } else {
                midpoint(p[3], p[2])
            }
        } else if self.direction == Some(Cardinal::Left) {
            midpoint(p[0], p[3])
        } else {
            midpoint(p[1], p[2])
        };
        to -= self.center - to;
        (to - from).normalize_or_zero()
    }

    pub fn inside_polygon(&self, point: Point2D) -> bool {
        point_in_polygon(point, &self.baked_points)
    }

    /// Schneller Vorfilter, Rand exklusiv.
    pub fn inside_bounding_box(&self, point: Point2D) -> bool {
        self.bounding_box.contains_point_exclusive(point)
    }

    /// Richtung, mit der `direction * sign` verglichen wird.
    fn signed_direction(&self, sign: i32) -> Option<Cardinal> {
        match sign.signum() {
            1 => self.direction,
            -1 => self.direction.map(Cardinal::inverse),
            _ => None,
        }
    }

    fn edge_for_sign(&self, sign: i32) -> Option<(Point2D, Point2D)> {
        let p = &self.baked_points;
        match self.signed_direction(sign)? {
            Cardinal::Left => Some((p[1], p[2])),
            Cardinal::Right => Some((p[0], p[3])),
            Cardinal::Down => Some((p[0], p[1])),
            Cardinal::Up => Some((p[2], p[3])),
        }
    }

    /// Mitte der Kante, die `direction * sign` entgegensteht. `sign = 1`
    /// liefert die Eintrittskante, `sign = -1` die Austrittskante.
    /// Ohne passende Richtung: Nullvektor.
    pub fn mid_edge_point(&self, sign: i32) -> Point2D {
        self.edge_for_sign(sign)
            .map(|(a, b)| midpoint(a, b))
            .unwrap_or(Point2D::ZERO)
    }

    /// Länge derselben Kante wie `mid_edge_point`, sonst 0.
    pub fn edge_length(&self, sign: i32) -> f32 {
        self.edge_for_sign(sign)
            .map(|(a, b)| a.distance(b))
            .unwrap_or(0.0)
    }

    /// Fläche des Vierecks aus den Live-Positionen.
    pub fn area(&self, arena: &NodeArena) -> f32 {
        polygon_area(&self.points(arena))
    }

    /// Verschiebt alle Ecken um die Differenz zwischen `new_center` und dem
    /// gespeicherten Zentrum. Geteilte Ecken bewegen die Nachbarn mit.
    pub fn translate_points(&mut self, arena: &mut NodeArena, new_center: Point2D) {
        let delta = new_center - self.center;
        for id in self.nodes {
            arena.translate(id, delta);
        }
        self.center = new_center;
    }

    pub fn invert(&mut self) {
        self.direction = self.direction.map(Cardinal::inverse);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(arena: &mut NodeArena, origin: Point2D, size: f32) -> FlowBox {
        let nodes = FlowBox::default_corners(origin, size).map(|p| arena.insert(p));
        FlowBox::new(BoxId(0), nodes, arena)
    }

    #[test]
    fn test_default_corner_order() {
        let corners = FlowBox::default_corners(Point2D::new(1.0, 1.0), 2.0);
        assert_eq!(corners[0], Point2D::new(0.0, 2.0));
        assert_eq!(corners[1], Point2D::new(2.0, 2.0));
        assert_eq!(corners[2], Point2D::new(2.0, 0.0));
        assert_eq!(corners[3], Point2D::new(0.0, 0.0));
    }

    #[test]
    fn test_bake_is_idempotent() {
        let mut arena = NodeArena::new();
        let mut b = square(&mut arena, Point2D::ZERO, 2.0);
        b.bake(&arena);
        let points = *b.baked_points();
        let bb = b.bounding_box();
        b.bake(&arena);
        assert_eq!(*b.baked_points(), points);
        assert_eq!(b.bounding_box(), bb);
    }

    #[test]
    fn test_queries_read_baked_geometry() {
        let mut arena = NodeArena::new();
        let mut b = square(&mut arena, Point2D::ZERO, 2.0);
        // Knoten verschieben ohne neu zu backen
        arena.translate(b.nodes()[1], Point2D::new(5.0, 0.0));
        assert!(!b.inside_bounding_box(Point2D::new(3.0, 0.5)));
        // origin liest live
        assert_ne!(b.origin(&arena), Point2D::ZERO);

        b.bake(&arena);
        assert!(b.inside_bounding_box(Point2D::new(3.0, 0.5)));
    }

    #[test]
    fn test_origin_is_diagonal_midpoint() {
        let mut arena = NodeArena::new();
        let b = square(&mut arena, Point2D::new(3.0, -2.0), 4.0);
        assert_eq!(b.origin(&arena), Point2D::new(3.0, -2.0));
    }

    #[test]
    fn test_relative_direction_points_through_exit() {
        let mut arena = NodeArena::new();
        let mut b = square(&mut arena, Point2D::ZERO, 2.0);

        b.direction = Some(Cardinal::Right);
        let dir = b.relative_direction(Point2D::ZERO);
        assert_relative_eq!(dir.x, 1.0);
        assert_relative_eq!(dir.y, 0.0);

        b.direction = Some(Cardinal::Up);
        let dir = b.relative_direction(Point2D::ZERO);
        assert_relative_eq!(dir.y, 1.0);

        b.direction = Some(Cardinal::Left);
        assert_relative_eq!(b.relative_direction(Point2D::ZERO).x, -1.0);

        b.direction = Some(Cardinal::Down);
        assert_relative_eq!(b.relative_direction(Point2D::ZERO).y, -1.0);

        // Ziel liegt bei (0, -2); aus (0.5, 0) zeigt der Vektor schräg nach unten links
        let dir = b.relative_direction(Point2D::new(0.5, 0.0));
        assert!(dir.x < 0.0 && dir.y < 0.0);
        assert_relative_eq!(dir.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_relative_direction_without_direction_defaults_to_right_edge() {
        let mut arena = NodeArena::new();
        let b = square(&mut arena, Point2D::ZERO, 2.0);
        assert_eq!(b.relative_direction(Point2D::ZERO), Point2D::X);
    }

    #[test]
    fn test_inside_polygon() {
        let mut arena = NodeArena::new();
        let b = square(&mut arena, Point2D::ZERO, 2.0);
        assert!(b.inside_polygon(Point2D::new(0.2, -0.3)));
        assert!(!b.inside_polygon(Point2D::new(1.2, 0.0)));
    }

    #[test]
    fn test_mid_edge_point_and_length() {
        let mut arena = NodeArena::new();
        let mut b = square(&mut arena, Point2D::ZERO, 2.0);

        // Ohne Richtung: stille Null
        assert_eq!(b.mid_edge_point(1), Point2D::ZERO);
        assert_eq!(b.edge_length(-1), 0.0);

        b.direction = Some(Cardinal::Right);
        assert_eq!(b.mid_edge_point(1), Point2D::new(-1.0, 0.0));
        assert_eq!(b.mid_edge_point(-1), Point2D::new(1.0, 0.0));
        assert_relative_eq!(b.edge_length(1), 2.0);
        assert_eq!(b.mid_edge_point(0), Point2D::ZERO);

        b.direction = Some(Cardinal::Up);
        assert_eq!(b.mid_edge_point(1), Point2D::new(0.0, -1.0));
        assert_eq!(b.mid_edge_point(-1), Point2D::new(0.0, 1.0));
    }

    #[test]
    fn test_translate_points_uses_stored_center() {
        let mut arena = NodeArena::new();
        let mut b = square(&mut arena, Point2D::ZERO, 2.0);
        b.translate_points(&mut arena, Point2D::new(2.0, 1.0));
        assert_eq!(b.center(), Point2D::new(2.0, 1.0));
        assert_eq!(b.origin(&arena), Point2D::new(2.0, 1.0));
        assert_eq!(arena.get(b.nodes()[0]), Point2D::new(1.0, 2.0));
    }

    #[test]
    fn test_area_and_invert() {
        let mut arena = NodeArena::new();
        let mut b = square(&mut arena, Point2D::ZERO, 3.0);
        assert_relative_eq!(b.area(&arena), 9.0);

        b.invert();
        assert_eq!(b.direction(), None);
        b.direction = Some(Cardinal::Left);
        b.connection_direction = Some(Cardinal::Right);
        b.invert();
        assert_eq!(b.direction(), Some(Cardinal::Right));
        assert_eq!(b.connection_direction(), Some(Cardinal::Right));
    }
}
