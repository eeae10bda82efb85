// src/math/utils.rs

/// Geometrische Hilfsfunktionen (einfach, ohne komplexe Strukturen)
pub mod simple_geometry {
    use crate::math::types::Point2D;

    /// Mittelpunkt zwischen zwei Punkten (Lerp bei t = 0.5)
    pub fn midpoint(a: Point2D, b: Point2D) -> Point2D {
        Point2D::new(a.x + 0.5 * (b.x - a.x), a.y + 0.5 * (b.y - a.y))
    }

    /// Ray-Casting mit Paritätsregel. Der letzte Vertex ist implizit mit dem
    /// ersten verbunden.
    ///
    /// Auf Kanten gilt die halboffene Regel: bei einem achsenparallelen Rechteck
    /// liegen Punkte auf der unteren und linken Kante innen, auf der oberen und
    /// rechten Kante außen.
    pub fn point_in_polygon(point: Point2D, vertices: &[Point2D]) -> bool {
        let n = vertices.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = vertices[i];
            let vj = vertices[j];
            if (vi.y > point.y) != (vj.y > point.y)
                && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Fläche nach der Shoelace-Formel. Die Vertex-Folge wird als geschlossen
    /// behandelt, die Eingabe bleibt unverändert.
    pub fn polygon_area(vertices: &[Point2D]) -> f32 {
        if vertices.len() < 3 {
            return 0.0;
        }

        let sum: f32 = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .map(|(p, next)| (next.x - p.x) * (next.y + p.y))
            .sum();
        (sum / 2.0).abs()
    }
}
