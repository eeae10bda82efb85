// src/debug/visualization/chain.rs

use crate::plugin::PolygonAreaEffector;
use bevy::prelude::*;

/// Komponente, um die Kette eines Effektors als Gizmos anzuzeigen.
#[derive(Component, Debug)]
pub struct ChainVisual {
    /// Farbe der Box-Umrisse
    pub outline_color: Color,
    /// Farbe der Flusspfeile
    pub arrow_color: Color,
    /// Länge der Flusspfeile in Welteinheiten
    pub arrow_length: f32,
}

impl Default for ChainVisual {
    fn default() -> Self {
        Self {
            outline_color: Color::GREEN,
            arrow_color: Color::WHITE,
            arrow_length: 0.5,
        }
    }
}

/// Zeichnet jede Box als geschlossenen Umriss und einen Pfeil vom Zentrum in
/// Flussrichtung.
pub fn draw_chain_system(query: Query<(&PolygonAreaEffector, &ChainVisual)>, mut gizmos: Gizmos) {
    for (effector, visual) in query.iter() {
        let nodes = effector.chain.nodes();
        for flow_box in effector.chain.iter() {
            let points = flow_box.points(nodes);
            let mut last = points[points.len() - 1];
            for p in points {
                gizmos.line_2d(last, p, visual.outline_color);
                last = p;
            }

            let origin = flow_box.origin(nodes);
            let direction = flow_box.relative_direction(origin);
            if direction != Vec2::ZERO {
                gizmos.arrow_2d(
                    origin,
                    origin + direction * visual.arrow_length,
                    visual.arrow_color,
                );
            }
        }
    }
}
