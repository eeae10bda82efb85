// src/effector/chain.rs

use super::{
    box_cell::{BoxId, FlowBox},
    error::{EffectorError, EffectorResult},
    node::{NodeArena, NodeId},
};
use crate::math::{
    error::MathError,
    types::{Bounds2D, Cardinal, Point2D},
};
use bevy::log::{debug, warn};

/// Seitenlänge einer neuen Box in Welteinheiten.
pub const DEFAULT_BOX_SIZE: f32 = 2.0;

/// Lose Beschreibung einer Box, z.B. aus einem Import.
/// `parent` ist ein Index in dieselbe Liste und muss vor der Box stehen.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadDescriptor {
    pub corners: [Point2D; 4],
    pub direction: Option<Cardinal>,
    pub connection_direction: Option<Cardinal>,
    pub parent: Option<usize>,
}

/// Geordnete Kette von Boxen. Besitzt alle Boxen und über die `NodeArena`
/// alle Eckpunkte.
///
/// Die Reihenfolge ist maßgeblich für die Auswertung: überlappen sich zwei
/// Boxen, gewinnt die frühere.
#[derive(Debug, Clone, Default)]
pub struct BoxChain {
    nodes: NodeArena,
    slots: Vec<Option<FlowBox>>,
    order: Vec<BoxId>,
}

impl BoxChain {
    /// Leere Kette ohne Boxen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kette mit einer einzelnen Standardbox um `origin`.
    pub fn with_default_box(origin: Point2D) -> Self {
        let mut chain = Self::new();
        chain.generate_default_box(origin);
        chain
    }

    /// Baut eine Kette aus losen Vierecken und stellt anschließend die
    /// geteilten Ecken über `reconnect_all` wieder her.
    pub fn from_quads<I>(quads: I) -> EffectorResult<Self>
    where
        I: IntoIterator<Item = QuadDescriptor>,
    {
        let mut chain = Self::new();
        for (index, quad) in quads.into_iter().enumerate() {
            let parent = match quad.parent {
                Some(parent) if parent >= index => {
                    return Err(EffectorError::InvalidParentIndex { index, parent });
                }
                Some(parent) => Some(BoxId(parent)),
                None => None,
            };
            let nodes = quad.corners.map(|p| chain.nodes.insert(p));
            let id = chain.insert_box(nodes);
            if let Some(b) = chain.slot_mut(id) {
                b.direction = quad.direction;
                b.connection_direction = quad.connection_direction;
                b.parent = parent;
            }
        }
        chain.reconnect_all();
        chain.bake();
        Ok(chain)
    }

    /// Verwirft alle Boxen und legt eine Standardbox um `origin` an.
    pub fn generate_default_box(&mut self, origin: Point2D) -> BoxId {
        self.nodes.clear();
        self.slots.clear();
        self.order.clear();
        let corners = FlowBox::default_corners(origin, DEFAULT_BOX_SIZE);
        let nodes = corners.map(|p| self.nodes.insert(p));
        let id = self.insert_box(nodes);
        debug!("Generated default box {} at {:?}", id, origin);
        id
    }

    /// Setzt die Fläche auf eine einzelne Standardbox zurück.
    pub fn destroy_area(&mut self, origin: Point2D) -> BoxId {
        self.generate_default_box(origin)
    }

    fn insert_box(&mut self, nodes: [NodeId; 4]) -> BoxId {
        let id = BoxId(self.slots.len());
        self.slots.push(Some(FlowBox::new(id, nodes, &self.nodes)));
        self.order.push(id);
        id
    }

    fn slot_mut(&mut self, id: BoxId) -> Option<&mut FlowBox> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    fn try_get_mut(&mut self, id: BoxId) -> EffectorResult<&mut FlowBox> {
        self.slot_mut(id).ok_or(EffectorError::UnknownBox(id))
    }

    pub fn get(&self, id: BoxId) -> Option<&FlowBox> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn try_get(&self, id: BoxId) -> EffectorResult<&FlowBox> {
        self.get(id).ok_or(EffectorError::UnknownBox(id))
    }

    /// Boxen in Kettenreihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = &FlowBox> + '_ {
        self.order.iter().filter_map(|id| self.get(*id))
    }

    pub fn ids(&self) -> &[BoxId] {
        &self.order
    }

    pub fn root(&self) -> Option<BoxId> {
        self.order.first().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn nodes(&self) -> &NodeArena {
        &self.nodes
    }

    /// Verschiebt einen Eckpunkt. Alle Boxen, die ihn teilen, folgen.
    pub fn set_node_position(&mut self, node: NodeId, position: Point2D) -> EffectorResult<()> {
        if !self.nodes.contains(node) {
            return Err(EffectorError::UnknownNode(node));
        }
        self.nodes.set(node, position);
        Ok(())
    }

    /// Verschiebt eine ganze Box so, dass ihr Zentrum bei `new_center` liegt.
    pub fn translate_box(&mut self, id: BoxId, new_center: Point2D) -> EffectorResult<()> {
        let Self { nodes, slots, .. } = self;
        let b = slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(EffectorError::UnknownBox(id))?;
        b.translate_points(nodes, new_center);
        Ok(())
    }

    /// Schnappschuss aller Boxen. Muss vor jeder Auswertung laufen.
    pub fn bake(&mut self) {
        let Self {
            nodes,
            slots,
            order,
        } = self;
        for id in order.iter() {
            if let Some(b) = slots.get_mut(id.0).and_then(Option::as_mut) {
                b.bake(nodes);
            }
        }
    }

    /// Erstes Kind von `id` in Kettenreihenfolge.
    pub fn child_of(&self, id: BoxId) -> Option<BoxId> {
        self.iter().find(|b| b.parent == Some(id)).map(FlowBox::id)
    }

    pub fn children_of(&self, id: BoxId) -> Vec<BoxId> {
        self.iter()
            .filter(|b| b.parent == Some(id))
            .map(FlowBox::id)
            .collect()
    }

    /// Hängt eine neue Box an `parent` in Richtung `direction`.
    ///
    /// Die Richtung wird komponentenweise gerundet. Die zwei Ecken auf der
    /// gemeinsamen Kante werden mit dem Parent geteilt, die zwei freien Ecken
    /// liegen `2 * relative_direction` weiter.
    pub fn add_box(&mut self, parent: BoxId, direction: Point2D) -> EffectorResult<BoxId> {
        let dir = Cardinal::from_vec2_rounded(direction).ok_or(EffectorError::NonCardinalDirection {
            x: direction.x,
            y: direction.y,
        })?;

        let Self { nodes, slots, .. } = self;
        let father = slots
            .get_mut(parent.0)
            .and_then(Option::as_mut)
            .ok_or(EffectorError::UnknownBox(parent))?;
        father.connection_direction = Some(dir.inverse());
        father.direction = Some(dir);
        father.bake(nodes);
        let offset = father.relative_direction(father.origin(nodes)) * DEFAULT_BOX_SIZE;
        let p = father.nodes;

        let box_nodes = match dir {
            Cardinal::Right => {
                let n1 = nodes.insert(nodes.get(p[1]) + offset);
                let n2 = nodes.insert(nodes.get(p[2]) + offset);
                [p[1], n1, n2, p[2]]
            }
            Cardinal::Left => {
                let n3 = nodes.insert(nodes.get(p[3]) + offset);
                let n0 = nodes.insert(nodes.get(p[0]) + offset);
                [n0, p[0], p[3], n3]
            }
            Cardinal::Up => {
                let n1 = nodes.insert(nodes.get(p[1]) + offset);
                let n0 = nodes.insert(nodes.get(p[0]) + offset);
                [n0, n1, p[1], p[0]]
            }
            Cardinal::Down => {
                let n2 = nodes.insert(nodes.get(p[2]) + offset);
                let n3 = nodes.insert(nodes.get(p[3]) + offset);
                [p[3], p[2], n2, n3]
            }
        };

        let id = self.insert_box(box_nodes);
        if let Some(b) = self.slot_mut(id) {
            b.direction = Some(dir);
            b.connection_direction = Some(dir);
            b.parent = Some(parent);
        }
        debug!("Added {} to {} towards {}", id, parent, dir);
        Ok(id)
    }

    /// Entfernt `id` und verbindet dessen Parent direkt mit dem Kind.
    ///
    /// Die Ecken des Parents auf der Seite zur entfernten Box werden jeweils
    /// durch den nächstgelegenen geteilten Knoten des Kindes ersetzt. Das ist
    /// ein Topologie-Patch, keine geometrische Verschmelzung.
    ///
    /// Ohne Kind passiert nichts und es wird `Ok(false)` geliefert. Hat die
    /// Box keinen Parent, wird das Kind zur neuen Wurzel.
    pub fn remove_box_and_connect_to_child(&mut self, id: BoxId) -> EffectorResult<bool> {
        let target = self.try_get(id)?;
        let target_nodes = target.nodes;
        let target_parent = target.parent;

        let children = self.children_of(id);
        let child = match children.as_slice() {
            [] => return Ok(false),
            [child] => *child,
            _ => {
                warn!("Refusing to remove {}: {} children", id, children.len());
                return Err(EffectorError::BranchingChain {
                    parent: id,
                    children: children.len(),
                });
            }
        };

        let mut child_shared = self.shared_nodes(child, &target_nodes)?;
        check_shared_count(child, id, child_shared.len())?;

        if let Some(parent) = target_parent {
            let parent_shared = self.shared_nodes(parent, &target_nodes)?;
            check_shared_count(parent, id, parent_shared.len())?;

            let Self { nodes, slots, .. } = self;
            let father = slots
                .get_mut(parent.0)
                .and_then(Option::as_mut)
                .ok_or(EffectorError::UnknownBox(parent))?;
            for slot in father.nodes.iter_mut() {
                if !parent_shared.contains(slot) {
                    continue;
                }
                let origin = nodes.get(*slot);
                let closest = child_shared
                    .iter()
                    .enumerate()
                    .min_by(|(_, a), (_, b)| {
                        let da = nodes.get(**a).distance(origin);
                        let db = nodes.get(**b).distance(origin);
                        da.total_cmp(&db)
                    })
                    .map(|(i, _)| i);
                if let Some(i) = closest {
                    *slot = child_shared.remove(i);
                }
            }
        }

        self.try_get_mut(child)?.parent = target_parent;
        self.slots[id.0] = None;
        self.order.retain(|other| *other != id);
        debug!("Removed {}, {} now follows {:?}", id, child, target_parent);
        Ok(true)
    }

    /// Entfernt eine Box. Blätter werden einfach gelöscht, sonst wie
    /// `remove_box_and_connect_to_child`.
    pub fn remove_box(&mut self, id: BoxId) -> EffectorResult<()> {
        if self.remove_box_and_connect_to_child(id)? {
            return Ok(());
        }
        self.try_get(id)?;
        self.slots[id.0] = None;
        self.order.retain(|other| *other != id);
        debug!("Removed leaf {}", id);
        Ok(())
    }

    /// Knoten von `other`, die auch in `nodes` vorkommen, in Eckreihenfolge.
    fn shared_nodes(&self, other: BoxId, nodes: &[NodeId; 4]) -> EffectorResult<Vec<NodeId>> {
        let other = self.try_get(other)?;
        let mut shared: Vec<NodeId> = Vec::with_capacity(2);
        for n in other.nodes {
            if nodes.contains(&n) && !shared.contains(&n) {
                shared.push(n);
            }
        }
        Ok(shared)
    }

    /// Dreht die Flussrichtung aller Boxen um.
    pub fn invert_direction(&mut self) {
        for b in self.slots.iter_mut().flatten() {
            b.invert();
        }
    }

    pub fn invert_box(&mut self, id: BoxId) -> EffectorResult<()> {
        self.try_get_mut(id)?.invert();
        Ok(())
    }

    /// Lässt Box `id` jede Ecke mit exakt gleicher Position aus den anderen
    /// Boxen übernehmen. Spätere Boxen überschreiben frühere Treffer.
    ///
    /// Nur für importierte Ketten gedacht; alle Editieroperationen teilen
    /// Ecken bereits strukturell.
    pub fn reconnect_nodes(&mut self, id: BoxId) -> EffectorResult<usize> {
        let mut own = self.try_get(id)?.nodes;
        let mut relinked = 0;
        for other in self.iter().filter(|b| b.id() != id) {
            for n in other.nodes {
                let position = self.nodes.get(n);
                for slot in own.iter_mut() {
                    if *slot != n && self.nodes.get(*slot) == position {
                        *slot = n;
                        relinked += 1;
                    }
                }
            }
        }
        self.try_get_mut(id)?.nodes = own;
        Ok(relinked)
    }

    /// `reconnect_nodes` für jede Box in Kettenreihenfolge.
    pub fn reconnect_all(&mut self) -> usize {
        let ids = self.order.clone();
        let relinked: usize = ids
            .into_iter()
            .filter_map(|id| self.reconnect_nodes(id).ok())
            .sum();
        if relinked > 0 {
            debug!("Reconnected {} corner references", relinked);
        }
        relinked
    }

    /// Summe der Einzelflächen. Überlappungen werden doppelt gezählt.
    pub fn total_area(&self) -> f32 {
        self.iter().map(|b| b.area(&self.nodes)).sum()
    }

    /// Näherung der Mittellinie: Eintrittskantenmitten aller Boxen
    /// verbunden, plus die Austrittskante der letzten Box.
    pub fn linear_length(&self) -> f32 {
        let points: Vec<Point2D> = self.iter().map(|b| b.mid_edge_point(1)).collect();
        let (Some(last_point), Some(last_box)) = (points.last(), self.iter().last()) else {
            return 0.0;
        };
        let path: f32 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
        path + last_point.distance(last_box.mid_edge_point(-1))
    }

    /// Vereinigung der gebackenen Bounding Boxes aller Boxen.
    pub fn try_bounding_box(&self) -> EffectorResult<Bounds2D> {
        self.iter()
            .map(FlowBox::bounding_box)
            .reduce(|acc, bb| acc.union(&bb))
            .ok_or(EffectorError::Math(MathError::InsufficientPoints {
                expected: 1,
                actual: 0,
            }))
    }

    pub fn bounding_box(&self) -> Option<Bounds2D> {
        self.try_bounding_box().ok()
    }

    pub fn center(&self) -> Option<Point2D> {
        self.bounding_box().map(|bb| bb.center())
    }
}

fn check_shared_count(first: BoxId, second: BoxId, actual: usize) -> EffectorResult<()> {
    if actual == 2 {
        return Ok(());
    }
    warn!("{} and {} share {} nodes instead of 2", first, second, actual);
    Err(EffectorError::SharedNodeMismatch {
        first,
        second,
        expected: 2,
        actual,
    })
}
