// src/effector/callback.rs

use super::box_cell::BoxId;
use crate::math::types::Point2D;

/// Stabile Identität eines Körpers über Ticks hinweg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

/// Nutzlast von Enter- und Stay-Benachrichtigungen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerInfo {
    /// Box, in der der Körper erkannt wurde
    pub box_id: BoxId,
    pub force: Point2D,
    /// Aufenthaltszeit vor diesem Tick
    pub time_inside: f32,
}

/// Ein Körper, den der Host pro Tick als Kandidat liefert.
pub trait EffectedBody {
    fn id(&self) -> BodyId;

    fn position(&self) -> Point2D;

    /// Wendet die berechnete Kraft als Impuls an.
    fn apply_impulse(&mut self, impulse: Point2D);
}

/// Empfänger der Enter/Stay/Exit-Benachrichtigungen.
///
/// Alle Methoden haben leere Standardimplementierungen; ein fehlender
/// Empfänger ist kein Fehler.
pub trait EffectorCallback {
    fn on_trigger_enter(&mut self, _body: BodyId, _info: &TriggerInfo) {}

    fn on_trigger_stay(&mut self, _body: BodyId, _info: &TriggerInfo) {}

    fn on_trigger_exit(&mut self, _body: BodyId) {}
}

/// Kein Empfänger
impl EffectorCallback for () {}

/// Benachrichtigung als Wert, z.B. für Event-Queues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerEvent {
    Enter { body: BodyId, info: TriggerInfo },
    Stay { body: BodyId, info: TriggerInfo },
    Exit { body: BodyId },
}

impl TriggerEvent {
    pub fn body(&self) -> BodyId {
        match self {
            TriggerEvent::Enter { body, .. }
            | TriggerEvent::Stay { body, .. }
            | TriggerEvent::Exit { body } => *body,
        }
    }
}

/// Sammelt Benachrichtigungen in einer Liste.
impl EffectorCallback for Vec<TriggerEvent> {
    fn on_trigger_enter(&mut self, body: BodyId, info: &TriggerInfo) {
        self.push(TriggerEvent::Enter { body, info: *info });
    }

    fn on_trigger_stay(&mut self, body: BodyId, info: &TriggerInfo) {
        self.push(TriggerEvent::Stay { body, info: *info });
    }

    fn on_trigger_exit(&mut self, body: BodyId) {
        self.push(TriggerEvent::Exit { body });
    }
}
